// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `slackplan solve` command: plan one workload.
//!
//! ```text
//! workload + model → build → [export LP] → solve → interpret → decision
//! ```

use crate::ModelArgs;
use perf_model::Workload;
use slack_planner::PlannerConfig;
use std::path::PathBuf;

pub struct SolveOptions {
    pub workload: Option<PathBuf>,
    pub size: Option<usize>,
    pub seed: Option<u64>,
    pub export_lp: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub matrices: bool,
    pub json: bool,
}

pub async fn execute(
    mut config: PlannerConfig,
    model_args: ModelArgs,
    opts: SolveOptions,
) -> anyhow::Result<()> {
    super::apply_model_args(&mut config, &model_args);
    if let Some(path) = opts.export_lp {
        config.export_lp = Some(path);
    }
    if let Some(secs) = opts.timeout {
        config.solve_timeout_secs = Some(secs);
    }

    let model = super::load_model(&config)?;

    let workload = match &opts.workload {
        Some(path) => Workload::from_file(path)?,
        None => {
            let mut generator = super::generator(&config, opts.seed)?;
            let size = match opts.size {
                Some(size) => size,
                None => generator.random_size(model.max_level()),
            };
            generator.generate(size)
        }
    };

    let planner = config.create_planner();
    let (decision, matrices) =
        super::plan_blocking(planner, workload.clone(), model, config.solve_timeout()).await?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             slackplan · Solve                       ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Workload:    {}", workload.summary());
    println!("  Formulation: {}", config.formulation);
    println!("  Policy:      {}", config.out_of_range);
    if let Some(path) = &config.export_lp {
        println!("  LP model:    {}", path.display());
    }
    println!();

    // ── Assignments ────────────────────────────────────────────
    println!(
        "  {:>5} {:>8} {:>9} {:<13} {:>12} {:>12}",
        "Query", "Blocks", "Deadline", "Strategy", "Predicted", "Slack",
    );
    println!("  {}", "-".repeat(64));
    for (a, q) in decision.assignments.iter().zip(workload.iter()) {
        let predicted = match a.predicted_time {
            Some(t) => format!("{t:.3}"),
            None => "infeasible".to_string(),
        };
        println!(
            "  {:>5} {:>8} {:>9} {:<13} {:>12} {:>12.3}",
            a.query_index,
            q.blocks(),
            q.deadline(),
            a.strategy.as_str(),
            predicted,
            a.slack,
        );
    }
    println!();

    // ── Summary ────────────────────────────────────────────────
    println!("  Active level: {}", decision.active_level);
    println!("  Index scans:  {}", decision.num_index_queries());
    println!("  Objective:    {:.3}", decision.objective);
    println!("  Solve time:   {:.2}ms ({})", super::ms(decision.solve_time), decision.solver);
    if decision.has_infeasible_assignment() {
        println!("  Warning: at least one query runs a strategy with zero throughput.");
    }
    println!();

    if opts.matrices {
        println!("{matrices}");
    }

    Ok(())
}
