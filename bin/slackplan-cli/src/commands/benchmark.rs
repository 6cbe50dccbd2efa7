// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `slackplan benchmark` command: solve time against workload size.
//!
//! For every size in `1..=max_size` a fresh random workload is solved
//! `repeat` times and the mean end-to-end time is printed.

use crate::ModelArgs;
use slack_planner::PlannerConfig;
use std::time::{Duration, Instant};

pub async fn execute(
    mut config: PlannerConfig,
    model_args: ModelArgs,
    max_size: Option<usize>,
    repeat: Option<usize>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    super::apply_model_args(&mut config, &model_args);
    if let Some(n) = max_size {
        config.benchmark.max_size = n;
    }
    if let Some(n) = repeat {
        config.benchmark.repeat = n;
    }
    config.validate()?;

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║           slackplan · Benchmark Suite               ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let model = super::load_model(&config)?;
    let mut generator = super::generator(&config, seed)?;
    let bench = config.benchmark.clone();

    println!("  Model:       {}", model.summary());
    println!("  Sizes:       1..={}", bench.max_size);
    println!("  Repeat:      {}", bench.repeat);
    println!("  Formulation: {}", config.formulation);
    println!();

    // ── Results Table ──────────────────────────────────────────
    println!(
        "  {:>5} {:>12} {:>12} {:>8} {:>14}",
        "Size", "Mean ms", "Solver ms", "Level", "Objective",
    );
    println!("  {}", "-".repeat(56));

    let mut results: Vec<(usize, f64)> = Vec::new();

    for size in 1..=bench.max_size {
        let workload = generator.generate(size);
        let mut total = Duration::ZERO;
        let mut solver_total = Duration::ZERO;
        let mut last = None;

        for _ in 0..bench.repeat {
            let planner = config.create_planner();
            let start = Instant::now();
            let outcome = super::plan_blocking(
                planner,
                workload.clone(),
                model.clone(),
                config.solve_timeout(),
            )
            .await;
            total += start.elapsed();

            match outcome {
                Ok((decision, _)) => {
                    solver_total += decision.solve_time;
                    last = Some(decision);
                }
                Err(e) => {
                    println!("  {:>5}     FAILED: {e}", size);
                    last = None;
                    break;
                }
            }
        }

        let Some(decision) = last else {
            continue;
        };
        let mean_ms = super::ms(total) / bench.repeat as f64;
        println!(
            "  {:>5} {:>12.3} {:>12.3} {:>8} {:>14.3}",
            size,
            mean_ms,
            super::ms(solver_total) / bench.repeat as f64,
            decision.active_level,
            decision.objective,
        );
        results.push((size, mean_ms));
    }

    println!();

    // ── Summary ────────────────────────────────────────────────
    if results.is_empty() {
        println!("  No successful benchmark runs.");
        return Ok(());
    }

    let slowest = results
        .iter()
        .copied()
        .fold((0, f64::MIN), |acc, r| if r.1 > acc.1 { r } else { acc });
    let mean_all = results.iter().map(|(_, t)| t).sum::<f64>() / results.len() as f64;

    println!("  Summary:");
    println!("   Sizes solved:   {}/{}", results.len(), bench.max_size);
    println!("   Mean per solve: {mean_all:.3}ms");
    println!("   Slowest:        size {} ({:.3}ms)", slowest.0, slowest.1);
    println!();

    Ok(())
}
