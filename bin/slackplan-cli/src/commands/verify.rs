// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `slackplan verify` command: solver against exhaustive search.
//!
//! Each trial draws a random workload, solves it with the integer solver
//! and with [`ExhaustiveSearch`], and compares the optimal objectives.

use crate::ModelArgs;
use slack_planner::{ExhaustiveSearch, PlannerConfig};

const TOLERANCE: f64 = 1e-6;

pub async fn execute(
    mut config: PlannerConfig,
    model_args: ModelArgs,
    trials: usize,
    max_size: Option<usize>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    super::apply_model_args(&mut config, &model_args);

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║           slackplan · Verify                        ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let model = super::load_model(&config)?;
    let mut generator = super::generator(&config, seed)?;
    let max_size = max_size.unwrap_or_else(|| model.max_level());
    let exhaustive = ExhaustiveSearch::new().formulation(config.formulation);

    println!("  Model:  {}", model.summary());
    println!("  Trials: {trials}, sizes 1..={}", max_size.max(1));
    println!();

    println!(
        "  {:>5} {:>5} {:>14} {:>14} {:>8}",
        "Trial", "Size", "Solver", "Exhaustive", "Result",
    );
    println!("  {}", "-".repeat(52));

    let mut mismatches = 0usize;
    for trial in 0..trials {
        let size = generator.random_size(max_size);
        let workload = generator.generate(size);

        let expected = exhaustive.search(&workload, &model)?;
        let (decision, _) = super::plan_blocking(
            config.create_planner(),
            workload,
            model.clone(),
            config.solve_timeout(),
        )
        .await?;

        let tol = TOLERANCE * expected.objective.abs().max(1.0);
        let ok = (decision.objective - expected.objective).abs() <= tol;
        if !ok {
            mismatches += 1;
            tracing::warn!(
                trial,
                solver = decision.objective,
                exhaustive = expected.objective,
                "objective mismatch",
            );
        }
        println!(
            "  {:>5} {:>5} {:>14.3} {:>14.3} {:>8}",
            trial,
            size,
            decision.objective,
            expected.objective,
            if ok { "ok" } else { "MISMATCH" },
        );
    }
    println!();

    if mismatches > 0 {
        anyhow::bail!("{mismatches} of {trials} trials disagree with exhaustive search");
    }
    println!("  All {trials} trials match.");
    println!();
    Ok(())
}
