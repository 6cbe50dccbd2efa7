// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `slackplan inspect` command: print a performance model level by level.

use perf_model::Strategy;
use slack_planner::PlannerConfig;
use std::path::PathBuf;

pub async fn execute(
    mut config: PlannerConfig,
    perf_model: Option<PathBuf>,
    only: Vec<Strategy>,
) -> anyhow::Result<()> {
    if let Some(path) = perf_model {
        config.perf_model = Some(path);
    }
    let shown: Vec<Strategy> = if only.is_empty() {
        Strategy::ALL.to_vec()
    } else {
        Strategy::ALL.into_iter().filter(|s| only.contains(s)).collect()
    };
    let model = super::load_model(&config)?;

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║           slackplan · Performance Model             ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  {}", model.summary());
    println!();

    // ── Throughput Table ───────────────────────────────────────
    let header: String = shown.iter().map(|s| format!(" {:>14}", s.as_str())).collect();
    println!("  {:>5}{header}", "Level");
    println!("  {}", "-".repeat(6 + 15 * shown.len()));

    for level in 0..model.num_levels() {
        let cells: String = shown
            .iter()
            .map(|&s| {
                let v = model.samples(s)[level];
                if v == 0.0 {
                    format!(" {:>14}", "-")
                } else {
                    format!(" {v:>14.2}")
                }
            })
            .collect();
        println!("  {level:>5}{cells}");
    }
    println!();

    // ── Feasibility ────────────────────────────────────────────
    println!("  Feasible levels:");
    for &s in &shown {
        let feasible = model.samples(s).iter().filter(|&&v| v > 0.0).count();
        println!("   {:<13} {}/{}", s.as_str(), feasible, model.num_levels());
    }
    println!();
    println!("  '-' marks zero throughput (strategy infeasible at that level).");
    println!();

    Ok(())
}
