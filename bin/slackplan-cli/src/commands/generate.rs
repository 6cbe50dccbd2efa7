// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `slackplan generate` command: write a random workload as JSON.

use slack_planner::PlannerConfig;
use std::path::PathBuf;

pub async fn execute(
    config: PlannerConfig,
    size: usize,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let workload = super::generator(&config, seed)?.generate(size);
    let json = workload.to_json()?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            eprintln!("  Wrote {} to {}", workload.summary(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
