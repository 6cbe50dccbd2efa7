// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and the helpers they share.

pub mod benchmark;
pub mod generate;
pub mod inspect;
pub mod solve;
pub mod verify;

use crate::ModelArgs;
use anyhow::Context;
use perf_model::{OutOfRangePolicy, PerformanceModel, Strategy, Workload, WorkloadGenerator};
use slack_planner::{
    Formulation, MicroLpSolver, PlannerConfig, ScheduleDecision, SlackPlanner, SolutionMatrices,
};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Loads the TOML config if one was given, otherwise defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PlannerConfig> {
    match path {
        Some(p) => {
            let config = PlannerConfig::from_file(p)?;
            tracing::info!("loaded config from {}", p.display());
            Ok(config)
        }
        None => Ok(PlannerConfig::default()),
    }
}

/// Folds model-related CLI flags into the config.
pub fn apply_model_args(config: &mut PlannerConfig, args: &ModelArgs) {
    if let Some(path) = &args.perf_model {
        config.perf_model = Some(path.clone());
    }
    if args.clamp {
        config.out_of_range = OutOfRangePolicy::Clamp;
    }
    if args.simplified {
        config.formulation = Formulation::Simplified;
    }
}

pub fn load_model(config: &PlannerConfig) -> anyhow::Result<PerformanceModel> {
    let model = config
        .load_model()
        .context("pass --perf-model or set perf_model in the config file")?;
    tracing::info!("{}", model.summary());
    Ok(model)
}

/// Builds a generator from the config, with `seed` overriding the configured one.
pub fn generator(config: &PlannerConfig, seed: Option<u64>) -> anyhow::Result<WorkloadGenerator> {
    let mut gen_config = config.generator.clone();
    if seed.is_some() {
        gen_config.seed = seed;
    }
    Ok(WorkloadGenerator::new(gen_config)?)
}

/// Runs one plan on the blocking pool, bounded by `timeout` when set.
pub async fn plan_blocking(
    planner: SlackPlanner<MicroLpSolver>,
    workload: Workload,
    model: PerformanceModel,
    timeout: Option<Duration>,
) -> anyhow::Result<(ScheduleDecision, SolutionMatrices)> {
    let task = tokio::task::spawn_blocking(move || planner.plan_detailed(&workload, &model));

    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| anyhow::anyhow!("solve exceeded {:.1}s timeout", limit.as_secs_f64()))?,
        None => task.await,
    };

    Ok(joined.context("solver task panicked")??)
}

/// Parses a strategy name for clap, accepting the usual aliases.
pub fn parse_strategy(s: &str) -> Result<Strategy, String> {
    Strategy::from_str_loose(s)
        .ok_or_else(|| format!("unknown strategy '{s}' (expected seq, index-solo or index-shared)"))
}

/// Formats a duration in milliseconds.
pub fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
