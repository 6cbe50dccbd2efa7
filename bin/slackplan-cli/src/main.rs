// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # slackplan
//!
//! Command-line driver for the slack planner.
//!
//! ## Usage
//! ```bash
//! # Solve a random workload sized to the model
//! slackplan solve --perf-model ./pmodel.txt --matrices --export-lp out.lp
//!
//! # Solve a workload file with the clamped model
//! slackplan solve --perf-model ./pmodel.txt --workload queries.json --clamp
//!
//! # Time the solver for sizes 1..=50, three repeats each
//! slackplan benchmark --perf-model ./pmodel.txt --max-size 50 --repeat 3
//!
//! # Cross-check the solver against exhaustive search
//! slackplan verify --perf-model ./pmodel.txt --trials 50
//! ```

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "slackplan",
    about = "Concurrency level and scan strategy planning by slack maximisation",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (CLI arguments take precedence).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that needs a performance model.
#[derive(clap::Args, Debug, Clone)]
pub struct ModelArgs {
    /// Path to the three-row performance-model file.
    #[arg(short, long)]
    perf_model: Option<PathBuf>,

    /// Reuse the last calibrated level for levels beyond the model.
    #[arg(long)]
    clamp: bool,

    /// Omit the boundary exclusions (seq at level Q, index at level 0).
    #[arg(long)]
    simplified: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one workload and print the decision.
    Solve {
        #[command(flatten)]
        model: ModelArgs,

        /// JSON workload file; a random workload is generated when absent.
        #[arg(short, long)]
        workload: Option<PathBuf>,

        /// Size of the generated workload (default: random up to the model's max level).
        #[arg(short, long, conflicts_with = "workload")]
        size: Option<usize>,

        /// Seed for the workload generator.
        #[arg(long)]
        seed: Option<u64>,

        /// Write the model in LP format before solving.
        #[arg(long)]
        export_lp: Option<PathBuf>,

        /// Abort the solve after this many seconds.
        #[arg(long)]
        timeout: Option<u64>,

        /// Print the three strategy grids and the level vector.
        #[arg(long)]
        matrices: bool,

        /// Print the decision as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Time solves for workload sizes 1..=max-size.
    Benchmark {
        #[command(flatten)]
        model: ModelArgs,

        /// Largest workload size.
        #[arg(long)]
        max_size: Option<usize>,

        /// Solves per size.
        #[arg(long)]
        repeat: Option<usize>,

        /// Seed for the workload generator.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate a random workload as JSON.
    Generate {
        /// Number of queries.
        #[arg(short, long)]
        size: usize,

        /// Seed for the workload generator.
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (stdout when absent).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a performance model as a per-level throughput table.
    Inspect {
        /// Path to the three-row performance-model file.
        #[arg(short, long)]
        perf_model: Option<PathBuf>,

        /// Only show these strategies (seq, index-solo, index-shared; repeatable).
        #[arg(short, long, value_parser = commands::parse_strategy)]
        strategy: Vec<perf_model::Strategy>,
    },

    /// Compare solver optima with exhaustive search on random workloads.
    Verify {
        #[command(flatten)]
        model: ModelArgs,

        /// Number of random workloads.
        #[arg(short, long, default_value_t = 20)]
        trials: usize,

        /// Largest workload size (default: the model's max level).
        #[arg(long)]
        max_size: Option<usize>,

        /// Seed for the workload generator.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Solve {
            model,
            workload,
            size,
            seed,
            export_lp,
            timeout,
            matrices,
            json,
        } => {
            let opts = commands::solve::SolveOptions {
                workload,
                size,
                seed,
                export_lp,
                timeout,
                matrices,
                json,
            };
            commands::solve::execute(config, model, opts).await
        }
        Commands::Benchmark {
            model,
            max_size,
            repeat,
            seed,
        } => commands::benchmark::execute(config, model, max_size, repeat, seed).await,
        Commands::Generate { size, seed, output } => {
            commands::generate::execute(config, size, seed, output).await
        }
        Commands::Inspect {
            perf_model,
            strategy,
        } => commands::inspect::execute(config, perf_model, strategy).await,
        Commands::Verify {
            model,
            trials,
            max_size,
            seed,
        } => commands::verify::execute(config, model, trials, max_size, seed).await,
    }
}
