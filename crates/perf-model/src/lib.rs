// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # perf-model
//!
//! Workload description and throughput-based performance prediction for
//! I/O-bound scan queries.
//!
//! - [`Query`] / [`Workload`]: the units of work to schedule, each with a
//!   block count and a deadline.
//! - [`Strategy`]: sequential scan, index scan (solo), index scan (shared).
//! - [`PerformanceModel`]: per-strategy throughput samples indexed by the
//!   workload-wide concurrency level, with an explicit [`OutOfRangePolicy`].
//! - [`WorkloadGenerator`]: seeded synthetic workloads for tests and
//!   benchmarks.
//!
//! # Performance-Model File Format
//! Three lines of whitespace-separated, non-negative throughput samples
//! (blocks per time unit), one column per concurrency level:
//!
//! ```text
//! 100 50 40        <- sequential scan
//! 0   80 70        <- index scan, no interference
//! 0   60 55        <- index scan, limited interference
//! ```
//!
//! # Example
//! ```
//! use perf_model::{OutOfRangePolicy, PerformanceModel, Query, Strategy};
//!
//! let model: PerformanceModel = "100 50\n0 80\n0 60\n".parse().unwrap();
//! let q = Query::new(1000, 30);
//! assert_eq!(model.time_to_complete(Strategy::Sequential, &q, 0).unwrap(), 10.0);
//!
//! let clamped = model.with_policy(OutOfRangePolicy::Clamp);
//! assert_eq!(clamped.time_to_complete(Strategy::IndexSolo, &q, 7).unwrap(), 12.5);
//! ```

mod error;
mod generator;
mod loader;
mod model;
mod query;
mod strategy;

pub use error::PerfModelError;
pub use generator::{GeneratorConfig, WorkloadGenerator};
pub use model::{OutOfRangePolicy, PerformanceModel, INFEASIBLE_TIME};
pub use query::{Query, Workload};
pub use strategy::Strategy;
