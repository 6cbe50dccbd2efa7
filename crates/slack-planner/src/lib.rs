// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # slack-planner
//!
//! Chooses one workload-wide concurrency level and a scan strategy per
//! query so that total slack (deadline minus predicted completion time) is
//! maximised.
//!
//! The problem is formulated as a binary integer program and handed to a
//! pluggable [`IntegerSolver`]:
//!
//! | Stage | Type |
//! |---|---|
//! | Formulation | [`AssignmentModelBuilder`] → [`AssignmentModel`] |
//! | Solving | [`IntegerSolver`] (e.g. [`MicroLpSolver`]) → [`RawSolution`] |
//! | Decoding | [`SolutionInterpreter`] → [`ScheduleDecision`] |
//! | Cross-check | [`ExhaustiveSearch`] |
//!
//! [`SlackPlanner`] chains the stages.
//!
//! # Trait-Based Extensibility
//!
//! Any backend that can maximise a linear objective over binary variables
//! can be plugged in:
//!
//! ```ignore
//! struct MySolver;
//! impl IntegerSolver for MySolver {
//!     fn name(&self) -> &str { "mine" }
//!     fn solve(&self, program: &IntegerProgram) -> Result<RawSolution, PlannerError> { /* ... */ }
//! }
//! ```
//!
//! # Example
//! ```no_run
//! use perf_model::{OutOfRangePolicy, PerformanceModel, WorkloadGenerator};
//! use slack_planner::SlackPlanner;
//! use std::path::Path;
//!
//! let pm = PerformanceModel::from_file(Path::new("pmodel.txt"))
//!     .unwrap()
//!     .with_policy(OutOfRangePolicy::Clamp);
//! let workload = WorkloadGenerator::seeded(42).generate(8);
//! let decision = SlackPlanner::default().plan(&workload, &pm).unwrap();
//! println!("{}", decision.summary());
//! ```

mod config;
mod error;
mod exhaustive;
mod formulation;
mod interpret;
mod planner;
pub mod program;
pub mod solver;

pub use config::{BenchmarkConfig, PlannerConfig};
pub use error::PlannerError;
pub use exhaustive::ExhaustiveSearch;
pub use formulation::{
    slack_coefficient, AssignmentModel, AssignmentModelBuilder, Formulation, VariableCube,
    INFEASIBLE_PENALTY,
};
pub use interpret::{QueryAssignment, ScheduleDecision, SolutionInterpreter, SolutionMatrices};
pub use planner::SlackPlanner;
pub use program::{Constraint, IntegerProgram, LinearExpr, Relation, VarId};
pub use solver::microlp::MicroLpSolver;
pub use solver::{IntegerSolver, RawSolution};
