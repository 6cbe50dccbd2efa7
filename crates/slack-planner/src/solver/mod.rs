// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`IntegerSolver`] adapter trait and its implementations.

pub mod microlp;

use crate::{IntegerProgram, PlannerError};
use std::time::Duration;

/// Trait for integer-program solvers.
///
/// A solver receives a fully built [`IntegerProgram`] and returns one value
/// per declared variable, in declaration order. It must report a proven
/// infeasible program as [`PlannerError::Infeasible`] and every other
/// failure as [`PlannerError::SolverFailure`].
///
/// Solving is a single blocking call. Timeouts belong to the caller.
pub trait IntegerSolver: Send + Sync {
    /// Human-readable name of this solver.
    fn name(&self) -> &str;

    /// Maximises the program's objective.
    fn solve(&self, program: &IntegerProgram) -> Result<RawSolution, PlannerError>;
}

/// Undecoded solver output.
#[derive(Debug, Clone)]
pub struct RawSolution {
    /// Name of the solver that produced the values.
    pub solver: String,
    /// One value per declared variable, in declaration order.
    pub values: Vec<f64>,
    /// Objective value reported for `values`.
    pub objective: f64,
    /// Wall-clock time spent solving.
    pub elapsed: Duration,
}

impl RawSolution {
    pub fn new(solver: &str, values: Vec<f64>, objective: f64, elapsed: Duration) -> Self {
        Self {
            solver: solver.to_string(),
            values,
            objective,
            elapsed,
        }
    }
}
