// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for model construction, solving and interpretation.

/// Errors that can occur while planning a workload.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// A performance-model lookup or load failed.
    #[error("performance model error: {0}")]
    PerfModel(#[from] perf_model::PerfModelError),

    /// The solver proved the program has no feasible assignment.
    #[error("integer program is infeasible")]
    Infeasible,

    /// The solver failed for a reason other than infeasibility.
    #[error("solver '{solver}' failed: {detail}")]
    SolverFailure { solver: String, detail: String },

    /// A boolean variable came back as something other than 0 or 1.
    #[error("variable '{variable}' has non-binary value {value}")]
    NonBinaryValue { variable: String, value: f64 },

    /// The solution does not have one value per declared variable.
    #[error("solution has {found} values, model declares {expected} variables")]
    MissingValues { expected: usize, found: usize },

    /// The decoded solution violates a structural invariant.
    #[error("inconsistent solution: {0}")]
    Inconsistent(String),

    /// Writing an exported model failed.
    #[error("model export failed: {0}")]
    ExportError(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
