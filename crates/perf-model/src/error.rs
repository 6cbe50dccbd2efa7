// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for performance-model loading and lookup.

/// Errors that can occur when loading or querying a performance model.
#[derive(Debug, thiserror::Error)]
pub enum PerfModelError {
    /// The performance-model or workload file could not be read.
    #[error("failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The file does not contain exactly three throughput rows.
    #[error("expected exactly 3 throughput rows, found {found}")]
    RowCount { found: usize },

    /// A throughput row has no samples.
    #[error("throughput row {row} is empty")]
    EmptyRow { row: usize },

    /// A token could not be parsed as a floating-point number.
    #[error("row {row}, column {column}: cannot parse '{token}' as a number")]
    InvalidNumber {
        row: usize,
        column: usize,
        token: String,
    },

    /// A sample is negative or not finite.
    #[error("row {row}, column {column}: throughput {value} must be finite and non-negative")]
    InvalidSample { row: usize, column: usize, value: f64 },

    /// The three rows do not have the same number of samples.
    #[error("throughput rows have mismatched lengths: seq={seq}, index_solo={index_solo}, index_shared={index_shared}")]
    LengthMismatch {
        seq: usize,
        index_solo: usize,
        index_shared: usize,
    },

    /// A concurrency level beyond the calibrated range was requested from a
    /// strict model.
    #[error("concurrency level {level} is outside the calibrated range 0..={max_level}")]
    LevelOutOfRange { level: usize, max_level: usize },

    /// The workload generator was configured with an empty range.
    #[error("invalid generator configuration: {0}")]
    InvalidGenerator(String),

    /// A workload file is malformed.
    #[error("failed to parse workload: {0}")]
    WorkloadParseError(#[from] serde_json::Error),
}
