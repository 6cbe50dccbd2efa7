// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Throughput-based completion-time prediction.
//!
//! # Infeasibility Sentinel
//!
//! A throughput sample of zero means the strategy cannot run at that
//! concurrency level. [`PerformanceModel::time_to_complete`] reports this as
//! [`INFEASIBLE_TIME`] (`-1_000_000.0`); [`PerformanceModel::predict`]
//! reports it as `None`. Consumers that fold predictions into an objective
//! must keep every legitimate value well inside the sentinel's magnitude.
//!
//! # Out-of-Range Levels
//!
//! Levels above the last calibrated level `N` are handled by the model's
//! [`OutOfRangePolicy`]: `Strict` fails the lookup, `Clamp` evaluates at `N`.

use crate::{PerfModelError, Query, Strategy};
use std::fmt;

/// Completion time reported for a strategy whose throughput is zero.
pub const INFEASIBLE_TIME: f64 = -1_000_000.0;

/// What to do when a lookup asks for a level beyond the calibrated range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    /// Fail with [`PerfModelError::LevelOutOfRange`].
    #[default]
    Strict,
    /// Evaluate at the largest measured level instead.
    Clamp,
}

impl OutOfRangePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Clamp => "clamp",
        }
    }
}

impl fmt::Display for OutOfRangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measured throughput per strategy and concurrency level.
///
/// All three rows hold `N + 1` samples, where `N` is the largest calibrated
/// concurrency level.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceModel {
    seq: Vec<f64>,
    index_solo: Vec<f64>,
    index_shared: Vec<f64>,
    policy: OutOfRangePolicy,
}

impl PerformanceModel {
    /// Builds a strict model from three throughput rows.
    ///
    /// # Checks
    /// - Every row is non-empty.
    /// - Every sample is finite and non-negative.
    /// - All rows have the same length.
    pub fn from_samples(
        seq: Vec<f64>,
        index_solo: Vec<f64>,
        index_shared: Vec<f64>,
    ) -> Result<Self, PerfModelError> {
        for (row, samples) in [&seq, &index_solo, &index_shared].into_iter().enumerate() {
            if samples.is_empty() {
                return Err(PerfModelError::EmptyRow { row });
            }
            if let Some((column, &value)) = samples
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(PerfModelError::InvalidSample { row, column, value });
            }
        }

        if seq.len() != index_solo.len() || seq.len() != index_shared.len() {
            return Err(PerfModelError::LengthMismatch {
                seq: seq.len(),
                index_solo: index_solo.len(),
                index_shared: index_shared.len(),
            });
        }

        Ok(Self {
            seq,
            index_solo,
            index_shared,
            policy: OutOfRangePolicy::Strict,
        })
    }

    /// Returns the model with a different out-of-range policy.
    pub fn with_policy(mut self, policy: OutOfRangePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> OutOfRangePolicy {
        self.policy
    }

    /// Largest calibrated concurrency level `N`.
    pub fn max_level(&self) -> usize {
        self.seq.len() - 1
    }

    /// Number of calibrated levels (`N + 1`).
    pub fn num_levels(&self) -> usize {
        self.seq.len()
    }

    /// Throughput samples for one strategy, indexed by level.
    pub fn samples(&self, strategy: Strategy) -> &[f64] {
        match strategy {
            Strategy::Sequential => &self.seq,
            Strategy::IndexSolo => &self.index_solo,
            Strategy::IndexShared => &self.index_shared,
        }
    }

    /// Resolves `level` against the calibrated range using the policy.
    pub fn resolve_level(&self, level: usize) -> Result<usize, PerfModelError> {
        let max_level = self.max_level();
        if level <= max_level {
            return Ok(level);
        }
        match self.policy {
            OutOfRangePolicy::Strict => Err(PerfModelError::LevelOutOfRange { level, max_level }),
            OutOfRangePolicy::Clamp => {
                tracing::trace!(level, max_level, "clamping concurrency level");
                Ok(max_level)
            }
        }
    }

    /// Throughput of `strategy` at `level` after applying the policy.
    pub fn throughput(&self, strategy: Strategy, level: usize) -> Result<f64, PerfModelError> {
        let level = self.resolve_level(level)?;
        Ok(self.samples(strategy)[level])
    }

    /// Predicted completion time, or `None` when the strategy is infeasible
    /// (zero throughput) at this level.
    pub fn predict(
        &self,
        strategy: Strategy,
        query: &Query,
        level: usize,
    ) -> Result<Option<f64>, PerfModelError> {
        let iops = self.throughput(strategy, level)?;
        if iops == 0.0 {
            return Ok(None);
        }
        Ok(Some(query.blocks() as f64 / iops))
    }

    /// Predicted completion time, with [`INFEASIBLE_TIME`] standing in for
    /// an infeasible strategy.
    pub fn time_to_complete(
        &self,
        strategy: Strategy,
        query: &Query,
        level: usize,
    ) -> Result<f64, PerfModelError> {
        Ok(self.predict(strategy, query, level)?.unwrap_or(INFEASIBLE_TIME))
    }

    /// Returns a one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "PerformanceModel: {} levels (N={}), policy={}",
            self.num_levels(),
            self.max_level(),
            self.policy,
        )
    }
}
