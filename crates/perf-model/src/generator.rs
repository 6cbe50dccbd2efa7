// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Synthetic workload generation for tests and benchmarks.
//!
//! Block counts and deadlines are drawn uniformly from `[1, max_blocks]`
//! and `[1, max_deadline]`. A fixed seed makes runs reproducible.

use crate::{PerfModelError, Query, Workload};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Ranges for generated queries.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GeneratorConfig {
    /// Upper bound (inclusive) on blocks per query.
    #[serde(default = "default_max_blocks")]
    pub max_blocks: u64,
    /// Upper bound (inclusive) on the deadline per query.
    #[serde(default = "default_max_deadline")]
    pub max_deadline: u64,
    /// RNG seed; `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_blocks() -> u64 {
    262_144
}

fn default_max_deadline() -> u64 {
    300
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_blocks: default_max_blocks(),
            max_deadline: default_max_deadline(),
            seed: None,
        }
    }
}

/// Generates random workloads.
#[derive(Debug)]
pub struct WorkloadGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl WorkloadGenerator {
    /// Creates a generator, rejecting empty ranges.
    pub fn new(config: GeneratorConfig) -> Result<Self, PerfModelError> {
        if config.max_blocks == 0 {
            return Err(PerfModelError::InvalidGenerator("max_blocks must be at least 1".into()));
        }
        if config.max_deadline == 0 {
            return Err(PerfModelError::InvalidGenerator("max_deadline must be at least 1".into()));
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    /// Default ranges with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            config: GeneratorConfig {
                seed: Some(seed),
                ..GeneratorConfig::default()
            },
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Draws a single query.
    pub fn query(&mut self) -> Query {
        let blocks = self.rng.gen_range(1..=self.config.max_blocks);
        let deadline = self.rng.gen_range(1..=self.config.max_deadline);
        Query::new(blocks, deadline)
    }

    /// Draws a workload of exactly `size` queries.
    pub fn generate(&mut self, size: usize) -> Workload {
        let workload: Workload = (0..size).map(|_| self.query()).collect();
        tracing::debug!("generated {}", workload.summary());
        workload
    }

    /// Draws a workload size uniformly from `[1, max_size]`.
    pub fn random_size(&mut self, max_size: usize) -> usize {
        self.rng.gen_range(1..=max_size.max(1))
    }
}
