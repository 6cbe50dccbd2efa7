// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Planner configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! perf_model = "./pmodel.txt"
//! out_of_range = "clamp"
//! formulation = "full"
//! export_lp = "out.lp"
//! solve_timeout_secs = 60
//!
//! [generator]
//! max_blocks = 262144
//! max_deadline = 300
//! seed = 42
//!
//! [benchmark]
//! max_size = 50
//! repeat = 3
//! ```

use crate::{Formulation, MicroLpSolver, PlannerError, SlackPlanner};
use perf_model::{GeneratorConfig, OutOfRangePolicy, PerformanceModel};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Sweep settings for the benchmark driver.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkConfig {
    /// Largest workload size; sizes `1..=max_size` are measured.
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Solves per size; the mean is reported.
    #[serde(default = "default_repeat")]
    pub repeat: usize,
}

fn default_max_size() -> usize {
    50
}

fn default_repeat() -> usize {
    3
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            repeat: default_repeat(),
        }
    }
}

/// Configuration for the slack planner.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlannerConfig {
    /// Path to the three-row performance-model file.
    pub perf_model: Option<PathBuf>,
    /// Behaviour for levels beyond the calibrated range.
    #[serde(default)]
    pub out_of_range: OutOfRangePolicy,
    /// Which structural constraints to emit.
    #[serde(default)]
    pub formulation: Formulation,
    /// Where to write the LP-format model before each solve.
    pub export_lp: Option<PathBuf>,
    /// Upper bound on a single solve, enforced by the caller.
    pub solve_timeout_secs: Option<u64>,
    /// Synthetic workload ranges.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Benchmark sweep.
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
}

impl PlannerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, PlannerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlannerError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, PlannerError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| PlannerError::ConfigError(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, PlannerError> {
        toml::to_string_pretty(self)
            .map_err(|e| PlannerError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Rejects empty generator ranges and benchmark sweeps.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.generator.max_blocks == 0 || self.generator.max_deadline == 0 {
            return Err(PlannerError::ConfigError(
                "generator ranges must be at least 1".into(),
            ));
        }
        if self.benchmark.max_size == 0 || self.benchmark.repeat == 0 {
            return Err(PlannerError::ConfigError(
                "benchmark max_size and repeat must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Loads the performance model and applies the configured policy.
    pub fn load_model(&self) -> Result<PerformanceModel, PlannerError> {
        let path = self.perf_model.as_deref().ok_or_else(|| {
            PlannerError::ConfigError("no performance model path configured".into())
        })?;
        Ok(PerformanceModel::from_file(path)?.with_policy(self.out_of_range))
    }

    pub fn solve_timeout(&self) -> Option<Duration> {
        self.solve_timeout_secs.map(Duration::from_secs)
    }

    /// Creates a planner using the configured formulation and LP export.
    pub fn create_planner(&self) -> SlackPlanner<MicroLpSolver> {
        let planner = SlackPlanner::new(MicroLpSolver).formulation(self.formulation);
        match &self.export_lp {
            Some(path) => planner.export_lp(path.clone()),
            None => planner,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            perf_model: None,
            out_of_range: OutOfRangePolicy::Strict,
            formulation: Formulation::Full,
            export_lp: None,
            solve_timeout_secs: None,
            generator: GeneratorConfig::default(),
            benchmark: BenchmarkConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = PlannerConfig::default();
        assert_eq!(c.out_of_range, OutOfRangePolicy::Strict);
        assert_eq!(c.formulation, Formulation::Full);
        assert_eq!(c.benchmark.max_size, 50);
        assert_eq!(c.generator.max_deadline, 300);
        assert!(c.solve_timeout().is_none());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
perf_model = "/tmp/pmodel.txt"
out_of_range = "clamp"
formulation = "simplified"
solve_timeout_secs = 5

[generator]
max_blocks = 1000
seed = 9

[benchmark]
repeat = 1
"#;
        let c = PlannerConfig::from_toml(toml).unwrap();
        assert_eq!(c.perf_model, Some(PathBuf::from("/tmp/pmodel.txt")));
        assert_eq!(c.out_of_range, OutOfRangePolicy::Clamp);
        assert_eq!(c.formulation, Formulation::Simplified);
        assert_eq!(c.solve_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(c.generator.max_blocks, 1000);
        assert_eq!(c.generator.max_deadline, 300);
        assert_eq!(c.generator.seed, Some(9));
        assert_eq!(c.benchmark.max_size, 50);
        assert_eq!(c.benchmark.repeat, 1);
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = PlannerConfig {
            perf_model: Some(PathBuf::from("pm.txt")),
            export_lp: Some(PathBuf::from("out.lp")),
            ..Default::default()
        };
        let toml = c.to_toml().unwrap();
        let back = PlannerConfig::from_toml(&toml).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let err = PlannerConfig::from_toml("out_of_range = \"wrap\"\n").unwrap_err();
        assert!(matches!(err, PlannerError::ConfigError(_)));
    }

    #[test]
    fn test_rejects_zero_repeat() {
        let err = PlannerConfig::from_toml("[benchmark]\nrepeat = 0\n").unwrap_err();
        assert!(matches!(err, PlannerError::ConfigError(msg) if msg.contains("repeat")));
    }

    #[test]
    fn test_load_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pm.txt");
        std::fs::write(&path, "100 50\n0 80\n0 60\n").unwrap();

        let c = PlannerConfig {
            perf_model: Some(path),
            out_of_range: OutOfRangePolicy::Clamp,
            ..Default::default()
        };
        let pm = c.load_model().unwrap();
        assert_eq!(pm.policy(), OutOfRangePolicy::Clamp);

        let missing = PlannerConfig::default().load_model();
        assert!(matches!(missing, Err(PlannerError::ConfigError(_))));
    }

    #[test]
    fn test_create_planner() {
        let c = PlannerConfig {
            formulation: Formulation::Simplified,
            ..Default::default()
        };
        let planner = c.create_planner();
        assert_eq!(crate::IntegerSolver::name(planner.solver()), "microlp");
    }
}
