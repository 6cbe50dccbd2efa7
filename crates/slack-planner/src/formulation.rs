// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The slack-maximising assignment model.
//!
//! For a workload of `Q` queries the model decides one workload-wide
//! concurrency level `n ∈ [0, Q]` and, for every query, one execution
//! strategy. It is expressed as a binary integer program:
//!
//! ```text
//! variables   x_s(i,n)  for s ∈ {seq, idx, idxs}, i ∈ [0,Q), n ∈ [0,Q]
//!             z(n)      for n ∈ [0,Q]
//!
//! exclusions  seq(i,Q) = 0, idx(i,0) = 0, idxs(i,0) = 0      (Full only)
//! one_strategy(i)   Σ_n Σ_s x_s(i,n) = 1
//! level_gate(i,n)   Σ_s x_s(i,n) − z(n) ≤ 0
//! single_level      Σ_n z(n) = 1
//!
//! maximise    Σ_i Σ_n Σ_s x_s(i,n) · slack_s(i,n)
//! ```
//!
//! `slack_s(i,n)` is `deadline_i − time_s(i,n)` when the performance model
//! predicts a completion time. When the strategy has zero throughput at that
//! level the completion time is charged as [`INFEASIBLE_PENALTY`], so the
//! coefficient becomes `deadline_i − 1e6` and still moves with the deadline.
//!
//! # Sentinel Contract
//!
//! The penalty only works while it dominates every legitimate slack value.
//! Deadlines and completion times must stay far below `1e6` in magnitude;
//! [`AssignmentModel::sentinel_headroom`] reports the largest legitimate
//! coefficient and the builder warns when it gets within 10× of the penalty.
//!
//! The level index `n` is not tied to the number of queries assigned an
//! index strategy; the only coupling is that every query commits to the
//! same active level.

use crate::program::{IntegerProgram, LinearExpr, VarId};
use crate::PlannerError;
use perf_model::{PerformanceModel, Query, Strategy, Workload};
use std::fmt;

/// Completion time charged to a strategy that cannot run at a level.
///
/// The magnitude of [`perf_model::INFEASIBLE_TIME`].
pub const INFEASIBLE_PENALTY: f64 = -perf_model::INFEASIBLE_TIME;

/// Which structural constraints the model carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formulation {
    /// Forces sequential scans off level `Q` and index scans off level 0.
    #[default]
    Full,
    /// Leaves every (strategy, level) pair open to the solver.
    Simplified,
}

impl Formulation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Simplified => "simplified",
        }
    }

    /// Whether `strategy` may be chosen at `level` in a workload of
    /// `num_queries` queries.
    pub fn allows(&self, strategy: Strategy, level: usize, num_queries: usize) -> bool {
        match self {
            Self::Simplified => true,
            Self::Full => match strategy {
                Strategy::Sequential => level != num_queries,
                Strategy::IndexSolo | Strategy::IndexShared => level != 0,
            },
        }
    }
}

impl fmt::Display for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Objective coefficient for one query given its predicted completion time.
pub fn slack_coefficient(query: &Query, predicted: Option<f64>) -> f64 {
    match predicted {
        Some(time) => query.deadline() as f64 - time,
        None => query.deadline() as f64 - INFEASIBLE_PENALTY,
    }
}

/// Index of the decision variables of one model.
///
/// Strategy variables are laid out strategy-major, then query, then level,
/// followed by the `Q + 1` level variables.
#[derive(Debug, Clone)]
pub struct VariableCube {
    num_queries: usize,
    strategy_vars: Vec<VarId>,
    level_vars: Vec<VarId>,
}

impl VariableCube {
    fn declare(program: &mut IntegerProgram, num_queries: usize) -> Self {
        let num_levels = num_queries + 1;
        let mut strategy_vars = Vec::with_capacity(3 * num_queries * num_levels);
        for strategy in Strategy::ALL {
            for query in 0..num_queries {
                for level in 0..num_levels {
                    let name = format!("{}_q{query}_n{level}", var_prefix(strategy));
                    strategy_vars.push(program.add_binary(name));
                }
            }
        }
        let level_vars = (0..num_levels)
            .map(|level| program.add_binary(format!("level_n{level}")))
            .collect();

        Self {
            num_queries,
            strategy_vars,
            level_vars,
        }
    }

    pub fn num_queries(&self) -> usize {
        self.num_queries
    }

    /// Number of candidate levels (`Q + 1`).
    pub fn num_levels(&self) -> usize {
        self.num_queries + 1
    }

    pub fn num_strategy_variables(&self) -> usize {
        self.strategy_vars.len()
    }

    pub fn num_level_variables(&self) -> usize {
        self.level_vars.len()
    }

    /// "Query `query` uses `strategy`, assuming the system runs at `level`."
    pub fn strategy_var(&self, strategy: Strategy, query: usize, level: usize) -> VarId {
        self.strategy_vars[self.offset(strategy, query, level)]
    }

    /// "The system runs at `level`."
    pub fn level_var(&self, level: usize) -> VarId {
        self.level_vars[level]
    }

    /// All `3 · (Q + 1)` variables belonging to one query.
    pub fn query_vars(&self, query: usize) -> impl Iterator<Item = (Strategy, usize, VarId)> + '_ {
        Strategy::ALL.into_iter().flat_map(move |strategy| {
            (0..self.num_levels())
                .map(move |level| (strategy, level, self.strategy_var(strategy, query, level)))
        })
    }

    /// The three strategy variables of one query at one level.
    pub fn cell_vars(&self, query: usize, level: usize) -> [VarId; 3] {
        Strategy::ALL.map(|s| self.strategy_var(s, query, level))
    }

    pub(crate) fn offset(&self, strategy: Strategy, query: usize, level: usize) -> usize {
        (strategy.ordinal() * self.num_queries + query) * self.num_levels() + level
    }
}

fn var_prefix(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Sequential => "seq",
        Strategy::IndexSolo => "idx",
        Strategy::IndexShared => "idxs",
    }
}

/// A fully built model: the integer program plus what is needed to decode
/// its solution.
#[derive(Debug, Clone)]
pub struct AssignmentModel {
    program: IntegerProgram,
    cube: VariableCube,
    formulation: Formulation,
    /// Predicted completion time per strategy variable, in cube order.
    predictions: Vec<Option<f64>>,
    /// Objective coefficient per strategy variable, in cube order.
    coefficients: Vec<f64>,
}

impl AssignmentModel {
    pub fn program(&self) -> &IntegerProgram {
        &self.program
    }

    pub fn cube(&self) -> &VariableCube {
        &self.cube
    }

    pub fn formulation(&self) -> Formulation {
        self.formulation
    }

    pub fn num_queries(&self) -> usize {
        self.cube.num_queries()
    }

    /// Predicted completion time, `None` if infeasible.
    pub fn prediction(&self, strategy: Strategy, query: usize, level: usize) -> Option<f64> {
        self.predictions[self.cube.offset(strategy, query, level)]
    }

    /// Objective coefficient of one strategy variable.
    pub fn coefficient(&self, strategy: Strategy, query: usize, level: usize) -> f64 {
        self.coefficients[self.cube.offset(strategy, query, level)]
    }

    /// Whether the formulation lets `strategy` be chosen at `level`.
    pub fn allows(&self, strategy: Strategy, level: usize) -> bool {
        self.formulation.allows(strategy, level, self.num_queries())
    }

    /// Largest magnitude among coefficients of feasible entries.
    pub fn sentinel_headroom(&self) -> f64 {
        self.predictions
            .iter()
            .zip(&self.coefficients)
            .filter(|(p, _)| p.is_some())
            .map(|(_, c)| c.abs())
            .fold(0.0, f64::max)
    }
}

/// Builds an [`AssignmentModel`] from a workload and a performance model.
///
/// # Example
/// ```
/// use perf_model::{PerformanceModel, Query, Workload};
/// use slack_planner::AssignmentModelBuilder;
///
/// let pm: PerformanceModel = "100 50\n0 80\n0 60\n".parse().unwrap();
/// let workload = Workload::new(vec![Query::new(1000, 30)]);
/// let model = AssignmentModelBuilder::new(&workload, &pm).build().unwrap();
/// assert_eq!(model.cube().num_strategy_variables(), 6);
/// assert_eq!(model.cube().num_level_variables(), 2);
/// ```
pub struct AssignmentModelBuilder<'a> {
    workload: &'a Workload,
    model: &'a PerformanceModel,
    formulation: Formulation,
}

impl<'a> AssignmentModelBuilder<'a> {
    pub fn new(workload: &'a Workload, model: &'a PerformanceModel) -> Self {
        Self {
            workload,
            model,
            formulation: Formulation::default(),
        }
    }

    pub fn formulation(mut self, formulation: Formulation) -> Self {
        self.formulation = formulation;
        self
    }

    /// Declares variables, constraints and the objective.
    ///
    /// Fails only if a performance-model lookup fails, i.e. a strict model
    /// is asked for a level beyond its calibrated range.
    pub fn build(&self) -> Result<AssignmentModel, PlannerError> {
        let num_queries = self.workload.len();
        let num_levels = num_queries + 1;

        let mut program = IntegerProgram::new();
        let cube = VariableCube::declare(&mut program, num_queries);

        let (predictions, coefficients) = self.objective_table(&cube)?;

        if self.formulation == Formulation::Full {
            for query in 0..num_queries {
                for strategy in Strategy::ALL {
                    let level = match strategy {
                        Strategy::Sequential => num_queries,
                        Strategy::IndexSolo | Strategy::IndexShared => 0,
                    };
                    program.add_eq(
                        format!("exclude_{}_q{query}", var_prefix(strategy)),
                        LinearExpr::sum([cube.strategy_var(strategy, query, level)]),
                        0.0,
                    );
                }
            }
        }

        for query in 0..num_queries {
            let vars = cube.query_vars(query).map(|(_, _, v)| v);
            program.add_eq(format!("one_strategy_q{query}"), LinearExpr::sum(vars), 1.0);
        }

        for level in 0..num_levels {
            for query in 0..num_queries {
                let expr = LinearExpr::sum(cube.cell_vars(query, level))
                    .with_term(cube.level_var(level), -1.0);
                program.add_le(format!("level_gate_q{query}_n{level}"), expr, 0.0);
            }
        }

        let levels = (0..num_levels).map(|level| cube.level_var(level));
        program.add_eq("single_level", LinearExpr::sum(levels), 1.0);

        let mut objective = LinearExpr::new();
        for strategy in Strategy::ALL {
            for query in 0..num_queries {
                for level in 0..num_levels {
                    let offset = cube.offset(strategy, query, level);
                    objective.add_term(cube.strategy_var(strategy, query, level), coefficients[offset]);
                }
            }
        }
        program.set_objective(objective);

        let built = AssignmentModel {
            program,
            cube,
            formulation: self.formulation,
            predictions,
            coefficients,
        };

        let headroom = built.sentinel_headroom();
        if headroom * 10.0 >= INFEASIBLE_PENALTY {
            tracing::warn!(
                headroom,
                penalty = INFEASIBLE_PENALTY,
                "slack magnitudes approach the infeasibility penalty; solutions may pick infeasible strategies",
            );
        }
        tracing::debug!(
            queries = num_queries,
            formulation = %self.formulation,
            "{}",
            built.program,
        );
        Ok(built)
    }

    /// Predictions and objective coefficients for every strategy variable.
    fn objective_table(
        &self,
        cube: &VariableCube,
    ) -> Result<(Vec<Option<f64>>, Vec<f64>), PlannerError> {
        let n = cube.num_strategy_variables();
        let mut predictions = vec![None; n];
        let mut coefficients = vec![0.0; n];

        for strategy in Strategy::ALL {
            for (query_idx, query) in self.workload.iter().enumerate() {
                for level in 0..cube.num_levels() {
                    let offset = cube.offset(strategy, query_idx, level);
                    let predicted = self.model.predict(strategy, query, level)?;
                    predictions[offset] = predicted;
                    coefficients[offset] = slack_coefficient(query, predicted);
                }
            }
        }
        Ok((predictions, coefficients))
    }
}
