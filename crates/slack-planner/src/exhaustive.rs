// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Exhaustive reference search.
//!
//! Once the active level `n` is fixed, the queries no longer interact: each
//! one independently takes its best allowed strategy at `n`. Enumerating
//! all `Q + 1` levels is therefore exact for this model and costs
//! `O(3 · Q · (Q + 1))`. It is used to cross-check solver results.

use crate::formulation::AssignmentModel;
use crate::interpret::{ScheduleDecision, SolutionInterpreter};
use crate::solver::RawSolution;
use crate::{AssignmentModelBuilder, Formulation, PlannerError};
use perf_model::{PerformanceModel, Strategy, Workload};
use std::time::Instant;

/// Enumerates every level and keeps the best one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveSearch {
    formulation: Formulation,
}

impl ExhaustiveSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn formulation(mut self, formulation: Formulation) -> Self {
        self.formulation = formulation;
        self
    }

    pub fn name(&self) -> &str {
        "exhaustive"
    }

    /// Builds the model for `workload` and returns its optimal decision.
    pub fn search(
        &self,
        workload: &Workload,
        model: &PerformanceModel,
    ) -> Result<ScheduleDecision, PlannerError> {
        let built = AssignmentModelBuilder::new(workload, model)
            .formulation(self.formulation)
            .build()?;
        let raw = self.solve(&built)?;
        SolutionInterpreter::new(&built).interpret(&raw)
    }

    /// Produces an optimal variable assignment for an already built model.
    pub fn solve(&self, model: &AssignmentModel) -> Result<RawSolution, PlannerError> {
        let start = Instant::now();
        let cube = model.cube();

        let mut best: Option<(f64, usize, Vec<(Strategy, f64)>)> = None;
        for level in 0..cube.num_levels() {
            let Some(picks) = best_picks_at(model, level) else {
                continue;
            };
            let total: f64 = picks.iter().map(|(_, slack)| slack).sum();
            if best.as_ref().map_or(true, |(b, _, _)| total > *b) {
                best = Some((total, level, picks));
            }
        }

        let (objective, level, picks) = best.ok_or(PlannerError::Infeasible)?;
        tracing::debug!(level, objective, "exhaustive search complete");

        let mut values = vec![0.0; model.program().num_variables()];
        values[cube.level_var(level).index()] = 1.0;
        for (query, (strategy, _)) in picks.iter().enumerate() {
            values[cube.strategy_var(*strategy, query, level).index()] = 1.0;
        }
        Ok(RawSolution::new(self.name(), values, objective, start.elapsed()))
    }
}

/// Each query's best allowed strategy at `level`, or `None` if some query
/// has no allowed strategy there.
fn best_picks_at(model: &AssignmentModel, level: usize) -> Option<Vec<(Strategy, f64)>> {
    (0..model.num_queries())
        .map(|query| {
            Strategy::ALL
                .into_iter()
                .filter(|&s| model.allows(s, level))
                .map(|s| (s, model.coefficient(s, query, level)))
                .fold(None, |acc: Option<(Strategy, f64)>, cand| match acc {
                    Some(cur) if cur.1 >= cand.1 => Some(cur),
                    _ => Some(cand),
                })
        })
        .collect()
}
