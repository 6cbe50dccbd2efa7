// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Decoding solver output into a schedule decision.
//!
//! The interpreter is strict: every variable must round to 0 or 1, exactly
//! one level must be active, and every query must select exactly one
//! strategy at that level. Anything else is reported as an error rather
//! than repaired.

use crate::formulation::AssignmentModel;
use crate::solver::RawSolution;
use crate::PlannerError;
use perf_model::Strategy;
use std::fmt;
use std::time::Duration;

/// The decision for one query.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct QueryAssignment {
    /// Index of the query in the workload.
    pub query_index: usize,
    /// Chosen execution strategy.
    pub strategy: Strategy,
    /// Predicted completion time at the active level, `None` if the model
    /// reports the strategy as infeasible there.
    pub predicted_time: Option<f64>,
    /// Contribution to the objective.
    pub slack: f64,
}

/// Decoded result of one optimisation run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScheduleDecision {
    /// The workload-wide concurrency level.
    pub active_level: usize,
    /// One entry per query, in workload order.
    pub assignments: Vec<QueryAssignment>,
    /// Total slack reported by the solver.
    pub objective: f64,
    /// Name of the solver that produced the solution.
    pub solver: String,
    /// Wall-clock solve time.
    pub solve_time: Duration,
}

impl ScheduleDecision {
    pub fn num_queries(&self) -> usize {
        self.assignments.len()
    }

    /// Strategy chosen for the query at `index`.
    pub fn strategy_of(&self, index: usize) -> Option<Strategy> {
        self.assignments.get(index).map(|a| a.strategy)
    }

    /// Per-query strategies in workload order.
    pub fn strategies(&self) -> Vec<Strategy> {
        self.assignments.iter().map(|a| a.strategy).collect()
    }

    /// Number of queries assigned `strategy`.
    pub fn count(&self, strategy: Strategy) -> usize {
        self.assignments.iter().filter(|a| a.strategy == strategy).count()
    }

    /// Number of queries assigned either index strategy.
    pub fn num_index_queries(&self) -> usize {
        self.assignments.iter().filter(|a| a.strategy.is_index()).count()
    }

    /// Sum of per-query slack; equals `objective` up to solver tolerance.
    pub fn total_slack(&self) -> f64 {
        self.assignments.iter().map(|a| a.slack).sum()
    }

    /// Returns `true` if any query was given a strategy the performance
    /// model reports as infeasible at the active level.
    pub fn has_infeasible_assignment(&self) -> bool {
        self.assignments.iter().any(|a| a.predicted_time.is_none())
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Decision ({}): level {}, {} queries (seq {}, index-solo {}, index-shared {}), \
             total slack {:.3}, solved in {:.2}ms",
            self.solver,
            self.active_level,
            self.num_queries(),
            self.count(Strategy::Sequential),
            self.count(Strategy::IndexSolo),
            self.count(Strategy::IndexShared),
            self.objective,
            self.solve_time.as_secs_f64() * 1000.0,
        )
    }
}

/// The three boolean grids of a solution, rows = queries, columns = levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionMatrices {
    pub seq: Vec<Vec<bool>>,
    pub index_solo: Vec<Vec<bool>>,
    pub index_shared: Vec<Vec<bool>>,
    pub levels: Vec<bool>,
}

impl SolutionMatrices {
    pub fn grid(&self, strategy: Strategy) -> &[Vec<bool>] {
        match strategy {
            Strategy::Sequential => &self.seq,
            Strategy::IndexSolo => &self.index_solo,
            Strategy::IndexShared => &self.index_shared,
        }
    }
}

impl fmt::Display for SolutionMatrices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for strategy in Strategy::ALL {
            writeln!(f, "{strategy}:")?;
            for row in self.grid(strategy) {
                let cells: Vec<&str> = row.iter().map(|&b| if b { "1" } else { "0" }).collect();
                writeln!(f, " {}", cells.join(" "))?;
            }
        }
        let cells: Vec<&str> = self.levels.iter().map(|&b| if b { "1" } else { "0" }).collect();
        writeln!(f, "level:")?;
        writeln!(f, " {}", cells.join(" "))
    }
}

/// Decodes [`RawSolution`]s for one [`AssignmentModel`].
pub struct SolutionInterpreter<'a> {
    model: &'a AssignmentModel,
}

impl<'a> SolutionInterpreter<'a> {
    pub fn new(model: &'a AssignmentModel) -> Self {
        Self { model }
    }

    /// Rounds every value and checks it is 0 or 1.
    pub fn binary_values(&self, raw: &RawSolution) -> Result<Vec<bool>, PlannerError> {
        let program = self.model.program();
        if raw.values.len() != program.num_variables() {
            return Err(PlannerError::MissingValues {
                expected: program.num_variables(),
                found: raw.values.len(),
            });
        }

        raw.values
            .iter()
            .zip(program.variables())
            .map(|(&value, name)| {
                let rounded = value.round();
                if rounded == 1.0 {
                    Ok(true)
                } else if rounded == 0.0 {
                    Ok(false)
                } else {
                    Err(PlannerError::NonBinaryValue {
                        variable: name.clone(),
                        value,
                    })
                }
            })
            .collect()
    }

    /// Renders the solution as boolean grids.
    pub fn matrices(&self, raw: &RawSolution) -> Result<SolutionMatrices, PlannerError> {
        let bits = self.binary_values(raw)?;
        let cube = self.model.cube();
        let grid = |strategy: Strategy| -> Vec<Vec<bool>> {
            (0..cube.num_queries())
                .map(|q| {
                    (0..cube.num_levels())
                        .map(|n| bits[cube.strategy_var(strategy, q, n).index()])
                        .collect()
                })
                .collect()
        };

        Ok(SolutionMatrices {
            seq: grid(Strategy::Sequential),
            index_solo: grid(Strategy::IndexSolo),
            index_shared: grid(Strategy::IndexShared),
            levels: (0..cube.num_levels())
                .map(|n| bits[cube.level_var(n).index()])
                .collect(),
        })
    }

    /// Validates the solution and decodes it.
    ///
    /// # Checks
    /// - Every value rounds to 0 or 1.
    /// - Exactly one level variable is set.
    /// - Every query has exactly one strategy variable set, at the active
    ///   level, and the formulation allows that (strategy, level) pair.
    pub fn interpret(&self, raw: &RawSolution) -> Result<ScheduleDecision, PlannerError> {
        let bits = self.binary_values(raw)?;
        let cube = self.model.cube();

        let active: Vec<usize> = (0..cube.num_levels())
            .filter(|&n| bits[cube.level_var(n).index()])
            .collect();
        let active_level = match active.as_slice() {
            [level] => *level,
            _ => {
                return Err(PlannerError::Inconsistent(format!(
                    "expected exactly one active level, found {active:?}"
                )))
            }
        };

        let mut assignments = Vec::with_capacity(cube.num_queries());
        for query in 0..cube.num_queries() {
            let chosen: Vec<(Strategy, usize)> = cube
                .query_vars(query)
                .filter(|(_, _, var)| bits[var.index()])
                .map(|(strategy, level, _)| (strategy, level))
                .collect();

            let (strategy, level) = match chosen.as_slice() {
                [pick] => *pick,
                _ => {
                    return Err(PlannerError::Inconsistent(format!(
                        "query {query} selects {} strategy variables, expected exactly one: {chosen:?}",
                        chosen.len(),
                    )))
                }
            };

            if level != active_level {
                return Err(PlannerError::Inconsistent(format!(
                    "query {query} selects {strategy} at level {level}, but the active level is {active_level}"
                )));
            }
            if !self.model.allows(strategy, level) {
                return Err(PlannerError::Inconsistent(format!(
                    "query {query} selects {strategy} at excluded level {level}"
                )));
            }

            assignments.push(QueryAssignment {
                query_index: query,
                strategy,
                predicted_time: self.model.prediction(strategy, query, level),
                slack: self.model.coefficient(strategy, query, level),
            });
        }

        let decision = ScheduleDecision {
            active_level,
            assignments,
            objective: raw.objective,
            solver: raw.solver.clone(),
            solve_time: raw.elapsed,
        };

        if decision.has_infeasible_assignment() {
            tracing::warn!(
                level = active_level,
                "decision assigns a strategy with zero throughput; objective includes the infeasibility penalty",
            );
        }
        Ok(decision)
    }
}
