// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! End-to-end planning pipeline: build → (export) → solve → interpret.

use crate::interpret::{ScheduleDecision, SolutionInterpreter, SolutionMatrices};
use crate::solver::microlp::MicroLpSolver;
use crate::solver::IntegerSolver;
use crate::{AssignmentModelBuilder, Formulation, PlannerError};
use perf_model::{PerformanceModel, Workload};
use std::path::PathBuf;

/// Runs one optimisation per call with a fixed solver and formulation.
///
/// # Example
/// ```
/// use perf_model::{PerformanceModel, Query, Strategy, Workload};
/// use slack_planner::SlackPlanner;
///
/// let pm: PerformanceModel = "100 50\n0 80\n0 60\n".parse().unwrap();
/// let workload = Workload::new(vec![Query::new(1000, 30)]);
/// let decision = SlackPlanner::default().plan(&workload, &pm).unwrap();
/// assert_eq!(decision.active_level, 0);
/// assert_eq!(decision.strategy_of(0), Some(Strategy::Sequential));
/// ```
#[derive(Debug, Clone)]
pub struct SlackPlanner<S: IntegerSolver> {
    solver: S,
    formulation: Formulation,
    export_lp: Option<PathBuf>,
}

impl<S: IntegerSolver> SlackPlanner<S> {
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            formulation: Formulation::default(),
            export_lp: None,
        }
    }

    pub fn formulation(mut self, formulation: Formulation) -> Self {
        self.formulation = formulation;
        self
    }

    /// Writes every built model to `path` in LP format before solving.
    pub fn export_lp(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_lp = Some(path.into());
        self
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Plans `workload` and returns the decoded decision.
    pub fn plan(
        &self,
        workload: &Workload,
        model: &PerformanceModel,
    ) -> Result<ScheduleDecision, PlannerError> {
        self.plan_detailed(workload, model).map(|(decision, _)| decision)
    }

    /// Plans `workload` and also returns the raw boolean grids.
    pub fn plan_detailed(
        &self,
        workload: &Workload,
        model: &PerformanceModel,
    ) -> Result<(ScheduleDecision, SolutionMatrices), PlannerError> {
        tracing::info!(
            "planning {} with {} ({} formulation)",
            workload.summary(),
            self.solver.name(),
            self.formulation,
        );

        let built = AssignmentModelBuilder::new(workload, model)
            .formulation(self.formulation)
            .build()?;
        tracing::debug!("{}", built.program());

        if let Some(path) = &self.export_lp {
            built.program().write_lp(path)?;
            tracing::info!("exported model to {}", path.display());
        }

        let raw = self.solver.solve(built.program())?;
        let interpreter = SolutionInterpreter::new(&built);
        let decision = interpreter.interpret(&raw)?;
        let matrices = interpreter.matrices(&raw)?;

        tracing::info!("{}", decision.summary());
        Ok((decision, matrices))
    }
}

impl Default for SlackPlanner<MicroLpSolver> {
    fn default() -> Self {
        Self::new(MicroLpSolver)
    }
}
