// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pure-Rust branch-and-bound backend via `good_lp` + `microlp`.
//!
//! Every program variable becomes a `good_lp` binary variable; constraints
//! map one-to-one onto `good_lp` equality/inequality constraints.

use crate::program::{LinearExpr, Relation};
use crate::solver::{IntegerSolver, RawSolution};
use crate::{IntegerProgram, PlannerError};
use good_lp::solvers::microlp::microlp;
use good_lp::{constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable};
use std::time::Instant;

/// Solves programs with the `microlp` MILP solver.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl IntegerSolver for MicroLpSolver {
    fn name(&self) -> &str {
        "microlp"
    }

    fn solve(&self, program: &IntegerProgram) -> Result<RawSolution, PlannerError> {
        let start = Instant::now();

        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = program
            .variables()
            .iter()
            .map(|name| vars.add(variable().binary().name(name.clone())))
            .collect();

        let objective = to_expression(program.objective(), &handles);
        let mut model = vars.maximise(objective).using(microlp);

        for c in program.constraints() {
            let lhs = to_expression(&c.expr, &handles);
            let translated = match c.relation {
                Relation::Eq => constraint::eq(lhs, c.rhs),
                Relation::Le => constraint::leq(lhs, c.rhs),
                Relation::Ge => constraint::geq(lhs, c.rhs),
            };
            model = model.with(translated);
        }

        let solution = model.solve().map_err(|e| match e {
            ResolutionError::Infeasible => PlannerError::Infeasible,
            other => PlannerError::SolverFailure {
                solver: self.name().to_string(),
                detail: other.to_string(),
            },
        })?;

        let values: Vec<f64> = handles.iter().map(|&v| solution.value(v)).collect();
        let objective = program.objective().evaluate(&values);
        let elapsed = start.elapsed();

        tracing::debug!(
            solver = self.name(),
            variables = values.len(),
            objective,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "solved integer program",
        );
        Ok(RawSolution::new(self.name(), values, objective, elapsed))
    }
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    expr.terms()
        .iter()
        .map(|&(var, coeff)| coeff * handles[var.index()])
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_best_of_exactly_one() {
        let mut p = IntegerProgram::new();
        let a = p.add_binary("a");
        let b = p.add_binary("b");
        let c = p.add_binary("c");
        p.add_eq("one", LinearExpr::sum([a, b, c]), 1.0);
        p.set_objective(LinearExpr::new().with_term(a, 1.0).with_term(b, 5.0).with_term(c, 3.0));

        let raw = MicroLpSolver.solve(&p).unwrap();
        assert_eq!(raw.values.len(), 3);
        assert!((raw.values[b.index()] - 1.0).abs() < 1e-6);
        assert!((raw.objective - 5.0).abs() < 1e-6);
        assert_eq!(raw.solver, "microlp");
    }

    #[test]
    fn test_respects_le_gate() {
        let mut p = IntegerProgram::new();
        let x = p.add_binary("x");
        let z = p.add_binary("z");
        p.add_le("gate", LinearExpr::sum([x]).with_term(z, -1.0), 0.0);
        p.add_eq("z_off", LinearExpr::sum([z]), 0.0);
        p.set_objective(LinearExpr::new().with_term(x, 10.0));

        let raw = MicroLpSolver.solve(&p).unwrap();
        assert!(raw.values[x.index()].abs() < 1e-6);
        assert!(raw.objective.abs() < 1e-6);
    }

    #[test]
    fn test_infeasible_is_distinct() {
        let mut p = IntegerProgram::new();
        let x = p.add_binary("x");
        p.add_eq("one", LinearExpr::sum([x]), 1.0);
        p.add_eq("zero", LinearExpr::sum([x]), 0.0);

        let err = MicroLpSolver.solve(&p).unwrap_err();
        assert!(matches!(err, PlannerError::Infeasible));
    }

    #[test]
    fn test_ge_constraint() {
        let mut p = IntegerProgram::new();
        let x = p.add_binary("x");
        let y = p.add_binary("y");
        p.add_ge("both", LinearExpr::sum([x, y]), 2.0);
        p.set_objective(LinearExpr::new().with_term(x, -1.0).with_term(y, -1.0));

        let raw = MicroLpSolver.solve(&p).unwrap();
        assert!((raw.objective + 2.0).abs() < 1e-6);
    }
}
