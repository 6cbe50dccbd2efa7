// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Solver-agnostic description of a binary integer program.
//!
//! An [`IntegerProgram`] is a list of named boolean variables, named linear
//! constraints and a linear objective to maximise. It is plain data: any
//! [`crate::IntegerSolver`] can consume it, and it can be exported in CPLEX
//! LP format for offline inspection.
//!
//! ```text
//! Maximize
//!  obj: 20 seq_q0_n0 + 17.5 idx_q0_n1
//! Subject To
//!  one_strategy_q0: seq_q0_n0 + idx_q0_n1 = 1
//! Binary
//!  seq_q0_n0
//!  idx_q0_n1
//! End
//! ```

use std::fmt::{self, Write as _};
use std::path::Path;

/// Handle to a variable declared in an [`IntegerProgram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    /// Position of the variable in declaration order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A sum of `coefficient * variable` terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given variables, each with coefficient 1.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
        }
    }

    /// Appends `coefficient * var`.
    pub fn add_term(&mut self, var: VarId, coefficient: f64) -> &mut Self {
        self.terms.push((var, coefficient));
        self
    }

    /// Builder-style [`LinearExpr::add_term`].
    pub fn with_term(mut self, var: VarId, coefficient: f64) -> Self {
        self.terms.push((var, coefficient));
        self
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression against one value per declared variable.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.get(v.index()).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Comparison between a constraint's expression and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Eq,
    Le,
    Ge,
}

impl Relation {
    fn lp_symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }
}

/// A named linear constraint `expr (=|<=|>=) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    /// Returns `true` if `values` satisfy the constraint within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.relation {
            Relation::Eq => (lhs - self.rhs).abs() <= tolerance,
            Relation::Le => lhs <= self.rhs + tolerance,
            Relation::Ge => lhs >= self.rhs - tolerance,
        }
    }
}

/// A maximisation problem over boolean variables.
#[derive(Debug, Clone, Default)]
pub struct IntegerProgram {
    variables: Vec<String>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
}

impl IntegerProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a boolean variable and returns its handle.
    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(name.into());
        id
    }

    /// Adds `expr = rhs`.
    pub fn add_eq(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.add_constraint(name, expr, Relation::Eq, rhs);
    }

    /// Adds `expr <= rhs`.
    pub fn add_le(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.add_constraint(name, expr, Relation::Le, rhs);
    }

    /// Adds `expr >= rhs`.
    pub fn add_ge(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.add_constraint(name, expr, Relation::Ge, rhs);
    }

    fn add_constraint(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        relation: Relation,
        rhs: f64,
    ) {
        self.constraints.push(Constraint {
            name: name.into(),
            expr,
            relation,
            rhs,
        });
    }

    /// Replaces the objective (always maximised).
    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Variable names in declaration order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn variable_name(&self, var: VarId) -> &str {
        &self.variables[var.index()]
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Names of constraints violated by `values`.
    pub fn violated_constraints(&self, values: &[f64], tolerance: f64) -> Vec<&str> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(values, tolerance))
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Renders the program in CPLEX LP format.
    pub fn to_lp_string(&self) -> String {
        let mut out = String::new();
        out.push_str("\\ slack assignment model\n");
        out.push_str("Maximize\n obj:");
        self.write_expr(&mut out, &self.objective);
        out.push_str("\nSubject To\n");
        for c in &self.constraints {
            let _ = write!(out, " {}:", c.name);
            self.write_expr(&mut out, &c.expr);
            let _ = writeln!(out, " {} {}", c.relation.lp_symbol(), fmt_num(c.rhs));
        }
        out.push_str("Binary\n");
        for name in &self.variables {
            let _ = writeln!(out, " {name}");
        }
        out.push_str("End\n");
        out
    }

    /// Writes the LP-format rendering to `path`.
    pub fn write_lp(&self, path: &Path) -> Result<(), std::io::Error> {
        std::fs::write(path, self.to_lp_string())
    }

    fn write_expr(&self, out: &mut String, expr: &LinearExpr) {
        if expr.is_empty() {
            out.push_str(" 0");
            return;
        }
        for (i, (var, coeff)) in expr.terms().iter().enumerate() {
            let sign = if *coeff < 0.0 { "-" } else { "+" };
            let magnitude = coeff.abs();
            if i == 0 && sign == "+" {
                out.push(' ');
            } else {
                let _ = write!(out, " {sign} ");
            }
            if magnitude != 1.0 {
                let _ = write!(out, "{} ", fmt_num(magnitude));
            }
            out.push_str(self.variable_name(*var));
        }
    }
}

impl fmt::Display for IntegerProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IntegerProgram: {} binary variables, {} constraints, {} objective terms",
            self.num_variables(),
            self.num_constraints(),
            self.objective.terms().len(),
        )
    }
}

/// Formats a coefficient without a trailing `.0` for integral values.
fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_program() -> (IntegerProgram, VarId, VarId) {
        let mut p = IntegerProgram::new();
        let x = p.add_binary("x");
        let y = p.add_binary("y");
        p.add_eq("pick_one", LinearExpr::sum([x, y]), 1.0);
        p.add_le("gate", LinearExpr::new().with_term(x, 1.0).with_term(y, -1.0), 0.0);
        p.set_objective(LinearExpr::new().with_term(x, 2.5).with_term(y, -3.0));
        (p, x, y)
    }

    #[test]
    fn test_declaration_order() {
        let (p, x, y) = tiny_program();
        assert_eq!(x.index(), 0);
        assert_eq!(y.index(), 1);
        assert_eq!(p.variable_name(y), "y");
        assert_eq!(p.num_constraints(), 2);
    }

    #[test]
    fn test_evaluate() {
        let (p, _, _) = tiny_program();
        assert_eq!(p.objective().evaluate(&[1.0, 0.0]), 2.5);
        assert_eq!(p.objective().evaluate(&[0.0, 1.0]), -3.0);
    }

    #[test]
    fn test_violated_constraints() {
        let (p, _, _) = tiny_program();
        assert!(p.violated_constraints(&[0.0, 1.0], 1e-9).is_empty());
        assert_eq!(p.violated_constraints(&[1.0, 0.0], 1e-9), vec!["gate"]);
        assert_eq!(p.violated_constraints(&[1.0, 1.0], 1e-9), vec!["pick_one"]);
    }

    #[test]
    fn test_lp_format() {
        let (p, _, _) = tiny_program();
        let lp = p.to_lp_string();
        assert!(lp.contains("Maximize\n obj: 2.5 x - 3 y\n"));
        assert!(lp.contains(" pick_one: x + y = 1\n"));
        assert!(lp.contains(" gate: x - y <= 0\n"));
        assert!(lp.contains("Binary\n x\n y\nEnd\n"));
    }

    #[test]
    fn test_lp_empty_objective() {
        let mut p = IntegerProgram::new();
        let z = p.add_binary("z");
        p.add_ge("at_least", LinearExpr::sum([z]), 0.0);
        let lp = p.to_lp_string();
        assert!(lp.contains(" obj: 0\n"));
        assert!(lp.contains(" at_least: z >= 0\n"));
    }

    #[test]
    fn test_lp_leading_negative() {
        let mut p = IntegerProgram::new();
        let a = p.add_binary("a");
        p.set_objective(LinearExpr::new().with_term(a, -1.0));
        assert!(p.to_lp_string().contains(" obj: - a\n"));
    }

    #[test]
    fn test_write_lp() {
        let (p, _, _) = tiny_program();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.lp");
        p.write_lp(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), p.to_lp_string());
    }

    #[test]
    fn test_display() {
        let (p, _, _) = tiny_program();
        assert_eq!(
            p.to_string(),
            "IntegerProgram: 2 binary variables, 2 constraints, 2 objective terms"
        );
    }
}
