// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: performance model → formulation → solver → decision.
//!
//! Solver results are cross-checked against the exhaustive search, which
//! is exact for this model.

use perf_model::{
    OutOfRangePolicy, PerformanceModel, Query, Strategy as ScanStrategy, Workload, WorkloadGenerator,
};
use proptest::prelude::*;
use slack_planner::{
    AssignmentModelBuilder, ExhaustiveSearch, Formulation, IntegerSolver, MicroLpSolver,
    PlannerError, ScheduleDecision, SlackPlanner, SolutionInterpreter,
};

// ── Helpers ────────────────────────────────────────────────────

fn scenario_model() -> PerformanceModel {
    "100 50\n0 80\n0 60\n".parse().unwrap()
}

/// A calibrated model where sequential throughput degrades and index
/// throughput improves as concurrency rises.
fn calibrated_model(levels: usize) -> PerformanceModel {
    let seq = (0..levels).map(|n| 4000.0 / (n as f64 + 1.0)).collect();
    let solo = (0..levels).map(|n| if n == 0 { 0.0 } else { 900.0 + 50.0 * n as f64 }).collect();
    let shared = (0..levels).map(|n| if n == 0 { 0.0 } else { 600.0 + 40.0 * n as f64 }).collect();
    PerformanceModel::from_samples(seq, solo, shared).unwrap()
}

fn assert_close(a: f64, b: f64) {
    let tol = 1e-6 * a.abs().max(b.abs()).max(1.0);
    assert!((a - b).abs() <= tol, "{a} != {b}");
}

/// Checks the structural properties every decoded solution must have.
fn assert_well_formed(d: &ScheduleDecision, workload: &Workload, formulation: Formulation) {
    let q = workload.len();
    assert!(d.active_level <= q);
    assert_eq!(d.num_queries(), q);
    for (i, a) in d.assignments.iter().enumerate() {
        assert_eq!(a.query_index, i);
        if formulation == Formulation::Full {
            assert!(!(a.strategy == ScanStrategy::Sequential && d.active_level == q));
            assert!(!(a.strategy.is_index() && d.active_level == 0));
        }
    }
}

/// Recomputes Σ deadline − time(chosen) from the performance model.
fn recomputed_slack(d: &ScheduleDecision, workload: &Workload, pm: &PerformanceModel) -> f64 {
    d.assignments
        .iter()
        .map(|a| {
            let q = workload.get(a.query_index).unwrap();
            q.deadline() as f64 - pm.time_to_complete(a.strategy, q, d.active_level).unwrap()
        })
        .sum()
}

// ── Concrete Scenarios ─────────────────────────────────────────

#[test]
fn test_single_query_scenario() {
    let pm = scenario_model();
    let w = Workload::new(vec![Query::new(1000, 30)]);

    let d = SlackPlanner::default().plan(&w, &pm).unwrap();
    assert_eq!(d.active_level, 0);
    assert_eq!(d.strategies(), vec![ScanStrategy::Sequential]);
    assert_close(d.objective, 20.0);
    assert_close(d.total_slack(), 20.0);
    assert_eq!(d.solver, "microlp");
}

#[test]
fn test_single_query_scenario_simplified() {
    // Without exclusions seq at level 1 becomes legal, but it is worse.
    let pm = scenario_model();
    let w = Workload::new(vec![Query::new(1000, 30)]);
    let d = SlackPlanner::default()
        .formulation(Formulation::Simplified)
        .plan(&w, &pm)
        .unwrap();
    assert_eq!(d.active_level, 0);
    assert_eq!(d.strategy_of(0), Some(ScanStrategy::Sequential));
    assert_close(d.objective, 20.0);
    assert!(!d.has_infeasible_assignment());
}

#[test]
fn test_deadline_shift_keeps_decision() {
    let pm = scenario_model();
    let base = Workload::new(vec![Query::new(1000, 30)]);
    let shifted = Workload::new(vec![Query::new(1000, 130)]);

    let a = SlackPlanner::default().plan(&base, &pm).unwrap();
    let b = SlackPlanner::default().plan(&shifted, &pm).unwrap();
    assert_close(b.objective - a.objective, 100.0);
    assert_eq!(a.active_level, b.active_level);
    assert_eq!(a.strategies(), b.strategies());
}

#[test]
fn test_empty_workload_solves() {
    let d = SlackPlanner::default()
        .plan(&Workload::default(), &scenario_model())
        .unwrap();
    assert_eq!(d.active_level, 0);
    assert_eq!(d.num_queries(), 0);
    assert_close(d.objective, 0.0);
}

#[test]
fn test_strict_model_rejects_oversized_workload() {
    let pm = scenario_model();
    let w = WorkloadGenerator::seeded(3).generate(3);
    let err = SlackPlanner::default().plan(&w, &pm).unwrap_err();
    assert!(matches!(err, PlannerError::PerfModel(_)));
}

#[test]
fn test_clamped_model_solves_oversized_workload() {
    let pm = calibrated_model(3).with_policy(OutOfRangePolicy::Clamp);
    let w = WorkloadGenerator::seeded(11).generate(6);
    let d = SlackPlanner::default().plan(&w, &pm).unwrap();
    let e = ExhaustiveSearch::new().search(&w, &pm).unwrap();
    assert_well_formed(&d, &w, Formulation::Full);
    assert_close(d.objective, e.objective);
}

#[test]
fn test_generated_workloads_match_exhaustive() {
    let pm = calibrated_model(9);
    let mut generator = WorkloadGenerator::seeded(2025);
    for size in 1..=8 {
        let w = generator.generate(size);
        let d = SlackPlanner::default().plan(&w, &pm).unwrap();
        let e = ExhaustiveSearch::new().search(&w, &pm).unwrap();
        assert_well_formed(&d, &w, Formulation::Full);
        assert_close(d.objective, e.objective);
        assert_close(d.objective, recomputed_slack(&d, &w, &pm));
    }
}

#[test]
fn test_solver_output_satisfies_every_constraint() {
    let pm = calibrated_model(6);
    let w = WorkloadGenerator::seeded(8).generate(5);
    let model = AssignmentModelBuilder::new(&w, &pm).build().unwrap();
    let raw = MicroLpSolver.solve(model.program()).unwrap();

    assert!(model.program().violated_constraints(&raw.values, 1e-6).is_empty());
    let d = SolutionInterpreter::new(&model).interpret(&raw).unwrap();
    assert_well_formed(&d, &w, Formulation::Full);
}

#[test]
fn test_lp_export_names_every_variable_and_constraint() {
    let pm = calibrated_model(5);
    let w = WorkloadGenerator::seeded(4).generate(3);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.lp");

    SlackPlanner::default().export_lp(&path).plan(&w, &pm).unwrap();
    let lp = std::fs::read_to_string(&path).unwrap();

    let model = AssignmentModelBuilder::new(&w, &pm).build().unwrap();
    for name in model.program().variables() {
        assert!(lp.contains(name.as_str()), "missing variable {name}");
    }
    for c in model.program().constraints() {
        assert!(lp.contains(&format!(" {}:", c.name)), "missing constraint {}", c.name);
    }
    assert!(lp.starts_with("\\ slack assignment model\nMaximize\n"));
    assert!(lp.trim_end().ends_with("End"));
}

// ── Properties ─────────────────────────────────────────────────

fn throughput() -> impl Strategy<Value = f64> {
    prop_oneof![1 => Just(0.0), 4 => 1.0f64..500.0]
}

fn arb_model() -> impl Strategy<Value = PerformanceModel> {
    (2usize..=5).prop_flat_map(|levels| {
        (
            proptest::collection::vec(throughput(), levels),
            proptest::collection::vec(throughput(), levels),
            proptest::collection::vec(throughput(), levels),
        )
            .prop_map(|(s, i, is)| {
                PerformanceModel::from_samples(s, i, is)
                    .unwrap()
                    .with_policy(OutOfRangePolicy::Clamp)
            })
    })
}

fn arb_workload() -> impl Strategy<Value = Workload> {
    proptest::collection::vec((1u64..5_000, 1u64..300), 0..=4)
        .prop_map(|qs| qs.into_iter().map(|(b, d)| Query::new(b, d)).collect())
}

fn arb_formulation() -> impl Strategy<Value = Formulation> {
    prop_oneof![Just(Formulation::Full), Just(Formulation::Simplified)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_variable_counts(w in arb_workload(), pm in arb_model()) {
        let q = w.len();
        let model = AssignmentModelBuilder::new(&w, &pm).build().unwrap();
        prop_assert_eq!(model.cube().num_strategy_variables(), 3 * q * (q + 1));
        prop_assert_eq!(model.cube().num_level_variables(), q + 1);
    }

    #[test]
    fn prop_solver_matches_exhaustive(w in arb_workload(), pm in arb_model(), f in arb_formulation()) {
        let d = SlackPlanner::default().formulation(f).plan(&w, &pm).unwrap();
        let e = ExhaustiveSearch::new().formulation(f).search(&w, &pm).unwrap();
        assert_well_formed(&d, &w, f);
        assert_close(d.objective, e.objective);
        assert_close(d.objective, d.total_slack());
    }

    #[test]
    fn prop_objective_is_sum_of_slack(w in arb_workload(), pm in arb_model()) {
        let d = SlackPlanner::default().plan(&w, &pm).unwrap();
        prop_assume!(!d.has_infeasible_assignment());
        assert_close(d.objective, recomputed_slack(&d, &w, &pm));
    }

    #[test]
    fn prop_deadline_shift_is_linear(w in arb_workload(), pm in arb_model(), pick in any::<prop::sample::Index>(), shift in 1u64..1_000) {
        prop_assume!(!w.is_empty());
        let k = pick.index(w.len());
        let shifted: Workload = w
            .iter()
            .enumerate()
            .map(|(i, q)| if i == k { Query::new(q.blocks(), q.deadline() + shift) } else { *q })
            .collect();

        let a = ExhaustiveSearch::new().search(&w, &pm).unwrap();
        let b = ExhaustiveSearch::new().search(&shifted, &pm).unwrap();
        assert_close(b.objective - a.objective, shift as f64);
        prop_assert_eq!(a.active_level, b.active_level);
        prop_assert_eq!(a.strategies(), b.strategies());

        let s = SlackPlanner::default().plan(&shifted, &pm).unwrap();
        assert_close(s.objective, b.objective);
    }
}
