//! Regime orchestration tests
//!
//! These tests verify:
//! - Identical seeds give identical datasets, independent of thread scheduling
//! - Records are tagged with their regime and stacked in regime order
//! - Panel sampling shares agents across regimes, independent sampling does not
//! - The participation stage can be switched off
//! - Numerical failures abort or are flagged depending on the failure policy

use crate::config::{FailurePolicy, SimulationBuilder, SimulationConfig};
use crate::error::{NumericalError, SimulationError};
use crate::model::{Agent, AgentId, Regime, RegimeId, Resolution};
use crate::simulation::{seed_plan, simulate, simulate_regime, simulate_regimes, solve_agent};
use crate::solver::NewtonHoursSolver;

fn two_regimes() -> SimulationBuilder {
    SimulationBuilder::new()
        .population_size(400)
        .seed(11)
        .regime("baseline", 0.5, 0.5)
        .taxed_regime("reform", 0.5, 0.5, 0.8, 0.05)
}

/// An ordinary agent and one whose wage is large enough to overflow the
/// FOC derivative.
fn agents_with_overflow() -> Vec<Agent> {
    vec![
        Agent {
            id: AgentId(0),
            x: 0.0,
            log_wage: 0.0,
            mu: 1.0,
            beta: None,
        },
        Agent {
            id: AgentId(1),
            x: 0.0,
            log_wage: 700.0,
            mu: 1.0,
            beta: None,
        },
    ]
}

#[test]
fn test_same_seed_same_dataset() {
    let config = two_regimes().heterogeneous().build().unwrap();

    let a = simulate(&config).unwrap();
    let b = simulate(&config).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );

    let c = simulate(&config.with_seed(12)).unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_records_match_sequential_solve() {
    let config = two_regimes().build().unwrap();
    let dataset = simulate(&config).unwrap();
    let solver = NewtonHoursSolver::new(config.solver);

    for cs in &dataset.cross_sections {
        for (i, record) in cs.records.iter().enumerate() {
            assert_eq!(record.agent.id, AgentId(i as u32));
            let (outcome, report) = solve_agent(
                &record.agent,
                &cs.regime,
                &config.preferences,
                config.stages,
                &solver,
            )
            .unwrap();
            assert_eq!(
                record.resolution,
                Resolution::Resolved { outcome, report }
            );
        }
    }
}

#[test]
fn test_rows_tagged_and_stacked() {
    let config = two_regimes().build().unwrap();
    let dataset = simulate(&config).unwrap();

    assert_eq!(dataset.cross_sections.len(), 2);
    assert_eq!(dataset.num_rows(), 800);
    assert_eq!(dataset.num_unresolved(), 0);
    assert!(!dataset.heterogeneous);

    let rows: Vec<_> = dataset.rows().collect();
    assert_eq!(rows.len(), 800);
    assert!(rows[..400].iter().all(|r| r.regime_id == 0 && r.regime_label == "baseline"));
    assert!(rows[400..].iter().all(|r| r.regime_id == 1 && r.regime_label == "reform"));
    assert!(rows[400..].iter().all(|r| r.rho == 0.8 && r.r == 0.05));
    assert!(rows.iter().all(|r| r.beta_i.is_none()));
    assert_eq!(rows[400].agent_id, 0);
    assert_eq!(dataset.cross_sections[1].regime_id, RegimeId(1));
}

#[test]
fn test_non_participants_consume_income() {
    let config = two_regimes().fixed_cost(0.4).build().unwrap();
    let dataset = simulate(&config).unwrap();

    let mut non_participants = 0;
    for cs in &dataset.cross_sections {
        for record in &cs.records {
            let outcome = record.outcome().unwrap();
            assert!(outcome.h_interior > 0.0);
            assert_eq!(outcome.p1, outcome.u1 > outcome.u0);
            if outcome.p1 {
                assert_eq!(outcome.h, outcome.h_interior);
            } else {
                non_participants += 1;
                assert_eq!(outcome.h, 0.0);
                assert_eq!(outcome.c, record.agent.mu);
            }
        }
    }
    assert!(non_participants > 0);
}

#[test]
fn test_diagnostics_count_agents() {
    let config = two_regimes().build().unwrap();
    let dataset = simulate(&config).unwrap();

    for cs in &dataset.cross_sections {
        let d = &cs.diagnostics;
        assert_eq!(d.agents, 400);
        assert_eq!(d.unresolved, 0);
        assert_eq!(d.participants, cs.participants().count());
        assert_eq!(d.total_iterations, 400 * 30);
        assert!(d.max_residual < 1e-8);
        assert!(!d.has_convergence_warning());

        let summary = cs.summary();
        assert_eq!(summary.agents, 400);
        assert_eq!(summary.participants, d.participants);
        assert!(summary.participation_rate > 0.0 && summary.participation_rate <= 1.0);
    }
}

#[test]
fn test_panel_shares_agents_across_regimes() {
    let config = SimulationBuilder::new()
        .population_size(200)
        .seed(5)
        .regime("low", 0.3, 0.5)
        .regime("high", 0.9, 0.5)
        .panel()
        .build()
        .unwrap();
    let dataset = simulate(&config).unwrap();
    let (low, high) = (&dataset.cross_sections[0], &dataset.cross_sections[1]);

    for (a, b) in low.records.iter().zip(&high.records) {
        assert_eq!(a.agent.x, b.agent.x);
        assert_eq!(a.agent.mu, b.agent.mu);
        // Same wage shock, different loading on x
        let shock_a = a.agent.log_wage - 0.3 * a.agent.x;
        let shock_b = b.agent.log_wage - 0.9 * b.agent.x;
        assert!((shock_a - shock_b).abs() < 1e-12);
    }
}

#[test]
fn test_independent_regimes_draw_fresh_agents() {
    let config = SimulationBuilder::new()
        .population_size(200)
        .seed(5)
        .regime("a", 0.5, 0.5)
        .regime("b", 0.5, 0.5)
        .build()
        .unwrap();
    let dataset = simulate(&config).unwrap();

    let xs_a: Vec<f64> = dataset.cross_sections[0].records.iter().map(|r| r.agent.x).collect();
    let xs_b: Vec<f64> = dataset.cross_sections[1].records.iter().map(|r| r.agent.x).collect();
    assert_ne!(xs_a, xs_b);
}

#[test]
fn test_seed_plan_is_deterministic() {
    let plan = seed_plan(42, 3);
    assert_eq!(plan, seed_plan(42, 3));
    assert_eq!(plan.regimes.len(), 3);
    assert_ne!(plan.regimes[0], plan.regimes[1]);
    assert_ne!(plan.panel, plan.regimes[0]);

    // Adding a regime leaves earlier seeds alone
    assert_eq!(seed_plan(42, 4).regimes[..3], plan.regimes[..]);
}

#[test]
fn test_participation_stage_off() {
    let config = two_regimes()
        .fixed_cost(5.0)
        .without_participation()
        .build()
        .unwrap();
    let dataset = simulate(&config).unwrap();

    for record in dataset.cross_sections.iter().flat_map(|cs| &cs.records) {
        let outcome = record.outcome().unwrap();
        assert!(outcome.p1);
        assert_eq!(outcome.h, outcome.h_interior);
    }
}

#[test]
fn test_abort_policy_reports_agent() {
    let config = SimulationConfig::default();
    let regime = Regime::default();
    let solver = NewtonHoursSolver::default();

    let err = simulate_regime(&config, &solver, RegimeId(3), &regime, agents_with_overflow())
        .unwrap_err();
    match err {
        SimulationError::Numerical {
            regime,
            agent,
            source,
        } => {
            assert_eq!(regime, RegimeId(3));
            assert_eq!(agent, AgentId(1));
            assert!(matches!(source, NumericalError::DerivativeVanished { .. }));
        }
        other => panic!("expected numerical error, got {other:?}"),
    }
}

#[test]
fn test_flag_policy_keeps_going() {
    let config = SimulationConfig {
        failure_policy: FailurePolicy::Flag,
        ..Default::default()
    };
    let regime = Regime::default();
    let solver = NewtonHoursSolver::default();

    let cs = simulate_regime(&config, &solver, RegimeId(0), &regime, agents_with_overflow())
        .unwrap();

    assert_eq!(cs.records.len(), 2);
    assert!(cs.records[0].outcome().is_some());
    assert!(matches!(
        cs.records[1].resolution,
        Resolution::Unresolved { .. }
    ));
    assert_eq!(cs.diagnostics.agents, 2);
    assert_eq!(cs.diagnostics.unresolved, 1);
    assert_eq!(cs.summary().agents, 2);
}

#[test]
fn test_invalid_config_rejected_before_simulation() {
    let mut config = two_regimes().build().unwrap();
    config.preferences.eta = 0.5;

    let err = simulate(&config).unwrap_err();
    assert!(matches!(err, SimulationError::Config(_)));
}

#[test]
fn test_simulate_regimes_shorthand() {
    let regimes = [Regime::new("only", 0.5, 0.5)];
    let config = SimulationConfig::default();
    let dataset = simulate_regimes(&regimes, 50, &config.preferences, 9).unwrap();

    assert_eq!(dataset.num_rows(), 50);
    assert_eq!(dataset.cross_sections[0].regime.label, "only");
}
