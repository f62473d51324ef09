//! Integration tests for the chain solver.

use wf_components::ChokeRegime;
use wf_core::units::{k, kg_per_m3, kpa, m, to_kpa};
use wf_fluids::{FluidSpec, StandardRate};
use wf_graph::{ChokeSettings, NetworkBuilder, NodeRole, NodeSpec, SegmentGeometry, SegmentSpec};
use wf_solver::{Scenario, SolveOptions, SolverError, solve, solve_batch, solve_network_with_progress};

fn pipe(len: f64) -> SegmentGeometry {
    SegmentGeometry::pipe(m(len), m(0.1023), m(4.6e-5))
}

fn field_gas(mscfd: f64) -> FluidSpec {
    FluidSpec::gas(kpa(5000.0), k(333.0), 18.2, 1.3, 1.0, StandardRate::mscfd(mscfd))
}

/// WH -> ESD -> FLT -> CK -> SEP
fn production_chain() -> (Vec<NodeSpec>, Vec<SegmentSpec>) {
    let mut b = NetworkBuilder::new();
    let wh = b.add_node("WH", NodeRole::Wellhead);
    let esd = b.add_node("ESD", NodeRole::SafetyValve { k_factor: 0.2 });
    let flt = b.add_node("FLT", NodeRole::Filter { k_factor: 1.5 });
    let ck = b.add_node("CK", NodeRole::Choke(ChokeSettings::fixed(m(0.0127), 0.85)));
    let sep = b.add_node(
        "SEP",
        NodeRole::Separator {
            max_operating_pressure: None,
        },
    );
    b.add_segment("L1", wh, esd, pipe(50.0));
    b.add_segment("L2", esd, flt, pipe(10.0));
    b.add_segment("L3", flt, ck, pipe(10.0));
    b.add_segment("L4", ck, sep, pipe(100.0));
    b.into_specs()
}

fn assert_non_increasing(pressures: &[f64]) {
    for w in pressures.windows(2) {
        assert!(w[1] <= w[0], "pressure rose along the path: {pressures:?}");
    }
}

#[test]
fn five_node_chain_converges() {
    let (nodes, segments) = production_chain();
    let sol = solve(&nodes, &segments, &field_gas(10.0), &SolveOptions::default()).unwrap();

    assert!(sol.converged);
    assert!(sol.iterations <= 50);
    assert_eq!(sol.nodes.len(), 5);
    assert_eq!(sol.segments.len(), 4);
    assert_eq!(sol.source().unwrap().name, "WH");
    assert_eq!(sol.terminal().unwrap().name, "SEP");
    assert_eq!(sol.source().unwrap().pressure_kpa(), 5000.0);
    assert_non_increasing(&sol.pressures_kpa());
    assert!(sol.total_drawdown_kpa() > 0.0);
    assert!(sol.max_pressure_change_kpa < 1e-4);
    assert!(sol.flow_mismatch < 1e-4);
    assert!(sol.warnings.is_empty(), "{:?}", sol.warnings);

    let ck = sol.node_by_name("CK").unwrap();
    let choke = ck.choke.unwrap();
    assert_eq!(choke.regime, ChokeRegime::Subcritical);
    assert!(choke.outlet_pressure <= choke.inlet_pressure);
    assert!((to_kpa(ck.pressure) - to_kpa(choke.outlet_pressure)).abs() < 1e-3);
}

#[test]
fn choke_over_capacity_blocks_convergence() {
    let (nodes, segments) = production_chain();
    let sol = solve(&nodes, &segments, &field_gas(5000.0), &SolveOptions::default()).unwrap();

    // Pressures settle, but the choke cannot pass the demanded flow.
    assert!(!sol.converged);
    assert!(sol.max_pressure_change_kpa < 1e-4);
    assert!(sol.flow_mismatch > 0.3, "mismatch {}", sol.flow_mismatch);
    assert_non_increasing(&sol.pressures_kpa());

    let ck = sol.node_by_name("CK").unwrap().choke.unwrap();
    assert_eq!(ck.regime, ChokeRegime::Critical);
    assert!(sol.warnings.iter().any(|w| w.contains("critical flow")));
    assert!(sol.warnings.last().unwrap().contains("did not converge"));
    // Step drop at the choke dominates the line losses.
    let p = sol.pressures_kpa();
    assert!(p[2] - p[3] > p[0] - p[2]);
}

#[test]
fn line_into_choke_sees_arrival_pressure() {
    let (nodes, segments) = production_chain();
    let sol = solve(&nodes, &segments, &field_gas(2000.0), &SolveOptions::default()).unwrap();
    assert!(sol.converged);

    for (j, seg) in sol.segments.iter().enumerate() {
        let up = &sol.nodes[j];
        let down = &sol.nodes[j + 1];
        let mean = 0.5 * (to_kpa(up.pressure) + to_kpa(down.inlet_pressure));
        assert!(
            (to_kpa(seg.flow.pressure) - mean).abs() < 1e-3,
            "{}: mean {} vs {}",
            seg.name,
            to_kpa(seg.flow.pressure),
            mean
        );
    }

    let ck = sol.node_by_name("CK").unwrap();
    let choke = ck.choke.unwrap();
    assert_eq!(choke.regime, ChokeRegime::Subcritical);
    assert!((to_kpa(ck.inlet_pressure) - to_kpa(choke.inlet_pressure)).abs() < 1e-3);
    // The feed line is evaluated upstream of the restriction.
    let feed = &sol.segments[2];
    assert!(to_kpa(feed.flow.pressure) > to_kpa(choke.outlet_pressure) + 300.0);

    let esd = sol.node_by_name("ESD").unwrap();
    assert!(esd.inlet_pressure > esd.pressure);
}

#[test]
fn solve_is_idempotent() {
    let (nodes, segments) = production_chain();
    let fluid = field_gas(1000.0);
    let options = SolveOptions::default();
    let a = solve(&nodes, &segments, &fluid, &options).unwrap();
    let b = solve(&nodes, &segments, &fluid, &options).unwrap();
    assert_eq!(a, b);
}

#[test]
fn more_iterations_never_hurt() {
    let (nodes, segments) = production_chain();
    let fluid = field_gas(10.0);

    let short = solve(&nodes, &segments, &fluid, &SolveOptions::default().with_max_iterations(3)).unwrap();
    let at_cap = solve(&nodes, &segments, &fluid, &SolveOptions::default()).unwrap();
    let long = solve(&nodes, &segments, &fluid, &SolveOptions::default().with_max_iterations(200)).unwrap();

    assert!(!short.converged);
    assert!(at_cap.max_pressure_change_kpa < short.max_pressure_change_kpa);
    // Once converged, extra budget changes nothing.
    assert_eq!(at_cap, long);
    for w in at_cap.history.windows(2) {
        assert!(w[1] <= w[0], "history not monotone: {:?}", at_cap.history);
    }
}

#[test]
fn non_convergence_is_a_warning() {
    let (nodes, segments) = production_chain();
    let sol = solve(
        &nodes,
        &segments,
        &field_gas(10.0),
        &SolveOptions::default().with_max_iterations(3),
    )
    .unwrap();
    assert!(!sol.converged);
    assert_eq!(sol.iterations, 3);
    assert_eq!(sol.history.len(), 3);
    assert!(sol.warnings.last().unwrap().contains("did not converge"));
}

#[test]
fn full_relaxation_converges_fast() {
    let (nodes, segments) = production_chain();
    let sol = solve(
        &nodes,
        &segments,
        &field_gas(10.0),
        &SolveOptions::default().with_relaxation(1.0),
    )
    .unwrap();
    assert!(sol.converged);
    assert!(sol.iterations < 5);
}

#[test]
fn downhill_liquid_gains_pressure() {
    let mut b = NetworkBuilder::new();
    let wh = b.add_node("WH", NodeRole::Wellhead);
    let sep = b.add_node(
        "SEP",
        NodeRole::Separator {
            max_operating_pressure: Some(kpa(2500.0)),
        },
    );
    b.add_segment("Drop", wh, sep, pipe(200.0).with_elevation_change(m(-100.0)));
    let (nodes, segments) = b.into_specs();
    let fluid = FluidSpec::liquid(kpa(2000.0), k(300.0), kg_per_m3(850.0), StandardRate::stbd(2000.0));

    let sol = solve(&nodes, &segments, &fluid, &SolveOptions::default()).unwrap();
    assert!(sol.converged);
    let p = sol.pressures_kpa();
    assert!(p[1] > p[0] + 800.0, "{p:?}");
    assert!(sol.total_drawdown_kpa() < 0.0);
    assert!(sol.segments[0].hydrostatic_drop.value < 0.0);
    assert!(sol.warnings.iter().any(|w| w.contains("maximum operating pressure")));
}

#[test]
fn topology_problems_surface_as_warnings() {
    let (mut nodes, segments) = production_chain();
    nodes.push(NodeSpec {
        id: wf_core::NodeId::from_index(40),
        name: "ORPHAN".into(),
        role: NodeRole::Generic,
    });
    let sol = solve(&nodes, &segments, &field_gas(10.0), &SolveOptions::default()).unwrap();
    assert!(sol.converged);
    assert_eq!(sol.nodes.len(), 5);
    assert!(sol.warnings.iter().any(|w| w.starts_with("topology:")));
}

#[test]
fn dangling_segment_is_an_error() {
    let (nodes, mut segments) = production_chain();
    segments[3].to = wf_core::NodeId::from_index(99);
    let err = solve(&nodes, &segments, &field_gas(10.0), &SolveOptions::default()).unwrap_err();
    assert!(matches!(err, SolverError::Graph(_)));
}

#[test]
fn invalid_options_rejected() {
    let (nodes, segments) = production_chain();
    let err = solve(
        &nodes,
        &segments,
        &field_gas(10.0),
        &SolveOptions::default().with_relaxation(0.0),
    )
    .unwrap_err();
    assert!(matches!(err, SolverError::InvalidOption { .. }));
}

#[test]
fn progress_reports_every_iteration() {
    let (nodes, segments) = production_chain();
    let network = wf_graph::Network::from_specs(nodes, segments).unwrap();
    let mut events = Vec::new();
    let sol = solve_network_with_progress(&network, &field_gas(10.0), &SolveOptions::default(), |e| {
        events.push(e)
    })
    .unwrap();
    assert_eq!(events.len(), sol.iterations);
    assert_eq!(events.last().unwrap().max_pressure_change_kpa, sol.max_pressure_change_kpa);
}

#[test]
fn batch_matches_serial() {
    let (nodes, segments) = production_chain();
    let scenarios: Vec<Scenario> = [10.0, 1000.0, 5000.0]
        .iter()
        .map(|&q| Scenario {
            name: format!("{q} MSCF/d"),
            nodes: nodes.clone(),
            segments: segments.clone(),
            fluid: field_gas(q),
        })
        .collect();
    let options = SolveOptions::default();
    let results = solve_batch(&scenarios, &options);
    assert_eq!(results.len(), 3);
    for (scenario, result) in scenarios.iter().zip(&results) {
        let serial = scenario.solve(&options).unwrap();
        assert_eq!(result.as_ref().unwrap(), &serial);
    }
    let drawdown: Vec<f64> = results
        .iter()
        .map(|r| to_kpa(r.as_ref().unwrap().total_drawdown))
        .collect();
    assert!(drawdown[0] < drawdown[1] && drawdown[1] < drawdown[2]);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn flowline_pressure_never_rises(mscfd in 1.0_f64..2000.0, length in 10.0_f64..2000.0) {
            let mut b = NetworkBuilder::new();
            let wh = b.add_node("WH", NodeRole::Wellhead);
            let sep = b.add_node("SEP", NodeRole::Generic);
            b.add_segment("L1", wh, sep, pipe(length));
            let (nodes, segments) = b.into_specs();

            let sol = solve(&nodes, &segments, &field_gas(mscfd), &SolveOptions::default()).unwrap();
            prop_assert!(sol.converged);
            let p = sol.pressures_kpa();
            prop_assert!(p[1] <= p[0]);
            prop_assert!(sol.flow_mismatch < 1e-9);
        }
    }
}
