//! Fixed-point solve of a production chain.
//!
//! Each pass walks the chain from the source: segment drop between the
//! upstream node's outlet and the downstream node's arrival pressure, then
//! the downstream node's equipment drop, then an under-relaxed update of both
//! downstream pressures. The solve stops when the largest pressure change and
//! the largest mass-flow mismatch are both below the tolerance, or when the
//! iteration cap is hit.

use nalgebra::DVector;
use tracing::{debug, info, warn};
use wf_components::{EquipmentOutcome, InletConditions, LocalFlow};
use wf_core::units::{kpa, pa, to_kpa};
use wf_fluids::{FluidSpec, PropertyPack, mass_flow};
use wf_graph::{Network, NodeSpec, SegmentSpec};

use crate::error::SolverResult;
use crate::options::SolveOptions;
use crate::problem::ChainProblem;
use crate::solution::NetworkSolution;
use crate::state::{ChokeState, NodeState};

/// Progress snapshot emitted after every iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveProgressEvent {
    pub iteration: usize,
    pub max_pressure_change_kpa: f64,
    pub flow_mismatch: f64,
}

/// Solve a chain given as raw node and segment specs.
///
/// Specs are validated (references, geometry, roles) before iterating.
pub fn solve(
    nodes: &[NodeSpec],
    segments: &[SegmentSpec],
    fluid: &FluidSpec,
    options: &SolveOptions,
) -> SolverResult<NetworkSolution> {
    let network = Network::from_specs(nodes.to_vec(), segments.to_vec())?;
    solve_network(&network, fluid, options)
}

/// Solve an already validated network.
pub fn solve_network(
    network: &Network,
    fluid: &FluidSpec,
    options: &SolveOptions,
) -> SolverResult<NetworkSolution> {
    solve_network_with_progress(network, fluid, options, |_| {})
}

/// Solve with a callback invoked after each iteration.
pub fn solve_network_with_progress<F>(
    network: &Network,
    fluid: &FluidSpec,
    options: &SolveOptions,
    mut on_progress: F,
) -> SolverResult<NetworkSolution>
where
    F: FnMut(SolveProgressEvent),
{
    options.validate()?;
    let problem = ChainProblem::new(network, fluid)?;
    for w in &problem.topology_warnings {
        warn!("{w}");
    }

    let hyd = &options.hydraulics;
    let n = problem.node_count();
    let t = fluid.inlet_temperature;
    let p_in = fluid.inlet_pressure.value;
    let p_min = options.min_pressure.value;
    let relax = options.relaxation;
    let mdot_ref = mass_flow(fluid).value;

    // Initializing
    let mut p = DVector::from_element(n, options.initial_guess_fraction * p_in);
    p[0] = p_in;
    // Pressure arriving at each node, before its equipment.
    let mut p_arrival = p.clone();
    let mut states: Vec<NodeState> = problem
        .nodes
        .iter()
        .enumerate()
        .map(|(i, spec)| NodeState::new(spec, pa(p[i]), t, hyd))
        .collect();
    let mut segment_results = Vec::with_capacity(problem.segments.len());

    let mut history = Vec::with_capacity(options.max_iterations);
    let mut converged = false;
    let mut max_dp_kpa = f64::INFINITY;
    let mut mismatch = f64::INFINITY;
    let mut iterations = 0;

    // Iterating
    while iterations < options.max_iterations {
        iterations += 1;
        for state in &mut states {
            state.warnings.clear();
            state.choke = None;
        }
        segment_results.clear();

        let mut max_dp = 0.0_f64;
        for (j, segment) in problem.segments.iter().enumerate() {
            let (up, down) = (j, j + 1);
            let result = segment.evaluate(fluid, pa(p[up]), pa(p_arrival[down]), t, hyd)?;
            let name = states[down].name.clone();

            let mut arrival = p[up] - result.total_drop.value;
            if arrival < p_min {
                states[down].warnings.push(format!(
                    "{name}: pressure after {} fell below {:.3} kPa and was clamped",
                    segment.name(),
                    to_kpa(options.min_pressure)
                ));
                arrival = p_min;
            }

            let at_inlet = LocalFlow::evaluate(pa(arrival), t, fluid, &segment.geometry, hyd);
            let inlet = InletConditions {
                pressure: pa(arrival),
                temperature: t,
                density: at_inlet.density,
                velocity: at_inlet.velocity,
                mdot: at_inlet.mdot,
            };
            let outcome = match problem.equipment[down].outlet_pressure(&inlet, fluid) {
                Ok(outcome) => outcome,
                Err(e) => {
                    states[down].warnings.push(format!("{name}: {e}"));
                    EquipmentOutcome::unchanged(&inlet)
                }
            };

            let mut computed = outcome.outlet_pressure.value;
            if computed < p_min {
                states[down].warnings.push(format!(
                    "{name}: outlet pressure clamped to {:.3} kPa",
                    to_kpa(options.min_pressure)
                ));
                computed = p_min;
            }

            let new_p = relax * computed + (1.0 - relax) * p[down];
            let new_arrival = relax * arrival + (1.0 - relax) * p_arrival[down];
            max_dp = max_dp
                .max((new_p - p[down]).abs())
                .max((new_arrival - p_arrival[down]).abs());
            p[down] = new_p;
            p_arrival[down] = new_arrival;

            let flow = LocalFlow::evaluate(pa(new_p), t, fluid, &segment.geometry, hyd);
            let state = &mut states[down];
            state.update(&flow);
            state.inlet_pressure = pa(new_arrival);
            state.choke = outcome.choke.as_ref().map(ChokeState::from);
            state.warnings.extend(outcome.warnings);
            segment_results.push(result);
        }

        // Source node: outgoing segment geometry when there is one.
        match problem.segments.first() {
            Some(segment) => {
                let flow = LocalFlow::evaluate(pa(p[0]), t, fluid, &segment.geometry, hyd);
                states[0].update(&flow);
            }
            None => {
                let pack = PropertyPack::evaluate(pa(p[0]), t, fluid, &hyd.viscosity);
                states[0].update_static(&pack, hyd);
            }
        }
        let source_outcome = problem.equipment[0].outlet_pressure(
            &InletConditions {
                pressure: states[0].pressure,
                temperature: t,
                density: states[0].density,
                velocity: states[0].velocity,
                mdot: states[0].mdot,
            },
            fluid,
        );
        if let Ok(outcome) = source_outcome {
            states[0].warnings.extend(outcome.warnings);
        }

        let mismatches = DVector::from_iterator(
            n,
            states.iter().map(|s| s.mass_flow_mismatch(mdot_ref)),
        );
        mismatch = mismatches.amax();
        max_dp_kpa = max_dp / 1000.0;
        history.push(max_dp_kpa);

        debug!(iteration = iterations, max_dp_kpa, mismatch, "chain pass");
        on_progress(SolveProgressEvent {
            iteration: iterations,
            max_pressure_change_kpa: max_dp_kpa,
            flow_mismatch: mismatch,
        });

        if max_dp_kpa < options.tolerance && mismatch < options.tolerance {
            converged = true;
            break;
        }
    }

    let mut warnings = problem.topology_warnings.clone();
    for state in &states {
        warnings.extend(state.warnings.iter().cloned());
    }

    if converged {
        info!(iterations, max_dp_kpa, "chain solve converged");
    } else {
        let msg = format!(
            "solver did not converge in {} iterations (max pressure change {:.3e} kPa, flow mismatch {:.3e})",
            iterations, max_dp_kpa, mismatch
        );
        warn!("{msg}");
        warnings.push(msg);
    }

    let total_drawdown = match (states.first(), states.last()) {
        (Some(first), Some(last)) => first.pressure - last.pressure,
        _ => kpa(0.0),
    };

    Ok(NetworkSolution {
        nodes: states,
        segments: segment_results,
        converged,
        iterations,
        max_pressure_change_kpa: max_dp_kpa,
        flow_mismatch: mismatch,
        history,
        total_drawdown,
        warnings,
    })
}
