//! Solve result bundle.

use wf_components::SegmentResult;
use wf_core::NodeId;
use wf_core::units::{Pressure, to_kpa};

use crate::state::NodeState;

/// Outcome of a network solve.
///
/// Returned whether or not the iteration converged; check [`converged`]
/// before trusting the numbers.
///
/// [`converged`]: NetworkSolution::converged
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSolution {
    /// Node states in flow order, source first.
    pub nodes: Vec<NodeState>,
    /// Segment results in flow order.
    pub segments: Vec<SegmentResult>,
    pub converged: bool,
    pub iterations: usize,
    /// Largest pressure change of the final iteration, kPa.
    pub max_pressure_change_kpa: f64,
    /// Largest relative ρ·Q mismatch against the source mass flow.
    pub flow_mismatch: f64,
    /// Largest pressure change per iteration, kPa.
    pub history: Vec<f64>,
    /// Source pressure minus terminal pressure.
    pub total_drawdown: Pressure,
    /// Topology, node and convergence warnings.
    pub warnings: Vec<String>,
}

impl NetworkSolution {
    pub fn node(&self, id: NodeId) -> Option<&NodeState> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&NodeState> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn source(&self) -> Option<&NodeState> {
        self.nodes.first()
    }

    pub fn terminal(&self) -> Option<&NodeState> {
        self.nodes.last()
    }

    /// Node pressures in flow order, kPa.
    pub fn pressures_kpa(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| to_kpa(n.pressure)).collect()
    }

    pub fn total_drawdown_kpa(&self) -> f64 {
        to_kpa(self.total_drawdown)
    }
}
