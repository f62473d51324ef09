//! Plain-number views of a solution for printing and JSON export.

use std::fmt::Write as _;

use serde::Serialize;
use wf_core::units::{to_kelvin, to_kpa};
use wf_solver::{ChokeState, NetworkSolution, NodeState};
use wf_components::SegmentResult;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChokeReport {
    pub regime: String,
    pub inlet_pressure_kpa: f64,
    pub outlet_pressure_kpa: f64,
    pub pressure_ratio: f64,
    pub critical_ratio: Option<f64>,
    pub cd: f64,
    pub capacity_kg_s: Option<f64>,
}

impl From<&ChokeState> for ChokeReport {
    fn from(c: &ChokeState) -> Self {
        Self {
            regime: c.regime.as_str().to_string(),
            inlet_pressure_kpa: to_kpa(c.inlet_pressure),
            outlet_pressure_kpa: to_kpa(c.outlet_pressure),
            pressure_ratio: c.pressure_ratio,
            critical_ratio: c.critical_ratio,
            cd: c.cd,
            capacity_kg_s: c.capacity.map(|q| q.value),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NodeReport {
    pub name: String,
    pub role: String,
    pub pressure_kpa: f64,
    /// Pressure ahead of the node's equipment.
    pub inlet_pressure_kpa: f64,
    pub temperature_k: f64,
    pub density_kg_m3: f64,
    pub q_actual_m3_s: f64,
    pub mdot_kg_s: f64,
    pub velocity_m_s: f64,
    pub mach: f64,
    pub reynolds: f64,
    pub friction_factor: f64,
    /// `None` when the limit is unbounded (no density).
    pub erosional_velocity_m_s: Option<f64>,
    pub erosional: bool,
    pub mach_exceeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choke: Option<ChokeReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl From<&NodeState> for NodeReport {
    fn from(n: &NodeState) -> Self {
        let limit = n.erosion.limit_velocity.value;
        Self {
            name: n.name.clone(),
            role: n.role.to_string(),
            pressure_kpa: to_kpa(n.pressure),
            inlet_pressure_kpa: to_kpa(n.inlet_pressure),
            temperature_k: to_kelvin(n.temperature),
            density_kg_m3: n.density.value,
            q_actual_m3_s: n.q_actual.value,
            mdot_kg_s: n.mdot.value,
            velocity_m_s: n.velocity.value,
            mach: n.mach,
            reynolds: n.reynolds,
            friction_factor: n.friction_factor,
            erosional_velocity_m_s: limit.is_finite().then_some(limit),
            erosional: n.erosion.is_erosional,
            mach_exceeded: n.erosion.mach_exceeded,
            choke: n.choke.as_ref().map(ChokeReport::from),
            warnings: n.warnings.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SegmentReport {
    pub name: String,
    pub friction_drop_kpa: f64,
    pub fittings_drop_kpa: f64,
    pub hydrostatic_drop_kpa: f64,
    pub total_drop_kpa: f64,
    pub velocity_m_s: f64,
    pub reynolds: f64,
    pub friction_factor: f64,
}

impl From<&SegmentResult> for SegmentReport {
    fn from(s: &SegmentResult) -> Self {
        Self {
            name: s.name.clone(),
            friction_drop_kpa: to_kpa(s.friction_drop),
            fittings_drop_kpa: to_kpa(s.fittings_drop),
            hydrostatic_drop_kpa: to_kpa(s.hydrostatic_drop),
            total_drop_kpa: s.total_drop_kpa(),
            velocity_m_s: s.flow.velocity.value,
            reynolds: s.flow.reynolds,
            friction_factor: s.flow.friction_factor,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SolutionReport {
    pub scenario: String,
    pub converged: bool,
    pub iterations: usize,
    pub max_pressure_change_kpa: f64,
    pub flow_mismatch: f64,
    pub total_drawdown_kpa: f64,
    pub nodes: Vec<NodeReport>,
    pub segments: Vec<SegmentReport>,
    pub warnings: Vec<String>,
}

impl SolutionReport {
    pub fn new(scenario: impl Into<String>, solution: &NetworkSolution) -> Self {
        Self {
            scenario: scenario.into(),
            converged: solution.converged,
            iterations: solution.iterations,
            max_pressure_change_kpa: solution.max_pressure_change_kpa,
            flow_mismatch: solution.flow_mismatch,
            total_drawdown_kpa: solution.total_drawdown_kpa(),
            nodes: solution.nodes.iter().map(NodeReport::from).collect(),
            segments: solution.segments.iter().map(SegmentReport::from).collect(),
            warnings: solution.warnings.clone(),
        }
    }

    /// Fixed-width text table.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let status = if self.converged { "converged" } else { "NOT converged" };
        let _ = writeln!(
            out,
            "{}: {} after {} iterations (dP {:.2e} kPa, flow mismatch {:.2e})",
            self.scenario, status, self.iterations, self.max_pressure_change_kpa, self.flow_mismatch
        );
        let _ = writeln!(
            out,
            "{:<12} {:<13} {:>11} {:>10} {:>9} {:>7} {:>9}  flags",
            "node", "role", "P [kPa]", "rho", "v [m/s]", "Mach", "v_e [m/s]"
        );
        for n in &self.nodes {
            let limit = n
                .erosional_velocity_m_s
                .map(|v| format!("{v:.1}"))
                .unwrap_or_else(|| "-".to_string());
            let mut flags = Vec::new();
            if n.erosional {
                flags.push("EROSIONAL".to_string());
            }
            if n.mach_exceeded {
                flags.push("MACH".to_string());
            }
            if let Some(c) = &n.choke {
                flags.push(format!("choke {} (r={:.3})", c.regime, c.pressure_ratio));
            }
            let _ = writeln!(
                out,
                "{:<12} {:<13} {:>11.2} {:>10.3} {:>9.2} {:>7.3} {:>9}  {}",
                n.name,
                n.role,
                n.pressure_kpa,
                n.density_kg_m3,
                n.velocity_m_s,
                n.mach,
                limit,
                flags.join(", ")
            );
        }
        if !self.segments.is_empty() {
            let _ = writeln!(
                out,
                "{:<12} {:>11} {:>11} {:>11} {:>11}",
                "segment", "friction", "fittings", "static", "total"
            );
            for s in &self.segments {
                let _ = writeln!(
                    out,
                    "{:<12} {:>11.3} {:>11.3} {:>11.3} {:>11.3}",
                    s.name,
                    s.friction_drop_kpa,
                    s.fittings_drop_kpa,
                    s.hydrostatic_drop_kpa,
                    s.total_drop_kpa
                );
            }
        }
        let _ = writeln!(out, "Total drawdown: {:.2} kPa", self.total_drawdown_kpa);
        for w in &self.warnings {
            let _ = writeln!(out, "  warning: {w}");
        }
        out
    }
}
