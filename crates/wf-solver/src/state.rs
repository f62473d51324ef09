//! Per-node solver state.

use wf_components::{ChokeOperatingPoint, ChokeRegime, ErosionalCheck, HydraulicsConfig, LocalFlow};
use wf_core::NodeId;
use wf_core::units::{
    Density, MassRate, Pressure, Temperature, Velocity, VolumeRate, mps, to_kpa,
};
use wf_fluids::PropertyPack;
use wf_graph::NodeSpec;

/// Choke operating point recorded on its node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChokeState {
    pub inlet_pressure: Pressure,
    pub outlet_pressure: Pressure,
    pub regime: ChokeRegime,
    pub pressure_ratio: f64,
    pub critical_ratio: Option<f64>,
    pub cd: f64,
    pub capacity: Option<MassRate>,
}

impl From<&ChokeOperatingPoint> for ChokeState {
    fn from(op: &ChokeOperatingPoint) -> Self {
        Self {
            inlet_pressure: op.inlet_pressure,
            outlet_pressure: op.outlet_pressure,
            regime: op.regime,
            pressure_ratio: op.pressure_ratio,
            critical_ratio: op.critical_ratio,
            cd: op.cd,
            capacity: op.capacity,
        }
    }
}

/// Solved conditions at one node.
///
/// Velocity-dependent fields use the node's incoming segment (the outgoing
/// one for the source).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    pub id: NodeId,
    pub name: String,
    pub role: &'static str,
    /// Pressure downstream of the node's equipment.
    pub pressure: Pressure,
    /// Pressure arriving from the incoming segment, ahead of the equipment.
    pub inlet_pressure: Pressure,
    pub temperature: Temperature,
    pub density: Density,
    pub q_actual: VolumeRate,
    pub mdot: MassRate,
    pub velocity: Velocity,
    pub mach: f64,
    pub reynolds: f64,
    pub friction_factor: f64,
    pub erosion: ErosionalCheck,
    pub choke: Option<ChokeState>,
    pub warnings: Vec<String>,
}

impl NodeState {
    pub fn new(spec: &NodeSpec, pressure: Pressure, temperature: Temperature, config: &HydraulicsConfig) -> Self {
        Self {
            id: spec.id,
            name: spec.name.clone(),
            role: spec.role.tag(),
            pressure,
            inlet_pressure: pressure,
            temperature,
            density: Density::default(),
            q_actual: VolumeRate::default(),
            mdot: MassRate::default(),
            velocity: mps(0.0),
            mach: 0.0,
            reynolds: 0.0,
            friction_factor: 0.0,
            erosion: ErosionalCheck::quiescent(0.0, config),
            choke: None,
            warnings: Vec::new(),
        }
    }

    /// Take every flow field from `flow`, evaluated at this node's pressure.
    pub fn update(&mut self, flow: &LocalFlow) {
        self.pressure = flow.pressure;
        self.temperature = flow.temperature;
        self.density = flow.density;
        self.q_actual = flow.q_actual;
        self.mdot = flow.mdot;
        self.velocity = flow.velocity;
        self.mach = flow.mach;
        self.reynolds = flow.reynolds;
        self.friction_factor = flow.friction_factor;
        self.erosion = flow.erosion;
        self.warnings.extend(flow.warnings(&self.name));
    }

    /// Properties only, for a node with no attached segment.
    pub fn update_static(&mut self, pack: &PropertyPack, config: &HydraulicsConfig) {
        self.pressure = pack.p;
        self.inlet_pressure = pack.p;
        self.temperature = pack.t;
        self.density = pack.rho;
        self.q_actual = pack.q_actual;
        self.mdot = pack.mdot;
        self.velocity = mps(0.0);
        self.mach = 0.0;
        self.reynolds = 0.0;
        self.friction_factor = 0.0;
        self.erosion = ErosionalCheck::quiescent(pack.rho.value, config);
    }

    /// Relative mass-flow mismatch against a reference flow.
    ///
    /// The larger of the ρ·Q balance and, at a gas choke, the share of the
    /// reference flow beyond the choke's critical capacity.
    pub fn mass_flow_mismatch(&self, reference: f64) -> f64 {
        if reference <= 0.0 {
            return 0.0;
        }
        let balance = (self.density.value * self.q_actual.value - reference).abs() / reference;
        let shortfall = self
            .choke
            .and_then(|c| c.capacity)
            .filter(|cap| cap.value > 0.0)
            .map(|cap| (reference / cap.value - 1.0).max(0.0))
            .unwrap_or(0.0);
        balance.max(shortfall)
    }

    pub fn pressure_kpa(&self) -> f64 {
        to_kpa(self.pressure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::units::{k, kg_per_m3, kgps, kpa, m, m3ps};
    use wf_fluids::{FluidSpec, StandardRate, ViscosityDefaults};
    use wf_graph::{NodeRole, SegmentGeometry};

    fn spec() -> NodeSpec {
        NodeSpec {
            id: NodeId::from_index(3),
            name: "SEP".into(),
            role: NodeRole::Separator {
                max_operating_pressure: None,
            },
        }
    }

    #[test]
    fn update_copies_flow_and_keeps_mass() {
        let config = HydraulicsConfig::default();
        let fluid = FluidSpec::gas(kpa(5000.0), k(333.0), 18.2, 1.3, 1.0, StandardRate::mscfd(500.0));
        let geometry = SegmentGeometry::pipe(m(10.0), m(0.1023), m(4.6e-5));
        let flow = LocalFlow::evaluate(kpa(4000.0), k(333.0), &fluid, &geometry, &config);

        let mut state = NodeState::new(&spec(), kpa(4500.0), k(333.0), &config);
        assert_eq!(state.role, "separator");
        state.update(&flow);
        assert_eq!(state.pressure_kpa(), 4000.0);
        assert_eq!(state.velocity, flow.velocity);
        assert!(state.mass_flow_mismatch(flow.mdot.value) < 1e-12);
        assert!(state.warnings.is_empty());
    }

    #[test]
    fn choke_over_capacity_counts_as_mismatch() {
        let config = HydraulicsConfig::default();
        let mut state = NodeState::new(&spec(), kpa(3000.0), k(333.0), &config);
        state.density = kg_per_m3(2.0);
        state.q_actual = m3ps(0.5);
        assert_eq!(state.mass_flow_mismatch(1.0), 0.0);

        let mut choke = ChokeState {
            inlet_pressure: kpa(3000.0),
            outlet_pressure: kpa(1600.0),
            regime: ChokeRegime::Critical,
            pressure_ratio: 0.5457,
            critical_ratio: Some(0.5457),
            cd: 0.85,
            capacity: Some(kgps(0.8)),
        };
        state.choke = Some(choke);
        assert!((state.mass_flow_mismatch(1.0) - 0.25).abs() < 1e-12);

        choke.capacity = Some(kgps(2.0));
        state.choke = Some(choke);
        assert_eq!(state.mass_flow_mismatch(1.0), 0.0);
    }

    #[test]
    fn static_update_has_no_velocity() {
        let config = HydraulicsConfig::default();
        let fluid = FluidSpec::gas(kpa(5000.0), k(333.0), 18.2, 1.3, 1.0, StandardRate::mscfd(500.0));
        let pack = PropertyPack::evaluate(kpa(5000.0), k(333.0), &fluid, &ViscosityDefaults::default());
        let mut state = NodeState::new(&spec(), kpa(5000.0), k(333.0), &config);
        state.update_static(&pack, &config);
        assert_eq!(state.velocity.value, 0.0);
        assert!(state.density.value > 0.0);
        assert!(!state.erosion.is_erosional);
    }
}
