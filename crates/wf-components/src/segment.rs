//! Pipe segment hydraulics: friction, fittings and hydrostatic pressure drop.

use wf_core::SegmentId;
use wf_core::units::constants::G0_MPS2;
use wf_core::units::{
    Density, DynVisc, MassRate, Pressure, Temperature, Velocity, VolumeRate, mps, pa, to_kpa,
};
use wf_fluids::{FluidSpec, PropertyPack};
use wf_graph::{SegmentGeometry, SegmentSpec};

use crate::common::{EPSILON_MDOT, check_finite, circle_area, dynamic_pressure};
use crate::erosion::{ErosionalCheck, HydraulicsConfig};
use crate::error::ComponentResult;
use crate::friction::{friction_factor, reynolds};

/// Flow conditions at one pressure inside a pipe of known geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFlow {
    pub pressure: Pressure,
    pub temperature: Temperature,
    pub density: Density,
    pub viscosity: DynVisc,
    pub q_actual: VolumeRate,
    pub mdot: MassRate,
    pub velocity: Velocity,
    pub mach: f64,
    pub reynolds: f64,
    pub friction_factor: f64,
    pub erosion: ErosionalCheck,
}

impl LocalFlow {
    /// Evaluate properties at (p, t) and the resulting flow in `geometry`.
    ///
    /// A stagnant stream yields zero velocity, Mach, Reynolds and friction
    /// factor instead of dividing by zero.
    pub fn evaluate(
        p: Pressure,
        t: Temperature,
        fluid: &FluidSpec,
        geometry: &SegmentGeometry,
        config: &HydraulicsConfig,
    ) -> Self {
        let props = PropertyPack::evaluate(p, t, fluid, &config.viscosity);
        let rho = props.rho.value;
        let d = geometry.diameter.value;

        let flowing = props.q_actual.value > 0.0 && props.mdot.value > EPSILON_MDOT;
        let (velocity, re, f, mach) = if flowing {
            let v = props.velocity(circle_area(d));
            let re = reynolds(rho, v, d, props.mu.value);
            let f = friction_factor(re, geometry.roughness.value / d);
            let mach = match props.sound_speed {
                Some(a) if a.value > 0.0 => v / a.value,
                _ => 0.0,
            };
            (v, re, f, mach)
        } else {
            (0.0, 0.0, 0.0, 0.0)
        };

        Self {
            pressure: p,
            temperature: t,
            density: props.rho,
            viscosity: props.mu,
            q_actual: props.q_actual,
            mdot: props.mdot,
            velocity: mps(velocity),
            mach,
            reynolds: re,
            friction_factor: f,
            erosion: ErosionalCheck::evaluate(velocity, rho, mach, config),
        }
    }

    pub fn warnings(&self, location: &str) -> Vec<String> {
        self.erosion
            .warnings(location, self.velocity.value, self.mach)
    }
}

/// Pressure-drop decomposition across one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentResult {
    pub segment: SegmentId,
    pub name: String,
    pub friction_drop: Pressure,
    pub fittings_drop: Pressure,
    /// Negative when the segment runs downhill.
    pub hydrostatic_drop: Pressure,
    pub total_drop: Pressure,
    /// Conditions at the mean segment pressure.
    pub flow: LocalFlow,
}

impl SegmentResult {
    pub fn total_drop_kpa(&self) -> f64 {
        to_kpa(self.total_drop)
    }
}

/// Steady, isothermal pressure drop model for one pipe run.
#[derive(Debug, Clone)]
pub struct SegmentHydraulics {
    id: SegmentId,
    name: String,
    pub geometry: SegmentGeometry,
}

impl SegmentHydraulics {
    pub fn new(spec: &SegmentSpec) -> Self {
        Self {
            id: spec.id,
            name: spec.name.clone(),
            geometry: spec.geometry,
        }
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pressure drop for the configured flow given the current inlet and
    /// outlet pressures.
    ///
    /// Properties are taken at the arithmetic mean pressure; temperature is
    /// held at `t` across the segment.
    pub fn evaluate(
        &self,
        fluid: &FluidSpec,
        p_in: Pressure,
        p_out: Pressure,
        t: Temperature,
        config: &HydraulicsConfig,
    ) -> ComponentResult<SegmentResult> {
        let p_mean = (p_in + p_out) * 0.5;
        let flow = LocalFlow::evaluate(p_mean, t, fluid, &self.geometry, config);

        let rho = flow.density.value;
        let dyn_p = dynamic_pressure(rho, flow.velocity.value);
        let g = &self.geometry;

        let friction = flow.friction_factor * (g.length.value / g.diameter.value) * dyn_p;
        let fittings = g.k_fittings * dyn_p;
        let hydrostatic = rho * G0_MPS2 * g.elevation_change.value;
        let total = friction + fittings + hydrostatic;

        check_finite(friction, "friction pressure drop")?;
        check_finite(hydrostatic, "hydrostatic pressure drop")?;
        check_finite(total, "segment pressure drop")?;

        Ok(SegmentResult {
            segment: self.id,
            name: self.name.clone(),
            friction_drop: pa(friction),
            fittings_drop: pa(fittings),
            hydrostatic_drop: pa(hydrostatic),
            total_drop: pa(total),
            flow,
        })
    }
}
