//! Snapshot of every property the hydraulics layer needs at one state.

use wf_core::units::{Density, DynVisc, MassRate, Pressure, Temperature, Velocity, VolumeRate};

use crate::properties::{
    ViscosityDefaults, density, mass_flow, speed_of_sound, standard_to_actual, viscosity,
};
use crate::spec::FluidSpec;

/// Local fluid properties at (p, t) for the configured standard rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyPack {
    pub p: Pressure,
    pub t: Temperature,
    pub rho: Density,
    pub mu: DynVisc,
    /// `None` for liquids.
    pub sound_speed: Option<Velocity>,
    pub q_actual: VolumeRate,
    pub mdot: MassRate,
}

impl PropertyPack {
    pub fn evaluate(
        p: Pressure,
        t: Temperature,
        fluid: &FluidSpec,
        defaults: &ViscosityDefaults,
    ) -> Self {
        Self {
            p,
            t,
            rho: density(p, t, fluid),
            mu: viscosity(p, t, fluid, defaults),
            sound_speed: speed_of_sound(t, fluid),
            q_actual: standard_to_actual(fluid.rate.value, fluid.rate.unit, p, t, fluid),
            mdot: mass_flow(fluid),
        }
    }

    /// Mean velocity through a cross-section of `area_m2`.
    pub fn velocity(&self, area_m2: f64) -> f64 {
        if area_m2 > 0.0 {
            self.q_actual.value / area_m2
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::StandardRate;
    use wf_core::units::{k, kpa};

    #[test]
    fn pack_is_consistent() {
        let f = FluidSpec::gas(kpa(3000.0), k(320.0), 18.2, 1.3, 0.95, StandardRate::mscfd(800.0));
        let pack = PropertyPack::evaluate(kpa(3000.0), k(320.0), &f, &ViscosityDefaults::default());
        let rel = (pack.rho.value * pack.q_actual.value - pack.mdot.value).abs() / pack.mdot.value;
        assert!(rel < 1e-9);
        assert!(pack.sound_speed.is_some());
        assert_eq!(pack.velocity(0.0), 0.0);
        assert!(pack.velocity(0.01) > 0.0);
    }
}
