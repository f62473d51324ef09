//! Property functions: density, flow conversion, viscosity, speed of sound.
//!
//! These are pure functions of (pressure, temperature, fluid). They assume a
//! spec that passed [`FluidSpec::validate`]; for inputs that would divide by
//! zero they log a warning and return zero instead of NaN/inf.

use tracing::warn;
use wf_core::units::constants::{P_SC_KPA, R_J_PER_KMOL_K, R_KPA_M3_PER_KMOL_K, T_SC_K, Z_SC};
use wf_core::units::{
    Density, DynVisc, MassRate, Pressure, Temperature, Velocity, VolumeRate, kg_per_m3, kgps,
    m3ps, mps, pa_s, to_kelvin, to_kpa,
};

use crate::spec::{FlowUnit, FluidKind, FluidSpec};

/// Viscosities used when the fluid spec does not carry one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViscosityDefaults {
    pub gas: DynVisc,
    pub liquid: DynVisc,
}

impl Default for ViscosityDefaults {
    fn default() -> Self {
        Self {
            // Light natural gas at wellhead conditions.
            gas: pa_s(1.2e-5),
            // Water-like produced liquid.
            liquid: pa_s(1.0e-3),
        }
    }
}

/// Real-gas density ρ = pM/(ZRT).
pub fn gas_density(p: Pressure, t: Temperature, fluid: &FluidSpec) -> Density {
    let p_kpa = to_kpa(p);
    let t_k = to_kelvin(t);
    let mw = fluid.molecular_weight;
    let z = fluid.z_factor;
    if t_k <= 0.0 || mw <= 0.0 || z <= 0.0 || p_kpa <= 0.0 {
        warn!(p_kpa, t_k, mw, z, "gas density requested for invalid state, returning 0");
        return kg_per_m3(0.0);
    }
    kg_per_m3(p_kpa * mw / (z * R_KPA_M3_PER_KMOL_K * t_k))
}

fn liquid_density(fluid: &FluidSpec) -> Density {
    match fluid.liquid_density {
        Some(rho) => rho,
        None => {
            warn!(kind = fluid.kind.as_str(), "liquid density not set, returning 0");
            kg_per_m3(0.0)
        }
    }
}

/// In-situ gas volume fraction of a two-phase stream.
fn gas_volume_fraction(rho_g: f64, rho_l: f64, x: f64) -> f64 {
    if rho_g <= 0.0 {
        return 0.0;
    }
    if rho_l <= 0.0 {
        return 1.0;
    }
    let v_g = x / rho_g;
    let v_l = (1.0 - x) / rho_l;
    v_g / (v_g + v_l)
}

/// Density at (p, t).
///
/// Liquid is incompressible. Two-phase is the volume-fraction weighted mix of
/// the gas-law density and the liquid density, with volume fractions following
/// the fixed gas mass fraction at the local gas density.
pub fn density(p: Pressure, t: Temperature, fluid: &FluidSpec) -> Density {
    match fluid.kind {
        FluidKind::Gas => gas_density(p, t, fluid),
        FluidKind::Liquid => liquid_density(fluid),
        FluidKind::TwoPhase => {
            let rho_g = gas_density(p, t, fluid).value;
            let rho_l = liquid_density(fluid).value;
            let x = fluid.gas_mass_fraction.unwrap_or(1.0);
            let alpha = gas_volume_fraction(rho_g, rho_l, x);
            kg_per_m3(alpha * rho_g + (1.0 - alpha) * rho_l)
        }
    }
}

/// Gas density at standard conditions.
pub fn standard_gas_density(fluid: &FluidSpec) -> Density {
    kg_per_m3(P_SC_KPA * fluid.molecular_weight / (Z_SC * R_KPA_M3_PER_KMOL_K * T_SC_K))
}

/// Total mass flow implied by a standard rate.
pub fn mass_flow_for(q_std: f64, unit: FlowUnit, fluid: &FluidSpec) -> MassRate {
    let q_sc = unit.to_m3_per_s(q_std);
    let rho_g_sc = standard_gas_density(fluid).value;
    let mdot = match fluid.kind {
        FluidKind::Gas => rho_g_sc * q_sc,
        FluidKind::Liquid => liquid_density(fluid).value * q_sc,
        FluidKind::TwoPhase => {
            let x = fluid.gas_mass_fraction.unwrap_or(1.0);
            if unit.is_gas_unit() {
                if x > 0.0 { rho_g_sc * q_sc / x } else { 0.0 }
            } else if x < 1.0 {
                liquid_density(fluid).value * q_sc / (1.0 - x)
            } else {
                0.0
            }
        }
    };
    kgps(mdot)
}

/// Mass flow of the fluid's configured standard rate.
pub fn mass_flow(fluid: &FluidSpec) -> MassRate {
    mass_flow_for(fluid.rate.value, fluid.rate.unit, fluid)
}

/// Convert a standard-condition rate to actual volumetric flow at (p, t).
///
/// Gas uses `q·(P_sc·T)/(P·T_sc)·(Z/Z_sc)`, liquid is incompressible, and
/// two-phase divides the implied mass flow by the local mixture density.
pub fn standard_to_actual(
    q_std: f64,
    unit: FlowUnit,
    p: Pressure,
    t: Temperature,
    fluid: &FluidSpec,
) -> VolumeRate {
    let q_sc = unit.to_m3_per_s(q_std);
    let q = match fluid.kind {
        FluidKind::Gas => {
            let p_kpa = to_kpa(p);
            if p_kpa <= 0.0 {
                warn!(p_kpa, "actual flow requested at non-positive pressure, returning 0");
                0.0
            } else {
                q_sc * (P_SC_KPA * to_kelvin(t)) / (p_kpa * T_SC_K) * (fluid.z_factor / Z_SC)
            }
        }
        FluidKind::Liquid => q_sc,
        FluidKind::TwoPhase => {
            let rho = density(p, t, fluid).value;
            if rho > 0.0 {
                mass_flow_for(q_std, unit, fluid).value / rho
            } else {
                0.0
            }
        }
    };
    m3ps(q)
}

/// Dynamic viscosity, falling back to the configured defaults.
pub fn viscosity(
    p: Pressure,
    t: Temperature,
    fluid: &FluidSpec,
    defaults: &ViscosityDefaults,
) -> DynVisc {
    if let Some(mu) = fluid.viscosity {
        return mu;
    }
    match fluid.kind {
        FluidKind::Gas => defaults.gas,
        FluidKind::Liquid => defaults.liquid,
        FluidKind::TwoPhase => {
            let rho_g = gas_density(p, t, fluid).value;
            let rho_l = liquid_density(fluid).value;
            let alpha = gas_volume_fraction(rho_g, rho_l, fluid.gas_mass_fraction.unwrap_or(1.0));
            defaults.gas * alpha + defaults.liquid * (1.0 - alpha)
        }
    }
}

/// Gas speed of sound a = sqrt(k·R·T/MW). `None` for liquids.
pub fn speed_of_sound(t: Temperature, fluid: &FluidSpec) -> Option<Velocity> {
    if !fluid.has_gas() {
        return None;
    }
    let t_k = to_kelvin(t);
    if t_k <= 0.0 || fluid.molecular_weight <= 0.0 {
        warn!(t_k, mw = fluid.molecular_weight, "speed of sound undefined, returning None");
        return None;
    }
    Some(mps(
        (fluid.k_ratio * R_J_PER_KMOL_K * t_k / fluid.molecular_weight).sqrt(),
    ))
}
