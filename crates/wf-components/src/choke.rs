//! Choke (flow restriction) model with critical and subcritical regimes.
//!
//! Gas flow follows the isentropic nozzle equations with a real-gas
//! compressibility factor. Once the pressure ratio across the throat drops to
//! the critical ratio the throat is sonic and mass flow no longer depends on
//! downstream pressure. Liquid and two-phase streams use the non-cavitating
//! orifice equation, which has no choked regime.

use std::fmt;

use tracing::debug;
use uom::si::area::square_meter;
use wf_core::units::constants::R_J_PER_KMOL_K;
use wf_core::units::{Area, MassRate, Pressure, Temperature, VolumeRate, kgps, m3ps, pa, to_kelvin, to_kpa};
use wf_fluids::{FluidKind, FluidSpec, density};
use wf_graph::{ChokeOpening, ChokeSettings, OpeningLaw};

use crate::common::{EPSILON_MDOT, check_finite, circle_area};
use crate::discharge::resolve_cd;
use crate::error::{ComponentError, ComponentResult};

const MAX_BISECTION: usize = 200;
const RATIO_TOL: f64 = 1e-13;

/// Flow regime at the choke throat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChokeRegime {
    /// Sonic throat, r ≤ r*.
    Critical,
    /// r > r*.
    Subcritical,
    /// Orifice equation for liquid or two-phase flow.
    Incompressible,
}

impl ChokeRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChokeRegime::Critical => "critical",
            ChokeRegime::Subcritical => "subcritical",
            ChokeRegime::Incompressible => "incompressible",
        }
    }
}

impl fmt::Display for ChokeRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Critical pressure ratio r* = (2/(k+1))^(k/(k-1)).
pub fn critical_pressure_ratio(k: f64) -> f64 {
    (2.0 / (k + 1.0)).powf(k / (k - 1.0))
}

/// Non-cavitating orifice flow Q = Cd·A·√(2ΔP/ρ).
pub fn orifice_volume_flow(cd: f64, area_m2: f64, dp: Pressure, rho: f64) -> VolumeRate {
    if dp.value <= 0.0 || rho <= 0.0 {
        return m3ps(0.0);
    }
    m3ps(cd * area_m2 * (2.0 * dp.value / rho).sqrt())
}

/// Mass flow through the choke at a given pressure pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChokeFlow {
    pub mdot: MassRate,
    pub regime: ChokeRegime,
    /// P2/P0.
    pub pressure_ratio: f64,
    /// `None` for incompressible flow.
    pub critical_ratio: Option<f64>,
}

/// Outlet pressure that passes a required mass flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ChokeOperatingPoint {
    pub inlet_pressure: Pressure,
    pub outlet_pressure: Pressure,
    pub regime: ChokeRegime,
    pub pressure_ratio: f64,
    pub critical_ratio: Option<f64>,
    pub cd: f64,
    /// Sonic mass flow at the inlet state (gas only).
    pub capacity: Option<MassRate>,
    /// Set when the choke cannot pass the required flow.
    pub warning: Option<String>,
}

/// A resolved choke: effective throat area and discharge coefficient.
#[derive(Debug, Clone)]
pub struct ChokeModel {
    name: String,
    pub cd: f64,
    pub area: Area,
}

impl ChokeModel {
    pub fn new(name: impl Into<String>, cd: f64, area: Area) -> Self {
        Self {
            name: name.into(),
            cd,
            area,
        }
    }

    /// Build from node settings, resolving opening and Cd.
    pub fn from_settings(name: impl Into<String>, settings: &ChokeSettings) -> ComponentResult<Self> {
        let area = effective_area(settings);
        check_finite(area, "choke area")?;
        if area <= 0.0 {
            return Err(ComponentError::NonPhysical { what: "choke area" });
        }
        Ok(Self::new(
            name,
            resolve_cd(settings)?,
            Area::new::<square_meter>(area),
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn compressible(fluid: &FluidSpec) -> bool {
        matches!(fluid.kind, FluidKind::Gas)
    }

    /// √(k/(Z·Rs·T0)) and the sonic throat factor, both SI.
    fn gas_terms(&self, t0: Temperature, fluid: &FluidSpec) -> ComponentResult<(f64, f64)> {
        let t0 = to_kelvin(t0);
        let k = fluid.k_ratio;
        let r_specific = R_J_PER_KMOL_K / fluid.molecular_weight;
        let zrt = fluid.z_factor * r_specific * t0;
        if !(zrt.is_finite() && zrt > 0.0) || !(k > 1.0) {
            return Err(ComponentError::NonPhysical {
                what: "choke inlet gas state",
            });
        }
        Ok((zrt, k))
    }

    fn check_inlet(&self, p0: Pressure) -> ComponentResult<()> {
        if p0.value > 0.0 && p0.value.is_finite() {
            Ok(())
        } else {
            Err(ComponentError::InvalidConfiguration {
                what: format!(
                    "choke {}: inlet pressure {:.3} kPa is not positive",
                    self.name,
                    to_kpa(p0)
                ),
            })
        }
    }

    /// Regime for a pressure pair.
    pub fn regime(&self, p0: Pressure, p2: Pressure, fluid: &FluidSpec) -> ComponentResult<ChokeRegime> {
        Ok(self.pressure_ratio(p0, p2, fluid)?.0)
    }

    fn pressure_ratio(
        &self,
        p0: Pressure,
        p2: Pressure,
        fluid: &FluidSpec,
    ) -> ComponentResult<(ChokeRegime, f64)> {
        self.check_inlet(p0)?;
        if p2 >= p0 {
            return Err(ComponentError::InvalidConfiguration {
                what: format!(
                    "choke {}: outlet pressure {:.3} kPa is not below inlet {:.3} kPa",
                    self.name,
                    to_kpa(p2),
                    to_kpa(p0)
                ),
            });
        }
        if p2.value < 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "choke outlet pressure",
            });
        }
        let r = p2.value / p0.value;
        let regime = if !Self::compressible(fluid) {
            ChokeRegime::Incompressible
        } else if r <= critical_pressure_ratio(fluid.k_ratio) {
            ChokeRegime::Critical
        } else {
            ChokeRegime::Subcritical
        };
        Ok((regime, r))
    }

    /// Sonic mass flow Cd·A·P0·√(k/(Z·R·T0))·(2/(k+1))^((k+1)/(2(k−1))).
    pub fn critical_mass_flow(
        &self,
        p0: Pressure,
        t0: Temperature,
        fluid: &FluidSpec,
    ) -> ComponentResult<MassRate> {
        self.check_inlet(p0)?;
        let (zrt, k) = self.gas_terms(t0, fluid)?;
        let throat = (2.0 / (k + 1.0)).powf((k + 1.0) / (2.0 * (k - 1.0)));
        let mdot = self.cd * self.area.value * p0.value * (k / zrt).sqrt() * throat;
        check_finite(mdot, "choke critical mass flow")?;
        Ok(kgps(mdot))
    }

    /// Subcritical nozzle flow at ratio r = P2/P0.
    fn subcritical_mass_flow(&self, p0: f64, zrt: f64, k: f64, r: f64) -> f64 {
        let bracket = r.powf(2.0 / k) - r.powf((k + 1.0) / k);
        self.cd * self.area.value * p0 * (2.0 * k / (zrt * (k - 1.0)) * bracket.max(0.0)).sqrt()
    }

    /// Mass flow at (P0, T0) discharging to P2.
    ///
    /// Fails with [`ComponentError::InvalidConfiguration`] when `p2 >= p0`.
    pub fn mass_flow(
        &self,
        p0: Pressure,
        t0: Temperature,
        p2: Pressure,
        fluid: &FluidSpec,
    ) -> ComponentResult<ChokeFlow> {
        let (regime, r) = self.pressure_ratio(p0, p2, fluid)?;
        let (mdot, critical_ratio) = match regime {
            ChokeRegime::Critical => (
                self.critical_mass_flow(p0, t0, fluid)?.value,
                Some(critical_pressure_ratio(fluid.k_ratio)),
            ),
            ChokeRegime::Subcritical => {
                let (zrt, k) = self.gas_terms(t0, fluid)?;
                (
                    self.subcritical_mass_flow(p0.value, zrt, k, r),
                    Some(critical_pressure_ratio(k)),
                )
            }
            ChokeRegime::Incompressible => {
                let rho = density(p0, t0, fluid).value;
                let q = orifice_volume_flow(self.cd, self.area.value, p0 - p2, rho);
                (rho * q.value, None)
            }
        };
        check_finite(mdot, "choke mass flow")?;
        Ok(ChokeFlow {
            mdot: kgps(mdot),
            regime,
            pressure_ratio: r,
            critical_ratio,
        })
    }

    /// Outlet pressure at which the choke passes `mdot` from (P0, T0).
    ///
    /// Gas demand at or above the sonic capacity pins the outlet at the
    /// critical ratio and reports a warning; the real upstream pressure would
    /// have to rise. An incompressible demand needing more than the full inlet
    /// pressure yields zero outlet pressure with a warning.
    pub fn outlet_pressure(
        &self,
        p0: Pressure,
        t0: Temperature,
        mdot: MassRate,
        fluid: &FluidSpec,
    ) -> ComponentResult<ChokeOperatingPoint> {
        self.check_inlet(p0)?;
        let required = mdot.value.max(0.0);

        if !Self::compressible(fluid) {
            let rho = density(p0, t0, fluid).value;
            let ca = self.cd * self.area.value;
            let dp = if rho > 0.0 && required > EPSILON_MDOT {
                let g = required / ca;
                g * g / (2.0 * rho)
            } else {
                0.0
            };
            check_finite(dp, "choke pressure drop")?;
            let (p2, warning) = if dp >= p0.value {
                (
                    pa(0.0),
                    Some(format!(
                        "choke {}: required flow needs {:.1} kPa drop, more than inlet {:.1} kPa",
                        self.name,
                        dp / 1000.0,
                        to_kpa(p0)
                    )),
                )
            } else {
                (p0 - pa(dp), None)
            };
            return Ok(ChokeOperatingPoint {
                inlet_pressure: p0,
                outlet_pressure: p2,
                regime: ChokeRegime::Incompressible,
                pressure_ratio: p2.value / p0.value,
                critical_ratio: None,
                cd: self.cd,
                capacity: None,
                warning,
            });
        }

        let (zrt, k) = self.gas_terms(t0, fluid)?;
        let r_star = critical_pressure_ratio(k);
        let capacity = self.critical_mass_flow(p0, t0, fluid)?;

        let (regime, r, warning) = if required >= capacity.value {
            debug!(choke = %self.name, required, capacity = capacity.value, "choke over capacity");
            (
                ChokeRegime::Critical,
                r_star,
                Some(format!(
                    "choke {}: critical flow, required {:.4} kg/s exceeds capacity {:.4} kg/s",
                    self.name, required, capacity.value
                )),
            )
        } else if required <= EPSILON_MDOT {
            (ChokeRegime::Subcritical, 1.0, None)
        } else {
            // Subcritical flow falls monotonically from capacity at r* to zero at r = 1.
            let (mut lo, mut hi) = (r_star, 1.0);
            for _ in 0..MAX_BISECTION {
                if hi - lo < RATIO_TOL {
                    break;
                }
                let mid = 0.5 * (lo + hi);
                if self.subcritical_mass_flow(p0.value, zrt, k, mid) > required {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            (ChokeRegime::Subcritical, 0.5 * (lo + hi), None)
        };

        Ok(ChokeOperatingPoint {
            inlet_pressure: p0,
            outlet_pressure: p0 * r,
            regime,
            pressure_ratio: r,
            critical_ratio: Some(r_star),
            cd: self.cd,
            capacity: Some(capacity),
            warning,
        })
    }
}

/// Throat area after applying the opening law to the full bore.
pub fn effective_area(settings: &ChokeSettings) -> f64 {
    let full = circle_area(settings.bore.value);
    match settings.opening {
        ChokeOpening::FixedBore => full,
        ChokeOpening::PercentOpen { percent, law } => {
            let fraction = (percent / 100.0).clamp(0.0, 1.0);
            match law {
                OpeningLaw::Linear => full * fraction,
                OpeningLaw::Quadratic => full * fraction * fraction,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use wf_core::units::{k, kg_per_m3, kpa, m};
    use wf_fluids::StandardRate;

    fn gas() -> FluidSpec {
        FluidSpec::gas(kpa(3000.0), k(333.0), 18.2, 1.3, 1.0, StandardRate::mscfd(1000.0))
    }

    fn bean() -> ChokeModel {
        ChokeModel::from_settings("CK", &ChokeSettings::fixed(m(0.0127), 0.85)).unwrap()
    }

    #[test]
    fn critical_ratio_for_natural_gas() {
        let r = critical_pressure_ratio(1.3);
        assert!((r - 0.5459).abs() < 5e-4, "r* = {r}");
        assert!((critical_pressure_ratio(1.4) - 0.5283).abs() < 1e-4);
    }

    #[test]
    fn regime_selection() {
        let ck = bean();
        let f = gas();
        assert_eq!(ck.regime(kpa(3000.0), kpa(1000.0), &f).unwrap(), ChokeRegime::Critical);
        assert_eq!(ck.regime(kpa(3000.0), kpa(2900.0), &f).unwrap(), ChokeRegime::Subcritical);
    }

    #[test]
    fn choked_flow_ignores_downstream_pressure() {
        let ck = bean();
        let f = gas();
        let a = ck.mass_flow(kpa(3000.0), k(333.0), kpa(500.0), &f).unwrap();
        let b = ck.mass_flow(kpa(3000.0), k(333.0), kpa(900.0), &f).unwrap();
        assert_eq!(a.regime, ChokeRegime::Critical);
        assert_eq!(a.mdot, b.mdot);
    }

    #[test]
    fn regimes_meet_at_critical_ratio() {
        let ck = bean();
        let f = gas();
        let p0 = 3000.0e3;
        let (zrt, kk) = ck.gas_terms(k(333.0), &f).unwrap();
        let sub = ck.subcritical_mass_flow(p0, zrt, kk, critical_pressure_ratio(kk));
        let crit = ck.critical_mass_flow(kpa(3000.0), k(333.0), &f).unwrap().value;
        assert!((sub - crit).abs() / crit < 1e-9);
    }

    #[test]
    fn no_drop_is_invalid_configuration() {
        let ck = bean();
        let err = ck.mass_flow(kpa(3000.0), k(333.0), kpa(3000.0), &gas()).unwrap_err();
        assert!(matches!(err, ComponentError::InvalidConfiguration { .. }));
        let err = ck.mass_flow(kpa(3000.0), k(333.0), kpa(3100.0), &gas()).unwrap_err();
        assert!(matches!(err, ComponentError::InvalidConfiguration { .. }));
    }

    #[test]
    fn outlet_pressure_inverts_subcritical_flow() {
        let ck = bean();
        let f = gas();
        let flow = ck.mass_flow(kpa(3000.0), k(333.0), kpa(2500.0), &f).unwrap();
        let op = ck.outlet_pressure(kpa(3000.0), k(333.0), flow.mdot, &f).unwrap();
        assert_eq!(op.regime, ChokeRegime::Subcritical);
        assert!((to_kpa(op.outlet_pressure) - 2500.0).abs() < 1e-3);
        assert!(op.warning.is_none());
    }

    #[test]
    fn over_capacity_pins_critical_ratio() {
        let ck = bean();
        let f = gas();
        let cap = ck.critical_mass_flow(kpa(3000.0), k(333.0), &f).unwrap();
        let op = ck.outlet_pressure(kpa(3000.0), k(333.0), cap * 2.0, &f).unwrap();
        assert_eq!(op.regime, ChokeRegime::Critical);
        let expected = 3000.0 * critical_pressure_ratio(1.3);
        assert!((to_kpa(op.outlet_pressure) - expected).abs() < 1e-9);
        assert!(op.warning.is_some());
    }

    #[test]
    fn liquid_uses_orifice_equation() {
        let ck = bean();
        let liquid = FluidSpec::liquid(kpa(2000.0), k(300.0), kg_per_m3(850.0), StandardRate::stbd(500.0));
        let flow = ck.mass_flow(kpa(2000.0), k(300.0), kpa(1500.0), &liquid).unwrap();
        assert_eq!(flow.regime, ChokeRegime::Incompressible);
        assert!(flow.critical_ratio.is_none());

        let q = 0.85 * circle_area(0.0127) * (2.0 * 500.0e3 / 850.0_f64).sqrt();
        assert!((flow.mdot.value - 850.0 * q).abs() < 1e-9);

        let op = ck.outlet_pressure(kpa(2000.0), k(300.0), flow.mdot, &liquid).unwrap();
        assert!((to_kpa(op.outlet_pressure) - 1500.0).abs() < 1e-6);
    }

    #[test]
    fn opening_law_scales_area() {
        let full = effective_area(&ChokeSettings::fixed(m(0.05), 0.8));
        let lin = effective_area(&ChokeSettings::adjustable(m(0.05), 50.0));
        let quad = effective_area(&ChokeSettings::adjustable(m(0.05), 50.0).with_law(OpeningLaw::Quadratic));
        assert!((lin - 0.5 * full).abs() < 1e-15);
        assert!((quad - 0.25 * full).abs() < 1e-15);
    }

    proptest! {
        #[test]
        fn choked_mass_flow_independent_of_outlet(
            p0 in 500.0_f64..20_000.0,
            r1 in 0.0_f64..0.54,
            r2 in 0.0_f64..0.54,
        ) {
            let ck = bean();
            let f = gas();
            let a = ck.mass_flow(kpa(p0), k(333.0), kpa(p0 * r1), &f).unwrap();
            let b = ck.mass_flow(kpa(p0), k(333.0), kpa(p0 * r2), &f).unwrap();
            prop_assert_eq!(a.regime, ChokeRegime::Critical);
            prop_assert_eq!(a.mdot, b.mdot);
        }
    }
}
