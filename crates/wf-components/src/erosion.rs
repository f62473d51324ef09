//! Erosional-velocity and Mach screening.

use wf_core::units::{Velocity, mps};
use wf_fluids::ViscosityDefaults;

use crate::error::{ComponentError, ComponentResult};

/// Tunables for the hydraulics checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydraulicsConfig {
    /// Empirical constant C in `v_lim = C/√ρ` (API RP 14E form).
    pub erosional_c: f64,
    /// Mach number above which compressibility effects are flagged.
    pub mach_limit: f64,
    /// Used when the fluid spec carries no viscosity.
    pub viscosity: ViscosityDefaults,
}

impl Default for HydraulicsConfig {
    fn default() -> Self {
        Self {
            erosional_c: 100.0,
            mach_limit: 0.3,
            viscosity: ViscosityDefaults::default(),
        }
    }
}

impl HydraulicsConfig {
    pub fn validate(&self) -> ComponentResult<()> {
        if !(self.erosional_c.is_finite() && self.erosional_c > 0.0) {
            return Err(ComponentError::InvalidArg {
                what: "erosional constant must be positive",
            });
        }
        if !(self.mach_limit.is_finite() && self.mach_limit > 0.0) {
            return Err(ComponentError::InvalidArg {
                what: "Mach limit must be positive",
            });
        }
        if !(self.viscosity.gas.value > 0.0 && self.viscosity.liquid.value > 0.0) {
            return Err(ComponentError::InvalidArg {
                what: "default viscosities must be positive",
            });
        }
        Ok(())
    }
}

/// Erosional limit velocity for a density, `C/√ρ`. Unbounded for ρ ≤ 0.
pub fn erosional_limit(rho: f64, c: f64) -> f64 {
    if rho > 0.0 { c / rho.sqrt() } else { f64::INFINITY }
}

/// Outcome of the velocity screening at one location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErosionalCheck {
    pub limit_velocity: Velocity,
    pub is_erosional: bool,
    pub mach_exceeded: bool,
}

impl ErosionalCheck {
    /// Both comparisons are strict: sitting exactly on a limit is not a
    /// violation.
    pub fn evaluate(velocity: f64, rho: f64, mach: f64, config: &HydraulicsConfig) -> Self {
        let limit = erosional_limit(rho, config.erosional_c);
        Self {
            limit_velocity: mps(limit),
            is_erosional: velocity > limit,
            mach_exceeded: mach > config.mach_limit,
        }
    }

    /// Stagnant flow: nothing to flag.
    pub fn quiescent(rho: f64, config: &HydraulicsConfig) -> Self {
        Self::evaluate(0.0, rho, 0.0, config)
    }

    /// Human-readable messages for any violated limit.
    pub fn warnings(&self, location: &str, velocity: f64, mach: f64) -> Vec<String> {
        let mut out = Vec::new();
        if self.is_erosional {
            out.push(format!(
                "{location}: velocity {velocity:.2} m/s exceeds erosional limit {:.2} m/s",
                self.limit_velocity.value
            ));
        }
        if self.mach_exceeded {
            out.push(format!("{location}: Mach {mach:.3} exceeds limit"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_strict() {
        let config = HydraulicsConfig::default();
        let rho: f64 = 32.87;
        let v_lim = 100.0 / rho.sqrt();

        let at = ErosionalCheck::evaluate(v_lim, rho, 0.0, &config);
        assert_eq!(at.limit_velocity.value, v_lim);
        assert!(!at.is_erosional);

        let over = ErosionalCheck::evaluate(v_lim + 0.01, rho, 0.0, &config);
        assert!(over.is_erosional);
    }

    #[test]
    fn mach_is_strict() {
        let config = HydraulicsConfig::default();
        assert!(!ErosionalCheck::evaluate(1.0, 10.0, 0.3, &config).mach_exceeded);
        assert!(ErosionalCheck::evaluate(1.0, 10.0, 0.31, &config).mach_exceeded);
    }

    #[test]
    fn zero_density_never_erodes() {
        let check = ErosionalCheck::evaluate(1.0e3, 0.0, 0.0, &HydraulicsConfig::default());
        assert!(!check.is_erosional);
        assert!(check.limit_velocity.value.is_infinite());
    }

    #[test]
    fn warnings_name_the_location() {
        let config = HydraulicsConfig::default();
        let check = ErosionalCheck::evaluate(50.0, 100.0, 0.5, &config);
        let w = check.warnings("CK", 50.0, 0.5);
        assert_eq!(w.len(), 2);
        assert!(w[0].starts_with("CK: velocity"));
        assert!(ErosionalCheck::quiescent(100.0, &config).warnings("CK", 0.0, 0.0).is_empty());
    }

    #[test]
    fn config_validation() {
        assert!(HydraulicsConfig::default().validate().is_ok());
        let bad = HydraulicsConfig {
            erosional_c: 0.0,
            ..HydraulicsConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
