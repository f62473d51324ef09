//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use wf_core::numeric::ensure_finite;

/// Below this mass flow (kg/s) a stream is treated as stagnant.
pub const EPSILON_MDOT: f64 = 1e-12;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Dynamic pressure ρv²/2 in Pa.
#[inline]
pub fn dynamic_pressure(rho: f64, velocity: f64) -> f64 {
    0.5 * rho * velocity * velocity
}

/// Circular cross-section πd²/4.
#[inline]
pub fn circle_area(diameter: f64) -> f64 {
    std::f64::consts::PI * diameter * diameter / 4.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_pressure() {
        assert_eq!(dynamic_pressure(2.0, 3.0), 9.0);
        assert_eq!(dynamic_pressure(850.0, 0.0), 0.0);
    }

    #[test]
    fn test_circle_area() {
        let a = circle_area(0.1);
        assert!((a - 0.007_853_981_633_974_483).abs() < 1e-15);
    }

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "test").is_ok());
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }
}
