//! Darcy friction factor.
//!
//! Laminar flow uses the Hagen-Poiseuille result `64/Re`. Everything at or
//! above [`LAMINAR_LIMIT`] uses Churchill (1977), which spans transition and
//! fully rough turbulence with a single expression and needs no iteration.

/// Reynolds number below which flow is treated as laminar.
pub const LAMINAR_LIMIT: f64 = 2300.0;

/// Reynolds number ρvd/μ. Zero when any input is non-positive.
pub fn reynolds(rho: f64, velocity: f64, diameter: f64, mu: f64) -> f64 {
    if rho <= 0.0 || velocity <= 0.0 || diameter <= 0.0 || mu <= 0.0 {
        return 0.0;
    }
    rho * velocity * diameter / mu
}

/// Churchill correlation for the Darcy friction factor.
pub fn churchill(re: f64, relative_roughness: f64) -> f64 {
    let a = (2.457 * (1.0 / ((7.0 / re).powf(0.9) + 0.27 * relative_roughness)).ln()).powi(16);
    let b = (37_530.0 / re).powi(16);
    8.0 * ((8.0 / re).powi(12) + 1.0 / (a + b).powf(1.5)).powf(1.0 / 12.0)
}

/// Darcy friction factor for a given Reynolds number and ε/d.
///
/// Returns 0 for a stagnant stream.
pub fn friction_factor(re: f64, relative_roughness: f64) -> f64 {
    if !(re > 0.0) {
        0.0
    } else if re < LAMINAR_LIMIT {
        64.0 / re
    } else {
        churchill(re, relative_roughness.max(0.0))
    }
}
