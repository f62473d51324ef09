//! Solver configuration.

use wf_components::HydraulicsConfig;
use wf_core::units::{Pressure, kpa};

use crate::error::{SolverError, SolverResult};

/// Fixed-point iteration settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    /// Maximum passes over the chain.
    pub max_iterations: usize,
    /// Convergence threshold, applied to the largest pressure change in kPa
    /// and to the largest relative mass-flow mismatch.
    pub tolerance: f64,
    /// Weight of the newly computed pressure, in (0, 1].
    pub relaxation: f64,
    /// Starting pressure of non-source nodes as a fraction of inlet pressure.
    pub initial_guess_fraction: f64,
    /// Computed pressures are clamped to this floor.
    pub min_pressure: Pressure,
    pub hydraulics: HydraulicsConfig,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            tolerance: 1e-4,
            relaxation: 0.5,
            initial_guess_fraction: 0.9,
            min_pressure: kpa(1.0),
            hydraulics: HydraulicsConfig::default(),
        }
    }
}

impl SolveOptions {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_relaxation(mut self, relaxation: f64) -> Self {
        self.relaxation = relaxation;
        self
    }

    pub fn validate(&self) -> SolverResult<()> {
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidOption {
                what: "max_iterations must be at least 1",
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(SolverError::InvalidOption {
                what: "tolerance must be positive",
            });
        }
        if !(self.relaxation > 0.0 && self.relaxation <= 1.0) {
            return Err(SolverError::InvalidOption {
                what: "relaxation must be in (0, 1]",
            });
        }
        if !(self.initial_guess_fraction > 0.0 && self.initial_guess_fraction <= 1.0) {
            return Err(SolverError::InvalidOption {
                what: "initial_guess_fraction must be in (0, 1]",
            });
        }
        if !(self.min_pressure.value.is_finite() && self.min_pressure.value > 0.0) {
            return Err(SolverError::InvalidOption {
                what: "min_pressure must be positive",
            });
        }
        self.hydraulics.validate()?;
        Ok(())
    }
}
