//! Fluid property errors.

use thiserror::Error;
use wf_core::WfError;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors raised when validating a fluid specification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (non-positive temperature, molecular weight, ...).
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    /// A property required by the fluid kind was not supplied.
    #[error("Missing {what} for {kind} fluid")]
    Missing {
        what: &'static str,
        kind: &'static str,
    },

    /// Flow-rate unit does not describe the fluid kind.
    #[error("Flow unit {unit} is not valid for a {kind} fluid")]
    UnitMismatch {
        unit: &'static str,
        kind: &'static str,
    },
}

impl From<FluidError> for WfError {
    fn from(err: FluidError) -> Self {
        WfError::InvalidArg {
            what: format!("fluid: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::NonPhysical {
            what: "temperature",
            value: -3.0,
        };
        assert!(err.to_string().contains("temperature"));

        let err = FluidError::Missing {
            what: "liquid density",
            kind: "liquid",
        };
        assert_eq!(err.to_string(), "Missing liquid density for liquid fluid");
    }

    #[test]
    fn error_to_wf_error() {
        let err: WfError = FluidError::UnitMismatch {
            unit: "STB/d",
            kind: "gas",
        }
        .into();
        assert!(matches!(err, WfError::InvalidArg { .. }));
    }
}
