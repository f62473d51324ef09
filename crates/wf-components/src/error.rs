//! Error types for component operations.

use thiserror::Error;
use wf_core::error::WfError;
use wf_fluids::FluidError;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    /// Operating point the model cannot represent (e.g. no pressure drop
    /// across a choke).
    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Fluid model error: {0}")]
    Fluid(#[from] FluidError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for WfError {
    fn from(e: ComponentError) -> Self {
        WfError::InvalidArg {
            what: format!("component: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::NonPhysical { what: "density" };
        assert!(err.to_string().contains("density"));

        let err = ComponentError::InvalidConfiguration {
            what: "outlet pressure 3000 kPa >= inlet 3000 kPa".into(),
        };
        assert!(err.to_string().starts_with("Invalid configuration"));
    }

    #[test]
    fn error_conversion() {
        let comp_err = ComponentError::InvalidArg { what: "test" };
        let wf_err: WfError = comp_err.into();
        assert!(matches!(wf_err, WfError::InvalidArg { .. }));
    }
}
