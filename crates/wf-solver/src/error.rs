//! Error types for solver operations.

use thiserror::Error;
use wf_components::ComponentError;
use wf_core::error::WfError;
use wf_fluids::FluidError;
use wf_graph::GraphError;

/// Errors that prevent a solve from starting or continuing.
///
/// Non-convergence is not an error; see [`crate::NetworkSolution::converged`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Invalid solver option: {what}")]
    InvalidOption { what: &'static str },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for WfError {
    fn from(e: SolverError) -> Self {
        WfError::InvalidArg {
            what: format!("solver: {e}"),
        }
    }
}
