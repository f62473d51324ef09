//! Steady-state hydraulics solver for wellhead-to-flare production chains.
//!
//! The unknowns are node pressures along a single flow path. Temperature is
//! held at the inlet value (isothermal). Pressures are found by under-relaxed
//! fixed-point iteration; the choke node contributes a step drop from the
//! choke model rather than a pipe loss.

pub mod batch;
pub mod error;
pub mod options;
pub mod problem;
pub mod solution;
pub mod solve;
pub mod state;

pub use batch::{Scenario, solve_batch};
pub use error::{SolverError, SolverResult};
pub use options::SolveOptions;
pub use problem::ChainProblem;
pub use solution::NetworkSolution;
pub use solve::{SolveProgressEvent, solve, solve_network, solve_network_with_progress};
pub use state::{ChokeState, NodeState};
