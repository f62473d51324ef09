//! wf-core: shared foundation for wellflow.
//!
//! Contains:
//! - units (uom SI types, constructors, process-wide physical constants)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact arena IDs for nodes and segments)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{WfError, WfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
