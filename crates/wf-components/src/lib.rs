//! wf-components: hydraulic element models for wellflow.
//!
//! Provides:
//! - Segment hydraulics (friction, fittings and hydrostatic pressure drop)
//! - Laminar / Churchill friction factor
//! - Erosional-velocity and Mach screening
//! - Choke flow with critical and subcritical regimes
//! - Discharge coefficient step tables
//! - Node equipment (lumped losses, vessels, chokes) behind `NodeEquipment`
//!
//! All models are deterministic functions of state and parameters, suitable
//! for repeated evaluation inside a fixed-point solve.
//!
//! # Example
//!
//! ```
//! use wf_components::{ChokeModel, ChokeRegime};
//! use wf_core::units::{k, kpa, m};
//! use wf_fluids::{FluidSpec, StandardRate};
//! use wf_graph::ChokeSettings;
//!
//! let gas = FluidSpec::gas(kpa(3000.0), k(333.0), 18.2, 1.3, 1.0, StandardRate::mscfd(1000.0));
//! let choke = ChokeModel::from_settings("CK", &ChokeSettings::fixed(m(0.0127), 0.85)).unwrap();
//!
//! let flow = choke.mass_flow(kpa(3000.0), k(333.0), kpa(1000.0), &gas).unwrap();
//! assert_eq!(flow.regime, ChokeRegime::Critical);
//! ```

pub mod choke;
pub mod common;
pub mod discharge;
pub mod equipment;
pub mod erosion;
pub mod error;
pub mod friction;
pub mod segment;
pub mod traits;

pub use choke::{
    ChokeFlow, ChokeModel, ChokeOperatingPoint, ChokeRegime, critical_pressure_ratio,
    effective_area, orifice_volume_flow,
};
pub use discharge::{CdTable, resolve_cd};
pub use equipment::{LumpedLoss, PassThrough, PressureVessel, equipment_for};
pub use erosion::{ErosionalCheck, HydraulicsConfig, erosional_limit};
pub use error::{ComponentError, ComponentResult};
pub use friction::{LAMINAR_LIMIT, friction_factor, reynolds};
pub use segment::{LocalFlow, SegmentHydraulics, SegmentResult};
pub use traits::{EquipmentOutcome, InletConditions, NodeEquipment};
