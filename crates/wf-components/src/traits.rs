//! Core traits for node equipment models.

use wf_core::units::{Density, MassRate, Pressure, Temperature, Velocity};
use wf_fluids::FluidSpec;

use crate::choke::ChokeOperatingPoint;
use crate::error::ComponentResult;

/// Flow arriving at a node through its incoming segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InletConditions {
    pub pressure: Pressure,
    pub temperature: Temperature,
    pub density: Density,
    /// Velocity in the incoming segment.
    pub velocity: Velocity,
    pub mdot: MassRate,
}

/// Result of passing flow through a node's equipment.
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentOutcome {
    pub outlet_pressure: Pressure,
    /// Operating point when the equipment is a choke.
    pub choke: Option<ChokeOperatingPoint>,
    pub warnings: Vec<String>,
}

impl EquipmentOutcome {
    pub fn unchanged(inlet: &InletConditions) -> Self {
        Self {
            outlet_pressure: inlet.pressure,
            choke: None,
            warnings: Vec::new(),
        }
    }
}

/// Equipment sitting at a node in the chain.
///
/// Implementations are deterministic functions of the inlet conditions and
/// their parameters, so a solve can evaluate them repeatedly per iteration.
pub trait NodeEquipment: Send + Sync {
    /// Equipment name for warnings and reports.
    fn name(&self) -> &str;

    /// Pressure leaving the node for the given inlet conditions.
    ///
    /// Equipment without a pressure drop (wellhead, vessels, junctions)
    /// returns the inlet pressure, possibly with warnings attached.
    fn outlet_pressure(
        &self,
        inlet: &InletConditions,
        fluid: &FluidSpec,
    ) -> ComponentResult<EquipmentOutcome>;
}
