//! Node equipment implementations and the role-to-model mapping.

use wf_core::units::{Pressure, pa, to_kpa};
use wf_fluids::FluidSpec;
use wf_graph::{NodeRole, NodeSpec};

use crate::choke::ChokeModel;
use crate::common::{check_finite, dynamic_pressure};
use crate::error::ComponentResult;
use crate::traits::{EquipmentOutcome, InletConditions, NodeEquipment};

/// Local loss `K·ρv²/2` (safety valves, filters, strainers).
#[derive(Debug, Clone)]
pub struct LumpedLoss {
    name: String,
    pub k_factor: f64,
}

impl LumpedLoss {
    pub fn new(name: impl Into<String>, k_factor: f64) -> Self {
        Self {
            name: name.into(),
            k_factor,
        }
    }

    pub fn pressure_drop(&self, inlet: &InletConditions) -> f64 {
        self.k_factor * dynamic_pressure(inlet.density.value, inlet.velocity.value)
    }
}

impl NodeEquipment for LumpedLoss {
    fn name(&self) -> &str {
        &self.name
    }

    fn outlet_pressure(
        &self,
        inlet: &InletConditions,
        _fluid: &FluidSpec,
    ) -> ComponentResult<EquipmentOutcome> {
        let dp = self.pressure_drop(inlet);
        check_finite(dp, "lumped loss pressure drop")?;
        Ok(EquipmentOutcome {
            outlet_pressure: inlet.pressure - pa(dp),
            choke: None,
            warnings: Vec::new(),
        })
    }
}

/// Vessel or terminal with an optional maximum operating pressure.
#[derive(Debug, Clone)]
pub struct PressureVessel {
    name: String,
    pub max_operating_pressure: Option<Pressure>,
}

impl PressureVessel {
    pub fn new(name: impl Into<String>, max_operating_pressure: Option<Pressure>) -> Self {
        Self {
            name: name.into(),
            max_operating_pressure,
        }
    }
}

impl NodeEquipment for PressureVessel {
    fn name(&self) -> &str {
        &self.name
    }

    fn outlet_pressure(
        &self,
        inlet: &InletConditions,
        _fluid: &FluidSpec,
    ) -> ComponentResult<EquipmentOutcome> {
        let mut outcome = EquipmentOutcome::unchanged(inlet);
        if let Some(mop) = self.max_operating_pressure {
            if inlet.pressure > mop {
                outcome.warnings.push(format!(
                    "{}: pressure {:.1} kPa exceeds maximum operating pressure {:.1} kPa",
                    self.name,
                    to_kpa(inlet.pressure),
                    to_kpa(mop)
                ));
            }
        }
        Ok(outcome)
    }
}

/// No equipment: wellhead, junctions.
#[derive(Debug, Clone)]
pub struct PassThrough {
    name: String,
}

impl PassThrough {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl NodeEquipment for PassThrough {
    fn name(&self) -> &str {
        &self.name
    }

    fn outlet_pressure(
        &self,
        inlet: &InletConditions,
        _fluid: &FluidSpec,
    ) -> ComponentResult<EquipmentOutcome> {
        Ok(EquipmentOutcome::unchanged(inlet))
    }
}

impl NodeEquipment for ChokeModel {
    fn name(&self) -> &str {
        ChokeModel::name(self)
    }

    fn outlet_pressure(
        &self,
        inlet: &InletConditions,
        fluid: &FluidSpec,
    ) -> ComponentResult<EquipmentOutcome> {
        let op = ChokeModel::outlet_pressure(self, inlet.pressure, inlet.temperature, inlet.mdot, fluid)?;
        Ok(EquipmentOutcome {
            outlet_pressure: op.outlet_pressure,
            warnings: op.warning.iter().cloned().collect(),
            choke: Some(op),
        })
    }
}

/// Build the equipment model for a node from its role.
pub fn equipment_for(node: &NodeSpec) -> ComponentResult<Box<dyn NodeEquipment>> {
    let name = node.name.clone();
    Ok(match &node.role {
        NodeRole::SafetyValve { k_factor } | NodeRole::Filter { k_factor } => {
            Box::new(LumpedLoss::new(name, *k_factor))
        }
        NodeRole::Choke(settings) => Box::new(ChokeModel::from_settings(name, settings)?),
        NodeRole::Separator {
            max_operating_pressure,
        }
        | NodeRole::Flare {
            max_operating_pressure,
        } => Box::new(PressureVessel::new(name, *max_operating_pressure)),
        NodeRole::Wellhead | NodeRole::Generic => Box::new(PassThrough::new(name)),
    })
}
