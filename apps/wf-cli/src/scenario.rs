//! Scenario file schema and compilation into solver inputs.
//!
//! Scenario files are YAML or JSON. All quantities are SI, with the unit in
//! the field name.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use wf_core::units::{k, kg_per_m3, kpa, m, pa_s};
use wf_core::{NodeId, SegmentId};
use wf_fluids::{FlowUnit, FluidSpec, StandardRate};
use wf_graph::{
    ChokeOpening, ChokeSettings, DischargeSource, Network, NodeRole, NodeSpec, OpeningLaw,
    SegmentGeometry, SegmentSpec,
};
use wf_solver::{Scenario, SolveOptions};

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioDef {
    pub name: String,
    pub fluid: FluidDef,
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub segments: Vec<SegmentDef>,
    #[serde(default)]
    pub options: OptionsDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FluidKindDef {
    Gas,
    Liquid,
    TwoPhase,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RateUnitDef {
    Mscfd,
    Scmd,
    Stbd,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateDef {
    pub value: f64,
    pub unit: RateUnitDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FluidDef {
    pub kind: FluidKindDef,
    pub inlet_pressure_kpa: f64,
    pub inlet_temperature_k: f64,
    #[serde(default)]
    pub molecular_weight: Option<f64>,
    #[serde(default)]
    pub k_ratio: Option<f64>,
    #[serde(default)]
    pub z_factor: Option<f64>,
    #[serde(default)]
    pub liquid_density_kg_m3: Option<f64>,
    #[serde(default)]
    pub gas_mass_fraction: Option<f64>,
    #[serde(default)]
    pub viscosity_pa_s: Option<f64>,
    pub rate: RateDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeDef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub role: RoleDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OpeningLawDef {
    #[default]
    Linear,
    Quadratic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DischargeDef {
    Fixed { cd: f64 },
    OpeningTable,
    BoreTable,
    Custom { steps: Vec<(f64, f64)> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoleDef {
    Wellhead,
    SafetyValve {
        k_factor: f64,
    },
    Filter {
        k_factor: f64,
    },
    Choke {
        bore_m: f64,
        /// Omit for a fixed bean choke.
        #[serde(default)]
        percent_open: Option<f64>,
        #[serde(default)]
        law: OpeningLawDef,
        /// Defaults to the opening table for adjustable chokes and the bore
        /// table for fixed ones.
        #[serde(default)]
        discharge: Option<DischargeDef>,
    },
    Separator {
        #[serde(default)]
        max_operating_pressure_kpa: Option<f64>,
    },
    Flare {
        #[serde(default)]
        max_operating_pressure_kpa: Option<f64>,
    },
    Generic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SegmentDef {
    pub id: String,
    pub from: String,
    pub to: String,
    pub length_m: f64,
    pub diameter_m: f64,
    pub roughness_m: f64,
    #[serde(default)]
    pub k_fittings: f64,
    #[serde(default)]
    pub elevation_change_m: f64,
}

/// Overrides for [`SolveOptions`]; unset fields keep the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OptionsDef {
    #[serde(default)]
    pub max_iterations: Option<usize>,
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub relaxation: Option<f64>,
    #[serde(default)]
    pub initial_guess_fraction: Option<f64>,
    #[serde(default)]
    pub erosional_c: Option<f64>,
    #[serde(default)]
    pub mach_limit: Option<f64>,
}

/// Everything needed to run one scenario.
#[derive(Debug, Clone)]
pub struct CompiledScenario {
    pub scenario: Scenario,
    pub options: SolveOptions,
}

impl CompiledScenario {
    pub fn network(&self) -> CliResult<Network> {
        Ok(Network::from_specs(
            self.scenario.nodes.clone(),
            self.scenario.segments.clone(),
        )?)
    }
}

/// Read a scenario file; `.json` is parsed as JSON, anything else as YAML.
pub fn load(path: &Path) -> CliResult<ScenarioDef> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}

fn scenario_err(what: String) -> CliError {
    CliError::Scenario { what }
}

impl FluidDef {
    fn compile(&self) -> CliResult<FluidSpec> {
        let unit = match self.rate.unit {
            RateUnitDef::Mscfd => FlowUnit::Mscfd,
            RateUnitDef::Scmd => FlowUnit::Scmd,
            RateUnitDef::Stbd => FlowUnit::Stbd,
        };
        let rate = StandardRate::new(self.rate.value, unit);
        let p = kpa(self.inlet_pressure_kpa);
        let t = k(self.inlet_temperature_k);
        let require = |value: Option<f64>, what: &str| {
            value.ok_or_else(|| scenario_err(format!("fluid is missing {what}")))
        };

        let gas = |this: &Self| -> CliResult<FluidSpec> {
            Ok(FluidSpec::gas(
                p,
                t,
                require(this.molecular_weight, "molecular_weight")?,
                require(this.k_ratio, "k_ratio")?,
                this.z_factor.unwrap_or(1.0),
                rate,
            ))
        };

        let mut fluid = match self.kind {
            FluidKindDef::Gas => gas(self)?,
            FluidKindDef::Liquid => FluidSpec::liquid(
                p,
                t,
                kg_per_m3(require(self.liquid_density_kg_m3, "liquid_density_kg_m3")?),
                rate,
            ),
            FluidKindDef::TwoPhase => FluidSpec::two_phase(
                gas(self)?,
                kg_per_m3(require(self.liquid_density_kg_m3, "liquid_density_kg_m3")?),
                require(self.gas_mass_fraction, "gas_mass_fraction")?,
            ),
        };
        if let Some(mu) = self.viscosity_pa_s {
            fluid = fluid.with_viscosity(pa_s(mu));
        }
        fluid.validate()?;
        Ok(fluid)
    }
}

impl RoleDef {
    fn compile(&self) -> NodeRole {
        let mop = |v: &Option<f64>| v.map(kpa);
        match self {
            RoleDef::Wellhead => NodeRole::Wellhead,
            RoleDef::SafetyValve { k_factor } => NodeRole::SafetyValve {
                k_factor: *k_factor,
            },
            RoleDef::Filter { k_factor } => NodeRole::Filter {
                k_factor: *k_factor,
            },
            RoleDef::Choke {
                bore_m,
                percent_open,
                law,
                discharge,
            } => {
                let opening = match percent_open {
                    Some(percent) => ChokeOpening::PercentOpen {
                        percent: *percent,
                        law: match law {
                            OpeningLawDef::Linear => OpeningLaw::Linear,
                            OpeningLawDef::Quadratic => OpeningLaw::Quadratic,
                        },
                    },
                    None => ChokeOpening::FixedBore,
                };
                let discharge = match discharge {
                    Some(DischargeDef::Fixed { cd }) => DischargeSource::Fixed(*cd),
                    Some(DischargeDef::OpeningTable) => DischargeSource::OpeningTable,
                    Some(DischargeDef::BoreTable) => DischargeSource::BoreTable,
                    Some(DischargeDef::Custom { steps }) => DischargeSource::Custom(steps.clone()),
                    None if percent_open.is_some() => DischargeSource::OpeningTable,
                    None => DischargeSource::BoreTable,
                };
                NodeRole::Choke(ChokeSettings {
                    bore: m(*bore_m),
                    opening,
                    discharge,
                })
            }
            RoleDef::Separator {
                max_operating_pressure_kpa,
            } => NodeRole::Separator {
                max_operating_pressure: mop(max_operating_pressure_kpa),
            },
            RoleDef::Flare {
                max_operating_pressure_kpa,
            } => NodeRole::Flare {
                max_operating_pressure: mop(max_operating_pressure_kpa),
            },
            RoleDef::Generic => NodeRole::Generic,
        }
    }
}

impl OptionsDef {
    fn apply(&self, mut options: SolveOptions) -> SolveOptions {
        if let Some(v) = self.max_iterations {
            options.max_iterations = v;
        }
        if let Some(v) = self.tolerance {
            options.tolerance = v;
        }
        if let Some(v) = self.relaxation {
            options.relaxation = v;
        }
        if let Some(v) = self.initial_guess_fraction {
            options.initial_guess_fraction = v;
        }
        if let Some(v) = self.erosional_c {
            options.hydraulics.erosional_c = v;
        }
        if let Some(v) = self.mach_limit {
            options.hydraulics.mach_limit = v;
        }
        options
    }
}

impl ScenarioDef {
    /// Resolve string ids and build solver inputs.
    pub fn compile(&self) -> CliResult<CompiledScenario> {
        let mut ids: HashMap<&str, NodeId> = HashMap::new();
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (i, def) in self.nodes.iter().enumerate() {
            let id = NodeId::from_index(i as u32);
            if ids.insert(def.id.as_str(), id).is_some() {
                return Err(scenario_err(format!("duplicate node id '{}'", def.id)));
            }
            nodes.push(NodeSpec {
                id,
                name: def.name.clone().unwrap_or_else(|| def.id.clone()),
                role: def.role.compile(),
            });
        }

        let lookup = |node: &str, segment: &str| {
            ids.get(node).copied().ok_or_else(|| {
                scenario_err(format!("segment '{segment}' references unknown node '{node}'"))
            })
        };
        let mut segments = Vec::with_capacity(self.segments.len());
        for (i, def) in self.segments.iter().enumerate() {
            let geometry = SegmentGeometry::pipe(m(def.length_m), m(def.diameter_m), m(def.roughness_m))
                .with_fittings(def.k_fittings)
                .with_elevation_change(m(def.elevation_change_m));
            segments.push(SegmentSpec {
                id: SegmentId::from_index(i as u32),
                name: def.id.clone(),
                from: lookup(&def.from, &def.id)?,
                to: lookup(&def.to, &def.id)?,
                geometry,
            });
        }

        Ok(CompiledScenario {
            scenario: Scenario {
                name: self.name.clone(),
                nodes,
                segments,
                fluid: self.fluid.compile()?,
            },
            options: self.options.apply(SolveOptions::default()),
        })
    }
}
