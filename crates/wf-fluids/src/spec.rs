//! Fluid specification supplied by the caller.

use std::fmt;

use wf_core::numeric::ensure_positive;
use wf_core::units::{Density, DynVisc, Pressure, Temperature, to_kelvin, to_kpa};

use crate::error::{FluidError, FluidResult};

const SECONDS_PER_DAY: f64 = 86_400.0;
const M3_PER_MSCF: f64 = 28.316_846_592;
const M3_PER_STB: f64 = 0.158_987_294_928;

/// Phase behavior of the produced fluid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluidKind {
    Gas,
    Liquid,
    /// Gas and liquid moving together with a fixed mass split (no slip, no flash).
    TwoPhase,
}

impl FluidKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FluidKind::Gas => "gas",
            FluidKind::Liquid => "liquid",
            FluidKind::TwoPhase => "two-phase",
        }
    }
}

/// Standard-condition flow-rate units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowUnit {
    /// Thousand standard cubic feet per day.
    Mscfd,
    /// Standard cubic metres per day.
    Scmd,
    /// Stock-tank barrels per day.
    Stbd,
}

impl FlowUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowUnit::Mscfd => "MSCF/d",
            FlowUnit::Scmd => "SCM/d",
            FlowUnit::Stbd => "STB/d",
        }
    }

    /// Standard volume rate in m³/s.
    pub fn to_m3_per_s(&self, value: f64) -> f64 {
        let m3_per_day = match self {
            FlowUnit::Mscfd => value * M3_PER_MSCF,
            FlowUnit::Scmd => value,
            FlowUnit::Stbd => value * M3_PER_STB,
        };
        m3_per_day / SECONDS_PER_DAY
    }

    /// Whether the unit measures a gas volume at standard conditions.
    pub fn is_gas_unit(&self) -> bool {
        !matches!(self, FlowUnit::Stbd)
    }

    /// Whether the unit measures a liquid volume.
    pub fn is_liquid_unit(&self) -> bool {
        !matches!(self, FlowUnit::Mscfd)
    }
}

impl fmt::Display for FlowUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flow rate at standard conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardRate {
    pub value: f64,
    pub unit: FlowUnit,
}

impl StandardRate {
    pub fn new(value: f64, unit: FlowUnit) -> Self {
        Self { value, unit }
    }

    pub fn mscfd(value: f64) -> Self {
        Self::new(value, FlowUnit::Mscfd)
    }

    pub fn scmd(value: f64) -> Self {
        Self::new(value, FlowUnit::Scmd)
    }

    pub fn stbd(value: f64) -> Self {
        Self::new(value, FlowUnit::Stbd)
    }

    pub fn m3_per_s(&self) -> f64 {
        self.unit.to_m3_per_s(self.value)
    }
}

/// Everything the property model needs to know about the produced fluid.
///
/// All quantities are SI. `k_ratio`, `z_factor` and `molecular_weight` only
/// matter for gas and two-phase fluids; `liquid_density` for liquid and
/// two-phase.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidSpec {
    pub kind: FluidKind,
    pub inlet_pressure: Pressure,
    pub inlet_temperature: Temperature,
    /// Gas compressibility factor Z.
    pub z_factor: f64,
    /// Heat capacity ratio k = cp/cv.
    pub k_ratio: f64,
    /// Molecular weight in kg/kmol.
    pub molecular_weight: f64,
    pub liquid_density: Option<Density>,
    /// Gas mass fraction (quality) of a two-phase stream.
    pub gas_mass_fraction: Option<f64>,
    pub rate: StandardRate,
    /// Overrides the configured default viscosity when set.
    pub viscosity: Option<DynVisc>,
}

impl FluidSpec {
    /// Real gas.
    pub fn gas(
        inlet_pressure: Pressure,
        inlet_temperature: Temperature,
        molecular_weight: f64,
        k_ratio: f64,
        z_factor: f64,
        rate: StandardRate,
    ) -> Self {
        Self {
            kind: FluidKind::Gas,
            inlet_pressure,
            inlet_temperature,
            z_factor,
            k_ratio,
            molecular_weight,
            liquid_density: None,
            gas_mass_fraction: None,
            rate,
            viscosity: None,
        }
    }

    /// Incompressible liquid.
    pub fn liquid(
        inlet_pressure: Pressure,
        inlet_temperature: Temperature,
        liquid_density: Density,
        rate: StandardRate,
    ) -> Self {
        Self {
            kind: FluidKind::Liquid,
            inlet_pressure,
            inlet_temperature,
            z_factor: 1.0,
            k_ratio: 1.0,
            molecular_weight: 0.0,
            liquid_density: Some(liquid_density),
            gas_mass_fraction: None,
            rate,
            viscosity: None,
        }
    }

    /// Gas with entrained liquid at a fixed gas mass fraction.
    ///
    /// A gas-unit `rate` describes the gas phase, an `STB/d` rate the liquid
    /// phase.
    pub fn two_phase(gas: FluidSpec, liquid_density: Density, gas_mass_fraction: f64) -> Self {
        Self {
            kind: FluidKind::TwoPhase,
            liquid_density: Some(liquid_density),
            gas_mass_fraction: Some(gas_mass_fraction),
            ..gas
        }
    }

    pub fn with_viscosity(mut self, viscosity: DynVisc) -> Self {
        self.viscosity = Some(viscosity);
        self
    }

    pub fn with_rate(mut self, rate: StandardRate) -> Self {
        self.rate = rate;
        self
    }

    pub fn has_gas(&self) -> bool {
        !matches!(self.kind, FluidKind::Liquid)
    }

    /// Reject physically invalid input before it reaches the property model.
    pub fn validate(&self) -> FluidResult<()> {
        let kind = self.kind.as_str();
        let positive = |what: &'static str, value: f64| {
            ensure_positive(value, what)
                .map(|_| ())
                .map_err(|_| FluidError::NonPhysical { what, value })
        };

        positive("inlet pressure", to_kpa(self.inlet_pressure))?;
        positive("inlet temperature", to_kelvin(self.inlet_temperature))?;
        if !self.rate.value.is_finite() || self.rate.value < 0.0 {
            return Err(FluidError::NonPhysical {
                what: "flow rate",
                value: self.rate.value,
            });
        }

        if self.has_gas() {
            positive("molecular weight", self.molecular_weight)?;
            positive("compressibility factor", self.z_factor)?;
            if !self.k_ratio.is_finite() || self.k_ratio <= 1.0 {
                return Err(FluidError::NonPhysical {
                    what: "heat capacity ratio",
                    value: self.k_ratio,
                });
            }
        }

        if !matches!(self.kind, FluidKind::Gas) {
            let rho = self.liquid_density.ok_or(FluidError::Missing {
                what: "liquid density",
                kind,
            })?;
            positive("liquid density", rho.value)?;
        }

        match self.kind {
            FluidKind::Gas if !self.rate.unit.is_gas_unit() => Err(FluidError::UnitMismatch {
                unit: self.rate.unit.as_str(),
                kind,
            }),
            FluidKind::Liquid if !self.rate.unit.is_liquid_unit() => {
                Err(FluidError::UnitMismatch {
                    unit: self.rate.unit.as_str(),
                    kind,
                })
            }
            FluidKind::TwoPhase => {
                let x = self.gas_mass_fraction.ok_or(FluidError::Missing {
                    what: "gas mass fraction",
                    kind,
                })?;
                if !x.is_finite() || x <= 0.0 || x >= 1.0 {
                    return Err(FluidError::NonPhysical {
                        what: "gas mass fraction",
                        value: x,
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
