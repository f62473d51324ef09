//! wf-fluids: fluid property model for wellflow.
//!
//! Provides:
//! - Fluid specification (gas, liquid, fixed-split two-phase) with validation
//! - Standard-condition rate units (MSCF/d, SCM/d, STB/d)
//! - Density, viscosity and speed of sound at a local state
//! - Standard-to-actual flow conversion that conserves mass
//!
//! Properties are closed-form: a real gas with a constant compressibility
//! factor, an incompressible liquid, and a homogeneous no-slip mixture of the
//! two. Phase change is not modelled.
//!
//! # Example
//!
//! ```
//! use wf_core::units::{k, kpa};
//! use wf_fluids::{FluidSpec, StandardRate, density, mass_flow, standard_to_actual};
//!
//! let gas = FluidSpec::gas(kpa(5000.0), k(333.0), 18.2, 1.3, 1.0, StandardRate::mscfd(10.0));
//! gas.validate().unwrap();
//!
//! let rho = density(kpa(5000.0), k(333.0), &gas);
//! let q = standard_to_actual(10.0, gas.rate.unit, kpa(5000.0), k(333.0), &gas);
//! let mdot = mass_flow(&gas);
//! assert!((rho.value * q.value - mdot.value).abs() < 1e-12);
//! ```

pub mod error;
pub mod pack;
pub mod properties;
pub mod spec;

pub use error::{FluidError, FluidResult};
pub use pack::PropertyPack;
pub use properties::{
    ViscosityDefaults, density, gas_density, mass_flow, mass_flow_for, speed_of_sound,
    standard_gas_density, standard_to_actual, viscosity,
};
pub use spec::{FlowUnit, FluidKind, FluidSpec, StandardRate};
