// wf-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, DynamicViscosity as UomDynamicViscosity, Length as UomLength,
    MassDensity as UomMassDensity, MassRate as UomMassRate, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, Velocity as UomVelocity,
    VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type DynVisc = UomDynamicViscosity;
pub type Length = UomLength;
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn kpa(v: f64) -> Pressure {
    use uom::si::pressure::kilopascal;
    Pressure::new::<kilopascal>(v)
}

/// Pressure in kPa, the working unit of the hydraulics model.
#[inline]
pub fn to_kpa(p: Pressure) -> f64 {
    use uom::si::pressure::kilopascal;
    p.get::<kilopascal>()
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn to_kelvin(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn pa_s(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn m3ps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v)
}

/// Process-wide physical constants and reference conditions.
pub mod constants {
    pub const G0_MPS2: f64 = 9.806_65;

    /// Universal gas constant in kPa·m³/(kmol·K).
    pub const R_KPA_M3_PER_KMOL_K: f64 = 8.314_462_618;

    /// Universal gas constant in J/(kmol·K).
    pub const R_J_PER_KMOL_K: f64 = 8_314.462_618;

    /// Standard-condition pressure (kPa).
    pub const P_SC_KPA: f64 = 101.325;

    /// Standard-condition temperature (K), 15 °C.
    pub const T_SC_K: f64 = 288.15;

    /// Compressibility factor at standard conditions.
    pub const Z_SC: f64 = 1.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _mdot = kgps(1.2);
        let _l = m(2.0);
        let _rho = kg_per_m3(800.0);
        let _mu = pa_s(1e-3);
        let _v = mps(3.0);
        let _q = m3ps(0.1);
    }

    #[test]
    fn kilopascal_round_trip() {
        let p = kpa(5000.0);
        assert!((p.value - 5.0e6).abs() < 1e-6);
        assert!((to_kpa(p) - 5000.0).abs() < 1e-9);
        assert!((to_kpa(pa(101_325.0)) - constants::P_SC_KPA).abs() < 1e-9);
    }

    #[test]
    fn kelvin_round_trip() {
        assert!((to_kelvin(k(333.0)) - 333.0).abs() < 1e-12);
        assert!((to_kelvin(k(constants::T_SC_K)) - 288.15).abs() < 1e-12);
    }
}
