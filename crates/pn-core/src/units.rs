// pn-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, Length as UomLength, MassDensity as UomMassDensity,
    Pressure as UomPressure,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Density = UomMassDensity;
pub type Length = UomLength;
pub type Pressure = UomPressure;

#[inline]
fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
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
pub fn to_m(v: Length) -> f64 {
    use uom::si::length::meter;
    v.get::<meter>()
}

#[inline]
pub fn to_bar(v: Pressure) -> f64 {
    use uom::si::pressure::bar;
    v.get::<bar>()
}

pub mod constants {
    pub const G0_MPS2: f64 = 9.806_65;

    /// Standard sea-level atmosphere.
    pub const P_ATM_PA: f64 = 101_325.0;
}

#[inline]
fn g0() -> Accel {
    use uom::si::acceleration::meter_per_second_squared;
    Accel::new::<meter_per_second_squared>(constants::G0_MPS2)
}

/// Height of a liquid column of density `rho` exerting pressure `p`.
pub fn pressure_head(p: Pressure, rho: Density) -> Length {
    p / (rho * g0())
}

/// Atmospheric pressure at `altitude` above sea level (standard barometric formula).
pub fn barometric_pressure(altitude: Length) -> Pressure {
    let h = to_m(altitude);
    pa(constants::P_ATM_PA * (1.0 - 2.255_77e-5 * h).powf(5.255_88))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _b = bar(1.0);
        let _l = m(2.0);
        let _rho = kg_per_m3(998.2);
        let _g0 = g0();
    }

    #[test]
    fn one_bar_of_water_is_about_ten_meters() {
        let h = to_m(pressure_head(bar(1.0), kg_per_m3(1000.0)));
        assert!((h - 10.197).abs() < 1e-3, "got {h}");
    }

    #[test]
    fn sea_level_is_standard_atmosphere() {
        let p = to_bar(barometric_pressure(m(0.0)));
        assert!((p - 1.013_25).abs() < 1e-12, "got {p}");
    }

    #[test]
    fn pressure_drops_with_altitude() {
        let low = to_bar(barometric_pressure(m(0.0)));
        let high = to_bar(barometric_pressure(m(1_000.0)));
        assert!(high < low);
        assert!((high - 0.8988).abs() < 1e-3, "got {high}");
    }
}
