//! Meteorological formulas used in the surface layer analyses.
//!
//! The formulas here are evaluated on values that are already known to be present. They do no
//! range checking, so a heat flux of zero gives an infinite Obukhov length and a pressure of zero
//! gives an infinite potential temperature. Those values flow through to the charts as they would
//! in any other numerical tool.
use metfor::{Celsius, HectoPascal, Kelvin, Meters, MetersPSec, Quantity};

/// Von Kármán constant.
pub const VON_KARMAN: f64 = 0.41;

/// Acceleration due to gravity in m/s².
pub const GRAVITY: f64 = 9.81;

/// Reference pressure for potential temperature.
pub const P0: HectoPascal = HectoPascal(1000.0);

// Poisson constant, R/cp for dry air.
const KAPPA: f64 = 0.286;

/// Potential temperature given the temperature and pressure.
#[inline]
pub fn potential_temperature<T>(temperature: T, pressure: HectoPascal) -> Kelvin
where
    Kelvin: From<T>,
{
    let t = Kelvin::from(temperature).unpack();

    Kelvin(t * (P0.unpack() / pressure.unpack()).powf(KAPPA))
}

/// Vapor pressure over liquid water at the dew point.
#[inline]
pub fn vapor_pressure(dew_point: Celsius) -> HectoPascal {
    let td = dew_point.unpack();

    HectoPascal(6.112 * (17.67 * td / (td + 243.5)).exp())
}

/// Specific humidity in kg/kg from the vapor pressure and the air pressure.
#[inline]
pub fn specific_humidity(vapor_pressure: HectoPascal, pressure: HectoPascal) -> f64 {
    let e = vapor_pressure.unpack();

    0.622 * e / (pressure.unpack() - 0.378 * e)
}

/// Obukhov length.
///
/// `heat_flux` is the kinematic heat flux w'T' in K m/s. There is no guard against a zero flux,
/// in that case the result is infinite (or NaN if the friction velocity is zero too).
#[inline]
pub fn obukhov_length<T>(friction_velocity: MetersPSec, heat_flux: f64, temperature: T) -> Meters
where
    Kelvin: From<T>,
{
    let u_star = friction_velocity.unpack();
    let t = Kelvin::from(temperature).unpack();

    Meters(-(u_star.powi(3) / (VON_KARMAN * heat_flux)) * (t / GRAVITY))
}

/// A component of the Reynolds stress tensor, ρ a' b'.
#[inline]
pub fn stress_component(fluct_a: f64, fluct_b: f64, density: f64) -> f64 {
    fluct_a * fluct_b * density
}

/// Friction velocity from the kinematic momentum fluxes u'w' and v'w'.
#[inline]
pub fn friction_velocity(uw: f64, vw: f64) -> MetersPSec {
    MetersPSec((uw * uw + vw * vw).powf(0.25))
}

/// Turbulent kinetic energy per unit mass from the velocity variances.
#[inline]
pub fn turbulent_kinetic_energy(var_u: f64, var_v: f64, var_w: f64) -> f64 {
    0.5 * (var_u + var_v + var_w)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::approx_equal;

    #[test]
    fn test_potential_temperature() {
        let theta = potential_temperature(Celsius(15.0), HectoPascal(1000.0));
        assert!(approx_equal(theta.unpack(), 288.15, 1.0e-9));

        let theta = potential_temperature(Kelvin(280.0), HectoPascal(850.0));
        assert!(approx_equal(
            theta.unpack(),
            280.0 * (1000.0f64 / 850.0).powf(0.286),
            1.0e-9
        ));
    }

    #[test]
    fn test_vapor_pressure_and_humidity() {
        let e = vapor_pressure(Celsius(0.0));
        assert!(approx_equal(e.unpack(), 6.112, 1.0e-9));

        let e = vapor_pressure(Celsius(10.0));
        assert!(approx_equal(e.unpack(), 12.27, 0.01));

        let q = specific_humidity(e, HectoPascal(1000.0));
        assert!(approx_equal(q, 0.622 * e.unpack() / (1000.0 - 0.378 * e.unpack()), 1.0e-12));
        assert!(q > 0.0075 && q < 0.0078);
    }

    #[test]
    fn test_obukhov_length() {
        // Unstable daytime case, positive heat flux gives a negative length
        let l = obukhov_length(MetersPSec(0.3), 0.1, Celsius(20.0));
        let expected = -(0.027 / (0.41 * 0.1)) * (293.15 / 9.81);
        assert!(approx_equal(l.unpack(), expected, 1.0e-9));
        assert!(l.unpack() < 0.0);

        // Same with the temperature already in Kelvin
        let lk = obukhov_length(MetersPSec(0.3), 0.1, Kelvin(293.15));
        assert!(approx_equal(l.unpack(), lk.unpack(), 1.0e-9));

        // Stable case
        assert!(obukhov_length(MetersPSec(0.3), -0.02, Celsius(10.0)).unpack() > 0.0);
    }

    #[test]
    fn test_obukhov_length_zero_flux() {
        let l = obukhov_length(MetersPSec(0.3), 0.0, Celsius(10.0));
        assert!(l.unpack().is_infinite());

        let l = obukhov_length(MetersPSec(0.0), 0.0, Celsius(10.0));
        assert!(l.unpack().is_nan());
    }

    #[test]
    fn test_stress_and_friction_velocity() {
        assert!(approx_equal(stress_component(0.5, -0.2, 1.2), -0.12, 1.0e-12));

        let u_star = friction_velocity(-0.09, 0.0);
        assert!(approx_equal(u_star.unpack(), 0.3, 1.0e-12));

        let u_star = friction_velocity(0.03, 0.04);
        assert!(approx_equal(u_star.unpack(), 0.05f64.sqrt(), 1.0e-12));
    }

    #[test]
    fn test_tke() {
        assert!(approx_equal(turbulent_kinetic_energy(1.0, 2.0, 3.0), 3.0, 1.0e-12));
    }
}
