//! Daily insolation, day length and potential evapotranspiration.
//!
//! An astronomical day-length formulation combined with a clear/cloudy-sky
//! shortwave/longwave energy balance drives a Priestley-Taylor style demand
//! function. Psychrometric constant and latent heat of vaporization come
//! from a stepwise temperature lookup (after W. Cramer).

use super::{DAYS_IN_MONTH, DAYS_PER_YEAR, MIDMONTH_DAY, MONTHS};
use std::f64::consts::PI;

/// Fraction of net longwave escaping under full cloud.
const LONGWAVE_CLOUD_BASE: f64 = 0.2;
/// Net upward longwave scale (W/m²).
const LONGWAVE_SCALE: f64 = 107.0;
/// Solar constant (W/m²).
const SOLAR_CONSTANT: f64 = 1360.0;
/// Clear-sky shortwave transmission.
const SHORTWAVE_CLEAR: f64 = 0.25;
/// Cloud contribution to shortwave transmission.
const SHORTWAVE_CLOUD: f64 = 0.5;
/// Surface albedo.
const ALBEDO: f64 = 0.17;

/// Stepwise psychrometric-constant table: (ceiling temperature °C, γ Pa/K).
const GAMMA_TABLE: [(f64, f64); 11] = [
    (-5.0, 64.6),
    (0.0, 64.9),
    (5.0, 65.2),
    (10.0, 65.6),
    (15.0, 65.9),
    (20.0, 66.1),
    (25.0, 66.5),
    (30.0, 66.8),
    (35.0, 67.2),
    (40.0, 67.5),
    (45.0, 67.8),
];

/// Stepwise latent-heat table: (ceiling temperature °C, λ MJ/kg).
const LAMBDA_TABLE: [(f64, f64); 11] = [
    (-5.0, 2.513),
    (0.0, 2.501),
    (5.0, 2.489),
    (10.0, 2.477),
    (15.0, 2.465),
    (20.0, 2.454),
    (25.0, 2.442),
    (30.0, 2.430),
    (35.0, 2.418),
    (40.0, 2.406),
    (45.0, 2.394),
];

/// Look up γ (Pa/K) and λ (MJ/kg) for a temperature. Stepwise to the first
/// table row at or above `tc`, clamped at the table ends.
pub fn gamma_lambda(tc: f64) -> (f64, f64) {
    if tc > GAMMA_TABLE[GAMMA_TABLE.len() - 1].0 {
        return (
            GAMMA_TABLE[GAMMA_TABLE.len() - 1].1,
            LAMBDA_TABLE[LAMBDA_TABLE.len() - 1].1,
        );
    }
    for (g, l) in GAMMA_TABLE.iter().zip(LAMBDA_TABLE.iter()) {
        if tc <= g.0 {
            return (g.1, l.1);
        }
    }
    // Unreachable: the first branch covers everything above the last row.
    (
        GAMMA_TABLE[GAMMA_TABLE.len() - 1].1,
        LAMBDA_TABLE[LAMBDA_TABLE.len() - 1].1,
    )
}

/// Radiation and evaporative-demand summary for one cell.
#[derive(Debug, Clone)]
pub struct Insolation {
    /// Potential evapotranspiration per day (mm/day).
    pub daily_pet: [f64; DAYS_PER_YEAR],
    /// Day length at each mid-month day (hours).
    pub day_length: [f64; MONTHS],
    /// Mid-month daily insolation (J/m²/day).
    pub sun: [f64; MONTHS],
    /// Annual solar-radiation index over months with positive mean
    /// temperature (GJ-scale).
    pub rad0: f64,
}

/// Compute daily PET, mid-month day length/insolation and the annual
/// radiation index from latitude and the daily temperature and cloud series.
pub fn insolation(
    latitude: f64,
    daily_temperature: &[f64; DAYS_PER_YEAR],
    daily_cloud: &[f64; DAYS_PER_YEAR],
    monthly_temperature: &[f64; MONTHS],
) -> Insolation {
    let dip = PI / 180.0;

    let mut daily_pet = [0.0; DAYS_PER_YEAR];
    let mut day_length = [0.0; MONTHS];
    let mut sun = [0.0; MONTHS];
    let mut rad0 = 0.0;

    let mut day = 0usize; // 1-based day of year once incremented
    for month in 0..MONTHS {
        for _ in 0..DAYS_IN_MONTH[month] {
            day += 1;
            let t = daily_temperature[day - 1];
            let cloud = daily_cloud[day - 1] / 100.0;
            let (gamma, lambda) = gamma_lambda(t);

            // Net longwave loss grows with clear sky and cold air.
            let rl = (LONGWAVE_CLOUD_BASE + (1.0 - LONGWAVE_CLOUD_BASE) * cloud)
                * (LONGWAVE_SCALE - t);

            // Net shortwave with orbital eccentricity.
            let qo = SOLAR_CONSTANT
                * (1.0 + 2.0 * 0.01675 * (dip * (360.0 * day as f64) / 365.0).cos());
            let rs = qo * (SHORTWAVE_CLEAR + SHORTWAVE_CLOUD * cloud) * (1.0 - ALBEDO);

            // Solar declination and day-length half-angle from the
            // energy-balance crossover (net radiation = 0).
            let decl = -dip * 23.4 * (dip * 360.0 * (day as f64 + 10.0) / 365.0).cos();
            let cla = (latitude * dip).cos() * decl.cos();
            let sla = (latitude * dip).sin() * decl.sin();
            let u = rs * sla - rl;
            let v = rs * cla;
            let ho = if u >= v {
                PI
            } else if u <= -v {
                0.0
            } else {
                (-u / v).acos()
            };

            // Saturation vapor-pressure slope; exp saturates to +inf on
            // overflow rather than erroring.
            let sat = (2.5e6 * ((17.27 * t) / (237.3 + t)).exp()) / ((237.3 + t) * (237.3 + t));
            let fd = if sat + gamma != 0.0 && gamma != 0.0 {
                (3600.0 / (lambda * 1e6)) * (sat / (sat + gamma))
            } else {
                0.0
            };

            daily_pet[day - 1] =
                fd * 2.0 * ((rs * sla - rl) * ho + rs * cla * ho.sin()) / (PI / 12.0);

            let hours = if ho == 0.0 { 0.0 } else { 24.0 * (ho / PI) };

            if day == MIDMONTH_DAY[month] {
                day_length[month] = hours;

                // Pure-sunrise half-angle (shortwave only) for insolation.
                let us = rs * sla;
                let vs = rs * cla;
                let hos = if us >= vs {
                    PI
                } else if us <= -vs {
                    0.0
                } else {
                    (-us / vs).acos()
                };

                sun[month] =
                    2.0 * (rs * sla * hos + rs * cla * hos.sin()) * (3600.0 * 12.0 / PI);
                if sun[month] <= 0.0 {
                    sun[month] = 0.0;
                }

                if monthly_temperature[month] > 0.0 {
                    rad0 += DAYS_IN_MONTH[month] as f64 * sun[month] * 1e-9 * 0.5;
                }
            }
        }
    }

    Insolation {
        daily_pet,
        day_length,
        sun,
        rad0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::daily::interpolate_daily;

    #[test]
    fn test_gamma_lambda_stepwise_and_clamped() {
        assert_eq!(gamma_lambda(-20.0), (64.6, 2.513));
        assert_eq!(gamma_lambda(-5.0), (64.6, 2.513));
        // Just above a step boundary rounds up to the next row.
        assert_eq!(gamma_lambda(-4.9), (64.9, 2.501));
        assert_eq!(gamma_lambda(22.0), (66.5, 2.442));
        assert_eq!(gamma_lambda(60.0), (67.8, 2.394));
    }

    #[test]
    fn test_equatorial_day_length_near_twelve_hours() {
        let temperature = [25.0; MONTHS];
        let cloud = [50.0; MONTHS];
        let dtemp = interpolate_daily(&temperature);
        let dcloud = interpolate_daily(&cloud);
        let result = insolation(0.0, &dtemp, &dcloud, &temperature);
        for m in 0..MONTHS {
            // The energy-balance crossover shifts sunrise slightly, but the
            // equator stays near 12 h year-round.
            assert!(
                (result.day_length[m] - 12.0).abs() < 2.0,
                "month {m}: day length {}",
                result.day_length[m]
            );
            assert!(result.sun[m] > 0.0);
        }
        assert!(result.rad0 > 0.0);
    }

    #[test]
    fn test_polar_winter_has_zero_day_length() {
        let temperature = [-20.0; MONTHS];
        let cloud = [50.0; MONTHS];
        let dtemp = interpolate_daily(&temperature);
        let dcloud = interpolate_daily(&cloud);
        let result = insolation(80.0, &dtemp, &dcloud, &temperature);
        // Mid-January at 80°N is polar night.
        assert_eq!(result.day_length[0], 0.0);
        // Cold months contribute nothing to the radiation index.
        assert_eq!(result.rad0, 0.0);
    }

    #[test]
    fn test_summer_pet_exceeds_winter_pet_in_north() {
        let temperature = [-5.0, -3.0, 2.0, 7.0, 12.0, 16.0, 20.0, 19.0, 14.0, 8.0, 2.0, -3.0];
        let cloud = [60.0; MONTHS];
        let dtemp = interpolate_daily(&temperature);
        let dcloud = interpolate_daily(&cloud);
        let result = insolation(46.5, &dtemp, &dcloud, &temperature);
        let mid_january = result.daily_pet[15];
        let mid_july = result.daily_pet[196];
        assert!(mid_july > mid_january);
        assert!(mid_july > 0.0);
    }
}
