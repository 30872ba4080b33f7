//! Soil-moisture-threshold fire climatology.
//!
//! A day is a potential fire day when root-zone wetness sits below the
//! PFT's flammability threshold, fire-free 0.05 above it, and decays
//! exponentially in between. Low productivity suppresses fire spread by
//! scaling the day count with annual NPP.

use super::DAYS_PER_YEAR;
use crate::core_types::PftParams;

/// Wetness band above the threshold over which flammability decays to zero.
const THRESHOLD_BAND: f64 = 0.05;
/// Annual NPP below which fire days are scaled down by npp/1000.
const FUEL_LIMITED_NPP: f64 = 1000.0;

/// Annual fire statistics for one PFT.
#[derive(Debug, Clone, Copy)]
pub struct FireRisk {
    /// Potential fire days per year, fuel-scaled.
    pub fire_days: f64,
    /// Wettest daily root-zone wetness of the year.
    pub wettest: f64,
    /// Driest daily root-zone wetness of the year.
    pub driest: f64,
    /// Fire days as a fraction of the year (before fuel scaling).
    pub fire_fraction: f64,
    /// Fuel-load-weighted burn fraction.
    pub burn_fraction: f64,
}

/// Count potential fire days from the daily root-zone wetness series.
pub fn fire_season(
    daily_wetness: &[f64; DAYS_PER_YEAR],
    params: &PftParams,
    lai: f64,
    npp: f64,
) -> FireRisk {
    let threshold = params.fire_wetness_threshold;
    let mut fire_days = 0.0;
    let mut wettest = 0.0_f64;
    let mut driest = 100.0_f64;

    for &wet in daily_wetness {
        let burn = if wet < threshold {
            1.0
        } else if wet > threshold + THRESHOLD_BAND {
            0.0
        } else {
            1.0 / (wet - threshold).exp()
        };
        wettest = wettest.max(wet);
        driest = driest.min(wet);
        fire_days += burn;
    }

    let fire_fraction = fire_days / 365.0;
    let litter = (lai / 5.0) * npp;
    let burn_fraction = litter * (1.0 - (-0.2 * fire_fraction.powf(1.5)).exp().powf(1.5));

    if npp < FUEL_LIMITED_NPP {
        // Sparse vegetation cannot carry fire; non-positive NPP (including
        // the infeasibility sentinel) means no fuel at all.
        fire_days *= (npp / FUEL_LIMITED_NPP).max(0.0);
    }

    FireRisk {
        fire_days,
        wettest,
        driest,
        fire_fraction,
        burn_fraction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::PftParams;
    use approx::assert_relative_eq;

    #[test]
    fn test_bone_dry_year_burns_every_day() {
        let wetness = [0.05; DAYS_PER_YEAR];
        let params = PftParams::tropical_raingreen(); // threshold 0.2
        let risk = fire_season(&wetness, &params, 3.0, 2000.0);
        assert_relative_eq!(risk.fire_days, 365.0, epsilon = 1e-9);
        assert_relative_eq!(risk.fire_fraction, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_wet_year_never_burns() {
        let wetness = [0.8; DAYS_PER_YEAR];
        let params = PftParams::tropical_raingreen();
        let risk = fire_season(&wetness, &params, 3.0, 2000.0);
        assert_eq!(risk.fire_days, 0.0);
        assert_eq!(risk.burn_fraction, 0.0);
    }

    #[test]
    fn test_band_interpolates_between_wet_and_dry() {
        let mut wetness = [0.8; DAYS_PER_YEAR];
        wetness[0] = 0.22; // inside the 0.2..0.25 band
        let params = PftParams::tropical_raingreen();
        let risk = fire_season(&wetness, &params, 3.0, 2000.0);
        assert!(risk.fire_days > 0.0 && risk.fire_days < 1.0);
    }

    #[test]
    fn test_low_productivity_suppresses_fire() {
        let wetness = [0.05; DAYS_PER_YEAR];
        let params = PftParams::desert_shrub(); // threshold 0.33
        let risk = fire_season(&wetness, &params, 1.0, 250.0);
        assert_relative_eq!(risk.fire_days, 365.0 * 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_infeasible_npp_means_no_fire() {
        use crate::physics::respiration::NPP_INFEASIBLE;
        let wetness = [0.05; DAYS_PER_YEAR];
        let params = PftParams::desert_shrub();
        let risk = fire_season(&wetness, &params, 1.0, NPP_INFEASIBLE);
        assert_eq!(risk.fire_days, 0.0);
    }

    #[test]
    fn test_extremes_track_the_series() {
        let mut wetness = [0.5; DAYS_PER_YEAR];
        wetness[10] = 0.9;
        wetness[200] = 0.1;
        let params = PftParams::temperate_grass();
        let risk = fire_season(&wetness, &params, 1.0, 1500.0);
        assert_eq!(risk.wettest, 0.9);
        assert_eq!(risk.driest, 0.1);
    }
}
