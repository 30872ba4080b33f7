//! Degree-day snowpack model.
//!
//! Daily precipitation falls as snow below a fixed temperature threshold and
//! the pack melts back at a degree-day rate above it. Two identical passes
//! are run so the pack state entering January 1 comes from the previous
//! December instead of an assumed-zero start; only the second pass's fluxes
//! are kept.

use super::DAYS_PER_YEAR;

/// Snow/rain partition threshold (°C).
const SNOW_THRESHOLD: f64 = -1.0;
/// Degree-day melt coefficient (mm water per °C per day).
const MELT_RATE: f64 = 0.7;

/// Effective daily water supply after snow partitioning.
#[derive(Debug, Clone)]
pub struct SnowBalance {
    /// Rainfall reaching the soil each day (mm/day).
    pub daily_rain: [f64; DAYS_PER_YEAR],
    /// Snowmelt released each day (mm/day).
    pub daily_melt: [f64; DAYS_PER_YEAR],
    /// Maximum snowpack water equivalent observed (mm).
    pub max_depth: f64,
}

/// Partition interpolated daily precipitation into rainfall and melt.
///
/// `daily_precipitation` is the interpolated monthly-total series; it is
/// converted to mm/day inside.
pub fn snow_balance(
    daily_temperature: &[f64; DAYS_PER_YEAR],
    daily_precipitation: &[f64; DAYS_PER_YEAR],
) -> SnowBalance {
    let mut snowpack = 0.0_f64;
    let mut max_depth = 0.0_f64;
    let mut daily_rain = [0.0; DAYS_PER_YEAR];
    let mut daily_melt = [0.0; DAYS_PER_YEAR];

    for _pass in 0..2 {
        for day in 0..DAYS_PER_YEAR {
            let water = daily_precipitation[day] / (365.0 / 12.0);

            let (new_snow, melt) = if daily_temperature[day] < SNOW_THRESHOLD {
                (water, 0.0)
            } else {
                let melt = MELT_RATE * (daily_temperature[day] - SNOW_THRESHOLD);
                (0.0, melt.min(snowpack))
            };

            snowpack += new_snow - melt;
            max_depth = max_depth.max(snowpack);

            daily_rain[day] = water - new_snow;
            daily_melt[day] = melt;
        }
    }

    SnowBalance {
        daily_rain,
        daily_melt,
        max_depth,
    }
}
