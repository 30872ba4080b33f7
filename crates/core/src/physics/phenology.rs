//! Summergreen canopy phenology.
//!
//! A three-month window centred on the coldest month is the minimum leafless
//! period. Outside it, canopy fraction ramps from 0 to 1 as degree-days
//! accumulate over a PFT-specific ramp, and resets whenever the window is
//! re-entered. Two curves are produced: a generic summergreen curve and a
//! grass/raingreen variant that additionally drops its leaves late in the
//! season on hard frost or short days. Two spin-up passes let January
//! inherit December's accumulation state.

use super::{DAYS_IN_MONTH, DAYS_PER_YEAR, MONTHS};
use crate::core_types::PftParams;

/// Daily canopy-fraction multipliers (0-1) for one PFT.
#[derive(Debug, Clone)]
pub struct PhenologyCurves {
    /// Generic summergreen curve, read by woody summergreen PFTs.
    pub summergreen: [f64; DAYS_PER_YEAR],
    /// Grass/raingreen variant with early leaf-drop, read by grass-habit
    /// PFTs.
    pub grass: [f64; DAYS_PER_YEAR],
}

impl PhenologyCurves {
    /// Fully leafed year-round, for evergreen and drought-controlled PFTs.
    pub fn always_green() -> Self {
        PhenologyCurves {
            summergreen: [1.0; DAYS_PER_YEAR],
            grass: [1.0; DAYS_PER_YEAR],
        }
    }
}

/// Compute both phenology curves for a summergreen or grass PFT.
///
/// `coldest_month_temperature` is the coldest monthly mean; the winter
/// window is centred on the last month attaining it.
pub fn phenology(
    daily_temperature: &[f64; DAYS_PER_YEAR],
    monthly_temperature: &[f64; MONTHS],
    coldest_month_temperature: f64,
    daily_day_length: &[f64; DAYS_PER_YEAR],
    params: &PftParams,
) -> PhenologyCurves {
    let ramps = [params.ramp_summergreen, params.ramp_grass];
    let growth_base = params.gdd_base;

    // Locate the coldest and warmest months as 1-based month numbers.
    let mut coldest_month = 0usize;
    let mut warmest_month = 0usize;
    let mut warm = coldest_month_temperature;
    for m in 0..MONTHS {
        if monthly_temperature[m] == coldest_month_temperature {
            coldest_month = m + 1;
        }
        if monthly_temperature[m] > warm {
            warm = monthly_temperature[m];
            warmest_month = m + 1;
        }
    }
    let coldest_month = coldest_month.max(1);

    let mut curves = [[0.0; DAYS_PER_YEAR]; 2];

    for (case, curve) in curves.iter_mut().enumerate() {
        // Three-month leafless window centred on the coldest month,
        // wrapping through the year boundary.
        let mut window = [coldest_month - 1, coldest_month, coldest_month + 1];
        if window[0] == 0 {
            window[0] = 12;
        }
        if window[2] == 13 {
            window[2] = 1;
        }
        let hot = if warmest_month == 12 { 0 } else { warmest_month };

        let ramp = ramps[case];
        let mut gdd = 0.0_f64;

        // Second pass carries December's degree-day state into January.
        for _spinup in 0..2 {
            let mut day = 0usize;
            for m in 0..MONTHS {
                let month_number = m + 1;
                let in_window = window.contains(&month_number);
                for _ in 0..DAYS_IN_MONTH[m] {
                    day += 1;
                    let t = daily_temperature[day - 1];
                    if in_window {
                        // The window is leafless regardless of temperature
                        // and restarts the degree-day sum.
                        curve[day - 1] = 0.0;
                        gdd = 0.0;
                    } else if t > growth_base {
                        gdd += t.max(0.0);
                        curve[day - 1] = if gdd >= ramp {
                            1.0
                        } else if ramp > 0.0 {
                            gdd / ramp
                        } else {
                            0.0
                        };
                    }

                    // Grass/raingreen variant: forced leaf-off late in the
                    // season on hard frost or short days, and in the month
                    // leading into the winter window.
                    if case == 1 {
                        if month_number >= hot {
                            if t < -10.0 || daily_day_length[day - 1] < 10.0 {
                                curve[day - 1] = 0.0;
                            }
                        } else if month_number == window[0] {
                            curve[day - 1] = 0.0;
                        }
                    }
                }
            }
        }
    }

    let [summergreen, grass] = curves;
    PhenologyCurves { summergreen, grass }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::PftParams;
    use crate::physics::daily::interpolate_daily;

    fn temperate_series() -> ([f64; MONTHS], [f64; DAYS_PER_YEAR]) {
        let monthly = [-5.0, -3.0, 2.0, 7.0, 12.0, 16.0, 20.0, 19.0, 14.0, 8.0, 2.0, -3.0];
        let daily = interpolate_daily(&monthly);
        (monthly, daily)
    }

    #[test]
    fn test_winter_window_is_leafless() {
        let (monthly, daily) = temperate_series();
        let day_length = [14.0; DAYS_PER_YEAR];
        let params = PftParams::temperate_summergreen();
        let curves = phenology(&daily, &monthly, -5.0, &day_length, &params);
        // January is the coldest month; December through February stay bare.
        for day in 0..31 {
            assert_eq!(curves.summergreen[day], 0.0, "day {day}");
        }
        for day in 334..365 {
            assert_eq!(curves.summergreen[day], 0.0, "day {day}");
        }
    }

    #[test]
    fn test_canopy_reaches_full_after_ramp() {
        let (monthly, daily) = temperate_series();
        let day_length = [14.0; DAYS_PER_YEAR];
        let params = PftParams::temperate_summergreen();
        let curves = phenology(&daily, &monthly, -5.0, &day_length, &params);
        // By midsummer 200 degree-days are long since accumulated.
        assert_eq!(curves.summergreen[196], 1.0);
        // And the ramp passes through intermediate values in spring.
        let spring = &curves.summergreen[90..150];
        assert!(spring.iter().any(|&v| v > 0.0 && v < 1.0));
    }

    #[test]
    fn test_curve_values_stay_in_unit_interval() {
        let (monthly, daily) = temperate_series();
        let day_length = [12.0; DAYS_PER_YEAR];
        let params = PftParams::boreal_summergreen();
        let curves = phenology(&daily, &monthly, -5.0, &day_length, &params);
        for day in 0..DAYS_PER_YEAR {
            assert!((0.0..=1.0).contains(&curves.summergreen[day]));
            assert!((0.0..=1.0).contains(&curves.grass[day]));
        }
    }

    #[test]
    fn test_grass_curve_drops_on_short_days() {
        let (monthly, daily) = temperate_series();
        // Short days everywhere force the grass curve to zero from the
        // warmest month onward; the summergreen curve is unaffected.
        let day_length = [8.0; DAYS_PER_YEAR];
        let params = PftParams::temperate_grass();
        let curves = phenology(&daily, &monthly, -5.0, &day_length, &params);
        // July is the warmest month; from then on grass stays bare.
        for day in 181..365 {
            assert_eq!(curves.grass[day], 0.0, "day {day}");
        }
        assert!(curves.summergreen.iter().any(|&v| v > 0.0));
    }
}
