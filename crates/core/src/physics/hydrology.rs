//! Two-layer daily soil water balance.
//!
//! Couples the canopy's evaporative demand (from the optimizer's
//! non-water-stressed conductance) against supply from the root zone,
//! re-solving conductance from supply when the soil cannot keep up. Run for
//! two years; the first year only washes out the arbitrary initial soil
//! moisture, and the second year's statistics are reported.

use super::{DAYS_IN_MONTH, DAYS_PER_YEAR, MONTHS};
use crate::core_types::{GrowthHabit, LeafPhenology, PftParams, SoilProperties};
use crate::physics::phenology::PhenologyCurves;

/// Priestley-Taylor maximum of the demand function.
const ALPHA_MAX: f64 = 1.4;
/// Aerodynamic scaling conductance (mm/s).
const G_SCALE: f64 = 5.0;
/// Evaporative overhead per term (wet phytomass, waste), each a fraction
/// of AET.
const DEMAND_OVERHEAD: f64 = 0.01;
/// Bare-soil evaporation as a fraction of PET.
const BARE_SOIL_FRACTION: f64 = 0.25;
/// Daily mean temperature at or below which soil is treated as frozen.
const FROZEN_THRESHOLD: f64 = -10.0;

/// Inputs to the water balance that do not vary with the candidate LAI.
#[derive(Debug, Clone, Copy)]
pub struct HydrologyForcing<'a> {
    /// Daily rainfall reaching the soil (mm/day).
    pub daily_rain: &'a [f64; DAYS_PER_YEAR],
    /// Daily snowmelt (mm/day).
    pub daily_melt: &'a [f64; DAYS_PER_YEAR],
    /// Daily potential evapotranspiration (mm/day).
    pub daily_pet: &'a [f64; DAYS_PER_YEAR],
    /// Daily mean air temperature (°C).
    pub daily_temperature: &'a [f64; DAYS_PER_YEAR],
    /// Soil hydraulics for the cell.
    pub soil: &'a SoilProperties,
    /// Initial wetness guess for both layers (annual precipitation scaled).
    pub initial_wetness: f64,
}

/// Monthly and daily water-balance statistics for one PFT at one LAI.
#[derive(Debug, Clone)]
pub struct WaterBalance {
    /// Monthly mean foliage cover fraction.
    pub mean_fvc: [f64; MONTHS],
    /// Monthly mean canopy conductance (mm/s).
    pub mean_gc: [f64; MONTHS],
    /// Monthly mean root-zone wetness (0-1).
    pub mean_wetness: [f64; MONTHS],
    /// Monthly mean top-layer wetness (0-1).
    pub mean_wetness_top: [f64; MONTHS],
    /// Monthly mean bottom-layer wetness (0-1).
    pub mean_wetness_bottom: [f64; MONTHS],
    /// Monthly mean actual evapotranspiration (mm/day).
    pub mean_aet: [f64; MONTHS],
    /// Monthly total runoff plus drainage (mm).
    pub monthly_runoff: [f64; MONTHS],
    /// Daily root-zone wetness series.
    pub daily_wetness: [f64; DAYS_PER_YEAR],
    /// Daily foliage cover series.
    pub daily_fvc: [f64; DAYS_PER_YEAR],
    /// Annual actual evapotranspiration (mm).
    pub annual_aet: f64,
    /// Annual runoff plus drainage (mm).
    pub annual_runoff: f64,
    /// Days with any canopy present.
    pub green_days: u32,
    /// Whether water stress ever collapsed conductance to zero.
    pub wilted: bool,
}

/// Run the two-year daily water balance for one PFT at one canopy size.
///
/// `daily_optimal_gc` is the interpolated non-water-stressed conductance
/// from the photosynthesis pass; `max_fvc` the foliage cover at the
/// candidate LAI.
pub fn water_balance(
    params: &PftParams,
    forcing: &HydrologyForcing<'_>,
    daily_optimal_gc: &[f64; DAYS_PER_YEAR],
    phenology: &PhenologyCurves,
    max_fvc: f64,
) -> WaterBalance {
    let onset = params.onset_wetness;
    let offset = params.offset_wetness;
    let root = params.root_top;

    let mut mean_fvc = [0.0; MONTHS];
    let mut mean_gc = [0.0; MONTHS];
    let mut mean_wetness = [0.0; MONTHS];
    let mut mean_wetness_top = [0.0; MONTHS];
    let mut mean_wetness_bottom = [0.0; MONTHS];
    let mut mean_aet = [0.0; MONTHS];
    let mut monthly_runoff = [0.0; MONTHS];
    let mut daily_wetness = [0.0; DAYS_PER_YEAR];
    let mut daily_fvc = [0.0; DAYS_PER_YEAR];
    let mut annual_aet = 0.0;
    let mut annual_runoff = 0.0;
    let mut green_days = 0u32;
    let mut wilted = false;

    // Canopy state persists across days for the drought-deciduous
    // hysteresis.
    let mut fvc = 0.0_f64;

    for _year in 0..2 {
        // Both layers restart from the same first guess; year two exists to
        // wash that guess out.
        let mut w = [forcing.initial_wetness, forcing.initial_wetness];
        annual_aet = 0.0;
        annual_runoff = 0.0;
        green_days = 0;
        wilted = false;

        let mut day_of_year = 0usize;
        for month in 0..MONTHS {
            let days = DAYS_IN_MONTH[month] as f64;
            mean_fvc[month] = 0.0;
            mean_gc[month] = 0.0;
            mean_wetness[month] = 0.0;
            mean_wetness_top[month] = 0.0;
            mean_wetness_bottom[month] = 0.0;
            mean_aet[month] = 0.0;
            monthly_runoff[month] = 0.0;

            for _ in 0..DAYS_IN_MONTH[month] {
                let d = day_of_year;
                day_of_year += 1;

                let wr = root * w[0] + (1.0 - root) * w[1];

                // Canopy fraction for today.
                fvc = match (params.phenology, params.habit) {
                    (LeafPhenology::Evergreen, _) => max_fvc,
                    (LeafPhenology::Summergreen, GrowthHabit::Woody)
                    | (_, GrowthHabit::Grass) => {
                        let curve = match params.habit {
                            GrowthHabit::Grass => phenology.grass[d],
                            GrowthHabit::Woody => phenology.summergreen[d],
                        };
                        let phen_fvc = max_fvc * curve;
                        // Wetness gate: a grown canopy persists only above
                        // the offset threshold, a bare one leafs out only
                        // above the onset threshold.
                        if (phen_fvc > 0.01 && wr > offset) || (phen_fvc < 0.01 && wr > onset) {
                            phen_fvc
                        } else {
                            0.0
                        }
                    }
                    (LeafPhenology::Raingreen, GrowthHabit::Woody) => {
                        // Pure moisture hysteresis on yesterday's state.
                        if (fvc > 0.01 && wr > offset) || (fvc < 0.01 && wr > onset) {
                            max_fvc
                        } else {
                            0.0
                        }
                    }
                };

                if fvc > 0.0 {
                    green_days += 1;
                }

                let mut gc = 0.0;
                let mut aet = 0.0;
                let mut runoff = 0.0;
                let mut drainage = 0.0;

                if forcing.daily_temperature[d] > FROZEN_THRESHOLD {
                    let pet = forcing.daily_pet[d];

                    if fvc == 0.0 {
                        aet = BARE_SOIL_FRACTION * pet;
                    } else {
                        let g_min = params.gc_min * fvc;
                        gc = daily_optimal_gc[d] * (fvc / max_fvc);
                        let g_surf = gc + g_min;
                        if g_surf > 0.0 {
                            let alpha = (ALPHA_MAX * (1.0 - (-g_surf / G_SCALE).exp())).min(1.0);
                            aet = alpha * pet;
                        }
                    }

                    let demand = aet * (1.0 + 2.0 * DEMAND_OVERHEAD);
                    let supply = params.e_max * wr;

                    if demand > supply {
                        // Re-solve surface conductance from the supply rate.
                        // The radicand is clamped into (0, 1]: supply can
                        // only undercut demand when PET is positive, but
                        // floating noise must not reach ln(0).
                        let a = (1.0 - supply / (pet * ALPHA_MAX)).clamp(1e-12, 1.0);
                        let g_surf = -G_SCALE * a.ln();
                        let g_min = params.gc_min * fvc;
                        aet = supply;
                        gc = g_surf - g_min;
                        if gc <= 0.0 {
                            gc = 0.0;
                            wilted = true;
                        }
                    }

                    // Percolation from the top layer; one reference texture
                    // applies to both layers.
                    let percolation = forcing.soil.percolation_index * w[0].powi(4);

                    let split = if wr > 0.0 {
                        [root * (w[0] / wr), (1.0 - root) * (w[1] / wr)]
                    } else {
                        [0.0, 0.0]
                    };

                    if forcing.soil.whc_top == 0.0 {
                        w[0] = 0.0;
                    } else {
                        w[0] += (forcing.daily_rain[d] + forcing.daily_melt[d]
                            - percolation
                            - split[0] * aet)
                            / forcing.soil.whc_top;
                    }
                    if forcing.soil.whc_bottom == 0.0 {
                        w[1] = 0.0;
                    } else {
                        w[1] += (percolation - split[1] * aet) / forcing.soil.whc_bottom;
                    }

                    if w[1] >= 1.0 {
                        drainage = (w[1] - 1.0) * forcing.soil.whc_bottom;
                        w[1] = 1.0;
                    }
                    if w[0] >= 1.0 {
                        runoff = (w[0] - 1.0) * forcing.soil.whc_top;
                        w[0] = 1.0;
                    }
                    w[0] = w[0].max(0.0);
                    w[1] = w[1].max(0.0);
                }

                annual_aet += aet;
                annual_runoff += runoff + drainage;
                monthly_runoff[month] += runoff + drainage;
                mean_wetness[month] += wr / days;
                mean_wetness_top[month] += w[0] / days;
                mean_wetness_bottom[month] += w[1] / days;
                mean_gc[month] += gc / days;
                mean_fvc[month] += fvc / days;
                mean_aet[month] += aet / days;

                daily_wetness[d] = wr;
                daily_fvc[d] = fvc;
            }
        }
    }

    WaterBalance {
        mean_fvc,
        mean_gc,
        mean_wetness,
        mean_wetness_top,
        mean_wetness_bottom,
        mean_aet,
        monthly_runoff,
        daily_wetness,
        daily_fvc,
        annual_aet,
        annual_runoff,
        green_days,
        wilted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::PftParams;

    fn forcing_arrays(
        rain: f64,
        pet: f64,
        temp: f64,
    ) -> (
        [f64; DAYS_PER_YEAR],
        [f64; DAYS_PER_YEAR],
        [f64; DAYS_PER_YEAR],
        [f64; DAYS_PER_YEAR],
    ) {
        (
            [rain; DAYS_PER_YEAR],
            [0.0; DAYS_PER_YEAR],
            [pet; DAYS_PER_YEAR],
            [temp; DAYS_PER_YEAR],
        )
    }

    fn soil() -> SoilProperties {
        SoilProperties {
            percolation_index: 4.0,
            percolation_index_bottom: 4.0,
            whc_top: 120.0,
            whc_bottom: 180.0,
        }
    }

    #[test]
    fn test_wetness_stays_in_unit_interval() {
        let (rain, melt, pet, temp) = forcing_arrays(12.0, 4.0, 18.0);
        let soil = soil();
        let forcing = HydrologyForcing {
            daily_rain: &rain,
            daily_melt: &melt,
            daily_pet: &pet,
            daily_temperature: &temp,
            soil: &soil,
            initial_wetness: 0.9,
        };
        let params = PftParams::tropical_raingreen();
        let gc = [4.0; DAYS_PER_YEAR];
        let curves = PhenologyCurves::always_green();
        let balance = water_balance(&params, &forcing, &gc, &curves, 0.9);
        for m in 0..MONTHS {
            assert!((0.0..=1.0).contains(&balance.mean_wetness_top[m]));
            assert!((0.0..=1.0).contains(&balance.mean_wetness_bottom[m]));
        }
        for d in 0..DAYS_PER_YEAR {
            assert!((0.0..=1.0).contains(&balance.daily_wetness[d]));
        }
    }

    #[test]
    fn test_frozen_days_suspend_fluxes() {
        let (rain, melt, pet, temp) = forcing_arrays(3.0, 2.0, -20.0);
        let soil = soil();
        let forcing = HydrologyForcing {
            daily_rain: &rain,
            daily_melt: &melt,
            daily_pet: &pet,
            daily_temperature: &temp,
            soil: &soil,
            initial_wetness: 0.5,
        };
        let params = PftParams::boreal_evergreen();
        let gc = [2.0; DAYS_PER_YEAR];
        let curves = PhenologyCurves::always_green();
        let balance = water_balance(&params, &forcing, &gc, &curves, 0.8);
        assert_eq!(balance.annual_aet, 0.0);
        assert_eq!(balance.annual_runoff, 0.0);
        for m in 0..MONTHS {
            assert_eq!(balance.mean_gc[m], 0.0);
            // Soil moisture is locked at its starting state all year.
            assert!((balance.mean_wetness[m] - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_wet_climate_produces_runoff() {
        let (rain, melt, pet, temp) = forcing_arrays(9.0, 2.0, 22.0);
        let soil = soil();
        let forcing = HydrologyForcing {
            daily_rain: &rain,
            daily_melt: &melt,
            daily_pet: &pet,
            daily_temperature: &temp,
            soil: &soil,
            initial_wetness: 1.0,
        };
        let params = PftParams::tropical_raingreen();
        let gc = [4.0; DAYS_PER_YEAR];
        let curves = PhenologyCurves::always_green();
        let balance = water_balance(&params, &forcing, &gc, &curves, 0.95);
        assert!(balance.annual_runoff > 0.0);
        assert!(balance.annual_aet > 0.0);
        assert_eq!(balance.green_days, 365);
        assert!(!balance.wilted);
    }

    #[test]
    fn test_drought_collapses_canopy_and_conductance() {
        let (rain, melt, pet, temp) = forcing_arrays(0.1, 6.0, 30.0);
        let soil = soil();
        let forcing = HydrologyForcing {
            daily_rain: &rain,
            daily_melt: &melt,
            daily_pet: &pet,
            daily_temperature: &temp,
            soil: &soil,
            initial_wetness: 0.3,
        };
        let params = PftParams::tropical_raingreen();
        let gc = [5.0; DAYS_PER_YEAR];
        let curves = PhenologyCurves::always_green();
        let balance = water_balance(&params, &forcing, &gc, &curves, 0.9);
        // The soil dries below the offset threshold and the raingreen
        // canopy comes off for good.
        assert!(balance.green_days < 365);
        let last_quarter: f64 = balance.daily_fvc[270..].iter().sum();
        assert_eq!(last_quarter, 0.0);
    }

    #[test]
    fn test_grass_canopy_follows_phenology_curve() {
        let (rain, melt, pet, temp) = forcing_arrays(10.0, 3.0, 15.0);
        let soil = soil();
        let forcing = HydrologyForcing {
            daily_rain: &rain,
            daily_melt: &melt,
            daily_pet: &pet,
            daily_temperature: &temp,
            soil: &soil,
            initial_wetness: 0.9,
        };
        let params = PftParams::temperate_grass();
        let gc = [3.0; DAYS_PER_YEAR];
        let mut curves = PhenologyCurves::always_green();
        // Bare first half of the year on the grass curve.
        for d in 0..180 {
            curves.grass[d] = 0.0;
        }
        let balance = water_balance(&params, &forcing, &gc, &curves, 0.8);
        assert_eq!(balance.daily_fvc[100], 0.0);
        assert!(balance.daily_fvc[200] > 0.0);
    }
}
