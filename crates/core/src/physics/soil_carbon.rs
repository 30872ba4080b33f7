//! Heterotrophic respiration from litter and two soil carbon pools.
//!
//! Assumes annual equilibrium: each year's NPP is partitioned into litter,
//! fast and slow soil pools and fully decayed within the year, with each
//! pool's monthly release proportional to its decay-rate share. Litter
//! decays on an AET-driven rate (after Foley); the soil pools share a
//! temperature- and moisture-modulated Lloyd-Taylor-style rate. Respired
//! CO2 carries the vegetation's 13C signature shifted by fixed
//! humification offsets.

use super::MONTHS;
use crate::core_types::Pft;

/// Atmospheric δ13C (‰).
const DELTA_ATMOSPHERE: f64 = -8.0;
/// Base respiration rate multiplier (turnover built in).
const R_TEN: f64 = 1.0;
/// Humification 13C enrichment offsets per pool (‰, subtracted from the
/// vegetation signature).
const LITTER_OFFSET: f64 = 0.75;
const FAST_OFFSET: f64 = 1.5;
const SLOW_OFFSET: f64 = 2.25;

/// Monthly heterotrophic respiration and isotope fluxes.
#[derive(Debug, Clone)]
pub struct SoilCarbonFlux {
    /// Monthly litter respiration (g C/m²).
    pub monthly_litter: [f64; MONTHS],
    /// Monthly fast-pool respiration (g C/m²).
    pub monthly_fast: [f64; MONTHS],
    /// Monthly slow-pool respiration (g C/m²).
    pub monthly_slow: [f64; MONTHS],
    /// Monthly total heterotrophic respiration (g C/m²).
    pub monthly_total: [f64; MONTHS],
    /// δ13C of respired CO2 per month (‰).
    pub monthly_delta: [f64; MONTHS],
    /// Isotope disequilibrium flux per month.
    pub monthly_iso_flux: [f64; MONTHS],
    /// Mean monthly total respiration.
    pub mean_monthly: f64,
    /// Annual mean litter decay rate.
    pub mean_litter_rate: f64,
    /// Annual mean soil decay rate.
    pub mean_soil_rate: f64,
}

impl SoilCarbonFlux {
    fn zero() -> Self {
        SoilCarbonFlux {
            monthly_litter: [0.0; MONTHS],
            monthly_fast: [0.0; MONTHS],
            monthly_slow: [0.0; MONTHS],
            monthly_total: [0.0; MONTHS],
            monthly_delta: [0.0; MONTHS],
            monthly_iso_flux: [0.0; MONTHS],
            mean_monthly: 0.0,
            mean_litter_rate: 0.0,
            mean_soil_rate: 0.0,
        }
    }
}

/// Decay one year's NPP through the three pools.
///
/// `soil_temperature` and `moisture` are monthly means; `aet` the monthly
/// mean actual evapotranspiration; `vegetation_delta` the NPP-weighted
/// δ13C of the vegetation.
pub fn heterotrophic_respiration(
    pft: Pft,
    annual_npp: f64,
    soil_temperature: &[f64; MONTHS],
    aet: &[f64; MONTHS],
    moisture: &[f64; MONTHS],
    vegetation_delta: f64,
) -> SoilCarbonFlux {
    if annual_npp <= 0.0 {
        // Nothing fixed this year, nothing to decay.
        return SoilCarbonFlux::zero();
    }

    // Pool partitioning: tropical trees shed proportionally less litter
    // into the surface pool.
    let (pool_litter, pool_fast, pool_slow) =
        if matches!(pft, Pft::TropicalEvergreen | Pft::TropicalRaingreen) {
            (
                0.650 * annual_npp,
                0.980 * 0.350 * annual_npp,
                0.020 * 0.350 * annual_npp,
            )
        } else {
            (
                0.700 * annual_npp,
                0.985 * 0.300 * annual_npp,
                0.015 * 0.300 * annual_npp,
            )
        };

    let mut k_litter = [0.0; MONTHS];
    let mut k_fast = [0.0; MONTHS];
    let mut k_slow = [0.0; MONTHS];
    let mut k_litter_sum = 0.0;
    let mut k_fast_sum = 0.0;
    let mut k_slow_sum = 0.0;

    for m in 0..MONTHS {
        let moisture_factor = 0.25 + 0.75 * moisture[m];

        k_litter[m] = 10.0_f64.powf(-1.4553 + 0.0014175 * aet[m]);
        k_litter_sum += k_litter[m];

        let soil_rate = moisture_factor
            * R_TEN
            * (308.56 * (1.0 / 56.02 - 1.0 / (soil_temperature[m] + 273.0 - 227.13))).exp();
        k_fast[m] = soil_rate;
        k_fast_sum += k_fast[m];
        k_slow[m] = soil_rate;
        k_slow_sum += k_slow[m];
    }

    let mut flux = SoilCarbonFlux::zero();
    flux.mean_litter_rate = k_litter_sum / 12.0;
    flux.mean_soil_rate = k_fast_sum / 12.0;

    for m in 0..MONTHS {
        flux.monthly_litter[m] = pool_litter * (k_litter[m] / k_litter_sum);
        flux.monthly_fast[m] = pool_fast * (k_fast[m] / k_fast_sum);
        flux.monthly_slow[m] = pool_slow * (k_slow[m] / k_slow_sum);
        flux.monthly_total[m] =
            flux.monthly_litter[m] + flux.monthly_fast[m] + flux.monthly_slow[m];
        flux.mean_monthly += flux.monthly_total[m] / 12.0;
    }

    for m in 0..MONTHS {
        let delta_litter = vegetation_delta - LITTER_OFFSET;
        let delta_fast = vegetation_delta - FAST_OFFSET;
        let delta_slow = vegetation_delta - SLOW_OFFSET;
        flux.monthly_delta[m] = (pool_litter / annual_npp) * delta_litter
            + (pool_fast / annual_npp) * delta_fast
            + (pool_slow / annual_npp) * delta_slow;
        flux.monthly_iso_flux[m] =
            (DELTA_ATMOSPHERE - flux.monthly_delta[m]) * flux.monthly_total[m];
    }

    flux
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TSOIL: [f64; MONTHS] = [
        -5.0, -4.0, 0.0, 5.0, 10.0, 14.0, 17.0, 16.0, 12.0, 7.0, 1.0, -4.0,
    ];
    const AET: [f64; MONTHS] = [0.2, 0.3, 0.8, 1.5, 2.5, 3.2, 3.5, 3.0, 2.0, 1.0, 0.5, 0.3];
    const MOIST: [f64; MONTHS] = [0.8, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.3, 0.4, 0.6, 0.7, 0.8];

    #[test]
    fn test_nonpositive_npp_short_circuits() {
        let flux =
            heterotrophic_respiration(Pft::TemperateSummergreen, 0.0, &TSOIL, &AET, &MOIST, -25.0);
        assert_eq!(flux.monthly_total, [0.0; MONTHS]);
        assert_eq!(flux.mean_monthly, 0.0);
        let flux = heterotrophic_respiration(
            Pft::TemperateSummergreen,
            -9999.0,
            &TSOIL,
            &AET,
            &MOIST,
            -25.0,
        );
        assert_eq!(flux.monthly_iso_flux, [0.0; MONTHS]);
    }

    #[test]
    fn test_equilibrium_decays_exactly_one_year_of_npp() {
        let npp = 640.0;
        let flux =
            heterotrophic_respiration(Pft::BorealEvergreen, npp, &TSOIL, &AET, &MOIST, -26.0);
        let total: f64 = flux.monthly_total.iter().sum();
        assert_relative_eq!(total, npp, epsilon = 1e-9);
    }

    #[test]
    fn test_tropical_partitioning_differs() {
        let npp = 1000.0;
        let tropical =
            heterotrophic_respiration(Pft::TropicalRaingreen, npp, &TSOIL, &AET, &MOIST, -27.0);
        let temperate =
            heterotrophic_respiration(Pft::TemperateSummergreen, npp, &TSOIL, &AET, &MOIST, -27.0);
        let tropical_litter: f64 = tropical.monthly_litter.iter().sum();
        let temperate_litter: f64 = temperate.monthly_litter.iter().sum();
        assert_relative_eq!(tropical_litter, 650.0, epsilon = 1e-9);
        assert_relative_eq!(temperate_litter, 700.0, epsilon = 1e-9);
    }

    #[test]
    fn test_respired_delta_is_depleted_relative_to_vegetation() {
        let veg = -26.0;
        let flux =
            heterotrophic_respiration(Pft::TemperateGrass, 500.0, &TSOIL, &AET, &MOIST, veg);
        for m in 0..MONTHS {
            assert!(flux.monthly_delta[m] < veg);
            assert!(flux.monthly_delta[m] > veg - SLOW_OFFSET);
        }
    }

    #[test]
    fn test_warm_months_respire_more_from_soil_pools() {
        let flux =
            heterotrophic_respiration(Pft::TemperateSummergreen, 800.0, &TSOIL, &AET, &MOIST, -26.0);
        // July (warmest soil) releases more from the fast pool than January.
        assert!(flux.monthly_fast[6] > flux.monthly_fast[0]);
    }
}
