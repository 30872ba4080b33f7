//! Per-cell orchestration and the parallel grid runner.
//!
//! One cell's computation is a pure function of its climate record and the
//! shared parameter table: derive the daily series, screen the PFTs, run
//! phenology and the LAI optimizer per present PFT, then resolve dominance.
//! Cells are independent, so the grid runner fans them out with rayon and
//! collects each result into its own slot.

use crate::core_types::{Biome, LeafPhenology, Pft, PftTable, SiteClimate, NUM_PFTS};
use crate::physics::climate_summary::{summarize, ClimateSummary};
use crate::physics::daily::interpolate_daily;
use crate::physics::insolation::insolation;
use crate::physics::phenology::{phenology, PhenologyCurves};
use crate::physics::snow::snow_balance;
use crate::physics::soil_temperature::soil_temperature;
use crate::solver::competition::{resolve_dominance, CompetitionInputs, CompetitionOutcome};
use crate::solver::constraints::apply_sieve;
use crate::solver::growth::GrowthEnv;
use crate::solver::optimizer::{optimize_lai, OptimizedPft};
use rayon::prelude::*;
use tracing::{debug, info};

/// Complete result of one grid cell.
#[derive(Debug, Clone)]
pub struct CellOutput {
    /// Assigned biome.
    pub biome: Biome,
    /// Full competition outcome, including the (possibly blended)
    /// diagnostic record.
    pub competition: CompetitionOutcome,
    /// Optimized annual NPP per PFT (g C/m²/yr).
    pub pft_npp: [f64; NUM_PFTS],
    /// Optimized LAI per PFT.
    pub pft_lai: [f64; NUM_PFTS],
    /// Presence flags from the environmental sieve.
    pub present: [bool; NUM_PFTS],
    /// Derived climate summary for the cell.
    pub summary: ClimateSummary,
    /// Maximum snowpack depth (mm water equivalent).
    pub max_snow_depth: f64,
    /// Longitude and latitude carried through from the input record.
    pub longitude: f64,
    pub latitude: f64,
}

/// Observer hook for diagnostic front-ends. The core never prints; a CLI
/// can subscribe to watch the pipeline without touching the numerics.
pub trait CellObserver {
    /// Called once after the sieve with the derived climate indices.
    fn on_sieve(&mut self, _summary: &ClimateSummary, _present: &[bool; NUM_PFTS]) {}
    /// Called after each present PFT's optimization.
    fn on_pft(&mut self, _pft: Pft, _result: &OptimizedPft) {}
}

/// The default observer: does nothing.
pub struct NullObserver;

impl CellObserver for NullObserver {}

/// Convert elevation to surface pressure with the barometric formula.
///
/// Standard-atmosphere constants; elevation in meters, pressure in Pa.
pub fn pressure_from_elevation(elevation_m: f64) -> f64 {
    const P0: f64 = 101325.0; // sea-level standard pressure (Pa)
    const CP: f64 = 1004.68506; // specific heat of air (J/kg/K)
    const T0: f64 = 288.16; // sea-level standard temperature (K)
    const G: f64 = 9.80665; // gravitational acceleration (m/s²)
    const M: f64 = 0.02896968; // molar mass of dry air (kg/mol)
    const R0: f64 = 8.314462618; // universal gas constant (J/mol/K)

    P0 * (1.0 - (G * elevation_m) / (CP * T0)).powf(CP * M / R0)
}

/// Run the full pipeline for one grid cell.
pub fn simulate_cell(climate: &SiteClimate, table: &PftTable) -> CellOutput {
    simulate_cell_observed(climate, table, &mut NullObserver)
}

/// Run one cell with a diagnostic observer attached.
pub fn simulate_cell_observed(
    climate: &SiteClimate,
    table: &PftTable,
    observer: &mut dyn CellObserver,
) -> CellOutput {
    // Daily series from the monthly normals.
    let daily_temperature = interpolate_daily(&climate.temperature);
    let daily_cloud = interpolate_daily(&climate.cloud_cover);
    let daily_precipitation = interpolate_daily(&climate.precipitation);

    let summary = summarize(
        &climate.temperature,
        &climate.precipitation,
        &daily_temperature,
    );
    let tsoil = soil_temperature(&climate.temperature);
    let rad = insolation(
        climate.latitude,
        &daily_temperature,
        &daily_cloud,
        &climate.temperature,
    );
    let snow = snow_balance(&daily_temperature, &daily_precipitation);

    // Screen the candidate PFTs.
    let tmin_in = climate.tmin_coldest.unwrap_or(summary.estimated_tmin);
    let sieve = apply_sieve(&summary, tmin_in, snow.max_depth);
    observer.on_sieve(&summary, &sieve.present);

    debug!(
        lat = climate.latitude,
        lon = climate.longitude,
        tcm = summary.coldest_month,
        gdd5 = summary.gdd5,
        precip = summary.annual_precipitation,
        snow = snow.max_depth,
        "cell climate summarized"
    );

    // Summergreen phenology needs the re-interpolated day-length series.
    let daily_day_length = interpolate_daily(&rad.day_length);
    let evergreen_curves = PhenologyCurves::always_green();

    // Optimize each surviving PFT.
    let mut optimized: [OptimizedPft; NUM_PFTS] = std::array::from_fn(|_| OptimizedPft::absent());
    for pft in Pft::ALL {
        if !sieve.present[pft.index()] {
            continue;
        }
        let params = table.get(pft);
        let needs_phenology = params.phenology != LeafPhenology::Evergreen;
        let curves = if needs_phenology {
            phenology(
                &daily_temperature,
                &climate.temperature,
                summary.coldest_month,
                &daily_day_length,
                params,
            )
        } else {
            evergreen_curves.clone()
        };

        let env = GrowthEnv {
            annual_precipitation: summary.annual_precipitation,
            sun: &rad.sun,
            temperature: &climate.temperature,
            day_length: &rad.day_length,
            daily_temperature: &daily_temperature,
            daily_rain: &snow.daily_rain,
            daily_melt: &snow.daily_melt,
            daily_pet: &rad.daily_pet,
            soil: &climate.soil,
            soil_temperature: &tsoil,
            phenology: &curves,
            co2_ppm: climate.co2_ppm,
            pressure: climate.pressure_pa,
        };

        optimized[pft.index()] = optimize_lai(params, &env);
        observer.on_pft(pft, &optimized[pft.index()]);
    }

    // Resolve dominance and the biome.
    let competition_inputs = CompetitionInputs {
        tmin: sieve.tmin,
        total_precipitation: summary.annual_precipitation,
        gdd0: summary.gdd0,
        gdd5: summary.gdd5,
        tcm: summary.coldest_month,
    };
    let competition = resolve_dominance(&optimized, &competition_inputs);

    let mut pft_npp = [0.0; NUM_PFTS];
    let mut pft_lai = [0.0; NUM_PFTS];
    for pft in Pft::ALL {
        pft_npp[pft.index()] = optimized[pft.index()].npp;
        pft_lai[pft.index()] = optimized[pft.index()].lai;
    }

    info!(
        lat = climate.latitude,
        lon = climate.longitude,
        biome = competition.biome.name(),
        npp = competition.npp,
        "cell resolved"
    );

    CellOutput {
        biome: competition.biome,
        competition,
        pft_npp,
        pft_lai,
        present: sieve.present,
        summary,
        max_snow_depth: snow.max_depth,
        longitude: climate.longitude,
        latitude: climate.latitude,
    }
}

/// Process a grid of cells in parallel.
///
/// Missing cells (`None`, e.g. ocean) stay `None`; every land cell's
/// output lands in its own slot, so no synchronization is needed beyond
/// the fan-out itself.
pub fn run_grid(cells: &[Option<SiteClimate>], table: &PftTable) -> Vec<Option<CellOutput>> {
    cells
        .par_iter()
        .map(|cell| cell.as_ref().map(|climate| simulate_cell(climate, table)))
        .collect()
}
