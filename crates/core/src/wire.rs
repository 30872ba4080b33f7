//! Flat-vector boundary to the external grid driver.
//!
//! The grid collaborator exchanges fixed-length numeric vectors: a
//! 50-element input record per cell and a 500-element integer output
//! record. The field-to-index mapping below is the stable wire contract;
//! everything inside the crate works with the typed records instead.
//!
//! # Input layout (f64, length 50)
//!
//! | index | field |
//! |-------|-------|
//! | 0 | latitude (°N) |
//! | 1 | CO2 (ppm) |
//! | 2 | surface pressure (Pa) |
//! | 3 | absolute minimum temperature (°C); NaN or <= -9000 when absent |
//! | 4..16 | monthly mean temperature (°C) |
//! | 16..28 | monthly precipitation (mm) |
//! | 28..40 | monthly cloud cover (%) |
//! | 40 | top-layer percolation index |
//! | 41 | bottom-layer percolation index |
//! | 42 | top-layer water-holding capacity (mm) |
//! | 43 | bottom-layer water-holding capacity (mm) |
//! | 45 | diagnostic-mode flag (presentation only, ignored here) |
//! | 48 | longitude (°E) |
//!
//! Unlisted indices are reserved and ignored.
//!
//! # Output layout (i32, length 500)
//!
//! Scalars at 0..35, monthly blocks of 12 from 40, the ten-day LAI block
//! at 184, and per-PFT blocks of 13 from 230; see the `out` constants.
//! All values are rounded half-away-from-zero after scaling.

use crate::core_types::{Pft, SiteClimate, SoilProperties};
use crate::error::ModelError;
use crate::physics::MONTHS;
use crate::simulation::CellOutput;

/// Input record length.
pub const INPUT_LEN: usize = 50;
/// Output record length.
pub const OUTPUT_LEN: usize = 500;

/// Sentinel below which the minimum-temperature field counts as missing.
const TMIN_MISSING: f64 = -9000.0;

/// Output field offsets.
pub mod out {
    /// Biome id (1-28).
    pub const BIOME: usize = 0;
    /// Dominant PFT code: 1-13, 14 for a mixed woodland/savanna, 0 none.
    pub const DOMINANT_PFT: usize = 1;
    /// Sub-dominant tree PFT code, 0 none.
    pub const SUB_PFT: usize = 2;
    /// Dominant grass PFT code, 0 none.
    pub const GRASS_PFT: usize = 3;
    /// Reported (blended) NPP, g C/m²/yr.
    pub const NPP: usize = 4;
    /// Reported (blended) LAI x100.
    pub const LAI_X100: usize = 5;
    /// Dominant PFT's unblended NPP.
    pub const DOMINANT_NPP: usize = 6;
    /// Dominant PFT's unblended LAI x100.
    pub const DOMINANT_LAI_X100: usize = 7;
    /// Dominant grass NPP.
    pub const GRASS_NPP: usize = 8;
    /// Dominant grass LAI x100.
    pub const GRASS_LAI_X100: usize = 9;
    /// Total annual precipitation, mm, capped at 9999.
    pub const PRECIPITATION: usize = 10;
    /// Total annual PAR, MJ/m².
    pub const ANNUAL_PAR: usize = 11;
    /// Annual FPAR, %.
    pub const ANNUAL_FPAR: usize = 12;
    /// Respiration cost, % of GPP.
    pub const RESPIRATION_COST: usize = 13;
    /// Annual AET, mm.
    pub const ANNUAL_AET: usize = 14;
    /// Annual runoff, mm.
    pub const ANNUAL_RUNOFF: usize = 15;
    /// Maximum optimum canopy conductance x100, mm/s.
    pub const MAX_GC_X100: usize = 16;
    /// Dominant PFT mean annual wetness, % x10.
    pub const WETNESS_X10: usize = 17;
    /// Potential fire days.
    pub const FIRE_DAYS: usize = 18;
    /// Green days.
    pub const GREEN_DAYS: usize = 19;
    /// Annual heterotrophic respiration x10.
    pub const HET_RESP_X10: usize = 20;
    /// Annual NEP x10.
    pub const NEP_X10: usize = 21;
    /// Mean C3 discrimination x10, per mil.
    pub const DELTA_C3_X10: usize = 22;
    /// Mean C4 (or mixed-ecosystem) discrimination x10, per mil.
    pub const DELTA_C4_X10: usize = 23;
    /// Bundle-sheath leakiness x100.
    pub const PHI_X100: usize = 24;
    /// C4 share of annual NPP, %.
    pub const C4_PERCENT: usize = 25;
    /// Annual mean assimilation/conductance ratio x100.
    pub const ASSIM_RATIO_X100: usize = 26;
    /// Mean litter decay rate x100.
    pub const LITTER_DECAY_X100: usize = 27;
    /// Mean soil decay rate x100.
    pub const SOIL_DECAY_X100: usize = 28;
    /// Coldest-month temperature x10, °C.
    pub const TCM_X10: usize = 29;
    /// Growing degree-days above 0 °C.
    pub const GDD0: usize = 30;
    /// Growing degree-days above 5 °C.
    pub const GDD5: usize = 31;
    /// Longitude x100.
    pub const LONGITUDE_X100: usize = 32;
    /// Latitude x100.
    pub const LATITUDE_X100: usize = 33;
    /// Maximum snowpack x10, mm.
    pub const SNOW_X10: usize = 34;

    /// Monthly blocks, 12 values each.
    pub const MONTHLY_FPAR_X100: usize = 40;
    pub const MONTHLY_NPP_X10: usize = 52;
    pub const MONTHLY_DISCRIMINATION_X100: usize = 64;
    pub const MONTHLY_GC_X100: usize = 76;
    pub const MONTHLY_LAI_X100: usize = 88;
    pub const MONTHLY_RUNOFF: usize = 100;
    pub const MONTHLY_HET_RESP_X10: usize = 112;
    pub const MONTHLY_ISO_FLUX_X10: usize = 124;
    pub const MONTHLY_CARBON_FLUX_X10: usize = 136;
    pub const MONTHLY_WETNESS_X100: usize = 148;
    pub const MONTHLY_WETNESS_TOP_X100: usize = 160;
    pub const MONTHLY_WETNESS_BOTTOM_X100: usize = 172;

    /// Ten-day LAI block, 37 values.
    pub const TEN_DAY_LAI_X100: usize = 184;

    /// Per-PFT blocks, 13 values each.
    pub const PFT_NPP: usize = 230;
    pub const PFT_LAI_X100: usize = 243;
}

/// Round half away from zero and truncate to integer storage.
fn round_i32(value: f64) -> i32 {
    value.round() as i32
}

/// Wire code for an optional PFT: index + 1, or 0 for none.
fn pft_code(pft: Option<Pft>) -> i32 {
    pft.map_or(0, |p| p.index() as i32 + 1)
}

/// Unpack and validate a flat input record.
///
/// # Errors
///
/// Returns [`ModelError::WrongVectorLength`] for a record that is not
/// exactly [`INPUT_LEN`] long, and [`ModelError::InvalidInput`] when a
/// field fails [`SiteClimate::validate`].
pub fn unpack_input(input: &[f64]) -> Result<SiteClimate, ModelError> {
    if input.len() != INPUT_LEN {
        return Err(ModelError::WrongVectorLength {
            expected: INPUT_LEN,
            actual: input.len(),
        });
    }

    let mut temperature = [0.0; MONTHS];
    let mut precipitation = [0.0; MONTHS];
    let mut cloud_cover = [0.0; MONTHS];
    for m in 0..MONTHS {
        temperature[m] = input[4 + m];
        precipitation[m] = input[16 + m];
        cloud_cover[m] = input[28 + m];
    }

    let tmin_raw = input[3];
    let tmin_coldest = if tmin_raw.is_nan() || tmin_raw <= TMIN_MISSING {
        None
    } else {
        Some(tmin_raw)
    };

    let climate = SiteClimate {
        latitude: input[0],
        longitude: input[48],
        co2_ppm: input[1],
        pressure_pa: input[2],
        tmin_coldest,
        temperature,
        precipitation,
        cloud_cover,
        soil: SoilProperties {
            percolation_index: input[40],
            percolation_index_bottom: input[41],
            whc_top: input[42],
            whc_bottom: input[43],
        },
    };
    climate.validate()?;
    Ok(climate)
}

/// Pack a cell result into the flat integer output record.
pub fn pack_output(output: &CellOutput) -> Vec<i32> {
    let mut v = vec![0i32; OUTPUT_LEN];
    let competition = &output.competition;
    let record = &competition.record;

    v[out::BIOME] = i32::from(competition.biome.id());
    v[out::DOMINANT_PFT] = if competition.mixed {
        14
    } else {
        pft_code(competition.dominant)
    };
    v[out::SUB_PFT] = pft_code(competition.sub_dominant);
    v[out::GRASS_PFT] = pft_code(competition.dominant_grass);
    v[out::NPP] = round_i32(competition.npp);
    v[out::LAI_X100] = round_i32(competition.lai * 100.0);
    if let Some(dominant) = competition.dominant {
        v[out::DOMINANT_NPP] = round_i32(output.pft_npp[dominant.index()]);
        v[out::DOMINANT_LAI_X100] = round_i32(output.pft_lai[dominant.index()] * 100.0);
    }
    if let Some(grass) = competition.dominant_grass {
        v[out::GRASS_NPP] = round_i32(output.pft_npp[grass.index()]);
        v[out::GRASS_LAI_X100] = round_i32(output.pft_lai[grass.index()] * 100.0);
    }
    v[out::PRECIPITATION] = round_i32(output.summary.annual_precipitation).min(9999);
    v[out::ANNUAL_PAR] = round_i32(record.annual_par);
    v[out::ANNUAL_FPAR] = round_i32(record.annual_fpar_pct);
    v[out::RESPIRATION_COST] = round_i32(record.respiration_cost_pct);
    v[out::ANNUAL_AET] = round_i32(record.annual_aet);
    v[out::ANNUAL_RUNOFF] = round_i32(record.annual_runoff);
    v[out::MAX_GC_X100] = round_i32(record.max_gc * 100.0);
    v[out::WETNESS_X10] = round_i32(competition.wetness_pct * 10.0);
    v[out::FIRE_DAYS] = round_i32(record.fire_days);
    v[out::GREEN_DAYS] = record.green_days as i32;
    v[out::HET_RESP_X10] = round_i32(record.annual_het_resp * 10.0);
    v[out::NEP_X10] = round_i32(record.annual_nep * 10.0);
    v[out::DELTA_C3_X10] = round_i32(record.delta_c3 * 10.0);
    v[out::DELTA_C4_X10] = round_i32(record.delta_c4 * 10.0);
    v[out::PHI_X100] = round_i32(record.phi * 100.0);
    v[out::C4_PERCENT] = round_i32(record.c4_npp_fraction * 100.0);
    v[out::ASSIM_RATIO_X100] = round_i32(record.mean_assimilation_ratio * 100.0);
    v[out::LITTER_DECAY_X100] = round_i32(record.mean_litter_decay * 100.0);
    v[out::SOIL_DECAY_X100] = round_i32(record.mean_soil_decay * 100.0);
    v[out::TCM_X10] = round_i32(output.summary.coldest_month * 10.0);
    v[out::GDD0] = round_i32(output.summary.gdd0);
    v[out::GDD5] = round_i32(output.summary.gdd5);
    v[out::LONGITUDE_X100] = round_i32(output.longitude * 100.0);
    v[out::LATITUDE_X100] = round_i32(output.latitude * 100.0);
    v[out::SNOW_X10] = round_i32(output.max_snow_depth * 10.0);

    for m in 0..MONTHS {
        v[out::MONTHLY_FPAR_X100 + m] = round_i32(record.monthly_fpar[m] * 100.0);
        v[out::MONTHLY_NPP_X10 + m] = round_i32(record.monthly_npp[m] * 10.0);
        v[out::MONTHLY_DISCRIMINATION_X100 + m] =
            round_i32(record.monthly_discrimination[m] * 100.0);
        v[out::MONTHLY_GC_X100 + m] = round_i32(record.monthly_gc[m] * 100.0);
        v[out::MONTHLY_LAI_X100 + m] = round_i32(record.monthly_lai[m] * 100.0);
        v[out::MONTHLY_RUNOFF + m] = round_i32(record.monthly_runoff[m]);
        v[out::MONTHLY_HET_RESP_X10 + m] = round_i32(record.monthly_het_resp[m] * 10.0);
        v[out::MONTHLY_ISO_FLUX_X10 + m] = round_i32(record.monthly_iso_flux[m] * 10.0);
        v[out::MONTHLY_CARBON_FLUX_X10 + m] = round_i32(record.monthly_carbon_flux[m] * 10.0);
        v[out::MONTHLY_WETNESS_X100 + m] = round_i32(record.monthly_wetness[m] * 100.0);
        v[out::MONTHLY_WETNESS_TOP_X100 + m] = round_i32(record.monthly_wetness_top[m] * 100.0);
        v[out::MONTHLY_WETNESS_BOTTOM_X100 + m] =
            round_i32(record.monthly_wetness_bottom[m] * 100.0);
    }

    for (i, &lai) in record.ten_day_lai.iter().enumerate() {
        v[out::TEN_DAY_LAI_X100 + i] = round_i32(lai * 100.0);
    }

    for pft in Pft::ALL {
        v[out::PFT_NPP + pft.index()] = round_i32(output.pft_npp[pft.index()]);
        v[out::PFT_LAI_X100 + pft.index()] = round_i32(output.pft_lai[pft.index()] * 100.0);
    }

    v
}
