//! Physical sub-models of the per-cell pipeline.
//!
//! Each module is a pure function (or small family of them) over its inputs;
//! the solver layer wires them together. Calendar constants shared by the
//! daily time-stepping models live here.

pub mod climate_summary;
pub mod daily;
pub mod fire;
pub mod hydrology;
pub mod insolation;
pub mod isotope;
pub mod phenology;
pub mod photosynthesis;
pub mod respiration;
pub mod snow;
pub mod soil_carbon;
pub mod soil_temperature;

/// Months per model year.
pub const MONTHS: usize = 12;

/// Days per model year (no leap years; climatology, not weather).
pub const DAYS_PER_YEAR: usize = 365;

/// Calendar month lengths.
pub const DAYS_IN_MONTH: [usize; MONTHS] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Mid-month anchor days (1-based day of year) that monthly values are
/// pinned to when interpolating to daily resolution.
pub const MIDMONTH_DAY: [usize; MONTHS] = [16, 44, 75, 105, 136, 166, 197, 228, 258, 289, 319, 350];
