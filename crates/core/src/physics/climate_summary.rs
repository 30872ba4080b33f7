//! Annual climate indices derived from the monthly and daily series.

use super::{DAYS_PER_YEAR, MONTHS};

/// Derived climate indices for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSummary {
    /// Mean temperature of the coldest month (°C).
    pub coldest_month: f64,
    /// Mean temperature of the warmest month (°C).
    pub warmest_month: f64,
    /// Growing degree-days above 5 °C.
    pub gdd5: f64,
    /// Growing degree-days above 0 °C.
    pub gdd0: f64,
    /// Total annual precipitation (mm).
    pub annual_precipitation: f64,
    /// Regression estimate of the absolute minimum temperature from the
    /// coldest monthly mean; used when the driver supplies no minimum field.
    pub estimated_tmin: f64,
    /// Warmest minus coldest monthly mean (°C). An assumed definition of
    /// the seasonal temperature range carried over from the reference
    /// formulation; no authoritative source defines it, so its behavior is
    /// pinned by a regression test rather than revised.
    pub seasonal_range: f64,
}

/// Summarize monthly temperature/precipitation and the interpolated daily
/// temperature series.
pub fn summarize(
    temperature: &[f64; MONTHS],
    precipitation: &[f64; MONTHS],
    daily_temperature: &[f64; DAYS_PER_YEAR],
) -> ClimateSummary {
    let mut coldest = 100.0_f64;
    let mut warmest = -100.0_f64;
    let mut rain = 0.0;
    for m in 0..MONTHS {
        coldest = coldest.min(temperature[m]);
        warmest = warmest.max(temperature[m]);
        rain += precipitation[m];
    }

    let mut gdd5 = 0.0;
    let mut gdd0 = 0.0;
    for &t in daily_temperature {
        gdd5 += (t - 5.0).max(0.0);
        gdd0 += t.max(0.0);
    }

    let estimated_tmin = 0.006 * coldest * coldest + 1.316 * coldest - 21.9;

    ClimateSummary {
        coldest_month: coldest,
        warmest_month: warmest,
        gdd5,
        gdd0,
        annual_precipitation: rain,
        estimated_tmin,
        seasonal_range: warmest - coldest,
    }
}
