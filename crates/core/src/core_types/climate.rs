//! Per-cell climate and soil input records.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Soil hydraulic description of one grid cell.
///
/// Two percolation indices arrive from the soil raster. The water balance
/// uses only the first (the original formulation applies one reference
/// texture to both layers); the second is carried so the boundary record
/// round-trips intact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilProperties {
    /// Percolation index of the top layer (~0-7).
    pub percolation_index: f64,
    /// Percolation index of the bottom layer. Stored, not consumed.
    pub percolation_index_bottom: f64,
    /// Water-holding capacity of the top layer (mm).
    pub whc_top: f64,
    /// Water-holding capacity of the bottom layer (mm).
    pub whc_bottom: f64,
}

/// Monthly climate normals and site scalars for one grid cell.
///
/// Immutable for the duration of one cell's computation; produced by the
/// external grid reader (or the CLI) and consumed by [`crate::simulation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteClimate {
    /// Latitude in decimal degrees, positive north.
    pub latitude: f64,
    /// Longitude in decimal degrees. Pass-through metadata for the output
    /// record; the physics never reads it.
    pub longitude: f64,
    /// Atmospheric CO2 concentration (ppm).
    pub co2_ppm: f64,
    /// Surface air pressure (Pa).
    pub pressure_pa: f64,
    /// Absolute minimum temperature of the coldest month (°C). `None` when
    /// the driver has no such field; the quadratic estimate from the monthly
    /// mean is used instead.
    pub tmin_coldest: Option<f64>,
    /// Mean temperature per month (°C), January first.
    pub temperature: [f64; 12],
    /// Total precipitation per month (mm).
    pub precipitation: [f64; 12],
    /// Cloud cover per month (%).
    pub cloud_cover: [f64; 12],
    /// Soil hydraulic parameters.
    pub soil: SoilProperties,
}

impl SiteClimate {
    /// Check the record for structurally invalid values. Numerical
    /// extremes are legitimate inputs (the model must classify ice caps);
    /// only non-finite fields and impossible magnitudes are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidInput`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), ModelError> {
        fn finite(value: f64, field: &'static str) -> Result<(), ModelError> {
            if value.is_finite() {
                Ok(())
            } else {
                Err(ModelError::InvalidInput {
                    field,
                    message: format!("non-finite value {value}"),
                })
            }
        }

        finite(self.latitude, "latitude")?;
        if self.latitude < -90.0 || self.latitude > 90.0 {
            return Err(ModelError::InvalidInput {
                field: "latitude",
                message: format!("{} is outside [-90, 90]", self.latitude),
            });
        }
        finite(self.longitude, "longitude")?;
        finite(self.co2_ppm, "co2_ppm")?;
        if self.co2_ppm <= 0.0 {
            return Err(ModelError::InvalidInput {
                field: "co2_ppm",
                message: "CO2 concentration must be positive".to_string(),
            });
        }
        finite(self.pressure_pa, "pressure_pa")?;
        if self.pressure_pa <= 0.0 {
            return Err(ModelError::InvalidInput {
                field: "pressure_pa",
                message: "surface pressure must be positive".to_string(),
            });
        }
        if let Some(tmin) = self.tmin_coldest {
            finite(tmin, "tmin_coldest")?;
        }
        for m in 0..12 {
            finite(self.temperature[m], "temperature")?;
            finite(self.precipitation[m], "precipitation")?;
            finite(self.cloud_cover[m], "cloud_cover")?;
            if self.precipitation[m] < 0.0 {
                return Err(ModelError::InvalidInput {
                    field: "precipitation",
                    message: format!("month {m} has negative precipitation"),
                });
            }
        }
        finite(self.soil.percolation_index, "soil.percolation_index")?;
        finite(self.soil.whc_top, "soil.whc_top")?;
        finite(self.soil.whc_bottom, "soil.whc_bottom")?;
        if self.soil.whc_top < 0.0 || self.soil.whc_bottom < 0.0 {
            return Err(ModelError::InvalidInput {
                field: "soil",
                message: "water-holding capacity cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> SiteClimate {
        SiteClimate {
            latitude: 46.5,
            longitude: 8.0,
            co2_ppm: 360.0,
            pressure_pa: 101325.0,
            tmin_coldest: Some(-12.0),
            temperature: [-5.0, -3.0, 2.0, 7.0, 12.0, 16.0, 20.0, 19.0, 14.0, 8.0, 2.0, -3.0],
            precipitation: [75.0; 12],
            cloud_cover: [60.0; 12],
            soil: SoilProperties {
                percolation_index: 4.0,
                percolation_index_bottom: 4.0,
                whc_top: 120.0,
                whc_bottom: 180.0,
            },
        }
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(valid_record().validate().is_ok());
    }

    #[test]
    fn test_nan_temperature_rejected() {
        let mut record = valid_record();
        record.temperature[5] = f64::NAN;
        let err = record.validate().unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidInput {
                field: "temperature",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_precipitation_rejected() {
        let mut record = valid_record();
        record.precipitation[0] = -1.0;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_out_of_range_latitude_rejected() {
        let mut record = valid_record();
        record.latitude = 95.0;
        assert!(record.validate().is_err());
    }
}
