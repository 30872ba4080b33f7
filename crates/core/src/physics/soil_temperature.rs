//! Monthly soil temperature from air temperature.
//!
//! A thermal-lag and damping transform after S. Sitch: soil temperature
//! tracks a damped version of the air-temperature departure from the annual
//! mean, lagged by a fraction of a month set by the damping depth.

use super::MONTHS;
use std::f64::consts::PI;

/// Soil thermal diffusivity classes (mm²/s scale factors).
const THERMAL_DIFFUSIVITY: [f64; 9] = [8.0, 4.5, 1.0, 5.25, 4.5, 2.75, 1.0, 1.0, 8.0];

/// Index into [`THERMAL_DIFFUSIVITY`] applied to every cell. The reference
/// formulation uses this one class regardless of soil texture; kept as-is
/// rather than generalized.
const DIFFUSIVITY_CLASS: usize = 1;

/// Compute monthly mean soil temperature from monthly mean air temperature.
///
/// Output is floored at -10 °C as a proxy for snow insulation.
pub fn soil_temperature(air: &[f64; MONTHS]) -> [f64; MONTHS] {
    let diffus = THERMAL_DIFFUSIVITY[DIFFUSIVITY_CLASS];
    let damp = 0.25 / diffus.sqrt();
    let lag = damp * (6.0 / PI);
    let amp = (-damp).exp();

    let mean: f64 = air.iter().sum::<f64>() / 12.0;

    let mut tsoil = [0.0; MONTHS];
    for m in 0..MONTHS {
        let prev = air[(m + MONTHS - 1) % MONTHS];
        tsoil[m] = (1.0 - amp) * mean + amp * (prev + (1.0 - lag) * (air[m] - prev));
        if tsoil[m] < -10.0 {
            tsoil[m] = -10.0;
        }
    }
    tsoil
}
