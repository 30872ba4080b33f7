//! Leaf-level daily photosynthesis, C3 and C4 pathways.
//!
//! An optimality-based coupled photosynthesis model: potential (optimal)
//! Rubisco capacity is derived at a reference ci/ca ratio, then realized
//! gross assimilation at the actual ratio is the smaller root of the
//! light/Rubisco co-limitation quadratic. The two pathways share this
//! structure and differ in quantum efficiency, dark respiration, the
//! temperature-stress response, and a CO2-starvation damage term unique
//! to C4.

use crate::core_types::{C4Pathway, PftParams};

/// Quantum efficiency of C3 assimilation.
const QEFF_C3: f64 = 0.08;
/// Dark respiration as a fraction of Vmax, C3.
const DRESP_C3: f64 = 0.015;
/// Dark respiration as a fraction of Vmax, C4.
const DRESP_C4: f64 = 0.03;
/// Co-limitation shape parameter.
const THETA: f64 = 0.7;
/// O2 partial mixing ratio scale (Pa per Pa, x1e5).
const O2_MIXING: f64 = 20.9e3;
/// Conversion from insolation to photosynthetically active mol quanta.
const J_TO_E: f64 = 2.3e-6;
/// Reference ci/ca ratio used for the optimal-Vmax derivation.
const OPT_RATIO_REFERENCE: f64 = 0.95;
/// Michaelis constant for O2 at 25 °C (Pa).
const KO25: f64 = 30.0e3;
/// Michaelis constant for CO2 at 25 °C (Pa).
const KC25: f64 = 30.0;
/// CO2/O2 specificity ratio at 25 °C.
const TAU25: f64 = 2600.0;
/// Molar mass of carbon (g/mol).
const C_MASS: f64 = 12.0;
/// Q10 of the CO2 Michaelis constant.
const KC_Q10: f64 = 2.1;
/// Q10 of the O2 Michaelis constant.
const KO_Q10: f64 = 1.2;
/// Q10 of the specificity ratio.
const TAU_Q10: f64 = 0.57;

/// Daily leaf-level assimilation terms for one month's average day.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeafAssimilation {
    /// Leaf dark respiration including the leaf-age cost factor
    /// (g C/m²/day).
    pub leaf_respiration: f64,
    /// Gross photosynthesis (g C/m²/day).
    pub gross: f64,
    /// Daytime net assimilation converted to a molar flux for the
    /// conductance coupling (mm/s scale).
    pub net_daytime: f64,
}

/// Sign-aware square root: negative radicands keep their sign instead of
/// producing NaN, matching the guarded reference arithmetic.
fn signed_sqrt(x: f64) -> f64 {
    x.signum() * x.abs().sqrt()
}

/// C3 photosynthesis for one month's average day.
///
/// `ratio` is the assumed ci/ca ratio, `sun` the daily insolation
/// (J/m²/day), `day_length` in hours, `fpar` the absorbed PAR fraction,
/// `pressure` in Pa and `ca` the ambient CO2 mole fraction.
pub fn c3_photosynthesis(
    ratio: f64,
    sun: f64,
    day_length: f64,
    temperature: f64,
    params: &PftParams,
    fpar: f64,
    pressure: f64,
    ca: f64,
) -> LeafAssimilation {
    let leaf_cost = (params.leaf_longevity / 12.0).powf(0.25);
    let o2 = pressure * (O2_MIXING / 1e5);
    let daytime = day_length.max(4.0);

    // Temperature stress: Arrhenius-like above the PFT's viability floor,
    // zero below it.
    let t_min = params.photo_t_min;
    let t_stress = if temperature > t_min + 0.1 {
        params.photo_t_curve * (-10.0 / (temperature - t_min)).exp()
    } else {
        0.0
    };

    let ko = KO25 * KO_Q10.powf((temperature - 25.0) / 10.0);
    let kc = KC25 * KC_Q10.powf((temperature - 25.0) / 10.0);
    let tau = TAU25 * TAU_Q10.powf((temperature - 25.0) / 10.0);

    let s = DRESP_C3 * (24.0 / daytime);
    let ts = o2 / (2.0 * tau);
    let kk = kc * (1.0 + o2 / ko);
    let z = C_MASS * J_TO_E * sun * fpar;

    // Optimal Vmax assuming the reference ci/ca ratio.
    let pi_ref = OPT_RATIO_REFERENCE * ca * pressure;
    let c1_ref = t_stress * QEFF_C3 * ((pi_ref - ts) / (pi_ref + 2.0 * ts));
    let c2_ref = (pi_ref - ts) / (pi_ref + kk);
    let oc = {
        let denominator = c2_ref - THETA * s;
        if denominator == 0.0 {
            0.0
        } else {
            signed_sqrt((s - THETA * s) / denominator)
        }
    };
    let vmax = if z == 0.0 || c2_ref == 0.0 {
        0.0
    } else {
        (z / DRESP_C3)
            * (c1_ref / c2_ref)
            * ((2.0 * THETA - 1.0) * s - (2.0 * THETA * s - c2_ref) * oc)
    };

    // Realized gross photosynthesis at the actual ratio.
    let pi = ratio * ca * pressure;
    let gross = if pi <= ts {
        // Below the CO2 compensation point.
        0.0
    } else {
        let c1 = t_stress * QEFF_C3 * ((pi - ts) / (pi + 2.0 * ts));
        let c2 = (pi - ts) / (pi + kk);
        let je = if z == 0.0 { 0.0 } else { c1 * z / daytime };
        let jc = if vmax == 0.0 { 0.0 } else { c2 * vmax / 24.0 };
        if je == 0.0 && jc == 0.0 {
            0.0
        } else {
            let wif = daytime / (2.0 * THETA);
            wif * (je + jc - ((je + jc) * (je + jc) - 4.0 * THETA * je * jc).sqrt())
        }
    };

    let net_mass = gross - (daytime / 24.0) * DRESP_C3 * vmax;
    let leaf_respiration = (DRESP_C3 * vmax * leaf_cost).max(0.0);
    let net_daytime = if net_mass == 0.0 {
        0.0
    } else {
        (net_mass / C_MASS) * (8.314 * (temperature + 273.3) / pressure) * 1000.0
    };

    LeafAssimilation {
        leaf_respiration,
        gross,
        net_daytime,
    }
}

/// C4 photosynthesis for one month's average day.
///
/// The obligate grass and the facultative shrub differ in quantum
/// efficiency and an overall yield tuning; both lose assimilation to CO2
/// starvation below a ci/ca ratio of 0.4.
pub fn c4_photosynthesis(
    ratio: f64,
    sun: f64,
    day_length: f64,
    temperature: f64,
    params: &PftParams,
    fpar: f64,
    pressure: f64,
    ca: f64,
) -> LeafAssimilation {
    let (qeff, tune) = match params.c4 {
        C4Pathway::Facultative => (0.0565, 0.75),
        _ => (0.0633, 1.0),
    };

    let leaf_cost = (params.leaf_longevity / 12.0).powf(0.25);
    let o2 = pressure * (O2_MIXING / 1e5);
    let daytime = day_length.max(4.0);

    // C4 viability window is flat across PFTs: 10 °C to 55 °C.
    let t_min = 10.0;
    let t_max = 55.0;
    let t_stress = if temperature > t_min + 0.1 && temperature < t_max {
        (-10.0 / (temperature - t_min)).exp().min(1.0)
    } else {
        0.0
    };

    let tau = TAU25 * TAU_Q10.powf((temperature - 25.0) / 10.0);

    let s = DRESP_C4 * (24.0 / daytime);
    let ts = o2 / (2.0 * tau);
    let z = C_MASS * J_TO_E * sun * fpar * tune;

    let pi = OPT_RATIO_REFERENCE * ca * pressure;
    let c1 = qeff * t_stress;
    let c2 = 1.0;
    let oc = signed_sqrt((s - THETA * s) / (c2 - THETA * s));

    let vmax = if z == 0.0 {
        0.0
    } else {
        (z / DRESP_C4) * (c1 / c2) * ((2.0 * THETA - 1.0) * s - (2.0 * THETA * s - c2) * oc)
    };

    let gross = if pi <= ts {
        0.0
    } else {
        let je = if z == 0.0 { 0.0 } else { c1 * z / daytime };
        let jc = if vmax == 0.0 { 0.0 } else { c2 * vmax / 24.0 };
        // CO2 starvation damage below the C4-saturating ci/ca ratio.
        let damage = if ratio < 0.4 { ratio / 0.4 } else { 1.0 };
        let wif = damage * daytime / (2.0 * THETA);
        if je == 0.0 && jc == 0.0 {
            0.0
        } else {
            wif * (je + jc - ((je + jc) * (je + jc) - 4.0 * THETA * je * jc).sqrt())
        }
    };

    let net_mass = gross - (daytime / 24.0) * DRESP_C4 * vmax;
    let leaf_respiration = DRESP_C4 * vmax * leaf_cost;
    let net_daytime = if gross == 0.0 && vmax == 0.0 {
        0.0
    } else {
        (net_mass / C_MASS) * (8.314 * (temperature + 273.3) / pressure) * 1000.0
    };

    LeafAssimilation {
        leaf_respiration,
        gross,
        net_daytime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::PftParams;

    const SUN: f64 = 17.0e6; // J/m²/day, clear midsummer
    const P: f64 = 101325.0;
    const CA: f64 = 360.0e-6;

    #[test]
    fn test_c3_produces_positive_assimilation_in_season() {
        let params = PftParams::temperate_summergreen();
        let result = c3_photosynthesis(0.8, SUN, 15.0, 20.0, &params, 0.8, P, CA);
        assert!(result.gross > 0.0, "gross was {}", result.gross);
        assert!(result.net_daytime > 0.0);
        assert!(result.leaf_respiration > 0.0);
    }

    #[test]
    fn test_c3_shuts_down_below_viability_floor() {
        let params = PftParams::temperate_summergreen(); // floor 4 °C
        let result = c3_photosynthesis(0.8, SUN, 12.0, 2.0, &params, 0.8, P, CA);
        assert_eq!(result.gross, 0.0);
        assert_eq!(result.leaf_respiration, 0.0);
    }

    #[test]
    fn test_no_light_means_no_carbon() {
        let params = PftParams::boreal_evergreen();
        let result = c3_photosynthesis(0.8, 0.0, 8.0, 10.0, &params, 0.5, P, CA);
        assert_eq!(result.gross, 0.0);
        assert_eq!(result.net_daytime, 0.0);
        assert_eq!(result.leaf_respiration, 0.0);
    }

    #[test]
    fn test_c4_starvation_damage_scales_low_ratios() {
        let params = PftParams::tropical_grass();
        let full = c4_photosynthesis(0.4, SUN, 12.0, 30.0, &params, 0.8, P, CA);
        let starved = c4_photosynthesis(0.2, SUN, 12.0, 30.0, &params, 0.8, P, CA);
        assert!(full.gross > 0.0);
        // Halving the ratio below 0.4 halves the co-limited yield.
        assert!(starved.gross < full.gross);
        assert!((starved.gross - 0.5 * full.gross).abs() < 1e-9 * full.gross.max(1.0));
    }

    #[test]
    fn test_c4_cold_months_are_dormant() {
        let params = PftParams::tropical_grass();
        let result = c4_photosynthesis(0.4, SUN, 12.0, 5.0, &params, 0.8, P, CA);
        assert_eq!(result.gross, 0.0);
    }

    #[test]
    fn test_facultative_tuning_reduces_c4_yield() {
        let grass = PftParams::tropical_grass();
        let shrub = PftParams::desert_shrub();
        let g = c4_photosynthesis(0.4, SUN, 12.0, 30.0, &grass, 0.8, P, CA);
        let s = c4_photosynthesis(0.4, SUN, 12.0, 30.0, &shrub, 0.8, P, CA);
        assert!(s.gross < g.gross);
    }

    #[test]
    fn test_gross_is_nonnegative_across_ratio_sweep() {
        let params = PftParams::cool_conifer();
        let mut ratio = 0.02;
        while ratio <= 1.0 {
            let result = c3_photosynthesis(ratio, SUN, 14.0, 15.0, &params, 0.7, P, CA);
            assert!(result.gross >= 0.0, "ratio {ratio}: {}", result.gross);
            ratio += 0.02;
        }
    }
}
