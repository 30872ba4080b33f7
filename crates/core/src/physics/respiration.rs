//! Maintenance and growth respiration, and the annual NPP budget.
//!
//! Stem maintenance follows a Lloyd-Taylor temperature response scaled by
//! sapwood mass; root maintenance is allocated proportionally to the stem
//! response's monthly shape; growth respiration takes a fixed share of the
//! assimilate left after maintenance. A plant that cannot replace its own
//! litterfall at this leaf area is flagged infeasible.

use super::MONTHS;
use crate::core_types::{GrowthHabit, PftParams};

/// Sentinel NPP for "this PFT cannot sustain itself at this LAI". Consumed
/// by the optimizer as "worse than anything seen"; never an error.
pub const NPP_INFEASIBLE: f64 = -9999.0;

/// Leaf nitrogen-scaled litterfall per unit LAI (g C/m² per LAI).
const LITTER_PER_LAI: f64 = 50.0;
/// Share of post-maintenance assimilate kept as growth (the rest is
/// respired).
const GROWTH_YIELD: f64 = 0.8;
/// Fine-root respiration as a fraction of litterfall.
const ROOT_RESP_FRACTION: f64 = 0.25;
/// Sapwood carbon per unit LAI scale.
const STEM_CARBON: f64 = 0.5;
/// Lloyd-Taylor activation parameter.
const E0: f64 = 308.56;
/// Lloyd-Taylor reference temperature (°C).
const T_REF: f64 = 10.0;
/// Lloyd-Taylor temperature offset (°C).
const T0: f64 = 46.02;

/// Annual respiration budget for one PFT at one LAI.
#[derive(Debug, Clone)]
pub struct RespirationBudget {
    /// Annual NPP (g C/m²/yr), or [`NPP_INFEASIBLE`].
    pub npp: f64,
    /// Annual stem maintenance respiration (g C/m²/yr).
    pub stem_respiration: f64,
    /// Respiration costs as a percentage of GPP.
    pub cost_percent: f64,
    /// Monthly stem maintenance respiration.
    pub monthly_stem: [f64; MONTHS],
    /// Monthly root maintenance respiration.
    pub monthly_root: [f64; MONTHS],
    /// Monthly background leaf maintenance.
    pub monthly_leaf_maintenance: [f64; MONTHS],
}

/// Derive the annual respiration budget and NPP from annual GPP.
///
/// `annual_leaf_respiration` is the summed monthly leaf dark respiration
/// from the photosynthesis pass; `fpar` the absorbed-PAR fraction of the
/// full canopy.
pub fn respiration(
    gpp: f64,
    annual_leaf_respiration: f64,
    temperature: &[f64; MONTHS],
    params: &PftParams,
    lai: f64,
    fpar: f64,
) -> RespirationBudget {
    let litterfall = lai * LITTER_PER_LAI * params.alloc_factor;

    // Stem maintenance: Lloyd-Taylor response, frozen out below -T0.
    let mut monthly_stem = [0.0; MONTHS];
    let mut stem_respiration = 0.0;
    for m in 0..MONTHS {
        if temperature[m] > -T0 {
            monthly_stem[m] = lai
                * STEM_CARBON
                * params.resp_factor
                * (E0 * (1.0 / (T_REF + T0) - 1.0 / (temperature[m] + T0))).exp();
        }
        stem_respiration += monthly_stem[m];
    }

    // Roots follow the stem response's monthly shape; background leaf
    // maintenance scales with root activity and canopy cover.
    let fine_root_respiration = ROOT_RESP_FRACTION * litterfall;
    let mut monthly_root = [0.0; MONTHS];
    let mut monthly_leaf_maintenance = [0.0; MONTHS];
    let mut leaf_maintenance = 0.0;
    for m in 0..MONTHS {
        let share = if stem_respiration > 0.0 {
            monthly_stem[m] / stem_respiration
        } else {
            1.0 / 12.0
        };
        monthly_root[m] = share * fine_root_respiration;
        monthly_leaf_maintenance[m] = monthly_root[m] * fpar * 4.0;
        leaf_maintenance += monthly_leaf_maintenance[m];
    }

    let leaf_respiration = annual_leaf_respiration + leaf_maintenance;

    // Grasses carry no sapwood.
    if params.habit == GrowthHabit::Grass {
        stem_respiration = 0.0;
        monthly_stem = [0.0; MONTHS];
    }

    let growth_respiration =
        (1.0 - GROWTH_YIELD) * (gpp - stem_respiration - leaf_respiration - fine_root_respiration);
    let mut npp =
        gpp - stem_respiration - leaf_respiration - fine_root_respiration - growth_respiration;

    // Minimum allocation: NPP must at least replace litterfall.
    if npp < litterfall {
        npp = NPP_INFEASIBLE;
    }

    let cost_percent = if gpp > 0.0 && npp != NPP_INFEASIBLE {
        100.0 * (gpp - npp) / gpp
    } else {
        0.0
    };

    RespirationBudget {
        npp,
        stem_respiration,
        cost_percent,
        monthly_stem,
        monthly_root,
        monthly_leaf_maintenance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::PftParams;

    const TEMPERATE: [f64; MONTHS] = [
        -5.0, -3.0, 2.0, 7.0, 12.0, 16.0, 20.0, 19.0, 14.0, 8.0, 2.0, -3.0,
    ];

    #[test]
    fn test_zero_gpp_never_yields_positive_npp() {
        let params = PftParams::temperate_summergreen();
        let budget = respiration(0.0, 0.0, &TEMPERATE, &params, 2.0, 0.7);
        assert!(budget.npp <= 0.0);
        assert_eq!(budget.cost_percent, 0.0);
    }

    #[test]
    fn test_productive_canopy_is_feasible() {
        let params = PftParams::temperate_summergreen();
        let budget = respiration(1500.0, 120.0, &TEMPERATE, &params, 2.0, 0.7);
        assert!(budget.npp > 0.0);
        assert!(budget.npp < 1500.0);
        assert!(budget.cost_percent > 0.0 && budget.cost_percent < 100.0);
    }

    #[test]
    fn test_undersized_gpp_is_flagged_infeasible() {
        let params = PftParams::temperate_summergreen();
        // A large canopy with almost no assimilation cannot replace its
        // litterfall.
        let budget = respiration(50.0, 20.0, &TEMPERATE, &params, 6.0, 0.9);
        assert_eq!(budget.npp, NPP_INFEASIBLE);
    }

    #[test]
    fn test_grasses_have_no_stem_respiration() {
        let params = PftParams::temperate_grass();
        let budget = respiration(800.0, 60.0, &TEMPERATE, &params, 1.5, 0.5);
        assert_eq!(budget.stem_respiration, 0.0);
        assert!(budget.monthly_stem.iter().all(|&r| r == 0.0));
        // Root respiration still follows the temperature shape.
        assert!(budget.monthly_root.iter().sum::<f64>() > 0.0);
    }

    #[test]
    fn test_stem_respiration_tracks_temperature() {
        let params = PftParams::boreal_evergreen();
        let budget = respiration(900.0, 50.0, &TEMPERATE, &params, 2.0, 0.6);
        // July (index 6) is the warmest month and must respire the most.
        let max_month = budget
            .monthly_stem
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(m, _)| m)
            .unwrap();
        assert_eq!(max_month, 6);
    }
}
