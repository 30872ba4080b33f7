//! Dominance competition and biome assignment.
//!
//! Consumes every PFT's optimized NPP/LAI record and resolves the
//! ecologically dominant vegetation through a rule tree: woody and grass
//! classes compete on productivity, with fire, drought and cold overrides
//! that can demote the leading woody PFT to its runner-up (at most once)
//! or hand the cell to grasses, shrubs or a mixed tree/grass savanna. The
//! resolved winner plus auxiliary climate signals then map to one of 28
//! biome classes.

use super::growth::PftDiagnostics;
use super::optimizer::OptimizedPft;
use crate::core_types::{Biome, Pft, NUM_PFTS};
use crate::physics::MONTHS;
use tracing::debug;

/// Tree cover fraction in a mixed savanna: 1.6 * (wood NPP / grass NPP)
/// - 0.54, clamped to [0, 1].
fn tree_cover_fraction(wood_npp: f64, grass_npp: f64) -> f64 {
    if grass_npp <= 0.0 {
        return 1.0;
    }
    ((8.0 / 5.0) * (wood_npp / grass_npp) - 0.54).clamp(0.0, 1.0)
}

/// The resolved winner of the dominance rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Winner {
    /// A single PFT dominates outright.
    Single(Pft),
    /// Mixed tree/grass savanna or woodland.
    Mixed,
}

/// State of the bounded demotion loop. The fire/productivity overrides may
/// demote the working dominant to the sub-dominant woody PFT exactly once;
/// the state makes that one-shot guarantee explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DominanceState {
    InitialDominant,
    RetriedOnce,
}

/// Inputs to the competition step beyond the per-PFT records.
#[derive(Debug, Clone, Copy)]
pub struct CompetitionInputs {
    /// Adjusted absolute minimum temperature (°C).
    pub tmin: f64,
    /// Total annual precipitation (mm).
    pub total_precipitation: f64,
    /// Growing degree-days above 0 °C.
    pub gdd0: f64,
    /// Growing degree-days above 5 °C.
    pub gdd5: f64,
    /// Coldest-month mean temperature (°C).
    pub tcm: f64,
}

/// Outcome of competition for one cell.
#[derive(Debug, Clone)]
pub struct CompetitionOutcome {
    /// Assigned biome.
    pub biome: Biome,
    /// The PFT whose diagnostic record feeds the output (the woody partner
    /// in a mixed cell). `None` only for barren cells.
    pub dominant: Option<Pft>,
    /// Resolved dominant woody PFT, after any demotion.
    pub dominant_woody: Option<Pft>,
    /// Most productive grass-class PFT.
    pub dominant_grass: Option<Pft>,
    /// Runner-up tree PFT.
    pub sub_dominant: Option<Pft>,
    /// Woody PFT with the largest LAI (ties defer to the NPP leader).
    pub woody_max_lai: Option<Pft>,
    /// Whether the mixed tree/grass blend was applied.
    pub mixed: bool,
    /// Tree cover fraction of a mixed cell (1 for single-PFT cells).
    pub tree_cover: f64,
    /// NPP of the reported cell (blended in mixed cells, g C/m²/yr).
    pub npp: f64,
    /// LAI of the reported cell (blended in mixed cells).
    pub lai: f64,
    /// LAI of the dominant grass.
    pub grass_lai: f64,
    /// Mean annual wetness of the dominant PFT (%).
    pub wetness_pct: f64,
    /// Driest month (1-12) per PFT, 0 where undefined.
    pub driest_month: [u8; NUM_PFTS],
    /// Diagnostic record feeding the output row; blended for mixed cells.
    pub record: PftDiagnostics,
}

/// Per-PFT mean annual wetness on the percent scale: the annual mean of
/// the top/bottom layer average.
fn annual_wetness_pct(diag: &PftDiagnostics) -> f64 {
    let mut sum = 0.0;
    for m in 0..MONTHS {
        sum += (diag.monthly_wetness_top[m] + diag.monthly_wetness_bottom[m]) / 2.0;
    }
    100.0 * sum / 12.0
}

/// Month (1-12) of minimum root-zone wetness.
fn driest_month_of(diag: &PftDiagnostics) -> u8 {
    let mut driest = f64::INFINITY;
    let mut month = 0u8;
    for m in 0..MONTHS {
        if diag.monthly_wetness[m] < driest {
            driest = diag.monthly_wetness[m];
            month = (m + 1) as u8;
        }
    }
    month
}

/// Blend the wood and grass records of a mixed cell, tree to grass
/// weighted 1:2 except where tree cover weighting applies.
fn blend_records(
    wood: &PftDiagnostics,
    grass: &PftDiagnostics,
    tree_cover: f64,
) -> PftDiagnostics {
    let mut blended = wood.clone();
    let two_to_one = |w: f64, g: f64| (w + 2.0 * g) / 3.0;
    for m in 0..MONTHS {
        blended.monthly_npp[m] = two_to_one(wood.monthly_npp[m], grass.monthly_npp[m]);
        blended.monthly_discrimination[m] = two_to_one(
            wood.monthly_discrimination[m],
            grass.monthly_discrimination[m],
        );
        blended.monthly_het_resp[m] =
            two_to_one(wood.monthly_het_resp[m], grass.monthly_het_resp[m]);
        blended.monthly_carbon_flux[m] =
            two_to_one(wood.monthly_carbon_flux[m], grass.monthly_carbon_flux[m]);
    }
    blended.npp = two_to_one(wood.npp, grass.npp);
    blended.c4_npp_fraction = two_to_one(wood.c4_npp_fraction, grass.c4_npp_fraction);
    // The mixed-ecosystem discrimination weights by actual tree cover.
    blended.delta_c4 = tree_cover * wood.delta_c4 + (1.0 - tree_cover) * grass.delta_c4;
    blended
}

/// Resolve dominance and assign the biome for one cell.
pub fn resolve_dominance(
    optimized: &[OptimizedPft; NUM_PFTS],
    inputs: &CompetitionInputs,
) -> CompetitionOutcome {
    let npp_of = |pft: Pft| optimized[pft.index()].npp;
    let lai_of = |pft: Pft| optimized[pft.index()].lai;

    // Presence: positive optimized NPP. The lichen/cushion-forb cover is
    // assumed available wherever the sieve ran at all.
    let mut present = [false; NUM_PFTS];
    for pft in Pft::ALL {
        present[pft.index()] = npp_of(pft) > 0.0;
    }
    present[Pft::LichenForb.index()] = true;

    // Most productive grass.
    let mut grass_pft: Option<Pft> = None;
    let mut grass_npp = 0.0_f64;
    for pft in Pft::ALL.into_iter().filter(|p| p.is_grass_class()) {
        if npp_of(pft) > grass_npp {
            grass_npp = npp_of(pft);
            grass_pft = Some(pft);
        }
    }

    // Most productive woody competitor, and the largest-LAI one (LAI ties
    // defer to the NPP leader).
    let mut woody_by_npp: Option<Pft> = None;
    let mut max_woody_npp = 0.0_f64;
    for pft in Pft::ALL.into_iter().filter(|p| p.is_woody_competitor()) {
        if npp_of(pft) > max_woody_npp {
            max_woody_npp = npp_of(pft);
            woody_by_npp = Some(pft);
        }
    }
    let mut woody_by_lai: Option<Pft> = None;
    let mut max_woody_lai = 0.0_f64;
    for pft in Pft::ALL.into_iter().filter(|p| p.is_woody_competitor()) {
        if lai_of(pft) > max_woody_lai {
            max_woody_lai = lai_of(pft);
            woody_by_lai = Some(pft);
        } else if lai_of(pft) == max_woody_lai {
            if let Some(leader) = woody_by_npp {
                max_woody_lai = lai_of(leader);
                woody_by_lai = Some(leader);
            }
        }
    }

    // Per-PFT wetness diagnostics.
    let mut wetness = [0.0_f64; NUM_PFTS];
    let mut driest_month = [0u8; NUM_PFTS];
    for pft in Pft::ALL {
        let diag = &optimized[pft.index()].diagnostics;
        wetness[pft.index()] = annual_wetness_pct(diag);
        driest_month[pft.index()] = driest_month_of(diag);
    }

    // Runner-up among the trees.
    let sub_dominant_tree = |excluding: Option<Pft>| -> Option<Pft> {
        let mut sub: Option<Pft> = None;
        let mut sub_npp = 0.0_f64;
        for pft in Pft::ALL.into_iter().filter(|p| p.is_tree()) {
            if Some(pft) != excluding && npp_of(pft) > sub_npp {
                sub_npp = npp_of(pft);
                sub = Some(pft);
            }
        }
        sub
    };

    let mut wdom = woody_by_npp;
    let mut sub = sub_dominant_tree(wdom);
    let mut state = DominanceState::InitialDominant;

    // Bounded rule loop: reassignments of the working dominant re-enter at
    // the top; the demotion retry fires at most once.
    let mut winner: Option<Winner> = None;
    for _attempt in 0..6 {
        let woody_lai = wdom.map_or(0.0, lai_of);
        let woody_npp = wdom.map_or(0.0, npp_of);
        let fire_days = wdom.map_or(0.0, |w| optimized[w.index()].diagnostics.fire_days);
        let green_days = wdom.map_or(0, |w| optimized[w.index()].diagnostics.green_days);
        let npp_margin = woody_npp - grass_npp;
        let grass_winner = grass_pft.map(Winner::Single);

        // Frost-free, high-GDD cells: broadleaf evergreen or cool conifer
        // leadership passes to the tropical raingreen tree.
        if matches!(
            wdom,
            Some(Pft::TemperateBroadleafEvergreen | Pft::CoolConifer)
        ) && inputs.tmin > 0.0
            && inputs.gdd5 > 5000.0
        {
            wdom = Some(Pft::TropicalRaingreen);
            continue;
        }

        winner = match wdom {
            Some(w @ Pft::TropicalRaingreen) => {
                if woody_lai < 2.0 {
                    grass_winner
                } else if grass_pft == Some(Pft::TropicalGrass) && woody_lai < 3.6 {
                    Some(Winner::Mixed)
                } else if green_days < 270 && inputs.tcm > 21.0 && inputs.total_precipitation < 1700.0
                {
                    Some(Winner::Mixed)
                } else {
                    Some(Winner::Single(w))
                }
            }
            Some(w @ Pft::TemperateBroadleafEvergreen) => {
                if woody_npp < 140.0 || woody_lai < 1.0 {
                    grass_winner
                } else if woody_lai < 2.0 {
                    Some(Winner::Mixed)
                } else {
                    Some(Winner::Single(w))
                }
            }
            Some(w @ Pft::TemperateSummergreen) => {
                if woody_lai < 2.0 {
                    grass_winner
                } else if fire_days > 210.0 && npp_margin < 0.0 {
                    if state == DominanceState::InitialDominant && sub.is_some() {
                        wdom = sub;
                        sub = Some(Pft::TemperateSummergreen);
                        state = DominanceState::RetriedOnce;
                        continue;
                    }
                    grass_winner
                } else if woody_lai < 3.0 || fire_days > 180.0 {
                    if npp_margin < 0.0 {
                        Some(Winner::Mixed)
                    } else {
                        if state == DominanceState::InitialDominant && sub.is_some() {
                            wdom = sub;
                            sub = Some(Pft::TemperateSummergreen);
                            state = DominanceState::RetriedOnce;
                            continue;
                        }
                        Some(Winner::Single(w))
                    }
                } else {
                    Some(Winner::Single(w))
                }
            }
            Some(w @ Pft::CoolConifer) => {
                if present[Pft::TemperateSummergreen.index()] {
                    // Deciduous broadleaves displace the conifer where
                    // both persist.
                    wdom = Some(Pft::TemperateSummergreen);
                    sub = Some(Pft::CoolConifer);
                    continue;
                }
                if npp_of(w) < 140.0 {
                    grass_winner
                } else if woody_lai < 1.2 {
                    Some(Winner::Mixed)
                } else {
                    Some(Winner::Single(w))
                }
            }
            Some(w @ Pft::BorealEvergreen) => {
                if woody_npp < 140.0 {
                    grass_winner
                } else {
                    if fire_days > 90.0
                        && state == DominanceState::InitialDominant
                        && sub.is_some()
                    {
                        wdom = sub;
                        sub = Some(Pft::BorealEvergreen);
                        state = DominanceState::RetriedOnce;
                        continue;
                    }
                    Some(Winner::Single(w))
                }
            }
            Some(w @ Pft::BorealSummergreen) => {
                if woody_npp < 120.0 {
                    grass_winner
                } else if wetness[w.index()] < 30.0 && npp_margin < 0.0 {
                    grass_winner
                } else {
                    Some(Winner::Single(w))
                }
            }
            Some(w) => Some(Winner::Single(w)),
            None => {
                if grass_pft.is_some() {
                    grass_winner
                } else if npp_of(Pft::LichenForb) > 0.0 {
                    Some(Winner::Single(Pft::LichenForb))
                } else {
                    None
                }
            }
        };

        // Post rules: shrub fallbacks and grass/shrub exchanges.
        if winner.is_none() && present[Pft::DesertShrub.index()] {
            winner = Some(Winner::Single(Pft::DesertShrub));
        }
        if winner == Some(Winner::Single(Pft::DesertShrub))
            && grass_pft != Some(Pft::TropicalGrass)
            && grass_npp > npp_of(Pft::DesertShrub)
        {
            winner = grass_winner;
        }
        if let (Some(Winner::Single(p)), Some(g)) = (winner, grass_pft) {
            if p == g && lai_of(g) < 1.8 && present[Pft::DesertShrub.index()] {
                winner = Some(Winner::Single(Pft::DesertShrub));
            }
        }
        if winner == Some(Winner::Single(Pft::TundraShrub))
            && wetness[Pft::TundraShrub.index()] <= 25.0
            && present[Pft::ColdHerbaceous.index()]
        {
            winner = Some(Winner::Single(Pft::ColdHerbaceous));
        }

        break;
    }

    // Assemble the output record.
    let (dominant, mixed) = match winner {
        Some(Winner::Single(p)) => (Some(p), false),
        Some(Winner::Mixed) => (wdom, true),
        None => (None, false),
    };

    let mut tree_cover = 1.0;
    let mut record =
        dominant.map_or_else(PftDiagnostics::default, |p| optimized[p.index()].diagnostics.clone());
    let mut npp = dominant.map_or(0.0, npp_of);
    let mut lai = dominant.map_or(0.0, lai_of);

    if mixed {
        if let (Some(w), Some(g)) = (wdom, grass_pft) {
            let wood = &optimized[w.index()].diagnostics;
            let grass = &optimized[g.index()].diagnostics;
            tree_cover = tree_cover_fraction(npp_of(w), npp_of(g));
            record = blend_records(wood, grass, tree_cover);
            npp = (npp_of(w) + 2.0 * npp_of(g)) / 3.0;
            lai = (lai_of(w) + 2.0 * lai_of(g)) / 3.0;
        }
    }

    let grass_lai = grass_pft.map_or(0.0, lai_of);
    let wetness_pct = dominant.map_or(0.0, |p| wetness[p.index()]);
    let green_days = wdom.map_or(0, |w| optimized[w.index()].diagnostics.green_days);

    let biome = assign_biome(
        winner,
        wdom,
        sub,
        dominant.map_or(0.0, npp_of),
        green_days,
        wdom.map_or(0.0, lai_of),
        grass_lai,
        &present,
        inputs,
    );

    debug!(
        biome = biome.name(),
        dominant = ?dominant,
        woody = ?wdom,
        grass = ?grass_pft,
        mixed,
        "competition resolved"
    );

    CompetitionOutcome {
        biome,
        dominant,
        dominant_woody: wdom,
        dominant_grass: grass_pft,
        sub_dominant: sub,
        woody_max_lai: woody_by_lai,
        mixed,
        tree_cover,
        npp,
        lai,
        grass_lai,
        wetness_pct,
        driest_month,
        record,
    }
}

/// Map the resolved winner and auxiliary signals to a biome class.
fn assign_biome(
    winner: Option<Winner>,
    wdom: Option<Pft>,
    sub: Option<Pft>,
    dominant_npp: f64,
    green_days: u32,
    woody_lai: f64,
    grass_lai: f64,
    present: &[bool; NUM_PFTS],
    inputs: &CompetitionInputs,
) -> Biome {
    let winner = match winner {
        None => return Biome::Barren,
        Some(w) => w,
    };

    // Mixed tree/grass classes split by the woody partner.
    if winner == Winner::Mixed {
        return match wdom {
            Some(Pft::TropicalEvergreen | Pft::TropicalRaingreen) => {
                if woody_lai > 4.0 {
                    Biome::TropicalSavanna
                } else {
                    Biome::TropicalXerophyticShrubland
                }
            }
            Some(Pft::TemperateBroadleafEvergreen) => Biome::TemperateSclerophyllWoodland,
            Some(Pft::TemperateSummergreen) => Biome::TemperateBroadleavedSavanna,
            Some(Pft::CoolConifer) => Biome::OpenConiferWoodland,
            Some(Pft::BorealEvergreen | Pft::BorealSummergreen) => Biome::BorealParkland,
            // A mixed cell always has a woody tree partner.
            _ => Biome::Barren,
        };
    }

    let Winner::Single(pft) = winner else {
        return Biome::Barren;
    };

    // Arctic and alpine classes.
    match pft {
        Pft::LichenForb => return Biome::CushionForbLichenMoss,
        Pft::TundraShrub => {
            return if inputs.gdd0 < 200.0 {
                Biome::ProstrateShrubTundra
            } else if inputs.gdd0 < 500.0 {
                Biome::DwarfShrubTundra
            } else {
                Biome::ShrubTundra
            };
        }
        Pft::ColdHerbaceous => return Biome::SteppeTundra,
        Pft::DesertShrub => {
            return if grass_lai > 1.0 {
                if inputs.tmin >= 0.0 {
                    Biome::TropicalXerophyticShrubland
                } else {
                    Biome::TemperateXerophyticShrubland
                }
            } else {
                Biome::Desert
            };
        }
        _ => {}
    }

    // Low productivity collapses tree and grass cover to desert;
    // boreal types fall through to their own classes.
    if dominant_npp <= 100.0
        && matches!(
            pft,
            Pft::TropicalEvergreen
                | Pft::TropicalRaingreen
                | Pft::TemperateBroadleafEvergreen
                | Pft::TemperateSummergreen
                | Pft::CoolConifer
                | Pft::TropicalGrass
                | Pft::TemperateGrass
        )
    {
        return Biome::Desert;
    }

    match pft {
        // Boreal classes.
        Pft::BorealEvergreen => {
            if inputs.gdd5 > 900.0 && inputs.tcm > -19.0 {
                if present[Pft::TemperateSummergreen.index()] {
                    Biome::CoolMixedForest
                } else {
                    Biome::CoolConiferForest
                }
            } else if present[Pft::TemperateSummergreen.index()] {
                Biome::ColdMixedForest
            } else {
                Biome::EvergreenTaiga
            }
        }
        Pft::BorealSummergreen => {
            if sub == Some(Pft::TemperateSummergreen) {
                Biome::TemperateDeciduousForest
            } else if sub == Some(Pft::CoolConifer)
                || (inputs.gdd5 > 900.0 && inputs.tcm > -19.0)
            {
                Biome::ColdMixedForest
            } else {
                Biome::DeciduousTaiga
            }
        }
        // Temperate classes.
        Pft::TemperateGrass => {
            if inputs.gdd0 >= 800.0 {
                Biome::TemperateGrassland
            } else {
                Biome::SteppeTundra
            }
        }
        Pft::TemperateBroadleafEvergreen => Biome::WarmMixedForest,
        Pft::TemperateSummergreen => {
            if present[Pft::BorealEvergreen.index()] {
                if inputs.tcm < -15.0 {
                    Biome::ColdMixedForest
                } else {
                    Biome::CoolMixedForest
                }
            } else if present[Pft::TemperateBroadleafEvergreen.index()]
                || (present[Pft::CoolConifer.index()]
                    && inputs.gdd5 > 3000.0
                    && inputs.tcm > 3.0)
            {
                Biome::WarmMixedForest
            } else {
                Biome::TemperateDeciduousForest
            }
        }
        Pft::CoolConifer => {
            if present[Pft::TemperateBroadleafEvergreen.index()] {
                Biome::WarmMixedForest
            } else if sub == Some(Pft::BorealSummergreen) {
                Biome::ColdMixedForest
            } else {
                Biome::TemperateConiferForest
            }
        }
        // Tropical classes.
        Pft::TropicalEvergreen => Biome::TropicalEvergreenForest,
        Pft::TropicalRaingreen => {
            if green_days > 300 {
                Biome::TropicalEvergreenForest
            } else if green_days > 250 {
                Biome::TropicalSemiDeciduousForest
            } else {
                Biome::TropicalDeciduousForest
            }
        }
        Pft::TropicalGrass => Biome::TropicalGrassland,
        // Grass-class PFTs with dedicated classes were handled above.
        _ => Biome::Barren,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::MONTHS;

    fn inputs() -> CompetitionInputs {
        CompetitionInputs {
            tmin: -12.0,
            total_precipitation: 900.0,
            gdd0: 2500.0,
            gdd5: 2000.0,
            tcm: -5.0,
        }
    }

    fn record(npp: f64, lai: f64) -> OptimizedPft {
        let diagnostics = PftDiagnostics {
            npp,
            monthly_wetness: [0.5; MONTHS],
            monthly_wetness_top: [0.5; MONTHS],
            monthly_wetness_bottom: [0.5; MONTHS],
            green_days: 365,
            ..PftDiagnostics::default()
        };
        OptimizedPft {
            lai,
            npp,
            diagnostics,
        }
    }

    fn empty_field() -> [OptimizedPft; NUM_PFTS] {
        std::array::from_fn(|_| OptimizedPft::absent())
    }

    #[test]
    fn test_empty_cell_is_barren() {
        let outcome = resolve_dominance(&empty_field(), &inputs());
        assert_eq!(outcome.biome, Biome::Barren);
        assert_eq!(outcome.dominant, None);
        assert_eq!(outcome.npp, 0.0);
    }

    #[test]
    fn test_productive_summergreen_forest() {
        let mut field = empty_field();
        field[Pft::TemperateSummergreen.index()] = record(900.0, 4.5);
        field[Pft::TemperateGrass.index()] = record(500.0, 2.0);
        let outcome = resolve_dominance(&field, &inputs());
        assert_eq!(outcome.dominant, Some(Pft::TemperateSummergreen));
        assert_eq!(outcome.biome, Biome::TemperateDeciduousForest);
        assert!(!outcome.mixed);
    }

    #[test]
    fn test_sparse_wood_hands_cell_to_grass() {
        let mut field = empty_field();
        field[Pft::TemperateSummergreen.index()] = record(300.0, 1.2);
        field[Pft::TemperateGrass.index()] = record(700.0, 2.4);
        let outcome = resolve_dominance(&field, &inputs());
        assert_eq!(outcome.dominant, Some(Pft::TemperateGrass));
        assert_eq!(outcome.biome, Biome::TemperateGrassland);
    }

    #[test]
    fn test_fire_demotion_retries_exactly_once() {
        let mut field = empty_field();
        // Fire-prone boreal evergreen leader with a summergreen runner-up:
        // the fire override demotes the leader once, and the promoted
        // runner-up resolves without looping again.
        let mut leader = record(400.0, 3.0);
        leader.diagnostics.fire_days = 120.0;
        field[Pft::BorealEvergreen.index()] = leader;
        field[Pft::BorealSummergreen.index()] = record(350.0, 2.5);
        let boreal = CompetitionInputs {
            tmin: -38.0,
            total_precipitation: 400.0,
            gdd0: 1500.0,
            gdd5: 700.0,
            tcm: -30.0,
        };
        let outcome = resolve_dominance(&field, &boreal);
        assert_eq!(outcome.dominant, Some(Pft::BorealSummergreen));
        assert_eq!(outcome.sub_dominant, Some(Pft::BorealEvergreen));
        assert_eq!(outcome.biome, Biome::DeciduousTaiga);
    }

    #[test]
    fn test_tropical_savanna_blend() {
        let mut field = empty_field();
        let mut wood = record(800.0, 3.0);
        wood.diagnostics.monthly_npp = [60.0; MONTHS];
        field[Pft::TropicalRaingreen.index()] = wood;
        let mut grass = record(900.0, 2.5);
        grass.diagnostics.monthly_npp = [75.0; MONTHS];
        grass.diagnostics.c4_npp_fraction = 1.0;
        field[Pft::TropicalGrass.index()] = grass;
        let tropical = CompetitionInputs {
            tmin: 12.0,
            total_precipitation: 1100.0,
            gdd0: 9000.0,
            gdd5: 7000.0,
            tcm: 22.0,
        };
        let outcome = resolve_dominance(&field, &tropical);
        assert!(outcome.mixed);
        assert_eq!(outcome.biome, Biome::TropicalXerophyticShrubland);
        // Blend: (wood + 2*grass)/3.
        assert!((outcome.npp - (800.0 + 2.0 * 900.0) / 3.0).abs() < 1e-9);
        assert!((outcome.record.monthly_npp[0] - 70.0).abs() < 1e-9);
        assert!(outcome.tree_cover > 0.0 && outcome.tree_cover <= 1.0);
    }

    #[test]
    fn test_tree_cover_fraction_clamps() {
        assert_eq!(tree_cover_fraction(0.0, 1000.0), 0.0);
        assert_eq!(tree_cover_fraction(2000.0, 1000.0), 1.0);
        let partial = tree_cover_fraction(500.0, 1000.0);
        assert!(partial > 0.0 && partial < 1.0);
        assert_eq!(tree_cover_fraction(100.0, 0.0), 1.0);
    }

    #[test]
    fn test_dry_tundra_shrub_yields_steppe_tundra() {
        let mut field = empty_field();
        let mut shrub = record(200.0, 1.0);
        shrub.diagnostics.monthly_wetness_top = [0.1; MONTHS];
        shrub.diagnostics.monthly_wetness_bottom = [0.2; MONTHS];
        field[Pft::TundraShrub.index()] = shrub;
        field[Pft::ColdHerbaceous.index()] = record(150.0, 0.8);
        let arctic = CompetitionInputs {
            tmin: -40.0,
            total_precipitation: 250.0,
            gdd0: 600.0,
            gdd5: 100.0,
            tcm: -28.0,
        };
        let outcome = resolve_dominance(&field, &arctic);
        // Mean wetness 15% <= 25%: the cold herbaceous type takes over.
        assert_eq!(outcome.dominant, Some(Pft::ColdHerbaceous));
        assert_eq!(outcome.biome, Biome::SteppeTundra);
    }

    #[test]
    fn test_desert_shrub_claims_empty_sparse_cells() {
        let mut field = empty_field();
        field[Pft::DesertShrub.index()] = record(90.0, 0.4);
        let dry = CompetitionInputs {
            tmin: 2.0,
            total_precipitation: 120.0,
            gdd0: 6000.0,
            gdd5: 4500.0,
            tcm: 8.0,
        };
        let outcome = resolve_dominance(&field, &dry);
        assert_eq!(outcome.dominant, Some(Pft::DesertShrub));
        assert_eq!(outcome.biome, Biome::Desert);
    }

    #[test]
    fn test_low_productivity_grass_is_desert() {
        let mut field = empty_field();
        field[Pft::TemperateGrass.index()] = record(80.0, 2.0);
        let outcome = resolve_dominance(&field, &inputs());
        assert_eq!(outcome.biome, Biome::Desert);
    }

    #[test]
    fn test_conifer_yields_to_summergreen() {
        let mut field = empty_field();
        field[Pft::CoolConifer.index()] = record(900.0, 4.0);
        field[Pft::TemperateSummergreen.index()] = record(700.0, 3.5);
        let outcome = resolve_dominance(&field, &inputs());
        assert_eq!(outcome.dominant, Some(Pft::TemperateSummergreen));
        assert_eq!(outcome.sub_dominant, Some(Pft::CoolConifer));
    }

    #[test]
    fn test_boreal_evergreen_taiga() {
        let mut field = empty_field();
        field[Pft::BorealEvergreen.index()] = record(450.0, 3.0);
        field[Pft::TemperateGrass.index()] = record(200.0, 1.0);
        let boreal = CompetitionInputs {
            tmin: -40.0,
            total_precipitation: 450.0,
            gdd0: 1600.0,
            gdd5: 800.0,
            tcm: -31.0,
        };
        let outcome = resolve_dominance(&field, &boreal);
        assert_eq!(outcome.dominant, Some(Pft::BorealEvergreen));
        assert_eq!(outcome.biome, Biome::EvergreenTaiga);
    }

    #[test]
    fn test_wet_tropical_raingreen_is_evergreen_forest() {
        let mut field = empty_field();
        let mut wood = record(2200.0, 5.5);
        wood.diagnostics.green_days = 365;
        field[Pft::TropicalRaingreen.index()] = wood;
        field[Pft::TropicalGrass.index()] = record(1200.0, 2.8);
        let tropical = CompetitionInputs {
            tmin: 16.0,
            total_precipitation: 2400.0,
            gdd0: 9500.0,
            gdd5: 7700.0,
            tcm: 24.0,
        };
        let outcome = resolve_dominance(&field, &tropical);
        assert_eq!(outcome.dominant, Some(Pft::TropicalRaingreen));
        assert_eq!(outcome.biome, Biome::TropicalEvergreenForest);
    }
}
