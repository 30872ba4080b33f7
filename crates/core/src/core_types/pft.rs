//! Plant functional types and their physiological parameter table.
//!
//! The 13 PFTs are the model's competitors: each carries a fixed set of
//! physiological constants (phenology behavior, conductance limits, rooting,
//! leaf economics, photosynthetic pathway, fire tolerance). The table is
//! static data shared read-only by every grid cell; nothing in the model
//! mutates it after construction.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Number of plant functional types competed per grid cell.
pub const NUM_PFTS: usize = 13;

/// Leaf phenology strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeafPhenology {
    /// Canopy held year-round.
    Evergreen,
    /// Canopy grown on accumulated degree-days, shed in the cold season.
    Summergreen,
    /// Canopy switched on soil-moisture hysteresis (drought-deciduous).
    Raingreen,
}

/// Growth habit, which controls stem respiration and which phenology
/// curve the water balance reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthHabit {
    /// Trees and shrubs: woody stems with maintenance respiration.
    Woody,
    /// Herbaceous: no stem respiration, grass phenology column.
    Grass,
}

/// Photosynthetic pathway capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum C4Pathway {
    /// Pure C3 metabolism.
    None,
    /// Always assimilates through the C4 pathway.
    Obligate,
    /// Runs C4 in months where it out-yields C3 (applied only when at
    /// least two months benefit).
    Facultative,
}

/// Plant functional type identifier.
///
/// Discriminants are the canonical PFT indices used throughout the model and
/// in the per-PFT output arrays. `TropicalEvergreen` is parameterized but
/// always sieved out: the tropical raingreen tree behaves as an evergreen
/// whenever it escapes water stress, so running both would duplicate work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Pft {
    TropicalEvergreen = 0,
    TropicalRaingreen = 1,
    TemperateBroadleafEvergreen = 2,
    TemperateSummergreen = 3,
    CoolConifer = 4,
    BorealEvergreen = 5,
    BorealSummergreen = 6,
    TemperateGrass = 7,
    TropicalGrass = 8,
    DesertShrub = 9,
    TundraShrub = 10,
    ColdHerbaceous = 11,
    LichenForb = 12,
}

impl Pft {
    /// Every PFT in index order.
    pub const ALL: [Pft; NUM_PFTS] = [
        Pft::TropicalEvergreen,
        Pft::TropicalRaingreen,
        Pft::TemperateBroadleafEvergreen,
        Pft::TemperateSummergreen,
        Pft::CoolConifer,
        Pft::BorealEvergreen,
        Pft::BorealSummergreen,
        Pft::TemperateGrass,
        Pft::TropicalGrass,
        Pft::DesertShrub,
        Pft::TundraShrub,
        Pft::ColdHerbaceous,
        Pft::LichenForb,
    ];

    /// Array index of this PFT.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look a PFT up by index.
    pub fn from_index(index: usize) -> Option<Pft> {
        Pft::ALL.get(index).copied()
    }

    /// Tree PFTs (indices 0-6): the pool the sub-dominant woody competitor
    /// is drawn from.
    #[inline]
    pub fn is_tree(self) -> bool {
        self.index() <= Pft::BorealSummergreen.index()
    }

    /// Members of the grass class in competition. The desert and tundra
    /// shrubs sit above the tree indices but compete on the woody side.
    #[inline]
    pub fn is_grass_class(self) -> bool {
        matches!(
            self,
            Pft::TemperateGrass | Pft::TropicalGrass | Pft::ColdHerbaceous | Pft::LichenForb
        )
    }

    /// Woody competitors: trees plus the desert and tundra shrubs,
    /// excluding the disabled tropical evergreen.
    #[inline]
    pub fn is_woody_competitor(self) -> bool {
        self != Pft::TropicalEvergreen && !self.is_grass_class()
    }
}

/// Physiological parameter set for one PFT.
///
/// Units follow the water-balance and photosynthesis formulations: canopy
/// conductances in mm/s, transpiration in mm/day, wetness thresholds as
/// plant-available soil-water fractions, leaf longevity in months,
/// phenology ramps in growing-degree-days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PftParams {
    pub id: Pft,
    pub name: String,

    // Phenology
    pub phenology: LeafPhenology,
    pub habit: GrowthHabit,
    /// Base temperature (°C) for the phenology degree-day sum.
    pub gdd_base: f64,
    /// Degree-days to grow a full canopy, generic summergreen curve.
    pub ramp_summergreen: f64,
    /// Degree-days to full canopy on the grass/raingreen curve.
    pub ramp_grass: f64,

    // Water relations
    /// Minimum canopy conductance (mm/s).
    pub gc_min: f64,
    /// Maximum transpiration rate at saturated soil (mm/day).
    pub e_max: f64,
    /// Root-zone wetness above which a bare canopy leafs out.
    pub onset_wetness: f64,
    /// Root-zone wetness below which a full canopy is shed.
    pub offset_wetness: f64,
    /// Fraction of roots in the top soil layer.
    pub root_top: f64,

    // Carbon economics
    /// Mean leaf longevity (months); sets the leaf maintenance cost factor.
    pub leaf_longevity: f64,
    /// Optimum (non-water-stressed) ci/ca ratio for C3 assimilation.
    pub opt_ci_ratio: f64,
    /// Canopy light extinction coefficient (Beer's law).
    pub extinction: f64,
    /// Photosynthetic pathway capability.
    pub c4: C4Pathway,
    /// Stem maintenance respiration factor.
    pub resp_factor: f64,
    /// Litterfall allocation factor.
    pub alloc_factor: f64,
    /// Lower temperature limit of net assimilation (°C).
    pub photo_t_min: f64,
    /// Shape factor of the temperature-stress response.
    pub photo_t_curve: f64,

    // Disturbance
    /// Root-zone wetness below which a day counts as a potential fire day.
    pub fire_wetness_threshold: f64,
}

impl PftParams {
    /// Tropical broadleaf evergreen tree. Parameterized identically to the
    /// raingreen tree aside from phenology; the sieve always drops it.
    pub fn tropical_evergreen() -> Self {
        PftParams {
            id: Pft::TropicalEvergreen,
            name: "tropical broadleaf evergreen tree".to_string(),
            phenology: LeafPhenology::Evergreen,
            habit: GrowthHabit::Woody,
            gdd_base: 5.0,
            ramp_summergreen: 0.0,
            ramp_grass: 0.0,
            gc_min: 0.5,
            e_max: 10.0,
            onset_wetness: 0.0,
            offset_wetness: 0.0,
            root_top: 0.85,
            leaf_longevity: 24.0,
            opt_ci_ratio: 0.95,
            extinction: 0.7,
            c4: C4Pathway::None,
            resp_factor: 0.8,
            alloc_factor: 1.0,
            photo_t_min: 10.0,
            photo_t_curve: 1.0,
            fire_wetness_threshold: 0.25,
        }
    }

    /// Tropical drought-deciduous (raingreen) tree. Holds its canopy as
    /// long as root-zone moisture stays above the offset threshold, so in
    /// wet climates it behaves as an evergreen.
    pub fn tropical_raingreen() -> Self {
        PftParams {
            id: Pft::TropicalRaingreen,
            name: "tropical drought-deciduous tree".to_string(),
            phenology: LeafPhenology::Raingreen,
            habit: GrowthHabit::Woody,
            gdd_base: 5.0,
            ramp_summergreen: 0.0,
            ramp_grass: 0.0,
            gc_min: 0.5,
            e_max: 10.0,
            onset_wetness: 0.35,
            offset_wetness: 0.35,
            root_top: 0.7,
            leaf_longevity: 9.0,
            opt_ci_ratio: 0.9,
            extinction: 0.7,
            c4: C4Pathway::None,
            resp_factor: 0.8,
            alloc_factor: 1.0,
            photo_t_min: 10.0,
            photo_t_curve: 1.0,
            fire_wetness_threshold: 0.2,
        }
    }

    /// Temperate broadleaf evergreen (sclerophyll) tree.
    pub fn temperate_broadleaf_evergreen() -> Self {
        PftParams {
            id: Pft::TemperateBroadleafEvergreen,
            name: "temperate broadleaf evergreen tree".to_string(),
            phenology: LeafPhenology::Evergreen,
            habit: GrowthHabit::Woody,
            gdd_base: 5.0,
            ramp_summergreen: 0.0,
            ramp_grass: 0.0,
            gc_min: 0.5,
            e_max: 7.0,
            onset_wetness: 0.0,
            offset_wetness: 0.0,
            root_top: 0.7,
            leaf_longevity: 18.0,
            opt_ci_ratio: 0.8,
            extinction: 0.6,
            c4: C4Pathway::None,
            resp_factor: 1.4,
            alloc_factor: 1.2,
            photo_t_min: 5.0,
            photo_t_curve: 1.0,
            fire_wetness_threshold: 0.4,
        }
    }

    /// Temperate summergreen (deciduous broadleaf) tree.
    pub fn temperate_summergreen() -> Self {
        PftParams {
            id: Pft::TemperateSummergreen,
            name: "temperate summergreen tree".to_string(),
            phenology: LeafPhenology::Summergreen,
            habit: GrowthHabit::Woody,
            gdd_base: 5.0,
            ramp_summergreen: 200.0,
            ramp_grass: 200.0,
            gc_min: 0.5,
            e_max: 7.0,
            onset_wetness: 0.1,
            offset_wetness: 0.1,
            root_top: 0.65,
            leaf_longevity: 7.0,
            opt_ci_ratio: 0.8,
            extinction: 0.6,
            c4: C4Pathway::None,
            resp_factor: 1.6,
            alloc_factor: 1.2,
            photo_t_min: 4.0,
            photo_t_curve: 1.0,
            fire_wetness_threshold: 0.33,
        }
    }

    /// Cool-temperate needle-leaved evergreen conifer.
    pub fn cool_conifer() -> Self {
        PftParams {
            id: Pft::CoolConifer,
            name: "cool-temperate conifer".to_string(),
            phenology: LeafPhenology::Evergreen,
            habit: GrowthHabit::Woody,
            gdd_base: 5.0,
            ramp_summergreen: 0.0,
            ramp_grass: 0.0,
            gc_min: 0.3,
            e_max: 5.0,
            onset_wetness: 0.0,
            offset_wetness: 0.0,
            root_top: 0.7,
            leaf_longevity: 24.0,
            opt_ci_ratio: 0.9,
            extinction: 0.5,
            c4: C4Pathway::None,
            resp_factor: 0.8,
            alloc_factor: 1.2,
            photo_t_min: 3.0,
            photo_t_curve: 0.9,
            fire_wetness_threshold: 0.4,
        }
    }

    /// Boreal evergreen needle-leaved conifer.
    pub fn boreal_evergreen() -> Self {
        PftParams {
            id: Pft::BorealEvergreen,
            name: "boreal evergreen conifer".to_string(),
            phenology: LeafPhenology::Evergreen,
            habit: GrowthHabit::Woody,
            gdd_base: 5.0,
            ramp_summergreen: 0.0,
            ramp_grass: 0.0,
            gc_min: 0.3,
            e_max: 5.0,
            onset_wetness: 0.0,
            offset_wetness: 0.0,
            root_top: 0.9,
            leaf_longevity: 24.0,
            opt_ci_ratio: 0.8,
            extinction: 0.5,
            c4: C4Pathway::None,
            resp_factor: 4.0,
            alloc_factor: 1.2,
            photo_t_min: 0.0,
            photo_t_curve: 0.8,
            fire_wetness_threshold: 0.33,
        }
    }

    /// Boreal summergreen tree (larch and cold-deciduous broadleaves).
    /// The only PFT whose phenology accumulates degree-days above 0 °C.
    pub fn boreal_summergreen() -> Self {
        PftParams {
            id: Pft::BorealSummergreen,
            name: "boreal summergreen tree".to_string(),
            phenology: LeafPhenology::Summergreen,
            habit: GrowthHabit::Woody,
            gdd_base: 0.0,
            ramp_summergreen: 100.0,
            ramp_grass: 100.0,
            gc_min: 0.3,
            e_max: 5.0,
            onset_wetness: 0.1,
            offset_wetness: 0.1,
            root_top: 0.9,
            leaf_longevity: 6.0,
            opt_ci_ratio: 0.9,
            extinction: 0.4,
            c4: C4Pathway::None,
            resp_factor: 4.0,
            alloc_factor: 1.2,
            photo_t_min: 0.0,
            photo_t_curve: 0.8,
            fire_wetness_threshold: 0.33,
        }
    }

    /// Temperate C3 grass.
    pub fn temperate_grass() -> Self {
        PftParams {
            id: Pft::TemperateGrass,
            name: "temperate C3 grass".to_string(),
            phenology: LeafPhenology::Raingreen,
            habit: GrowthHabit::Grass,
            gdd_base: 5.0,
            ramp_summergreen: 100.0,
            ramp_grass: 100.0,
            gc_min: 0.8,
            e_max: 5.0,
            onset_wetness: 0.2,
            offset_wetness: 0.2,
            root_top: 0.9,
            leaf_longevity: 8.0,
            opt_ci_ratio: 0.65,
            extinction: 0.4,
            c4: C4Pathway::None,
            resp_factor: 1.6,
            alloc_factor: 1.0,
            photo_t_min: 4.5,
            photo_t_curve: 1.0,
            fire_wetness_threshold: 0.4,
        }
    }

    /// Tropical C4 grass. Obligate C4 assimilation.
    pub fn tropical_grass() -> Self {
        PftParams {
            id: Pft::TropicalGrass,
            name: "tropical C4 grass".to_string(),
            phenology: LeafPhenology::Raingreen,
            habit: GrowthHabit::Grass,
            gdd_base: 5.0,
            ramp_summergreen: 100.0,
            ramp_grass: 100.0,
            gc_min: 0.8,
            e_max: 7.0,
            onset_wetness: 0.2,
            offset_wetness: 0.2,
            root_top: 0.9,
            leaf_longevity: 10.0,
            opt_ci_ratio: 0.65,
            extinction: 0.4,
            c4: C4Pathway::Obligate,
            resp_factor: 0.8,
            alloc_factor: 1.0,
            photo_t_min: 10.0,
            photo_t_curve: 1.0,
            fire_wetness_threshold: 0.4,
        }
    }

    /// Xerophytic woody shrub of hot and cold deserts. Switches months to
    /// the C4 pathway when that pays.
    pub fn desert_shrub() -> Self {
        PftParams {
            id: Pft::DesertShrub,
            name: "xerophytic desert shrub".to_string(),
            phenology: LeafPhenology::Raingreen,
            habit: GrowthHabit::Woody,
            gdd_base: 5.0,
            ramp_summergreen: 0.0,
            ramp_grass: 0.0,
            gc_min: 0.2,
            e_max: 1.0,
            onset_wetness: 0.05,
            offset_wetness: 0.05,
            root_top: 0.8,
            leaf_longevity: 12.0,
            opt_ci_ratio: 0.7,
            extinction: 0.3,
            c4: C4Pathway::Facultative,
            resp_factor: 1.4,
            alloc_factor: 1.0,
            photo_t_min: 5.0,
            photo_t_curve: 1.0,
            fire_wetness_threshold: 0.33,
        }
    }

    /// Low and high shrub tundra.
    pub fn tundra_shrub() -> Self {
        PftParams {
            id: Pft::TundraShrub,
            name: "tundra shrub".to_string(),
            phenology: LeafPhenology::Summergreen,
            habit: GrowthHabit::Woody,
            gdd_base: 5.0,
            ramp_summergreen: 50.0,
            ramp_grass: 50.0,
            gc_min: 0.3,
            e_max: 3.0,
            onset_wetness: 0.1,
            offset_wetness: 0.1,
            root_top: 0.9,
            leaf_longevity: 8.0,
            opt_ci_ratio: 0.9,
            extinction: 0.5,
            c4: C4Pathway::None,
            resp_factor: 4.0,
            alloc_factor: 1.0,
            photo_t_min: -7.0,
            photo_t_curve: 0.6,
            fire_wetness_threshold: 0.33,
        }
    }

    /// Cold herbaceous graminoid/forb tundra.
    pub fn cold_herbaceous() -> Self {
        PftParams {
            id: Pft::ColdHerbaceous,
            name: "cold herbaceous tundra".to_string(),
            phenology: LeafPhenology::Raingreen,
            habit: GrowthHabit::Grass,
            gdd_base: 5.0,
            ramp_summergreen: 50.0,
            ramp_grass: 50.0,
            gc_min: 0.8,
            e_max: 3.0,
            onset_wetness: 0.1,
            offset_wetness: 0.1,
            root_top: 0.9,
            leaf_longevity: 7.0,
            opt_ci_ratio: 0.75,
            extinction: 0.3,
            c4: C4Pathway::None,
            resp_factor: 4.0,
            alloc_factor: 1.0,
            photo_t_min: -7.0,
            photo_t_curve: 0.6,
            fire_wetness_threshold: 0.33,
        }
    }

    /// Cushion forbs, lichens and mosses: the hardiest cover, assumed
    /// available everywhere the climate admits any vegetation at all.
    pub fn lichen_forb() -> Self {
        PftParams {
            id: Pft::LichenForb,
            name: "cushion forb, lichen and moss".to_string(),
            phenology: LeafPhenology::Raingreen,
            habit: GrowthHabit::Grass,
            gdd_base: 5.0,
            ramp_summergreen: 25.0,
            ramp_grass: 25.0,
            gc_min: 0.5,
            e_max: 1.0,
            onset_wetness: 0.05,
            offset_wetness: 0.05,
            root_top: 0.9,
            leaf_longevity: 12.0,
            opt_ci_ratio: 0.8,
            extinction: 0.6,
            c4: C4Pathway::None,
            resp_factor: 4.0,
            alloc_factor: 1.5,
            photo_t_min: -12.0,
            photo_t_curve: 0.5,
            fire_wetness_threshold: 0.33,
        }
    }

    /// Parameter set for one PFT.
    pub fn for_pft(pft: Pft) -> Self {
        match pft {
            Pft::TropicalEvergreen => Self::tropical_evergreen(),
            Pft::TropicalRaingreen => Self::tropical_raingreen(),
            Pft::TemperateBroadleafEvergreen => Self::temperate_broadleaf_evergreen(),
            Pft::TemperateSummergreen => Self::temperate_summergreen(),
            Pft::CoolConifer => Self::cool_conifer(),
            Pft::BorealEvergreen => Self::boreal_evergreen(),
            Pft::BorealSummergreen => Self::boreal_summergreen(),
            Pft::TemperateGrass => Self::temperate_grass(),
            Pft::TropicalGrass => Self::tropical_grass(),
            Pft::DesertShrub => Self::desert_shrub(),
            Pft::TundraShrub => Self::tundra_shrub(),
            Pft::ColdHerbaceous => Self::cold_herbaceous(),
            Pft::LichenForb => Self::lichen_forb(),
        }
    }
}

/// The immutable, process-wide PFT parameter table.
///
/// Built once at startup and passed by reference into the solver; never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PftTable {
    params: Vec<PftParams>,
}

impl PftTable {
    /// Build the standard table and run its consistency checks.
    pub fn new() -> Self {
        let params: Vec<PftParams> = Pft::ALL.iter().map(|&p| PftParams::for_pft(p)).collect();
        let table = PftTable { params };
        table
            .validate()
            .expect("built-in PFT parameter table is consistent");
        table
    }

    /// Build a table from externally supplied parameter sets, failing fast
    /// on inconsistency rather than corrupting every cell's result.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MalformedParameterTable`] when the table has
    /// the wrong length, is misordered, or carries non-physical values.
    pub fn from_params(params: Vec<PftParams>) -> Result<Self, ModelError> {
        let table = PftTable { params };
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.params.len() != NUM_PFTS {
            return Err(ModelError::MalformedParameterTable {
                message: format!("expected {NUM_PFTS} entries, got {}", self.params.len()),
            });
        }
        for (i, p) in self.params.iter().enumerate() {
            if p.id.index() != i {
                return Err(ModelError::MalformedParameterTable {
                    message: format!("entry {i} carries id {:?}", p.id),
                });
            }
            if p.extinction.is_nan() || p.extinction <= 0.0 {
                return Err(ModelError::MalformedParameterTable {
                    message: format!("{}: extinction coefficient must be positive", p.name),
                });
            }
            let water_ok = p.e_max > 0.0 && p.gc_min >= 0.0 && (0.0..=1.0).contains(&p.root_top);
            if !water_ok {
                return Err(ModelError::MalformedParameterTable {
                    message: format!("{}: water-relation parameters out of range", p.name),
                });
            }
            if p.leaf_longevity.is_nan() || p.leaf_longevity <= 0.0 {
                return Err(ModelError::MalformedParameterTable {
                    message: format!("{}: leaf longevity must be positive", p.name),
                });
            }
        }
        Ok(())
    }

    /// Parameters for one PFT.
    #[inline]
    pub fn get(&self, pft: Pft) -> &PftParams {
        &self.params[pft.index()]
    }

    /// All parameter sets in index order.
    pub fn params(&self) -> impl Iterator<Item = &PftParams> {
        self.params.iter()
    }
}

impl Default for PftTable {
    fn default() -> Self {
        Self::new()
    }
}
