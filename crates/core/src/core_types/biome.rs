//! The 28-class biome catalogue.

use serde::{Deserialize, Serialize};

/// Biome classification produced by the competition step.
///
/// Discriminants are the stable wire ids (1-28). `LandIce` exists in the
/// catalogue but is never produced by the competition decision tree: ice
/// masking is the grid driver's job, upstream of the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Biome {
    TropicalEvergreenForest = 1,
    TropicalSemiDeciduousForest = 2,
    TropicalDeciduousForest = 3,
    TemperateDeciduousForest = 4,
    TemperateConiferForest = 5,
    WarmMixedForest = 6,
    CoolMixedForest = 7,
    CoolConiferForest = 8,
    ColdMixedForest = 9,
    EvergreenTaiga = 10,
    DeciduousTaiga = 11,
    TropicalSavanna = 12,
    TropicalXerophyticShrubland = 13,
    TemperateXerophyticShrubland = 14,
    TemperateSclerophyllWoodland = 15,
    TemperateBroadleavedSavanna = 16,
    OpenConiferWoodland = 17,
    BorealParkland = 18,
    TropicalGrassland = 19,
    TemperateGrassland = 20,
    Desert = 21,
    SteppeTundra = 22,
    ShrubTundra = 23,
    DwarfShrubTundra = 24,
    ProstrateShrubTundra = 25,
    CushionForbLichenMoss = 26,
    Barren = 27,
    LandIce = 28,
}

impl Biome {
    /// All biomes in id order.
    pub const ALL: [Biome; 28] = [
        Biome::TropicalEvergreenForest,
        Biome::TropicalSemiDeciduousForest,
        Biome::TropicalDeciduousForest,
        Biome::TemperateDeciduousForest,
        Biome::TemperateConiferForest,
        Biome::WarmMixedForest,
        Biome::CoolMixedForest,
        Biome::CoolConiferForest,
        Biome::ColdMixedForest,
        Biome::EvergreenTaiga,
        Biome::DeciduousTaiga,
        Biome::TropicalSavanna,
        Biome::TropicalXerophyticShrubland,
        Biome::TemperateXerophyticShrubland,
        Biome::TemperateSclerophyllWoodland,
        Biome::TemperateBroadleavedSavanna,
        Biome::OpenConiferWoodland,
        Biome::BorealParkland,
        Biome::TropicalGrassland,
        Biome::TemperateGrassland,
        Biome::Desert,
        Biome::SteppeTundra,
        Biome::ShrubTundra,
        Biome::DwarfShrubTundra,
        Biome::ProstrateShrubTundra,
        Biome::CushionForbLichenMoss,
        Biome::Barren,
        Biome::LandIce,
    ];

    /// Stable wire id, 1-28.
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Look a biome up by wire id.
    pub fn from_id(id: u8) -> Option<Biome> {
        if (1..=28).contains(&id) {
            Some(Biome::ALL[(id - 1) as usize])
        } else {
            None
        }
    }

    /// Catalogue name.
    pub fn name(self) -> &'static str {
        match self {
            Biome::TropicalEvergreenForest => "Tropical evergreen forest",
            Biome::TropicalSemiDeciduousForest => "Tropical semi-deciduous forest",
            Biome::TropicalDeciduousForest => "Tropical deciduous forest/woodland",
            Biome::TemperateDeciduousForest => "Temperate deciduous forest",
            Biome::TemperateConiferForest => "Temperate conifer forest",
            Biome::WarmMixedForest => "Warm mixed forest",
            Biome::CoolMixedForest => "Cool mixed forest",
            Biome::CoolConiferForest => "Cool conifer forest",
            Biome::ColdMixedForest => "Cold mixed forest",
            Biome::EvergreenTaiga => "Evergreen taiga/montane forest",
            Biome::DeciduousTaiga => "Deciduous taiga/montane forest",
            Biome::TropicalSavanna => "Tropical savanna",
            Biome::TropicalXerophyticShrubland => "Tropical xerophytic shrubland",
            Biome::TemperateXerophyticShrubland => "Temperate xerophytic shrubland",
            Biome::TemperateSclerophyllWoodland => "Temperate sclerophyll woodland",
            Biome::TemperateBroadleavedSavanna => "Temperate broadleaved savanna",
            Biome::OpenConiferWoodland => "Open conifer woodland",
            Biome::BorealParkland => "Boreal parkland",
            Biome::TropicalGrassland => "Tropical grassland",
            Biome::TemperateGrassland => "Temperate grassland",
            Biome::Desert => "Desert",
            Biome::SteppeTundra => "Steppe tundra",
            Biome::ShrubTundra => "Shrub tundra",
            Biome::DwarfShrubTundra => "Dwarf shrub tundra",
            Biome::ProstrateShrubTundra => "Prostrate shrub tundra",
            Biome::CushionForbLichenMoss => "Cushion-forbs, lichen and moss",
            Biome::Barren => "Barren",
            Biome::LandIce => "Land ice",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_contiguous() {
        for (i, biome) in Biome::ALL.iter().enumerate() {
            assert_eq!(biome.id() as usize, i + 1);
            assert_eq!(Biome::from_id(biome.id()), Some(*biome));
        }
        assert_eq!(Biome::from_id(0), None);
        assert_eq!(Biome::from_id(29), None);
    }

    #[test]
    fn test_names_are_distinct() {
        for a in Biome::ALL {
            for b in Biome::ALL {
                if a != b {
                    assert_ne!(a.name(), b.name());
                }
            }
        }
    }
}
