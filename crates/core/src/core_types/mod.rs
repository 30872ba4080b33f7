//! Core data types: PFTs and their parameter table, the per-cell climate
//! record, and the biome catalogue.

pub mod biome;
pub mod climate;
pub mod pft;

pub use biome::Biome;
pub use climate::{SiteClimate, SoilProperties};
pub use pft::{C4Pathway, GrowthHabit, LeafPhenology, Pft, PftParams, PftTable, NUM_PFTS};
