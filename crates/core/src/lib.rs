//! Mechanistic biome and carbon/water flux simulation core.
//!
//! Given one location's monthly climate normals, CO2 concentration,
//! surface pressure and soil hydraulics, the model simulates the
//! physiology of 13 candidate plant functional types (PFTs) — each
//! optimized over leaf area for maximum annual net primary productivity —
//! and resolves the ecologically dominant vegetation into one of 28 biome
//! classes, along with a detailed record of monthly carbon and water
//! fluxes.
//!
//! ## Pipeline
//!
//! 1. Interpolate monthly normals to daily series and derive climate
//!    indices, soil temperature, insolation/PET and the snowpack balance
//!    ([`physics`]).
//! 2. Screen the PFTs against absolute climatic limits
//!    ([`solver::constraints`]).
//! 3. For each surviving PFT, search the LAI axis for the production
//!    optimum; every candidate couples photosynthesis to a two-layer
//!    daily water balance ([`solver::growth`], [`solver::optimizer`]).
//! 4. Resolve dominance among the optimized PFTs and assign the biome
//!    ([`solver::competition`]).
//!
//! Cells are independent; [`simulation::run_grid`] fans them out across a
//! rayon pool. The flat-vector contract with external grid drivers lives
//! in [`wire`].

pub mod core_types;
pub mod error;
pub mod physics;
pub mod simulation;
pub mod solver;
pub mod wire;

pub use core_types::{
    Biome, C4Pathway, GrowthHabit, LeafPhenology, Pft, PftParams, PftTable, SiteClimate,
    SoilProperties, NUM_PFTS,
};
pub use error::ModelError;
pub use simulation::{
    pressure_from_elevation, run_grid, simulate_cell, simulate_cell_observed, CellObserver,
    CellOutput, NullObserver,
};
pub use solver::{CompetitionOutcome, OptimizedPft, PftDiagnostics};
