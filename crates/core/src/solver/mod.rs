//! Solver layer: the environmental sieve, the growth engine, the LAI
//! optimizer and the competition/biome-assignment step.

pub mod competition;
pub mod constraints;
pub mod growth;
pub mod optimizer;

pub use competition::{resolve_dominance, CompetitionInputs, CompetitionOutcome};
pub use constraints::{apply_sieve, SieveResult};
pub use growth::{grow, GrowthEnv, GrowthResult, PftDiagnostics};
pub use optimizer::{optimize_lai, OptimizedPft};
