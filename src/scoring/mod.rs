pub mod config;
pub mod engine;
pub mod validation;

pub use config::{PlacementFormula, ScoringConfig};
pub use engine::{score_kernel_votes, score_placement, score_placements, PlacementTally};
pub use validation::validate_scoring;
