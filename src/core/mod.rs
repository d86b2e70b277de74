// Core algorithm exports
pub mod assembler;
pub mod compatibility;
pub mod error;
pub mod matcher;
pub mod matrix;
pub mod preferences;
pub mod roles;
pub mod scoring;

pub use assembler::assemble;
pub use compatibility::{filter, CompatibilityRule, CompatibilityTable, FilteredScoreMatrix};
pub use error::{InputError, MatchingError};
pub use matcher::{MatchingEngine, ProposerState};
pub use matrix::{MatchingInput, ScoreMatrix};
pub use preferences::{Candidate, PreferenceList};
pub use roles::{partition, RolePartition};
pub use scoring::{build_score_matrix, calculate_compatibility_score};
pub use tokio_util::sync::CancellationToken;
