//! Pairing Algo - gender-aware stable matching
//!
//! This library pairs participants one-to-one from a compatibility score
//! matrix and per-participant gender identity/preference labels. It runs a
//! gender-agnostic deferred-acceptance (Gale-Shapley) algorithm: participants
//! are randomly split into proposers and acceptors, incompatible pairs are
//! filtered out, and proposals continue until the matching is stable.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use core::{CancellationToken, CompatibilityTable, MatchingEngine, MatchingError, MatchingInput, ScoreMatrix};
pub use models::{MatchOutcome, MatchPair, UnmatchedParticipant, UnmatchedReason};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let input = MatchingInput::from_raw(
            vec![vec![0.0, 0.6], vec![0.6, 0.0]],
            vec!["Female", "Female"],
            vec!["Women", "Women"],
        )
        .unwrap();
        let outcome = MatchingEngine::default()
            .run(&input, &CancellationToken::new())
            .unwrap();
        assert_eq!(outcome.pairs.len(), 1);
    }
}
