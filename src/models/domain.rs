use serde::{Deserialize, Serialize};
use validator::Validate;

/// A participant in a matching run
///
/// Identity and preference are free-form labels; their meaning comes from
/// the configured [`CompatibilityTable`](crate::core::CompatibilityTable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: usize,
    #[serde(rename = "genderIdentity")]
    pub gender_identity: String,
    #[serde(rename = "genderPreference")]
    pub gender_preference: String,
}

/// Survey answers used to compute raw compatibility scores
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SurveyParticipant {
    #[serde(default)]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    #[serde(rename = "genderIdentity")]
    pub gender_identity: String,
    #[validate(length(min = 1))]
    #[serde(rename = "genderPreference")]
    pub gender_preference: String,
    #[serde(rename = "gradYear")]
    pub grad_year: i32,
    pub responses: Vec<u8>,
}

/// Which side of the deferred-acceptance algorithm a participant plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Proposer,
    Acceptor,
}

/// A final pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPair {
    pub proposer: usize,
    pub acceptor: usize,
    /// How the proposer scored the acceptor
    #[serde(rename = "proposerScore")]
    pub proposer_score: f64,
    /// How the acceptor scored the proposer
    #[serde(rename = "acceptorScore")]
    pub acceptor_score: f64,
}

impl MatchPair {
    pub fn involves(&self, participant: usize) -> bool {
        self.proposer == participant || self.acceptor == participant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedReason {
    /// Proposer was rejected by every eligible acceptor, or had none
    ExhaustedCandidates,
    /// Acceptor never received a proposal it could hold
    NoProposals,
}

/// A participant left without a partner, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedParticipant {
    pub id: usize,
    pub role: Role,
    pub reason: UnmatchedReason,
}

/// Counters collected while a run executes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    #[serde(rename = "proposerCount")]
    pub proposer_count: usize,
    #[serde(rename = "acceptorCount")]
    pub acceptor_count: usize,
    pub proposals: usize,
    /// Includes displacements
    pub rejections: usize,
    pub displacements: usize,
}

impl RunStats {
    /// Upper bound on rejection events: each (proposer, acceptor) pair can be
    /// rejected at most once.
    pub fn rejection_bound(&self) -> usize {
        self.proposer_count * self.acceptor_count
    }
}

/// Everything a matching run produces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub pairs: Vec<MatchPair>,
    pub unmatched: Vec<UnmatchedParticipant>,
    pub stats: RunStats,
}

impl MatchOutcome {
    /// Partner of `participant`, if matched
    pub fn partner_of(&self, participant: usize) -> Option<usize> {
        self.pairs.iter().find_map(|pair| {
            if pair.proposer == participant {
                Some(pair.acceptor)
            } else if pair.acceptor == participant {
                Some(pair.proposer)
            } else {
                None
            }
        })
    }

    pub fn is_unmatched(&self, participant: usize) -> bool {
        self.unmatched.iter().any(|u| u.id == participant)
    }
}

/// Weights for combining survey factors into a raw score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub grad_year: f64,
    pub responses: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            grad_year: 0.10,
            responses: 0.90,
        }
    }
}
