// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{MatchOutcome, MatchPair, Participant, Role, RunStats, ScoringWeights, SurveyParticipant, UnmatchedParticipant, UnmatchedReason};
pub use requests::{RunMatchingRequest, SurveyMatchingRequest};
pub use responses::{ErrorResponse, HealthResponse, MatchingResponse};
