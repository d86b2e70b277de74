use serde::{Deserialize, Serialize};
use crate::models::domain::{MatchPair, RunStats, UnmatchedParticipant};

/// Response for both matching endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingResponse {
    #[serde(rename = "runId")]
    pub run_id: String,
    pub pairs: Vec<MatchPair>,
    pub unmatched: Vec<UnmatchedParticipant>,
    pub stats: RunStats,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
