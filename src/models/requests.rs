use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::SurveyParticipant;

/// Request to run a matching over a prebuilt score matrix
///
/// Shape checks happen when the matrix is built, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMatchingRequest {
    pub scores: Vec<Vec<f64>>,
    #[serde(alias = "gender_identities", rename = "genderIdentities")]
    pub gender_identities: Vec<String>,
    #[serde(alias = "gender_preferences", rename = "genderPreferences")]
    pub gender_preferences: Vec<String>,
    /// Fixes the proposer/acceptor split for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Request to score a survey population and match it
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SurveyMatchingRequest {
    #[validate(nested)]
    pub participants: Vec<SurveyParticipant>,
    #[serde(default)]
    pub seed: Option<u64>,
}
