use actix_web::{web, HttpResponse, Responder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::core::{build_score_matrix, InputError, MatchingEngine, MatchingError, MatchingInput};
use crate::models::{
    ErrorResponse, HealthResponse, MatchingResponse, RunMatchingRequest, ScoringWeights,
    SurveyMatchingRequest,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchingEngine>,
    pub weights: ScoringWeights,
    pub max_participants: Option<usize>,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matching/run", web::post().to(run_matching))
        .route("/matching/survey", web::post().to(survey_matching));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run a matching over a prebuilt score matrix
///
/// POST /api/v1/matching/run
///
/// Request body:
/// ```json
/// {
///   "scores": [[0.0, 0.8], [0.7, 0.0]],
///   "genderIdentities": ["Male", "Female"],
///   "genderPreferences": ["Women", "Men"],
///   "seed": 42
/// }
/// ```
async fn run_matching(
    state: web::Data<AppState>,
    req: web::Json<RunMatchingRequest>,
) -> impl Responder {
    let req = req.into_inner();

    if let Some(response) = reject_oversized(&state, req.scores.len()) {
        return response;
    }

    let seed = req.seed;
    execute(&state, seed, move |_| {
        MatchingInput::from_raw(req.scores, req.gender_identities, req.gender_preferences)
    })
    .await
}

/// Score a survey population, then match it
///
/// POST /api/v1/matching/survey
///
/// Request body:
/// ```json
/// {
///   "participants": [
///     {"genderIdentity": "Male", "genderPreference": "Women", "gradYear": 2025, "responses": [1, 4, 2]}
///   ],
///   "seed": 42
/// }
/// ```
async fn survey_matching(
    state: web::Data<AppState>,
    req: web::Json<SurveyMatchingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for survey request: field_errors={:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let req = req.into_inner();

    if let Some(response) = reject_oversized(&state, req.participants.len()) {
        return response;
    }

    let seed = req.seed;
    execute(&state, seed, move |weights| {
        let scores = build_score_matrix(&req.participants, weights)?;
        let (identities, preferences) = req
            .participants
            .into_iter()
            .map(|p| (p.gender_identity, p.gender_preference))
            .unzip();
        MatchingInput::new(scores, identities, preferences)
    })
    .await
}

/// Build the input and run the engine on the blocking pool
///
/// Both steps are O(N²) or worse, so neither runs on the async worker. The
/// run is cancelled if this future is dropped before it finishes, e.g. when
/// the client disconnects.
async fn execute<F>(state: &AppState, seed: Option<u64>, build_input: F) -> HttpResponse
where
    F: FnOnce(&ScoringWeights) -> Result<MatchingInput, InputError> + Send + 'static,
{
    let run_id = uuid::Uuid::new_v4();
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let engine = Arc::clone(&state.engine);
    let weights = state.weights;

    let result = tokio::task::spawn_blocking(move || {
        let _span = tracing::info_span!("request", run_id = %run_id).entered();

        let input = build_input(&weights)?;
        tracing::info!("Starting matching run for {} participants", input.len());

        match seed {
            Some(seed) => engine.run_with_rng(&input, &mut StdRng::seed_from_u64(seed), &cancel),
            None => engine.run(&input, &cancel),
        }
    })
    .await;

    guard.disarm();

    match result {
        Ok(Ok(outcome)) => HttpResponse::Ok().json(MatchingResponse {
            run_id: run_id.to_string(),
            pairs: outcome.pairs,
            unmatched: outcome.unmatched,
            stats: outcome.stats,
        }),
        Ok(Err(e)) => matching_error_response(&e),
        Err(e) => {
            tracing::error!("Matching run {} panicked or was aborted: {}", run_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Matching failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

fn matching_error_response(err: &MatchingError) -> HttpResponse {
    match err {
        MatchingError::MalformedInput(_) => {
            tracing::info!("Rejected malformed matching input: {}", err);
            bad_request("Malformed input", err.to_string())
        }
        MatchingError::Cancelled { .. } => HttpResponse::ServiceUnavailable().json(ErrorResponse {
            error: "Matching cancelled".to_string(),
            message: err.to_string(),
            status_code: 503,
        }),
        MatchingError::StepBudgetExceeded { .. } => {
            tracing::error!("{}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Matching failed".to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

fn reject_oversized(state: &AppState, participants: usize) -> Option<HttpResponse> {
    match state.max_participants {
        Some(max) if participants > max => Some(bad_request(
            "Too many participants",
            format!("{} participants submitted, limit is {}", participants, max),
        )),
        _ => None,
    }
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_error_status_codes() {
        let cancelled = matching_error_response(&MatchingError::Cancelled { proposals: 3 });
        assert_eq!(cancelled.status().as_u16(), 503);

        let budget = matching_error_response(&MatchingError::StepBudgetExceeded { budget: 10 });
        assert_eq!(budget.status().as_u16(), 500);
    }

    fn test_state(max_participants: Option<usize>) -> AppState {
        AppState {
            engine: Arc::new(MatchingEngine::default()),
            weights: ScoringWeights::default(),
            max_participants,
        }
    }

    #[test]
    fn test_oversized_request_rejected() {
        let state = test_state(Some(4));

        assert!(reject_oversized(&state, 4).is_none());
        let response = reject_oversized(&state, 5).unwrap();
        assert_eq!(response.status().as_u16(), 400);
    }

    #[actix_web::test]
    async fn test_input_is_built_on_blocking_pool() {
        let state = test_state(None);
        let caller = std::thread::current().id();

        let response = execute(&state, Some(1), move |_| {
            // A panic here surfaces as a 500
            assert_ne!(std::thread::current().id(), caller);
            MatchingInput::from_raw(
                vec![vec![0.0, 0.5], vec![0.5, 0.0]],
                vec!["Male", "Female"],
                vec!["Women", "Men"],
            )
        })
        .await;

        assert_eq!(response.status().as_u16(), 200);
    }

    #[actix_web::test]
    async fn test_input_errors_map_to_bad_request() {
        let state = test_state(None);

        let response = execute(&state, None, |_| {
            Err(InputError::InvalidPartition("no participants".to_string()))
        })
        .await;

        assert_eq!(response.status().as_u16(), 400);
    }
}
