// HTTP tests for the matching service

use actix_web::{test, web, App};
use pairing_algo::core::MatchingEngine;
use pairing_algo::models::ScoringWeights;
use pairing_algo::routes::{configure_routes, AppState};
use serde_json::{json, Value};
use std::sync::Arc;

fn state(max_participants: Option<usize>) -> AppState {
    AppState {
        engine: Arc::new(MatchingEngine::default()),
        weights: ScoringWeights::default(),
        max_participants,
    }
}

macro_rules! service {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health() {
    let app = service!(state(None));

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_run_matching() {
    let app = service!(state(None));

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(json!({
            "scores": [
                [0.0, 0.9, 0.0, 0.5],
                [0.9, 0.0, 0.8, 0.0],
                [0.0, 0.8, 0.0, 0.4],
                [0.5, 0.0, 0.4, 0.0]
            ],
            "genderIdentities": ["Male", "Female", "Male", "Female"],
            "genderPreferences": ["Women", "Men", "Women", "Men"],
            "seed": 7
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    let pairs = body["pairs"].as_array().unwrap();
    assert_eq!(pairs.len(), 2);
    assert!(body["unmatched"].as_array().unwrap().is_empty());
    assert!(body["runId"].as_str().is_some());
    assert_eq!(body["stats"]["proposerCount"], 2);
}

#[actix_web::test]
async fn test_run_matching_is_reproducible_with_seed() {
    let app = service!(state(None));
    let payload = json!({
        "scores": [
            [0.0, 0.3, 0.6, 0.2, 0.9],
            [0.3, 0.0, 0.4, 0.8, 0.1],
            [0.6, 0.4, 0.0, 0.5, 0.7],
            [0.2, 0.8, 0.5, 0.0, 0.3],
            [0.9, 0.1, 0.7, 0.3, 0.0]
        ],
        "genderIdentities": ["Nonbinary", "Female", "Male", "Female", "Male"],
        "genderPreferences": ["Bisexual", "Bisexual", "Bisexual", "Men", "Women"],
        "seed": 2024
    });

    let mut bodies = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/v1/matching/run")
            .set_json(&payload)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        bodies.push(body);
    }

    assert_eq!(bodies[0]["pairs"], bodies[1]["pairs"]);
    assert_eq!(bodies[0]["unmatched"], bodies[1]["unmatched"]);
    assert_ne!(bodies[0]["runId"], bodies[1]["runId"]);
}

#[actix_web::test]
async fn test_malformed_matrix_rejected() {
    let app = service!(state(None));

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(json!({
            "scores": [[0.0, 0.5], [0.5]],
            "genderIdentities": ["Male", "Female"],
            "genderPreferences": ["Women", "Men"]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Malformed input");
}

#[actix_web::test]
async fn test_unknown_preference_rejected() {
    let app = service!(state(None));

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(json!({
            "scores": [[0.0, 0.5], [0.5, 0.0]],
            "genderIdentities": ["Male", "Female"],
            "genderPreferences": ["Women", "Anyone"]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_oversized_population_rejected() {
    let app = service!(state(Some(2)));

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(json!({
            "scores": [[0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0]],
            "genderIdentities": ["Male", "Female", "Female"],
            "genderPreferences": ["Women", "Men", "Men"]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Too many participants");
}

#[actix_web::test]
async fn test_survey_matching() {
    let app = service!(state(None));

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/survey")
        .set_json(json!({
            "participants": [
                {"genderIdentity": "Male", "genderPreference": "Women", "gradYear": 2024, "responses": [1, 2, 3]},
                {"genderIdentity": "Female", "genderPreference": "Men", "gradYear": 2025, "responses": [1, 2, 0]},
                {"name": "Sam", "genderIdentity": "Male", "genderPreference": "Women", "gradYear": 2025, "responses": [0, 0, 3]},
                {"genderIdentity": "Female", "genderPreference": "Men", "gradYear": 2026, "responses": [2, 2, 3]}
            ],
            "seed": 1
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["pairs"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_survey_validation_rejects_blank_labels() {
    let app = service!(state(None));

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/survey")
        .set_json(json!({
            "participants": [
                {"genderIdentity": "", "genderPreference": "Women", "gradYear": 2024, "responses": [1]},
                {"genderIdentity": "Female", "genderPreference": "Men", "gradYear": 2025, "responses": [1]}
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
}

#[actix_web::test]
async fn test_survey_extreme_grad_years() {
    let app = service!(state(None));

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/survey")
        .set_json(json!({
            "participants": [
                {"genderIdentity": "Male", "genderPreference": "Women", "gradYear": i32::MIN, "responses": [1]},
                {"genderIdentity": "Female", "genderPreference": "Men", "gradYear": i32::MAX, "responses": [1]}
            ],
            "seed": 3
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["pairs"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_survey_uneven_responses_rejected() {
    let app = service!(state(None));

    let req = test::TestRequest::post()
        .uri("/api/v1/matching/survey")
        .set_json(json!({
            "participants": [
                {"genderIdentity": "Male", "genderPreference": "Women", "gradYear": 2024, "responses": [1, 2]},
                {"genderIdentity": "Female", "genderPreference": "Men", "gradYear": 2025, "responses": [1]}
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 400);
}
