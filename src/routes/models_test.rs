use super::*;
use crate::services::model::ModelError;

// =============================================================================
// error mapping
// =============================================================================

#[test]
fn model_error_maps_not_found() {
    let (status, message) = model_error_to_response(ModelError::NotFound("model_1_abc".into()));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(message.contains("model_1_abc"));
}

#[test]
fn model_error_maps_forbidden() {
    let (status, _) = model_error_to_response(ModelError::Forbidden("model_1_abc".into()));
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[test]
fn model_error_maps_invalid_with_message() {
    let (status, message) = model_error_to_response(ModelError::Invalid("model name must not be empty".into()));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "model name must not be empty");
}

#[test]
fn model_error_hides_database_details() {
    let (status, message) = model_error_to_response(ModelError::Database(sqlx::Error::PoolClosed));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(message, "database error");
}

// =============================================================================
// truncate_input
// =============================================================================

#[test]
fn truncate_passes_short_input_through() {
    assert_eq!(truncate_input("hello"), "hello");
}

#[test]
fn truncate_keeps_exactly_limit_chars() {
    let input = "x".repeat(INPUT_ECHO_LIMIT);
    assert_eq!(truncate_input(&input), input);
}

#[test]
fn truncate_appends_ellipsis_past_limit() {
    let input = "x".repeat(INPUT_ECHO_LIMIT + 1);
    let echo = truncate_input(&input);
    assert!(echo.ends_with("..."));
    assert_eq!(echo.chars().count(), INPUT_ECHO_LIMIT + 3);
}

#[test]
fn truncate_is_char_boundary_safe() {
    let input = "é".repeat(INPUT_ECHO_LIMIT + 10);
    let echo = truncate_input(&input);
    assert!(echo.starts_with('é'));
    assert!(echo.ends_with("..."));
}

// =============================================================================
// mock_inference_response
// =============================================================================

#[test]
fn mock_response_echoes_model_and_input() {
    let response = mock_inference_response("sentiment-classifier-v1", "the weather is nice", 1500);
    assert_eq!(response.model, "sentiment-classifier-v1");
    assert_eq!(response.input, "the weather is nice");
    assert!((response.confidence - 0.87).abs() < f64::EPSILON);
    assert_eq!(response.processing_time_ms, 1500);
    assert!(response.note.contains("Simulated"));
}

#[test]
fn mock_response_truncates_long_input() {
    let input = "a".repeat(200);
    let response = mock_inference_response("m", &input, 0);
    assert!(response.input.ends_with("..."));
    assert!(response.input.chars().count() < input.chars().count());
}

#[test]
fn mock_response_serializes_expected_fields() {
    let json = serde_json::to_value(mock_inference_response("m", "in", 7)).unwrap();
    assert_eq!(json["model"], "m");
    assert_eq!(json["processing_time_ms"], 7);
    assert!(json["output"].as_str().unwrap().contains("Mock inference result"));
}
