//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct HTTP
//! status code, error code, and message. They do NOT need an HTTP server --
//! they call `IntoResponse` directly on `AppError` values.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use tasker_api::error::AppError;
use tasker_core::error::CoreError;
use tasker_db::StoreError;
use uuid::Uuid;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let id = Uuid::nil();
    let err = AppError::Core(CoreError::NotFound { entity: "Task", id });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(
        json["error"],
        "Task with id 00000000-0000-0000-0000-000000000000 not found"
    );
}

#[tokio::test]
async fn core_validation_error_returns_422() {
    let err = AppError::Core(CoreError::Validation("bad status".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "bad status");
}

#[tokio::test]
async fn unprocessable_error_includes_fields() {
    let mut fields = tasker_api::error::FieldErrors::new();
    fields.insert("title".into(), vec!["title must not be empty".into()]);
    let err = AppError::Unprocessable {
        message: "Request body failed validation".into(),
        fields,
    };

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"]["title"][0], "title must not be empty");
}

#[tokio::test]
async fn connection_error_returns_503() {
    let err = AppError::Store(StoreError::Connect(sqlx::Error::PoolTimedOut));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "DATABASE_UNAVAILABLE");
}

#[tokio::test]
async fn query_error_returns_500_with_sanitized_message() {
    let err = AppError::Store(StoreError::Query(sqlx::Error::Protocol(
        "relation \"secret_table\" does not exist".into(),
    )));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn malformed_path_not_found_returns_404() {
    let err = AppError::NotFound("Task with id abc not found".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Task with id abc not found");
}
