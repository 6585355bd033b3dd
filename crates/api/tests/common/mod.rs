#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgConnectOptions;
use tower::ServiceExt;

use tasker_api::config::ServerConfig;
use tasker_api::router::build_app_router;
use tasker_api::state::AppState;
use tasker_db::{DatabaseConfig, Store};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default).
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        database: DatabaseConfig::default(),
    }
}

/// Build the full application router (same middleware stack as `main.rs`)
/// around the given store.
pub fn build_test_app(store: Arc<Store>) -> Router {
    build_app_router(AppState::new(store, test_config()))
}

/// Build the router against a fresh database with the `tasks` table in place.
pub async fn build_db_app(connect_opts: PgConnectOptions) -> Router {
    let store = Store::new(connect_opts);
    tasker_db::ensure_schema(&store).await.unwrap();
    build_test_app(Arc::new(store))
}

/// Build the router around a store whose server refuses connections.
///
/// Requests rejected before reaching the database behave normally; anything
/// that touches the store fails with a connection error.
pub fn build_offline_app() -> Router {
    let options = PgConnectOptions::new()
        .host("127.0.0.1")
        .port(1)
        .username("nobody")
        .database("nowhere");
    build_test_app(Arc::new(Store::new(options)))
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body.to_string()).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body.to_string()).await
}

/// Send a raw (possibly malformed) JSON body.
pub async fn send_json(app: Router, method: Method, uri: &str, body: String) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
