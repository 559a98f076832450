#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use mycotheca_core::uploads::LocalContentStore;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use mycotheca_api::config::ServerConfig;
use mycotheca_api::router::build_app_router;
use mycotheca_api::state::AppState;

pub const BOUNDARY: &str = "mycotheca-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 1 MiB body cap and a 30-second request timeout.
pub fn test_config(upload_dir: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        upload_dir: upload_dir.to_string(),
        max_upload_bytes: 1024 * 1024,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the full application router over `pool`, with uploads written to a
/// fresh temporary directory.
///
/// The directory is removed when the returned [`TempDir`] is dropped, so
/// tests keep it alive for as long as they inspect stored files.
pub fn build_test_app(pool: SqlitePool) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir.path().display().to_string());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store: Arc::new(LocalContentStore::new(dir.path())),
    };

    (build_app_router(state, &config), dir)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(app: &Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

/// One part of a multipart request body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    /// `(field name, filename, bytes)`
    File(&'a str, &'a str, &'a [u8]),
}

/// Encode `parts` as a `multipart/form-data` body delimited by [`BOUNDARY`].
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn send_multipart(app: &Router, method: Method, uri: &str, parts: &[Part<'_>]) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

pub async fn post_multipart(app: &Router, uri: &str, parts: &[Part<'_>]) -> Response {
    send_multipart(app, Method::POST, uri, parts).await
}

pub async fn put_multipart(app: &Router, uri: &str, parts: &[Part<'_>]) -> Response {
    send_multipart(app, Method::PUT, uri, parts).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Create a collection through the API and return its id.
pub async fn create_collection(app: &Router, code: &str) -> i64 {
    let response = post_multipart(
        app,
        "/api/v1/collections",
        &[
            Part::Text("code", code),
            Part::Text("collection_date", "2024-03-15"),
            Part::Text("scientific_name", "Agaricus bisporus"),
        ],
    )
    .await;
    assert_eq!(response.status(), 201, "collection {code} not created");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create an isolate through the API and return its id.
pub async fn create_isolate(app: &Router, collection_id: i64, code: &str) -> i64 {
    let response = post_json(
        app,
        "/api/v1/isolates",
        serde_json::json!({
            "code": code,
            "collection_id": collection_id.to_string(),
            "isolation_date": "2024-03-16",
            "culture_medium": "PDA",
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "isolate {code} not created");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
