//! Common test utilities
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bank_services::api::build_app;
use bank_services::info::BuildInfo;
use bank_services::{ServiceKind, Storage};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tower::util::ServiceExt;

/// Full app of `kind` over fresh in-memory storage, mounted at the root
pub fn memory_app(kind: ServiceKind) -> Router {
    app_with(kind, &Storage::InMemory, "")
}

pub fn app_with(kind: ServiceKind, storage: &Storage, context_path: &str) -> Router {
    let info = BuildInfo::new(kind, context_path, Utc::now().naive_utc());
    build_app(kind.router(storage), context_path, info)
}

/// Response status, headers and decoded body (`Value::Null` when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
    pub raw: Vec<u8>,
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-request-user", "integration-test");

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(app, request).await
}

pub async fn send_request(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let raw = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    let body = if raw.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&raw).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        headers,
        body,
        raw,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, "GET", uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, "POST", uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, "PUT", uri, Some(body)).await
}

/// Connect to `DATABASE_URL`, apply the service schema and empty its tables
pub async fn setup_test_db(kind: ServiceKind) -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    let schema_path = format!(
        "{}/migrations/{}/0001_init.sql",
        env!("CARGO_MANIFEST_DIR"),
        kind.name()
    );
    let schema = std::fs::read_to_string(&schema_path).expect("Failed to read schema");
    pool.execute(schema.as_str()).await.expect("Failed to apply schema");

    let truncate = format!(
        "TRUNCATE TABLE {} RESTART IDENTITY CASCADE",
        kind.required_tables().join(", ")
    );
    pool.execute(truncate.as_str()).await.expect("Failed to clean up DB");

    pool
}
