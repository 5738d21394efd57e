//! Common test utilities for integration tests.
//!
//! Tests run against the PostgreSQL database named by `TEST_DATABASE_URL` and
//! are skipped when it is not set. Every test creates its own responsibles,
//! areas and assets, so tests can share one database and run in parallel.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use domain::services::AuditSink;
use inventory_api::{
    app::{create_app, create_app_with_audit},
    config::{
        Config, DatabaseConfig, LedgerConfig, LoggingConfig, SecurityConfig, ServerConfig,
    },
};
use serde_json::{json, Value};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{sync::Arc, time::Duration};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_ACTOR: &str = "Integration Tester";

/// Connect to the test database and apply migrations.
///
/// Returns `None` when `TEST_DATABASE_URL` is not set.
pub async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping integration test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    // The migrator holds an advisory lock, so parallel test binaries are safe.
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: std::env::var("TEST_DATABASE_URL").unwrap_or_default(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig::default(),
        ledger: LedgerConfig {
            lock_timeout_ms: 5000,
            max_assets_per_batch: 50,
        },
    }
}

pub fn test_app(pool: &PgPool) -> Router {
    create_app(test_config(), pool.clone())
}

/// Router with a custom config and audit sink.
pub fn test_app_with(pool: &PgPool, config: Config, audit: Arc<dyn AuditSink>) -> Router {
    create_app_with_audit(config, pool.clone(), audit)
}

/// Reception request sent on behalf of `actor`.
pub fn reception_request_as(actor: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/receptions")
        .header("content-type", "application/json")
        .header("x-actor", actor)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Unique suffix for names that must not collide between tests.
pub fn unique(prefix: &str) -> String {
    format!("{} {}", prefix, &Uuid::new_v4().simple().to_string()[..10])
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-actor", TEST_ACTOR)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-actor", TEST_ACTOR)
        .body(Body::empty())
        .unwrap()
}

/// Send a request and parse the JSON body (`Null` when empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub async fn create_responsible(app: &Router, first_name: &str) -> (i64, String) {
    let last_name = unique("Tester");
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/v1/responsibles",
            json!({ "first_name": first_name, "last_name": last_name }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    (
        body["id"].as_i64().unwrap(),
        body["display_name"].as_str().unwrap().to_string(),
    )
}

pub async fn create_area(app: &Router) -> i64 {
    let (status, body) = send(
        app,
        json_request(Method::POST, "/api/v1/areas", json!({ "name": unique("Area") })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

/// Register a tool asset, the category with no extra required fields.
pub async fn create_asset(app: &Router, name: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/v1/assets",
            json!({
                "name": name,
                "description": "Registered by integration tests",
                "category": "facilities_machinery_tools",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

pub async fn create_assets(app: &Router, count: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let asset = create_asset(app, &format!("Drill {}", i + 1)).await;
        ids.push(asset["id"].as_i64().unwrap());
    }
    ids
}

pub async fn assign(
    app: &Router,
    responsible_id: i64,
    area_id: i64,
    assets: &[i64],
) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            Method::POST,
            "/api/v1/assignments",
            json!({
                "responsible_id": responsible_id,
                "area_id": area_id,
                "assigned_on": "2025-10-27",
                "category": "Instalaciones, Maquinarias y Herramientas",
                "assets": assets,
            }),
        ),
    )
    .await
}

pub fn reception_body(responsible_id: i64, area_id: i64, assets: &[i64]) -> Value {
    json!({
        "responsible_id": responsible_id,
        "area_id": area_id,
        "returned_on": "2025-12-03",
        "category": "Instalaciones, Maquinarias y Herramientas",
        "assets": assets,
    })
}

pub async fn receive(
    app: &Router,
    responsible_id: i64,
    area_id: i64,
    assets: &[i64],
) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            Method::POST,
            "/api/v1/receptions",
            reception_body(responsible_id, area_id, assets),
        ),
    )
    .await
}

/// Current holder of each asset, `None` when unassigned.
pub async fn holders(pool: &PgPool, assets: &[i64]) -> Vec<Option<i64>> {
    let mut out = Vec::with_capacity(assets.len());
    for id in assets {
        let holder: Option<i64> = sqlx::query_scalar(
            "SELECT responsible_id FROM current_assignments WHERE asset_id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .unwrap();
        out.push(holder);
    }
    out
}

/// Movement descriptions mentioning `needle`, oldest first.
pub async fn movements_mentioning(pool: &PgPool, needle: &str) -> Vec<(String, String, String)> {
    sqlx::query_as::<_, (String, String, String)>(
        r#"
        SELECT action, description, actor FROM movements
        WHERE strpos(description, $1) > 0
        ORDER BY id
        "#,
    )
    .bind(needle)
    .fetch_all(pool)
    .await
    .unwrap()
}

pub async fn reception_count(pool: &PgPool, responsible_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM receptions WHERE responsible_id = $1")
        .bind(responsible_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
