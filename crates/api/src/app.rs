use axum::{
    middleware,
    routing::get,
    Router,
};
use domain::services::AuditSink;
use persistence::repositories::MovementRepository;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{assets, assignments, directory, health, movements, receptions};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// Where movement entries go once a mutation has committed.
    pub audit: Arc<dyn AuditSink>,
}

/// Build the router with the movement log stored in the database.
pub fn create_app(config: Config, pool: PgPool) -> Router {
    let audit: Arc<dyn AuditSink> = Arc::new(MovementRepository::new(pool.clone()));
    create_app_with_audit(config, pool, audit)
}

/// Build the router with a caller-supplied audit sink.
pub fn create_app_with_audit(config: Config, pool: PgPool, audit: Arc<dyn AuditSink>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        audit,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let ledger_routes = Router::new()
        .route(
            "/api/v1/receptions",
            get(receptions::list_receptions).post(receptions::create_reception),
        )
        .route(
            "/api/v1/receptions/:id",
            get(receptions::get_reception)
                .put(receptions::update_reception)
                .delete(receptions::delete_reception),
        )
        .route(
            "/api/v1/assignments",
            get(assignments::list_assignments).post(assignments::create_assignment),
        )
        .route(
            "/api/v1/assignments/current",
            get(assignments::list_current_holdings),
        );

    let registry_routes = Router::new()
        .route(
            "/api/v1/assets",
            get(assets::list_assets).post(assets::create_asset),
        )
        .route("/api/v1/assets/inactive", get(assets::list_inactive_assets))
        .route(
            "/api/v1/assets/:id",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route(
            "/api/v1/responsibles",
            get(directory::list_responsibles).post(directory::create_responsible),
        )
        .route(
            "/api/v1/areas",
            get(directory::list_areas).post(directory::create_area),
        )
        .route("/api/v1/movements", get(movements::list_movements));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(ledger_routes)
        .merge(registry_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
