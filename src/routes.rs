//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod catalog;
mod governance;
mod lineage;
mod query;

use crate::config::Settings;
use crate::error::{not_found_error, AppError};
use crate::state::SharedState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, Uri},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Catalog lifecycle
        .route("/api/catalog/load", post(catalog::load_catalog))
        .route("/api/catalog/status", get(catalog::catalog_status))
        .route("/api/catalog/summary", get(catalog::catalog_summary))

        // Relation queries
        .route("/api/relations", get(query::list_relations))
        .route("/api/query", post(query::run_query))
        .route("/api/query/compound", post(query::run_compound_query))

        // Lineage and impact
        .route("/api/lineage/{view}/{column}", get(lineage::get_lineage))
        .route("/api/impact/{view}/{column}", get(lineage::get_impact))

        // Governance
        .route("/api/rules", get(governance::list_rules))
        .route("/api/governance/violations", get(governance::list_violations))

        .fallback(route_not_found)

        // Apply middleware and state
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(settings.server.max_body_bytes))
        .layer(middleware)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    };

    cors.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn route_not_found(uri: Uri) -> AppError {
    not_found_error(format!("No route for {}", uri.path()))
}
