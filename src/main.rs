//! Catalog Engine API
//!
//! Loads a layered (Bronze / Silver / Gold) data-asset catalog and answers
//! governance, sensitivity, lineage and impact questions over it.
//!
//! The catalog lives in memory only. Every load replaces it as a whole;
//! a rejected load leaves the previous catalog in place.

use catalog_engine::config::Settings;
use catalog_engine::routes::create_router;
use catalog_engine::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting Catalog Engine...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");
    info!(
        "PII markers: {:?}, max traversal depth: {}",
        settings.engine.pii_markers, settings.engine.max_traversal_depth
    );

    let state = Arc::new(AppState::new(settings.engine.clone()));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Catalog ───");
    info!("   POST /api/catalog/load               - Replace the catalog");
    info!("   GET  /api/catalog/status             - Generation, counts, fingerprint");
    info!("   GET  /api/catalog/summary            - Subject areas, sources, layer counts");
    info!("");
    info!("   ─── Queries ───");
    info!("   GET  /api/relations                  - Relation names and fields");
    info!("   POST /api/query                      - Query one relation");
    info!("   POST /api/query/compound             - Join relations, with alternatives");
    info!("");
    info!("   ─── Lineage & Impact ───");
    info!("   GET  /api/lineage/{{view}}/{{column}}    - Upstream chain");
    info!("   GET  /api/impact/{{view}}/{{column}}     - Downstream impact report");
    info!("");
    info!("   ─── Governance ───");
    info!("   GET  /api/rules                      - Governance rule catalog");
    info!("   GET  /api/governance/violations      - Run every rule");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging.
///
/// `LOG_FORMAT=json` switches to one JSON object per event.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,catalog_engine=debug,tower_http=debug"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| fmt::layer().json().with_current_span(false)))
        .with((!json).then(|| {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact()
        }))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
