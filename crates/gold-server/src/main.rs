//! gold-valuation HTTP Server
//!
//! Axum-based server exposing live and manual gold holding valuations.
//! The most recent valuation is kept in a shared session for re-display.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{routing::{get, post}, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gold_valuation::{
    feed::{FxRateFeed, HttpQuoteFeed, SpotPriceFeed, StaticQuoteFeed},
    QuoteProvider, ValuationConfig, ValuationSession, Valuator,
};

use crate::handlers::{
    evaluate_live, evaluate_manual, get_config, health_check, last_report, last_valuation,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ValuationConfig::from_env()?;
    tracing::info!(
        "Currency {} | discount band {}% - {}% (default {}%) | fallback rate {}",
        config.currency,
        config.discount_min,
        config.discount_max,
        config.discount_default,
        config.usd_to_local_fallback,
    );

    // Offline mode serves a fixed quote instead of calling the public feeds
    let (spot, fx): (Arc<dyn SpotPriceFeed>, Arc<dyn FxRateFeed>) =
        if std::env::var("GOLD_OFFLINE").is_ok_and(|v| v == "1") {
            tracing::warn!("⚠ GOLD_OFFLINE=1 - using static quote feed");
            let feed = Arc::new(StaticQuoteFeed::new(
                config.offline_spot_price,
                config.usd_to_local_fallback,
            ));
            (feed.clone(), feed)
        } else {
            let feed = Arc::new(HttpQuoteFeed::from_config(&config)?);
            (feed.clone(), feed)
        };

    let quotes = QuoteProvider::new(spot, fx, config.currency.clone(), config.usd_to_local_fallback);
    let session = ValuationSession::new(Valuator::new(config.converter()?));

    let state = AppState {
        config: Arc::new(config),
        session: Arc::new(session),
        quotes: Arc::new(quotes),
    };

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 gold-server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                    - Health check");
    tracing::info!("  GET  /api/config                - Discount band and currency");
    tracing::info!("  POST /api/valuation/live        - Value holding at live spot price");
    tracing::info!("  POST /api/valuation/manual      - Value holding at a given spot price");
    tracing::info!("  GET  /api/valuation/last        - Last valuation");
    tracing::info!("  GET  /api/valuation/last/report - Last valuation as text");
    tracing::info!("");

    axum::serve(listener, app(state)).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/config", get(get_config))

        // Valuation API
        .route("/api/valuation/live", post(evaluate_live))
        .route("/api/valuation/manual", post(evaluate_manual))
        .route("/api/valuation/last", get(last_valuation))
        .route("/api/valuation/last/report", get(last_report))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
