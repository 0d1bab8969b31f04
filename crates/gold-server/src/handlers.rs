//! HTTP Handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use gold_valuation::{
    AcquiredQuote, Evaluation, Holding, QuoteError, ValuationError, ValuationReport,
};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub currency: String,
    pub discount_min: Decimal,
    pub discount_max: Decimal,
    pub discount_default: Decimal,
    pub usd_to_local_fallback: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct ValuationRequest {
    /// Local currency per gram
    pub buy_price: Decimal,
    /// Grams
    pub weight: Decimal,
    /// Chosen bank discount (%); the configured default when absent
    #[serde(default)]
    pub discount: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct ManualValuationRequest {
    #[serde(flatten)]
    pub valuation: ValuationRequest,
    pub spot_price_usd_per_oz: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ValuationResponse {
    pub currency: String,
    pub fx_fallback_used: bool,
    #[serde(flatten)]
    pub evaluation: Evaluation,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl ToString, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            code: code.into(),
        }),
    )
}

impl From<ValuationError> for ErrorResponse {
    fn from(e: ValuationError) -> Self {
        Self {
            error: e.to_string(),
            code: e.code().into(),
        }
    }
}

fn rejected(e: ValuationError) -> ApiError {
    tracing::warn!("Valuation rejected: {}", e);
    (StatusCode::UNPROCESSABLE_ENTITY, Json(e.into()))
}

fn quote_failed(e: QuoteError) -> ApiError {
    match e {
        QuoteError::Invalid(e) => rejected(e),
        QuoteError::Fetch(e) => {
            tracing::error!("Quote acquisition failed: {}", e);
            api_error(StatusCode::BAD_GATEWAY, e, "NO_PRICE")
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        currency: state.config.currency.clone(),
    })
}

/// Discount band limits and defaults for building input forms
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let config = &state.config;
    Json(ConfigResponse {
        currency: config.currency.clone(),
        discount_min: config.discount_min,
        discount_max: config.discount_max,
        discount_default: config.discount_default,
        usd_to_local_fallback: config.usd_to_local_fallback,
    })
}

/// Evaluate against live spot price and exchange rate
pub async fn evaluate_live(
    State(state): State<AppState>,
    Json(payload): Json<ValuationRequest>,
) -> Result<Json<ValuationResponse>, ApiError> {
    let acquired = state.quotes.live_quote().await.map_err(quote_failed)?;
    evaluate(&state, &payload, acquired)
}

/// Evaluate against a user-entered spot price
pub async fn evaluate_manual(
    State(state): State<AppState>,
    Json(payload): Json<ManualValuationRequest>,
) -> Result<Json<ValuationResponse>, ApiError> {
    let acquired = state
        .quotes
        .manual_quote(payload.spot_price_usd_per_oz)
        .await
        .map_err(quote_failed)?;
    evaluate(&state, &payload.valuation, acquired)
}

fn evaluate(
    state: &AppState,
    payload: &ValuationRequest,
    acquired: AcquiredQuote,
) -> Result<Json<ValuationResponse>, ApiError> {
    let holding = Holding::new(payload.buy_price, payload.weight).map_err(rejected)?;
    let band = state.config.band(payload.discount).map_err(rejected)?;
    let evaluation = state
        .session
        .evaluate(&holding, &acquired.quote, &band)
        .map_err(rejected)?;

    Ok(Json(ValuationResponse {
        currency: state.config.currency.clone(),
        fx_fallback_used: acquired.fx_fallback_used,
        evaluation: Arc::unwrap_or_clone(evaluation),
    }))
}

/// Re-display the last evaluation without recomputing
pub async fn last_valuation(State(state): State<AppState>) -> Result<Json<Evaluation>, ApiError> {
    state
        .session
        .last()
        .map(|evaluation| Json(Arc::unwrap_or_clone(evaluation)))
        .ok_or_else(no_valuation)
}

/// Last evaluation as a text report
pub async fn last_report(State(state): State<AppState>) -> Result<String, ApiError> {
    let evaluation = state.session.last().ok_or_else(no_valuation)?;
    Ok(ValuationReport::new(&evaluation, &state.config.currency, state.config.utc_offset_hours).render())
}

fn no_valuation() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "No valuation has been computed yet", "NO_VALUATION")
}
