//! Application State

use std::sync::Arc;

use gold_valuation::{QuoteProvider, ValuationConfig, ValuationSession};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Currency, discount band limits, fallback rate
    pub config: Arc<ValuationConfig>,

    /// Latest evaluation, shared by every request
    pub session: Arc<ValuationSession>,

    /// Spot price and FX feeds
    pub quotes: Arc<QuoteProvider>,
}
