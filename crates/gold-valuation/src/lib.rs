//! # gold-valuation
//!
//! Values a physical gold holding against the current spot price, the way a
//! bank would buy it back: converted to local currency per gram, minus a
//! buy-back discount somewhere in a known band.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌──────────────────┐   ┌──────────┐
//! │ QuoteProvider│──▶│ UnitConverter │──▶│ Discount Band    │──▶│ Profit   │──▶ Decision
//! │ (spot + FX)  │   │ USD/oz → /g   │   │ chosen/min/max   │   │ x3       │   Hold | Sell
//! └──────────────┘   └───────────────┘   └──────────────────┘   └──────────┘
//!                                  ValuationSession keeps the latest result
//! ```
//!
//! ## Example: 308 g bought at 3,254 TWD/g
//!
//! ```text
//! Spot 3,063.48 USD/oz @ 33.07 TWD  →  3,257.17 TWD/g
//! Bank discount 0.44% (band 0.12% – 1.16%)
//!   Simulated sell  3,242.84 TWD/g   total   998,793.22 TWD
//!   Original                          total 1,002,232.00 TWD
//!   → Hold (simulated value is below what was paid)
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod model;
pub mod report;
pub mod session;
pub mod valuation;

pub use config::ValuationConfig;
pub use error::{FetchError, Result, ValuationError};
pub use feed::{AcquiredQuote, QuoteError, QuoteProvider};
pub use model::{Decision, DiscountBand, Holding, MarketQuote, Profit, QuoteSource, ValuationResult};
pub use report::ValuationReport;
pub use session::{Evaluation, SessionState, ValuationSession};
pub use valuation::{UnitConverter, Valuator};
