//! Valuation Session
//!
//! Holds the most recent evaluation so it can be re-displayed without
//! recomputing. A session starts `Empty` and becomes `Evaluated` only on a
//! successful [`ValuationSession::evaluate`]; failed calls leave it untouched.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::model::{DiscountBand, Holding, MarketQuote, QuoteSource, ValuationResult};
use crate::valuation::Valuator;

/// A result together with the quote that produced it
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub result: ValuationResult,
    pub quote: MarketQuote,
    pub evaluated_at: DateTime<Utc>,
}

impl Evaluation {
    pub const fn source(&self) -> QuoteSource {
        self.quote.source()
    }
}

/// Snapshot of the session's lifecycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Evaluated(Arc<Evaluation>),
}

#[derive(Debug, Default)]
pub struct ValuationSession {
    valuator: Valuator,
    last: RwLock<Option<Arc<Evaluation>>>,
}

impl ValuationSession {
    pub fn new(valuator: Valuator) -> Self {
        Self {
            valuator,
            last: RwLock::new(None),
        }
    }

    /// Evaluate and, on success, replace the stored evaluation in one swap
    pub fn evaluate(
        &self,
        holding: &Holding,
        quote: &MarketQuote,
        band: &DiscountBand,
    ) -> Result<Arc<Evaluation>> {
        let result = self.valuator.value(holding, quote, band).inspect_err(|e| {
            tracing::warn!("Evaluation rejected: {}", e);
        })?;

        let evaluation = Arc::new(Evaluation {
            result,
            quote: quote.clone(),
            evaluated_at: Utc::now(),
        });

        // The slot only ever holds a fully built value, so a poisoned lock is safe to reuse.
        *self.last.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&evaluation));

        tracing::info!(
            source = quote.source().label(),
            decision = evaluation.result.decision.label(),
            "Session evaluated"
        );

        Ok(evaluation)
    }

    pub fn state(&self) -> SessionState {
        match self.last() {
            Some(evaluation) => SessionState::Evaluated(evaluation),
            None => SessionState::Empty,
        }
    }

    /// Last stored evaluation, if any
    pub fn last(&self) -> Option<Arc<Evaluation>> {
        self.last.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last_result(&self) -> Option<ValuationResult> {
        self.last().map(|e| e.result.clone())
    }

    pub fn last_quote(&self) -> Option<MarketQuote> {
        self.last().map(|e| e.quote.clone())
    }

    pub fn is_evaluated(&self) -> bool {
        self.last().is_some()
    }

    pub const fn valuator(&self) -> &Valuator {
        &self.valuator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuationError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn holding() -> Holding {
        Holding::new(dec!(3254.0), dec!(308.0)).unwrap()
    }

    fn band() -> DiscountBand {
        DiscountBand::new(dec!(0.12), dec!(1.16), dec!(0.44)).unwrap()
    }

    fn quote(source: QuoteSource) -> MarketQuote {
        MarketQuote::new(dec!(3063.48), dec!(33.07), Utc::now(), source).unwrap()
    }

    #[test]
    fn test_starts_empty() {
        let session = ValuationSession::default();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(!session.is_evaluated());
        assert!(session.last_result().is_none());
    }

    #[test]
    fn test_evaluate_stores_result_and_quote() {
        let session = ValuationSession::default();
        let evaluation = session.evaluate(&holding(), &quote(QuoteSource::Live), &band()).unwrap();

        assert!(session.is_evaluated());
        assert_eq!(session.last_result(), Some(evaluation.result.clone()));
        assert_eq!(session.last_quote().map(|q| q.source()), Some(QuoteSource::Live));
        assert!(matches!(session.state(), SessionState::Evaluated(_)));
    }

    #[test]
    fn test_identical_inputs_identical_results() {
        let session = ValuationSession::default();
        let q = quote(QuoteSource::Manual);
        let first = session.evaluate(&holding(), &q, &band()).unwrap();
        let second = session.evaluate(&holding(), &q, &band()).unwrap();
        assert_eq!(first.result, second.result);
    }

    #[test]
    fn test_failed_evaluation_keeps_prior_state() {
        let session = ValuationSession::default();
        let before = session.evaluate(&holding(), &quote(QuoteSource::Live), &band()).unwrap();

        let bad_holding = Holding { buy_price: dec!(-1), weight: dec!(308) };
        let err = session.evaluate(&bad_holding, &quote(QuoteSource::Manual), &band()).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidHolding { .. }));

        let after = session.last().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.source(), QuoteSource::Live);
    }

    #[test]
    fn test_failed_first_evaluation_stays_empty() {
        let session = ValuationSession::default();
        let holding = Holding { buy_price: dec!(3254), weight: Decimal::ZERO };
        assert!(session.evaluate(&holding, &quote(QuoteSource::Live), &band()).is_err());
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[test]
    fn test_overflowing_inputs_are_rejected_not_panicking() {
        let huge = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0);
        let session = ValuationSession::default();

        let whale = Holding::new(huge, huge).unwrap();
        let err = session.evaluate(&whale, &quote(QuoteSource::Live), &band()).unwrap_err();
        assert_eq!(err.code(), "OVERFLOW");
        assert_eq!(session.state(), SessionState::Empty);

        let before = session.evaluate(&holding(), &quote(QuoteSource::Live), &band()).unwrap();
        let wild = MarketQuote::from_f64(1e20, 1e20, Utc::now(), QuoteSource::Manual).unwrap();
        assert!(matches!(
            session.evaluate(&holding(), &wild, &band()),
            Err(ValuationError::Overflow(_))
        ));
        assert!(Arc::ptr_eq(&before, &session.last().unwrap()));
    }

    #[test]
    fn test_new_evaluation_supersedes() {
        let session = ValuationSession::default();
        session.evaluate(&holding(), &quote(QuoteSource::Live), &band()).unwrap();
        let cheaper = band().with_chosen(dec!(1.16)).unwrap();
        let latest = session.evaluate(&holding(), &quote(QuoteSource::Manual), &cheaper).unwrap();

        let stored = session.last().unwrap();
        assert!(Arc::ptr_eq(&latest, &stored));
        assert_eq!(stored.result.discount_used, dec!(1.16));
        assert_eq!(stored.source(), QuoteSource::Manual);
    }

    #[test]
    fn test_concurrent_evaluations_leave_a_complete_result() {
        let session = Arc::new(ValuationSession::default());
        let handles: Vec<_> = [dec!(0.12), dec!(0.44), dec!(1.16)]
            .into_iter()
            .map(|chosen| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || {
                    let band = band().with_chosen(chosen).unwrap();
                    session.evaluate(&holding(), &quote(QuoteSource::Live), &band).unwrap()
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let stored = session.last().unwrap();
        assert!(results.iter().any(|r| Arc::ptr_eq(r, &stored)));
    }
}
