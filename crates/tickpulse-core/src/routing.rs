//! Ordered-fallback quote source.
//!
//! The original deployment duplicated the whole polling script once per
//! retrieval endpoint; here the endpoints are strategies behind one trait
//! and the priority order is explicit configuration.

use std::collections::HashSet;
use std::sync::Arc;

use log::debug;
use thiserror::Error;

use crate::domain::{InstrumentRef, RawQuote};
use crate::quote_source::{QuoteStrategy, SourceError, StrategyKind};

/// One failed attempt inside a fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt {
    pub strategy: StrategyKind,
    pub error: SourceError,
}

/// Every configured strategy failed to produce a usable quote.
#[derive(Debug, Clone, Error)]
#[error("no strategy produced a usable quote after {} attempt(s)", .attempts.len())]
pub struct FetchFailure {
    pub attempts: Vec<FetchAttempt>,
}

/// Quote source that tries an ordered list of strategies until one succeeds.
pub struct FallbackSource {
    strategies: Vec<Arc<dyn QuoteStrategy>>,
}

impl FallbackSource {
    /// Duplicate kinds keep their first position only, so a repeated CLI
    /// entry cannot make the chain retry the same endpoint twice.
    pub fn new(strategies: Vec<Arc<dyn QuoteStrategy>>) -> Self {
        let mut seen = HashSet::new();
        let strategies = strategies
            .into_iter()
            .filter(|strategy| seen.insert(strategy.kind()))
            .collect();
        Self { strategies }
    }

    pub fn strategy_order(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Invoke strategies in priority order. The first success short-circuits
    /// the remainder; a failure of any kind moves to the next strategy.
    pub async fn fetch(&self, instrument: &InstrumentRef) -> Result<RawQuote, FetchFailure> {
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            match strategy.fetch(instrument).await {
                Ok(quote) => {
                    if !attempts.is_empty() {
                        debug!(
                            "strategy {} recovered after {} failed attempt(s)",
                            strategy.kind(),
                            attempts.len()
                        );
                    }
                    return Ok(quote);
                }
                Err(error) => {
                    debug!("strategy {} produced no quote: {error}", strategy.kind());
                    attempts.push(FetchAttempt {
                        strategy: strategy.kind(),
                        error,
                    });
                }
            }
        }

        Err(FetchFailure { attempts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubStrategy {
        kind: StrategyKind,
        result: Result<RawQuote, SourceError>,
        calls: AtomicUsize,
    }

    impl StubStrategy {
        fn succeeding(kind: StrategyKind, last_price: f64) -> Arc<Self> {
            Arc::new(Self {
                kind,
                result: Ok(RawQuote::new(last_price, 0.0, 0.0, 0.0, 0.0).expect("valid quote")),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(kind: StrategyKind, error: SourceError) -> Arc<Self> {
            Arc::new(Self {
                kind,
                result: Err(error),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl QuoteStrategy for StubStrategy {
        fn kind(&self) -> StrategyKind {
            self.kind
        }

        fn fetch<'a>(
            &'a self,
            _instrument: &'a InstrumentRef,
        ) -> Pin<Box<dyn Future<Output = Result<RawQuote, SourceError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = self.result.clone();
            Box::pin(async move { result })
        }
    }

    fn instrument() -> InstrumentRef {
        InstrumentRef::new(crate::domain::Segment::Index, "13", "NIFTY 50").expect("valid")
    }

    #[tokio::test]
    async fn first_success_short_circuits_later_strategies() {
        let first = StubStrategy::failing(
            StrategyKind::MarketQuote,
            SourceError::no_data("payload is missing last_price"),
        );
        let second = StubStrategy::succeeding(StrategyKind::MarketLtp, 19_500.25);
        let third = StubStrategy::succeeding(StrategyKind::IntradayBar, 1.0);

        let source = FallbackSource::new(vec![
            first.clone() as Arc<dyn QuoteStrategy>,
            second.clone(),
            third.clone(),
        ]);
        let quote = source.fetch(&instrument()).await.expect("fallback succeeds");

        assert_eq!(quote.last_price, 19_500.25);
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
        assert_eq!(third.calls(), 0);
    }

    #[tokio::test]
    async fn exhausted_chain_reports_every_attempt_in_order() {
        let first = StubStrategy::failing(
            StrategyKind::MarketQuote,
            SourceError::transport("connection refused"),
        );
        let second = StubStrategy::failing(
            StrategyKind::MarketLtp,
            SourceError::upstream("upstream returned status 500"),
        );

        let source = FallbackSource::new(vec![first as Arc<dyn QuoteStrategy>, second]);
        let failure = source.fetch(&instrument()).await.expect_err("all failed");

        assert_eq!(failure.attempts.len(), 2);
        assert_eq!(failure.attempts[0].strategy, StrategyKind::MarketQuote);
        assert_eq!(failure.attempts[1].strategy, StrategyKind::MarketLtp);
    }

    #[tokio::test]
    async fn empty_chain_is_immediately_unavailable() {
        let source = FallbackSource::new(Vec::new());
        let failure = source.fetch(&instrument()).await.expect_err("no candidates");
        assert!(failure.attempts.is_empty());
    }

    #[tokio::test]
    async fn duplicate_kinds_are_dropped_after_first_position() {
        let first = StubStrategy::failing(
            StrategyKind::MarketQuote,
            SourceError::no_data("no entry"),
        );
        let duplicate = StubStrategy::succeeding(StrategyKind::MarketQuote, 42.0);

        let source = FallbackSource::new(vec![
            first.clone() as Arc<dyn QuoteStrategy>,
            duplicate.clone(),
        ]);
        assert_eq!(source.strategy_order(), vec![StrategyKind::MarketQuote]);

        source.fetch(&instrument()).await.expect_err("single failing strategy");
        assert_eq!(duplicate.calls(), 0);
    }
}
