//! Full market-quote endpoint: last-traded price plus the session OHLC
//! block. Preferred strategy because it is the only one that carries the
//! previous close the change statistics need.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::domain::{InstrumentRef, RawQuote};
use crate::http_client::{DhanAuth, HttpClient};
use crate::quote_source::{QuoteStrategy, SourceError, StrategyKind};
use crate::strategies::{decode_feed_entry, execute_call, feed_request_body, API_BASE};

pub struct MarketQuoteStrategy {
    http: Arc<dyn HttpClient>,
    auth: DhanAuth,
}

impl MarketQuoteStrategy {
    pub fn new(http: Arc<dyn HttpClient>, auth: DhanAuth) -> Self {
        Self { http, auth }
    }
}

impl QuoteStrategy for MarketQuoteStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MarketQuote
    }

    fn fetch<'a>(
        &'a self,
        instrument: &'a InstrumentRef,
    ) -> Pin<Box<dyn Future<Output = Result<RawQuote, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{API_BASE}/marketfeed/quote");
            let body = feed_request_body(instrument);
            let response = execute_call(&self.http, &self.auth, &url, &body).await?;

            let entry = decode_feed_entry("marketfeed/quote", &response.body, instrument)?;
            let last_price = entry.last_price.ok_or_else(|| {
                SourceError::no_data("marketfeed/quote payload is missing last_price")
            })?;
            let ohlc = entry.ohlc.unwrap_or_default();

            RawQuote::new(last_price, ohlc.open, ohlc.high, ohlc.low, ohlc.close).map_err(
                |error| SourceError::malformed(format!("marketfeed/quote payload rejected: {error}")),
            )
        })
    }
}
