//! LTP-only endpoint: the cheapest feed call. No OHLC block comes back, so
//! the session fields stay zero and the formatter omits them.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::domain::{InstrumentRef, RawQuote};
use crate::http_client::{DhanAuth, HttpClient};
use crate::quote_source::{QuoteStrategy, SourceError, StrategyKind};
use crate::strategies::{decode_feed_entry, execute_call, feed_request_body, API_BASE};

pub struct MarketLtpStrategy {
    http: Arc<dyn HttpClient>,
    auth: DhanAuth,
}

impl MarketLtpStrategy {
    pub fn new(http: Arc<dyn HttpClient>, auth: DhanAuth) -> Self {
        Self { http, auth }
    }
}

impl QuoteStrategy for MarketLtpStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MarketLtp
    }

    fn fetch<'a>(
        &'a self,
        instrument: &'a InstrumentRef,
    ) -> Pin<Box<dyn Future<Output = Result<RawQuote, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{API_BASE}/marketfeed/ltp");
            let body = feed_request_body(instrument);
            let response = execute_call(&self.http, &self.auth, &url, &body).await?;

            let entry = decode_feed_entry("marketfeed/ltp", &response.body, instrument)?;
            let last_price = entry.last_price.ok_or_else(|| {
                SourceError::no_data("marketfeed/ltp payload is missing last_price")
            })?;

            RawQuote::new(last_price, 0.0, 0.0, 0.0, 0.0).map_err(|error| {
                SourceError::malformed(format!("marketfeed/ltp payload rejected: {error}"))
            })
        })
    }
}
