//! Latest-bar fallback: synthesizes a quote from today's intraday chart
//! when both feed endpoints are down. The chart carries no previous-session
//! close, so the synthesized quote leaves it zero and the change statistics
//! stay zero rather than being fabricated.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::domain::{market_now, InstrumentRef, RawQuote};
use crate::http_client::{DhanAuth, HttpClient};
use crate::quote_source::{QuoteStrategy, SourceError, StrategyKind};
use crate::strategies::{execute_call, API_BASE};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub struct IntradayBarStrategy {
    http: Arc<dyn HttpClient>,
    auth: DhanAuth,
}

impl IntradayBarStrategy {
    pub fn new(http: Arc<dyn HttpClient>, auth: DhanAuth) -> Self {
        Self { http, auth }
    }
}

/// Chart responses are parallel arrays, one element per bar.
#[derive(Debug, Clone, Default, Deserialize)]
struct ChartResponse {
    #[serde(default)]
    open: Vec<f64>,
    #[serde(default)]
    high: Vec<f64>,
    #[serde(default)]
    low: Vec<f64>,
    #[serde(default)]
    close: Vec<f64>,
}

impl QuoteStrategy for IntradayBarStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::IntradayBar
    }

    fn fetch<'a>(
        &'a self,
        instrument: &'a InstrumentRef,
    ) -> Pin<Box<dyn Future<Output = Result<RawQuote, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let today = market_now().date().format(DATE_FORMAT).map_err(|error| {
                SourceError::internal(format!("chart date bound could not be formatted: {error}"))
            })?;

            let url = format!("{API_BASE}/charts/intraday");
            let body = json!({
                "securityId": instrument.identifier(),
                "exchangeSegment": instrument.segment().wire_tag(),
                "instrument": instrument.segment().chart_instrument(),
                "interval": "1",
                "fromDate": today,
                "toDate": today,
            });

            let response = execute_call(&self.http, &self.auth, &url, &body).await?;
            let chart: ChartResponse = serde_json::from_str(&response.body).map_err(|error| {
                SourceError::malformed(format!("charts/intraday response did not decode: {error}"))
            })?;

            let (Some(&first_open), Some(&last_close)) = (chart.open.first(), chart.close.last())
            else {
                return Err(SourceError::no_data(
                    "charts/intraday returned no bars for today",
                ));
            };

            let high = chart.high.iter().copied().reduce(f64::max).unwrap_or(0.0);
            let low = chart.low.iter().copied().reduce(f64::min).unwrap_or(0.0);

            RawQuote::new(last_close, first_open, high, low, 0.0).map_err(|error| {
                SourceError::malformed(format!("charts/intraday payload rejected: {error}"))
            })
        })
    }
}
