//! Quotation-service endpoint strategies.
//!
//! All three strategies speak to the same service (Dhan API v2) with the
//! same credential headers; they differ in endpoint and payload richness.
//! Success requires an HTTP 200 and, on the feed endpoints, an explicit
//! `"status": "success"` field; anything else falls through to the next
//! strategy in the chain.

mod intraday;
mod market_ltp;
mod market_quote;

pub use intraday::IntradayBarStrategy;
pub use market_ltp::MarketLtpStrategy;
pub use market_quote::MarketQuoteStrategy;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::InstrumentRef;
use crate::http_client::{DhanAuth, HttpClient, HttpRequest, HttpResponse};
use crate::quote_source::SourceError;

pub(crate) const API_BASE: &str = "https://api.dhan.co/v2";
pub(crate) const REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Market-feed request body: segment tag to identifier list. Identifiers
/// go out as JSON numbers when they parse as integers, which is what the
/// feed endpoints expect for index and equity security ids.
pub(crate) fn feed_request_body(instrument: &InstrumentRef) -> Value {
    let id = instrument
        .identifier()
        .parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::from(instrument.identifier()));
    json!({ instrument.segment().wire_tag(): [id] })
}

pub(crate) async fn execute_call(
    http: &Arc<dyn HttpClient>,
    auth: &DhanAuth,
    url: &str,
    body: &Value,
) -> Result<HttpResponse, SourceError> {
    let request = HttpRequest::post(url)
        .with_json_body(body)
        .with_auth(auth)
        .with_timeout_ms(REQUEST_TIMEOUT_MS);

    let response = http
        .execute(request)
        .await
        .map_err(|error| SourceError::transport(format!("transport error: {error}")))?;

    if !response.is_success() {
        return Err(SourceError::upstream(format!(
            "upstream returned status {}",
            response.status
        )));
    }

    Ok(response)
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FeedResponse {
    pub status: Option<String>,
    #[serde(default)]
    pub data: HashMap<String, HashMap<String, FeedEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FeedEntry {
    pub last_price: Option<f64>,
    pub ohlc: Option<FeedOhlc>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct FeedOhlc {
    #[serde(default)]
    pub open: f64,
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub low: f64,
    #[serde(default)]
    pub close: f64,
}

/// Decode a feed response and pull out this instrument's entry.
pub(crate) fn decode_feed_entry(
    endpoint: &'static str,
    body: &str,
    instrument: &InstrumentRef,
) -> Result<FeedEntry, SourceError> {
    let response: FeedResponse = serde_json::from_str(body).map_err(|error| {
        SourceError::malformed(format!("{endpoint} response did not decode: {error}"))
    })?;

    if response.status.as_deref() != Some("success") {
        return Err(SourceError::upstream(format!(
            "{endpoint} reported status '{}'",
            response.status.as_deref().unwrap_or("<missing>")
        )));
    }

    response
        .data
        .get(instrument.segment().wire_tag())
        .and_then(|segment| segment.get(instrument.identifier()))
        .cloned()
        .ok_or_else(|| {
            SourceError::no_data(format!(
                "{endpoint} payload has no entry for {}/{}",
                instrument.segment().wire_tag(),
                instrument.identifier()
            ))
        })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::domain::Segment;

    pub fn instrument() -> InstrumentRef {
        InstrumentRef::new(Segment::Index, "13", "NIFTY 50").expect("valid instrument")
    }

    pub fn auth() -> DhanAuth {
        DhanAuth::new("test-token", "test-client")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::instrument;
    use super::*;
    use crate::domain::Segment;
    use crate::quote_source::SourceErrorKind;

    #[test]
    fn numeric_identifiers_are_sent_as_numbers() {
        let body = feed_request_body(&instrument());
        assert_eq!(body, json!({"IDX_I": [13]}));
    }

    #[test]
    fn non_numeric_identifiers_stay_strings() {
        let equity =
            InstrumentRef::new(Segment::Equity, "INE002A01018", "RELIANCE").expect("valid");
        let body = feed_request_body(&equity);
        assert_eq!(body, json!({"NSE_EQ": ["INE002A01018"]}));
    }

    #[test]
    fn non_success_status_field_is_an_upstream_error() {
        let body = r#"{"status":"failure","data":{}}"#;
        let err = decode_feed_entry("marketfeed/quote", body, &instrument())
            .expect_err("status must be success");
        assert_eq!(err.kind(), SourceErrorKind::Upstream);
    }

    #[test]
    fn missing_entry_for_instrument_is_no_data() {
        let body = r#"{"status":"success","data":{"IDX_I":{}}}"#;
        let err = decode_feed_entry("marketfeed/quote", body, &instrument())
            .expect_err("entry is absent");
        assert_eq!(err.kind(), SourceErrorKind::NoData);
    }

    #[test]
    fn undecodable_body_is_malformed() {
        let err = decode_feed_entry("marketfeed/quote", "<html>busy</html>", &instrument())
            .expect_err("not json");
        assert_eq!(err.kind(), SourceErrorKind::MalformedPayload);
    }
}
