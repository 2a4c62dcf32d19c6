//! Quote retrieval contract and error taxonomy.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use crate::domain::{InstrumentRef, RawQuote};
use crate::ValidationError;

/// Identifier for one quote-retrieval strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    MarketQuote,
    MarketLtp,
    IntradayBar,
}

impl StrategyKind {
    /// Priority order used when the operator does not configure one.
    pub const DEFAULT_ORDER: [Self; 3] = [Self::MarketQuote, Self::MarketLtp, Self::IntradayBar];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketQuote => "market_quote",
            Self::MarketLtp => "market_ltp",
            Self::IntradayBar => "intraday_bar",
        }
    }
}

impl Display for StrategyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "market_quote" => Ok(Self::MarketQuote),
            "market_ltp" => Ok(Self::MarketLtp),
            "intraday_bar" => Ok(Self::IntradayBar),
            other => Err(ValidationError::InvalidStrategy {
                value: other.to_owned(),
            }),
        }
    }
}

/// Why a strategy produced no usable quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// The payload carried no entry or no last-traded price.
    NoData,
    /// The payload did not decode, or decoded into rejected values.
    MalformedPayload,
    /// The call never completed.
    Transport,
    /// The service answered with a non-success status.
    Upstream,
    /// A request could not be built on our side.
    Internal,
}

/// Structured strategy failure. Every kind is treated the same way by the
/// fallback chain: move on to the next strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn no_data(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NoData,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::MalformedPayload,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Upstream,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::NoData => "source.no_data",
            SourceErrorKind::MalformedPayload => "source.malformed_payload",
            SourceErrorKind::Transport => "source.transport",
            SourceErrorKind::Upstream => "source.upstream",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Retrieval strategy contract. One strategy wraps one upstream endpoint.
///
/// Any failure, whether transport, upstream rejection, or a missing or
/// malformed payload, is returned as a typed error and never panics the
/// pipeline.
pub trait QuoteStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn fetch<'a>(
        &'a self,
        instrument: &'a InstrumentRef,
    ) -> Pin<Box<dyn Future<Output = Result<RawQuote, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_strategy_kind_round_trip() {
        for kind in StrategyKind::DEFAULT_ORDER {
            assert_eq!(kind.as_str().parse::<StrategyKind>().expect("must parse"), kind);
        }
    }

    #[test]
    fn rejects_unknown_strategy_name() {
        let err = "websocket".parse::<StrategyKind>().expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidStrategy { .. }));
    }

    #[test]
    fn source_error_display_includes_stable_code() {
        let error = SourceError::no_data("payload is missing last_price");
        assert_eq!(
            error.to_string(),
            "payload is missing last_price (source.no_data)"
        );
    }
}
