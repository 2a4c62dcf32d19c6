use thiserror::Error;

/// Validation errors for domain construction and CLI-facing parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("instrument identifier cannot be empty")]
    EmptyIdentifier,
    #[error("instrument display name cannot be empty")]
    EmptyDisplayName,
    #[error("invalid segment '{value}', expected one of index, equity, commodity")]
    InvalidSegment { value: String },
    #[error("invalid strategy '{value}', expected one of market_quote, market_ltp, intraday_bar")]
    InvalidStrategy { value: String },
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
}
