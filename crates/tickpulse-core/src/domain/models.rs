use time::OffsetDateTime;

use crate::ValidationError;

/// Raw per-tick quote as produced by a retrieval strategy.
///
/// `last_price` is always meaningful; the session fields may legitimately be
/// zero when the producing endpoint does not carry them, and the formatter
/// drops zero fields rather than reporting them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawQuote {
    pub last_price: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub previous_close: f64,
}

impl RawQuote {
    pub fn new(
        last_price: f64,
        open: f64,
        high: f64,
        low: f64,
        previous_close: f64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("last_price", last_price)?;
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("previous_close", previous_close)?;

        Ok(Self {
            last_price,
            open,
            high,
            low,
            previous_close,
        })
    }
}

/// Quote plus change statistics for one polling tick. Derived fresh each
/// tick, never cached across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedSnapshot {
    pub quote: RawQuote,
    pub change: f64,
    pub change_percent: f64,
}

impl DerivedSnapshot {
    /// Change is measured against the previous session close. A close of
    /// zero means the reference is unknown, so both statistics stay zero.
    /// Full precision is retained here; rounding happens at render time.
    pub fn from_quote(quote: RawQuote) -> Self {
        if quote.previous_close > 0.0 {
            let change = quote.last_price - quote.previous_close;
            Self {
                quote,
                change,
                change_percent: change / quote.previous_close * 100.0,
            }
        } else {
            Self {
                quote,
                change: 0.0,
                change_percent: 0.0,
            }
        }
    }
}

/// Rendered report text on its way to the notifier.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub text: String,
    pub timestamp: OffsetDateTime,
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
