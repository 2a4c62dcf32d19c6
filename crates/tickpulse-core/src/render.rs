//! Deterministic report rendering.
//!
//! Rendering is pure text: no fetch state leaks in, zero values are never
//! reported as real prices, and rounding to two decimals happens here and
//! nowhere earlier.

use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::domain::{DerivedSnapshot, RenderedMessage};

/// Timestamp line format, market-local calendar time.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day]-[month]-[year] [hour]:[minute]:[second]");

/// Rendering failed. Timestamp formatting is the only fallible step.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("timestamp could not be formatted: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Renders snapshots and status notices into Telegram Markdown text.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    display_name: String,
    cadence: String,
}

impl MessageFormatter {
    pub fn new(display_name: impl Into<String>, interval_secs: u64) -> Self {
        Self {
            display_name: display_name.into(),
            cadence: cadence_label(interval_secs),
        }
    }

    /// Render one snapshot report. Line rules:
    /// price and timestamp always; change only when nonzero, with a sign
    /// prefix and a green/red indicator; each session field only when
    /// positive, since some endpoints legitimately omit them.
    pub fn render_snapshot(
        &self,
        snapshot: &DerivedSnapshot,
        at: OffsetDateTime,
    ) -> Result<RenderedMessage, RenderError> {
        let quote = &snapshot.quote;
        let mut text = format!("📊 *{} LIVE*\n\n", self.display_name);
        text.push_str(&format!("💰 LTP: ₹{}\n", format_amount(quote.last_price)));

        if snapshot.change != 0.0 {
            let indicator = if snapshot.change >= 0.0 { "🟢" } else { "🔴" };
            text.push_str(&format!(
                "{indicator} Change: {} ({}%)\n\n",
                format_signed(snapshot.change),
                format_signed_percent(snapshot.change_percent),
            ));
        }

        if quote.open > 0.0 {
            text.push_str(&format!("🔵 Open: ₹{}\n", format_amount(quote.open)));
        }
        if quote.high > 0.0 {
            text.push_str(&format!("📈 High: ₹{}\n", format_amount(quote.high)));
        }
        if quote.low > 0.0 {
            text.push_str(&format!("📉 Low: ₹{}\n", format_amount(quote.low)));
        }
        if quote.previous_close > 0.0 {
            text.push_str(&format!(
                "⚪ Prev Close: ₹{}\n",
                format_amount(quote.previous_close)
            ));
        }

        text.push_str(&format!("\n🕐 Time: {}\n", at.format(TIMESTAMP_FORMAT)?));
        text.push_str(&format!("_Updated every {}_ ⏱️", self.cadence));

        Ok(RenderedMessage {
            text,
            timestamp: at,
        })
    }

    /// Distinct notice for ticks where no strategy produced a quote.
    /// A partial report with fabricated zeros is never rendered.
    pub fn render_market_closed(&self, at: OffsetDateTime) -> Result<RenderedMessage, RenderError> {
        let mut text = format!("😴 *{}*\n\n", self.display_name);
        text.push_str("No quote available right now. Market may be closed.\n\n");
        text.push_str(&format!("🕐 Time: {}", at.format(TIMESTAMP_FORMAT)?));

        Ok(RenderedMessage {
            text,
            timestamp: at,
        })
    }

    /// One informational notice sent when the loop starts.
    pub fn render_startup(&self, at: OffsetDateTime) -> Result<RenderedMessage, RenderError> {
        let mut text = format!("🤖 *{} tracker started!*\n\n", self.display_name);
        text.push_str(&format!("Live price updates every {}. 📈\n\n", self.cadence));
        text.push_str("_Powered by Dhan API v2_");

        Ok(RenderedMessage {
            text,
            timestamp: at,
        })
    }
}

fn cadence_label(interval_secs: u64) -> String {
    match interval_secs {
        60 => String::from("minute"),
        secs if secs % 60 == 0 => format!("{} minutes", secs / 60),
        secs => format!("{secs} seconds"),
    }
}

/// Two-decimal amount with thousands grouping, e.g. 19500.25 to "19,500.25".
fn format_amount(value: f64) -> String {
    let negative = value < 0.0;
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (index, digit) in int_part.chars().enumerate() {
        if index > 0 && (int_part.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Signed amount with an explicit plus on non-negative values.
fn format_signed(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", format_amount(value))
    } else {
        format_amount(value)
    }
}

fn format_signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawQuote;
    use time::macros::datetime;

    fn formatter() -> MessageFormatter {
        MessageFormatter::new("NIFTY 50", 60)
    }

    fn at() -> OffsetDateTime {
        datetime!(2026-08-06 14:30:00 +5:30)
    }

    #[test]
    fn groups_thousands_with_two_decimals() {
        assert_eq!(format_amount(19_500.25), "19,500.25");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(980.0), "980.00");
        assert_eq!(format_amount(-42.5), "-42.50");
    }

    #[test]
    fn full_quote_renders_every_line() {
        let quote =
            RawQuote::new(19_500.25, 19_400.0, 19_550.0, 19_380.0, 19_300.0).expect("valid");
        let snapshot = DerivedSnapshot::from_quote(quote);

        let message = formatter()
            .render_snapshot(&snapshot, at())
            .expect("renders");

        assert!(message.text.contains("📊 *NIFTY 50 LIVE*"));
        assert!(message.text.contains("💰 LTP: ₹19,500.25"));
        assert!(message.text.contains("🟢 Change: +200.25 (+1.04%)"));
        assert!(message.text.contains("🔵 Open: ₹19,400.00"));
        assert!(message.text.contains("📈 High: ₹19,550.00"));
        assert!(message.text.contains("📉 Low: ₹19,380.00"));
        assert!(message.text.contains("⚪ Prev Close: ₹19,300.00"));
        assert!(message.text.contains("🕐 Time: 06-08-2026 14:30:00"));
        assert!(message.text.contains("_Updated every minute_"));
    }

    #[test]
    fn zero_change_omits_change_and_prev_close_lines() {
        let quote = RawQuote::new(100.0, 0.0, 0.0, 0.0, 0.0).expect("valid");
        let snapshot = DerivedSnapshot::from_quote(quote);

        let message = formatter()
            .render_snapshot(&snapshot, at())
            .expect("renders");

        assert!(message.text.contains("💰 LTP: ₹100.00"));
        assert!(!message.text.contains("Change:"));
        assert!(!message.text.contains("Prev Close:"));
        assert!(!message.text.contains("Open:"));
        assert!(!message.text.contains("High:"));
        assert!(!message.text.contains("Low:"));
        assert!(message.text.contains("🕐 Time: 06-08-2026 14:30:00"));
    }

    #[test]
    fn negative_change_uses_red_indicator_without_plus() {
        let quote = RawQuote::new(19_250.0, 19_400.0, 19_420.0, 19_240.0, 19_300.0).expect("valid");
        let snapshot = DerivedSnapshot::from_quote(quote);

        let message = formatter()
            .render_snapshot(&snapshot, at())
            .expect("renders");

        assert!(message.text.contains("🔴 Change: -50.00 (-0.26%)"));
        assert!(!message.text.contains("+-"));
    }

    #[test]
    fn market_closed_notice_never_carries_prices() {
        let message = formatter().render_market_closed(at()).expect("renders");

        assert!(message.text.contains("😴 *NIFTY 50*"));
        assert!(message.text.contains("Market may be closed"));
        assert!(!message.text.contains('₹'));
        assert!(message.text.contains("🕐 Time: 06-08-2026 14:30:00"));
    }

    #[test]
    fn startup_notice_advertises_cadence() {
        let message = MessageFormatter::new("NIFTY 50", 300)
            .render_startup(at())
            .expect("renders");

        assert!(message.text.contains("🤖 *NIFTY 50 tracker started!*"));
        assert!(message.text.contains("every 5 minutes"));
    }

    #[test]
    fn cadence_labels_cover_minutes_and_seconds() {
        assert_eq!(cadence_label(60), "minute");
        assert_eq!(cadence_label(120), "2 minutes");
        assert_eq!(cadence_label(90), "90 seconds");
    }
}
