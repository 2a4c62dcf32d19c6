use clap::Parser;

use tickpulse_core::{Segment, StrategyKind, ValidationError};

use crate::scheduler::ClosedNoticePolicy;

/// Telegram price pulse for one tracked instrument.
///
/// Credentials come from the environment (TELEGRAM_BOT_TOKEN,
/// TELEGRAM_CHAT_ID, DHAN_CLIENT_ID, DHAN_ACCESS_TOKEN); everything
/// tunable lives here.
#[derive(Debug, Parser)]
#[command(name = "tickpulse", version, about)]
pub struct Cli {
    /// Seconds between polling ticks.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: u64,

    /// Exchange segment of the tracked instrument.
    #[arg(long, default_value = "index", value_parser = parse_segment)]
    pub segment: Segment,

    /// Security identifier within the segment.
    #[arg(long, default_value = "13")]
    pub security_id: String,

    /// Display name used in rendered reports.
    #[arg(long, default_value = "NIFTY 50")]
    pub name: String,

    /// Whether a tick without a usable quote sends a notice or stays silent.
    #[arg(long, value_enum, default_value_t = ClosedNoticePolicy::Notify)]
    pub closed_notice: ClosedNoticePolicy,

    /// Retrieval strategy order, comma separated.
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "market_quote,market_ltp,intraday_bar",
        value_parser = parse_strategy
    )]
    pub strategies: Vec<StrategyKind>,

    /// Run a single tick and exit instead of entering the loop.
    #[arg(long)]
    pub once: bool,
}

fn parse_segment(value: &str) -> Result<Segment, ValidationError> {
    value.parse()
}

fn parse_strategy(value: &str) -> Result<StrategyKind, ValidationError> {
    value.parse()
}
