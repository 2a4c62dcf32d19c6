//! Domain models and the market-local clock.

mod instrument;
mod models;

pub use instrument::{InstrumentRef, Segment};
pub use models::{DerivedSnapshot, RawQuote, RenderedMessage};

use time::macros::offset;
use time::{OffsetDateTime, UtcOffset};

/// Exchange-local offset for the default market (IST). Reports read in
/// market time regardless of where the process runs.
pub const MARKET_OFFSET: UtcOffset = offset!(+5:30);

/// Current instant in market-local time.
pub fn market_now() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(MARKET_OFFSET)
}
