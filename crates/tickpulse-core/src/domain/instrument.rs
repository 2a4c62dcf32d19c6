use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::ValidationError;

/// Exchange segment of a tracked instrument, keyed the way the quotation
/// service keys its request and response maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Index,
    Equity,
    Commodity,
}

impl Segment {
    pub const ALL: [Self; 3] = [Self::Index, Self::Equity, Self::Commodity];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Equity => "equity",
            Self::Commodity => "commodity",
        }
    }

    /// Segment key used in market-feed request and response maps.
    pub const fn wire_tag(self) -> &'static str {
        match self {
            Self::Index => "IDX_I",
            Self::Equity => "NSE_EQ",
            Self::Commodity => "MCX_COMM",
        }
    }

    /// Instrument class label required by the chart endpoints.
    pub const fn chart_instrument(self) -> &'static str {
        match self {
            Self::Index => "INDEX",
            Self::Equity => "EQUITY",
            Self::Commodity => "FUTCOM",
        }
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "index" => Ok(Self::Index),
            "equity" => Ok(Self::Equity),
            "commodity" => Ok(Self::Commodity),
            other => Err(ValidationError::InvalidSegment {
                value: other.to_owned(),
            }),
        }
    }
}

/// The one tracked instrument. Immutable, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentRef {
    segment: Segment,
    identifier: String,
    display_name: String,
}

impl InstrumentRef {
    pub fn new(
        segment: Segment,
        identifier: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }

        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(ValidationError::EmptyDisplayName);
        }

        Ok(Self {
            segment,
            identifier,
            display_name,
        })
    }

    pub fn segment(&self) -> Segment {
        self.segment
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}
