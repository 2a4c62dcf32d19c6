//! # tickpulse-core
//!
//! Domain contracts and collaborators for the tickpulse reporter: fetch one
//! instrument's quote through an ordered strategy chain, derive change
//! statistics, render a Telegram report, deliver it.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Domain models and the market-local clock |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP transport seam shared by strategies and notifier |
//! | [`notify`] | Notifier boundary and the Telegram channel |
//! | [`quote_source`] | Strategy contract and error taxonomy |
//! | [`render`] | Deterministic report rendering |
//! | [`routing`] | Ordered-fallback quote source |
//! | [`strategies`] | Quotation-service endpoint strategies |
//!
//! ## Error Handling
//!
//! Every collaborator failure is a typed error: strategy failures carry a
//! [`SourceErrorKind`], delivery failures a [`DeliveryError`] variant, and
//! nothing in the fetch path panics on upstream garbage. Credentials are
//! read from the process environment by the binary crate and never logged.

pub mod domain;
pub mod error;
pub mod http_client;
pub mod notify;
pub mod quote_source;
pub mod render;
pub mod routing;
pub mod strategies;

pub use domain::{
    market_now, DerivedSnapshot, InstrumentRef, RawQuote, RenderedMessage, Segment, MARKET_OFFSET,
};
pub use error::ValidationError;
pub use http_client::{
    DhanAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
    ScriptedHttpClient,
};
pub use notify::{DeliveryError, Notifier, TelegramNotifier};
pub use quote_source::{QuoteStrategy, SourceError, SourceErrorKind, StrategyKind};
pub use render::{MessageFormatter, RenderError};
pub use routing::{FallbackSource, FetchAttempt, FetchFailure};
pub use strategies::{IntradayBarStrategy, MarketLtpStrategy, MarketQuoteStrategy};
