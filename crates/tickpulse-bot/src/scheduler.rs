//! Fixed-interval polling loop and its failure-recovery policy.
//!
//! One tick is fetch, compute, render, deliver, in that order, with nothing
//! else in flight. The loop survives every tick-level failure; only
//! cancellation ends it.

use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use thiserror::Error;
use tokio::sync::watch;

use tickpulse_core::{
    market_now, DeliveryError, DerivedSnapshot, FallbackSource, InstrumentRef, MessageFormatter,
    Notifier, RenderError,
};

/// Policy for ticks where no strategy produced a quote. The upstream goes
/// quiet for hours outside market hours, so both behaviors are legitimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ClosedNoticePolicy {
    /// Deliver the market-closed notice on every such tick.
    Notify,
    /// Log the failed attempts and stay silent until quotes return.
    Silent,
}

/// Loop state. Not persisted; a restart always begins at Starting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Starting,
    Polling,
    Backoff,
}

/// What one tick accomplished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// A quote was fetched and the report delivered.
    Reported { last_price: f64 },
    /// No usable quote; the market-closed notice went out.
    NoticeSent,
    /// No usable quote; policy suppressed the notice.
    Suppressed,
}

/// Typed per-tick failure, so recovery can differ by class instead of one
/// catch-all log-and-continue.
#[derive(Debug, Error)]
pub enum TickError {
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("unexpected fault: {0}")]
    Unexpected(#[from] RenderError),
}

pub struct Scheduler {
    source: FallbackSource,
    formatter: MessageFormatter,
    notifier: Arc<dyn Notifier>,
    instrument: InstrumentRef,
    interval: Duration,
    closed_notice: ClosedNoticePolicy,
    state: LoopState,
}

impl Scheduler {
    pub fn new(
        source: FallbackSource,
        formatter: MessageFormatter,
        notifier: Arc<dyn Notifier>,
        instrument: InstrumentRef,
        interval: Duration,
        closed_notice: ClosedNoticePolicy,
    ) -> Self {
        Self {
            source,
            formatter,
            notifier,
            instrument,
            interval,
            closed_notice,
            state: LoopState::Starting,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Drive the loop until the shutdown flag flips. Cancellation is
    /// observed at iteration boundaries only; a delivery in flight is never
    /// aborted. Failed ticks wait the same fixed interval as successful
    /// ones; upstream hiccups are transient, so the delay never escalates.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        self.announce_startup().await;

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.tick().await {
                Ok(outcome) => {
                    self.state = LoopState::Polling;
                    match outcome {
                        TickOutcome::Reported { last_price } => {
                            info!("report delivered, ltp {last_price}");
                        }
                        TickOutcome::NoticeSent => {
                            info!("no usable quote, market-closed notice delivered");
                        }
                        TickOutcome::Suppressed => {
                            info!("no usable quote, notice suppressed by policy");
                        }
                    }
                }
                Err(TickError::Delivery(delivery)) => {
                    // One attempt per message; the next tick carries fresh data.
                    self.state = LoopState::Polling;
                    warn!("delivery failed, continuing to next tick: {delivery}");
                }
                Err(fault) => {
                    self.state = LoopState::Backoff;
                    error!("tick raised an unexpected fault: {fault}");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("scheduler stopped");
    }

    /// One fetch, compute, render, deliver pass. Used by `--once` and by
    /// every loop iteration.
    pub async fn tick(&mut self) -> Result<TickOutcome, TickError> {
        let now = market_now();

        match self.source.fetch(&self.instrument).await {
            Ok(quote) => {
                let snapshot = DerivedSnapshot::from_quote(quote);
                let message = self.formatter.render_snapshot(&snapshot, now)?;
                self.notifier.deliver(&message).await?;
                Ok(TickOutcome::Reported {
                    last_price: snapshot.quote.last_price,
                })
            }
            Err(failure) => {
                for attempt in &failure.attempts {
                    warn!(
                        "strategy {} produced no quote: {}",
                        attempt.strategy, attempt.error
                    );
                }

                if self.closed_notice == ClosedNoticePolicy::Silent {
                    return Ok(TickOutcome::Suppressed);
                }

                let message = self.formatter.render_market_closed(now)?;
                self.notifier.deliver(&message).await?;
                Ok(TickOutcome::NoticeSent)
            }
        }
    }

    /// Startup notice. A failed delivery here is logged, not fatal; the
    /// loop still enters Polling.
    async fn announce_startup(&mut self) {
        match self.formatter.render_startup(market_now()) {
            Ok(message) => {
                if let Err(delivery) = self.notifier.deliver(&message).await {
                    warn!("startup notice was not delivered: {delivery}");
                }
            }
            Err(fault) => warn!("startup notice could not be rendered: {fault}"),
        }

        self.state = LoopState::Polling;
        info!(
            "scheduler polling {} every {:?}",
            self.instrument.display_name(),
            self.interval
        );
    }
}
