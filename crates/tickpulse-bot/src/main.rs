mod cli;
mod config;
mod error;
mod scheduler;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use tokio::sync::watch;

use tickpulse_core::{
    DhanAuth, FallbackSource, HttpClient, InstrumentRef, IntradayBarStrategy, MarketLtpStrategy,
    MarketQuoteStrategy, MessageFormatter, QuoteStrategy, ReqwestHttpClient, StrategyKind,
    TelegramNotifier,
};

use crate::cli::Cli;
use crate::config::BotConfig;
use crate::error::BotError;
use crate::scheduler::Scheduler;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(code) => code,
        Err(error) => {
            log::error!("{error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, BotError> {
    let cli = Cli::parse();
    let config = BotConfig::from_env()?;

    let instrument = InstrumentRef::new(cli.segment, cli.security_id.clone(), cli.name.clone())?;
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let auth = DhanAuth::new(config.dhan_access_token, config.dhan_client_id);

    let source = FallbackSource::new(
        cli.strategies
            .iter()
            .map(|kind| build_strategy(*kind, &http, &auth))
            .collect(),
    );
    let notifier = Arc::new(TelegramNotifier::new(
        http,
        config.telegram_bot_token,
        config.telegram_chat_id,
    ));
    let formatter = MessageFormatter::new(cli.name.clone(), cli.interval_secs);

    let mut scheduler = Scheduler::new(
        source,
        formatter,
        notifier,
        instrument,
        Duration::from_secs(cli.interval_secs),
        cli.closed_notice,
    );

    if cli.once {
        let outcome = scheduler.tick().await?;
        info!("single tick finished: {outcome:?}");
        return Ok(ExitCode::SUCCESS);
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        } else {
            // Keep the sender alive; dropping it would read as cancellation.
            warn!("shutdown signal handler could not be installed");
            std::future::pending::<()>().await;
        }
    });

    scheduler.run(shutdown_rx).await;
    Ok(ExitCode::SUCCESS)
}

fn build_strategy(
    kind: StrategyKind,
    http: &Arc<dyn HttpClient>,
    auth: &DhanAuth,
) -> Arc<dyn QuoteStrategy> {
    match kind {
        StrategyKind::MarketQuote => Arc::new(MarketQuoteStrategy::new(http.clone(), auth.clone())),
        StrategyKind::MarketLtp => Arc::new(MarketLtpStrategy::new(http.clone(), auth.clone())),
        StrategyKind::IntradayBar => Arc::new(IntradayBarStrategy::new(http.clone(), auth.clone())),
    }
}
