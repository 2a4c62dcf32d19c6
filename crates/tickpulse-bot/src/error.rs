use thiserror::Error;

use crate::config::ConfigError;
use crate::scheduler::TickError;

/// Top-level error categories mapped to process exit codes. Faults inside
/// the polling loop never reach here; only startup wiring and `--once` do.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] tickpulse_core::ValidationError),

    #[error(transparent)]
    Tick(#[from] TickError),
}

impl BotError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 1,
            Self::Validation(_) => 2,
            Self::Tick(_) => 3,
        }
    }
}
