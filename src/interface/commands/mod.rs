//! # Command Handlers
//!
//! Built-in admin commands (`!build`, `!bitcoin`).
//! They are registered against an explicitly constructed registry at startup.

pub mod bitcoin;
pub mod build;

use std::sync::Arc;

use crate::application::messenger::SharedMessenger;
use crate::application::rebuild_lock::RebuildLock;
use crate::application::registry::CommandRegistry;
use crate::domain::config::AppConfig;
use crate::domain::errors::BotResult;
use crate::domain::traits::{ProcessControl, TickerSource};

/// Everything the built-in handlers need.
pub struct Builtins {
    pub messenger: SharedMessenger,
    pub lock: RebuildLock,
    pub process: Arc<dyn ProcessControl>,
    pub ticker: Arc<dyn TickerSource>,
}

pub async fn register_builtins(
    registry: &CommandRegistry,
    config: &AppConfig,
    deps: Builtins,
) -> BotResult<()> {
    registry
        .register(
            "build",
            Arc::new(build::BuildHandler::new(
                config.rebuild.clone(),
                deps.messenger.clone(),
                deps.lock,
                deps.process,
            )),
        )
        .await?;

    registry
        .register(
            "bitcoin",
            Arc::new(bitcoin::BitcoinHandler::new(deps.ticker, deps.messenger)),
        )
        .await?;

    Ok(())
}
