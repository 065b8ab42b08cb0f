//! # Main Entry Point
//!
//! Wires the bot together:
//! - Domain: Configuration, Types and Traits
//! - Infrastructure: Matrix, Console, Processes, Price Feed
//! - Application: Registry, Dispatcher, Event Loop, Messenger, Logging
//! - Interface: Built-in Admin Commands
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::dispatcher::Dispatcher;
use crate::application::event_loop::{EventLoop, LoopExit};
use crate::application::identity::IdentityResolver;
use crate::application::messenger::Messenger;
use crate::application::rebuild_lock::RebuildLock;
use crate::application::registry::CommandRegistry;
use crate::domain::config::AppConfig;
use crate::domain::errors::BotError;
use crate::domain::traits::{ChatTransport, IdentityService};
use crate::domain::types::OperatingMode;
use crate::infrastructure::console::{Offline, StdoutConsole};
use crate::infrastructure::matrix::MatrixService;
use crate::infrastructure::process::SystemProcess;
use crate::infrastructure::ticker::HttpTicker;
use crate::interface::commands::{Builtins, register_builtins};

/// Set to `true` to force Local mode
const LOCAL_ENV: &str = "PUDDLE_LOCAL";

#[derive(Debug, Parser)]
#[command(name = "puddle", about = "Chat bot that answers `!` admin commands")]
struct Cli {
    /// Path to the YAML configuration
    #[arg(long, default_value = "data/config.yaml")]
    config: PathBuf,

    /// Read commands from stdin instead of connecting to Matrix
    #[arg(long)]
    local: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration and mode
    let cli = Cli::parse();
    let env_local = std::env::var(LOCAL_ENV).is_ok_and(|v| v == "true");
    // Without a config file there are no credentials, which means Local mode
    let config = AppConfig::load(&cli.config, true)?;
    let mode = config.operating_mode(cli.local, env_local);

    // 2. Logging
    let _log_guard = application::logging::init(mode)?;
    tracing::info!("{}", strings::logs::STARTING);
    if !cli.config.exists() {
        tracing::warn!("{}", strings::logs::config_missing(&cli.config.display().to_string()));
    }
    tracing::info!("{}", strings::logs::mode_selected(mode.as_str()));

    let version = match &config.system.version {
        Some(version) => version.clone(),
        None => application::version::discover(&config.rebuild.workdir).await,
    };
    tracing::info!("{}", strings::logs::version_discovered(&version));

    // 3. Infrastructure
    let matrix = match mode {
        OperatingMode::Live => Some(
            MatrixService::new(&config.services.matrix)
                .await
                .context("Failed to build Matrix client")?,
        ),
        OperatingMode::Local => None,
    };
    let (transport, identity): (Arc<dyn ChatTransport>, Arc<dyn IdentityService>) = match &matrix {
        Some(matrix) => (Arc::new(matrix.clone()), Arc::new(matrix.clone())),
        None => (Arc::new(Offline), Arc::new(Offline)),
    };

    let messenger = Arc::new(Messenger::new(
        mode,
        transport,
        config.services.matrix.room.clone(),
        Arc::new(StdoutConsole),
    ));

    // 4. Commands
    let registry = Arc::new(CommandRegistry::new());
    register_builtins(
        &registry,
        &config,
        Builtins {
            messenger: messenger.clone(),
            lock: RebuildLock::new(),
            process: Arc::new(SystemProcess),
            ticker: Arc::new(HttpTicker::new(config.ticker.url.clone())),
        },
    )
    .await?;
    tracing::info!("{}", strings::logs::commands_registered(&registry.names().await));

    // 5. Event Loop
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(registry.clone(), messenger.clone()).with_completions(done_tx);
    let mut event_loop = EventLoop::new(
        mode,
        version,
        IdentityResolver::new(mode, identity),
        dispatcher,
        messenger,
    );

    let exit = match &matrix {
        Some(matrix) => event_loop.run(matrix.start()).await,
        None => event_loop.run_local(infrastructure::console::stdin_lines()).await,
    };

    // Dropping the loop drops the last idle completion sender, so this drains
    // until every handler still in flight has finished.
    drop(event_loop);
    while let Some(completion) = done_rx.recv().await {
        tracing::debug!("{:?}", completion);
    }

    tracing::info!("{}", strings::logs::SHUTDOWN);
    if exit == LoopExit::InvalidCredentials {
        return Err(BotError::InvalidCredentials.into());
    }
    Ok(())
}
