//! # Logging Setup
//!
//! Installs the global tracing subscriber: a file sink at `data/session.log`
//! that is always active, plus a stdout layer for Live mode. In Local mode the
//! console belongs to the operator, so only the file receives logs.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::domain::types::OperatingMode;

pub const LOG_DIR: &str = "data";
pub const LOG_FILE: &str = "session.log";

const DEFAULT_FILTER: &str =
    "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn";

/// The returned guard flushes the file writer on drop; hold it for the
/// lifetime of the process.
pub fn init(mode: OperatingMode) -> Result<WorkerGuard> {
    let dir = Path::new(LOG_DIR);
    if !dir.exists() {
        fs::create_dir_all(dir).context("Failed to create data directory")?;
    }

    // Clear previous session log
    let log_path = dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(LOG_DIR, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    let console_layer = if mode.is_local() {
        None
    } else {
        Some(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}
