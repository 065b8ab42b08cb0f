//! # Console Adapter
//!
//! Local-mode collaborators: replies go to stdout, and the offline stand-ins
//! satisfy the transport and identity interfaces without any network access.

use async_trait::async_trait;
use tokio::io::{BufReader, Stdin};

use crate::domain::traits::{ChatTransport, ConsoleSink, IdentityService};

pub struct StdoutConsole;

impl ConsoleSink for StdoutConsole {
    fn write_line(&self, line: &str) {
        println!("{line}");
    }
}

/// Line-buffered stdin for the local command prompt
pub fn stdin_lines() -> BufReader<Stdin> {
    BufReader::new(tokio::io::stdin())
}

/// Stands in for the network when running locally. Every call fails, which
/// makes an accidental network path in Local mode visible.
pub struct Offline;

const OFFLINE: &str = "not connected (local mode)";

#[async_trait]
impl ChatTransport for Offline {
    async fn send_text(&self, _channel: &str, _content: &str) -> Result<(), String> {
        Err(OFFLINE.to_string())
    }
}

#[async_trait]
impl IdentityService for Offline {
    async fn display_name(&self, _sender_id: &str) -> Result<String, String> {
        Err(OFFLINE.to_string())
    }
}
