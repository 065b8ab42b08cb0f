//! # Domain Traits
//!
//! Abstract interfaces for the bot's collaborators (chat transport, identity
//! lookup, console, processes, price feed) and for command handlers.
//! Infrastructure provides the real implementations; tests provide doubles.

use async_trait::async_trait;

use crate::domain::types::Message;

/// Abstract interface for a chat transport (e.g., Matrix)
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver `content` to `channel`
    async fn send_text(&self, channel: &str, content: &str) -> Result<(), String>;
}

/// Looks up a human readable name for a transport-level sender ID
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn display_name(&self, sender_id: &str) -> Result<String, String>;
}

/// Line-oriented console output used in Local mode
pub trait ConsoleSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Runs external programs on behalf of handlers
#[async_trait]
pub trait ProcessControl: Send + Sync {
    /// Run `program` to completion inside `dir`, returning stdout on success
    /// and stderr (or the spawn error) on failure.
    async fn run(&self, program: &str, args: &[String], dir: &str) -> Result<String, String>;

    /// Start `command` without waiting for it.
    fn spawn_detached(&self, command: &str, dir: &str) -> Result<(), String>;

    /// Terminate the current process.
    fn exit(&self, code: i32);
}

/// A spot price quote
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub base: String,
    pub currency: String,
    pub amount: String,
}

#[async_trait]
pub trait TickerSource: Send + Sync {
    async fn spot_price(&self) -> Result<Quote, String>;
}

/// One admin command's behaviour.
///
/// Handlers run on their own task and may be invoked concurrently with other
/// handlers. They report user-visible failures themselves; the returned error
/// only reaches logs and completion listeners.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn invoke(&self, invoker: &str, text: &str, message: &Message) -> anyhow::Result<()>;
}
