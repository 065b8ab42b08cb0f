//! # Domain Types
//!
//! Shared data types passed between the transport adapters and the dispatch core.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identity used for every message in Local mode.
pub const LOCAL_IDENTITY: &str = "cliuser";

/// A single inbound chat message.
///
/// Lives for one classify → dispatch cycle. `raw` carries the transport's own
/// payload so handlers can inspect fields the core does not model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender_id: String,
    #[serde(default)]
    pub raw: serde_json::Value,
}

impl Message {
    pub fn new(text: impl Into<String>, sender_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender_id: sender_id.into(),
            raw: serde_json::Value::Null,
        }
    }

    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = raw;
        self
    }
}

/// Events produced by a live transport connection.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The connection is established and the first sync has completed.
    Connected,
    Message(Message),
    PresenceChange { user_id: String, presence: String },
    LatencyReport(Duration),
    TransportError(String),
    /// The homeserver rejected our credentials. Nothing can recover from this.
    InvalidCredentials,
    /// Anything the core does not understand. Carries a short description for logs.
    Other(String),
}

/// Operating mode, decided once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    #[default]
    Live,
    Local,
}

impl OperatingMode {
    pub fn is_local(self) -> bool {
        self == OperatingMode::Local
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperatingMode::Live => "live",
            OperatingMode::Local => "local",
        }
    }
}
