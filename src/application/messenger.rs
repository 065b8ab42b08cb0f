//! # Outbound Messenger
//!
//! "Send text to the operating channel". In Live mode this goes through the
//! chat transport; in Local mode it is echoed to the console and the transport
//! is never touched. Delivery is never retried here.

use std::sync::Arc;

use crate::domain::errors::{BotError, BotResult};
use crate::domain::traits::{ChatTransport, ConsoleSink};
use crate::domain::types::OperatingMode;

pub type SharedMessenger = Arc<Messenger>;

pub struct Messenger {
    mode: OperatingMode,
    transport: Arc<dyn ChatTransport>,
    channel: String,
    console: Arc<dyn ConsoleSink>,
}

impl Messenger {
    pub fn new(
        mode: OperatingMode,
        transport: Arc<dyn ChatTransport>,
        channel: impl Into<String>,
        console: Arc<dyn ConsoleSink>,
    ) -> Self {
        Self {
            mode,
            transport,
            channel: channel.into(),
            console,
        }
    }

    pub async fn send(&self, text: &str) -> BotResult<()> {
        match self.mode {
            OperatingMode::Local => {
                self.console
                    .write_line(&crate::strings::messages::console_line(text));
                Ok(())
            }
            OperatingMode::Live => {
                tracing::info!("{}", crate::strings::logs::sending_message(&self.channel, text));
                self.transport
                    .send_text(&self.channel, text)
                    .await
                    .map_err(|e| {
                        tracing::error!("{}", crate::strings::logs::send_failed(&e));
                        BotError::Send(e)
                    })
            }
        }
    }

    /// Sends an error-class message.
    pub async fn send_error(&self, detail: &str) -> BotResult<()> {
        self.send(&crate::strings::messages::error_message(detail)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingConsole, RecordingTransport};

    #[tokio::test]
    async fn test_live_send_uses_transport() {
        let transport = Arc::new(RecordingTransport::default());
        let console = Arc::new(RecordingConsole::default());
        let messenger = Messenger::new(OperatingMode::Live, transport.clone(), "!room:example.org", console.clone());

        messenger.send("hello").await.unwrap();

        assert_eq!(
            transport.sent(),
            vec![("!room:example.org".to_string(), "hello".to_string())]
        );
        assert!(console.lines().is_empty());
    }

    #[tokio::test]
    async fn test_live_send_failure_carries_detail() {
        let transport = Arc::new(RecordingTransport::failing("M_LIMIT_EXCEEDED"));
        let console = Arc::new(RecordingConsole::default());
        let messenger = Messenger::new(OperatingMode::Live, transport.clone(), "!room:example.org", console);

        let err = messenger.send("hello").await.unwrap_err();
        assert_eq!(err, BotError::Send("M_LIMIT_EXCEEDED".to_string()));
        // One attempt, no retry
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test]
    async fn test_local_send_never_touches_transport() {
        let transport = Arc::new(RecordingTransport::failing("network must not be used"));
        let console = Arc::new(RecordingConsole::default());
        let messenger = Messenger::new(OperatingMode::Local, transport.clone(), "", console.clone());

        messenger.send("hello").await.unwrap();
        messenger.send_error("boom").await.unwrap();

        assert_eq!(transport.attempts(), 0);
        assert_eq!(
            console.lines(),
            vec![">>  hello".to_string(), ">>  ⚠️ **Error**: boom".to_string()]
        );
    }
}
