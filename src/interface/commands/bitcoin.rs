//! # Bitcoin Ticker (`!bitcoin`)

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Arc;

use crate::application::messenger::SharedMessenger;
use crate::domain::errors::BotError;
use crate::domain::traits::{CommandHandler, TickerSource};
use crate::domain::types::Message;
use crate::strings::messages;

pub struct BitcoinHandler {
    ticker: Arc<dyn TickerSource>,
    messenger: SharedMessenger,
}

impl BitcoinHandler {
    pub fn new(ticker: Arc<dyn TickerSource>, messenger: SharedMessenger) -> Self {
        Self { ticker, messenger }
    }
}

#[async_trait]
impl CommandHandler for BitcoinHandler {
    async fn invoke(&self, _invoker: &str, _text: &str, _message: &Message) -> Result<()> {
        match self.ticker.spot_price().await {
            Ok(quote) => {
                let at = chrono::Utc::now().format("%H:%M UTC").to_string();
                self.messenger
                    .send(&messages::ticker_quote(&quote.base, &quote.currency, &quote.amount, &at))
                    .await?;
                Ok(())
            }
            Err(e) => {
                let _ = self.messenger.send_error(&messages::ticker_failed(&e)).await;
                Err(anyhow!(BotError::HandlerFailed(e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::messenger::Messenger;
    use crate::domain::types::OperatingMode;
    use crate::test_support::{FakeTicker, RecordingConsole, RecordingTransport};

    fn handler(ticker: FakeTicker, transport: Arc<RecordingTransport>) -> BitcoinHandler {
        let messenger = Arc::new(Messenger::new(
            OperatingMode::Live,
            transport,
            "!room:example.org",
            Arc::new(RecordingConsole::default()),
        ));
        BitcoinHandler::new(Arc::new(ticker), messenger)
    }

    #[tokio::test]
    async fn test_quote_is_sent_once() {
        let transport = Arc::new(RecordingTransport::default());
        let handler = handler(FakeTicker::price("101.50"), transport.clone());

        handler
            .invoke("alice", "!bitcoin", &Message::new("!bitcoin", "U1"))
            .await
            .unwrap();

        let sent = transport.texts();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("₿ BTC/USD: 101.50 (as of "));
    }

    #[tokio::test]
    async fn test_ticker_failure_is_reported() {
        let transport = Arc::new(RecordingTransport::default());
        let handler = handler(FakeTicker::failing("HTTP 503"), transport.clone());

        let err = handler
            .invoke("alice", "!bitcoin", &Message::new("!bitcoin", "U1"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("HTTP 503"));
        assert_eq!(
            transport.texts(),
            vec!["⚠️ **Error**: Bitcoin ticker unavailable: HTTP 503".to_string()]
        );
    }
}
