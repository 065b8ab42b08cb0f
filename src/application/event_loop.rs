//! # Event Loop
//!
//! The single sequential consumer of transport events. Events are classified
//! and dispatched strictly in arrival order; handlers then run on their own
//! tasks so a slow command never stalls ingestion.
//!
//! ```text
//! Connecting -> Connected -> (Receiving)* -> Terminated
//! ```
//!
//! Only an invalid-credentials event ends the loop from the inside. Unknown
//! events are ignored.

use futures::{Stream, StreamExt};
use std::ops::ControlFlow;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::application::classifier::{Classification, classify};
use crate::application::dispatcher::{Dispatch, Dispatcher};
use crate::application::identity::IdentityResolver;
use crate::application::messenger::SharedMessenger;
use crate::domain::types::{LOCAL_IDENTITY, Message, OperatingMode, TransportEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Connecting,
    Connected,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    InvalidCredentials,
    StreamClosed,
}

pub struct EventLoop {
    mode: OperatingMode,
    version: String,
    identity: IdentityResolver,
    dispatcher: Dispatcher,
    messenger: SharedMessenger,
    state: LoopState,
}

impl EventLoop {
    pub fn new(
        mode: OperatingMode,
        version: impl Into<String>,
        identity: IdentityResolver,
        dispatcher: Dispatcher,
        messenger: SharedMessenger,
    ) -> Self {
        Self {
            mode,
            version: version.into(),
            identity,
            dispatcher,
            messenger,
            state: LoopState::Connecting,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Consumes `events` until the transport reports invalid credentials or
    /// the stream ends. The stream is not polled again after termination.
    pub async fn run<S>(&mut self, mut events: S) -> LoopExit
    where
        S: Stream<Item = TransportEvent> + Unpin,
    {
        while let Some(event) = events.next().await {
            if let ControlFlow::Break(exit) = self.handle_event(event).await {
                return exit;
            }
        }

        tracing::info!("{}", crate::strings::logs::STREAM_CLOSED);
        self.state = LoopState::Terminated;
        LoopExit::StreamClosed
    }

    /// Local mode: every input line is treated as a chat message from the
    /// placeholder identity. Runs until the reader hits EOF.
    pub async fn run_local<R>(&mut self, reader: R) -> LoopExit
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        tracing::info!("{}", crate::strings::logs::LOCAL_MODE_START);
        self.state = LoopState::Connected;

        let exit = self.run(Box::pin(local_events(reader))).await;
        tracing::info!("{}", crate::strings::logs::LOCAL_INPUT_CLOSED);
        exit
    }

    pub async fn handle_event(&mut self, event: TransportEvent) -> ControlFlow<LoopExit> {
        match event {
            TransportEvent::Connected => {
                tracing::info!("{}", crate::strings::logs::CONNECTED);
                self.state = LoopState::Connected;
                if self.mode == OperatingMode::Live {
                    let _ = self
                        .messenger
                        .send(&crate::strings::messages::startup_announcement(&self.version))
                        .await;
                }
            }
            TransportEvent::Message(message) => {
                let json = serde_json::to_string(&message).unwrap_or_default();
                tracing::info!("{}", crate::strings::logs::message_received(&json));
                self.handle_message(message).await;
            }
            TransportEvent::PresenceChange { user_id, presence } => {
                tracing::info!("{}", crate::strings::logs::presence_change(&user_id, &presence));
            }
            TransportEvent::LatencyReport(latency) => {
                tracing::debug!("{}", crate::strings::logs::latency(latency.as_millis()));
            }
            TransportEvent::TransportError(err) => {
                tracing::error!("{}", crate::strings::logs::transport_error(&err));
            }
            TransportEvent::InvalidCredentials => {
                tracing::error!("{}", crate::strings::logs::INVALID_CREDENTIALS);
                self.state = LoopState::Terminated;
                return ControlFlow::Break(LoopExit::InvalidCredentials);
            }
            TransportEvent::Other(desc) => {
                tracing::debug!("{}", crate::strings::logs::unknown_event(&desc));
            }
        }
        ControlFlow::Continue(())
    }

    /// Routes one chat message. Returns `None` when nothing was dispatched:
    /// ordinary chatter, or a sender whose identity could not be resolved.
    pub async fn handle_message(&self, message: Message) -> Option<Dispatch> {
        let Classification::AdminCommand { name, arg_text } = classify(&message) else {
            return None;
        };

        let invoker = match self.identity.resolve(&message.sender_id).await {
            Ok(invoker) => invoker,
            Err(e) => {
                tracing::warn!(
                    "{}",
                    crate::strings::logs::identity_failed(&message.sender_id, &e.to_string())
                );
                let _ = self
                    .messenger
                    .send_error(&crate::strings::messages::no_user_information(
                        &message.text,
                        &e.to_string(),
                    ))
                    .await;
                return None;
            }
        };

        Some(self.dispatcher.dispatch(&invoker, &name, &arg_text, &message).await)
    }
}

fn local_events<R>(reader: R) -> impl Stream<Item = TransportEvent>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async_stream::stream! {
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    yield TransportEvent::Message(Message::new(line, LOCAL_IDENTITY));
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("{}", crate::strings::logs::transport_error(&e.to_string()));
                    break;
                }
            }
        }
    }
}
