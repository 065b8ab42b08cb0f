//! # Dispatcher
//!
//! Resolves an admin command against the registry and launches its handler on
//! a separate task. The event loop never waits for a handler. Unknown commands
//! get a "not understood" reply addressed to the invoker.
//!
//! Handlers are not cancelled and have no timeout: they run until they finish
//! or the process exits. Callers that need to know when a handler is done can
//! await the returned `JoinHandle` or attach a completion channel.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::messenger::SharedMessenger;
use crate::application::registry::SharedRegistry;
use crate::domain::errors::BotError;
use crate::domain::types::Message;

/// Reported once per launched handler when a completion channel is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub command: String,
    pub invoker: String,
    pub result: Result<(), String>,
}

#[derive(Debug)]
pub enum Dispatch {
    Launched(JoinHandle<()>),
    NotUnderstood,
    LaunchFailed,
}

pub struct Dispatcher {
    registry: SharedRegistry,
    messenger: SharedMessenger,
    completions: Option<mpsc::UnboundedSender<Completion>>,
}

impl Dispatcher {
    pub fn new(registry: SharedRegistry, messenger: SharedMessenger) -> Self {
        Self {
            registry,
            messenger,
            completions: None,
        }
    }

    pub fn with_completions(mut self, tx: mpsc::UnboundedSender<Completion>) -> Self {
        self.completions = Some(tx);
        self
    }

    pub async fn dispatch(
        &self,
        invoker: &str,
        command: &str,
        arg_text: &str,
        message: &Message,
    ) -> Dispatch {
        tracing::info!("{}", crate::strings::logs::dispatching(command, invoker));

        let Some(handler) = self.registry.lookup(command).await else {
            tracing::info!("{}", BotError::UnknownCommand(command.to_string()));
            // Send failures are already logged by the messenger
            let _ = self
                .messenger
                .send(&crate::strings::messages::not_understood(invoker))
                .await;
            return Dispatch::NotUnderstood;
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!("{}", crate::strings::logs::launch_failed(command, &e.to_string()));
                return Dispatch::LaunchFailed;
            }
        };

        let command = command.to_string();
        let invoker = invoker.to_string();
        let text = arg_text.to_string();
        let message = message.clone();
        let completions = self.completions.clone();

        let handle = runtime.spawn(async move {
            let outcome = AssertUnwindSafe(handler.invoke(&invoker, &text, &message))
                .catch_unwind()
                .await;

            let result = match outcome {
                Ok(Ok(())) => {
                    tracing::info!("{}", crate::strings::logs::handler_finished(&command));
                    Ok(())
                }
                Ok(Err(e)) => {
                    let detail = format!("{e:#}");
                    tracing::warn!("{}", crate::strings::logs::handler_failed(&command, &detail));
                    Err(detail)
                }
                Err(panic) => {
                    let detail = panic_message(&*panic);
                    tracing::error!("{}", crate::strings::logs::handler_panicked(&command, &detail));
                    Err(detail)
                }
            };

            if let Some(tx) = completions {
                let _ = tx.send(Completion {
                    command,
                    invoker,
                    result,
                });
            }
        });

        Dispatch::Launched(handle)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
