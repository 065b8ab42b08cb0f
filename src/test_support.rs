//! Test doubles shared by the unit tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

use crate::domain::traits::{
    ChatTransport, CommandHandler, ConsoleSink, IdentityService, ProcessControl, Quote,
    TickerSource,
};
use crate::domain::types::Message;

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
    attempts: AtomicUsize,
    failure: Option<String>,
}

impl RecordingTransport {
    pub fn failing(detail: &str) -> Self {
        Self {
            failure: Some(detail.to_string()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, channel: &str, content: &str) -> Result<(), String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(detail) = &self.failure {
            return Err(detail.clone());
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel.to_string(), content.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingConsole {
    lines: Mutex<Vec<String>>,
}

impl RecordingConsole {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl ConsoleSink for RecordingConsole {
    fn write_line(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

pub struct StaticIdentity {
    answer: Result<String, String>,
    echo_sender: bool,
    lookups: AtomicUsize,
}

impl StaticIdentity {
    pub fn named(name: &str) -> Self {
        Self {
            answer: Ok(name.to_string()),
            echo_sender: false,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Answers every lookup with the sender id itself.
    pub fn echo_sender() -> Self {
        Self {
            echo_sender: true,
            ..Self::named("")
        }
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            answer: Err(detail.to_string()),
            echo_sender: false,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityService for StaticIdentity {
    async fn display_name(&self, sender_id: &str) -> Result<String, String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.echo_sender {
            return Ok(sender_id.to_string());
        }
        self.answer.clone()
    }
}

#[derive(Default)]
pub struct CountingHandler {
    calls: AtomicUsize,
    last_text: Mutex<Option<String>>,
}

impl CountingHandler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_text(&self) -> Option<String> {
        self.last_text.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandHandler for CountingHandler {
    async fn invoke(&self, _invoker: &str, text: &str, _message: &Message) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_text.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

pub struct FailingHandler;

#[async_trait]
impl CommandHandler for FailingHandler {
    async fn invoke(&self, _invoker: &str, _text: &str, _message: &Message) -> anyhow::Result<()> {
        anyhow::bail!("handler exploded")
    }
}

pub struct PanickingHandler;

#[async_trait]
impl CommandHandler for PanickingHandler {
    async fn invoke(&self, _invoker: &str, _text: &str, _message: &Message) -> anyhow::Result<()> {
        panic!("handler panicked on purpose")
    }
}

/// Blocks until the paired sender fires.
pub struct GatedHandler {
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedHandler {
    pub fn new() -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                gate: Mutex::new(Some(rx)),
            },
            tx,
        )
    }
}

#[async_trait]
impl CommandHandler for GatedHandler {
    async fn invoke(&self, _invoker: &str, _text: &str, _message: &Message) -> anyhow::Result<()> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        Ok(())
    }
}

pub struct FakeTicker {
    answer: Result<Quote, String>,
}

impl FakeTicker {
    pub fn price(amount: &str) -> Self {
        Self {
            answer: Ok(Quote {
                base: "BTC".to_string(),
                currency: "USD".to_string(),
                amount: amount.to_string(),
            }),
        }
    }

    pub fn failing(detail: &str) -> Self {
        Self {
            answer: Err(detail.to_string()),
        }
    }
}

#[async_trait]
impl TickerSource for FakeTicker {
    async fn spot_price(&self) -> Result<Quote, String> {
        self.answer.clone()
    }
}

/// Records every program run instead of executing it.
#[derive(Default)]
pub struct ScriptedProcess {
    calls: Mutex<Vec<String>>,
    spawned: Mutex<Vec<String>>,
    exits: Mutex<Vec<i32>>,
    failures: Vec<(String, String)>,
    spawn_failure: Option<String>,
    delay: Option<Duration>,
}

impl ScriptedProcess {
    /// Fail any call whose command line starts with `prefix`.
    pub fn fail_on(mut self, prefix: &str, err: &str) -> Self {
        self.failures.push((prefix.to_string(), err.to_string()));
        self
    }

    pub fn fail_spawn(mut self, err: &str) -> Self {
        self.spawn_failure = Some(err.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn spawned(&self) -> Vec<String> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn exit_codes(&self) -> Vec<i32> {
        self.exits.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessControl for ScriptedProcess {
    async fn run(&self, program: &str, args: &[String], _dir: &str) -> Result<String, String> {
        let line = if args.is_empty() {
            program.to_string()
        } else {
            format!("{program} {}", args.join(" "))
        };
        self.calls.lock().unwrap().push(line.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.failures.iter().find(|(prefix, _)| line.starts_with(prefix.as_str())) {
            Some((_, err)) => Err(err.clone()),
            None => Ok(format!("ok: {line}\n")),
        }
    }

    fn spawn_detached(&self, command: &str, _dir: &str) -> Result<(), String> {
        if let Some(err) = &self.spawn_failure {
            return Err(err.clone());
        }
        self.spawned.lock().unwrap().push(command.to_string());
        Ok(())
    }

    fn exit(&self, code: i32) {
        self.exits.lock().unwrap().push(code);
    }
}
