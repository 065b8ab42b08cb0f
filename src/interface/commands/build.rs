//! # Self-Rebuild (`!build [branch]`)
//!
//! Pulls the requested branch, rebuilds the bot and restarts it. Concurrent
//! requests queue on the `RebuildLock` so only one rebuild touches the
//! checkout at a time.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Arc;

use crate::application::messenger::SharedMessenger;
use crate::application::rebuild_lock::RebuildLock;
use crate::domain::config::RebuildConfig;
use crate::domain::errors::BotError;
use crate::domain::traits::{CommandHandler, ProcessControl};
use crate::domain::types::Message;
use crate::strings::messages;

/// Exit code used after handing over to the restart script
pub const RESTART_EXIT_CODE: i32 = 1;

struct Step {
    announce: String,
    program: String,
    args: Vec<String>,
}

pub struct BuildHandler {
    config: RebuildConfig,
    messenger: SharedMessenger,
    lock: RebuildLock,
    process: Arc<dyn ProcessControl>,
}

impl BuildHandler {
    pub fn new(
        config: RebuildConfig,
        messenger: SharedMessenger,
        lock: RebuildLock,
        process: Arc<dyn ProcessControl>,
    ) -> Self {
        Self {
            config,
            messenger,
            lock,
            process,
        }
    }

    fn steps(&self, branch: &str) -> Result<Vec<Step>, String> {
        let mut build = self.config.build_command.split_whitespace().map(str::to_string);
        let Some(build_program) = build.next() else {
            return Err(format!("empty build command `{}`", self.config.build_command));
        };

        Ok(vec![
            Step {
                announce: messages::pulling_branch(branch),
                program: "git".to_string(),
                args: vec!["pull".to_string(), "origin".to_string(), branch.to_string()],
            },
            Step {
                announce: messages::checking_out(branch),
                program: "git".to_string(),
                args: vec!["checkout".to_string(), branch.to_string()],
            },
            Step {
                announce: messages::building(&self.config.build_command),
                program: build_program,
                args: build.collect(),
            },
        ])
    }

    async fn fail(&self, detail: String) -> Result<()> {
        let _ = self.messenger.send_error(&messages::step_failed(&detail)).await;
        Err(anyhow!(BotError::HandlerFailed(detail)))
    }
}

/// Second whitespace token of the command text, or the default branch.
pub fn requested_branch<'a>(text: &'a str, default: &'a str) -> &'a str {
    text.split_whitespace().nth(1).unwrap_or(default)
}

#[async_trait]
impl CommandHandler for BuildHandler {
    async fn invoke(&self, _invoker: &str, text: &str, _message: &Message) -> Result<()> {
        let _ = self.messenger.send(messages::REBUILD_REQUESTED).await;
        let guard = self.lock.acquire().await;

        // Returning from here on drops `guard` and releases the lock.
        let branch = requested_branch(text, &self.config.default_branch);
        if branch.starts_with('-') {
            return self.fail(format!("invalid branch name `{branch}`")).await;
        }

        let steps = match self.steps(branch) {
            Ok(steps) => steps,
            Err(e) => return self.fail(e).await,
        };

        for step in steps {
            let _ = self.messenger.send(&step.announce).await;
            tracing::info!("{}", crate::strings::logs::step_running(&step.program, &step.args));

            match self
                .process
                .run(&step.program, &step.args, &self.config.workdir)
                .await
            {
                Ok(output) => {
                    let _ = self.messenger.send(&messages::step_output(&output)).await;
                }
                Err(e) => return self.fail(e).await,
            }
        }

        let _ = self.messenger.send(messages::RESTARTING).await;
        if let Err(e) = self
            .process
            .spawn_detached(&self.config.restart_command, &self.config.workdir)
        {
            return self.fail(messages::restart_failed(&e)).await;
        }

        // The process exits below; the lock is intentionally never released.
        std::mem::forget(guard);
        self.process.exit(RESTART_EXIT_CODE);
        Ok(())
    }
}
