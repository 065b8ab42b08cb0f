//! # Command Registry
//!
//! Maps admin command names to their handlers. Registration is insert-only:
//! there is no update and no removal. Lookups clone the handler `Arc`, so the
//! read guard is never held while a handler runs.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::errors::{BotError, BotResult};
use crate::domain::traits::CommandHandler;

pub type SharedRegistry = Arc<CommandRegistry>;

#[derive(Default)]
pub struct CommandRegistry {
    commands: RwLock<HashMap<String, Arc<dyn CommandHandler>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `handler`. Fails without touching the registry if the
    /// name is already taken.
    pub async fn register(&self, name: &str, handler: Arc<dyn CommandHandler>) -> BotResult<()> {
        tracing::info!("{}", crate::strings::logs::registering_command(name));

        let mut commands = self.commands.write().await;
        if commands.contains_key(name) {
            return Err(BotError::AlreadyExists(name.to_string()));
        }
        commands.insert(name.to_string(), handler);
        Ok(())
    }

    pub async fn lookup(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.commands.read().await.get(name).cloned()
    }

    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.commands.read().await.len()
    }
}
