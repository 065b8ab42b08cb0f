//! # Identity Resolution
//!
//! Turns a transport sender ID into a display name. Local mode never calls out
//! and always answers with the placeholder identity.

use std::sync::Arc;

use crate::domain::errors::{BotError, BotResult};
use crate::domain::traits::IdentityService;
use crate::domain::types::{LOCAL_IDENTITY, OperatingMode};

pub struct IdentityResolver {
    mode: OperatingMode,
    service: Arc<dyn IdentityService>,
}

impl IdentityResolver {
    pub fn new(mode: OperatingMode, service: Arc<dyn IdentityService>) -> Self {
        Self { mode, service }
    }

    pub async fn resolve(&self, sender_id: &str) -> BotResult<String> {
        if self.mode.is_local() {
            return Ok(LOCAL_IDENTITY.to_string());
        }

        self.service
            .display_name(sender_id)
            .await
            .map_err(BotError::IdentityResolution)
    }
}
