//! # Errors
//!
//! Error taxonomy for the command core. Everything except `InvalidCredentials`
//! is contained by the component that detects it.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BotError {
    #[error("command `{0}` is already registered")]
    AlreadyExists(String),

    #[error("could not resolve identity: {0}")]
    IdentityResolution(String),

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("handler failed: {0}")]
    HandlerFailed(String),

    #[error("failed to send message: {0}")]
    Send(String),

    #[error("invalid credentials")]
    InvalidCredentials,
}

pub type BotResult<T> = Result<T, BotError>;
