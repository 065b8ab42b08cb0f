//! # Message Classifier
//!
//! Decides whether a chat message is an admin command. Only admin commands are
//! routed any further; ordinary conversation is dropped.

use crate::domain::types::Message;

pub const SENTINEL: char = '!';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// `name` has the sentinel stripped. `arg_text` is the full original text,
    /// command token included, so handlers can re-split it.
    AdminCommand { name: String, arg_text: String },
    Ordinary,
}

pub fn classify(message: &Message) -> Classification {
    let text = &message.text;
    if !text.starts_with(SENTINEL) {
        return Classification::Ordinary;
    }

    let first = text.split_whitespace().next().unwrap_or_default();
    let name = first.strip_prefix(SENTINEL).unwrap_or(first);

    Classification::AdminCommand {
        name: name.to_string(),
        arg_text: text.clone(),
    }
}
