//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (e.g., ChatTransport, TickerSource).

pub mod console;
pub mod matrix;
pub mod process;
pub mod ticker;
