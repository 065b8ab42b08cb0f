//! # Interface Layer
//!
//! User-facing admin commands, registered into the command registry at startup.

pub mod commands;
