//! # Application Layer
//!
//! Contains the core logic and orchestration of the bot: the command registry,
//! message classification, dispatch, the event loop and outbound messaging.

pub mod classifier;
pub mod dispatcher;
pub mod event_loop;
pub mod identity;
pub mod logging;
pub mod messenger;
pub mod rebuild_lock;
pub mod registry;
pub mod version;
