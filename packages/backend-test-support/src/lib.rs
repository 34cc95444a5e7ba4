//! Backend test support utilities
//!
//! Shared helpers for the backend integration suites: unified logging
//! initialization and unique player-id generation.

pub mod logging;
pub mod players;
