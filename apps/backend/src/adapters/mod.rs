//! Adapters for external dependencies.

pub mod groups_sea;
pub mod members_sea;
pub mod memory;
pub mod sea_store;
