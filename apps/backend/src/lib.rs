#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod entities;
pub mod errors;
pub mod infra;
pub mod repos;
pub mod services;
pub mod state;

// Re-exports for public API
pub use adapters::memory::{InMemoryGroupStore, StoreOp};
pub use adapters::sea_store::SeaGroupStore;
pub use config::db::{db_url, DbProfile};
pub use config::formation::{AdmissionMode, FormationConfig};
pub use config::ConfigError;
pub use errors::{DomainError, ErrorCode};
pub use infra::db::{bootstrap_db, connect_db, BootstrapError};
pub use infra::state::build_state;
pub use repos::groups::GroupStore;
pub use services::formation::{CompletionCheck, FormationService, LeaveOutcome};
pub use services::matching::{JoinOutcome, MatchingCoordinator, QueueOutcome};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
