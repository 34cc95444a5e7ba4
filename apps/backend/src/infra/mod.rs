//! Infrastructure layer - database, locking, and state wiring.

pub mod db;
pub mod db_errors;
pub mod group_locks;
pub mod state;
