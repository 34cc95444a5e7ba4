//! Environment-driven configuration.

use thiserror::Error;

pub mod db;
pub mod formation;
pub mod logging;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Required environment variable '{name}' is not set")]
    MissingVar { name: &'static str },
    #[error("Invalid value for '{name}': {detail}")]
    InvalidVar { name: &'static str, detail: String },
}
