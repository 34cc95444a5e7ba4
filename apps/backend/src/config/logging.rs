//! Log output settings for the simulator binary.

use std::env;
use std::str::FromStr;

use super::ConfigError;

/// Engine events at info, database chatter only when it goes wrong.
pub const DEFAULT_LOG_FILTER: &str = "info,lfg_backend=info,sqlx=warn,sea_orm=warn,migration=warn";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, for piping into other tools.
    #[default]
    Json,
    /// Multi-line human output with source locations.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(ConfigError::InvalidVar {
                name: "LFG_LOG_FORMAT",
                detail: format!("expected json | pretty, got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl LogConfig {
    /// Read `LFG_LOG_FORMAT` and `RUST_LOG`. A blank `RUST_LOG` counts as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(raw) = env::var("LFG_LOG_FORMAT") {
            config.format = raw.parse()?;
        }
        if let Ok(raw) = env::var("RUST_LOG") {
            if !raw.trim().is_empty() {
                config.filter = raw.trim().to_string();
            }
        }
        Ok(config)
    }
}
