//! Formation engine settings.

use std::env;
use std::str::FromStr;

use super::ConfigError;

/// How concurrent mutations on the same group are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdmissionMode {
    /// Each group's mutations run one at a time behind a per-group lock.
    #[default]
    Serialized,
    /// No lock. Insert, validate and compensate as separate store calls, so
    /// two joiners racing for the last slot can both pass validation.
    Optimistic,
}

impl FromStr for AdmissionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serialized" => Ok(AdmissionMode::Serialized),
            "optimistic" => Ok(AdmissionMode::Optimistic),
            other => Err(ConfigError::InvalidVar {
                name: "LFG_ADMISSION_MODE",
                detail: format!("expected serialized | optimistic, got '{other}'"),
            }),
        }
    }
}

pub const DEFAULT_MATCHABLE_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormationConfig {
    pub admission_mode: AdmissionMode,
    /// Fixed seed for Flex resolution. `None` seeds from the OS.
    pub flex_seed: Option<u64>,
    /// Default page size for matchable-group listings.
    pub matchable_limit: usize,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            admission_mode: AdmissionMode::default(),
            flex_seed: None,
            matchable_limit: DEFAULT_MATCHABLE_LIMIT,
        }
    }
}

impl FormationConfig {
    /// Read `LFG_ADMISSION_MODE`, `LFG_FLEX_SEED` and `LFG_MATCHABLE_LIMIT`.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("LFG_ADMISSION_MODE") {
            config.admission_mode = raw.parse()?;
        }
        if let Ok(raw) = env::var("LFG_FLEX_SEED") {
            let seed = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidVar {
                name: "LFG_FLEX_SEED",
                detail: e.to_string(),
            })?;
            config.flex_seed = Some(seed);
        }
        if let Ok(raw) = env::var("LFG_MATCHABLE_LIMIT") {
            let limit = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidVar {
                    name: "LFG_MATCHABLE_LIMIT",
                    detail: format!("expected a positive integer, got '{raw}'"),
                })?;
            config.matchable_limit = limit;
        }

        Ok(config)
    }

    pub fn with_mode(mut self, mode: AdmissionMode) -> Self {
        self.admission_mode = mode;
        self
    }

    pub fn with_flex_seed(mut self, seed: u64) -> Self {
        self.flex_seed = Some(seed);
        self
    }
}
