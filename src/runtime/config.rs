//! Runtime configuration.
//!
//! The only tunable is how often the state store sweeps entries of destroyed actors. A
//! [`Config`] can be built in code, deserialized from an application's own configuration
//! file (every field has a default), or read from the environment.

use crate::framework::store;
use serde::Deserialize;
use std::env::{self, VarError};

/// Environment variable read by [`Config::from_env`].
pub const SWEEP_THRESHOLD_VAR: &str = "STATE_MANAGED_SWEEP_THRESHOLD";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Insertions into the state store between automatic sweeps.
    pub sweep_threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep_threshold: store::DEFAULT_SWEEP_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("{var} is not valid unicode")]
    NotUnicode { var: &'static str },
}

impl Config {
    /// Defaults, overridden by `STATE_MANAGED_SWEEP_THRESHOLD` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(SWEEP_THRESHOLD_VAR) {
            Ok(raw) => Self::from_threshold_str(&raw),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode {
                var: SWEEP_THRESHOLD_VAR,
            }),
        }
    }

    fn from_threshold_str(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().parse::<usize>() {
            Ok(sweep_threshold) if sweep_threshold > 0 => Ok(Self { sweep_threshold }),
            _ => Err(ConfigError::InvalidValue {
                var: SWEEP_THRESHOLD_VAR,
                value: raw.to_string(),
            }),
        }
    }
}

/// Applies `config` to the calling thread's registries.
pub fn configure(config: &Config) {
    store::set_sweep_threshold(config.sweep_threshold);
    tracing::debug!(sweep_threshold = config.sweep_threshold, "Configured");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_parsing() {
        assert_eq!(
            Config::from_threshold_str(" 16 ").unwrap(),
            Config { sweep_threshold: 16 }
        );
        assert!(matches!(
            Config::from_threshold_str("0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(Config::from_threshold_str("many").is_err());
    }

    #[test]
    fn test_configure_applies_to_current_thread() {
        configure(&Config { sweep_threshold: 3 });
        assert_eq!(store::sweep_threshold(), 3);
    }
}
