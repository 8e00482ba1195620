//! Orchestrator configuration.
//!
//! Capacity and retention are deployment choices, not core invariants, so
//! they load from TOML and fall back to defaults:
//!
//! ```
//! use planforge_jobs::{OrchestratorConfig, OverflowPolicy};
//!
//! let config = OrchestratorConfig::from_toml_str(r#"
//!     max_active_jobs = 2
//!     overflow = "reject"
//!     max_completed_jobs = 8
//! "#).unwrap();
//!
//! assert_eq!(config.max_active_jobs, 2);
//! assert_eq!(config.overflow, OverflowPolicy::Reject);
//!
//! // Proceeds with defaults if the file doesn't exist
//! let config = OrchestratorConfig::load("orchestrator.toml").unwrap_or_default();
//! assert_eq!(config.overflow, OverflowPolicy::Queue);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// What `submit` does when every worker slot is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Accept the job; it stays `Scheduled` in a FIFO queue until a slot
    /// frees up.
    Queue,
    /// Fail the submission with `Overloaded` so the caller can retry.
    Reject,
}

/// Tuning knobs for [`JobOrchestrator`](crate::JobOrchestrator).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Maximum number of concurrently solving jobs.
    pub max_active_jobs: usize,
    /// Behaviour when `max_active_jobs` is reached.
    pub overflow: OverflowPolicy,
    /// Retain at most this many completed jobs, evicting oldest first.
    /// `None` keeps everything for the process lifetime.
    pub max_completed_jobs: Option<usize>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_active_jobs: 4,
            overflow: OverflowPolicy::Queue,
            max_completed_jobs: None,
        }
    }
}

impl OrchestratorConfig {
    /// Parses a configuration from a TOML string.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.max_active_jobs, 4);
        assert_eq!(config.overflow, OverflowPolicy::Queue);
        assert_eq!(config.max_completed_jobs, None);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = OrchestratorConfig::from_toml_str("max_active_jobs = 1").unwrap();
        assert_eq!(config.max_active_jobs, 1);
        assert_eq!(config.overflow, OverflowPolicy::Queue);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(OrchestratorConfig::from_toml_str("overflow = \"drop\"").is_err());
    }
}
