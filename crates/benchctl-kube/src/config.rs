//! Reconciler tuning: poll budgets and conflict retry
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```yaml
//! poll:
//!   maxAttempts: 50
//!   interval: 10s
//! conflictRetry:
//!   maxAttempts: 5
//!   delay: 10ms
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{KubeError, Result};

/// Reconciler configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconcileConfig {
    /// Readiness and deletion polling
    pub poll: PollConfig,

    /// Optimistic-concurrency retry for updates
    pub conflict_retry: ConflictRetry,
}

impl ReconcileConfig {
    /// Parse from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.poll.max_attempts == 0 {
            return Err(KubeError::InvalidConfig(
                "poll.maxAttempts must be at least 1".to_string(),
            ));
        }
        if self.conflict_retry.max_attempts == 0 {
            return Err(KubeError::InvalidConfig(
                "conflictRetry.maxAttempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fixed-delay polling budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollConfig {
    /// Attempts for readiness checks; deletion confirmation gets twice as many
    pub max_attempts: u32,

    /// Delay between attempts
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            interval: Duration::from_secs(10),
        }
    }
}

impl PollConfig {
    /// Attempt budget for deletion confirmation
    pub fn deletion_attempts(&self) -> u32 {
        self.max_attempts.saturating_mul(2)
    }
}

/// Bounded retry for conflicting updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConflictRetry {
    pub max_attempts: u32,

    #[serde(with = "humantime_serde")]
    pub delay: Duration,
}

impl Default for ConflictRetry {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(10),
        }
    }
}
