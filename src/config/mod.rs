//! # Deprovisioner Configuration
//!
//! Typed configuration for the step processor. Values are layered by
//! [`ConfigManager`]: built-in defaults, then an optional file, then
//! `DEPROVISIONER__*` environment variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use deprovisioner_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let policy = manager.config().retry.policy()?;
//! println!("retrying every {:?} for at most {:?}", policy.interval(), policy.max_window());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use crate::constants::retry;
use crate::orchestration::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeprovisionerConfig {
    /// Retry window applied by steps that delegate to external systems
    pub retry: RetryConfig,

    /// AVS evaluation settings
    pub avs: AvsConfig,

    /// Console logging settings
    pub logging: LoggingConfig,
}

impl DeprovisionerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.retry.validate()
    }
}

/// Retry interval and maximum retry window, in seconds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    pub interval_seconds: u64,
    pub max_window_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            interval_seconds: retry::DEFAULT_INTERVAL.as_secs(),
            max_window_seconds: retry::DEFAULT_MAX_WINDOW.as_secs(),
        }
    }
}

impl RetryConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn max_window(&self) -> Duration {
        Duration::from_secs(self.max_window_seconds)
    }

    pub fn policy(&self) -> ConfigResult<RetryPolicy> {
        RetryPolicy::new(self.interval(), self.max_window())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.policy().map(|_| ())
    }
}

/// Parent (composite) evaluations the per-environment evaluations hang off
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AvsConfig {
    pub internal_parent_id: i64,
    pub external_parent_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
