//! # Retry Policy
//!
//! Bounded, fixed-interval retry window.
//!
//! Every failure charges one `interval` to the step's persisted elapsed time.
//! Once the charged time reaches `max_window` the failure is terminal. With the
//! defaults (10s / 10m) the 60th consecutive failure abandons the step, and a
//! step already at 9m55s is abandoned on its next failure.
//!
//! A policy can only be built through [`RetryPolicy::new`], which rejects a
//! zero interval (the window would never be reached) and a window shorter than
//! one interval.

use crate::config::{ConfigResult, ConfigurationError};
use crate::constants::retry;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetryPolicy {
    interval: Duration,
    max_window: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: retry::DEFAULT_INTERVAL,
            max_window: retry::DEFAULT_MAX_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Schedule the step again after the given delay
    RetryAfter(Duration),
    /// The retry window is spent
    Abandon,
}

impl RetryPolicy {
    pub fn new(interval: Duration, max_window: Duration) -> ConfigResult<Self> {
        if interval.is_zero() {
            return Err(ConfigurationError::invalid_value(
                "retry.interval_seconds",
                interval.as_secs().to_string(),
                "retry interval must be greater than zero",
            ));
        }
        if max_window < interval {
            return Err(ConfigurationError::invalid_value(
                "retry.max_window_seconds",
                max_window.as_secs().to_string(),
                format!(
                    "retry window must be at least the retry interval ({}s)",
                    interval.as_secs()
                ),
            ));
        }
        Ok(Self {
            interval,
            max_window,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_window(&self) -> Duration {
        self.max_window
    }

    /// Elapsed retry time after charging one more failure
    pub fn charge(&self, elapsed: Duration) -> Duration {
        elapsed.saturating_add(self.interval)
    }

    /// Classify a failure given the time already charged to the step
    pub fn decide(&self, elapsed: Duration) -> RetryDecision {
        if self.charge(elapsed) >= self.max_window {
            RetryDecision::Abandon
        } else {
            RetryDecision::RetryAfter(self.interval)
        }
    }
}
