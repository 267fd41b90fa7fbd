//! # System Constants
//!
//! Step identifiers, environment variable names and retry defaults shared
//! across the processor.

/// Stable step names used in logs and persisted diagnostics
pub mod steps {
    pub const AVS_EVALUATION_REMOVAL: &str = "De-provision_AVS_Evaluations";
}

/// Default retry policy for steps delegating to external systems
pub mod retry {
    use std::time::Duration;

    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
    pub const DEFAULT_MAX_WINDOW: Duration = Duration::from_secs(10 * 60);
}

/// Environment variables read outside the layered configuration
pub mod env {
    pub const ENVIRONMENT: &str = "DEPROVISIONER_ENV";
    pub const LOG_FORMAT: &str = "DEPROVISIONER_LOG_FORMAT";
}
