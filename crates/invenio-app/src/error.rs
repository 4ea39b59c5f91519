//! # Design
//!
//! - Centralize application-level errors for bootstrap and extension wiring.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: invenio_config::ConfigError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: invenio_telemetry::TelemetryError,
    },
    /// An extension refused to initialise.
    #[error("extension initialisation failed")]
    Extension {
        /// Name of the failing extension.
        name: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Optional value associated with the failure.
        value: Option<String>,
    },
    /// IO operations failed.
    #[error("io operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Optional path involved in the failure.
        path: Option<PathBuf>,
        /// Source IO error.
        source: io::Error,
    },
    /// Configuration values were invalid.
    #[error("invalid configuration")]
    InvalidConfig {
        /// Setting that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Optional value associated with the failure.
        value: Option<String>,
    },
    /// Required extension state was missing.
    #[error("missing state")]
    MissingState {
        /// State that was missing.
        field: &'static str,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: invenio_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: invenio_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn io(
        operation: &'static str,
        path: Option<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn app_error_helpers_build_variants() {
        let config = AppError::config(
            "config.load",
            invenio_config::ConfigError::Provider {
                provider: "records".to_string(),
                reason: "unavailable",
            },
        );
        assert!(matches!(config, AppError::Config { .. }));
        assert!(config.source().is_some());

        let telemetry = AppError::telemetry(
            "task_queue.deprecation",
            invenio_telemetry::TelemetryError::DeprecationDenied {
                message: "BROKER_URL".to_string(),
            },
        );
        assert!(matches!(telemetry, AppError::Telemetry { .. }));

        let io = AppError::io(
            "assets.write_bundle",
            Some(PathBuf::from("static/gen/app.css")),
            io::Error::other("disk full"),
        );
        assert_eq!(io.to_string(), "io operation failed");
        assert!(io.source().is_some());
    }

    #[test]
    fn messages_do_not_interpolate_context() {
        let err = AppError::InvalidConfig {
            field: "SERVER_BIND",
            reason: "not_a_socket_addr",
            value: Some("nowhere".to_string()),
        };
        assert_eq!(err.to_string(), "invalid configuration");
    }
}
