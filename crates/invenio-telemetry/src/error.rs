//! Error types for telemetry operations.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised by telemetry helpers.
#[derive(Debug)]
pub enum TelemetryError {
    /// Installing the tracing subscriber failed.
    SubscriberInstall {
        /// Underlying tracing subscriber error.
        source: tracing_subscriber::util::TryInitError,
    },
    /// A log format name was not recognised.
    InvalidLogFormat {
        /// Value supplied by the caller.
        value: String,
    },
    /// A warning action name was not recognised.
    InvalidWarningAction {
        /// Value supplied by the caller.
        value: String,
    },
    /// A deprecation notice was raised while warnings are configured as errors.
    DeprecationDenied {
        /// The deprecation notice that was escalated.
        message: String,
    },
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubscriberInstall { .. } => {
                formatter.write_str("failed to install tracing subscriber")
            }
            Self::InvalidLogFormat { .. } => formatter.write_str("invalid log format"),
            Self::InvalidWarningAction { .. } => formatter.write_str("invalid warning action"),
            Self::DeprecationDenied { .. } => {
                formatter.write_str("deprecation notice escalated to error")
            }
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SubscriberInstall { source } => Some(source),
            Self::InvalidLogFormat { .. }
            | Self::InvalidWarningAction { .. }
            | Self::DeprecationDenied { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;
    use tracing_subscriber::util::SubscriberInitExt;

    fn try_init_error()
    -> std::result::Result<tracing_subscriber::util::TryInitError, Box<dyn Error>> {
        match tracing_subscriber::registry().try_init() {
            Ok(()) => match tracing_subscriber::registry().try_init() {
                Ok(()) => Err(io::Error::other("expected init error").into()),
                Err(err) => Ok(err),
            },
            Err(err) => Ok(err),
        }
    }

    #[test]
    fn telemetry_error_display_and_source() -> std::result::Result<(), Box<dyn Error>> {
        let install = TelemetryError::SubscriberInstall {
            source: try_init_error()?,
        };
        assert_eq!(install.to_string(), "failed to install tracing subscriber");
        assert!(install.source().is_some());

        let cases = vec![
            (
                TelemetryError::InvalidLogFormat {
                    value: "xml".to_string(),
                },
                "invalid log format",
            ),
            (
                TelemetryError::InvalidWarningAction {
                    value: "loud".to_string(),
                },
                "invalid warning action",
            ),
            (
                TelemetryError::DeprecationDenied {
                    message: "BROKER_URL is deprecated".to_string(),
                },
                "deprecation notice escalated to error",
            ),
        ];

        for (err, message) in cases {
            assert_eq!(err.to_string(), message);
            assert!(err.source().is_none());
        }
        Ok(())
    }
}
