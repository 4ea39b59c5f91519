//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file could not be read.
    #[error("failed to read configuration file")]
    FileRead {
        /// File that could not be read.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// A configuration file was not valid TOML.
    #[error("failed to parse configuration file")]
    FileParse {
        /// File that failed to parse.
        path: PathBuf,
        /// Source TOML error.
        source: toml::de::Error,
    },
    /// A configuration value had the wrong shape.
    #[error("invalid configuration value")]
    InvalidValue {
        /// Key holding the offending value.
        key: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// A configuration provider failed to produce its values.
    #[error("configuration provider failed")]
    Provider {
        /// Name of the failing provider.
        provider: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn messages_stay_constant_and_sources_are_kept() {
        let read = ConfigError::FileRead {
            path: PathBuf::from("/srv/invenio.cfg"),
            source: io::Error::other("denied"),
        };
        assert_eq!(read.to_string(), "failed to read configuration file");
        assert!(read.source().is_some());

        let invalid = ConfigError::InvalidValue {
            key: "SERVER_BIND".to_string(),
            reason: "not_a_socket_addr",
            value: Some("nowhere".to_string()),
        };
        assert_eq!(invalid.to_string(), "invalid configuration value");
        assert!(invalid.source().is_none());
    }
}
