//! CLI error type and application construction from global flags.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use anyhow::anyhow;
use invenio_app::{AppError, AppFactory, Application};
use invenio_config::{ConfigValues, is_config_key, parse_literal};
use serde_json::Value;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<AppError> for CliError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::InvalidConfig {
                field,
                reason,
                value,
            } => {
                let shown = value.map_or_else(String::new, |value| format!(" (got {value})"));
                Self::validation(format!("invalid setting {field}: {reason}{shown}"))
            }
            other => Self::failure(other),
        }
    }
}

/// Factory inputs gathered from the global flags.
#[derive(Debug, Clone, Default)]
pub(crate) struct AppOptions {
    pub(crate) instance_path: Option<PathBuf>,
    pub(crate) static_folder: Option<PathBuf>,
    pub(crate) static_url_path: Option<String>,
    pub(crate) overrides: Vec<(String, Value)>,
}

impl AppOptions {
    pub(crate) fn factory(&self) -> AppFactory {
        let mut factory = AppFactory::new();
        if let Some(path) = &self.instance_path {
            factory = factory.instance_path(path);
        }
        if let Some(path) = &self.static_folder {
            factory = factory.static_folder(path);
        }
        if let Some(url_path) = &self.static_url_path {
            factory = factory.static_url_path(url_path);
        }
        factory.overrides(self.overrides.iter().cloned().collect::<ConfigValues>())
    }

    pub(crate) fn build(&self) -> CliResult<Application> {
        self.factory().create_app().map_err(CliError::from)
    }
}

/// Parse a `KEY=VALUE` override; the value is read as a literal.
pub(crate) fn parse_override(input: &str) -> Result<(String, Value), String> {
    let (key, raw) = input
        .split_once('=')
        .ok_or_else(|| format!("override '{input}' must be KEY=VALUE"))?;
    let key = key.trim();
    if !is_config_key(key) {
        return Err(format!("'{key}' is not an uppercase setting name"));
    }
    Ok((key.to_string(), parse_literal(raw)))
}

pub(crate) fn missing_group(group: &str) -> CliError {
    CliError::failure(anyhow!("command group '{group}' is not registered"))
}
