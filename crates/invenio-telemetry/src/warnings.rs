//! Process-wide routing of deprecation notices into the tracing pipeline.
//!
//! # Design
//! - The action is chosen once per process; later calls observe the first choice.
//! - An explicit caller choice (the CLI `--warnings` flag) wins over the default.
//! - Notices are `warn` events under [`WARNINGS_TARGET`] so `RUST_LOG` can filter them.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Mutex;

use once_cell::sync::{Lazy, OnceCell};
use tracing::{debug, warn};

use crate::error::{Result, TelemetryError};

/// Tracing target used for every deprecation notice.
pub const WARNINGS_TARGET: &str = "invenio::warnings";

static ACTION: OnceCell<WarningAction> = OnceCell::new();
static SEEN: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// How deprecation notices are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarningAction {
    /// Log each distinct notice the first time it is raised.
    #[default]
    Default,
    /// Log every occurrence.
    Always,
    /// Drop notices silently.
    Ignore,
    /// Turn notices into errors.
    Error,
}

impl WarningAction {
    /// Render the action as its lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Always => "always",
            Self::Ignore => "ignore",
            Self::Error => "error",
        }
    }
}

impl FromStr for WarningAction {
    type Err = TelemetryError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "always" => Ok(Self::Always),
            "ignore" => Ok(Self::Ignore),
            "error" => Ok(Self::Error),
            _ => Err(TelemetryError::InvalidWarningAction {
                value: value.to_string(),
            }),
        }
    }
}

/// Fix the process-wide warning action.
///
/// Idempotent: the first call wins and every call returns the action in force.
/// `None` selects [`WarningAction::Default`].
pub fn configure_warnings(requested: Option<WarningAction>) -> WarningAction {
    let action = *ACTION.get_or_init(|| requested.unwrap_or_default());
    if let Some(requested) = requested.filter(|requested| *requested != action) {
        debug!(
            requested = requested.as_str(),
            active = action.as_str(),
            "warning action already configured"
        );
    }
    action
}

/// The action currently in force, `Default` when nothing was configured.
#[must_use]
pub fn warning_action() -> WarningAction {
    ACTION.get().copied().unwrap_or_default()
}

/// Raise a deprecation notice.
///
/// # Errors
///
/// Returns [`TelemetryError::DeprecationDenied`] when warnings are configured as errors.
pub fn deprecated(message: &str) -> Result<()> {
    deprecated_with(warning_action(), message)
}

/// Raise a deprecation notice under `action` instead of the process-wide one.
///
/// # Errors
///
/// Returns [`TelemetryError::DeprecationDenied`] when `action` is [`WarningAction::Error`].
pub fn deprecated_with(action: WarningAction, message: &str) -> Result<()> {
    emit(action, message, &SEEN).map(|_| ())
}

fn emit(action: WarningAction, message: &str, seen: &Mutex<HashSet<String>>) -> Result<bool> {
    match action {
        WarningAction::Ignore => Ok(false),
        WarningAction::Error => Err(TelemetryError::DeprecationDenied {
            message: message.to_string(),
        }),
        WarningAction::Always => {
            warn!(target: WARNINGS_TARGET, category = "deprecation", "{message}");
            Ok(true)
        }
        WarningAction::Default => {
            // A poisoned set only costs a duplicate line.
            let first = seen
                .lock()
                .map_or(true, |mut seen| seen.insert(message.to_string()));
            if first {
                warn!(target: WARNINGS_TARGET, category = "deprecation", "{message}");
            }
            Ok(first)
        }
    }
}
