//! Built-in extensions wired by the factory.
//!
//! Layout: `cli.rs` (command group registry), `tasks.rs` (task-queue settings),
//! `theme.rs` (site theme and its bundles), `assets.rs` (bundle environment).

mod assets;
mod cli;
mod tasks;
mod theme;

pub use assets::{AssetEnvironment, AssetsExtension, Bundle};
pub use cli::{CliExtension, CommandGroup, CommandRegistry};
pub use tasks::{DEFAULT_BROKER_URL, TaskQueueExtension, TaskQueueSettings};
pub use theme::{THEME_CSS_BUNDLE, THEME_JS_BUNDLE, ThemeExtension, ThemeSettings};

use invenio_config::ConfigMap;

use crate::error::{AppError, AppResult};

/// Read `key` as a string, rejecting values of any other type.
pub(crate) fn string_setting<'a>(
    config: &'a ConfigMap,
    key: &'static str,
) -> AppResult<Option<&'a str>> {
    match config.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(value)) => Ok(Some(value.as_str())),
        Some(other) => Err(AppError::InvalidConfig {
            field: key,
            reason: "not_a_string",
            value: Some(other.to_string()),
        }),
    }
}
