//! Instance and static folder resolution.
//!
//! Each path follows the same chain: explicit argument, then a prefixed
//! environment variable, then a computed default. Empty values count as unset.

use std::fs;
use std::path::{Path, PathBuf};

use invenio_config::Environment;
use tracing::debug;

use crate::application::APP_NAME;

/// Environment variable overriding the instance path.
pub const INSTANCE_PATH_ENV: &str = "INVENIO_INSTANCE_PATH";
/// Environment variable overriding the static folder.
pub const STATIC_FOLDER_ENV: &str = "INVENIO_STATIC_FOLDER";

/// Installation prefix of the running binary.
///
/// The binary is expected at `<prefix>/bin/<name>`; when that layout cannot be
/// determined the current directory is used.
#[must_use]
pub fn system_prefix() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent()?.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve the instance path.
///
/// Default: `<prefix>/var/invenio-instance`.
#[must_use]
pub fn resolve_instance_path(
    explicit: Option<&Path>,
    environment: &Environment,
    prefix: &Path,
) -> PathBuf {
    non_empty(explicit)
        .map(Path::to_path_buf)
        .or_else(|| environment.non_empty(INSTANCE_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| prefix.join("var").join(format!("{APP_NAME}-instance")))
}

/// Resolve the static folder.
///
/// Default: `<instance_path>/static`.
#[must_use]
pub fn resolve_static_folder(
    explicit: Option<&Path>,
    environment: &Environment,
    instance_path: &Path,
) -> PathBuf {
    non_empty(explicit)
        .map(Path::to_path_buf)
        .or_else(|| environment.non_empty(STATIC_FOLDER_ENV).map(PathBuf::from))
        .unwrap_or_else(|| instance_path.join("static"))
}

/// Create the instance directory if it is missing.
///
/// Failures are not reported to the caller: an existing directory and a
/// permission error are treated alike. Returns whether the directory exists
/// afterwards.
pub fn ensure_instance_dir(path: &Path) -> bool {
    if let Err(err) = fs::create_dir_all(path) {
        debug!(path = %path.display(), error = %err, "instance directory not created");
    }
    path.is_dir()
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|path| !path.as_os_str().is_empty())
}
