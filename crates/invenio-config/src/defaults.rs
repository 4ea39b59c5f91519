//! Fallback values applied by the defaults stage.
//!
//! # Design
//! - Defaults only fill gaps; they never replace a key set by an earlier stage.
//! - Keep the insecure secret explicit so it can be detected and reported.

/// Placeholder secret used when nothing else configured `SECRET_KEY`.
pub const DEFAULT_SECRET_KEY: &str = "CHANGE_ME";
/// Listener address used by `invenio run` when `SERVER_BIND` is absent.
pub const DEFAULT_SERVER_BIND: &str = "127.0.0.1:5000";

/// Key holding the session signing secret.
pub(crate) const SECRET_KEY: &str = "SECRET_KEY";
/// Key toggling debug behaviour.
pub(crate) const DEBUG: &str = "DEBUG";
/// Key holding the HTTP listener address.
pub(crate) const SERVER_BIND: &str = "SERVER_BIND";
