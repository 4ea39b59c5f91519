#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Layered configuration loading for Invenio applications.
//!
//! Layout: `mapping.rs` (the mutable configuration store and provenance),
//! `env.rs` (environment snapshots), `validate.rs` (key rules and literal parsing),
//! `loader.rs` (the loading stages and `ConfigProvider` registry).

pub mod defaults;
pub mod env;
pub mod error;
pub mod loader;
pub mod mapping;
pub mod validate;

pub use defaults::{DEFAULT_SECRET_KEY, DEFAULT_SERVER_BIND};
pub use env::Environment;
pub use error::{ConfigError, ConfigResult};
pub use loader::{
    ConfigLoader, ConfigProvider, ENV_PREFIX, FileProvider, INSTANCE_CONFIG_FILE, StaticProvider,
    apply_defaults, apply_environment, apply_instance_folder, apply_modules, apply_overrides,
};
pub use mapping::{ConfigEntry, ConfigMap, ConfigSource, ConfigValues};
pub use validate::{is_config_key, parse_literal};
