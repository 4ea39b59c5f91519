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

//! Invenio application factory.
//!
//! Layout: `factory.rs` (path resolution, config stages, extension wiring),
//! `application.rs` (the application object and the `Extension` seam),
//! `extensions/` (CLI, task queue, theme, assets), `http.rs` (static serving).

/// The application object and extension seam.
pub mod application;
/// Application-level error type.
pub mod error;
/// Built-in extensions attached by the factory.
pub mod extensions;
/// The application factory.
pub mod factory;
/// HTTP router and listener.
pub mod http;
/// Instance and static path resolution.
pub mod paths;

pub use application::{APP_NAME, Application, Extension};
pub use error::{AppError, AppResult};
pub use extensions::{
    AssetEnvironment, AssetsExtension, Bundle, CliExtension, CommandGroup, CommandRegistry,
    TaskQueueExtension, TaskQueueSettings, ThemeExtension, ThemeSettings,
};
pub use factory::{AppFactory, DEFAULT_STATIC_URL_PATH, create_app};
pub use http::bind_addr;
pub use paths::{
    INSTANCE_PATH_ENV, STATIC_FOLDER_ENV, ensure_instance_dir, resolve_instance_path,
    resolve_static_folder, system_prefix,
};
