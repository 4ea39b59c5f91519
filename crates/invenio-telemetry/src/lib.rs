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

//! Telemetry primitives shared across the Invenio workspace.
//!
//! This crate centralises logging install, process-wide warning routing, and
//! request-id middleware so the factory, the HTTP surface, and the CLI report
//! through the same tracing pipeline.
//!
//! Layout: `init.rs` (subscriber install), `warnings.rs` (deprecation routing),
//! `layers.rs` (request-id layers), `error.rs` (error types).

pub mod error;
pub mod init;
pub mod layers;
pub mod warnings;

pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
pub use layers::{propagate_request_id_layer, set_request_id_layer};
pub use warnings::{
    WARNINGS_TARGET, WarningAction, configure_warnings, deprecated, deprecated_with,
    warning_action,
};
