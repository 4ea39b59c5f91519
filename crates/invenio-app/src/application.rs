//! The application object handed back by the factory.
//!
//! # Design
//! - Paths are fixed at construction; configuration and extension state stay mutable
//!   so extensions can contribute during initialisation.
//! - Extension state lives in a typed registry keyed by Rust type.

use std::path::{Path, PathBuf};

use axum::http::Extensions;
use invenio_config::ConfigMap;

use crate::error::AppResult;

/// Name of the application; used for the default instance folder.
pub const APP_NAME: &str = "invenio";

/// A self-contained unit that augments the application during construction.
pub trait Extension: Send {
    /// Stable identifier recorded on the application once attached.
    fn name(&self) -> &'static str;

    /// Contribute configuration, state, or commands to `app`.
    ///
    /// # Errors
    ///
    /// Any error aborts application construction and is returned to the caller unchanged.
    fn init_app(&mut self, app: &mut Application) -> AppResult<()>;
}

/// A configured application instance.
#[derive(Debug)]
pub struct Application {
    instance_path: PathBuf,
    static_folder: PathBuf,
    static_url_path: String,
    config: ConfigMap,
    attached: Vec<&'static str>,
    state: Extensions,
}

impl Application {
    pub(crate) fn new(
        instance_path: PathBuf,
        static_folder: PathBuf,
        static_url_path: String,
    ) -> Self {
        Self {
            instance_path,
            static_folder,
            static_url_path,
            config: ConfigMap::new(),
            attached: Vec::new(),
            state: Extensions::new(),
        }
    }

    /// Application name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        APP_NAME
    }

    /// Directory holding deployment-specific files.
    #[must_use]
    pub fn instance_path(&self) -> &Path {
        &self.instance_path
    }

    /// Directory static files are served from.
    #[must_use]
    pub fn static_folder(&self) -> &Path {
        &self.static_folder
    }

    /// URL prefix static files are served under.
    #[must_use]
    pub fn static_url_path(&self) -> &str {
        &self.static_url_path
    }

    /// The configuration mapping.
    #[must_use]
    pub const fn config(&self) -> &ConfigMap {
        &self.config
    }

    /// Mutable access to the configuration mapping.
    pub const fn config_mut(&mut self) -> &mut ConfigMap {
        &mut self.config
    }

    /// Names of attached extensions, in attach order.
    #[must_use]
    pub fn extensions(&self) -> &[&'static str] {
        &self.attached
    }

    /// Whether an extension called `name` is attached.
    #[must_use]
    pub fn has_extension(&self, name: &str) -> bool {
        self.attached.contains(&name)
    }

    /// State published by an extension.
    #[must_use]
    pub fn state<T: Clone + Send + Sync + 'static>(&self) -> Option<&T> {
        self.state.get::<T>()
    }

    /// Mutable state published by an extension.
    pub fn state_mut<T: Clone + Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.state.get_mut::<T>()
    }

    /// Publish extension state, returning any previous value of the same type.
    pub fn insert_state<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.state.insert(value)
    }

    /// Run `extension.init_app` and record it as attached.
    pub(crate) fn attach(&mut self, extension: &mut dyn Extension) -> AppResult<()> {
        extension.init_app(self)?;
        self.attached.push(extension.name());
        tracing::debug!(extension = extension.name(), "extension attached");
        Ok(())
    }
}
