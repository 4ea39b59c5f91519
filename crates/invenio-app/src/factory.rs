//! Application factory.
//!
//! # Design
//! - Straight-line construction: resolve paths, create the instance folder,
//!   load configuration, attach extensions, return the application.
//! - Inputs (environment, prefix, providers) are injected so construction is
//!   reproducible; [`create_app`] fills them from the running process.
//! - Warning routing is not touched here; callers configure it once at startup.

use std::path::PathBuf;

use invenio_config::{ConfigLoader, ConfigProvider, ConfigValues, Environment};
use serde_json::Value;
use tracing::info;

use crate::application::{Application, Extension};
use crate::error::{AppError, AppResult};
use crate::extensions::{
    AssetEnvironment, AssetsExtension, CliExtension, CommandRegistry, TaskQueueExtension,
    ThemeExtension,
};
use crate::paths::{
    ensure_instance_dir, resolve_instance_path, resolve_static_folder, system_prefix,
};

/// URL prefix static files are served under unless overridden.
pub const DEFAULT_STATIC_URL_PATH: &str = "/static/";

/// Build an application from the process environment with no overrides.
///
/// # Errors
///
/// Returns an error if configuration loading or any extension fails.
pub fn create_app() -> AppResult<Application> {
    AppFactory::new().create_app()
}

/// Inputs for one application construction.
pub struct AppFactory {
    instance_path: Option<PathBuf>,
    static_folder: Option<PathBuf>,
    static_url_path: String,
    overrides: ConfigValues,
    environment: Option<Environment>,
    system_prefix: Option<PathBuf>,
    providers: Vec<Box<dyn ConfigProvider>>,
    extensions: Vec<Box<dyn Extension>>,
}

impl Default for AppFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl AppFactory {
    /// Factory with every input left to its default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            instance_path: None,
            static_folder: None,
            static_url_path: DEFAULT_STATIC_URL_PATH.to_string(),
            overrides: ConfigValues::new(),
            environment: None,
            system_prefix: None,
            providers: Vec::new(),
            extensions: Vec::new(),
        }
    }

    /// Use `path` as the instance path.
    #[must_use]
    pub fn instance_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.instance_path = Some(path.into());
        self
    }

    /// Use `path` as the static folder.
    #[must_use]
    pub fn static_folder(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_folder = Some(path.into());
        self
    }

    /// Serve static files under `url_path`.
    #[must_use]
    pub fn static_url_path(mut self, url_path: impl Into<String>) -> Self {
        self.static_url_path = url_path.into();
        self
    }

    /// Set `key` explicitly; explicit values beat every other stage.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
        self.overrides.insert(key.into(), value);
        self
    }

    /// Set every pair in `values` explicitly.
    #[must_use]
    pub fn overrides(mut self, values: ConfigValues) -> Self {
        self.overrides.extend(values);
        self
    }

    /// Read variables from `environment` instead of the process.
    #[must_use]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Derive the default instance path from `prefix` instead of the binary location.
    #[must_use]
    pub fn system_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.system_prefix = Some(prefix.into());
        self
    }

    /// Register a configuration provider; providers apply in registration order.
    #[must_use]
    pub fn provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Attach `extension` after the built-in ones.
    #[must_use]
    pub fn extension(mut self, extension: impl Extension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    /// Construct the application.
    ///
    /// # Errors
    ///
    /// Returns an error if the static URL path is not rooted, configuration loading
    /// fails, or any extension refuses to initialise; the extension's error is
    /// returned unchanged.
    pub fn create_app(self) -> AppResult<Application> {
        let Self {
            instance_path,
            static_folder,
            static_url_path,
            overrides,
            environment,
            system_prefix: prefix,
            providers,
            mut extensions,
        } = self;
        check_static_url_path(&static_url_path)?;
        let environment = environment.unwrap_or_else(Environment::from_process);
        let prefix = prefix.unwrap_or_else(system_prefix);

        let instance_path = resolve_instance_path(instance_path.as_deref(), &environment, &prefix);
        let static_folder =
            resolve_static_folder(static_folder.as_deref(), &environment, &instance_path);
        let instance_ready = ensure_instance_dir(&instance_path);

        let mut app = Application::new(instance_path.clone(), static_folder, static_url_path);
        app.attach(&mut CliExtension)?;

        ConfigLoader::new(&providers, &instance_path, &environment)
            .load_into(app.config_mut(), overrides)
            .map_err(|err| AppError::config("config.load", err))?;

        app.attach(&mut TaskQueueExtension)?;

        let mut theme = ThemeExtension;
        app.attach(&mut theme)?;
        let mut assets = AssetsExtension;
        app.attach(&mut assets)?;
        let cli = app
            .state_mut::<CommandRegistry>()
            .ok_or(AppError::MissingState { field: "cli" })?;
        assets.init_cli(cli);
        let env = app
            .state_mut::<AssetEnvironment>()
            .ok_or(AppError::MissingState {
                field: "asset_environment",
            })?;
        theme.init_assets(env);

        for extension in &mut extensions {
            app.attach(extension.as_mut())?;
        }

        info!(
            instance_path = %app.instance_path().display(),
            instance_ready,
            static_folder = %app.static_folder().display(),
            static_url_path = app.static_url_path(),
            extensions = ?app.extensions(),
            "application created"
        );
        Ok(app)
    }
}

/// An empty path mounts static files at the root; anything else must start with `/`.
fn check_static_url_path(url_path: &str) -> AppResult<()> {
    if url_path.is_empty() || url_path.starts_with('/') {
        return Ok(());
    }
    Err(AppError::InvalidConfig {
        field: "static_url_path",
        reason: "missing_leading_slash",
        value: Some(url_path.to_string()),
    })
}
