//! Configuration loading stages.
//!
//! # Design
//! - Providers are registered explicitly; nothing is discovered at runtime.
//! - Stage order is fixed: modules, instance file, environment, overrides, defaults.
//!   Explicit overrides therefore beat the environment, and defaults only fill gaps.
//! - Missing instance files are skipped; unreadable or malformed ones are errors.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::defaults::{DEBUG, DEFAULT_SECRET_KEY, DEFAULT_SERVER_BIND, SECRET_KEY, SERVER_BIND};
use crate::env::Environment;
use crate::error::{ConfigError, ConfigResult};
use crate::mapping::{ConfigMap, ConfigSource, ConfigValues};
use crate::validate::{is_config_key, parse_literal};

/// Prefix shared by every environment variable the loader consumes.
pub const ENV_PREFIX: &str = "INVENIO_";
/// File name looked up inside the instance folder.
pub const INSTANCE_CONFIG_FILE: &str = "invenio.cfg";

/// A named source of configuration values contributed by an installed package.
pub trait ConfigProvider: Send + Sync {
    /// Identifier recorded as the provenance of every value the provider sets.
    fn name(&self) -> &str;

    /// Produce the provider's settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot produce its values.
    fn load(&self) -> ConfigResult<ConfigValues>;
}

/// Provider backed by an in-memory set of values.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    name: String,
    values: ConfigValues,
}

impl StaticProvider {
    /// Create an empty provider called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: ConfigValues::new(),
        }
    }

    /// Add a setting.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }
}

impl ConfigProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> ConfigResult<ConfigValues> {
        Ok(self.values.clone())
    }
}

/// Provider that reads a TOML file shipped alongside a package.
#[derive(Debug, Clone)]
pub struct FileProvider {
    name: String,
    path: PathBuf,
}

impl FileProvider {
    /// Create a provider called `name` reading `path`.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl ConfigProvider for FileProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> ConfigResult<ConfigValues> {
        let text = fs::read_to_string(&self.path).map_err(|source| ConfigError::FileRead {
            path: self.path.clone(),
            source,
        })?;
        parse_toml(&self.path, &text)
    }
}

/// Runs every stage against one configuration mapping.
pub struct ConfigLoader<'a> {
    providers: &'a [Box<dyn ConfigProvider>],
    instance_path: &'a Path,
    environment: &'a Environment,
}

impl<'a> ConfigLoader<'a> {
    /// Bind the loader to its inputs.
    #[must_use]
    pub const fn new(
        providers: &'a [Box<dyn ConfigProvider>],
        instance_path: &'a Path,
        environment: &'a Environment,
    ) -> Self {
        Self {
            providers,
            instance_path,
            environment,
        }
    }

    /// Apply all stages in order to `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider fails, the instance file cannot be read or parsed,
    /// or an override is not a setting name.
    pub fn load_into(&self, config: &mut ConfigMap, overrides: ConfigValues) -> ConfigResult<()> {
        apply_modules(config, self.providers)?;
        let instance_file = apply_instance_folder(config, self.instance_path)?;
        let from_env = apply_environment(config, self.environment, ENV_PREFIX);
        let override_count = overrides.len();
        apply_overrides(config, overrides)?;
        let defaulted = apply_defaults(config);
        info!(
            providers = self.providers.len(),
            instance_file = ?instance_file,
            from_env,
            overrides = override_count,
            defaulted,
            keys = config.len(),
            "configuration loaded"
        );
        Ok(())
    }
}

/// Merge every provider's settings in registration order.
///
/// # Errors
///
/// Returns the first provider error unchanged.
pub fn apply_modules(
    config: &mut ConfigMap,
    providers: &[Box<dyn ConfigProvider>],
) -> ConfigResult<()> {
    for provider in providers {
        let values = provider.load()?;
        let source = ConfigSource::Module(provider.name().to_string());
        config.update(settings_only(values, provider.name()), &source);
    }
    Ok(())
}

/// Merge `<instance_path>/invenio.cfg` when it exists. Returns the file that was read.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is not valid TOML.
pub fn apply_instance_folder(
    config: &mut ConfigMap,
    instance_path: &Path,
) -> ConfigResult<Option<PathBuf>> {
    let path = instance_path.join(INSTANCE_CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::IsADirectory | io::ErrorKind::NotADirectory
            ) =>
        {
            debug!(path = %path.display(), "no instance configuration file");
            return Ok(None);
        }
        Err(source) => return Err(ConfigError::FileRead { path, source }),
    };
    let values = parse_toml(&path, &text)?;
    config.update(settings_only(values, "instance"), &ConfigSource::InstanceFile);
    Ok(Some(path))
}

/// Set a key for every `<prefix><KEY>` variable. Returns the number of keys set.
pub fn apply_environment(config: &mut ConfigMap, environment: &Environment, prefix: &str) -> usize {
    let mut count = 0;
    for (key, raw) in environment.with_prefix(prefix) {
        config.insert(key, parse_literal(raw), ConfigSource::Environment);
        count += 1;
    }
    count
}

/// Write the caller's explicit values.
///
/// Nothing is written unless every key is a setting name.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for the first key that is not an upper-case setting name.
pub fn apply_overrides(config: &mut ConfigMap, overrides: ConfigValues) -> ConfigResult<()> {
    if let Some(key) = overrides.keys().find(|key| !is_config_key(key)) {
        return Err(ConfigError::InvalidValue {
            key: key.clone(),
            reason: "not_a_setting_name",
            value: None,
        });
    }
    config.update(overrides, &ConfigSource::Override);
    Ok(())
}

/// Fill framework defaults for absent keys. Returns the number of keys filled.
pub fn apply_defaults(config: &mut ConfigMap) -> usize {
    let mut filled = 0;
    if config.set_default(SECRET_KEY, Value::from(DEFAULT_SECRET_KEY)) {
        warn!("SECRET_KEY is not configured; using an insecure placeholder");
        filled += 1;
    }
    for (key, value) in [
        (DEBUG, Value::Bool(false)),
        (SERVER_BIND, Value::from(DEFAULT_SERVER_BIND)),
    ] {
        if config.set_default(key, value) {
            filled += 1;
        }
    }
    filled
}

fn parse_toml(path: &Path, text: &str) -> ConfigResult<ConfigValues> {
    toml::from_str(text).map_err(|source| ConfigError::FileParse {
        path: path.to_path_buf(),
        source,
    })
}

fn settings_only(values: ConfigValues, origin: &str) -> ConfigValues {
    values
        .into_iter()
        .filter(|(key, _)| {
            let keep = is_config_key(key);
            if !keep {
                debug!(origin, key = %key, "ignoring non-setting key");
            }
            keep
        })
        .collect()
}
