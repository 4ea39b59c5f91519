//! Asset bundles and the `assets` command group.
//!
//! Bundles concatenate source files from `ASSETS_SOURCE_DIR` into `COLLECT_STATIC_ROOT`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::cli::{CommandGroup, CommandRegistry};
use super::string_setting;
use crate::application::{Application, Extension};
use crate::error::{AppError, AppResult};

const ASSETS_DEBUG: &str = "ASSETS_DEBUG";
const SOURCE_DIR: &str = "ASSETS_SOURCE_DIR";
const STATIC_ROOT: &str = "COLLECT_STATIC_ROOT";

/// A named set of source files concatenated into one output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bundle {
    /// Output path relative to the static root.
    pub output: String,
    /// Source paths relative to the source directory, in concatenation order.
    pub contents: Vec<String>,
}

impl Bundle {
    /// Create a bundle.
    #[must_use]
    pub fn new(output: impl Into<String>, contents: &[&str]) -> Self {
        Self {
            output: output.into(),
            contents: contents.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Registered bundles and the directories they are built between.
#[derive(Debug, Clone)]
pub struct AssetEnvironment {
    source_dir: PathBuf,
    output_dir: PathBuf,
    debug: bool,
    bundles: BTreeMap<String, Bundle>,
}

impl AssetEnvironment {
    /// Create an environment reading from `source_dir` and writing to `output_dir`.
    #[must_use]
    pub const fn new(source_dir: PathBuf, output_dir: PathBuf, debug: bool) -> Self {
        Self {
            source_dir,
            output_dir,
            debug,
            bundles: BTreeMap::new(),
        }
    }

    /// Register `bundle` under `name`, returning any bundle it replaced.
    pub fn register(&mut self, name: impl Into<String>, bundle: Bundle) -> Option<Bundle> {
        let name = name.into();
        let previous = self.bundles.insert(name.clone(), bundle);
        if previous.is_some() {
            warn!(bundle = %name, "asset bundle replaced");
        }
        previous
    }

    /// Bundle registered under `name`.
    #[must_use]
    pub fn bundle(&self, name: &str) -> Option<&Bundle> {
        self.bundles.get(name)
    }

    /// Registered bundles in name order.
    pub fn bundles(&self) -> impl Iterator<Item = (&str, &Bundle)> {
        self.bundles.iter().map(|(name, bundle)| (name.as_str(), bundle))
    }

    /// Number of registered bundles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Whether no bundles are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Directory bundle sources are read from.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Directory bundle outputs are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Whether bundles are served unconcatenated.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    /// Concatenate every bundle's sources into its output file.
    ///
    /// Returns the written files in bundle-name order.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or an output cannot be written.
    pub fn build(&self) -> AppResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.bundles.len());
        for (name, bundle) in &self.bundles {
            let mut joined = String::new();
            for source in &bundle.contents {
                let path = self.source_dir.join(source);
                let text = fs::read_to_string(&path)
                    .map_err(|err| AppError::io("assets.read_source", Some(path.clone()), err))?;
                joined.push_str(&text);
                if !joined.ends_with('\n') {
                    joined.push('\n');
                }
            }
            let output = self.output_dir.join(&bundle.output);
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent).map_err(|err| {
                    AppError::io("assets.create_output_dir", Some(parent.to_path_buf()), err)
                })?;
            }
            fs::write(&output, joined)
                .map_err(|err| AppError::io("assets.write_bundle", Some(output.clone()), err))?;
            info!(bundle = %name, output = %output.display(), "bundle built");
            written.push(output);
        }
        Ok(written)
    }
}

/// Asset bundling: publishes an [`AssetEnvironment`] and the `assets` command group.
#[derive(Debug, Default)]
pub struct AssetsExtension;

impl AssetsExtension {
    /// Register the `assets` command group.
    pub fn init_cli(&self, cli: &mut CommandRegistry) {
        cli.add_group(CommandGroup::new(
            "assets",
            "Inspect and build asset bundles",
            &["list", "build"],
        ));
    }
}

impl Extension for AssetsExtension {
    fn name(&self) -> &'static str {
        "assets"
    }

    fn init_app(&mut self, app: &mut Application) -> AppResult<()> {
        let debug = app.config().get_bool("DEBUG").unwrap_or(false);
        let source_default = app.instance_path().join("assets");
        let static_default = app.static_folder().to_path_buf();

        let config = app.config_mut();
        config.set_default(ASSETS_DEBUG, Value::Bool(debug));
        config.set_default(SOURCE_DIR, Value::from(source_default.to_string_lossy().as_ref()));
        config.set_default(STATIC_ROOT, Value::from(static_default.to_string_lossy().as_ref()));

        let config = app.config();
        let debug = match config.get(ASSETS_DEBUG) {
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                return Err(AppError::InvalidConfig {
                    field: ASSETS_DEBUG,
                    reason: "not_a_bool",
                    value: Some(other.to_string()),
                });
            }
            None => debug,
        };
        let source_dir = string_setting(config, SOURCE_DIR)?.map_or(source_default, PathBuf::from);
        let output_dir = string_setting(config, STATIC_ROOT)?.map_or(static_default, PathBuf::from);

        app.insert_state(AssetEnvironment::new(source_dir, output_dir, debug));
        Ok(())
    }
}
