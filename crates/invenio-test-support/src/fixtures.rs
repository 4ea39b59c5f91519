//! Filesystem fixtures for bootstrapping tests.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Temporary directory standing in for an installation prefix.
///
/// The directory is removed when the fixture is dropped.
pub struct ScratchPrefix {
    root: TempDir,
}

impl ScratchPrefix {
    /// Create a fresh, empty prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        let root = tempfile::Builder::new()
            .prefix("invenio-prefix-")
            .tempdir()
            .context("failed to create scratch prefix")?;
        Ok(Self { root })
    }

    /// Root of the prefix.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Instance path the factory derives when nothing overrides it.
    #[must_use]
    pub fn default_instance_path(&self) -> PathBuf {
        self.root.path().join("var").join("invenio-instance")
    }

    /// A directory path inside the prefix that does not exist yet.
    #[must_use]
    pub fn child(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Create `dir` and write `invenio.cfg` into it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn write_instance_config(&self, dir: &Path, contents: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join("invenio.cfg");
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write `contents` to `relative` under the prefix, creating parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_file(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// A path whose parent is a regular file, so it can never be created.
    ///
    /// Works regardless of the privileges the tests run with.
    ///
    /// # Errors
    ///
    /// Returns an error if the blocking file cannot be written.
    pub fn uncreatable_path(&self) -> Result<PathBuf> {
        let blocker = self.write_file("blocker", "not a directory")?;
        Ok(blocker.join("instance"))
    }
}
