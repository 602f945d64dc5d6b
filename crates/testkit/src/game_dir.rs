//! Temporary game directories with helpers to inspect scope files.

use anyhow::{Context, Result};
use forbiddenblocks_core::{ScopeId, WORLDS_DIR};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A game directory that is deleted when dropped.
pub struct TestGameDir {
    dir: TempDir,
}

impl TestGameDir {
    /// Create a fresh, empty game directory.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("forbiddenblocks-test-")
            .tempdir()
            .context("Failed to create temporary game directory")?;
        Ok(Self { dir })
    }

    /// Root of the game directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the scope file for `scope` lives.
    pub fn scope_file(&self, scope: &ScopeId) -> PathBuf {
        self.dir
            .path()
            .join(WORLDS_DIR)
            .join(format!("{}.json", scope.file_stem()))
    }

    /// Overwrite the scope file for `scope` with raw contents.
    pub fn write_scope_file(&self, scope: &ScopeId, contents: &str) -> Result<()> {
        let path = self.scope_file(scope);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Parse the records stored for `scope`.
    pub fn read_scope_records(&self, scope: &ScopeId) -> Result<Vec<Value>> {
        let path = self.scope_file(scope);
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let records: Vec<Value> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(records)
    }

    /// Path of the global settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.dir.path().join("config/forbiddenblocks.toml")
    }
}
