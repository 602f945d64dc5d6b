//! On-disk format of a scope's forbidden list.
//!
//! A scope file is a pretty-printed JSON array of flat records:
//!
//! ```json
//! [ { "registryId": "minecraft:dirt", "name": "Dirt", "componentsJson": "{}" } ]
//! ```
//!
//! Array order carries no meaning; records are written sorted so files diff
//! cleanly. Writes go through a sibling temp file that is synced and then
//! renamed over the target, so readers see either the old or the new list.

use forbiddenblocks_core::ItemIdentity;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised while reading or writing a scope file.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem failure.
    #[error("failed to access scope file: {0}")]
    Io(#[from] io::Error),
    /// The file exists but is not a list of item records.
    #[error("failed to parse scope file: {0}")]
    Parse(#[source] serde_json::Error),
    /// The in-memory list could not be encoded.
    #[error("failed to encode scope file: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Read the records stored at `path`.
pub fn read_items(path: &Path) -> Result<HashSet<ItemIdentity>, PersistError> {
    let contents = fs::read_to_string(path)?;
    let items: Vec<ItemIdentity> = serde_json::from_str(&contents).map_err(PersistError::Parse)?;
    Ok(items.into_iter().collect())
}

/// Replace the file at `path` with `items`, creating parent directories.
pub fn write_items<'a, I>(path: &Path, items: I) -> Result<(), PersistError>
where
    I: IntoIterator<Item = &'a ItemIdentity>,
{
    let mut sorted: Vec<&ItemIdentity> = items.into_iter().collect();
    sorted.sort();
    let json = serde_json::to_vec_pretty(&sorted).map_err(PersistError::Encode)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&json)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| PersistError::Io(err.error))?;
    Ok(())
}
