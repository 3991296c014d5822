//! Filesystem-backed dataset storage
//!
//! Each dataset is one JSON document under a configured directory. The format
//! is self-describing, so tables round-trip through the same serde
//! representation the rest of the system uses.

#![warn(missing_docs)]

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dataprep_core::{DatasetStore, Error, Result, Table};
use tracing::debug;

const EXTENSION: &str = "json";

/// Stores each dataset as `<name>.json` under a data directory
///
/// The directory is created on construction. Files with other extensions in
/// the same directory are ignored by [`DatasetStore::list`].
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "opened dataset store");
        Ok(Self { root })
    }

    /// The directory datasets are stored under
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}", name, EXTENSION))
    }
}

impl DatasetStore for FsStore {
    fn load(&self, name: &str) -> Result<Table> {
        let bytes = match fs::read(self.path_for(name)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::DatasetNotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn save(&self, name: &str, table: &Table) -> Result<()> {
        let bytes = serde_json::to_vec(table)?;
        fs::write(self.path_for(name), bytes)?;
        debug!(dataset = name, "saved dataset");
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.path_for(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::DatasetNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.path_for(name).exists())
    }
}
