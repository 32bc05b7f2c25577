//! Dataset Cache
//! Keeps loaded datasets keyed on the identity of their input files so UI
//! interactions never re-parse the sources.

use crate::data::loader::{DataLoadError, DataLoader};
use crate::data::model::Dataset;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

/// Identity of one input file: path, size and modification time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl FileIdentity {
    pub fn of(path: &Path) -> Result<Self, DataLoadError> {
        let meta = fs::metadata(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub names: FileIdentity,
    pub departments: FileIdentity,
}

impl SourceKey {
    pub fn of(names_path: &Path, departments_path: &Path) -> Result<Self, DataLoadError> {
        Ok(Self {
            names: FileIdentity::of(names_path)?,
            departments: FileIdentity::of(departments_path)?,
        })
    }
}

/// Memoizes `DataLoader::load_paths` by `SourceKey`.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<SourceKey, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SourceKey) -> Option<Arc<Dataset>> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: SourceKey, dataset: Arc<Dataset>) {
        self.entries.insert(key, dataset);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the cached dataset for these files, loading it on a miss.
    pub fn get_or_load(
        &mut self,
        names_path: &Path,
        departments_path: &Path,
    ) -> Result<Arc<Dataset>, DataLoadError> {
        let key = SourceKey::of(names_path, departments_path)?;
        if let Some(dataset) = self.get(&key) {
            debug!(names = %names_path.display(), "dataset cache hit");
            return Ok(dataset);
        }

        info!(names = %names_path.display(), departments = %departments_path.display(), "loading dataset");
        let dataset = Arc::new(DataLoader::load_paths(names_path, departments_path)?);
        self.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }
}
