use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use super::loader::{LoadError, load_file};
use super::model::Dataset;

static GLOBAL: OnceLock<DatasetCache> = OnceLock::new();

/// Memoises dataset loads by path for the lifetime of the process.
///
/// The first request for a path reads the file; later requests return the
/// same `Arc` without touching the file system. Failed loads are not cached,
/// and nothing is ever evicted.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<PathBuf, Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache.
    pub fn global() -> &'static DatasetCache {
        GLOBAL.get_or_init(DatasetCache::new)
    }

    pub fn load(&self, path: &Path) -> Result<Arc<Dataset>, LoadError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(ds) = entries.get(path) {
            log::info!("Dataset cache hit for {}", path.display());
            return Ok(Arc::clone(ds));
        }

        let ds = Arc::new(load_file(path)?);
        entries.insert(path.to_path_buf(), Arc::clone(&ds));
        Ok(ds)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
