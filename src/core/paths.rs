// src/core/paths.rs

use lazy_static::lazy_static;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref CONFIG_DIR_CACHE: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not determine the system configuration directory.")]
    ConfigDirNotFound,
    #[error("Could not create '{path}': {source}")]
    ConfigDirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Returns `~/.config/sitealias` (or the platform equivalent), creating it
/// on first use. Memoized: the system lookup runs once per process.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    // The cached value stays usable even if a panic poisoned the lock.
    let mut cache = CONFIG_DIR_CACHE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(path) = cache.as_ref() {
        return Ok(path.clone());
    }

    let dir = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join("sitealias");
    fs::create_dir_all(&dir).map_err(|source| PathError::ConfigDirCreation {
        path: dir.clone(),
        source,
    })?;

    *cache = Some(dir.clone());
    Ok(dir)
}
