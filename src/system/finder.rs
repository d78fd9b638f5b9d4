// src/system/finder.rs

use std::path::{Path, PathBuf};

use crate::constants::PROJECT_MARKER_FILENAME;

/// Walks up from `start` looking for the directory that contains a
/// `composer.json`. Returns `None` when no ancestor carries the marker.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(PROJECT_MARKER_FILENAME).is_file() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}
