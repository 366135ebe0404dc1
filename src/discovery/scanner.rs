//! File system scanner for layer directories and their PNG assets.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{GenError, Result};

/// List the names of the subdirectories of the layer root, sorted.
///
/// Plain files at the root are ignored.
pub fn list_layer_dirs(root: &Path) -> Result<Vec<String>> {
    let entries =
        fs::read_dir(root).map_err(|e| GenError::io(root, "Failed to read layer directory", e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| GenError::io(root, "Failed to read layer directory", e))?;

        // follows symlinks, so linked layer directories count
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names.sort();
    Ok(names)
}

/// Recursively collect every `.png` file below `dir`, in sorted path order.
///
/// A directory that does not exist yields no files. Entries that cannot be
/// read (including dangling symlinks) fail the scan.
pub fn scan_layer(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| GenError::io(dir, "Failed to scan layer", e))?;
        if entry.file_type().is_file() && is_png(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Check whether a path has a `.png` extension.
pub fn is_png(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("png")
}
