//! Directory housekeeping for the config store

use eyre::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;

/// Create `path` and any missing ancestors. Existing directories are fine.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    log::info!("Created config directory {}", path.display());

    Ok(())
}

/// Entry names of `path` in the order the filesystem yields them
///
/// Returns `None` when the directory does not exist.
pub fn list_entries(path: &Path) -> Result<Option<Vec<String>>> {
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to list directory: {}", path.display()));
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    Ok(Some(names))
}

/// Remove a file or a whole directory tree. A missing target is not an error.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("Nothing to delete at {}", path.display());
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to inspect: {}", path.display()));
        }
    };

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };

    match result {
        Ok(()) => {
            log::info!("Deleted {}", path.display());
            Ok(())
        }
        // Lost a race with another remover
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to delete: {}", path.display())),
    }
}
