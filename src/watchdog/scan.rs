use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::SaveFileInfo;

/// Take a full snapshot of the regular files in `dir` with their mtimes.
///
/// Called fresh every tick; nothing is diffed against previous snapshots.
pub fn list_files(dir: &Path) -> Result<Vec<SaveFileInfo>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let metadata = entry
            .metadata()
            .with_context(|| format!("Failed to stat {}", entry.path().display()))?;
        if !metadata.is_file() {
            continue;
        }
        let last_modified = metadata
            .modified()
            .with_context(|| format!("No mtime for {}", entry.path().display()))?;
        files.push(SaveFileInfo {
            path: entry.path(),
            last_modified,
        });
    }

    Ok(files)
}
