use tracing::info;

use super::{QuicksaveObservation, SaveFileInfo};

/// Filename prefix marking the game's rolling quicksave
const QUICKSAVE_PREFIX: &str = "Quicksave0";

/// Pick the authoritative quicksave out of a directory snapshot.
///
/// Candidates are files whose name starts with `Quicksave0`; the most
/// recently modified one wins. `None` means no quicksave exists yet, which
/// is a normal skip condition rather than an error. Ties on mtime are a
/// don't-care (the game never produces two quicksaves in the same instant).
pub fn select_quicksave(files: &[SaveFileInfo]) -> Option<QuicksaveObservation> {
    let candidates: Vec<&SaveFileInfo> = files
        .iter()
        .filter(|f| {
            f.path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(QUICKSAVE_PREFIX))
        })
        .collect();

    let selected = candidates.iter().max_by_key(|f| f.last_modified)?;

    if candidates.len() > 1 {
        let names: Vec<String> = candidates
            .iter()
            .map(|f| format!("'{}'", f.path.file_name().unwrap_or_default().to_string_lossy()))
            .collect();
        info!(
            "Found more than one quicksave file. Selected '{}' as it was most recently \
             modified. Candidates were: {}",
            selected.path.file_name().unwrap_or_default().to_string_lossy(),
            names.join(", ")
        );
    }

    Some(QuicksaveObservation {
        path: selected.path.clone(),
        last_modified: selected.last_modified,
    })
}
