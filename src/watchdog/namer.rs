use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use super::SaveFileInfo;

/// Matches numbered permanent saves such as `Save12_2024-01-01.sfs`
static RE_SAVE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Save(\d+)_.*\.sfs$").unwrap());

/// Compute the archive name for `quicksave_name` given every file name
/// currently in the save directory.
///
/// The highest existing save number N yields `Save{N+1}`, substituted for
/// the first `Quicksave0` in the quicksave's name; the rest of the name,
/// date stamp and extension included, is kept verbatim. Numbers only ever
/// grow, so archives never collide as long as nobody renumbers the
/// directory behind our back.
pub fn next_archive_name<'a, I>(names: I, quicksave_name: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let max_id = names
        .into_iter()
        .filter_map(|name| RE_SAVE_NUMBER.captures(name))
        .filter_map(|captures| captures[1].parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    quicksave_name.replacen("Quicksave0", &format!("Save{}", max_id + 1), 1)
}

/// Path-level wrapper: archive lands next to the quicksave itself.
pub fn next_archive_path(files: &[SaveFileInfo], quicksave_path: &Path) -> PathBuf {
    let names: Vec<String> = files
        .iter()
        .filter_map(|f| f.path.file_name().map(|n| n.to_string_lossy().to_string()))
        .collect();

    let quicksave_name = quicksave_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let archive_name = next_archive_name(names.iter().map(String::as_str), &quicksave_name);
    quicksave_path.with_file_name(archive_name)
}
