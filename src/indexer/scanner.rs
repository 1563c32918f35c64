//! Path scanner for translation directories.
//!
//! Pure and stateless: walks a source tree looking for a conventionally
//! named folder and lists the translation files inside it.

use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;

use crate::indexer::types::IndexerError;

/// Find the translation directory under `scan_root`.
///
/// The walk respects gitignore rules. When several directories carry the
/// conventional name, the lexicographically first one wins so rebuilds are
/// deterministic.
pub fn find_translations_dir(
    scan_root: &Path,
    folder_name: &str,
) -> Result<Option<PathBuf>, IndexerError> {
    let mut found: Vec<PathBuf> = Vec::new();

    for result in WalkBuilder::new(scan_root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }

        if entry.path().file_name().is_some_and(|name| name == folder_name) {
            found.push(entry.path().to_path_buf());
        }
    }

    found.sort();
    Ok(found.into_iter().next())
}

/// List the translation files inside `dir`, sorted by file name.
///
/// Sorting keeps the derived language order stable across rebuilds;
/// language 0 is the default/reference language.
pub fn list_translation_files(
    dir: &Path,
    file_extension: &str,
) -> Result<Vec<PathBuf>, IndexerError> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| IndexerError::Scan(format!("{}: {e}", dir.display())))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(file_extension)
        })
        .collect();

    files.sort();
    Ok(files)
}

/// Discover the translation files for a workspace in one call.
///
/// `scan_root` should already account for the configured source root.
pub fn discover(
    scan_root: &Path,
    folder_name: &str,
    file_extension: &str,
) -> Result<Vec<PathBuf>, IndexerError> {
    tracing::debug!(scan_root = %scan_root.display(), folder_name, "Scanning for translation files");

    let Some(dir) = find_translations_dir(scan_root, folder_name)? else {
        return Err(IndexerError::FolderNotFound(folder_name.to_string()));
    };

    tracing::debug!(dir = %dir.display(), "Found translations directory");

    let files = list_translation_files(&dir, file_extension)?;
    if files.is_empty() {
        return Err(IndexerError::NoTranslationFiles(dir));
    }

    Ok(files)
}
