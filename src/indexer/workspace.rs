//! ワークスペースの翻訳インデクサー
//!
//! 再構築は常に丸ごと行い、完成したスナップショットだけを
//! アトミックに差し替えます。失敗した再構築は前回の正常な
//! スナップショットを残します（stale-but-valid 契約）。

use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::TranslateSettings;
use crate::indexer::scanner;
use crate::indexer::types::{
    IndexerError,
    TableEdit,
    TranslationIndex,
};
use crate::input::translation::{
    self,
    TranslationMap,
};

/// Summary of one successful rebuild, for log/user messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSummary {
    /// Number of translation files discovered.
    pub files: usize,
    /// Number of files that parsed successfully.
    pub parsed: usize,
}

/// Owns the active [`TranslationIndex`] snapshot.
///
/// Readers take cheap `Arc` clones and never observe a partially built
/// index. Concurrent rebuilds are not coordinated; the last writer wins.
#[derive(Debug, Default)]
pub struct TranslationIndexer {
    index: RwLock<Option<Arc<TranslationIndex>>>,
}

impl TranslationIndexer {
    #[must_use]
    pub fn new() -> Self {
        Self { index: RwLock::new(None) }
    }

    /// Current snapshot, `None` before the first successful rebuild.
    pub async fn snapshot(&self) -> Option<Arc<TranslationIndex>> {
        self.index.read().await.clone()
    }

    /// Discover, parse and swap in a fresh index.
    ///
    /// Files are parsed independently; a parse failure logs and leaves an
    /// absent entry instead of aborting the batch. The swap happens only
    /// when the candidate is ready, so a failed pass keeps serving the
    /// previous snapshot.
    pub async fn rebuild(
        &self,
        workspace_root: &Path,
        settings: &TranslateSettings,
    ) -> Result<IndexSummary, IndexerError> {
        let scan_root = scan_root(workspace_root, settings);
        tracing::debug!(scan_root = %scan_root.display(), "Rebuilding translation index");

        let files = scanner::discover(
            &scan_root,
            &settings.translations_folder,
            &settings.file_extension,
        )?;

        let languages: Vec<String> =
            files.iter().map(|f| translation::language_from_path(f)).collect();

        let reads = files.iter().map(|file| translation::read_translation_file(file));
        let tables: Vec<Option<TranslationMap>> = futures::future::join_all(reads)
            .await
            .into_iter()
            .zip(&files)
            .map(|(result, file)| match result {
                Ok(table) => Some(table),
                Err(error) => {
                    tracing::warn!(file = %file.display(), %error, "Failed to read translation file");
                    None
                }
            })
            .collect();

        let parsed = tables.iter().filter(|t| t.is_some()).count();
        let summary = IndexSummary { files: files.len(), parsed };
        let candidate = TranslationIndex::new(files, languages, tables);

        if !candidate.is_ready() {
            return Err(IndexerError::NothingParsed);
        }

        *self.index.write().await = Some(Arc::new(candidate));
        tracing::debug!(?summary, "Translation index rebuilt");
        Ok(summary)
    }

    /// Apply a table edit: update the snapshot and persist every available
    /// translation file pretty-printed.
    ///
    /// Returns the paths that were written so callers can refresh their
    /// change fingerprints before the watcher sees the writes.
    pub async fn apply(&self, edit: &TableEdit) -> Result<Vec<PathBuf>, IndexerError> {
        let current = self.snapshot().await.ok_or(IndexerError::NotIndexed)?;
        let next = current.with_edit(edit)?;

        let mut written = Vec::new();
        for (file, table) in next.files().iter().zip(next.tables()) {
            if let Some(table) = table {
                translation::write_translation_file(file, table).await?;
                written.push(file.clone());
            }
        }

        *self.index.write().await = Some(Arc::new(next));
        Ok(written)
    }
}

/// Where scanning starts: `<workspace>/<source_root>` when it exists,
/// else the workspace root itself.
fn scan_root(workspace_root: &Path, settings: &TranslateSettings) -> PathBuf {
    let preferred = workspace_root.join(&settings.source_root);
    if preferred.is_dir() { preferred } else { workspace_root.to_path_buf() }
}
