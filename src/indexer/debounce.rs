//! File-change debouncing with content fingerprints.
//!
//! エディタは 1 回の保存で複数の変更通知を送ることがあります。
//! 静穏期間で通知をまとめ、SHA-256 フィンガープリントで実際に
//! バイト列が変わったときだけ再インデックスを起動します。

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::time::Duration;

use sha2::{
    Digest,
    Sha256,
};
use tokio::sync::Mutex;

/// Content fingerprint of one translation file.
pub type Fingerprint = [u8; 32];

fn fingerprint_bytes(bytes: &[u8]) -> Fingerprint {
    Sha256::digest(bytes).into()
}

/// Coalesces raw change notifications and suppresses spurious ones.
#[derive(Debug)]
pub struct ChangeDebouncer {
    quiet: Duration,
    pending: AtomicBool,
    fingerprints: Mutex<HashMap<PathBuf, Fingerprint>>,
}

impl ChangeDebouncer {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, pending: AtomicBool::new(false), fingerprints: Mutex::new(HashMap::new()) }
    }

    /// Quiet window this debouncer coalesces over.
    #[must_use]
    pub const fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Begin a quiet window. Returns `false` when one is already pending,
    /// in which case the notification is dropped (coalesced).
    pub fn try_begin(&self) -> bool {
        self.pending.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_ok()
    }

    /// End the quiet window started by [`Self::try_begin`].
    pub fn finish(&self) {
        self.pending.store(false, Ordering::SeqCst);
    }

    /// Record the current on-disk fingerprint of `path`.
    ///
    /// Called after indexing, and after the server's own writes so they do
    /// not re-trigger indexing. An unreadable file is forgotten, so the
    /// next notification for it counts as a change.
    pub async fn record(&self, path: &Path) {
        let mut fingerprints = self.fingerprints.lock().await;
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                fingerprints.insert(path.to_path_buf(), fingerprint_bytes(&bytes));
            }
            Err(error) => {
                tracing::debug!(path = %path.display(), %error, "Dropping fingerprint");
                fingerprints.remove(path);
            }
        }
    }

    /// Compare the current fingerprints of `files` with the last observed
    /// ones, updating the stored values. Returns `true` when any file
    /// genuinely changed (or is new / unreadable).
    pub async fn any_changed(&self, files: &[PathBuf]) -> bool {
        let mut fingerprints = self.fingerprints.lock().await;
        let mut changed = false;

        for file in files {
            match tokio::fs::read(file).await {
                Ok(bytes) => {
                    let current = fingerprint_bytes(&bytes);
                    if fingerprints.insert(file.clone(), current) != Some(current) {
                        changed = true;
                    }
                }
                Err(_) => {
                    // 消えたファイルは変更として扱う
                    if fingerprints.remove(file).is_some() {
                        changed = true;
                    }
                }
            }
        }

        changed
    }

    /// Coalesce a change notification: wait the quiet window, then invoke
    /// `on_change` only when some of `files` genuinely changed.
    ///
    /// Notifications arriving while a window is pending are dropped.
    pub fn schedule<F, Fut>(self: std::sync::Arc<Self>, files: Vec<PathBuf>, on_change: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if !self.try_begin() {
            tracing::trace!("Change notification coalesced");
            return;
        }

        let this = self;
        tokio::spawn(async move {
            tokio::time::sleep(this.quiet).await;
            this.finish();

            if this.any_changed(&files).await {
                on_change().await;
            } else {
                tracing::debug!("Change notification with unchanged content, skipping reindex");
            }
        });
    }
}
