//! LSP サーバーの共有状態

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tower_lsp::lsp_types::Url;

use crate::indexer::TranslationIndexer;
use crate::indexer::debounce::ChangeDebouncer;

/// LSP サーバーの共有状態
///
/// `Backend` から状態管理の責務を分離し、ハンドラー間で共有可能にします。
#[derive(Clone)]
pub struct ServerState {
    /// アクティブな翻訳インデックスの所有者
    pub indexer: Arc<TranslationIndexer>,
    /// 開いているテンプレートの内容（URI → テキスト）
    pub documents: Arc<Mutex<HashMap<Url, String>>>,
    /// 変更通知のデバウンサー。静穏期間は設定読込後に差し替える
    pub debouncer: Arc<Mutex<Arc<ChangeDebouncer>>>,
}

impl ServerState {
    /// 新しい `ServerState` を作成
    #[must_use]
    pub fn new(default_quiet: Duration) -> Self {
        Self {
            indexer: Arc::new(TranslationIndexer::new()),
            documents: Arc::new(Mutex::new(HashMap::new())),
            debouncer: Arc::new(Mutex::new(Arc::new(ChangeDebouncer::new(default_quiet)))),
        }
    }

    /// 現在のデバウンサーを取得
    pub async fn debouncer(&self) -> Arc<ChangeDebouncer> {
        Arc::clone(&*self.debouncer.lock().await)
    }

    /// 静穏期間を設定に合わせて差し替える
    pub async fn reset_debouncer(&self, quiet: Duration) {
        let mut debouncer = self.debouncer.lock().await;
        if debouncer.quiet() != quiet {
            *debouncer = Arc::new(ChangeDebouncer::new(quiet));
        }
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("indexer", &"<TranslationIndexer>")
            .field("documents", &"<HashMap<Url, String>>")
            .field("debouncer", &"<ChangeDebouncer>")
            .finish()
    }
}
