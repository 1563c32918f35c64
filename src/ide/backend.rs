//! LSP Backend 実装

use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CompletionParams,
    CompletionResponse,
    DidChangeConfigurationParams,
    DidChangeTextDocumentParams,
    DidChangeWatchedFilesParams,
    DidCloseTextDocumentParams,
    DidOpenTextDocumentParams,
    DidSaveTextDocumentParams,
    ExecuteCommandParams,
    Hover,
    HoverParams,
    InitializeParams,
    InitializeResult,
    InitializedParams,
    MessageType,
    Url,
    WorkspaceFolder,
};
use tower_lsp::{
    Client,
    LanguageServer,
};

use crate::config::ConfigManager;
use crate::ide::diagnostics::generate_diagnostics;
use crate::ide::handlers;
use crate::ide::state::ServerState;

/// LSP Backend
#[derive(Clone)]
pub struct Backend {
    /// LSP クライアント
    pub client: Client,
    /// 設定管理
    pub config_manager: Arc<Mutex<ConfigManager>>,
    /// 共有状態（インデックス、開いているドキュメント、デバウンサー）
    pub state: ServerState,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("config_manager", &"<ConfigManager>")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Backend {
    /// 新しい `Backend` を作成
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            config_manager: Arc::new(Mutex::new(ConfigManager::new())),
            state: ServerState::new(Duration::from_millis(100)),
        }
    }

    /// ワークスペースフォルダを取得
    ///
    /// クライアントからワークスペースフォルダのリストを取得します。
    /// フォルダが設定されていない場合は空のVecを返します。
    ///
    /// # Errors
    /// クライアントとの通信に失敗した場合
    pub(crate) async fn get_workspace_folders(&self) -> Result<Vec<WorkspaceFolder>> {
        self.client.workspace_folders().await.map(Option::unwrap_or_default)
    }

    /// URI をファイルパスへ変換
    pub(crate) fn uri_to_path(uri: &Url) -> Option<PathBuf> {
        uri.to_file_path().ok()
    }

    /// サーバー設定ファイルかどうか
    pub(crate) fn is_config_file(path: &Path) -> bool {
        path.file_name().is_some_and(|name| name == ".ngx-translate.json")
    }

    /// インデックス済みの翻訳ファイルかどうか
    pub(crate) async fn is_translation_file(&self, path: &Path) -> bool {
        self.state
            .indexer
            .snapshot()
            .await
            .is_some_and(|index| index.files().iter().any(|file| file == path))
    }

    /// ワークスペースを再インデックス
    ///
    /// インデックスの差し替えはアトミックで、失敗時は前回の
    /// スナップショットが生き続けます。成功時は翻訳ファイルの
    /// フィンガープリントを取り直し、開いているドキュメントの
    /// 診断を更新します。
    pub(crate) async fn reindex_workspace(&self) {
        self.client.log_message(MessageType::INFO, "Reindexing translations...").await;

        let (workspace_root, settings) = {
            let config_manager = self.config_manager.lock().await;
            (config_manager.workspace_root().cloned(), config_manager.get_settings().clone())
        };

        let Some(workspace_root) = workspace_root else {
            tracing::debug!("No workspace root configured, skipping reindex");
            return;
        };

        match self.state.indexer.rebuild(&workspace_root, &settings).await {
            Ok(summary) => {
                self.record_index_fingerprints().await;
                self.client
                    .log_message(
                        MessageType::INFO,
                        format!(
                            "Reindexing complete: {} translation files ({} parsed)",
                            summary.files, summary.parsed
                        ),
                    )
                    .await;
            }
            Err(error) => {
                tracing::warn!(%error, "Reindexing failed");
                self.client
                    .log_message(MessageType::ERROR, format!("Reindexing failed: {error}"))
                    .await;
                self.client.show_message(MessageType::WARNING, error.to_string()).await;
            }
        }

        self.publish_all_diagnostics().await;
    }

    /// 現在のスナップショットの全翻訳ファイルのフィンガープリントを記録
    ///
    /// 自分の書き込みや取り込み済みの変更で再インデックスが
    /// 空回りしないようにします。
    pub(crate) async fn record_index_fingerprints(&self) {
        let Some(index) = self.state.indexer.snapshot().await else {
            return;
        };
        let debouncer = self.state.debouncer().await;
        for file in index.files() {
            debouncer.record(file).await;
        }
    }

    /// 変更通知をデバウンスして再インデックスを予約
    ///
    /// 静穏期間の経過後、インデックス済みファイルと `touched` の
    /// 内容が前回から変わっている場合だけ再インデックスします。
    pub(crate) async fn schedule_reindex(&self, touched: Vec<PathBuf>) {
        let snapshot = self.state.indexer.snapshot().await;
        let Some(index) = snapshot else {
            // 未インデックスなら比較対象がないので即座に作り直す
            self.reindex_workspace().await;
            return;
        };

        let mut files = index.files().to_vec();
        for path in touched {
            if !files.contains(&path) {
                files.push(path);
            }
        }

        let debouncer = self.state.debouncer().await;
        let backend = self.clone();
        debouncer.schedule(files, move || async move {
            backend.reindex_workspace().await;
        });
    }

    /// 1 ドキュメントの診断を生成して送信
    pub(crate) async fn publish_diagnostics_for(&self, uri: Url, text: &str) {
        let diagnostics = match self.state.indexer.snapshot().await {
            Some(index) => generate_diagnostics(text, &index),
            None => Vec::new(),
        };
        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }

    /// 開いている全ドキュメントの診断を更新
    pub(crate) async fn publish_all_diagnostics(&self) {
        let documents: Vec<(Url, String)> = {
            let documents = self.state.documents.lock().await;
            documents.iter().map(|(uri, text)| (uri.clone(), text.clone())).collect()
        };

        for (uri, text) in documents {
            self.publish_diagnostics_for(uri, &text).await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handlers::lifecycle::handle_initialize(self, params).await
    }

    async fn initialized(&self, params: InitializedParams) {
        handlers::lifecycle::handle_initialized(self, params).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handlers::lifecycle::handle_shutdown().await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        handlers::document_sync::handle_did_open(self, params).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        handlers::document_sync::handle_did_change(self, params).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        handlers::document_sync::handle_did_save(self, params).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        handlers::document_sync::handle_did_close(self, params).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        handlers::workspace::handle_did_change_configuration(self, params).await;
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        handlers::workspace::handle_did_change_watched_files(self, params).await;
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        handlers::features::handle_completion(self, params).await
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        handlers::features::handle_hover(self, params).await
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        handlers::execute_command::handle_execute_command(self, params).await
    }
}
