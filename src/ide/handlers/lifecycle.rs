//! LSP lifecycle handlers: `initialize`, `initialized`, `shutdown`.

use std::time::Duration;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CompletionOptions,
    ExecuteCommandOptions,
    HoverProviderCapability,
    InitializeParams,
    InitializeResult,
    InitializedParams,
    MessageType,
    OneOf,
    ServerCapabilities,
    TextDocumentSyncCapability,
    TextDocumentSyncKind,
    WorkDoneProgressOptions,
    WorkspaceFoldersServerCapabilities,
    WorkspaceServerCapabilities,
};

use super::super::backend::Backend;
use crate::ide::handlers::execute_command::COMMANDS;

pub async fn handle_initialize(
    backend: &Backend,
    params: InitializeParams,
) -> Result<InitializeResult> {
    let workspace_root = params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .and_then(|folder| folder.uri.to_file_path().ok());

    let mut config_manager = backend.config_manager.lock().await;
    if let Err(error) = config_manager.load_settings(workspace_root) {
        backend
            .client
            .log_message(MessageType::ERROR, format!("Configuration error: {error}"))
            .await;
        tracing::error!("Configuration error during initialize: {}", error);
    }
    let debounce_ms = config_manager.get_settings().debounce_ms;
    drop(config_manager);

    backend.state.reset_debouncer(Duration::from_millis(debounce_ms)).await;

    Ok(InitializeResult {
        server_info: None,
        capabilities: ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            completion_provider: Some(CompletionOptions {
                resolve_provider: Some(false),
                trigger_characters: Some(vec!["'".to_string()]),
                work_done_progress_options: WorkDoneProgressOptions::default(),
                all_commit_characters: None,
                completion_item: None,
            }),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: COMMANDS.iter().map(ToString::to_string).collect(),
                work_done_progress_options: WorkDoneProgressOptions::default(),
            }),
            workspace: Some(WorkspaceServerCapabilities {
                workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                    supported: Some(true),
                    change_notifications: Some(OneOf::Left(true)),
                }),
                file_operations: None,
            }),
            ..ServerCapabilities::default()
        },
    })
}

pub async fn handle_initialized(backend: &Backend, _: InitializedParams) {
    backend.client.log_message(MessageType::INFO, "initialized!").await;

    // initialize でワークスペースルートが取れなかった場合のフォールバック
    let has_root = backend.config_manager.lock().await.workspace_root().is_some();
    if !has_root {
        let root = backend
            .get_workspace_folders()
            .await
            .ok()
            .and_then(|folders| folders.first().and_then(|folder| folder.uri.to_file_path().ok()));
        if let Some(root) = root {
            let mut config_manager = backend.config_manager.lock().await;
            if let Err(error) = config_manager.load_settings(Some(root)) {
                tracing::error!("Configuration error after initialized: {}", error);
            }
        }
    }

    backend.reindex_workspace().await;
}

#[allow(clippy::unused_async)]
pub async fn handle_shutdown() -> Result<()> {
    Ok(())
}
