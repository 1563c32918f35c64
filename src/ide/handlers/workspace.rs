//! Workspace-related handlers.

use std::time::Duration;

use tower_lsp::lsp_types::{
    DidChangeConfigurationParams,
    DidChangeWatchedFilesParams,
};

use super::super::backend::Backend;
use crate::config::TranslateSettings;

pub async fn handle_did_change_configuration(
    backend: &Backend,
    params: DidChangeConfigurationParams,
) {
    tracing::info!(settings = %params.settings, "didChangeConfiguration received");

    let Ok(new_settings) = serde_json::from_value::<TranslateSettings>(params.settings) else {
        return;
    };

    let debounce_ms = new_settings.debounce_ms;
    let mut config_manager = backend.config_manager.lock().await;
    match config_manager.update_settings(new_settings) {
        Ok(()) => {
            drop(config_manager);
            tracing::info!("configuration updated successfully");

            backend.state.reset_debouncer(Duration::from_millis(debounce_ms)).await;
            backend.reindex_workspace().await;
        }
        Err(error) => {
            tracing::error!(%error, "configuration validation error");
        }
    }
}

pub async fn handle_did_change_watched_files(
    backend: &Backend,
    params: DidChangeWatchedFilesParams,
) {
    let extension = backend.config_manager.lock().await.get_settings().file_extension.clone();

    let mut touched = Vec::new();
    for change in params.changes {
        let Some(path) = Backend::uri_to_path(&change.uri) else {
            continue;
        };

        if Backend::is_config_file(&path) {
            tracing::info!(path = %path.display(), "Configuration file changed");
            let workspace_root =
                backend.config_manager.lock().await.workspace_root().cloned();
            let mut config_manager = backend.config_manager.lock().await;
            if let Err(error) = config_manager.load_settings(workspace_root) {
                tracing::error!(%error, "Failed to reload configuration");
                continue;
            }
            let debounce_ms = config_manager.get_settings().debounce_ms;
            drop(config_manager);

            backend.state.reset_debouncer(Duration::from_millis(debounce_ms)).await;
            backend.reindex_workspace().await;
            continue;
        }

        let matches_extension =
            path.extension().is_some_and(|ext| ext.to_string_lossy() == extension);
        if matches_extension || backend.is_translation_file(&path).await {
            tracing::debug!(path = %path.display(), change_type = ?change.typ, "Translation file event");
            touched.push(path);
        }
    }

    if !touched.is_empty() {
        backend.schedule_reindex(touched).await;
    }
}
