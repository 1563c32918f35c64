//! LSPサーバーの初期化・ホバー・補完に関するテスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]
#![allow(clippy::match_wildcard_for_single_variants)]

use std::fs;
use std::path::Path;

use ngx_translate_language_server::Backend;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tower_lsp::lsp_types::*;
use tower_lsp::{
    LanguageServer,
    LspService,
};

fn workspace_with_translations() -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("src/assets/i18n");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("en.json"), r#"{"page.title": "Title", "page.body": "Body"}"#).unwrap();
    fs::write(dir.join("fr.json"), r#"{"page.title": "Titre"}"#).unwrap();
    temp
}

fn create_test_backend() -> Backend {
    let (service, _socket) = LspService::new(Backend::new);
    service.inner().clone()
}

/// ワークスペースを指定してサーバーを初期化済みの状態にする
async fn initialized_backend(workspace_root: &Path) -> Backend {
    let backend = create_test_backend();

    let params = InitializeParams {
        workspace_folders: Some(vec![WorkspaceFolder {
            uri: Url::from_file_path(workspace_root).unwrap(),
            name: "workspace".to_string(),
        }]),
        ..InitializeParams::default()
    };
    backend.initialize(params).await.unwrap();
    backend.initialized(InitializedParams {}).await;

    backend
}

async fn open_document(backend: &Backend, uri: &Url, text: &str) {
    backend
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: "html".to_string(),
                version: 1,
                text: text.to_string(),
            },
        })
        .await;
}

fn hover_params(uri: &Url, line: u32, character: u32) -> HoverParams {
    HoverParams {
        text_document_position_params: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
            position: Position { line, character },
        },
        work_done_progress_params: WorkDoneProgressParams { work_done_token: None },
    }
}

#[tokio::test]
async fn test_initialize_capabilities() {
    let backend = create_test_backend();

    let result = backend.initialize(InitializeParams::default()).await.unwrap();
    let capabilities = result.capabilities;

    assert_eq!(
        capabilities.text_document_sync,
        Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL))
    );
    assert_eq!(capabilities.hover_provider, Some(HoverProviderCapability::Simple(true)));

    let completion = capabilities.completion_provider.unwrap();
    assert_eq!(completion.trigger_characters, Some(vec!["'".to_string()]));

    let commands = capabilities.execute_command_provider.unwrap().commands;
    assert!(commands.contains(&"ngxTranslate.updateTranslations".to_string()));
    assert!(commands.contains(&"ngxTranslate.translationsTable".to_string()));
    assert!(commands.contains(&"ngxTranslate.createTranslationFromSelection".to_string()));
    assert_eq!(commands.len(), 8);
}

#[tokio::test]
async fn test_hover_lists_translations_for_key_under_cursor() {
    let temp = workspace_with_translations();
    let backend = initialized_backend(temp.path()).await;

    let uri = Url::parse("file:///app.component.html").unwrap();
    open_document(&backend, &uri, "<h1>{{ 'page.title' | translate }}</h1>").await;

    let hover = backend.hover(hover_params(&uri, 0, 12)).await.unwrap().unwrap();

    match hover.contents {
        HoverContents::Markup(markup) => {
            assert_eq!(markup.kind, MarkupKind::Markdown);
            assert!(markup.value.contains("**EN:** Title"));
            assert!(markup.value.contains("**FR:** Titre"));
        }
        _ => panic!("Expected Markup content"),
    }
    assert!(hover.range.is_none());
}

#[tokio::test]
async fn test_hover_marks_partially_translated_keys() {
    let temp = workspace_with_translations();
    let backend = initialized_backend(temp.path()).await;

    let uri = Url::parse("file:///app.component.html").unwrap();
    open_document(&backend, &uri, "<p>{{ 'page.body' | translate }}</p>").await;

    let hover = backend.hover(hover_params(&uri, 0, 10)).await.unwrap().unwrap();

    match hover.contents {
        HoverContents::Markup(markup) => {
            assert!(markup.value.contains("**EN:** Body"));
            assert!(markup.value.contains("**FR:** _missing_"));
        }
        _ => panic!("Expected Markup content"),
    }
}

#[tokio::test]
async fn test_hover_outside_pipe_markup_returns_none() {
    let temp = workspace_with_translations();
    let backend = initialized_backend(temp.path()).await;

    let uri = Url::parse("file:///app.component.html").unwrap();
    open_document(&backend, &uri, "<h1>{{ 'page.title' | translate }}</h1>").await;

    // 先頭の `<h1>` の上
    let hover = backend.hover(hover_params(&uri, 0, 1)).await.unwrap();

    assert!(hover.is_none());
}

#[tokio::test]
async fn test_hover_before_indexing_reports_loading() {
    let backend = create_test_backend();
    backend.initialize(InitializeParams::default()).await.unwrap();

    let uri = Url::parse("file:///app.component.html").unwrap();
    open_document(&backend, &uri, "<h1>{{ 'page.title' | translate }}</h1>").await;

    let hover = backend.hover(hover_params(&uri, 0, 12)).await.unwrap().unwrap();

    match hover.contents {
        HoverContents::Markup(markup) => {
            assert_eq!(markup.value, "Loading translations...");
        }
        _ => panic!("Expected Markup content"),
    }
}

#[tokio::test]
async fn test_completion_lists_default_language_keys() {
    let temp = workspace_with_translations();
    let backend = initialized_backend(temp.path()).await;

    let params = CompletionParams {
        text_document_position: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier {
                uri: Url::parse("file:///app.component.html").unwrap(),
            },
            position: Position { line: 0, character: 0 },
        },
        work_done_progress_params: WorkDoneProgressParams { work_done_token: None },
        partial_result_params: PartialResultParams::default(),
        context: None,
    };

    let response = backend.completion(params).await.unwrap().unwrap();

    let CompletionResponse::Array(items) = response else {
        panic!("Expected completion array");
    };
    let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
    assert_eq!(labels, ["t:page.title", "t:page.body"]);
    assert_eq!(
        items[0].insert_text.as_deref(),
        Some("{{ 'page.title' | translate }}")
    );
}

#[tokio::test]
async fn test_completion_before_indexing_returns_none() {
    let backend = create_test_backend();
    backend.initialize(InitializeParams::default()).await.unwrap();

    let params = CompletionParams {
        text_document_position: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier {
                uri: Url::parse("file:///app.component.html").unwrap(),
            },
            position: Position { line: 0, character: 0 },
        },
        work_done_progress_params: WorkDoneProgressParams { work_done_token: None },
        partial_result_params: PartialResultParams::default(),
        context: None,
    };

    let response = backend.completion(params).await.unwrap();

    assert!(response.is_none());
}
