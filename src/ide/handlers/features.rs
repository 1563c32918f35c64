//! LSP 機能ハンドラー
//!
//! `completion` と `hover` の処理を担当します。

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CompletionParams,
    CompletionResponse,
    Hover,
    HoverContents,
    HoverParams,
    MarkupContent,
    MarkupKind,
};

use super::super::backend::Backend;
use crate::ide::completion::generate_completions;
use crate::ide::hover::generate_hover_content;
use crate::syntax;
use crate::types::SourcePosition;

/// `textDocument/completion` リクエストを処理
pub async fn handle_completion(
    backend: &Backend,
    params: CompletionParams,
) -> Result<Option<CompletionResponse>> {
    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    tracing::debug!(uri = %uri, line = position.line, character = position.character, "Completion request");

    let Some(index) = backend.state.indexer.snapshot().await else {
        tracing::debug!("Completion request - translations not indexed yet");
        return Ok(None);
    };

    let items = generate_completions(&index);

    tracing::debug!("Generated {} completion items", items.len());

    if items.is_empty() { Ok(None) } else { Ok(Some(CompletionResponse::Array(items))) }
}

/// `textDocument/hover` リクエストを処理
pub async fn handle_hover(backend: &Backend, params: HoverParams) -> Result<Option<Hover>> {
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    tracing::debug!(uri = %uri, line = position.line, character = position.character, "Hover request");

    // カーソルがパイプマークアップ上にあるかを見る
    let text = {
        let documents = backend.state.documents.lock().await;
        documents.get(&uri).cloned()
    };
    let Some(text) = text else {
        tracing::debug!("Document not open: {}", uri);
        return Ok(None);
    };

    let source_position = SourcePosition::from(position);
    let Some(usage) = syntax::usage_at_position(&text, source_position) else {
        tracing::debug!("No translation key found at position");
        return Ok(None);
    };

    // 初回インデックスが終わっていなければその旨だけ表示する
    let Some(index) = backend.state.indexer.snapshot().await else {
        return Ok(Some(markdown_hover("Loading translations...".to_string())));
    };

    let Some(hover_text) = generate_hover_content(&usage.key, &index) else {
        tracing::debug!("No translations found for key: {}", usage.key);
        return Ok(None);
    };

    tracing::debug!("Generated hover content for key: {}", usage.key);

    Ok(Some(markdown_hover(hover_text)))
}

fn markdown_hover(value: String) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent { kind: MarkupKind::Markdown, value }),
        range: None,
    }
}
