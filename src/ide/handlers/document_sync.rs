//! Document synchronization handlers.

use tower_lsp::lsp_types::{
    DidChangeTextDocumentParams,
    DidCloseTextDocumentParams,
    DidOpenTextDocumentParams,
    DidSaveTextDocumentParams,
};

use super::super::backend::Backend;

pub async fn handle_did_open(backend: &Backend, params: DidOpenTextDocumentParams) {
    let uri = params.text_document.uri;
    let text = params.text_document.text;

    {
        let mut documents = backend.state.documents.lock().await;
        documents.insert(uri.clone(), text.clone());
    }

    backend.publish_diagnostics_for(uri, &text).await;
}

pub async fn handle_did_change(backend: &Backend, params: DidChangeTextDocumentParams) {
    let uri = params.text_document.uri;

    // FULL sync なので最後の変更が全文
    let Some(change) = params.content_changes.into_iter().next_back() else {
        return;
    };
    let text = change.text;

    {
        let mut documents = backend.state.documents.lock().await;
        documents.insert(uri.clone(), text.clone());
    }

    backend.publish_diagnostics_for(uri, &text).await;
}

pub async fn handle_did_save(backend: &Backend, params: DidSaveTextDocumentParams) {
    let uri = params.text_document.uri;

    let Some(path) = Backend::uri_to_path(&uri) else {
        return;
    };

    // 翻訳ファイルの保存はデバウンス付きで再インデックス
    if backend.is_translation_file(&path).await {
        tracing::debug!(path = %path.display(), "Translation file saved");
        backend.schedule_reindex(vec![path]).await;
    }
}

pub async fn handle_did_close(backend: &Backend, params: DidCloseTextDocumentParams) {
    let uri = params.text_document.uri;

    let mut documents = backend.state.documents.lock().await;
    documents.remove(&uri);
}
