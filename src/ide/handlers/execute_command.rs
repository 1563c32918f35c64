//! Execute Command ハンドラー
//!
//! `workspace/executeCommand` リクエストを処理し、
//! 翻訳テーブルの照会・編集コマンドを実行します。

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    ExecuteCommandParams,
    MessageType,
    Range,
    ShowDocumentParams,
    TextEdit,
    Url,
    WorkspaceEdit,
};

use super::super::backend::Backend;
use crate::ide::editor::TranslationTable;
use crate::indexer::TableEdit;
use crate::syntax;

/// サーバーが提供するコマンドの一覧
pub const COMMANDS: &[&str] = &[
    "ngxTranslate.updateTranslations",
    "ngxTranslate.openTranslationFiles",
    "ngxTranslate.createTranslationFromSelection",
    "ngxTranslate.translationsTable",
    "ngxTranslate.setTranslation",
    "ngxTranslate.addTranslationKey",
    "ngxTranslate.renameTranslationKey",
    "ngxTranslate.deleteTranslationKey",
];

/// `workspace/executeCommand` リクエストを処理
pub async fn handle_execute_command(
    backend: &Backend,
    params: ExecuteCommandParams,
) -> Result<Option<Value>> {
    tracing::debug!(command = %params.command, "Execute Command request");

    match params.command.as_str() {
        "ngxTranslate.updateTranslations" => {
            backend.reindex_workspace().await;
            Ok(None)
        }
        "ngxTranslate.openTranslationFiles" => handle_open_translation_files(backend).await,
        "ngxTranslate.createTranslationFromSelection" => {
            handle_create_from_selection(backend, params.arguments).await
        }
        "ngxTranslate.translationsTable" => handle_translations_table(backend).await,
        "ngxTranslate.setTranslation" => {
            let Some(args) = parse_args::<SetTranslationArgs>(&params.command, params.arguments)
            else {
                return Ok(None);
            };
            apply_table_edit(
                backend,
                &TableEdit::SetValue {
                    key: args.key,
                    language_index: args.language_index,
                    value: args.value,
                },
            )
            .await
        }
        "ngxTranslate.addTranslationKey" => {
            let Some(args) = parse_args::<AddKeyArgs>(&params.command, params.arguments) else {
                return Ok(None);
            };
            let edit = match args.value {
                Some(value) => TableEdit::AppendKey { key: args.key, value },
                None => TableEdit::AddKey { key: args.key },
            };
            apply_table_edit(backend, &edit).await
        }
        "ngxTranslate.renameTranslationKey" => {
            let Some(args) = parse_args::<RenameKeyArgs>(&params.command, params.arguments) else {
                return Ok(None);
            };
            apply_table_edit(backend, &TableEdit::RenameKey { from: args.from, to: args.to }).await
        }
        "ngxTranslate.deleteTranslationKey" => {
            let Some(args) = parse_args::<DeleteKeyArgs>(&params.command, params.arguments) else {
                return Ok(None);
            };
            apply_table_edit(backend, &TableEdit::DeleteKey { key: args.key }).await
        }
        _ => {
            tracing::warn!("Unknown command: {}", params.command);
            Ok(None)
        }
    }
}

/// `ngxTranslate.setTranslation` コマンドの引数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetTranslationArgs {
    key: String,
    /// 翻訳テーブルの列番号（言語の発見順）
    language_index: usize,
    value: String,
}

/// `ngxTranslate.addTranslationKey` コマンドの引数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddKeyArgs {
    key: String,
    /// 省略時は全言語に空文字列で追加
    value: Option<String>,
}

/// `ngxTranslate.renameTranslationKey` コマンドの引数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenameKeyArgs {
    from: String,
    to: String,
}

/// `ngxTranslate.deleteTranslationKey` コマンドの引数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteKeyArgs {
    key: String,
}

/// `ngxTranslate.createTranslationFromSelection` コマンドの引数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFromSelectionArgs {
    /// 選択があるドキュメントの URI
    uri: String,
    /// 置き換える選択範囲
    range: Range,
    /// 選択中のテキスト（翻訳値になる）
    text: String,
    /// 新しいキー名。省略時は選択テキストの snake_case
    key: Option<String>,
}

/// 最初の引数を JSON オブジェクトとしてパース
fn parse_args<T: serde::de::DeserializeOwned>(command: &str, args: Vec<Value>) -> Option<T> {
    let first = args.into_iter().next()?;
    match serde_json::from_value(first) {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            tracing::warn!(%command, %error, "Invalid command arguments");
            None
        }
    }
}

/// `ngxTranslate.openTranslationFiles` コマンドを実行
///
/// インデックス済みの全翻訳ファイルをエディタで開きます。
async fn handle_open_translation_files(backend: &Backend) -> Result<Option<Value>> {
    let Some(index) = backend.state.indexer.snapshot().await else {
        backend
            .client
            .log_message(MessageType::WARNING, "Translations are not indexed yet")
            .await;
        return Ok(None);
    };

    for file in index.files() {
        let Ok(uri) = Url::from_file_path(file) else {
            tracing::error!("Failed to convert file path to URI: {}", file.display());
            continue;
        };

        let show_result = backend
            .client
            .show_document(ShowDocumentParams {
                uri,
                external: Some(false),
                take_focus: Some(true),
                selection: None,
            })
            .await;

        if let Err(error) = show_result {
            tracing::error!("Failed to show document: {}", error);
        }
    }

    Ok(None)
}

/// `ngxTranslate.translationsTable` コマンドを実行
///
/// 全キー × 全言語の表を JSON で返します。
async fn handle_translations_table(backend: &Backend) -> Result<Option<Value>> {
    let Some(index) = backend.state.indexer.snapshot().await else {
        backend
            .client
            .log_message(MessageType::WARNING, "Translations are not indexed yet")
            .await;
        return Ok(None);
    };

    to_json(&TranslationTable::from_index(&index))
}

/// `ngxTranslate.createTranslationFromSelection` コマンドを実行
///
/// # 動作
/// - 選択テキストが既存の翻訳値と一致する場合: そのキーを再利用
/// - 一致しない場合: snake_case の新キーを作り、全言語に選択テキストで追加
///
/// どちらの場合も選択範囲をパイプマークアップに置き換えます。
async fn handle_create_from_selection(
    backend: &Backend,
    arguments: Vec<Value>,
) -> Result<Option<Value>> {
    let Some(args) =
        parse_args::<CreateFromSelectionArgs>("ngxTranslate.createTranslationFromSelection", arguments)
    else {
        return Ok(None);
    };

    let Ok(uri) = Url::parse(&args.uri) else {
        tracing::warn!("Invalid URI: {}", args.uri);
        return Ok(None);
    };

    let Some(index) = backend.state.indexer.snapshot().await else {
        backend
            .client
            .log_message(MessageType::WARNING, "Translations are not indexed yet")
            .await;
        return Ok(None);
    };

    // 既に同じ値を持つキーがあればそれを使う
    let key = match index.find_key_by_value(&args.text) {
        Some(existing) => existing.to_string(),
        None => {
            let key = args.key.unwrap_or_else(|| syntax::to_snake_case(&args.text));
            let edit = TableEdit::AppendKey { key: key.clone(), value: args.text.clone() };
            if apply_table_edit(backend, &edit).await?.is_none() {
                return Ok(None);
            }
            key
        }
    };

    // 選択範囲をパイプマークアップへ置換
    let text_edit =
        TextEdit { range: args.range, new_text: syntax::translate_template(&key) };
    let mut changes = HashMap::new();
    changes.insert(uri, vec![text_edit]);

    let edit_result = backend
        .client
        .apply_edit(WorkspaceEdit { changes: Some(changes), ..Default::default() })
        .await;

    if let Err(error) = edit_result {
        tracing::error!("Failed to apply workspace edit: {}", error);
    }

    to_json(&serde_json::json!({ "key": key }))
}

/// テーブル編集を適用して永続化し、更新後の表を返す
///
/// 書き込んだファイルのフィンガープリントを取り直すことで、
/// 自分の書き込みによる再インデックスを抑止します。
async fn apply_table_edit(backend: &Backend, edit: &TableEdit) -> Result<Option<Value>> {
    match backend.state.indexer.apply(edit).await {
        Ok(written) => {
            let debouncer = backend.state.debouncer().await;
            for path in &written {
                debouncer.record(path).await;
            }
            backend.publish_all_diagnostics().await;

            match backend.state.indexer.snapshot().await {
                Some(index) => to_json(&TranslationTable::from_index(&index)),
                None => Ok(None),
            }
        }
        Err(error) => {
            tracing::warn!(%error, "Failed to apply table edit");
            backend
                .client
                .log_message(MessageType::ERROR, format!("Failed to update translations: {error}"))
                .await;
            Ok(None)
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Option<Value>> {
    match serde_json::to_value(value) {
        Ok(json) => Ok(Some(json)),
        Err(error) => {
            tracing::error!("Failed to serialize command result: {}", error);
            Ok(None)
        }
    }
}
