//! Completion implementation

use std::fmt::Write as _;

use tower_lsp::lsp_types::{
    CompletionItem,
    CompletionItemKind,
    Documentation,
    MarkupContent,
    MarkupKind,
};

use crate::indexer::TranslationIndex;
use crate::input::translation::{
    value_display,
    value_is_present,
};
use crate::syntax::translate_template;

/// Generate completion items for every key of the default language.
///
/// ラベルは `t:` プレフィックス付き。挿入テキストはパイプマークアップ全体
/// （`{{ 'key' | translate }}`）です。
#[must_use]
pub fn generate_completions(index: &TranslationIndex) -> Vec<CompletionItem> {
    let Some(table) = index.default_table() else {
        return Vec::new();
    };

    table
        .keys()
        .map(|key| CompletionItem {
            label: format!("t:{key}"),
            kind: Some(CompletionItemKind::CONSTANT),
            detail: Some(format!("Translation for '{key}'")),
            documentation: Some(Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value: documentation_for(key, index),
            })),
            insert_text: Some(translate_template(key)),
            filter_text: Some(key.clone()),
            ..CompletionItem::default()
        })
        .collect()
}

fn documentation_for(key: &str, index: &TranslationIndex) -> String {
    let mut doc = String::new();
    for (language_index, language) in index.languages().iter().enumerate() {
        let value = index.value(language_index, key);
        if value_is_present(value) {
            let display = value.map(value_display).unwrap_or_default();
            let _ = writeln!(doc, "**{}:** {display}  ", language.to_uppercase());
        }
    }
    doc
}
