//! Translation table editor payload
//!
//! `ngxTranslate.translationsTable` コマンドがクライアントへ返す表形式の
//! データです。クライアント側はこれをそのまま表コンポーネントに描画します。

use serde::Serialize;

use crate::indexer::TranslationIndex;
use crate::input::translation::value_display;

/// All translations as a table: one row per key, one column per language.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TranslationTable {
    pub languages: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// One key with its value in every language. Missing values are empty strings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub key: String,
    pub values: Vec<String>,
}

impl TranslationTable {
    /// インデックスから表を組み立てます。行はキーの初出順です。
    #[must_use]
    pub fn from_index(index: &TranslationIndex) -> Self {
        let rows = index
            .all_keys()
            .into_iter()
            .map(|key| {
                let values = (0..index.languages().len())
                    .map(|language_index| {
                        index.value(language_index, &key).map(value_display).unwrap_or_default()
                    })
                    .collect();
                TableRow { key, values }
            })
            .collect();

        Self { languages: index.languages().to_vec(), rows }
    }
}
