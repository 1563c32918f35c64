//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use crate::indexer::TranslationIndex;
use crate::input::translation::parse_translation_map;

/// テスト用の `TranslationIndex` を作成する
///
/// # Arguments
/// * `entries` - (言語, JSON テキスト) の並び。`None` はパース失敗を表す
pub(crate) fn index_from_json(entries: &[(&str, Option<&str>)]) -> TranslationIndex {
    let files: Vec<PathBuf> =
        entries.iter().map(|(lang, _)| PathBuf::from(format!("/ws/src/i18n/{lang}.json"))).collect();
    let languages: Vec<String> = entries.iter().map(|(lang, _)| (*lang).to_string()).collect();
    let tables = entries
        .iter()
        .map(|(_, json)| json.map(|text| parse_translation_map(text).unwrap()))
        .collect();

    TranslationIndex::new(files, languages, tables)
}
