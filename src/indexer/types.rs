//! Indexer type definitions.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::input::translation::{
    TranslationFileError,
    TranslationMap,
    value_is_present,
};

#[derive(Error, Debug)]
pub enum IndexerError {
    /// No directory with the configured name was found under the scan root
    #[error("No '{0}' directory found in the workspace")]
    FolderNotFound(String),
    /// The folder exists but holds no translation files
    #[error("No translation files found in '{0}'")]
    NoTranslationFiles(PathBuf),
    /// Every discovered file failed to parse
    #[error("None of the discovered translation files could be parsed")]
    NothingParsed,
    /// The index has not been built yet
    #[error("Translations are not indexed yet")]
    NotIndexed,
    /// Edit addressed to a language whose file failed to parse
    #[error("Translation file for '{0}' is unavailable")]
    LanguageUnavailable(String),
    /// Edit addressed to a language index outside the file list
    #[error("No language at index {0}")]
    UnknownLanguage(usize),
    /// Rename target already exists
    #[error("Translation key '{0}' already exists")]
    KeyExists(String),
    /// Failure while reading or writing a translation file
    #[error(transparent)]
    File(#[from] TranslationFileError),
    /// Failure while walking the workspace
    #[error("Failed to scan workspace: {0}")]
    Scan(String),
}

/// Completeness of one key across all indexed languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCompleteness {
    /// Present with a non-blank value in every language.
    Complete,
    /// Missing (absent or blank) in a strict subset of languages.
    MissingSome(Vec<String>),
    /// Missing in every language.
    MissingEverywhere,
}

/// An edit against the key/value table, applied to the files on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEdit {
    /// Change the value of `key` for one language.
    SetValue { key: String, language_index: usize, value: String },
    /// Insert `key` with an empty value in every language.
    AddKey { key: String },
    /// Insert `key` with the same value in every language.
    AppendKey { key: String, value: String },
    /// Rename `from` to `to`, keeping values and table position.
    RenameKey { from: String, to: String },
    /// Remove `key` from every language.
    DeleteKey { key: String },
}

/// 翻訳インデックスのスナップショット
///
/// `files` / `languages` / `tables` は同じ長さ・同じ順序の平行リスト。
/// 言語 0 が基準（デフォルト）言語。パースに失敗したファイルのエントリは
/// `None` になります。一度構築されたら不変で、再構築時は丸ごと置き換えます。
#[derive(Debug, Clone, Default)]
pub struct TranslationIndex {
    files: Vec<PathBuf>,
    languages: Vec<String>,
    tables: Vec<Option<TranslationMap>>,
}

impl TranslationIndex {
    /// # Panics
    /// Never panics; lists of differing lengths are truncated to the shortest.
    #[must_use]
    pub fn new(
        files: Vec<PathBuf>,
        languages: Vec<String>,
        tables: Vec<Option<TranslationMap>>,
    ) -> Self {
        debug_assert_eq!(files.len(), languages.len());
        debug_assert_eq!(files.len(), tables.len());
        let len = files.len().min(languages.len()).min(tables.len());
        let mut files = files;
        let mut languages = languages;
        let mut tables = tables;
        files.truncate(len);
        languages.truncate(len);
        tables.truncate(len);
        Self { files, languages, tables }
    }

    /// 少なくとも 1 ファイル見つかり、1 ファイル以上パースに成功していること
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.files.is_empty() && self.tables.iter().any(Option::is_some)
    }

    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    #[must_use]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    #[must_use]
    pub fn tables(&self) -> &[Option<TranslationMap>] {
        &self.tables
    }

    /// The table of the default/reference language (language 0).
    #[must_use]
    pub fn default_table(&self) -> Option<&TranslationMap> {
        self.tables.first().and_then(Option::as_ref)
    }

    /// Value of `key` in the language at `language_index`.
    #[must_use]
    pub fn value(&self, language_index: usize, key: &str) -> Option<&Value> {
        self.tables.get(language_index).and_then(Option::as_ref).and_then(|table| table.get(key))
    }

    /// Per-language presence of `key` (present = non-blank string value).
    ///
    /// The result preserves language order.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Vec<(&str, bool)> {
        self.languages
            .iter()
            .zip(&self.tables)
            .map(|(language, table)| {
                let present =
                    value_is_present(table.as_ref().and_then(|entries| entries.get(key)));
                (language.as_str(), present)
            })
            .collect()
    }

    /// Classify `key` per the completeness contract.
    #[must_use]
    pub fn completeness(&self, key: &str) -> KeyCompleteness {
        let missing: Vec<String> = self
            .lookup(key)
            .into_iter()
            .filter(|(_, present)| !present)
            .map(|(language, _)| language.to_string())
            .collect();

        if missing.is_empty() {
            KeyCompleteness::Complete
        } else if missing.len() == self.languages.len() {
            KeyCompleteness::MissingEverywhere
        } else {
            KeyCompleteness::MissingSome(missing)
        }
    }

    /// Case-insensitive reverse lookup: find a key whose value equals `text`
    /// in any language.
    #[must_use]
    pub fn find_key_by_value(&self, text: &str) -> Option<&str> {
        let needle = text.to_lowercase();
        for table in self.tables.iter().flatten() {
            for (key, value) in table {
                if value.as_str().is_some_and(|s| s.to_lowercase() == needle) {
                    return Some(key);
                }
            }
        }
        None
    }

    /// Apply a table edit, producing a new index.
    ///
    /// Languages whose file failed to parse are skipped by the whole-table
    /// edits and rejected by `SetValue`; persisting an edit never clobbers
    /// a file the server could not read.
    pub fn with_edit(&self, edit: &TableEdit) -> Result<Self, IndexerError> {
        let mut next = self.clone();

        match edit {
            TableEdit::SetValue { key, language_index, value } => {
                let Some(slot) = next.tables.get_mut(*language_index) else {
                    return Err(IndexerError::UnknownLanguage(*language_index));
                };
                let Some(table) = slot.as_mut() else {
                    let language = next
                        .languages
                        .get(*language_index)
                        .cloned()
                        .unwrap_or_default();
                    return Err(IndexerError::LanguageUnavailable(language));
                };
                table.insert(key.clone(), Value::String(value.clone()));
            }
            TableEdit::AddKey { key } => {
                for table in next.tables.iter_mut().flatten() {
                    table.insert(key.clone(), Value::String(String::new()));
                }
            }
            TableEdit::AppendKey { key, value } => {
                for table in next.tables.iter_mut().flatten() {
                    table.insert(key.clone(), Value::String(value.clone()));
                }
            }
            TableEdit::RenameKey { from, to } => {
                if next.tables.iter().flatten().any(|table| table.contains_key(to)) {
                    return Err(IndexerError::KeyExists(to.clone()));
                }
                for table in next.tables.iter_mut().flatten() {
                    *table = rename_key_in_place(table, from, to);
                }
            }
            TableEdit::DeleteKey { key } => {
                for table in next.tables.iter_mut().flatten() {
                    table.shift_remove(key);
                }
            }
        }

        Ok(next)
    }

    /// Union of all keys across languages, in first-seen order.
    #[must_use]
    pub fn all_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for table in self.tables.iter().flatten() {
            for key in table.keys() {
                if seen.insert(key.clone()) {
                    keys.push(key.clone());
                }
            }
        }
        keys
    }
}

/// Rebuild a map with `from` renamed to `to`, keeping its position.
///
/// A map without `from` is returned unchanged.
fn rename_key_in_place(table: &TranslationMap, from: &str, to: &str) -> TranslationMap {
    let mut renamed = TranslationMap::new();
    for (key, value) in table {
        if key == from {
            renamed.insert(to.to_string(), value.clone());
        } else {
            renamed.insert(key.clone(), value.clone());
        }
    }
    renamed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::test_utils::index_from_json;

    #[googletest::test]
    fn test_parallel_lists_share_length_and_order() {
        let index = index_from_json(&[
            ("en", Some(r#"{"a": "A", "b": "B"}"#)),
            ("fr", Some(r#"{"a": "Ah"}"#)),
            ("de", None),
        ]);

        expect_that!(index.files().len(), eq(3));
        expect_that!(index.languages(), elements_are![eq("en"), eq("fr"), eq("de")]);
        expect_that!(index.tables().len(), eq(3));
    }

    #[googletest::test]
    fn test_is_ready() {
        let ready = index_from_json(&[("en", Some("{}"))]);
        let no_parse = index_from_json(&[("en", None)]);
        let empty = TranslationIndex::default();

        expect_that!(ready.is_ready(), eq(true));
        expect_that!(no_parse.is_ready(), eq(false));
        expect_that!(empty.is_ready(), eq(false));
    }

    #[googletest::test]
    fn test_lookup_spec_example() {
        // en.json={"a":"A"}, fr.json={} → "a" は en に存在し fr に欠落
        let index = index_from_json(&[("en", Some(r#"{"a": "A"}"#)), ("fr", Some("{}"))]);

        let presence = index.lookup("a");

        expect_that!(presence, elements_are![eq(&("en", true)), eq(&("fr", false))]);
        expect_that!(
            index.completeness("a"),
            eq(&KeyCompleteness::MissingSome(vec!["fr".to_string()]))
        );
    }

    #[googletest::test]
    fn test_completeness_classification() {
        let index = index_from_json(&[
            ("en", Some(r#"{"full": "A", "partial": "B", "blank": "C"}"#)),
            ("fr", Some(r#"{"full": "Ah", "blank": "  "}"#)),
        ]);

        expect_that!(index.completeness("full"), eq(&KeyCompleteness::Complete));
        expect_that!(
            index.completeness("partial"),
            eq(&KeyCompleteness::MissingSome(vec!["fr".to_string()]))
        );
        // 空白のみの値は欠落扱い
        expect_that!(
            index.completeness("blank"),
            eq(&KeyCompleteness::MissingSome(vec!["fr".to_string()]))
        );
        expect_that!(index.completeness("nope"), eq(&KeyCompleteness::MissingEverywhere));
    }

    #[googletest::test]
    fn test_unparsed_language_counts_as_missing() {
        let index = index_from_json(&[("en", Some(r#"{"a": "A"}"#)), ("de", None)]);

        expect_that!(
            index.completeness("a"),
            eq(&KeyCompleteness::MissingSome(vec!["de".to_string()]))
        );
    }

    #[googletest::test]
    fn test_find_key_by_value_case_insensitive() {
        let index = index_from_json(&[("en", Some(r#"{"greeting": "Hello there"}"#))]);

        expect_that!(index.find_key_by_value("hello THERE"), some(eq("greeting")));
        expect_that!(index.find_key_by_value("missing"), none());
    }

    #[googletest::test]
    fn test_with_edit_set_value() {
        let index = index_from_json(&[("en", Some(r#"{"a": "A"}"#)), ("fr", Some("{}"))]);

        let next = index
            .with_edit(&TableEdit::SetValue {
                key: "a".to_string(),
                language_index: 1,
                value: "Ah".to_string(),
            })
            .unwrap();

        expect_that!(next.value(1, "a").and_then(Value::as_str), some(eq("Ah")));
        // 元のスナップショットは不変
        expect_that!(index.value(1, "a"), none());
    }

    #[googletest::test]
    fn test_with_edit_set_value_unavailable_language() {
        let index = index_from_json(&[("en", Some("{}")), ("de", None)]);

        let result = index.with_edit(&TableEdit::SetValue {
            key: "a".to_string(),
            language_index: 1,
            value: "x".to_string(),
        });

        expect_that!(result, err(pat!(IndexerError::LanguageUnavailable(eq("de")))));
    }

    #[googletest::test]
    fn test_with_edit_append_key_reaches_every_language() {
        let index = index_from_json(&[("en", Some("{}")), ("fr", Some("{}"))]);

        let next = index
            .with_edit(&TableEdit::AppendKey { key: "save".to_string(), value: "Save".to_string() })
            .unwrap();

        expect_that!(next.completeness("save"), eq(&KeyCompleteness::Complete));
    }

    #[googletest::test]
    fn test_with_edit_rename_keeps_position_and_value() {
        let index = index_from_json(&[("en", Some(r#"{"a": "A", "b": "B", "c": "C"}"#))]);

        let next = index
            .with_edit(&TableEdit::RenameKey { from: "b".to_string(), to: "middle".to_string() })
            .unwrap();

        expect_that!(next.all_keys(), elements_are![eq("a"), eq("middle"), eq("c")]);
        expect_that!(next.value(0, "middle").and_then(Value::as_str), some(eq("B")));
    }

    #[googletest::test]
    fn test_with_edit_rename_refuses_existing_target() {
        let index = index_from_json(&[("en", Some(r#"{"a": "A", "b": "B"}"#))]);

        let result =
            index.with_edit(&TableEdit::RenameKey { from: "a".to_string(), to: "b".to_string() });

        expect_that!(result, err(pat!(IndexerError::KeyExists(eq("b")))));
    }

    #[googletest::test]
    fn test_with_edit_delete_key() {
        let index =
            index_from_json(&[("en", Some(r#"{"a": "A", "b": "B"}"#)), ("fr", Some(r#"{"a": "Ah"}"#))]);

        let next = index.with_edit(&TableEdit::DeleteKey { key: "a".to_string() }).unwrap();

        expect_that!(next.all_keys(), elements_are![eq("b")]);
    }

    #[googletest::test]
    fn test_all_keys_first_seen_order() {
        let index = index_from_json(&[
            ("en", Some(r#"{"b": "B", "a": "A"}"#)),
            ("fr", Some(r#"{"a": "Ah", "c": "Ce"}"#)),
        ]);

        expect_that!(index.all_keys(), elements_are![eq("b"), eq("a"), eq("c")]);
    }
}
