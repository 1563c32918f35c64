//! Translation file input definitions
//!
//! 翻訳ファイルはフラットな string → string の JSON オブジェクトです。
//! ファイル名（拡張子なし）が言語識別子になります（例: `en.json` → `en`）。

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Key → value mapping of one translation file.
///
/// Backed by `serde_json::Map` with `preserve_order`, so writing the map
/// back to disk keeps the author's key order.
pub type TranslationMap = serde_json::Map<String, Value>;

#[derive(Error, Debug)]
pub enum TranslationFileError {
    #[error("Failed to read translation file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Translation file is not a JSON object")]
    NotAnObject,
}

/// Derive the language identifier from a translation file path.
///
/// # Examples
/// - `src/assets/i18n/en.json` → `en`
/// - `src/assets/i18n/de-CH.json` → `de-CH`
#[must_use]
pub fn language_from_path(file_path: &Path) -> String {
    file_path.file_stem().map_or_else(String::new, |stem| stem.to_string_lossy().to_string())
}

/// Parse translation file content into a flat key map.
///
/// Nested values are kept as-is; they simply never count as translated
/// (the pipe convention only renders string values).
pub fn parse_translation_map(content: &str) -> Result<TranslationMap, TranslationFileError> {
    let json: Value = serde_json::from_str(content)?;
    match json {
        Value::Object(map) => Ok(map),
        _ => Err(TranslationFileError::NotAnObject),
    }
}

/// Read and parse one translation file.
pub async fn read_translation_file(
    file_path: &Path,
) -> Result<TranslationMap, TranslationFileError> {
    let content = tokio::fs::read_to_string(file_path).await?;
    parse_translation_map(&content)
}

/// Write a translation map back to disk, pretty-printed with 2-space indent.
pub async fn write_translation_file(
    file_path: &Path,
    entries: &TranslationMap,
) -> Result<(), TranslationFileError> {
    let mut content = serde_json::to_string_pretty(&Value::Object(entries.clone()))?;
    content.push('\n');
    tokio::fs::write(file_path, content).await?;
    Ok(())
}

/// Whether a value counts as a usable translation.
///
/// Only non-blank string values do; numbers, objects and blank strings are
/// all treated as untranslated entries.
#[must_use]
pub fn value_is_present(value: Option<&Value>) -> bool {
    value.and_then(Value::as_str).is_some_and(|s| !s.trim().is_empty())
}

/// Display form of a value for hover/completion documentation.
#[must_use]
pub fn value_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
