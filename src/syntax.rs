//! Template analysis for the `'key' | translate` pipe convention.
//!
//! テンプレートはプレーンテキストとして行単位で正規表現マッチします。
//! 位置情報は LSP の規約に合わせて UTF-16 コードユニットで数えます。

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{
    SourcePosition,
    SourceRange,
};

/// Matches `'some.key' | translate` and captures the key.
static TRANSLATE_PIPE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // パターンは固定でテスト済み
    Regex::new(r"'([^']*)'\s\|\stranslate").unwrap()
});

/// One use of the translate pipe inside a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyUsage {
    /// The translation key between the quotes.
    pub key: String,
    /// Range of the whole pipe expression (`'key' | translate`).
    pub range: SourceRange,
}

#[allow(clippy::cast_possible_truncation)]
fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}

/// Find all translate-pipe usages in a template, in document order.
#[must_use]
pub fn find_usages(text: &str) -> Vec<KeyUsage> {
    let mut usages = Vec::new();

    #[allow(clippy::cast_possible_truncation)]
    for (line_index, line) in text.lines().enumerate() {
        for captures in TRANSLATE_PIPE.captures_iter(line) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            let Some(key) = captures.get(1) else {
                continue;
            };

            let start = utf16_len(&line[..whole.start()]);
            let end = start + utf16_len(whole.as_str());
            usages.push(KeyUsage {
                key: key.as_str().to_string(),
                range: SourceRange::on_line(line_index as u32, start, end),
            });
        }
    }

    usages
}

/// Find the translate-pipe usage covering a position, if any.
#[must_use]
pub fn usage_at_position(text: &str, position: SourcePosition) -> Option<KeyUsage> {
    find_usages(text).into_iter().find(|usage| usage.range.contains(position))
}

/// Template snippet inserted for a key.
#[must_use]
pub fn translate_template(key: &str) -> String {
    format!("{{{{ '{key}' | translate }}}}")
}

/// Suggest a snake_case key name from selected text.
#[must_use]
pub fn to_snake_case(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join("_").to_lowercase()
}
