//! Hover implementation

use std::fmt::Write as _;

use crate::indexer::{
    KeyCompleteness,
    TranslationIndex,
};
use crate::input::translation::{
    value_display,
    value_is_present,
};

/// Generate hover content for a translation key.
///
/// 言語順（ファイルの発見順）に全言語の値を列挙します。
/// 欠けている言語は `_missing_` と表示します。
/// 全言語に存在しないキーは `None`（ホバーなし）。
#[must_use]
pub fn generate_hover_content(key: &str, index: &TranslationIndex) -> Option<String> {
    if index.completeness(key) == KeyCompleteness::MissingEverywhere {
        return None;
    }

    let mut content = "Translations:\n\n".to_string();
    for (language_index, language) in index.languages().iter().enumerate() {
        let value = index.value(language_index, key);
        let display = if value_is_present(value) {
            value.map(value_display).unwrap_or_default()
        } else {
            "_missing_".to_string()
        };
        let _ = writeln!(content, "**{}:** {display}  ", language.to_uppercase());
    }

    Some(content)
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::test_utils::index_from_json;

    #[googletest::test]
    fn test_hover_lists_all_languages_in_order() {
        let index = index_from_json(&[
            ("en", Some(r#"{"page.title": "Title"}"#)),
            ("fr", Some(r#"{"page.title": "Titre"}"#)),
        ]);

        let content = generate_hover_content("page.title", &index).unwrap_or_default();

        expect_that!(content, contains_substring("**EN:** Title"));
        expect_that!(content, contains_substring("**FR:** Titre"));
        // en（言語 0）が先
        let en_at = content.find("**EN:**");
        let fr_at = content.find("**FR:**");
        expect_that!(en_at.zip(fr_at).is_some_and(|(en, fr)| en < fr), eq(true));
    }

    #[googletest::test]
    fn test_hover_marks_missing_languages() {
        let index = index_from_json(&[("en", Some(r#"{"a": "A"}"#)), ("fr", Some("{}"))]);

        let content = generate_hover_content("a", &index);

        expect_that!(content, some(contains_substring("**FR:** _missing_")));
    }

    #[googletest::test]
    fn test_hover_none_for_unknown_key() {
        let index = index_from_json(&[("en", Some("{}"))]);

        expect_that!(generate_hover_content("nope", &index), none());
    }
}
