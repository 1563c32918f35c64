//! 診断メッセージ生成モジュール

use tower_lsp::lsp_types::{
    Diagnostic,
    DiagnosticSeverity,
    NumberOrString,
};

use crate::indexer::{
    KeyCompleteness,
    TranslationIndex,
};
use crate::syntax;

/// Diagnostic source shown by the editor.
const SOURCE: &str = "ngx-translate";

/// テンプレートの診断メッセージを生成
///
/// テンプレート内の各 translate パイプのキーを翻訳インデックスと
/// 突き合わせます：
/// - 全言語に存在 → 診断なし
/// - 一部の言語に欠落 → Warning（欠けている言語を列挙）
/// - 全言語に欠落 → Error
pub fn generate_diagnostics(text: &str, index: &TranslationIndex) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for usage in syntax::find_usages(text) {
        // 空のキーはスキップ（補完中の状態）
        if usage.key.is_empty() {
            continue;
        }

        let diagnostic = match index.completeness(&usage.key) {
            KeyCompleteness::Complete => None,
            KeyCompleteness::MissingEverywhere => Some(Diagnostic {
                range: usage.range.into(),
                severity: Some(DiagnosticSeverity::ERROR),
                code: Some(NumberOrString::String("key-doesnt-exist".to_string())),
                source: Some(SOURCE.to_string()),
                message: format!("Translation key '{}' doesn't exist", usage.key),
                ..Diagnostic::default()
            }),
            KeyCompleteness::MissingSome(languages) => Some(Diagnostic {
                range: usage.range.into(),
                severity: Some(DiagnosticSeverity::WARNING),
                code: Some(NumberOrString::String("key-not-fully-implemented".to_string())),
                source: Some(SOURCE.to_string()),
                message: format!(
                    "Translation key '{}' isn't implemented in languages: {}",
                    usage.key,
                    languages.join(", ")
                ),
                ..Diagnostic::default()
            }),
        };

        if let Some(diagnostic) = diagnostic {
            diagnostics.push(diagnostic);
        }
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::test_utils::index_from_json;

    #[googletest::test]
    fn test_complete_key_yields_no_diagnostic() {
        let index = index_from_json(&[
            ("en", Some(r#"{"page.title": "Title"}"#)),
            ("fr", Some(r#"{"page.title": "Titre"}"#)),
        ]);
        let text = "{{ 'page.title' | translate }}";

        expect_that!(generate_diagnostics(text, &index), empty());
    }

    #[googletest::test]
    fn test_missing_everywhere_is_error() {
        let index = index_from_json(&[("en", Some("{}")), ("fr", Some("{}"))]);
        let text = "{{ 'nope' | translate }}";

        let diagnostics = generate_diagnostics(text, &index);

        expect_that!(
            diagnostics,
            elements_are![all![
                field!(Diagnostic.severity, some(eq(&DiagnosticSeverity::ERROR))),
                field!(Diagnostic.message, contains_substring("'nope' doesn't exist")),
            ]]
        );
    }

    #[googletest::test]
    fn test_missing_subset_warns_naming_exactly_that_subset() {
        // 仕様の例: en.json={"a":"A"}, fr.json={} → fr を名指しする警告
        let index = index_from_json(&[("en", Some(r#"{"a": "A"}"#)), ("fr", Some("{}"))]);
        let text = "{{ 'a' | translate }}";

        let diagnostics = generate_diagnostics(text, &index);

        expect_that!(
            diagnostics,
            elements_are![all![
                field!(Diagnostic.severity, some(eq(&DiagnosticSeverity::WARNING))),
                field!(
                    Diagnostic.message,
                    eq("Translation key 'a' isn't implemented in languages: fr")
                ),
            ]]
        );
    }

    #[googletest::test]
    fn test_blank_value_counts_as_missing() {
        let index =
            index_from_json(&[("en", Some(r#"{"a": "A"}"#)), ("fr", Some(r#"{"a": ""}"#))]);
        let text = "{{ 'a' | translate }}";

        let diagnostics = generate_diagnostics(text, &index);

        expect_that!(
            diagnostics,
            elements_are![field!(Diagnostic.message, contains_substring("languages: fr"))]
        );
    }

    #[googletest::test]
    fn test_empty_key_is_skipped() {
        let index = index_from_json(&[("en", Some("{}"))]);
        let text = "{{ '' | translate }}";

        expect_that!(generate_diagnostics(text, &index), empty());
    }

    #[googletest::test]
    fn test_diagnostic_range_covers_the_pipe() {
        let index = index_from_json(&[("en", Some("{}"))]);
        let text = "<h1>{{ 'x' | translate }}</h1>";

        let diagnostics = generate_diagnostics(text, &index);

        expect_that!(diagnostics.first().map(|d| d.range.start.character), some(eq(7)));
        expect_that!(diagnostics.first().map(|d| d.range.end.character), some(eq(22)));
    }
}
