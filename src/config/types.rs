use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "translationsFolder")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// ngx-translate サーバーの設定
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslateSettings {
    /// Name of the directory holding the translation dictionaries.
    pub translations_folder: String,

    /// Extension of the translation files (without the dot).
    pub file_extension: String,

    /// Directory under the workspace root where scanning starts.
    /// Falls back to the workspace root when the directory does not exist.
    pub source_root: String,

    /// Quiet window for coalescing file change notifications.
    pub debounce_ms: u64,
}

impl TranslateSettings {
    /// # Errors
    /// - Required field is empty
    /// - Extension written with a leading dot
    /// - Zero debounce window
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.translations_folder.is_empty() {
            errors.push(ValidationError::new(
                "translationsFolder",
                "The folder name cannot be empty. Example: \"i18n\"",
            ));
        }

        if self.file_extension.is_empty() {
            errors.push(ValidationError::new(
                "fileExtension",
                "The extension cannot be empty. Example: \"json\"",
            ));
        } else if self.file_extension.starts_with('.') {
            errors.push(ValidationError::new(
                "fileExtension",
                format!(
                    "The extension must be given without a leading dot. Did you mean \"{}\"?",
                    self.file_extension.trim_start_matches('.')
                ),
            ));
        }

        if self.source_root.is_empty() {
            errors.push(ValidationError::new(
                "sourceRoot",
                "The source root cannot be empty. Example: \"src\"",
            ));
        }

        if self.debounce_ms == 0 {
            errors.push(ValidationError::new(
                "debounceMs",
                "The quiet window must be at least 1 millisecond",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for TranslateSettings {
    fn default() -> Self {
        Self {
            translations_folder: "i18n".to_string(),
            file_extension: "json".to_string(),
            source_root: "src".to_string(),
            debounce_ms: 100,
        }
    }
}
