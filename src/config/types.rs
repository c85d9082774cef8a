use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::catalog::DuplicatePolicy;

/// Settings file looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = ".ts-catalog.json";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "excludePatterns[0]")
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

/// Numbered list, one error per line.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    pub translation_files: TranslationFilesConfig,

    /// Workspace-relative globs excluded from discovery.
    pub exclude_patterns: Vec<String>,

    /// Active locale (e.g. `zh_CN`).
    ///
    /// - `None`: the `language` of the first discovered resource is used
    /// - `Some(..)`: only resources for this locale are loaded
    pub locale: Option<String>,

    /// What to do when two messages share a key but disagree.
    pub duplicate_keys: DuplicatePolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    pub file_pattern: String,
}

impl CatalogSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Malformed locale identifier
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.translation_files.file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.filePattern",
                "The pattern cannot be empty. Example: \"**/translations/*.ts\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.translation_files.file_pattern) {
            errors.push(ValidationError::new(
                "translationFiles.filePattern",
                format!("Invalid glob pattern '{}': {e}", self.translation_files.file_pattern),
            ));
        }

        for (index, pattern) in self.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if let Some(locale) = &self.locale {
            if locale.is_empty() {
                errors.push(ValidationError::new(
                    "locale",
                    "The locale cannot be empty. Please specify a locale (e.g., \"zh_CN\"), or remove this field",
                ));
            } else if !is_locale_identifier(locale) {
                errors.push(ValidationError::new(
                    "locale",
                    format!(
                        "Invalid locale '{locale}'. Use letters, digits, '_' or '-' (e.g., \"zh_CN\")"
                    ),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// `zh_CN`, `pt-BR`, `sr_RS@latin`, …
fn is_locale_identifier(locale: &str) -> bool {
    locale.starts_with(|c: char| c.is_ascii_alphabetic())
        && locale.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '@'))
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self { file_pattern: "**/*.ts".to_string() }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            translation_files: TranslationFilesConfig::default(),
            exclude_patterns: vec!["target/**".to_string(), "node_modules/**".to_string()],
            locale: None,
            duplicate_keys: DuplicatePolicy::default(),
        }
    }
}
