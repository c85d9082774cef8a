//! Core types used throughout the project.

use std::fmt;

use serde::Serialize;

/// A source-location hint attached to a message (`<location filename=… line=…/>`).
///
/// Advisory only: lupdate records where a string was found, but nothing in
/// lookup depends on it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceLocation {
    /// File name as written by lupdate (usually relative to the `.ts` file).
    pub file: Option<String>,
    /// Line number. lupdate may write relative offsets such as `+3`.
    pub line: Option<i64>,
}

impl SourceLocation {
    #[must_use]
    pub fn new(file: impl Into<String>, line: i64) -> Self {
        Self { file: Some(file.into()), line: Some(line) }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line}"),
            (Some(file), None) => f.write_str(file),
            (None, Some(line)) => write!(f, "<unknown>:{line}"),
            (None, None) => f.write_str("<unknown>"),
        }
    }
}

/// Locale identifier such as `zh_CN`.
///
/// Comparison ignores case and treats `-` and `_` as the same separator, so
/// `zh-CN` and `zh_CN` name the same locale.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The identifier as originally written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased identifier with `-` replaced by `_`.
    #[must_use]
    pub fn normalized(&self) -> String {
        normalize_language_code(&self.0)
    }

    /// Language part of the identifier (`zh` for `zh_CN`).
    #[must_use]
    pub fn language(&self) -> String {
        let normalized = self.normalized();
        normalized.split('_').next().unwrap_or_default().to_string()
    }

    /// Whether `code` names this locale.
    #[must_use]
    pub fn matches(&self, code: &str) -> bool {
        self.normalized() == normalize_language_code(code)
    }
}

impl PartialEq for Locale {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl Eq for Locale {}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize language code (lowercase and replace - with _)
#[must_use]
pub fn normalize_language_code(code: &str) -> String {
    code.trim().to_lowercase().replace('-', "_")
}
