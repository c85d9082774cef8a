use std::path::PathBuf;

use thiserror::Error;

use crate::input::ResourceParseError;

/// Two messages with the same key disagree while duplicates are rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("duplicate message '{source_text}' in context '{context}'{}", describe_comment(.comment.as_deref()))]
pub struct DuplicateKeyError {
    pub context: String,
    /// Source string of the conflicting message.
    pub source_text: String,
    pub comment: Option<String>,
    /// Resource the second occurrence came from, when loaded from disk.
    pub path: Option<PathBuf>,
}

/// ` (comment '…')` suffix for error messages.
fn describe_comment(comment: Option<&str>) -> String {
    comment.map(|comment| format!(" (comment '{comment}')")).unwrap_or_default()
}

/// Errors from building a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read translation resource {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed translation resource: {0}")]
    ResourceParse(#[from] ResourceParseError),

    #[error("Ambiguous translation resource: {0}")]
    DuplicateKey(#[from] DuplicateKeyError),
}
