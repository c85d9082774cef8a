use std::path::PathBuf;

use thiserror::Error;

/// A `.ts` resource that could not be turned into a document.
///
/// Covers both XML well-formedness problems and violations of the `.ts`
/// structure (root element, required attributes and elements).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}:{line}:{column}: {message}", .path.display())]
pub struct ResourceParseError {
    /// Resource the error was found in.
    pub path: PathBuf,
    /// 1-based line of the offending construct.
    pub line: usize,
    /// 1-based column (in characters) of the offending construct.
    pub column: usize,
    pub message: String,
}

impl ResourceParseError {
    /// Locate a byte `offset` of `text` as line and column.
    #[must_use]
    pub fn at_offset(
        path: impl Into<PathBuf>,
        text: &str,
        offset: usize,
        message: impl Into<String>,
    ) -> Self {
        let prefix = text.get(..offset).unwrap_or(text);
        let line = prefix.matches('\n').count() + 1;
        let line_start = prefix.rfind('\n').map_or(0, |index| index + 1);
        let column = prefix.get(line_start..).map_or(0, |rest| rest.chars().count()) + 1;

        Self { path: path.into(), line, column, message: message.into() }
    }
}
