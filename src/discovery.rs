//! Translation resource discovery
use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;
use thiserror::Error;

use crate::config::CatalogSettings;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The workspace root is missing or not a directory
    #[error("Workspace root is not a directory: {0}")]
    InvalidRoot(PathBuf),
    /// A configured pattern could not be compiled
    #[error("Invalid pattern: {0}")]
    Pattern(String),
}

/// Collect `.ts` resources under `workspace_root` matching the settings.
///
/// TypeScript sources share the `.ts` extension; matching files whose root
/// element is not `<TS>` are skipped with a warning.
///
/// Paths are returned sorted so that load order, and with it the outcome of
/// duplicate resolution, does not depend on directory iteration order.
///
/// # Errors
/// - `workspace_root` is not a directory
/// - A glob pattern is invalid
pub fn find_translation_files(
    workspace_root: &Path,
    settings: &CatalogSettings,
) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !workspace_root.is_dir() {
        return Err(DiscoveryError::InvalidRoot(workspace_root.to_path_buf()));
    }
    tracing::debug!(workspace_root = %workspace_root.display(), "Searching translation files");

    let include_set = build_glob_set(std::slice::from_ref(&settings.translation_files.file_pattern))?;
    let exclude_set = build_glob_set(&settings.exclude_patterns)?;

    let mut found_files = Vec::new();
    for result in WalkBuilder::new(workspace_root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(workspace_root) else {
            continue;
        };
        if !include_set.is_match(relative_path) || exclude_set.is_match(relative_path) {
            continue;
        }

        if !is_translation_resource(path) {
            tracing::warn!(
                path = %path.display(),
                "Skipping .ts file that is not a Qt Linguist resource"
            );
            continue;
        }

        found_files.push(path.to_path_buf());
    }

    found_files.sort();
    tracing::debug!(count = found_files.len(), "Translation files found");

    Ok(found_files)
}

/// Whether the file's root element is `<TS>`.
fn is_translation_resource(path: &Path) -> bool {
    match std::fs::read_to_string(path) {
        Ok(text) => has_ts_root(&text),
        Err(err) => {
            tracing::debug!(path = %path.display(), ?err, "Failed to read candidate file");
            false
        }
    }
}

/// Skips the BOM, XML declaration, comments and doctype, then checks the
/// first start tag.
fn has_ts_root(text: &str) -> bool {
    let mut rest = text.strip_prefix('\u{feff}').unwrap_or(text);
    loop {
        rest = rest.trim_start();
        let skipped = if rest.starts_with("<?") {
            rest.split_once("?>")
        } else if rest.starts_with("<!--") {
            rest.split_once("-->")
        } else if rest.starts_with("<!") {
            rest.split_once('>')
        } else {
            break;
        };
        match skipped {
            Some((_, after)) => rest = after,
            None => return false,
        }
    }

    rest.strip_prefix("<TS")
        .is_some_and(|tail| tail.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/'))
}

/// Compile `patterns` into one set.
fn build_glob_set(patterns: &[String]) -> Result<GlobSet, DiscoveryError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| DiscoveryError::Pattern(format!("'{pattern}': {e}")))?;
        builder.add(glob);
    }
    builder.build().map_err(|e| DiscoveryError::Pattern(e.to_string()))
}
