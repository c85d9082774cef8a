//! Reading workspace settings

use std::io::ErrorKind;
use std::path::Path;

use super::{
    CONFIG_FILE_NAME,
    CatalogSettings,
    ConfigError,
};

impl CatalogSettings {
    /// Settings for `workspace_root` with the command line locale applied.
    ///
    /// Defaults are used when the workspace has no settings file. Validation
    /// runs on the merged result, so an override replaces an invalid locale
    /// from the file.
    ///
    /// # Errors
    /// - The settings file cannot be read or is not valid JSON
    /// - The merged settings fail validation
    pub fn load(workspace_root: &Path, locale_override: Option<&str>) -> Result<Self, ConfigError> {
        let mut settings = read_settings_file(workspace_root)?.unwrap_or_default();

        if let Some(locale) = locale_override {
            tracing::debug!(locale, "Locale overridden on the command line");
            settings.locale = Some(locale.to_string());
        }

        settings.validate().map_err(ConfigError::ValidationErrors)?;
        tracing::debug!(?settings, "Settings loaded");

        Ok(settings)
    }
}

/// `.ts-catalog.json` in `workspace_root`, `None` when there is none.
fn read_settings_file(workspace_root: &Path) -> Result<Option<CatalogSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %config_path.display(), "No settings file");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::debug!(path = %config_path.display(), "Reading settings file");
    Ok(Some(serde_json::from_str(&content)?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::catalog::DuplicatePolicy;

    fn workspace(config: Option<&str>) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        if let Some(config) = config {
            fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config).unwrap();
        }
        temp_dir
    }

    #[rstest]
    fn test_load_without_settings_file_uses_defaults() {
        let temp_dir = workspace(None);

        let settings = CatalogSettings::load(temp_dir.path(), None).unwrap();

        assert_eq!(settings.translation_files.file_pattern, "**/*.ts");
        assert_eq!(settings.duplicate_keys, DuplicatePolicy::LastWins);
        assert!(settings.locale.is_none());
    }

    #[rstest]
    fn test_load_reads_settings_file() {
        let temp_dir = workspace(Some(r#"{"locale": "zh_CN", "duplicateKeys": "error"}"#));

        let settings = CatalogSettings::load(temp_dir.path(), None).unwrap();

        assert_eq!(settings.locale.as_deref(), Some("zh_CN"));
        assert_eq!(settings.duplicate_keys, DuplicatePolicy::Error);
    }

    #[rstest]
    #[case(None, "ja_JP")]
    #[case(Some(r#"{"locale": "zh_CN"}"#), "ja_JP")]
    #[case(Some(r#"{"locale": ""}"#), "ja_JP")]
    fn test_load_locale_override_wins(#[case] config: Option<&str>, #[case] locale: &str) {
        let temp_dir = workspace(config);

        let settings = CatalogSettings::load(temp_dir.path(), Some(locale)).unwrap();

        assert_eq!(settings.locale.as_deref(), Some(locale));
    }

    #[rstest]
    fn test_load_invalid_settings_fail_validation() {
        let temp_dir = workspace(Some(r#"{"locale": ""}"#));

        let result = CatalogSettings::load(temp_dir.path(), None);

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
    }

    #[rstest]
    fn test_load_invalid_override_fails_validation() {
        let temp_dir = workspace(None);

        let result = CatalogSettings::load(temp_dir.path(), Some("zh CN"));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
    }

    #[rstest]
    fn test_load_invalid_json() {
        let temp_dir = workspace(Some("invalid json"));

        let result = CatalogSettings::load(temp_dir.path(), None);

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
