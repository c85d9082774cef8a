//! Workspace settings (`.ts-catalog.json`)
/// Settings file loading
mod loader;
/// Settings types and validation
mod types;

pub use types::{
    CONFIG_FILE_NAME,
    CatalogSettings,
    ConfigError,
    TranslationFilesConfig,
    ValidationError,
};
