//! Published catalog shared with UI readers.

use std::path::Path;
use std::sync::{
    Arc,
    PoisonError,
    RwLock,
};

use super::{
    Catalog,
    CatalogError,
    DuplicatePolicy,
    substitute_args,
};

/// Single handle through which readers reach the active catalog.
///
/// Readers take an `Arc<Catalog>` snapshot; a locale switch publishes a whole
/// new catalog, so a reader either sees the old table or the new one, never a
/// mix. The handle starts unloaded.
#[derive(Debug, Clone, Default)]
pub struct CatalogHandle {
    /// Active catalog, `None` until the first load.
    current: Arc<RwLock<Option<Arc<Catalog>>>>,
}

impl CatalogHandle {
    /// Create an unloaded handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle publishing `catalog`.
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self { current: Arc::new(RwLock::new(Some(Arc::new(catalog)))) }
    }

    /// Snapshot of the active catalog.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Catalog>> {
        // Only an `Option<Arc>` is stored, so a poisoned lock still holds a
        // consistent value.
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.current.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Publish `catalog`, returning the previously active one.
    pub fn replace(&self, catalog: Catalog) -> Option<Arc<Catalog>> {
        let catalog = Arc::new(catalog);
        tracing::debug!(locale = %catalog.locale(), "Publishing translation catalog");
        self.current.write().unwrap_or_else(PoisonError::into_inner).replace(catalog)
    }

    /// Load `resource_paths` for `locale` and publish the result.
    ///
    /// The new catalog is built before anything is published; if loading
    /// fails the active catalog stays in place.
    ///
    /// # Errors
    /// Same as [`Catalog::load_with_policy`].
    pub fn reload<P: AsRef<Path>>(
        &self,
        resource_paths: &[P],
        locale: &str,
        policy: DuplicatePolicy,
    ) -> Result<(), CatalogError> {
        let catalog = Catalog::load_with_policy(resource_paths, locale, policy).inspect_err(|e| {
            tracing::warn!(locale, error = %e, "Keeping previous catalog after failed reload");
        })?;
        self.replace(catalog);
        Ok(())
    }

    /// [`Catalog::resolve`] against the active catalog; an unloaded handle
    /// resolves to the source string.
    #[must_use]
    pub fn resolve(&self, context: &str, source: &str, args: &[&str]) -> String {
        self.current().map_or_else(
            || substitute_args(source, args),
            |catalog| catalog.resolve(context, source, args),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;
    use std::thread;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    const ZH_CN: &str = r#"<TS version="2.1" language="zh_CN"><context><name>top_toolbar</name>
<message><source>Convert (&amp;C)</source><translation>转换 (&amp;C)</translation></message>
</context></TS>"#;

    const JA_JP: &str = r#"<TS version="2.1" language="ja_JP"><context><name>top_toolbar</name>
<message><source>Convert (&amp;C)</source><translation>変換 (&amp;C)</translation></message>
</context></TS>"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[rstest]
    fn test_unloaded_handle_resolves_to_source() {
        let handle = CatalogHandle::new();

        assert!(!handle.is_loaded());
        assert_eq!(handle.resolve("top_toolbar", "Open %1", &["a.ust"]), "Open a.ust");
    }

    #[rstest]
    fn test_reload_switches_locale() {
        let dir = TempDir::new().unwrap();
        let zh = write(&dir, "app-zh_CN.ts", ZH_CN);
        let ja = write(&dir, "app-ja_JP.ts", JA_JP);
        let handle = CatalogHandle::new();

        handle.reload(&[&zh], "zh_CN", DuplicatePolicy::LastWins).unwrap();
        let before = handle.current().unwrap();
        handle.reload(&[&ja], "ja_JP", DuplicatePolicy::LastWins).unwrap();

        assert_eq!(handle.resolve("top_toolbar", "Convert (&C)", &[]), "変換 (&C)");
        // Snapshots taken before the switch stay intact.
        assert_eq!(before.resolve("top_toolbar", "Convert (&C)", &[]), "转换 (&C)");
    }

    #[rstest]
    fn test_failed_reload_keeps_previous_catalog() {
        let dir = TempDir::new().unwrap();
        let zh = write(&dir, "app-zh_CN.ts", ZH_CN);
        let broken = write(&dir, "broken.ts", "<TS version=\"2.1\">");
        let handle = CatalogHandle::new();
        handle.reload(&[&zh], "zh_CN", DuplicatePolicy::LastWins).unwrap();

        let result = handle.reload(&[&broken], "zh_CN", DuplicatePolicy::LastWins);

        assert!(result.is_err());
        assert_eq!(handle.resolve("top_toolbar", "Convert (&C)", &[]), "转换 (&C)");
    }

    #[rstest]
    fn test_readers_on_other_threads_see_whole_catalogs() {
        let dir = TempDir::new().unwrap();
        let zh = write(&dir, "app-zh_CN.ts", ZH_CN);
        let ja = write(&dir, "app-ja_JP.ts", JA_JP);
        let handle = CatalogHandle::new();
        handle.reload(&[&zh], "zh_CN", DuplicatePolicy::LastWins).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let handle = handle.clone();
                thread::spawn(move || {
                    (0..200)
                        .map(|_| handle.resolve("top_toolbar", "Convert (&C)", &[]))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handle.reload(&[&ja], "ja_JP", DuplicatePolicy::LastWins).unwrap();

        for reader in readers {
            for value in reader.join().unwrap() {
                assert!(value == "转换 (&C)" || value == "変換 (&C)", "unexpected {value}");
            }
        }
    }
}
