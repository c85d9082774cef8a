//! Translation catalog: `(context, source, args) → display string`.
//!
//! A [`Catalog`] is built once from the `.ts` resources of one locale and is
//! immutable afterwards, so it can be shared between any number of readers.
//! Lookups never fail: whenever no usable translation exists the source
//! string itself is displayed.
//!
//! # Duplicates
//!
//! Messages are keyed by `(context, source, disambiguation comment)`. Two
//! occurrences of a key with identical status and translation always
//! collapse into one entry whose locations are the union of both. Occurrences
//! that disagree are resolved by [`DuplicatePolicy`]: the default
//! [`DuplicatePolicy::LastWins`] lets the later occurrence (later message in a
//! file, or a file later in the load order) replace the earlier one, which
//! makes the newest snapshot authoritative.

mod coverage;
mod error;
mod handle;
mod message;
mod placeholder;
mod plural;

use std::collections::HashMap;
use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};

pub use coverage::{
    ContextCoverage,
    CoverageReport,
};
pub use error::{
    CatalogError,
    DuplicateKeyError,
};
pub use handle::CatalogHandle;
pub use message::{
    Message,
    MessageKey,
    MessageState,
    TranslationText,
};
pub use placeholder::{
    substitute_args,
    substitute_count,
};
pub use plural::PluralRule;

use crate::input::{
    TsDocument,
    parse_ts,
};
use crate::types::Locale;

/// How conflicting duplicate messages are handled while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicatePolicy {
    /// The later occurrence replaces the earlier one.
    #[default]
    LastWins,
    /// Loading fails with [`DuplicateKeyError`].
    Error,
}

/// Messages of one context, keyed by source string.
///
/// The same source may appear once per disambiguation comment, so each source
/// maps to a (tiny) list of messages.
#[derive(Debug, Clone, Default)]
struct ContextTable {
    /// Source string → messages with that source.
    messages: HashMap<String, Vec<Message>>,
}

impl ContextTable {
    /// Message with exactly this source and comment.
    fn get(&self, source: &str, comment: Option<&str>) -> Option<&Message> {
        self.messages.get(source)?.iter().find(|message| message.comment.as_deref() == comment)
    }

    /// Mutable variant of [`ContextTable::get`].
    fn get_mut(&mut self, source: &str, comment: Option<&str>) -> Option<&mut Message> {
        self.messages
            .get_mut(source)?
            .iter_mut()
            .find(|message| message.comment.as_deref() == comment)
    }

    /// Insert a message known not to be present yet.
    fn insert(&mut self, message: Message) {
        self.messages.entry(message.source.clone()).or_default().push(message);
    }

    /// Number of messages.
    fn len(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    /// All messages, in no particular order.
    fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.values().flatten()
    }
}

/// Immutable translation table for one locale.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Locale the catalog was loaded for.
    locale: Locale,
    /// `sourcelanguage` of the first resource declaring one.
    source_locale: Option<Locale>,
    /// Plural rule derived from `locale`.
    plural_rule: PluralRule,
    /// Context name → messages.
    contexts: HashMap<String, ContextTable>,
}

impl Catalog {
    /// An empty catalog: every lookup resolves to its source string.
    #[must_use]
    pub fn empty(locale: &str) -> Self {
        let locale = Locale::new(locale);
        Self {
            plural_rule: PluralRule::for_locale(&locale),
            locale,
            source_locale: None,
            contexts: HashMap::new(),
        }
    }

    /// Load `.ts` resources for `locale` with [`DuplicatePolicy::LastWins`].
    ///
    /// Resources are applied in the given order. Resources declaring a
    /// different `language` are skipped.
    ///
    /// # Errors
    /// - A resource cannot be read
    /// - A resource is malformed
    pub fn load<P: AsRef<Path>>(resource_paths: &[P], locale: &str) -> Result<Self, CatalogError> {
        Self::load_with_policy(resource_paths, locale, DuplicatePolicy::default())
    }

    /// Load `.ts` resources for `locale`, handling duplicates per `policy`.
    ///
    /// # Errors
    /// - A resource cannot be read
    /// - A resource is malformed
    /// - `policy` is [`DuplicatePolicy::Error`] and two messages conflict
    pub fn load_with_policy<P: AsRef<Path>>(
        resource_paths: &[P],
        locale: &str,
        policy: DuplicatePolicy,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::empty(locale);

        for path in resource_paths {
            let path = path.as_ref();
            tracing::debug!(path = %path.display(), "Loading translation resource");

            let text = std::fs::read_to_string(path)
                .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
            let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

            let document = parse_ts(text, path)?;
            catalog.add_document(&document, policy, Some(path))?;
        }

        tracing::debug!(
            locale = %catalog.locale,
            contexts = catalog.contexts.len(),
            messages = catalog.len(),
            "Translation catalog loaded"
        );

        Ok(catalog)
    }

    /// Build a catalog from already parsed documents.
    ///
    /// # Errors
    /// `policy` is [`DuplicatePolicy::Error`] and two messages conflict.
    pub fn from_documents<'a>(
        documents: impl IntoIterator<Item = &'a TsDocument>,
        locale: &str,
        policy: DuplicatePolicy,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::empty(locale);
        for document in documents {
            catalog.add_document(document, policy, None)?;
        }
        Ok(catalog)
    }

    /// Merge one document into the table.
    fn add_document(
        &mut self,
        document: &TsDocument,
        policy: DuplicatePolicy,
        path: Option<&Path>,
    ) -> Result<(), DuplicateKeyError> {
        if let Some(language) = &document.language
            && !self.locale.matches(language)
        {
            tracing::warn!(
                path = ?path,
                language = %language,
                locale = %self.locale,
                "Skipping translation resource for another locale"
            );
            return Ok(());
        }

        if let Some(source_language) = &document.source_language {
            let current =
                self.source_locale.get_or_insert_with(|| Locale::new(source_language.as_str()));
            if !current.matches(source_language) {
                tracing::warn!(
                    path = ?path,
                    source_language = %source_language,
                    current = %current,
                    "Translation resources disagree on the source language"
                );
            }
        }

        for context in &document.contexts {
            let table = self.contexts.entry(context.name.clone()).or_default();

            for ts_message in &context.messages {
                let message = Message::from(ts_message);
                let Some(existing) = table.get_mut(&message.source, message.comment.as_deref())
                else {
                    table.insert(message);
                    continue;
                };

                if existing.state != message.state && policy == DuplicatePolicy::Error {
                    return Err(DuplicateKeyError {
                        context: context.name.clone(),
                        source_text: message.source,
                        comment: message.comment,
                        path: path.map(Path::to_path_buf),
                    });
                }

                if existing.state != message.state {
                    tracing::debug!(
                        context = %context.name,
                        source = %message.source,
                        "Later duplicate message replaces earlier translation"
                    );
                }
                existing.absorb(message);
            }
        }

        Ok(())
    }

    /// Resolve `source` in `context` and substitute `%1`, `%2`, … with `args`.
    ///
    /// Falls back to `source` when the context or message is unknown, the
    /// message is vanished or obsolete, or the translation is empty.
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    ///
    /// use qt_ts_catalog::catalog::{Catalog, DuplicatePolicy};
    /// use qt_ts_catalog::input::parse_ts;
    ///
    /// let document = parse_ts(
    ///     r#"<TS version="2.1" language="zh_CN"><context><name>top_toolbar</name>
    ///        <message><source>Convert (&amp;C)</source><translation>转换 (&amp;C)</translation></message>
    ///        </context></TS>"#,
    ///     Path::new("zh_CN.ts"),
    /// )
    /// .unwrap();
    /// let catalog = Catalog::from_documents([&document], "zh_CN", DuplicatePolicy::LastWins).unwrap();
    ///
    /// assert_eq!(catalog.resolve("top_toolbar", "Convert (&C)", &[]), "转换 (&C)");
    /// assert_eq!(catalog.resolve("top_toolbar", "Nonexistent Key", &[]), "Nonexistent Key");
    /// ```
    #[must_use]
    pub fn resolve(&self, context: &str, source: &str, args: &[&str]) -> String {
        self.resolve_with(context, source, None, args)
    }

    /// Like [`Catalog::resolve`] for a message carrying a disambiguation comment.
    #[must_use]
    pub fn resolve_disambiguated(
        &self,
        context: &str,
        source: &str,
        comment: &str,
        args: &[&str],
    ) -> String {
        self.resolve_with(context, source, Some(comment), args)
    }

    /// Resolve with an optional disambiguation comment.
    fn resolve_with(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        args: &[&str],
    ) -> String {
        let template = match self.usable_text(context, source, comment) {
            Some(TranslationText::Single(text)) => text.as_str(),
            Some(TranslationText::Numerus(forms)) => {
                forms.iter().find(|form| !form.is_empty()).map_or(source, String::as_str)
            }
            None => source,
        };
        substitute_args(template, args)
    }

    /// Resolve a numerus message for `count`.
    ///
    /// The plural form is chosen by the catalog locale's [`PluralRule`];
    /// `%n` is replaced by `count` and `%1`, `%2`, … by `args`.
    #[must_use]
    pub fn resolve_plural(&self, context: &str, source: &str, count: i64, args: &[&str]) -> String {
        self.resolve_plural_with(context, source, None, count, args)
    }

    /// Like [`Catalog::resolve_plural`] for a numerus message carrying a
    /// disambiguation comment.
    #[must_use]
    pub fn resolve_plural_disambiguated(
        &self,
        context: &str,
        source: &str,
        comment: &str,
        count: i64,
        args: &[&str],
    ) -> String {
        self.resolve_plural_with(context, source, Some(comment), count, args)
    }

    /// Plural resolution with an optional disambiguation comment.
    fn resolve_plural_with(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        count: i64,
        args: &[&str],
    ) -> String {
        let template = match self.usable_text(context, source, comment) {
            Some(TranslationText::Single(text)) => text.as_str(),
            Some(TranslationText::Numerus(forms)) => self
                .plural_rule
                .select(forms, count)
                .filter(|form| !form.is_empty())
                .unwrap_or(source),
            None => source,
        };
        substitute_count(template, count, args)
    }

    /// Translation usable for display, if any.
    fn usable_text(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
    ) -> Option<&TranslationText> {
        self.contexts.get(context)?.get(source, comment)?.state.usable_text()
    }

    /// Raw entry for `(context, source)` without disambiguation comment,
    /// including vanished messages.
    #[must_use]
    pub fn lookup(&self, context: &str, source: &str) -> Option<&Message> {
        self.contexts.get(context)?.get(source, None)
    }

    /// Raw entry for an exact message key.
    #[must_use]
    pub fn lookup_key(&self, context: &str, key: &MessageKey) -> Option<&Message> {
        self.contexts.get(context)?.get(&key.source, key.comment.as_deref())
    }

    #[must_use]
    pub fn has_context(&self, context: &str) -> bool {
        self.contexts.contains_key(context)
    }

    /// Context names, sorted.
    #[must_use]
    pub fn list_contexts(&self) -> Vec<&str> {
        let mut contexts: Vec<&str> = self.contexts.keys().map(String::as_str).collect();
        contexts.sort_unstable();
        contexts
    }

    /// Messages of a context, in no particular order.
    pub fn messages<'a>(&'a self, context: &str) -> impl Iterator<Item = &'a Message> + use<'a> {
        self.contexts.get(context).into_iter().flat_map(ContextTable::iter)
    }

    #[must_use]
    pub const fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Source locale declared by the loaded resources.
    #[must_use]
    pub const fn source_locale(&self) -> Option<&Locale> {
        self.source_locale.as_ref()
    }

    #[must_use]
    pub const fn plural_rule(&self) -> PluralRule {
        self.plural_rule
    }

    /// Total number of messages, vanished ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.values().map(ContextTable::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
