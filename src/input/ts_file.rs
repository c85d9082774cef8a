//! Qt Linguist `.ts` document model.

use std::path::Path;

use super::ResourceParseError;
use super::xml::{
    self,
    XmlElement,
    XmlError,
};
use crate::types::SourceLocation;

/// Value of the `type` attribute on `<translation>`.
///
/// A missing attribute means the translation is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationType {
    Unfinished,
    Vanished,
    Obsolete,
}

impl TranslationType {
    /// Parse the attribute value, `None` for an unknown value.
    #[must_use]
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "unfinished" => Some(Self::Unfinished),
            "vanished" => Some(Self::Vanished),
            "obsolete" => Some(Self::Obsolete),
            _ => None,
        }
    }
}

/// A parsed `.ts` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsDocument {
    /// Format version from `<TS version=…>`.
    pub version: String,
    /// Target locale (`language` attribute).
    pub language: Option<String>,
    /// Source locale (`sourcelanguage` attribute).
    pub source_language: Option<String>,
    /// Context blocks in document order. Messages written directly under
    /// `<TS>` are collected into a context with an empty name.
    pub contexts: Vec<TsContext>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsContext {
    pub name: String,
    pub messages: Vec<TsMessage>,
}

/// One `<message>` block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TsMessage {
    pub id: Option<String>,
    /// Source string, the lookup key.
    pub source: String,
    /// Disambiguation comment (`<comment>`), part of the lookup key.
    pub comment: Option<String>,
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
    pub locations: Vec<SourceLocation>,
    /// `numerus="yes"`: the translation carries plural forms.
    pub numerus: bool,
    /// `None` when the message has no `<translation>` element at all.
    pub translation: Option<TsTranslation>,
}

/// One `<translation>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TsTranslation {
    pub kind: Option<TranslationType>,
    /// Text of a non-numerus translation.
    pub text: String,
    /// `<numerusform>` contents in order; empty for non-numerus translations.
    pub numerus_forms: Vec<String>,
}

/// Name given to messages that are not inside any `<context>`.
pub const GLOBAL_CONTEXT: &str = "";

/// Parse the text of a `.ts` resource.
///
/// Unknown elements are ignored. `path` is only used for error reporting.
///
/// # Errors
/// Returns [`ResourceParseError`] if the XML is malformed, the root element
/// is not `<TS>`, the `version` attribute is missing, a context has no
/// `<name>` or a message has no `<source>`.
pub fn parse_ts(text: &str, path: &Path) -> Result<TsDocument, ResourceParseError> {
    let root = xml::parse_document(text)
        .map_err(|e| ResourceParseError::at_offset(path, text, e.offset, e.message))?;

    document_from_root(&root)
        .map_err(|e| ResourceParseError::at_offset(path, text, e.offset, e.message))
}

/// Interpret the root element.
fn document_from_root(root: &XmlElement) -> Result<TsDocument, XmlError> {
    if root.name != "TS" {
        return Err(XmlError::new(
            root.offset,
            format!("expected root element <TS>, found <{}>", root.name),
        ));
    }

    let Some(version) = root.attribute("version") else {
        return Err(XmlError::new(root.offset, "<TS> element without 'version' attribute"));
    };

    let mut contexts = Vec::new();
    for element in root.elements_named("context") {
        contexts.push(parse_context(element)?);
    }

    let global_messages = root
        .elements_named("message")
        .map(parse_message)
        .collect::<Result<Vec<_>, _>>()?;
    if !global_messages.is_empty() {
        contexts.push(TsContext { name: GLOBAL_CONTEXT.to_string(), messages: global_messages });
    }

    Ok(TsDocument {
        version: version.to_string(),
        language: non_empty_attribute(root, "language"),
        source_language: non_empty_attribute(root, "sourcelanguage"),
        contexts,
    })
}

/// `<context>` with its messages.
fn parse_context(element: &XmlElement) -> Result<TsContext, XmlError> {
    let Some(name) = element.child("name") else {
        return Err(XmlError::new(element.offset, "<context> element without <name>"));
    };

    let messages =
        element.elements_named("message").map(parse_message).collect::<Result<Vec<_>, _>>()?;

    Ok(TsContext { name: name.text()?, messages })
}

/// `<message>` inside a context or at the top level.
fn parse_message(element: &XmlElement) -> Result<TsMessage, XmlError> {
    let Some(source) = element.child("source") else {
        return Err(XmlError::new(element.offset, "<message> element without <source>"));
    };

    let locations = element.elements_named("location").map(parse_location).collect();

    let translation = element.child("translation").map(parse_translation).transpose()?;

    Ok(TsMessage {
        id: non_empty_attribute(element, "id"),
        source: source.text()?,
        comment: optional_text(element, "comment")?,
        extra_comment: optional_text(element, "extracomment")?,
        translator_comment: optional_text(element, "translatorcomment")?,
        locations,
        numerus: element.attribute("numerus") == Some("yes"),
        translation,
    })
}

/// Location hints are advisory, so an unreadable line number is dropped
/// rather than rejected.
fn parse_location(element: &XmlElement) -> SourceLocation {
    let line = element.attribute("line").and_then(|line| {
        line.trim().parse::<i64>().ok().or_else(|| {
            tracing::debug!(line, "Ignoring unreadable location line");
            None
        })
    });

    SourceLocation { file: non_empty_attribute(element, "filename"), line }
}

/// `<translation>` with its status and text or numerus forms.
fn parse_translation(element: &XmlElement) -> Result<TsTranslation, XmlError> {
    let kind = match element.attribute("type") {
        None | Some("") => None,
        Some(value) => Some(TranslationType::from_attribute(value).ok_or_else(|| {
            XmlError::new(element.offset, format!("unknown translation type '{value}'"))
        })?),
    };

    let numerus_forms =
        element.elements_named("numerusform").map(variant_text).collect::<Result<Vec<_>, _>>()?;

    let text = if numerus_forms.is_empty() { variant_text(element)? } else { String::new() };

    Ok(TsTranslation { kind, text, numerus_forms })
}

/// Text of an element that may hold `<lengthvariant>` children; the first
/// (longest) variant wins.
fn variant_text(element: &XmlElement) -> Result<String, XmlError> {
    match element.child("lengthvariant") {
        Some(variant) => variant.text(),
        None => element.text(),
    }
}

/// Text of a child element, `None` when absent or empty.
fn optional_text(element: &XmlElement, name: &str) -> Result<Option<String>, XmlError> {
    let Some(child) = element.child(name) else {
        return Ok(None);
    };
    let text = child.text()?;
    Ok((!text.is_empty()).then_some(text))
}

/// Attribute value, `None` when absent or empty.
fn non_empty_attribute(element: &XmlElement, name: &str) -> Option<String> {
    element.attribute(name).filter(|value| !value.is_empty()).map(str::to_string)
}
