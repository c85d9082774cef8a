//! Catalog entries.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::input::{
    TranslationType,
    TsMessage,
};
use crate::types::SourceLocation;

/// Translated text: a single string, or plural forms for numerus messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TranslationText {
    Single(String),
    Numerus(Vec<String>),
}

impl TranslationText {
    /// True when there is nothing to display.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(text) => text.is_empty(),
            Self::Numerus(forms) => forms.iter().all(String::is_empty),
        }
    }
}

/// Translation status with the text it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "lowercase")]
pub enum MessageState {
    /// Translation is done.
    Finished(TranslationText),
    /// Translation pending; `None` when nothing has been entered yet.
    Unfinished(Option<TranslationText>),
    /// The source string left the UI; the text is kept for translators only.
    Vanished(Option<TranslationText>),
    /// Older spelling of [`MessageState::Vanished`].
    Obsolete(Option<TranslationText>),
}

impl MessageState {
    /// Text to display, if this state allows using it.
    ///
    /// Finished and non-empty unfinished translations are usable; vanished
    /// and obsolete ones never are.
    #[must_use]
    pub fn usable_text(&self) -> Option<&TranslationText> {
        match self {
            Self::Finished(text) | Self::Unfinished(Some(text)) => {
                (!text.is_empty()).then_some(text)
            }
            Self::Unfinished(None) | Self::Vanished(_) | Self::Obsolete(_) => None,
        }
    }

    /// Whether the source string is still part of the UI.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Finished(_) | Self::Unfinished(_))
    }

    /// Whether the message is finished with a non-empty translation.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(text) if !text.is_empty())
    }

    /// State of a parsed message.
    fn from_ts(message: &TsMessage) -> Self {
        let Some(translation) = &message.translation else {
            return Self::Unfinished(None);
        };

        let text = if message.numerus || !translation.numerus_forms.is_empty() {
            TranslationText::Numerus(translation.numerus_forms.clone())
        } else {
            TranslationText::Single(translation.text.clone())
        };
        let optional = (!text.is_empty()).then(|| text.clone());

        match translation.kind {
            None => Self::Finished(text),
            Some(TranslationType::Unfinished) => Self::Unfinished(optional),
            Some(TranslationType::Vanished) => Self::Vanished(optional),
            Some(TranslationType::Obsolete) => Self::Obsolete(optional),
        }
    }
}

/// Lookup key of a message within its context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    pub source: String,
    /// Disambiguation comment.
    pub comment: Option<String>,
}

impl MessageKey {
    #[must_use]
    pub fn new(source: impl Into<String>, comment: Option<String>) -> Self {
        Self { source: source.into(), comment }
    }
}

/// A message as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub source: String,
    pub comment: Option<String>,
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
    pub id: Option<String>,
    pub numerus: bool,
    pub state: MessageState,
    /// Every location the message was seen at, deduplicated.
    pub locations: BTreeSet<SourceLocation>,
}

impl Message {
    #[must_use]
    pub fn key(&self) -> MessageKey {
        MessageKey::new(self.source.clone(), self.comment.clone())
    }

    /// Fold a later occurrence of the same key into this entry.
    ///
    /// Locations are merged; status, translation and metadata come from
    /// `other`.
    pub(crate) fn absorb(&mut self, other: Self) {
        let Self { extra_comment, translator_comment, id, numerus, state, locations, .. } = other;

        self.locations.extend(locations);
        self.state = state;
        self.numerus = numerus;
        self.extra_comment = extra_comment.or_else(|| self.extra_comment.take());
        self.translator_comment = translator_comment.or_else(|| self.translator_comment.take());
        self.id = id.or_else(|| self.id.take());
    }
}

impl From<&TsMessage> for Message {
    fn from(message: &TsMessage) -> Self {
        Self {
            source: message.source.clone(),
            comment: message.comment.clone(),
            extra_comment: message.extra_comment.clone(),
            translator_comment: message.translator_comment.clone(),
            id: message.id.clone(),
            numerus: message.numerus,
            state: MessageState::from_ts(message),
            locations: message.locations.iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::input::TsTranslation;

    fn ts_message(kind: Option<TranslationType>, text: &str) -> TsMessage {
        TsMessage {
            source: "Cancel".to_string(),
            translation: Some(TsTranslation { kind, text: text.to_string(), ..Default::default() }),
            ..Default::default()
        }
    }

    #[rstest]
    #[case(None, "取消", Some("取消"))]
    #[case(None, "", None)]
    #[case(Some(TranslationType::Unfinished), "取消", Some("取消"))]
    #[case(Some(TranslationType::Unfinished), "", None)]
    #[case(Some(TranslationType::Vanished), "取消", None)]
    #[case(Some(TranslationType::Obsolete), "取消", None)]
    fn test_usable_text(
        #[case] kind: Option<TranslationType>,
        #[case] text: &str,
        #[case] expected: Option<&str>,
    ) {
        let message = Message::from(&ts_message(kind, text));

        let usable = message.state.usable_text().map(|text| match text {
            TranslationText::Single(text) => text.as_str(),
            TranslationText::Numerus(_) => "<numerus>",
        });
        assert_eq!(usable, expected);
    }

    #[rstest]
    fn test_missing_translation_element_is_unfinished() {
        let message = Message::from(&TsMessage { source: "Cancel".to_string(), ..Default::default() });

        assert_eq!(message.state, MessageState::Unfinished(None));
        assert!(message.state.is_active());
    }

    #[rstest]
    fn test_numerus_translation_keeps_forms() {
        let ts = TsMessage {
            source: "%n file(s)".to_string(),
            numerus: true,
            translation: Some(TsTranslation {
                numerus_forms: vec!["%n 个文件".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        };

        let message = Message::from(&ts);

        assert_eq!(
            message.state,
            MessageState::Finished(TranslationText::Numerus(vec!["%n 个文件".to_string()]))
        );
    }

    #[rstest]
    fn test_absorb_merges_locations_and_takes_later_state() {
        let mut first = Message::from(&TsMessage {
            locations: vec![SourceLocation::new("a.qml", 1)],
            ..ts_message(Some(TranslationType::Unfinished), "")
        });
        let second = Message::from(&TsMessage {
            locations: vec![SourceLocation::new("a.qml", 1), SourceLocation::new("b.qml", 9)],
            ..ts_message(None, "取消")
        });

        first.absorb(second);

        assert_eq!(first.locations.len(), 2);
        assert!(first.state.is_finished());
    }
}
