//! Minimal element tree built from `quick-xml` events.
//!
//! The whole document is read into memory; `<byte/>` escapes inside mixed
//! text are decoded by [`XmlElement::text`].

use quick_xml::Reader;
use quick_xml::events::{
    BytesStart,
    Event,
};

/// Well-formedness or decoding error, located by byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct XmlError {
    /// Byte offset into the document where the problem was detected.
    pub(crate) offset: usize,
    /// Human readable description.
    pub(crate) message: String,
}

impl XmlError {
    /// Create an error at `offset`.
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self { offset, message: message.into() }
    }
}

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum XmlNode {
    /// Child element.
    Element(XmlElement),
    /// Unescaped character data (text or CDATA).
    Text(String),
}

/// An element with its attributes and children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct XmlElement {
    /// Tag name.
    pub(crate) name: String,
    /// Attributes as `(name, unescaped value)`.
    pub(crate) attributes: Vec<(String, String)>,
    /// Children in document order.
    pub(crate) children: Vec<XmlNode>,
    /// Byte offset of the start tag.
    pub(crate) offset: usize,
}

impl XmlElement {
    /// Attribute value by name.
    pub(crate) fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Child elements, skipping text.
    pub(crate) fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Child elements with the given tag name.
    pub(crate) fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> {
        self.elements().filter(move |element| element.name == name)
    }

    /// First child element with the given tag name.
    pub(crate) fn child(&self, name: &str) -> Option<&Self> {
        self.elements().find(|element| element.name == name)
    }

    /// Character content of this element.
    ///
    /// Direct text children are concatenated and `<byte value="…"/>`
    /// children are decoded into the character they encode. Other child
    /// elements are skipped.
    pub(crate) fn text(&self) -> Result<String, XmlError> {
        let mut out = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(element) if element.name == "byte" => {
                    out.push(decode_byte(element)?);
                }
                XmlNode::Element(_) => {}
            }
        }
        Ok(out)
    }
}

/// Decode a `<byte value="x0A"/>` (hex) or `<byte value="10"/>` (decimal) element.
fn decode_byte(element: &XmlElement) -> Result<char, XmlError> {
    let Some(value) = element.attribute("value") else {
        return Err(XmlError::new(element.offset, "<byte> element without 'value' attribute"));
    };

    let code = match value.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    };

    code.ok()
        .and_then(char::from_u32)
        .ok_or_else(|| XmlError::new(element.offset, format!("invalid <byte> value '{value}'")))
}

/// Parse `text` into its root element.
///
/// The XML declaration, doctype, comments and processing instructions are
/// skipped.
pub(crate) fn parse_document(text: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let offset = buffer_offset(&reader);
        let event = reader
            .read_event()
            .map_err(|e| XmlError::new(buffer_offset(&reader), e.to_string()))?;

        match event {
            Event::Start(start) => {
                ensure_single_root(root.as_ref(), &stack, offset)?;
                stack.push(open_element(&start, offset)?);
            }
            Event::Empty(start) => {
                ensure_single_root(root.as_ref(), &stack, offset)?;
                let element = open_element(&start, offset)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                // quick-xml has already verified that the end tag matches.
                let Some(element) = stack.pop() else {
                    return Err(XmlError::new(offset, "unexpected end tag"));
                };
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| XmlError::new(offset, e.to_string()))?;
                push_text(&mut stack, &text, offset)?;
            }
            Event::CData(cdata) => {
                let text = std::str::from_utf8(&cdata)
                    .map_err(|e| XmlError::new(offset, format!("invalid UTF-8 in CDATA: {e}")))?;
                push_text(&mut stack, text, offset)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::new(
            text.len(),
            format!("unexpected end of document: <{}> is not closed", open.name),
        ));
    }

    root.ok_or_else(|| XmlError::new(0, "document has no root element"))
}

/// Current reader position as a byte offset.
#[allow(trivial_numeric_casts, clippy::cast_possible_truncation)]
fn buffer_offset(reader: &Reader<&[u8]>) -> usize {
    reader.buffer_position() as usize
}

/// Reject a second top-level element.
fn ensure_single_root(
    root: Option<&XmlElement>,
    stack: &[XmlElement],
    offset: usize,
) -> Result<(), XmlError> {
    if stack.is_empty() && root.is_some() {
        return Err(XmlError::new(offset, "document has more than one root element"));
    }
    Ok(())
}

/// Build an element (without children) from a start tag.
fn open_element(start: &BytesStart<'_>, offset: usize) -> Result<XmlElement, XmlError> {
    let name = utf8(start.name().as_ref(), offset)?.to_string();

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlError::new(offset, e.to_string()))?;
        let key = utf8(attribute.key.as_ref(), offset)?.to_string();
        let value = attribute.unescape_value().map_err(|e| XmlError::new(offset, e.to_string()))?;
        attributes.push((key, value.into_owned()));
    }

    Ok(XmlElement { name, attributes, children: Vec::new(), offset })
}

/// Append a finished element to its parent, or make it the root.
fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => *root = Some(element),
    }
}

/// Append character data to the innermost open element.
fn push_text(stack: &mut [XmlElement], text: &str, offset: usize) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => {
            if let Some(XmlNode::Text(previous)) = parent.children.last_mut() {
                previous.push_str(text);
            } else {
                parent.children.push(XmlNode::Text(text.to_string()));
            }
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlError::new(offset, "text outside of the root element")),
    }
}

/// Decode a name as UTF-8.
fn utf8(bytes: &[u8], offset: usize) -> Result<&str, XmlError> {
    std::str::from_utf8(bytes).map_err(|e| XmlError::new(offset, format!("invalid UTF-8 in name: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[googletest::test]
    fn test_parse_document_builds_tree() {
        let text = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1"><context><name>dialogs</name></context></TS>"#;

        let root = parse_document(text).unwrap();

        expect_that!(root.name, eq("TS"));
        expect_that!(root.attribute("version"), some(eq("2.1")));
        let context = root.child("context").unwrap();
        expect_that!(context.child("name").unwrap().text().unwrap(), eq("dialogs"));
    }

    #[rstest]
    fn test_child_outlives_the_name_it_was_looked_up_by() {
        let root = parse_document("<m><a>1</a><b>2</b><a>3</a></m>").unwrap();

        let first = {
            let name = String::from("a");
            root.child(&name)
        };

        assert_eq!(first.map(|element| element.text().unwrap()), Some("1".to_string()));
        assert!(root.child("c").is_none());
    }

    #[googletest::test]
    fn test_text_unescapes_entities_and_keeps_whitespace() {
        let root = parse_document("<source> Save &amp; Exit &lt;now&gt; </source>").unwrap();

        expect_that!(root.text().unwrap(), eq(" Save & Exit <now> "));
    }

    #[googletest::test]
    fn test_text_merges_cdata() {
        let root = parse_document("<source>a<![CDATA[<b>]]>c</source>").unwrap();

        expect_that!(root.text().unwrap(), eq("a<b>c"));
    }

    #[rstest]
    #[case(r#"<source>a<byte value="x0A"/>b</source>"#, "a\nb")]
    #[case(r#"<source>a<byte value="9"/>b</source>"#, "a\tb")]
    #[case(r#"<source><byte value="X41"/></source>"#, "A")]
    fn test_text_decodes_byte_elements(#[case] xml: &str, #[case] expected: &str) {
        let root = parse_document(xml).unwrap();
        assert_eq!(root.text().unwrap(), expected);
    }

    #[rstest]
    fn test_text_rejects_invalid_byte() {
        let root = parse_document(r#"<source><byte value="xZZ"/></source>"#).unwrap();
        assert!(root.text().is_err());
    }

    #[rstest]
    #[case("<TS><context></TS>")]
    #[case("<TS><context>")]
    #[case("")]
    #[case("<TS/><TS/>")]
    #[case("<TS a=\"1></TS>")]
    fn test_parse_document_rejects_malformed(#[case] xml: &str) {
        assert!(parse_document(xml).is_err());
    }

    #[googletest::test]
    fn test_unclosed_element_is_named_in_error() {
        let error = parse_document("<TS><context>").unwrap_err();

        expect_that!(error.message, contains_substring("context"));
    }
}
