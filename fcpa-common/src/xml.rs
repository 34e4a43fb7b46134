//! Owned XML element tree
//!
//! The destination session is edited in memory and written back out, which
//! `roxmltree` (read-only) cannot do on its own. Documents are parsed with
//! `roxmltree` and copied into this small owned tree, which supports the
//! handful of queries and mutations the session model needs. Writing goes
//! through `quick_xml::Writer` with two-space indentation.
//!
//! Comments and processing instructions are dropped on load; whitespace-only
//! text between elements is dropped and re-created by the writer.

use std::fmt;
use std::io::Write;

use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::{Error, Result};

/// A node in the owned tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with ordered attributes and children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::set_attr`]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder form of [`Element::push`]
    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    /// Builder form of [`Element::push_text`]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First child element with the given tag name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.name == name)
    }

    /// First child with the given tag name, appending an empty one if missing
    pub fn ensure_child(&mut self, name: &str) -> &mut Element {
        let idx = self
            .children
            .iter()
            .position(|node| matches!(node, Node::Element(e) if e.name == name));
        let idx = match idx {
            Some(idx) => idx,
            None => {
                self.push(Element::new(name));
                self.children.len() - 1
            }
        };
        match &mut self.children[idx] {
            Node::Element(e) => e,
            Node::Text(_) => unreachable!("index points at an element"),
        }
    }

    /// Remove and return every child element with the given tag name
    pub fn take_children(&mut self, name: &str) -> Vec<Element> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.children.len());
        for node in self.children.drain(..) {
            match node {
                Node::Element(e) if e.name == name => taken.push(e),
                other => kept.push(other),
            }
        }
        self.children = kept;
        taken
    }

    /// This element and all descendant elements, in document order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Concatenated text of direct text children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    fn is_text_only(&self) -> bool {
        self.children.iter().all(|node| matches!(node, Node::Text(_)))
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            let value = attribute_value(value);
            start.push_attribute((key.as_bytes(), value.as_bytes()));
        }

        if self.children.is_empty() {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        if self.is_text_only() {
            write_event(writer, Event::Text(BytesText::from_escaped(text_value(&self.text()))))?;
        } else {
            for node in &self.children {
                match node {
                    Node::Element(child) => child.write_to(writer)?,
                    Node::Text(text) => write_event(
                        writer,
                        Event::Text(BytesText::from_escaped(text_value(text.trim()))),
                    )?,
                }
            }
        }
        write_event(writer, Event::End(BytesEnd::new(self.name.as_str())))
    }

    /// Serialize this element and its subtree without an XML declaration
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_to(&mut writer)?;
        into_string(writer)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml().map_err(|_| fmt::Error)?)
    }
}

/// Depth-first iterator over an element and its descendants
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let children: Vec<&Element> = current.elements().collect();
        self.stack.extend(children.into_iter().rev());
        Some(current)
    }
}

// ============================================================================
// Loading and Writing Documents
// ============================================================================

/// Parsing options shared by every document load
///
/// FCP exporters emit `<!DOCTYPE xmeml>`, so DTDs must be allowed.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    }
}

/// Parse markup into an owned tree, returning the root element
pub fn parse(text: &str) -> std::result::Result<Element, roxmltree::Error> {
    let doc = roxmltree::Document::parse_with_options(text, parsing_options())?;
    Ok(from_node(doc.root_element()))
}

/// Copy a `roxmltree` element (and its subtree) into an owned [`Element`]
pub fn from_node(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(node.tag_name().name());
    for attr in node.attributes() {
        element.set_attr(attr.name(), attr.value());
    }
    for child in node.children() {
        if child.is_element() {
            element.push(from_node(child));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                if !text.trim().is_empty() {
                    element.push_text(text);
                }
            }
        }
    }
    element
}

/// Serialize a root element as a complete document with XML declaration
pub fn to_document_string(root: &Element) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    root.write_to(&mut writer)?;
    into_string(writer)
}

fn write_event<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Internal(format!("XML write failed: {}", e)))
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner())
        .map_err(|e| Error::Internal(format!("XML writer produced invalid UTF-8: {}", e)))
}

/// Characters allowed in an XML 1.0 document
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escaped attribute value
///
/// Tabs and line breaks become character references so attribute-value
/// normalization on reload does not turn them into spaces. Characters XML
/// cannot represent are dropped.
fn attribute_value(value: &str) -> String {
    let legal: String = value.chars().filter(|&c| is_xml_char(c)).collect();
    let mut out = String::with_capacity(legal.len());
    for c in escape(legal.as_str()).chars() {
        match c {
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped text content; `\r` is kept as a reference so line-end
/// normalization on reload does not drop it
fn text_value(text: &str) -> String {
    let legal: String = text.chars().filter(|&c| is_xml_char(c)).collect();
    escape(legal.as_str()).replace('\r', "&#13;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<Session name="demo" sample-rate="48000">
  <!-- comment -->
  <Config>
    <Option name="timecode-format" value="timecode_30"/>
  </Config>
  <Routes>
    <Route id="1" name="Master"/>
    <Route id="7" name="Audio"/>
  </Routes>
  <Events>0 1
48000 0.5</Events>
</Session>"#;

    #[test]
    fn test_parse_keeps_structure() {
        let root = parse(SAMPLE).unwrap();
        assert_eq!(root.name, "Session");
        assert_eq!(root.attr("sample-rate"), Some("48000"));

        let routes = root.child("Routes").unwrap();
        let names: Vec<_> = routes.elements().filter_map(|r| r.attr("name")).collect();
        assert_eq!(names, vec!["Master", "Audio"]);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let root = parse(SAMPLE).unwrap();
        let names: Vec<_> = root.descendants().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Session", "Config", "Option", "Routes", "Route", "Route", "Events"]
        );
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut e = Element::new("Region").with_attr("a", 1).with_attr("b", 2);
        e.set_attr("a", "x");
        let attrs: Vec<_> = e.attributes().collect();
        assert_eq!(attrs, vec![("a", "x"), ("b", "2")]);
    }

    #[test]
    fn test_ensure_child_creates_once() {
        let mut root = Element::new("Session");
        root.ensure_child("Sources").push(Element::new("Source"));
        root.ensure_child("Sources").push(Element::new("Source"));
        assert_eq!(root.elements().count(), 1);
        assert_eq!(root.child("Sources").unwrap().elements().count(), 2);
    }

    #[test]
    fn test_take_children_removes_matching() {
        let mut root = parse(SAMPLE).unwrap();
        let routes = root.child_mut("Routes").unwrap().take_children("Route");
        assert_eq!(routes.len(), 2);
        assert_eq!(root.child("Routes").unwrap().elements().count(), 0);
    }

    #[test]
    fn test_serialize_escapes_and_reparses() {
        let root = Element::new("Source")
            .with_attr("name", "a & \"b\" <c>.wav")
            .with_child(Element::new("events").with_text("0 1\n10 <0.5>"));

        let text = to_document_string(&root).unwrap();
        assert!(text.starts_with("<?xml"));
        assert!(text.contains("&amp;"));

        let back = parse(&text).unwrap();
        assert_eq!(back.attr("name"), Some("a & \"b\" <c>.wav"));
        assert_eq!(back.child("events").unwrap().text(), "0 1\n10 <0.5>");
    }

    #[test]
    fn test_serialize_keeps_attribute_whitespace() {
        let root = Element::new("Source")
            .with_attr("name", "left\tright\r\nnext")
            .with_child(Element::new("events").with_text("0 1\r\n10 0.5"));

        let back = parse(&to_document_string(&root).unwrap()).unwrap();
        assert_eq!(back.attr("name"), Some("left\tright\r\nnext"));
        assert_eq!(back.child("events").unwrap().text(), "0 1\r\n10 0.5");
    }

    #[test]
    fn test_serialize_drops_illegal_characters() {
        let root = Element::new("Source")
            .with_attr("name", "take\u{1}1\u{FFFE}.wav")
            .with_text("bell\u{7}");

        let back = parse(&to_document_string(&root).unwrap()).unwrap();
        assert_eq!(back.attr("name"), Some("take1.wav"));
        assert_eq!(back.text(), "bell");
    }

    #[test]
    fn test_display_writes_nested_elements() {
        let root = Element::new("Routes")
            .with_child(Element::new("Route").with_attr("name", "Master"))
            .with_child(Element::new("Route").with_attr("name", "Seq.1"));

        let text = root.to_string();
        assert!(!text.starts_with("<?xml"));
        let back = parse(&text).unwrap();
        assert_eq!(back, root);
    }

    #[test]
    fn test_text_content_preserved_multiline() {
        let root = parse(SAMPLE).unwrap();
        assert_eq!(root.child("Events").unwrap().text(), "0 1\n48000 0.5");
    }

    #[test]
    fn test_parse_error_propagates() {
        assert!(parse("<unclosed>").is_err());
        assert!(parse("hello").is_err());
    }
}
