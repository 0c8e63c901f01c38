//! Conversion between XML text and the intermediate [`RawObject`] tree.
//!
//! # Reading
//! Elements are grouped under their parent by name. Attributes land under
//! `@_`-prefixed keys, direct text under `#text`, and an element with neither
//! attributes nor children collapses to a [`RawNode::Text`] scalar. Names in the
//! forced-array set always become lists; other names become lists only when
//! they repeat.
//!
//! # Writing
//! The inverse walk: attribute keys become attributes, `#text` becomes the
//! element's leading text, every other key becomes one element per item.

use log::{trace, warn};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::lift::format::shape::{self, TEXT_NODE_NAME};
use crate::lift::types::error::{LiftError, Result};
use crate::lift::types::tree::{RawNode, RawObject};

/// An element whose end tag has not been reached yet.
struct OpenElement {
    name: String,
    object: RawObject,
    text_segments: Vec<String>,
    has_children: bool,
}

impl OpenElement {
    fn new(name: String, object: RawObject) -> Self {
        Self {
            name,
            object,
            text_segments: Vec::new(),
            has_children: false,
        }
    }

    fn attach(&mut self, name: String, node: RawNode) {
        self.has_children = true;
        match self.object.get_mut(&name) {
            Some(RawNode::List(items)) => items.push(node),
            Some(existing) => {
                let previous = std::mem::replace(existing, RawNode::List(Vec::new()));
                *existing = RawNode::List(vec![previous, node]);
            }
            None => {
                let node = if shape::is_forced_array(&name) {
                    RawNode::List(vec![node])
                } else {
                    node
                };
                self.object.insert(name, node);
            }
        }
    }

    /// Closes the element. Whitespace-only text between child elements is
    /// layout and is dropped; all other text is kept untrimmed.
    ///
    /// Text segments are joined into a single `#text` value, so mixed content
    /// loses its interleaving: `a <span>b</span> c` keeps `"a  c"` as text,
    /// which the writer emits ahead of the `<span>` child.
    fn finish(self) -> (String, RawNode) {
        let text: String = if self.has_children {
            self.text_segments
                .iter()
                .filter(|segment| !segment.trim().is_empty())
                .map(String::as_str)
                .collect()
        } else {
            self.text_segments.concat()
        };

        let node = if self.object.is_empty() {
            RawNode::Text(text)
        } else {
            let mut object = self.object;
            if !text.is_empty() {
                object.insert(TEXT_NODE_NAME, RawNode::Text(text));
            }
            RawNode::Object(object)
        };
        (self.name, node)
    }
}

/// Parses XML text into the document object, whose keys are the root elements.
///
/// The declaration, comments, processing instructions and doctype are skipped;
/// CDATA sections count as text.
pub fn parse_tree(xml: &str) -> Result<RawObject> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<OpenElement> = vec![OpenElement::new(String::new(), RawObject::new())];

    loop {
        let event = reader.read_event().map_err(|e| {
            LiftError::Malformed(format!(
                "Failed to read XML at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                let (name, object) = open_element(&e)?;
                stack.push(OpenElement::new(name, object));
            }
            Event::Empty(e) => {
                let (name, object) = open_element(&e)?;
                let (name, node) = OpenElement::new(name, object).finish();
                current(&mut stack)?.attach(name, node);
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(LiftError::Malformed("Unexpected closing tag".to_string()));
                }
                let closed = stack.pop().ok_or_else(|| {
                    LiftError::Malformed("Unexpected closing tag".to_string())
                })?;
                let (name, node) = closed.finish();
                current(&mut stack)?.attach(name, node);
            }
            Event::Text(t) => {
                let text = match t.unescape() {
                    Ok(text) => text.into_owned(),
                    Err(e) => {
                        warn!("Keeping escaped text after unescape failure: {}", e);
                        String::from_utf8_lossy(&t).into_owned()
                    }
                };
                current(&mut stack)?.text_segments.push(text);
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                current(&mut stack)?.text_segments.push(text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() > 1 {
        let unclosed = stack.last().map(|open| open.name.clone()).unwrap_or_default();
        return Err(LiftError::Malformed(format!(
            "Unexpected end of document inside <{}>",
            unclosed
        )));
    }

    let document = stack.pop().map(|root| root.object).unwrap_or_default();
    trace!("Parsed XML tree with {} root element(s)", document.len());
    Ok(document)
}

fn current(stack: &mut [OpenElement]) -> Result<&mut OpenElement> {
    stack
        .last_mut()
        .ok_or_else(|| LiftError::Malformed("Element stack underflow".to_string()))
}

/// Reads the name and attributes of a start or empty tag.
fn open_element(e: &BytesStart) -> Result<(String, RawObject)> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut object = RawObject::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| {
            LiftError::Malformed(format!("Failed to parse XML attribute in <{}>: {}", name, e))
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(err) => {
                warn!("Keeping escaped value of attribute '{}' in <{}>: {}", key, name, err);
                String::from_utf8_lossy(&attr.value).into_owned()
            }
        };
        object.insert(shape::attribute_key(&key), RawNode::Attr(value));
    }
    Ok((name, object))
}

/// Serializes a document object into indented XML text with a UTF-8
/// declaration.
pub fn write_tree(document: &RawObject, indent: usize) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    for (name, node) in document.iter() {
        write_node(&mut writer, name, node)?;
    }
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes)
        .map_err(|e| LiftError::Malformed(format!("Serialized document is not UTF-8: {}", e)))
}

fn write_node(writer: &mut Writer<Vec<u8>>, name: &str, node: &RawNode) -> Result<()> {
    match node {
        RawNode::Text(text) | RawNode::Attr(text) => write_text_element(writer, name, text),
        RawNode::List(items) => {
            for item in items {
                write_node(writer, name, item)?;
            }
            Ok(())
        }
        RawNode::Object(object) => write_object(writer, name, object),
    }
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(name)))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new(name)))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new(name)))?;
    }
    Ok(())
}

fn write_object(writer: &mut Writer<Vec<u8>>, name: &str, object: &RawObject) -> Result<()> {
    let mut start = BytesStart::new(name);
    let mut text: Option<&str> = None;
    let mut children: Vec<(&str, &RawNode)> = Vec::new();

    for (key, value) in object.iter() {
        if let Some(attribute) = shape::attribute_name(key) {
            match value.as_str() {
                Some(v) => start.push_attribute((attribute, v)),
                None => warn!("Skipping non-scalar attribute '{}' on <{}>", attribute, name),
            }
        } else if key == TEXT_NODE_NAME {
            text = value.as_str();
        } else {
            children.push((key, value));
        }
    }

    let text = text.filter(|t| !t.is_empty());
    if text.is_none() && children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for (child_name, child) in children {
        write_node(writer, child_name, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root<'a>(doc: &'a RawObject, name: &str) -> &'a RawObject {
        doc.get(name)
            .and_then(RawNode::as_object)
            .unwrap_or_else(|| panic!("missing <{}>", name))
    }

    #[test]
    fn attributes_and_text_are_distinguished() {
        let doc = parse_tree(r#"<a lang="en"><lang>child</lang>tail</a>"#).expect("parse");
        let a = root(&doc, "a");
        assert_eq!(a.attribute("lang"), Some("en"));
        assert_eq!(a.get("lang"), Some(&RawNode::Text("child".to_string())));
        assert_eq!(a.text(), Some("tail"));
    }

    #[test]
    fn leaf_elements_collapse_to_text() {
        let doc = parse_tree("<a><b>  spaced  </b><c/><d></d></a>").expect("parse");
        let a = root(&doc, "a");
        assert_eq!(a.get("b"), Some(&RawNode::Text("  spaced  ".to_string())));
        assert_eq!(a.get("c"), Some(&RawNode::Text(String::new())));
        assert_eq!(a.get("d"), Some(&RawNode::Text(String::new())));
    }

    #[test]
    fn repeated_names_become_lists() {
        let doc = parse_tree("<a><x>1</x><x>2</x><y>3</y></a>").expect("parse");
        let a = root(&doc, "a");
        assert_eq!(a.child_items("x").len(), 2);
        assert_eq!(a.get("y"), Some(&RawNode::Text("3".to_string())));
    }

    #[test]
    fn forced_names_are_lists_at_any_depth() {
        let doc = parse_tree(r#"<a><deep><gloss lang="en"/></deep></a>"#).expect("parse");
        let deep = root(&doc, "a").get("deep").and_then(RawNode::as_object).expect("deep");
        assert!(matches!(deep.get("gloss"), Some(RawNode::List(items)) if items.len() == 1));
    }

    #[test]
    fn layout_whitespace_is_dropped() {
        let doc = parse_tree("<a>\n  <b>x</b>\n</a>").expect("parse");
        let a = root(&doc, "a");
        assert!(a.text().is_none());
    }

    #[test]
    fn entities_and_cdata_are_decoded() {
        let doc = parse_tree("<a><b>x &amp; y</b><c><![CDATA[<raw>]]></c></a>").expect("parse");
        let a = root(&doc, "a");
        assert_eq!(a.get("b"), Some(&RawNode::Text("x & y".to_string())));
        assert_eq!(a.get("c"), Some(&RawNode::Text("<raw>".to_string())));
    }

    #[test]
    fn unclosed_document_is_malformed() {
        let err = parse_tree("<a><b>").expect_err("must fail");
        assert!(err.is_format_error());
    }

    #[test]
    fn mismatched_tags_are_malformed() {
        let err = parse_tree("<a><b></a></b>").expect_err("must fail");
        assert!(matches!(err, LiftError::Malformed(_)));
    }

    #[test]
    fn written_tree_reads_back_identically() {
        let source = r#"<?xml version="1.0"?>
<lift version="0.13">
  <header><ranges><range id="r" href="x.lift-ranges"/></ranges></header>
  <entry id="e&quot;1"><field type="x"><form lang="en"><text>a &lt; b</text></form></field></entry>
  <entry id="e2"><text>mixed <span lang="en">inner</span> tail</text></entry>
</lift>"#;
        let first = parse_tree(source).expect("parse");
        let written = write_tree(&first, 2).expect("write");
        let second = parse_tree(&written).expect("reparse");
        assert_eq!(first, second);
        assert!(written.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    }
}
