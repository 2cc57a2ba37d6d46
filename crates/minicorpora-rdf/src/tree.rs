//! Namespace-resolved element tree for small RDF/XML documents.
//!
//! The export is read once with quick-xml's `NsReader` into an owned tree so
//! the resolver can follow cross-references between top-level nodes. Each
//! element keeps its resolved namespace URI, local name, attributes and the
//! concatenation of its own (non-child) text.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::RdfError;

/// One attribute with its namespace resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub ns: String,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Namespace URI, empty when unbound.
    pub ns: String,
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Direct text content, unescaped and untrimmed.
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn is(&self, ns: &str, name: &str) -> bool {
        self.ns == ns && self.name == name
    }

    pub fn attr(&self, ns: &str, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.ns == ns && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// First direct child with the given name.
    pub fn child(&self, ns: &str, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.is(ns, name))
    }

    /// All direct children with the given name, in document order.
    pub fn children_named<'s>(
        &'s self,
        ns: &'s str,
        name: &'s str,
    ) -> impl Iterator<Item = &'s Element> + 's {
        self.children.iter().filter(move |c| c.is(ns, name))
    }

    /// First descendant (depth-first, document order) with the given name.
    pub fn descendant(&self, ns: &str, name: &str) -> Option<&Element> {
        for child in &self.children {
            if child.is(ns, name) {
                return Some(child);
            }
            if let Some(found) = child.descendant(ns, name) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants with the given name, in document order.
    pub fn descendants_named<'s>(&'s self, ns: &str, name: &str) -> Vec<&'s Element> {
        let mut out = Vec::new();
        self.collect_descendants(ns, name, &mut out);
        out
    }

    fn collect_descendants<'s>(&'s self, ns: &str, name: &str, out: &mut Vec<&'s Element>) {
        for child in &self.children {
            if child.is(ns, name) {
                out.push(child);
            }
            child.collect_descendants(ns, name, out);
        }
    }

    /// Trimmed direct text.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

/// Parse a whole XML document and return its root element.
pub fn parse_document<R: BufRead>(reader: R) -> Result<Element, RdfError> {
    let mut xml = NsReader::from_reader(reader);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(4096);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let element = open_element(&xml, e)?;
                stack.push(element);
            }
            Event::Empty(ref e) => {
                let element = open_element(&xml, e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| RdfError::Malformed("unexpected closing tag".into()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(ref e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(RdfError::Malformed(format!(
            "unclosed element <{}> at end of document",
            open.name
        )));
    }
    root.ok_or_else(|| RdfError::Malformed("document has no root element".into()))
}

fn namespace_uri(resolved: &ResolveResult<'_>) -> String {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => String::from_utf8_lossy(uri).into_owned(),
        _ => String::new(),
    }
}

fn open_element<R>(xml: &NsReader<R>, start: &BytesStart<'_>) -> Result<Element, RdfError> {
    let (resolved, local) = xml.resolve_element(start.name());
    let mut element = Element {
        ns: namespace_uri(&resolved),
        name: String::from_utf8_lossy(local.as_ref()).into_owned(),
        ..Default::default()
    };

    for attr in start.attributes() {
        let attr = attr?;
        // xmlns declarations are consumed by the reader itself
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = xml.resolve_attribute(attr.key);
        element.attributes.push(Attribute {
            ns: namespace_uri(&resolved),
            name: String::from_utf8_lossy(local.as_ref()).into_owned(),
            value: attr.unescape_value()?.into_owned(),
        });
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), RdfError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(RdfError::Malformed("multiple root elements".into())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const NS_A: &str = "http://example.org/a#";

    #[test]
    fn resolves_prefixed_names_and_attributes() {
        let xml = r#"<a:root xmlns:a="http://example.org/a#">
  <a:node a:id="n1">Hello &amp; welcome</a:node>
  <a:empty a:id="n2"/>
</a:root>"#;
        let root = parse_document(Cursor::new(xml)).unwrap();
        assert!(root.is(NS_A, "root"));
        assert_eq!(root.children.len(), 2);
        let node = root.child(NS_A, "node").unwrap();
        assert_eq!(node.attr(NS_A, "id"), Some("n1"));
        assert_eq!(node.trimmed_text(), "Hello & welcome");
        assert_eq!(root.child(NS_A, "empty").unwrap().attr(NS_A, "id"), Some("n2"));
    }

    #[test]
    fn default_namespace_applies_to_elements_only() {
        let xml = r#"<root xmlns="http://example.org/a#"><item id="x"/></root>"#;
        let root = parse_document(Cursor::new(xml)).unwrap();
        let item = root.child(NS_A, "item").unwrap();
        assert_eq!(item.attr("", "id"), Some("x"));
    }

    #[test]
    fn descendant_search_is_depth_first() {
        let xml = r#"<r xmlns="http://example.org/a#">
  <b><t>first</t></b>
  <t>second</t>
</r>"#;
        let root = parse_document(Cursor::new(xml)).unwrap();
        assert_eq!(root.descendant(NS_A, "t").unwrap().trimmed_text(), "first");
        let all: Vec<&str> = root
            .descendants_named(NS_A, "t")
            .iter()
            .map(|e| e.trimmed_text())
            .collect();
        assert_eq!(all, vec!["first", "second"]);
    }

    #[test]
    fn cdata_is_kept_as_text() {
        let xml = r#"<r><![CDATA[a < b]]></r>"#;
        let root = parse_document(Cursor::new(xml)).unwrap();
        assert_eq!(root.text, "a < b");
    }

    #[test]
    fn mismatched_tags_are_an_error() {
        let xml = r#"<r><a></b></r>"#;
        assert!(parse_document(Cursor::new(xml)).is_err());
    }

    #[test]
    fn unclosed_root_is_an_error() {
        let xml = r#"<r><a></a>"#;
        assert!(matches!(
            parse_document(Cursor::new(xml)),
            Err(RdfError::Malformed(_))
        ));
    }

    #[test]
    fn empty_input_has_no_root() {
        assert!(matches!(
            parse_document(Cursor::new("")),
            Err(RdfError::Malformed(_))
        ));
    }
}
