//! Element tree reader.
//!
//! Builds a small owned tree from a request body so the grammar can
//! be matched in a single structured descent. Every element name is
//! resolved to its namespace; whitespace-only text is dropped.

use crate::core::error::ParseFailure;
use crate::core::query::QualifiedName;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

/// Default deepest element nesting accepted in a request document
pub const MAX_DEPTH: usize = 256;

/// An XML element with resolved name, child elements and text content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: QualifiedName,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            children: Vec::new(),
            text: String::new(),
        }
    }

    /// First child named `{DAV:}local`
    pub fn dav_child(&self, local: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name.is_dav(local))
    }

    /// All children named `{DAV:}local`, in document order
    pub fn dav_children<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name.is_dav(local))
    }

    pub fn has_dav_child(&self, local: &str) -> bool {
        self.dav_child(local).is_some()
    }

    pub fn is_dav(&self, local: &str) -> bool {
        self.name.is_dav(local)
    }
}

/// Parse a complete document and return its root element.
///
/// Any well-formedness problem is reported as a [`ParseFailure`]
/// carrying the underlying reader message. Nesting is capped at
/// [`MAX_DEPTH`].
pub fn parse_document(bytes: &[u8]) -> Result<Element, ParseFailure> {
    parse_document_with_limit(bytes, MAX_DEPTH)
}

/// Parse a complete document, rejecting element nesting deeper than
/// `max_depth` levels.
pub fn parse_document_with_limit(bytes: &[u8], max_depth: usize) -> Result<Element, ParseFailure> {
    let mut reader = NsReader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (resolved, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|e| malformed(&e.to_string()))?;

        match event {
            Event::Start(start) => {
                let name = resolve_name(resolved, start.local_name().as_ref())?;
                ensure_single_root(&root, &stack)?;
                if stack.len() >= max_depth {
                    return Err(ParseFailure::new(format!(
                        "Document nesting exceeds {max_depth} levels"
                    )));
                }
                stack.push(Element::new(name));
            }
            Event::Empty(start) => {
                let name = resolve_name(resolved, start.local_name().as_ref())?;
                ensure_single_root(&root, &stack)?;
                attach(&mut stack, &mut root, Element::new(name));
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| malformed(&e.to_string()))?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                push_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(malformed(&format!(
            "unexpected end of document inside {}",
            open.name
        )));
    }

    root.ok_or_else(|| malformed("document has no root element"))
}

fn malformed(message: &str) -> ParseFailure {
    ParseFailure::new(format!("Malformed XML: {message}"))
}

fn resolve_name(resolved: ResolveResult<'_>, local: &[u8]) -> Result<QualifiedName, ParseFailure> {
    let local = std::str::from_utf8(local)
        .map_err(|e| malformed(&format!("element name is not UTF-8: {e}")))?;

    let namespace = match resolved {
        ResolveResult::Bound(ns) => String::from_utf8_lossy(ns.as_ref()).into_owned(),
        ResolveResult::Unbound => String::new(),
        ResolveResult::Unknown(prefix) => {
            return Err(malformed(&format!(
                "unknown namespace prefix '{}' on element {local}",
                String::from_utf8_lossy(&prefix)
            )));
        }
    };

    Ok(QualifiedName::new(namespace, local))
}

fn ensure_single_root(root: &Option<Element>, stack: &[Element]) -> Result<(), ParseFailure> {
    if root.is_some() && stack.is_empty() {
        return Err(malformed("content after the document element"));
    }
    Ok(())
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [Element], text: &str) -> Result<(), ParseFailure> {
    if text.trim().is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None => Err(malformed("text outside the document element")),
    }
}
