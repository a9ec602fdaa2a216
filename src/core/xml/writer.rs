//! DAV document writer.
//!
//! Elements in the `DAV:` namespace use the `d:` prefix declared on the
//! root element. Property names from other namespaces declare their
//! namespace on the element itself.

use crate::core::error::{DavSearchError, Result};
use crate::core::query::{QualifiedName, DAV_NS};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const DAV_PREFIX: &str = "d";
const FOREIGN_PREFIX: &str = "x";

pub struct DavXmlWriter {
    writer: Writer<Vec<u8>>,
}

impl DavXmlWriter {
    /// Start a document with an XML declaration
    pub fn new() -> Result<Self> {
        let mut this = Self {
            writer: Writer::new(Vec::new()),
        };
        this.write(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(this)
    }

    /// Open the root element and declare the `DAV:` prefix on it
    pub fn open_root(&mut self, local: &str) -> Result<()> {
        let mut start = BytesStart::new(dav(local));
        start.push_attribute(("xmlns:d", DAV_NS));
        self.write(Event::Start(start))
    }

    pub fn open(&mut self, local: &str) -> Result<()> {
        self.write(Event::Start(BytesStart::new(dav(local))))
    }

    pub fn open_with(&mut self, local: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(dav(local));
        for attribute in attributes {
            start.push_attribute(*attribute);
        }
        self.write(Event::Start(start))
    }

    pub fn close(&mut self, local: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(dav(local))))
    }

    pub fn empty(&mut self, local: &str) -> Result<()> {
        self.write(Event::Empty(BytesStart::new(dav(local))))
    }

    /// `<d:local>text</d:local>`, with text escaped
    pub fn text_element(&mut self, local: &str, text: &str) -> Result<()> {
        self.open(local)?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.close(local)
    }

    /// Write an element named by a qualified name, empty when `value`
    /// is `None`.
    pub fn name_element(&mut self, name: &QualifiedName, value: Option<&str>) -> Result<()> {
        let tag = if name.namespace == DAV_NS {
            dav(&name.local)
        } else if name.namespace.is_empty() {
            name.local.clone()
        } else {
            format!("{FOREIGN_PREFIX}:{}", name.local)
        };

        let mut start = BytesStart::new(tag.as_str());
        if name.namespace != DAV_NS && !name.namespace.is_empty() {
            start.push_attribute(("xmlns:x", name.namespace.as_str()));
        }

        match value {
            None => self.write(Event::Empty(start)),
            Some(text) => {
                self.write(Event::Start(start))?;
                self.write(Event::Text(BytesText::new(text)))?;
                self.write(Event::End(BytesEnd::new(tag.as_str())))
            }
        }
    }

    /// Consume the writer and return the document bytes
    pub fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| DavSearchError::XmlWrite(e.to_string()))
    }
}

fn dav(local: &str) -> String {
    format!("{DAV_PREFIX}:{local}")
}
