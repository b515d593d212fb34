//! Parsed document with its source

use crate::adapter::{RcDomAdapter, StaticNode};
use crate::error::ParseError;
use crate::locator::{self, LocationTable};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::io::Read;
use std::rc::Rc;

/// html5ever document plus the start-tag positions of its elements
pub struct StaticDocument {
    dom: RcDom,
    source: String,
    locations: Rc<LocationTable>,
}

impl StaticDocument {
    /// Parse markup. HTML parsing never fails; broken markup is repaired
    /// the way browsers repair it.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        let locations = locator::locate(&dom.document, html);
        tracing::debug!(
            "parsed {} bytes, {} located elements",
            html.len(),
            locations.len()
        );
        Self {
            dom,
            source: html.to_string(),
            locations: Rc::new(locations),
        }
    }

    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, ParseError> {
        let mut html = String::new();
        reader.read_to_string(&mut html)?;
        Ok(Self::parse(&html))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Document node
    pub fn document(&self) -> Handle {
        Rc::clone(&self.dom.document)
    }

    pub fn document_element(&self) -> Option<StaticNode> {
        find_child(&self.dom.document, "html").map(StaticNode)
    }

    /// The `<head>`; html5ever synthesizes one when the markup has none
    pub fn head(&self) -> Option<StaticNode> {
        let html = find_child(&self.dom.document, "html")?;
        find_child(&html, "head").map(StaticNode)
    }

    pub fn require_head(&self) -> Result<StaticNode, ParseError> {
        self.head().ok_or(ParseError::MissingHead)
    }

    /// Adapter that also reports source positions for this document
    pub fn adapter(&self) -> RcDomAdapter {
        RcDomAdapter::with_locations(Rc::clone(&self.locations))
    }
}

fn find_child(parent: &Handle, tag: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| match &child.data {
            NodeData::Element { name, .. } => &*name.local == tag,
            _ => false,
        })
        .cloned()
}
