//! `TreeAdapter` over the html5ever rcdom

use crate::locator::LocationTable;
use capo_core::{Capability, SourceLocation, TreeAdapter};
use markup5ever_rcdom::{Handle, NodeData};
use std::fmt;
use std::rc::Rc;

/// rcdom handle compared by identity
#[derive(Clone)]
pub struct StaticNode(pub Handle);

impl StaticNode {
    pub fn handle(&self) -> &Handle {
        &self.0
    }

    fn parent_handle(&self) -> Option<Handle> {
        // The parent link is a `Cell`; take it, upgrade, put it back
        let weak = self.0.parent.take();
        let parent = weak.as_ref().and_then(|w| w.upgrade());
        self.0.parent.set(weak);
        parent
    }
}

impl From<Handle> for StaticNode {
    fn from(handle: Handle) -> Self {
        Self(handle)
    }
}

impl PartialEq for StaticNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for StaticNode {}

impl fmt::Debug for StaticNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.data {
            NodeData::Element { name, .. } => write!(f, "StaticNode(<{}>)", &*name.local),
            _ => f.write_str("StaticNode(#node)"),
        }
    }
}

/// Adapter for parsed documents. Created by [`crate::StaticDocument::adapter`]
/// it also reports source positions.
#[derive(Clone, Default)]
pub struct RcDomAdapter {
    locations: Option<Rc<LocationTable>>,
}

impl RcDomAdapter {
    pub const NAME: &'static str = "rcdom";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locations(locations: Rc<LocationTable>) -> Self {
        Self {
            locations: Some(locations),
        }
    }
}

impl fmt::Debug for RcDomAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RcDomAdapter")
            .field("locations", &self.locations.as_ref().map(|l| l.len()))
            .finish()
    }
}

impl TreeAdapter for RcDomAdapter {
    type Node = StaticNode;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_element(&self, node: &StaticNode) -> bool {
        matches!(node.0.data, NodeData::Element { .. })
    }

    fn tag_name(&self, node: &StaticNode) -> String {
        match &node.0.data {
            NodeData::Element { name, .. } => (&*name.local).to_ascii_lowercase(),
            _ => String::new(),
        }
    }

    fn attribute(&self, node: &StaticNode, name: &str) -> Option<String> {
        let NodeData::Element { attrs, .. } = &node.0.data else {
            return None;
        };
        attrs
            .borrow()
            .iter()
            .find(|a| (&*a.name.local).eq_ignore_ascii_case(name))
            .map(|a| a.value.to_string())
    }

    fn attribute_names(&self, node: &StaticNode) -> Vec<String> {
        let NodeData::Element { attrs, .. } = &node.0.data else {
            return Vec::new();
        };
        attrs.borrow().iter().map(|a| a.name.local.to_string()).collect()
    }

    /// Whitespace-only text nodes are ignored, as in the live conversion
    fn text_content(&self, node: &StaticNode) -> String {
        if !self.is_element(node) {
            return String::new();
        }
        let mut text = String::new();
        for child in node.0.children.borrow().iter() {
            if let NodeData::Text { contents } = &child.data {
                let contents = contents.borrow();
                if !contents.trim().is_empty() {
                    text.push_str(&contents);
                }
            }
        }
        text
    }

    fn children(&self, node: &StaticNode) -> Vec<StaticNode> {
        if !self.is_element(node) {
            return Vec::new();
        }
        node.0
            .children
            .borrow()
            .iter()
            .filter(|child| matches!(child.data, NodeData::Element { .. }))
            .cloned()
            .map(StaticNode)
            .collect()
    }

    fn parent(&self, node: &StaticNode) -> Option<StaticNode> {
        node.parent_handle()
            .filter(|parent| matches!(parent.data, NodeData::Element { .. }))
            .map(StaticNode)
    }

    fn location(&self, node: &StaticNode) -> Option<SourceLocation> {
        self.locations.as_ref()?.get(&Rc::as_ptr(&node.0)).copied()
    }

    fn capabilities(&self) -> &[Capability] {
        if self.locations.is_some() {
            Capability::WITH_LOCATION
        } else {
            Capability::REQUIRED
        }
    }
}
