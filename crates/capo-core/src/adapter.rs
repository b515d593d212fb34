//! Tree Adapter
//!
//! The capability boundary between the analysis engine and a concrete
//! tree backend. Classification and validation only ever talk to a
//! [`TreeAdapter`], never to a backend type.
//!
//! Every method is total: text, comment and document nodes produce the
//! same safe defaults a missing node would (`false`, empty string, empty
//! list, `None`), so rule predicates compose without guards.

use crate::selector::SimplePattern;
use crate::serialize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source position of an element's start tag (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<usize>,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A capability an adapter declares to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    IsElement,
    TagName,
    Attributes,
    TextContent,
    Children,
    Parent,
    Siblings,
    Matches,
    Stringify,
    Location,
}

impl Capability {
    /// Capabilities every adapter must provide before it can be registered
    pub const REQUIRED: &'static [Capability] = &[
        Capability::IsElement,
        Capability::TagName,
        Capability::Attributes,
        Capability::TextContent,
        Capability::Children,
        Capability::Parent,
        Capability::Siblings,
        Capability::Matches,
        Capability::Stringify,
    ];

    /// Required capabilities plus source positions
    pub const WITH_LOCATION: &'static [Capability] = &[
        Capability::IsElement,
        Capability::TagName,
        Capability::Attributes,
        Capability::TextContent,
        Capability::Children,
        Capability::Parent,
        Capability::Siblings,
        Capability::Matches,
        Capability::Stringify,
        Capability::Location,
    ];

    /// Adapter method backing this capability
    pub fn method(self) -> &'static str {
        match self {
            Capability::IsElement => "is_element",
            Capability::TagName => "tag_name",
            Capability::Attributes => "attribute",
            Capability::TextContent => "text_content",
            Capability::Children => "children",
            Capability::Parent => "parent",
            Capability::Siblings => "siblings",
            Capability::Matches => "matches",
            Capability::Stringify => "stringify",
            Capability::Location => "location",
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// Read-only view over one tree backend.
///
/// `Node` is an opaque handle; equality must be handle identity (two
/// structurally identical `<meta>` elements are different nodes).
/// Tag names are returned lowercase and attribute lookups are
/// case-insensitive on the attribute name.
pub trait TreeAdapter {
    type Node: Clone + PartialEq;

    /// Backend identifier used in logs and by the registry
    fn name(&self) -> &str;

    /// True only for element nodes
    fn is_element(&self, node: &Self::Node) -> bool;

    /// Lowercase tag name, empty for non-elements
    fn tag_name(&self, node: &Self::Node) -> String;

    /// Attribute value by case-insensitive name
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Attribute names in source order
    fn attribute_names(&self, node: &Self::Node) -> Vec<String>;

    /// Concatenated text of the direct text children
    fn text_content(&self, node: &Self::Node) -> String;

    /// Element children in document order (text and comments skipped)
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Parent element, `None` at the top of the element tree
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Element siblings in document order, excluding `node` itself
    fn siblings(&self, node: &Self::Node) -> Vec<Self::Node> {
        match self.parent(node) {
            Some(parent) => self
                .children(&parent)
                .into_iter()
                .filter(|child| child != node)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Match against a restricted selector (see [`SimplePattern`]).
    /// Patterns outside the grammar never match.
    fn matches(&self, node: &Self::Node, pattern: &str) -> bool {
        SimplePattern::parse(pattern).is_some_and(|p| p.matches(self, node))
    }

    /// Start-tag position, when the backend kept one
    fn location(&self, _node: &Self::Node) -> Option<SourceLocation> {
        None
    }

    /// Debug rendering of the start tag with its attributes
    fn stringify(&self, node: &Self::Node) -> String {
        serialize::start_tag(self, node)
    }

    /// Capabilities this adapter provides
    fn capabilities(&self) -> &[Capability] {
        Capability::REQUIRED
    }

    /// First required capability this adapter lacks
    fn missing_capability(&self) -> Option<Capability> {
        let provided = self.capabilities();
        Capability::REQUIRED
            .iter()
            .copied()
            .find(|cap| !provided.contains(cap))
    }
}
