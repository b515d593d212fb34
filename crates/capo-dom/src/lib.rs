//! capo DOM - live element tree
//!
//! Arena-allocated tree shared through `Rc<RefCell<_>>`. Handles
//! ([`LiveNode`]) stay valid while the tree is mutated, so a host can
//! edit the document and re-run the analysis on the same handles.

mod adapter;
mod document;
mod node;
mod tree;

pub use adapter::{DomAdapter, LiveNode};
pub use document::Document;
pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::{DomError, DomResult, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node of every tree
    pub const ROOT: NodeId = NodeId(0);
    /// Absent link
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}
