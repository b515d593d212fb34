//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: a removed node is detached and its id stays
//! valid, so outstanding handles never dangle.

use crate::{Node, NodeId};

pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node {0:?} not found")]
    NotFound(NodeId),

    #[error("Hierarchy request error: {0:?} cannot be inserted under {1:?}")]
    HierarchyRequest(NodeId, NodeId),

    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),
}

#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes ever allocated
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.alloc(Node::element(name))
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content))
    }

    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.alloc(Node::comment(content))
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.get_mut(id).ok_or(DomError::NotFound(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Children in document order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut next = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        while let Some(node) = self.get(next) {
            out.push(next);
            next = node.next_sibling;
        }
        out
    }

    /// Is `ancestor` the same as or above `id`
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference` (at the end when `None`).
    /// An attached child is moved.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.node(parent)?;
        self.node(child)?;
        if child == NodeId::ROOT || self.is_inclusive_ancestor(child, parent) {
            tracing::warn!("rejected insert of {:?} under {:?}", child, parent);
            return Err(DomError::HierarchyRequest(child, parent));
        }
        if let Some(reference) = reference {
            if self.node(reference)?.parent != parent {
                return Err(DomError::NotAChild { parent, child: reference });
            }
            if reference == child {
                return Ok(child);
            }
        }

        self.detach(child);

        let (prev, next) = match reference {
            Some(reference) => (self.node(reference)?.prev_sibling, reference),
            None => (self.node(parent)?.last_child, NodeId::NONE),
        };
        {
            let node = self.node_mut(child)?;
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
        match self.get_mut(prev) {
            Some(prev) => prev.next_sibling = child,
            None => self.node_mut(parent)?.first_child = child,
        }
        match self.get_mut(next) {
            Some(next) => next.prev_sibling = child,
            None => self.node_mut(parent)?.last_child = child,
        }
        Ok(child)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.node(child)?.parent != parent {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        tracing::trace!("removed {:?} from {:?}", child, parent);
        Ok(child)
    }

    /// Unlink a node from its parent and siblings
    fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else {
            return;
        };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);

        match self.get_mut(prev) {
            Some(prev) => prev.next_sibling = next,
            None => {
                if let Some(parent) = self.get_mut(parent) {
                    parent.first_child = next;
                }
            }
        }
        match self.get_mut(next) {
            Some(next) => next.prev_sibling = prev,
            None => {
                if let Some(parent) = self.get_mut(parent) {
                    parent.last_child = prev;
                }
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))?
            .set_attr(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        Ok(self
            .node_mut(id)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))?
            .remove_attr(name))
    }

    /// Replace all children of `id` with a single text node
    pub fn set_text_content(&mut self, id: NodeId, content: &str) -> DomResult<()> {
        for child in self.children(id) {
            self.detach(child);
        }
        if !content.is_empty() {
            let text = self.create_text(content);
            self.append_child(id, text)?;
        }
        Ok(())
    }

    /// Concatenated text of the direct text children
    pub fn text_content(&self, id: NodeId) -> String {
        self.children(id)
            .into_iter()
            .filter_map(|child| self.get(child).and_then(Node::as_text))
            .collect()
    }

    /// First element with `name` in a preorder walk from `start`
    pub fn find_element(&self, start: NodeId, name: &str) -> Option<NodeId> {
        for child in self.children(start) {
            let matched = self
                .get(child)
                .and_then(Node::as_element)
                .is_some_and(|e| e.name == name);
            if matched {
                return Some(child);
            }
            if let Some(found) = self.find_element(child, name) {
                return Some(found);
            }
        }
        None
    }
}
