//! Document - High-level document API

use crate::{DomResult, DomTree, LiveNode, NodeId};
use std::cell::RefCell;
use std::rc::Rc;

/// HTML document over a shared tree
#[derive(Clone)]
pub struct Document {
    tree: Rc<RefCell<DomTree>>,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    /// `<html><head></head><body></body></html>`
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let root = tree.root();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Fresh ids under a fresh root cannot violate the hierarchy
        let built = tree
            .append_child(root, html)
            .and_then(|_| tree.append_child(html, head))
            .and_then(|_| tree.append_child(html, body));
        debug_assert!(built.is_ok());

        Self::from_parts(tree, html, head, body)
    }

    /// Wrap an already-built tree. Missing elements are `NodeId::NONE`.
    pub fn from_tree(tree: DomTree) -> Self {
        let html = tree.find_element(tree.root(), "html").unwrap_or(NodeId::NONE);
        let head = tree.find_element(html, "head").unwrap_or(NodeId::NONE);
        let body = tree.find_element(html, "body").unwrap_or(NodeId::NONE);
        Self::from_parts(tree, html, head, body)
    }

    fn from_parts(tree: DomTree, html: NodeId, head: NodeId, body: NodeId) -> Self {
        Self {
            tree: Rc::new(RefCell::new(tree)),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    pub fn handle(&self, id: NodeId) -> LiveNode {
        LiveNode::new(Rc::clone(&self.tree), id)
    }

    pub fn root(&self) -> LiveNode {
        self.handle(NodeId::ROOT)
    }

    pub fn document_element(&self) -> LiveNode {
        self.handle(self.html_element)
    }

    pub fn head(&self) -> LiveNode {
        self.handle(self.head_element)
    }

    pub fn body(&self) -> LiveNode {
        self.handle(self.body_element)
    }

    /// Text of the first `<title>` in the head
    pub fn title(&self) -> String {
        let tree = self.tree.borrow();
        tree.children(self.head_element)
            .into_iter()
            .find(|id| {
                tree.get(*id)
                    .and_then(|n| n.as_element())
                    .is_some_and(|e| e.name == "title")
            })
            .map(|id| tree.text_content(id))
            .unwrap_or_default()
    }

    /// Create a detached element with attributes
    pub fn create_element(&self, name: &str, attrs: &[(&str, &str)]) -> DomResult<LiveNode> {
        let mut tree = self.tree.borrow_mut();
        let id = tree.create_element(name);
        for (attr, value) in attrs {
            tree.set_attribute(id, attr, value)?;
        }
        drop(tree);
        Ok(self.handle(id))
    }

    pub fn append_child(&self, parent: &LiveNode, child: &LiveNode) -> DomResult<()> {
        self.tree.borrow_mut().append_child(parent.id(), child.id())?;
        Ok(())
    }

    pub fn insert_before(
        &self,
        parent: &LiveNode,
        child: &LiveNode,
        reference: Option<&LiveNode>,
    ) -> DomResult<()> {
        self.tree
            .borrow_mut()
            .insert_before(parent.id(), child.id(), reference.map(LiveNode::id))?;
        Ok(())
    }

    pub fn remove(&self, node: &LiveNode) -> DomResult<()> {
        let mut tree = self.tree.borrow_mut();
        if let Some(parent) = tree.parent(node.id()) {
            tree.remove_child(parent, node.id())?;
        }
        Ok(())
    }

    /// Create an element and append it to `<head>`
    pub fn append_to_head(&self, name: &str, attrs: &[(&str, &str)]) -> DomResult<LiveNode> {
        let element = self.create_element(name, attrs)?;
        self.append_child(&self.head(), &element)?;
        Ok(element)
    }

    pub fn set_attribute(&self, node: &LiveNode, name: &str, value: &str) -> DomResult<()> {
        self.tree.borrow_mut().set_attribute(node.id(), name, value)
    }

    pub fn remove_attribute(&self, node: &LiveNode, name: &str) -> DomResult<Option<String>> {
        self.tree.borrow_mut().remove_attribute(node.id(), name)
    }

    pub fn set_text(&self, node: &LiveNode, text: &str) -> DomResult<()> {
        self.tree.borrow_mut().set_text_content(node.id(), text)
    }

    pub fn tree(&self) -> &Rc<RefCell<DomTree>> {
        &self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
