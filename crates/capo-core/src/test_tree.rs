//! Minimal reference-counted tree used by the unit tests.
//!
//! It doubles as the smallest possible third backend: nothing in the
//! engine knows about it beyond the `TreeAdapter` impl below.

use crate::adapter::TreeAdapter;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug)]
pub struct TestNode {
    tag: Option<String>,
    attrs: Vec<(String, String)>,
    text: String,
    children: RefCell<Vec<Rc<TestNode>>>,
    parent: RefCell<Weak<TestNode>>,
}

#[derive(Debug, Clone)]
pub struct NodeRef(Rc<TestNode>);

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl NodeRef {
    pub fn with_children(self, children: Vec<NodeRef>) -> Self {
        for child in children {
            *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
            self.0.children.borrow_mut().push(child.0);
        }
        self
    }
}

pub fn el(tag: &str, attrs: &[(&str, &str)]) -> NodeRef {
    NodeRef(Rc::new(TestNode {
        tag: Some(tag.to_ascii_lowercase()),
        attrs: attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        text: String::new(),
        children: RefCell::new(Vec::new()),
        parent: RefCell::new(Weak::new()),
    }))
}

pub fn text(content: &str) -> NodeRef {
    NodeRef(Rc::new(TestNode {
        tag: None,
        attrs: Vec::new(),
        text: content.to_string(),
        children: RefCell::new(Vec::new()),
        parent: RefCell::new(Weak::new()),
    }))
}

/// `<html><head>…</head></html>`; keep the returned html alive for parent lookups
pub struct TestDocument {
    pub html: NodeRef,
    pub head: NodeRef,
}

pub fn document(children: Vec<NodeRef>) -> TestDocument {
    let head = el("head", &[]).with_children(children);
    let html = el("html", &[]).with_children(vec![head.clone()]);
    TestDocument { html, head }
}

pub struct TestAdapter;

impl TreeAdapter for TestAdapter {
    type Node = NodeRef;

    fn name(&self) -> &str {
        "test"
    }

    fn is_element(&self, node: &NodeRef) -> bool {
        node.0.tag.is_some()
    }

    fn tag_name(&self, node: &NodeRef) -> String {
        node.0.tag.clone().unwrap_or_default()
    }

    fn attribute(&self, node: &NodeRef, name: &str) -> Option<String> {
        node.0
            .attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }

    fn attribute_names(&self, node: &NodeRef) -> Vec<String> {
        node.0.attrs.iter().map(|(k, _)| k.clone()).collect()
    }

    fn text_content(&self, node: &NodeRef) -> String {
        node.0
            .children
            .borrow()
            .iter()
            .filter(|c| c.tag.is_none())
            .map(|c| c.text.as_str())
            .collect()
    }

    fn children(&self, node: &NodeRef) -> Vec<NodeRef> {
        node.0
            .children
            .borrow()
            .iter()
            .filter(|c| c.tag.is_some())
            .cloned()
            .map(NodeRef)
            .collect()
    }

    fn parent(&self, node: &NodeRef) -> Option<NodeRef> {
        node.0.parent.borrow().upgrade().map(NodeRef)
    }
}
