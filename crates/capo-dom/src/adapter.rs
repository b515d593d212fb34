//! `TreeAdapter` over the live tree

use crate::{DomTree, Node, NodeId};
use capo_core::TreeAdapter;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Handle to one node of a shared tree.
///
/// Two handles are equal when they point at the same node of the same
/// tree, regardless of the node's content.
#[derive(Clone)]
pub struct LiveNode {
    tree: Rc<RefCell<DomTree>>,
    id: NodeId,
}

impl LiveNode {
    pub fn new(tree: Rc<RefCell<DomTree>>, id: NodeId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &Rc<RefCell<DomTree>> {
        &self.tree
    }

    /// Handle to another node of the same tree
    pub fn sibling_handle(&self, id: NodeId) -> Self {
        Self::new(Rc::clone(&self.tree), id)
    }

    fn with_node<R>(&self, f: impl FnOnce(&Node) -> R) -> Option<R> {
        self.tree.borrow().get(self.id).map(f)
    }
}

impl PartialEq for LiveNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Rc::ptr_eq(&self.tree, &other.tree)
    }
}

impl Eq for LiveNode {}

impl fmt::Debug for LiveNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveNode").field("id", &self.id).finish()
    }
}

/// Adapter for [`LiveNode`] handles
#[derive(Debug, Clone, Copy, Default)]
pub struct DomAdapter;

impl DomAdapter {
    pub const NAME: &'static str = "dom";
}

impl TreeAdapter for DomAdapter {
    type Node = LiveNode;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_element(&self, node: &LiveNode) -> bool {
        node.with_node(Node::is_element).unwrap_or(false)
    }

    fn tag_name(&self, node: &LiveNode) -> String {
        node.with_node(|n| n.as_element().map(|e| e.name.clone()))
            .flatten()
            .unwrap_or_default()
    }

    fn attribute(&self, node: &LiveNode, name: &str) -> Option<String> {
        node.with_node(|n| {
            n.as_element()
                .and_then(|e| e.get_attr(name))
                .map(str::to_string)
        })
        .flatten()
    }

    fn attribute_names(&self, node: &LiveNode) -> Vec<String> {
        node.with_node(|n| {
            n.as_element()
                .map(|e| e.attrs.iter().map(|a| a.name.clone()).collect())
                .unwrap_or_default()
        })
        .unwrap_or_default()
    }

    fn text_content(&self, node: &LiveNode) -> String {
        if !self.is_element(node) {
            return String::new();
        }
        node.tree.borrow().text_content(node.id)
    }

    fn children(&self, node: &LiveNode) -> Vec<LiveNode> {
        if !self.is_element(node) {
            return Vec::new();
        }
        let tree = node.tree.borrow();
        tree.children(node.id)
            .into_iter()
            .filter(|child| tree.get(*child).is_some_and(Node::is_element))
            .map(|child| node.sibling_handle(child))
            .collect()
    }

    fn parent(&self, node: &LiveNode) -> Option<LiveNode> {
        let tree = node.tree.borrow();
        tree.parent(node.id)
            .filter(|parent| tree.get(*parent).is_some_and(Node::is_element))
            .map(|parent| node.sibling_handle(parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    #[test]
    fn test_handle_identity() {
        let doc = Document::new();
        let a = doc.append_to_head("meta", &[("charset", "utf-8")]).unwrap();
        let b = doc.append_to_head("meta", &[("charset", "utf-8")]).unwrap();

        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let other = Document::new();
        assert_ne!(doc.head(), other.head(), "same id, different tree");
    }

    #[test]
    fn test_adapter_reads() {
        let adapter = DomAdapter;
        let doc = Document::new();
        let title = doc.append_to_head("title", &[]).unwrap();
        doc.set_text(&title, "Hello").unwrap();
        let script = doc.append_to_head("SCRIPT", &[("SRC", "a.js"), ("async", "")]).unwrap();

        assert_eq!(adapter.tag_name(&script), "script");
        assert_eq!(adapter.attribute(&script, "src").as_deref(), Some("a.js"));
        assert_eq!(adapter.attribute_names(&script), vec!["src", "async"]);
        assert_eq!(adapter.text_content(&title), "Hello");
        assert_eq!(adapter.children(&doc.head()), vec![title.clone(), script.clone()]);
        assert_eq!(adapter.parent(&title), Some(doc.head()));
        assert_eq!(adapter.siblings(&title), vec![script.clone()]);
        assert!(adapter.matches(&script, "script[src][async]"));
        assert_eq!(adapter.stringify(&script), "<script src=\"a.js\" async=\"\">");
        assert_eq!(adapter.location(&script), None);
    }

    #[test]
    fn test_top_of_element_tree() {
        let adapter = DomAdapter;
        let doc = Document::new();
        let html = doc.document_element();

        assert_eq!(adapter.parent(&html), None);
        assert!(!adapter.is_element(&doc.root()));
        assert!(adapter.children(&doc.root()).is_empty());
    }
}
