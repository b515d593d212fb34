//! Parsed markup into a live tree
//!
//! Converts html5ever's rcdom into a `capo-dom` document so static markup
//! can be analyzed, edited and re-analyzed through live handles.

use crate::StaticDocument;
use capo_dom::{Document, DomResult, DomTree, NodeId};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData};

/// Parse markup straight into a live document
pub fn parse_live(html: &str) -> DomResult<Document> {
    to_live(&StaticDocument::parse(html))
}

/// Copy a parsed document into a fresh live tree
pub fn to_live(document: &StaticDocument) -> DomResult<Document> {
    let mut tree = DomTree::new();
    let root = tree.root();
    convert_node(&document.document(), &mut tree, root)?;
    tracing::debug!("converted {} nodes", tree.len());
    Ok(Document::from_tree(tree))
}

fn convert_node(handle: &Handle, tree: &mut DomTree, parent: NodeId) -> DomResult<()> {
    match &handle.data {
        RcNodeData::Document => {
            for child in handle.children.borrow().iter() {
                convert_node(child, tree, parent)?;
            }
        }
        RcNodeData::Text { contents } => {
            let text = contents.borrow();
            if !text.trim().is_empty() {
                let id = tree.create_text(&text);
                tree.append_child(parent, id)?;
            }
        }
        RcNodeData::Comment { contents } => {
            let id = tree.create_comment(contents);
            tree.append_child(parent, id)?;
        }
        RcNodeData::Element { name, attrs, .. } => {
            let id = tree.create_element(&name.local);
            for attr in attrs.borrow().iter() {
                tree.set_attribute(id, &attr.name.local, &attr.value)?;
            }
            tree.append_child(parent, id)?;

            // <template> content stays in its own fragment, as in browsers
            for child in handle.children.borrow().iter() {
                convert_node(child, tree, id)?;
            }
        }
        RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {}
    }
    Ok(())
}
