//! Adapter-driven markup serialization
//!
//! Rebuilds markup from what an adapter exposes: start tag, direct text,
//! child elements, end tag. Text and child elements are not interleaved
//! (adapters only report concatenated text), which is exact for `<head>`
//! content where text lives in leaf elements.

use crate::adapter::TreeAdapter;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Is `tag` a void element (no end tag)
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// `<tag attr="value">` for an element, empty for anything else
pub fn start_tag<A: TreeAdapter + ?Sized>(adapter: &A, node: &A::Node) -> String {
    let mut out = String::new();
    if adapter.is_element(node) {
        write_start_tag(adapter, node, &mut out);
    }
    out
}

/// Full markup of an element and its descendants
pub fn outer_html<A: TreeAdapter + ?Sized>(adapter: &A, node: &A::Node) -> String {
    let mut out = String::new();
    if adapter.is_element(node) {
        let mut found = None;
        write_element(adapter, node, None, &mut out, &mut found);
    }
    out
}

/// Topmost ancestor element of `node` (the node itself when detached)
pub fn document_root<A: TreeAdapter + ?Sized>(adapter: &A, node: &A::Node) -> A::Node {
    let mut current = node.clone();
    while let Some(parent) = adapter.parent(&current) {
        current = parent;
    }
    current
}

/// Byte offset just past the end of `target` in the serialized document
/// that contains it.
pub fn end_offset_in_document<A: TreeAdapter + ?Sized>(adapter: &A, target: &A::Node) -> Option<usize> {
    if !adapter.is_element(target) {
        return None;
    }
    let root = document_root(adapter, target);
    let mut out = String::new();
    let mut found = None;
    write_element(adapter, &root, Some(target), &mut out, &mut found);
    found
}

fn write_start_tag<A: TreeAdapter + ?Sized>(adapter: &A, node: &A::Node, out: &mut String) {
    out.push('<');
    out.push_str(&adapter.tag_name(node));
    for name in adapter.attribute_names(node) {
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        if let Some(value) = adapter.attribute(node, &name) {
            escape_attribute(&value, out);
        }
        out.push('"');
    }
    out.push('>');
}

fn write_element<A: TreeAdapter + ?Sized>(
    adapter: &A,
    node: &A::Node,
    target: Option<&A::Node>,
    out: &mut String,
    found: &mut Option<usize>,
) {
    if found.is_some() {
        return;
    }

    write_start_tag(adapter, node, out);
    let tag = adapter.tag_name(node);
    if !is_void(&tag) {
        let text = adapter.text_content(node);
        if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
            out.push_str(&text);
        } else {
            escape_text(&text, out);
        }
        for child in adapter.children(node) {
            write_element(adapter, &child, target, out, found);
            if found.is_some() {
                return;
            }
        }
        out.push_str("</");
        out.push_str(&tag);
        out.push('>');
    }

    if target == Some(node) {
        *found = Some(out.len());
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_text(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}
