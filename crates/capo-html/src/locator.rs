//! Source positions for parsed elements
//!
//! html5ever does not report where an element came from, so start tags are
//! scanned from the source separately and paired with the parsed elements
//! in document order. Elements the parser synthesized (an implied `<head>`)
//! have no start tag and get no location.

use capo_core::SourceLocation;
use markup5ever_rcdom::{Handle, Node, NodeData};
use std::collections::HashMap;
use std::rc::Rc;

/// Elements whose content is text up to the matching end tag.
/// `noscript` is included because the parser runs with scripting enabled.
const RAW_TEXT: &[&str] = &[
    "script", "style", "title", "textarea", "xmp", "iframe", "noembed", "noframes", "noscript",
];

/// A start tag found in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Lowercase tag name
    pub name: String,
    /// Byte offset of `<`
    pub start: usize,
    /// Byte offset of the closing `>`
    pub end: usize,
}

/// Start-tag scanner over raw markup
pub struct TagScanner {
    tag_start_chars: [bool; 256],
    tag_name_chars: [bool; 256],
}

impl Default for TagScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl TagScanner {
    pub fn new() -> Self {
        let mut tag_start_chars = [false; 256];
        let mut tag_name_chars = [false; 256];

        for c in (b'a'..=b'z').chain(b'A'..=b'Z') {
            tag_start_chars[c as usize] = true;
            tag_name_chars[c as usize] = true;
        }
        for c in b'0'..=b'9' {
            tag_name_chars[c as usize] = true;
        }
        tag_name_chars[b'-' as usize] = true;

        Self {
            tag_start_chars,
            tag_name_chars,
        }
    }

    /// All start tags in source order. Comments, doctypes, end tags and
    /// raw-text content are skipped.
    pub fn scan(&self, html: &str) -> Vec<StartTag> {
        let bytes = html.as_bytes();
        let mut tags = Vec::new();
        let mut pos = 0;

        while let Some(offset) = find_byte(&bytes[pos..], b'<') {
            pos += offset;
            let rest = &bytes[pos..];

            if rest.starts_with(b"<!--") {
                pos = find_seq(bytes, pos + 4, b"-->").map_or(bytes.len(), |end| end + 3);
                continue;
            }
            if rest.starts_with(b"<!") || rest.starts_with(b"<?") || rest.starts_with(b"</") {
                pos = find_byte(&bytes[pos..], b'>').map_or(bytes.len(), |end| pos + end + 1);
                continue;
            }
            if !rest.get(1).is_some_and(|b| self.tag_start_chars[*b as usize]) {
                pos += 1;
                continue;
            }

            let name_end = self.scan_tag_name(bytes, pos + 1);
            let name = html[pos + 1..name_end].to_ascii_lowercase();
            let Some(end) = find_tag_end(bytes, name_end) else {
                break;
            };
            let start = pos;
            pos = end + 1;

            if RAW_TEXT.contains(&name.as_str()) {
                pos = find_end_tag(bytes, pos, &name).unwrap_or(bytes.len());
            }
            tags.push(StartTag { name, start, end });
        }

        tags
    }

    fn scan_tag_name(&self, html: &[u8], start: usize) -> usize {
        let mut pos = start;
        while pos < html.len() && self.tag_name_chars[html[pos] as usize] {
            pos += 1;
        }
        pos
    }
}

fn find_byte(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

fn find_seq(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| from + i)
}

/// `>` closing a start tag, skipping quoted attribute values
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote = None;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Offset of `</name` (case-insensitive) at or after `from`
fn find_end_tag(bytes: &[u8], from: usize, name: &str) -> Option<usize> {
    let mut pos = from;
    while let Some(offset) = find_seq(bytes, pos, b"</") {
        let candidate = offset + 2;
        let matches = bytes
            .get(candidate..candidate + name.len())
            .is_some_and(|n| n.eq_ignore_ascii_case(name.as_bytes()));
        if matches {
            return Some(offset);
        }
        pos = offset + 2;
    }
    None
}

/// Byte offset to 1-based line/column (columns count chars)
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |s| s.chars().count());
        (line, column + 1)
    }
}

/// Location keyed by node address; valid while the owning dom is alive
pub type LocationTable = HashMap<*const Node, SourceLocation>;

/// Pair parsed elements with scanned start tags
pub fn locate(document: &Handle, source: &str) -> LocationTable {
    let tags = TagScanner::new().scan(source);
    let index = LineIndex::new(source);
    let mut table = LocationTable::new();
    let mut cursor = 0;

    let mut stack = vec![Rc::clone(document)];
    while let Some(node) = stack.pop() {
        let mut next: Vec<Handle> = node.children.borrow().iter().cloned().collect();

        if let NodeData::Element {
            name,
            template_contents,
            ..
        } = &node.data
        {
            let tag: &str = &name.local;
            if let Some(found) = tags[cursor..].iter().position(|t| t.name == tag) {
                let matched = &tags[cursor + found];
                let (line, column) = index.position(matched.start);
                let (end_line, end_column) = index.position(matched.end);
                table.insert(
                    Rc::as_ptr(&node),
                    SourceLocation {
                        line,
                        column,
                        end_line: Some(end_line),
                        end_column: Some(end_column),
                    },
                );
                cursor += found + 1;
            }
            // template content comes first in source order
            if let Some(contents) = template_contents.borrow().as_ref() {
                let mut inner: Vec<Handle> = contents.children.borrow().iter().cloned().collect();
                inner.append(&mut next);
                next = inner;
            }
        }

        stack.extend(next.into_iter().rev());
    }

    tracing::trace!("located {} of {} start tags", table.len(), tags.len());
    table
}
