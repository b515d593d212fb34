//! Character encoding declarations
//!
//! `<meta charset>` or `<meta http-equiv="content-type">`: one per
//! document, serialized within the first 1024 bytes, and UTF-8.

use super::{ElementValidation, ValidationPayload};
use crate::adapter::TreeAdapter;
use crate::selector::matches_any;
use crate::serialize;

/// Prescan window browsers use to sniff the encoding
pub const PRESCAN_BYTES: usize = 1024;

const DECLARATION_PATTERNS: &[&str] = &["meta[charset]", "meta[http-equiv=content-type i]"];

pub fn is_content_type<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    matches_any(adapter, element, DECLARATION_PATTERNS)
}

pub fn validate_content_type<A: TreeAdapter>(adapter: &A, element: &A::Node) -> ElementValidation {
    let mut result = ElementValidation::new();

    let others = adapter
        .siblings(element)
        .into_iter()
        .filter(|sibling| is_content_type(adapter, sibling))
        .count();
    if others > 0 {
        result.warn(
            "There can only be one meta-based character encoding declaration per document. \
             Use either `<meta charset>` or `<meta http-equiv>`, but not both.",
        );
    }

    let byte_offset = serialize::end_offset_in_document(adapter, element);
    if let Some(offset) = byte_offset.filter(|offset| *offset > PRESCAN_BYTES) {
        result.warn(format!(
            "The element containing the character encoding declaration must be serialized \
             completely within the first {PRESCAN_BYTES} bytes of the document. Found at byte {offset}."
        ));
    }

    let charset = declared_charset(adapter, element);
    let is_utf8 = charset
        .as_deref()
        .is_some_and(|c| c.eq_ignore_ascii_case("utf-8"));
    if !is_utf8 {
        result.warn(format!(
            "Documents are required to use UTF-8 encoding. Found \"{}\".",
            charset.as_deref().unwrap_or_default()
        ));
    }

    if result.warnings.is_empty() {
        return result;
    }
    result.with_payload(ValidationPayload::Charset {
        charset,
        byte_offset,
    })
}

/// Encoding named by either declaration form
fn declared_charset<A: TreeAdapter>(adapter: &A, element: &A::Node) -> Option<String> {
    if let Some(charset) = adapter.attribute(element, "charset") {
        return Some(charset.trim().to_string());
    }
    let content = adapter.attribute(element, "content")?;
    let lower = content.to_ascii_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let value = content[start..]
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_tree::{TestAdapter, document, el, text};

    #[test]
    fn test_valid_charset() {
        let adapter = TestAdapter;
        let doc = document(vec![el("meta", &[("charset", "UTF-8")])]);
        let meta = adapter.children(&doc.head).remove(0);

        assert!(validate_content_type(&adapter, &meta).is_empty());
    }

    #[test]
    fn test_http_equiv_form() {
        let adapter = TestAdapter;
        let doc = document(vec![el(
            "meta",
            &[("http-equiv", "Content-Type"), ("content", "text/html; charset=ISO-8859-1")],
        )]);
        let meta = adapter.children(&doc.head).remove(0);
        let result = validate_content_type(&adapter, &meta);

        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Found \"ISO-8859-1\""));
        assert_eq!(
            result.payload,
            Some(ValidationPayload::Charset {
                charset: Some("ISO-8859-1".to_string()),
                byte_offset: Some(
                    "<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=ISO-8859-1\">".len()
                ),
            })
        );
    }

    #[test]
    fn test_duplicate_declarations() {
        let adapter = TestAdapter;
        let doc = document(vec![
            el("meta", &[("charset", "utf-8")]),
            el("meta", &[("http-equiv", "content-type"), ("content", "text/html; charset=utf-8")]),
        ]);
        for meta in adapter.children(&doc.head) {
            let result = validate_content_type(&adapter, &meta);
            assert_eq!(result.warnings.len(), 1);
            assert!(result.warnings[0].contains("only be one"));
        }
    }

    #[test]
    fn test_late_declaration() {
        let adapter = TestAdapter;
        let filler = "x".repeat(1100);
        let doc = document(vec![
            el("title", &[]).with_children(vec![text(&filler)]),
            el("meta", &[("charset", "utf-8")]),
        ]);
        let meta = adapter.children(&doc.head).remove(1);
        let result = validate_content_type(&adapter, &meta);

        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("first 1024 bytes"));
    }

    #[test]
    fn test_missing_charset_value() {
        let adapter = TestAdapter;
        let doc = document(vec![el("meta", &[("http-equiv", "content-type"), ("content", "text/html")])]);
        let meta = adapter.children(&doc.head).remove(0);
        let result = validate_content_type(&adapter, &meta);

        assert_eq!(result.warnings, vec!["Documents are required to use UTF-8 encoding. Found \"\"."]);
    }
}
