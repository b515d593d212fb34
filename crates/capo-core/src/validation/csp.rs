//! Content Security Policy in `<meta>`
//!
//! Directive parsing and the meta-tag restrictions: report-only
//! policies and some directives are only honored as HTTP headers.

use super::{ElementValidation, ValidationPayload};
use crate::adapter::TreeAdapter;
use serde::Serialize;
use std::collections::BTreeMap;

pub const REPORT_URI: &str = "report-uri";
pub const FRAME_ANCESTORS: &str = "frame-ancestors";
pub const SANDBOX: &str = "sandbox";

/// Directives that browsers ignore when delivered through `<meta>`
const HEADER_ONLY_DIRECTIVES: &[(&str, &str)] = &[
    (
        REPORT_URI,
        "Use the Content-Security-Policy-Report-Only HTTP header instead.",
    ),
    (
        FRAME_ANCESTORS,
        "Use the Content-Security-Policy HTTP header instead.",
    ),
    (SANDBOX, "Use the Content-Security-Policy HTTP header instead."),
];

/// Parsed policy: directive name -> source list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CspPolicy {
    pub directives: BTreeMap<String, Vec<String>>,
}

impl CspPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a serialized policy. Directive names are case-insensitive
    /// and only the first occurrence of a directive counts.
    pub fn parse(policy: &str) -> Self {
        let mut parsed = Self::new();

        for directive in policy.split(';') {
            let mut parts = directive.split_whitespace();
            let Some(name) = parts.next() else {
                continue;
            };
            let values = parts.map(str::to_string).collect();
            parsed
                .directives
                .entry(name.to_ascii_lowercase())
                .or_insert(values);
        }

        parsed
    }

    pub fn contains(&self, directive: &str) -> bool {
        self.directives.contains_key(directive)
    }

    pub fn get(&self, directive: &str) -> Option<&[String]> {
        self.directives.get(directive).map(Vec::as_slice)
    }
}

pub fn validate_csp<A: TreeAdapter>(adapter: &A, element: &A::Node) -> ElementValidation {
    if adapter.matches(element, "meta[http-equiv=content-security-policy-report-only i]") {
        return ElementValidation::warning("CSP Report-Only is forbidden in meta tags");
    }

    let content = adapter
        .attribute(element, "content")
        .filter(|c| !c.trim().is_empty());
    let Some(content) = content else {
        return ElementValidation::warning("Invalid CSP. The content attribute must be set.");
    };

    let policy = CspPolicy::parse(&content);
    let mut result = ElementValidation::new();
    for (directive, advice) in HEADER_ONLY_DIRECTIVES {
        if policy.contains(directive) {
            result.warn(format!(
                "The {directive} directive is not supported in meta tags. {advice}"
            ));
        }
    }

    result.with_payload(ValidationPayload::ContentSecurityPolicy(policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_tree::{TestAdapter, el};

    #[test]
    fn test_parse_policy() {
        let policy = CspPolicy::parse(
            "default-src 'self'; Script-Src 'self' https://cdn.example.com;; script-src 'none'",
        );

        assert_eq!(policy.directives.len(), 2);
        assert_eq!(policy.get("default-src"), Some(&["'self'".to_string()][..]));
        assert_eq!(
            policy.get("script-src").map(<[String]>::len),
            Some(2),
            "first script-src wins"
        );
    }

    #[test]
    fn test_report_only_is_forbidden() {
        let meta = el(
            "meta",
            &[
                ("http-equiv", "Content-Security-Policy-Report-Only"),
                ("content", "default-src 'self'"),
            ],
        );
        let result = validate_csp(&TestAdapter, &meta);

        assert_eq!(result.warnings, vec!["CSP Report-Only is forbidden in meta tags"]);
        assert!(result.payload.is_none());
    }

    #[test]
    fn test_header_only_directives() {
        let meta = el(
            "meta",
            &[
                ("http-equiv", "Content-Security-Policy"),
                ("content", "default-src 'self'; report-uri /csp; frame-ancestors 'none'; sandbox"),
            ],
        );
        let result = validate_csp(&TestAdapter, &meta);

        assert_eq!(result.warnings.len(), 3);
        assert!(result.warnings[0].contains("report-uri"));
        assert!(result.warnings[1].contains("frame-ancestors"));
        assert!(result.warnings[2].contains("sandbox"));
        match result.payload {
            Some(ValidationPayload::ContentSecurityPolicy(policy)) => {
                assert!(policy.contains("default-src"));
                assert_eq!(policy.get("sandbox"), Some(&[][..]));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_missing_content() {
        let meta = el("meta", &[("http-equiv", "content-security-policy")]);
        let result = validate_csp(&TestAdapter, &meta);

        assert_eq!(result.warnings, vec!["Invalid CSP. The content attribute must be set."]);
        assert!(result.payload.is_none());
    }

    #[test]
    fn test_clean_policy() {
        let meta = el(
            "meta",
            &[("http-equiv", "content-security-policy"), ("content", "img-src https:")],
        );
        let result = validate_csp(&TestAdapter, &meta);

        assert!(result.warnings.is_empty());
        assert!(result.payload.is_some());
    }
}
