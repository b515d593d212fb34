//! Document-level pass over all `<head>` children

use super::ValidationWarning;
use super::trial::token_problems;
use super::viewport::is_meta_viewport;
use crate::adapter::TreeAdapter;
use crate::context::AnalysisContext;
use crate::origin_trial;
use crate::weights::{is_meta_csp, is_origin_trial, is_title};

/// Tags allowed as children of `<head>`
pub const VALID_HEAD_ELEMENTS: &[&str] = &[
    "base", "link", "meta", "noscript", "script", "style", "template", "title",
];

pub fn is_valid_element<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    VALID_HEAD_ELEMENTS.contains(&adapter.tag_name(element).as_str())
}

/// Structural problems across the whole head, in a fixed order:
/// cardinality, CSP, disallowed elements, origin-trial tokens.
pub fn get_validation_warnings<A: TreeAdapter>(
    adapter: &A,
    head: &A::Node,
    ctx: &AnalysisContext,
) -> Vec<ValidationWarning<A::Node>> {
    let children = adapter.children(head);
    let mut warnings = Vec::new();

    let titles = select(adapter, &children, is_title);
    if titles.len() != 1 {
        warnings.push(ValidationWarning::new(
            format!("Expected exactly 1 title, found {}", titles.len()),
            titles,
        ));
    }

    let viewports = select(adapter, &children, is_meta_viewport);
    if viewports.len() != 1 {
        warnings.push(ValidationWarning::new(
            format!("Expected exactly 1 viewport meta, found {}", viewports.len()),
            viewports,
        ));
    }

    let bases = select(adapter, &children, |a, n| a.matches(n, "base"));
    if bases.len() > 1 {
        warnings.push(ValidationWarning::new(
            format!("Expected at most 1 base, found {}", bases.len()),
            bases,
        ));
    }

    let csp = select(adapter, &children, is_meta_csp);
    if !csp.is_empty() {
        warnings.push(ValidationWarning::new(
            "CSP meta tags disable the preload scanner due to a bug in Chrome. Use the CSP \
             header instead. Learn more: https://crbug.com/1458493",
            csp,
        ));
    }

    for child in &children {
        if !is_valid_element(adapter, child) {
            warnings.push(disallowed(child, &adapter.tag_name(child)));
        }
        for tag in invalid_descendants(adapter, child) {
            warnings.push(disallowed(child, &tag));
        }
    }

    for trial in select(adapter, &children, is_origin_trial) {
        let token = adapter.attribute(&trial, "content").unwrap_or_default();
        let problems = match origin_trial::decode(&token) {
            Ok(payload) => token_problems(&payload, ctx),
            Err(_) => vec!["invalid token"],
        };
        if !problems.is_empty() {
            warnings.push(ValidationWarning::new(
                format!("Invalid origin trial token: {}", problems.join(", ")),
                vec![trial],
            ));
        }
    }

    tracing::debug!("document pass: {} warning(s)", warnings.len());
    warnings
}

fn select<A: TreeAdapter>(
    adapter: &A,
    children: &[A::Node],
    predicate: impl Fn(&A, &A::Node) -> bool,
) -> Vec<A::Node> {
    children
        .iter()
        .filter(|child| predicate(adapter, child))
        .cloned()
        .collect()
}

fn disallowed<N: Clone>(child: &N, tag: &str) -> ValidationWarning<N> {
    ValidationWarning::new(
        format!("<{tag}> elements are not allowed in the <head>"),
        vec![child.clone()],
    )
}

/// Disallowed tags nested inside a head child, `<template>` content excluded
fn invalid_descendants<A: TreeAdapter>(adapter: &A, child: &A::Node) -> Vec<String> {
    if adapter.tag_name(child) == "template" {
        return Vec::new();
    }

    let mut found = Vec::new();
    let mut stack: Vec<A::Node> = adapter.children(child).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        let tag = adapter.tag_name(&node);
        if tag == "template" {
            continue;
        }
        if !VALID_HEAD_ELEMENTS.contains(&tag.as_str()) {
            found.push(tag);
        }
        stack.extend(adapter.children(&node).into_iter().rev());
    }
    found
}
