//! The engine driven by an adapter defined outside the crate

use capo_core::origin_trial::{self, OriginTrialPayload};
use capo_core::{
    AnalysisContext, AnalyzeOptions, ElementCategory, TreeAdapter, analyze, check_ordering,
};
use chrono::DateTime;

/// Flat arena: every node is an index
#[derive(Default)]
struct Flat {
    nodes: Vec<FlatNode>,
}

struct FlatNode {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl Flat {
    fn add(&mut self, parent: Option<usize>, tag: &str, attrs: &[(&str, &str)], text: &str) -> usize {
        let id = self.nodes.len();
        self.nodes.push(FlatNode {
            tag: tag.to_string(),
            attrs: attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            text: text.to_string(),
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    /// html > head, returning the head
    fn with_head() -> (Self, usize) {
        let mut flat = Flat::default();
        let html = flat.add(None, "html", &[], "");
        let head = flat.add(Some(html), "head", &[], "");
        (flat, head)
    }
}

struct FlatAdapter<'a>(&'a Flat);

impl TreeAdapter for FlatAdapter<'_> {
    type Node = usize;

    fn name(&self) -> &str {
        "flat"
    }

    fn is_element(&self, node: &usize) -> bool {
        self.0.nodes.get(*node).is_some()
    }

    fn tag_name(&self, node: &usize) -> String {
        self.0.nodes.get(*node).map(|n| n.tag.clone()).unwrap_or_default()
    }

    fn attribute(&self, node: &usize, name: &str) -> Option<String> {
        self.0.nodes.get(*node)?.attrs.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.clone())
    }

    fn attribute_names(&self, node: &usize) -> Vec<String> {
        self.0.nodes.get(*node).map(|n| n.attrs.iter().map(|(k, _)| k.clone()).collect()).unwrap_or_default()
    }

    fn text_content(&self, node: &usize) -> String {
        self.0.nodes.get(*node).map(|n| n.text.clone()).unwrap_or_default()
    }

    fn children(&self, node: &usize) -> Vec<usize> {
        self.0.nodes.get(*node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn parent(&self, node: &usize) -> Option<usize> {
        self.0.nodes.get(*node)?.parent
    }
}

fn weights(flat: &Flat, head: usize) -> Vec<u8> {
    let result = analyze(&head, &FlatAdapter(flat), &AnalysisContext::new(), AnalyzeOptions::default());
    result.weights.iter().map(|w| w.weight).collect()
}

#[test]
fn test_well_ordered_head() {
    let (mut flat, head) = Flat::with_head();
    flat.add(Some(head), "meta", &[("charset", "utf-8")], "");
    flat.add(Some(head), "title", &[], "X");
    flat.add(Some(head), "script", &[("src", "a.js")], "");
    let adapter = FlatAdapter(&flat);
    let result = analyze(&head, &adapter, &AnalysisContext::new(), AnalyzeOptions::default());

    assert_eq!(weights(&flat, head), vec![10, 9, 5]);
    assert!(check_ordering(&result.weights).is_empty());
    // only the missing viewport
    assert_eq!(result.validation_warnings.len(), 1);
}

#[test]
fn test_duplicate_titles() {
    let (mut flat, head) = Flat::with_head();
    let a = flat.add(Some(head), "title", &[], "A");
    let b = flat.add(Some(head), "title", &[], "B");
    let adapter = FlatAdapter(&flat);
    let result = analyze(&head, &adapter, &AnalysisContext::new(), AnalyzeOptions::default());

    let titles: Vec<_> = result
        .validation_warnings
        .iter()
        .filter(|w| w.message.contains("title"))
        .collect();
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0].elements, vec![a, b]);
    assert!(result.custom_validations.is_empty());
}

#[test]
fn test_stylesheet_before_charset() {
    let (mut flat, head) = Flat::with_head();
    flat.add(Some(head), "link", &[("rel", "stylesheet"), ("href", "a.css")], "");
    let meta = flat.add(Some(head), "meta", &[("charset", "utf-8")], "");
    let adapter = FlatAdapter(&flat);
    let result = analyze(&head, &adapter, &AnalysisContext::new(), AnalyzeOptions::weights_only());
    let violations = check_ordering(&result.weights);

    assert_eq!(weights(&flat, head), vec![4, 10]);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].index, 1);
    assert_eq!(violations[0].element, meta);
    assert_eq!(violations[0].category, ElementCategory::Meta);
    assert_eq!(violations[0].previous_category, ElementCategory::SyncStyles);
}

#[test]
fn test_corrupted_token_never_panics() {
    let payload = OriginTrialPayload {
        origin: "https://example.com".to_string(),
        feature: "Frobulate".to_string(),
        expiry: DateTime::from_timestamp(1_900_000_000, 0).unwrap(),
        is_subdomain: false,
        is_third_party: false,
        usage: None,
    };
    let token = origin_trial::encode_unsigned(&payload);
    assert_eq!(origin_trial::decode(&token).unwrap(), payload);

    use base64::Engine;
    let engine = base64::engine::general_purpose::STANDARD;
    let bytes = engine.decode(&token).unwrap();
    for offset in origin_trial::LENGTH_OFFSET..origin_trial::PAYLOAD_OFFSET {
        for value in [0x00u8, 0x01, 0x7f, 0xff] {
            let mut corrupted = bytes.clone();
            if corrupted[offset] == value {
                continue;
            }
            corrupted[offset] = value;
            let corrupted = engine.encode(&corrupted);

            let (mut flat, head) = Flat::with_head();
            let meta = flat.add(
                Some(head),
                "meta",
                &[("http-equiv", "origin-trial"), ("content", corrupted.as_str())],
                "",
            );
            let adapter = FlatAdapter(&flat);
            let result = analyze(&head, &adapter, &AnalysisContext::new(), AnalyzeOptions::default());
            let validation = result.custom_validation(&meta).unwrap();

            assert_eq!(validation.warnings, vec!["invalid token"], "offset {offset} value {value:#x}");
            assert!(validation.payload.is_none());
        }
    }
}

#[test]
fn test_analysis_is_deterministic() {
    let (mut flat, head) = Flat::with_head();
    flat.add(Some(head), "script", &[("src", "a.js"), ("async", "")], "");
    flat.add(Some(head), "meta", &[("name", "viewport"), ("content", "width=device-width, maximum-scale=1")], "");
    flat.add(Some(head), "style", &[], "@import url(a.css);");
    flat.add(Some(head), "div", &[], "");
    let adapter = FlatAdapter(&flat);
    let ctx = AnalysisContext::new();

    let first = analyze(&head, &adapter, &ctx, AnalyzeOptions::default());
    let second = analyze(&head, &adapter, &ctx, AnalyzeOptions::default());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.to_report(&adapter)).unwrap(),
        serde_json::to_string(&second.to_report(&adapter)).unwrap()
    );
}
