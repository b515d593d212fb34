//! Weight Classifier
//!
//! Maps every `<head>` child to exactly one [`ElementCategory`]. The
//! detectors run in descending weight order and the first match wins;
//! anything unmatched is [`ElementCategory::Other`]. Detection reads only
//! the element's own tag, attributes and text, so the result never
//! depends on position or siblings.

use crate::adapter::TreeAdapter;
use crate::selector::matches_any;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `http-equiv` values that make a `<meta>` top priority
pub const META_HTTP_EQUIV_KEYWORDS: &[&str] = &[
    "accept-ch",
    "content-security-policy",
    "content-type",
    "default-style",
    "delegate-ch",
    "origin-trial",
    "x-dns-prefetch-control",
];

/// Priority bucket, totally ordered by weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementCategory {
    Meta,
    Title,
    Preconnect,
    AsyncScript,
    ImportStyles,
    SyncScript,
    SyncStyles,
    Preload,
    DeferScript,
    PrefetchPrerender,
    Other,
}

impl ElementCategory {
    /// All categories, heaviest first
    pub const ALL: [ElementCategory; 11] = [
        ElementCategory::Meta,
        ElementCategory::Title,
        ElementCategory::Preconnect,
        ElementCategory::AsyncScript,
        ElementCategory::ImportStyles,
        ElementCategory::SyncScript,
        ElementCategory::SyncStyles,
        ElementCategory::Preload,
        ElementCategory::DeferScript,
        ElementCategory::PrefetchPrerender,
        ElementCategory::Other,
    ];

    pub fn weight(self) -> u8 {
        match self {
            ElementCategory::Meta => 10,
            ElementCategory::Title => 9,
            ElementCategory::Preconnect => 8,
            ElementCategory::AsyncScript => 7,
            ElementCategory::ImportStyles => 6,
            ElementCategory::SyncScript => 5,
            ElementCategory::SyncStyles => 4,
            ElementCategory::Preload => 3,
            ElementCategory::DeferScript => 2,
            ElementCategory::PrefetchPrerender => 1,
            ElementCategory::Other => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementCategory::Meta => "META",
            ElementCategory::Title => "TITLE",
            ElementCategory::Preconnect => "PRECONNECT",
            ElementCategory::AsyncScript => "ASYNC_SCRIPT",
            ElementCategory::ImportStyles => "IMPORT_STYLES",
            ElementCategory::SyncScript => "SYNC_SCRIPT",
            ElementCategory::SyncStyles => "SYNC_STYLES",
            ElementCategory::Preload => "PRELOAD",
            ElementCategory::DeferScript => "DEFER_SCRIPT",
            ElementCategory::PrefetchPrerender => "PREFETCH_PRERENDER",
            ElementCategory::Other => "OTHER",
        }
    }

    /// Category for a weight value
    pub fn from_weight(weight: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.weight() == weight)
    }
}

impl PartialOrd for ElementCategory {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ElementCategory {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.weight().cmp(&other.weight())
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Weight computed for one `<head>` child
#[derive(Debug, Clone, PartialEq)]
pub struct WeightInfo<N> {
    pub element: N,
    pub category: ElementCategory,
    pub weight: u8,
}

/// One row of the rule table
pub struct Detector<A: TreeAdapter> {
    pub category: ElementCategory,
    pub detect: fn(&A, &A::Node) -> bool,
}

/// Rule table in evaluation order
pub fn detectors<A: TreeAdapter>() -> [Detector<A>; 10] {
    [
        Detector { category: ElementCategory::Meta, detect: is_meta::<A> },
        Detector { category: ElementCategory::Title, detect: is_title::<A> },
        Detector { category: ElementCategory::Preconnect, detect: is_preconnect::<A> },
        Detector { category: ElementCategory::AsyncScript, detect: is_async_script::<A> },
        Detector { category: ElementCategory::ImportStyles, detect: is_import_styles::<A> },
        Detector { category: ElementCategory::SyncScript, detect: is_sync_script::<A> },
        Detector { category: ElementCategory::SyncStyles, detect: is_sync_styles::<A> },
        Detector { category: ElementCategory::Preload, detect: is_preload::<A> },
        Detector { category: ElementCategory::DeferScript, detect: is_defer_script::<A> },
        Detector {
            category: ElementCategory::PrefetchPrerender,
            detect: is_prefetch_prerender::<A>,
        },
    ]
}

/// Category of a single element
pub fn classify<A: TreeAdapter>(adapter: &A, element: &A::Node) -> ElementCategory {
    let category = detectors::<A>()
        .iter()
        .find(|d| (d.detect)(adapter, element))
        .map(|d| d.category)
        .unwrap_or(ElementCategory::Other);
    tracing::trace!("{} -> {}", adapter.stringify(element), category);
    category
}

/// Weight of a single element
pub fn get_weight<A: TreeAdapter>(adapter: &A, element: &A::Node) -> u8 {
    classify(adapter, element).weight()
}

/// Weights for every child of `head`, in document order
pub fn get_head_weights<A: TreeAdapter>(adapter: &A, head: &A::Node) -> Vec<WeightInfo<A::Node>> {
    adapter
        .children(head)
        .into_iter()
        .map(|element| {
            let category = classify(adapter, &element);
            WeightInfo {
                element,
                category,
                weight: category.weight(),
            }
        })
        .collect()
}

pub fn is_meta<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    match adapter.tag_name(element).as_str() {
        "base" => true,
        "meta" => {
            if adapter.has_attribute(element, "charset")
                || adapter.matches(element, "meta[name=viewport i]")
            {
                return true;
            }
            adapter
                .attribute(element, "http-equiv")
                .is_some_and(|value| {
                    META_HTTP_EQUIV_KEYWORDS
                        .iter()
                        .any(|k| value.eq_ignore_ascii_case(k))
                })
        }
        _ => false,
    }
}

pub fn is_title<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    adapter.matches(element, "title")
}

pub fn is_preconnect<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    adapter.matches(element, "link[rel=preconnect i]")
}

pub fn is_async_script<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    adapter.matches(element, "script[src][async]")
}

pub fn is_import_styles<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    matches_any(adapter, element, &["style", "link[rel=stylesheet i]"])
        && adapter.text_content(element).contains("@import")
}

pub fn is_sync_script<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    if !adapter.matches(element, "script") {
        return false;
    }
    let has_src = adapter.has_attribute(element, "src");
    let deferred = has_src && adapter.has_attribute(element, "defer");
    let asynchronous = has_src && adapter.has_attribute(element, "async");
    let deferred_module = is_module(adapter, element) && !adapter.has_attribute(element, "async");
    let is_json = script_type(adapter, element).is_some_and(|t| t.contains("json"));
    !(deferred || asynchronous || deferred_module || is_json)
}

pub fn is_sync_styles<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    matches_any(adapter, element, &["link[rel=stylesheet i]", "style"])
}

pub fn is_preload<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    matches_any(
        adapter,
        element,
        &["link[rel=preload i]", "link[rel=modulepreload i]"],
    )
}

pub fn is_defer_script<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    if !adapter.matches(element, "script") {
        return false;
    }
    let has_src = adapter.has_attribute(element, "src");
    if has_src && adapter.has_attribute(element, "defer") {
        return true;
    }
    is_module(adapter, element) && !adapter.has_attribute(element, "async")
}

pub fn is_prefetch_prerender<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    matches_any(
        adapter,
        element,
        &[
            "link[rel=prefetch i]",
            "link[rel=dns-prefetch i]",
            "link[rel=prerender i]",
        ],
    )
}

pub fn is_origin_trial<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    adapter.matches(element, "meta[http-equiv=origin-trial i]")
}

pub fn is_meta_csp<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    matches_any(
        adapter,
        element,
        &[
            "meta[http-equiv=content-security-policy i]",
            "meta[http-equiv=content-security-policy-report-only i]",
        ],
    )
}

fn script_type<A: TreeAdapter>(adapter: &A, element: &A::Node) -> Option<String> {
    adapter
        .attribute(element, "type")
        .map(|t| t.trim().to_ascii_lowercase())
}

fn is_module<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    script_type(adapter, element).is_some_and(|t| t == "module")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_tree::{TestAdapter, el, text};

    fn weight_of(tag: &str, attrs: &[(&str, &str)]) -> u8 {
        get_weight(&TestAdapter, &el(tag, attrs))
    }

    #[test]
    fn test_weights_are_ordered() {
        let weights: Vec<u8> = ElementCategory::ALL.iter().map(|c| c.weight()).collect();
        assert_eq!(weights, vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        assert!(ElementCategory::Meta > ElementCategory::Title);
        assert!(ElementCategory::DeferScript < ElementCategory::Preload);
        assert_eq!(ElementCategory::from_weight(6), Some(ElementCategory::ImportStyles));
        assert_eq!(ElementCategory::from_weight(11), None);
    }

    #[test]
    fn test_meta() {
        assert_eq!(weight_of("meta", &[("charset", "utf-8")]), 10);
        assert_eq!(weight_of("meta", &[("name", "viewport"), ("content", "width=device-width")]), 10);
        assert_eq!(weight_of("meta", &[("http-equiv", "Content-Security-Policy")]), 10);
        assert_eq!(weight_of("meta", &[("http-equiv", "ORIGIN-TRIAL")]), 10);
        assert_eq!(weight_of("base", &[("href", "/")]), 10);
        assert_eq!(weight_of("meta", &[("name", "description")]), 0);
        assert_eq!(weight_of("meta", &[("http-equiv", "refresh")]), 0);
        assert_eq!(weight_of("meta", &[("http-equiv", "content-type-x")]), 0);
    }

    #[test]
    fn test_title_and_preconnect() {
        assert_eq!(weight_of("title", &[]), 9);
        assert_eq!(weight_of("link", &[("rel", "preconnect"), ("href", "https://a")]), 8);
        assert_eq!(weight_of("link", &[("rel", "PreConnect")]), 8);
    }

    #[test]
    fn test_scripts() {
        assert_eq!(weight_of("script", &[("src", "a.js"), ("async", "")]), 7);
        // async without src blocks like any inline script
        assert_eq!(weight_of("script", &[("async", "")]), 5);
        assert_eq!(weight_of("script", &[("src", "a.js")]), 5);
        assert_eq!(weight_of("script", &[]), 5);
        assert_eq!(weight_of("script", &[("src", "a.js"), ("defer", "")]), 2);
        assert_eq!(weight_of("script", &[("defer", "")]), 5);
        assert_eq!(weight_of("script", &[("src", "a.js"), ("type", "module")]), 2);
        assert_eq!(weight_of("script", &[("type", "Module")]), 2);
        assert_eq!(
            weight_of("script", &[("src", "a.js"), ("type", "module"), ("async", "")]),
            7
        );
        assert_eq!(
            weight_of("script", &[("src", "a.js"), ("defer", ""), ("async", "")]),
            7
        );
        // inline async module, same as an inline async classic script
        assert_eq!(weight_of("script", &[("type", "module"), ("async", "")]), 5);
        assert_eq!(weight_of("script", &[("type", "application/ld+json")]), 0);
        assert_eq!(weight_of("script", &[("type", "importmap")]), 5);
    }

    #[test]
    fn test_styles() {
        let adapter = TestAdapter;
        let import = el("style", &[]).with_children(vec![text("@import url(a.css);")]);
        let plain = el("style", &[]).with_children(vec![text("body { color: red }")]);

        assert_eq!(get_weight(&adapter, &import), 6);
        assert_eq!(get_weight(&adapter, &plain), 4);
        assert_eq!(weight_of("link", &[("rel", "stylesheet"), ("href", "a.css")]), 4);
        assert_eq!(weight_of("link", &[("rel", "Stylesheet")]), 4);
    }

    #[test]
    fn test_hints() {
        assert_eq!(weight_of("link", &[("rel", "preload"), ("href", "a.js")]), 3);
        assert_eq!(weight_of("link", &[("rel", "modulepreload"), ("href", "a.js")]), 3);
        assert_eq!(weight_of("link", &[("rel", "prefetch"), ("href", "a.js")]), 1);
        assert_eq!(weight_of("link", &[("rel", "dns-prefetch"), ("href", "//a")]), 1);
        assert_eq!(weight_of("link", &[("rel", "prerender"), ("href", "/next")]), 1);
        assert_eq!(weight_of("link", &[("rel", "icon"), ("href", "/favicon.ico")]), 0);
    }

    #[test]
    fn test_other() {
        assert_eq!(weight_of("noscript", &[]), 0);
        assert_eq!(weight_of("template", &[]), 0);
        assert_eq!(weight_of("div", &[]), 0);
        assert_eq!(get_weight(&TestAdapter, &text("loose")), 0);
    }

    #[test]
    fn test_exactly_one_category() {
        let adapter = TestAdapter;
        let samples = vec![
            el("meta", &[("charset", "utf-8")]),
            el("script", &[("src", "a.js"), ("defer", ""), ("async", "")]),
            el("link", &[("rel", "stylesheet")]),
            el("style", &[]).with_children(vec![text("@import 'x';")]),
            el("script", &[("type", "module")]),
        ];
        for sample in &samples {
            let first = classify(&adapter, sample);
            assert_eq!(classify(&adapter, sample), first);
            assert!(first.weight() <= 10);
        }
    }
}
