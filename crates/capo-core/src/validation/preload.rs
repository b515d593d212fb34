//! Preloads of resources the parser already discovers

use super::{ElementValidation, ValidationPayload};
use crate::adapter::TreeAdapter;
use crate::context::AnalysisContext;
use crate::selector::matches_any;
use url::Url;

const PRELOAD_PATTERNS: &[&str] = &["link[rel=preload i][href]", "link[rel=modulepreload i][href]"];

pub fn is_unnecessary_preload<A: TreeAdapter>(
    adapter: &A,
    element: &A::Node,
    ctx: &AnalysisContext,
) -> bool {
    find_discoverer(adapter, element, ctx).is_some()
}

pub fn validate_unnecessary_preload<A: TreeAdapter>(
    adapter: &A,
    element: &A::Node,
    ctx: &AnalysisContext,
) -> ElementValidation {
    let Some(discovery) = find_discoverer(adapter, element, ctx) else {
        return ElementValidation::new();
    };

    ElementValidation::warning(format!(
        "This preload has little to no effect. {} is already discoverable by another {} element.",
        discovery.href, discovery.tag
    ))
    .with_payload(ValidationPayload::UnnecessaryPreload {
        href: discovery.href,
        url: discovery.url,
        discovered_by: discovery.markup,
    })
}

struct Discovery {
    href: String,
    url: String,
    tag: String,
    markup: String,
}

/// Sibling that already references the preloaded URL
fn find_discoverer<A: TreeAdapter>(
    adapter: &A,
    element: &A::Node,
    ctx: &AnalysisContext,
) -> Option<Discovery> {
    if !matches_any(adapter, element, PRELOAD_PATTERNS) {
        return None;
    }
    let href = adapter.attribute(element, "href")?;
    let base = adapter
        .parent(element)
        .and_then(|parent| ctx.effective_base_url(adapter, &parent));
    let url = absolutize(base.as_ref(), &href);

    adapter.siblings(element).into_iter().find_map(|sibling| {
        let reference = if adapter.matches(&sibling, "script[src]") {
            adapter.attribute(&sibling, "src")
        } else if adapter.matches(&sibling, "link[href]")
            && !matches_any(adapter, &sibling, PRELOAD_PATTERNS)
        {
            adapter.attribute(&sibling, "href")
        } else {
            None
        }?;

        (absolutize(base.as_ref(), &reference) == url).then(|| Discovery {
            href: href.clone(),
            url: url.clone(),
            tag: adapter.tag_name(&sibling),
            markup: adapter.stringify(&sibling),
        })
    })
}

/// Resolve against the base, or keep the reference as written
fn absolutize(base: Option<&Url>, reference: &str) -> String {
    let reference = reference.trim();
    let resolved = match base {
        Some(base) => base.join(reference),
        None => Url::parse(reference),
    };
    resolved.map(String::from).unwrap_or_else(|_| reference.to_string())
}
