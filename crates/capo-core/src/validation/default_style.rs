//! `<meta http-equiv="default-style">`

use super::{ElementValidation, ValidationPayload};
use crate::adapter::TreeAdapter;

pub fn is_default_style<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    adapter.matches(element, "meta[http-equiv=default-style i]")
}

/// The content must name an alternate stylesheet among the siblings.
/// Even then the swap happens after first paint, so this always warns.
pub fn validate_default_style<A: TreeAdapter>(adapter: &A, element: &A::Node) -> ElementValidation {
    let mut result = ElementValidation::new();
    let title = adapter
        .attribute(element, "content")
        .filter(|t| !t.trim().is_empty());

    let stylesheet = title.as_deref().and_then(|title| {
        adapter
            .siblings(element)
            .into_iter()
            .find(|sibling| is_alternate_stylesheet(adapter, sibling, title))
    });

    match (&title, &stylesheet) {
        (None, _) => result.warn(
            "This has no effect. The content attribute must be set to a valid stylesheet title.",
        ),
        (Some(title), None) => result.warn(format!(
            "This has no effect. No alternate stylesheet found having title=\"{title}\"."
        )),
        (Some(_), Some(_)) => {}
    }

    result.warn(
        "Even when used correctly, the default-style method of setting a preferred stylesheet \
         results in a flash of unstyled content. Use modern CSS features like @media rules instead.",
    );

    result.with_payload(ValidationPayload::DefaultStyle {
        title,
        alternate_stylesheet: stylesheet.map(|s| adapter.stringify(&s)),
    })
}

fn is_alternate_stylesheet<A: TreeAdapter>(adapter: &A, element: &A::Node, title: &str) -> bool {
    if !adapter.matches(element, "link[rel]") {
        return false;
    }
    let rel = adapter.attribute(element, "rel").unwrap_or_default();
    let has_token = |token: &str| {
        rel.split_ascii_whitespace()
            .any(|t| t.eq_ignore_ascii_case(token))
    };
    has_token("alternate")
        && has_token("stylesheet")
        && adapter.attribute(element, "title").as_deref() == Some(title)
}
