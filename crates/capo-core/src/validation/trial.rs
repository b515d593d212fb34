//! `<meta http-equiv="origin-trial">`

use super::{ElementValidation, ValidationPayload};
use crate::adapter::TreeAdapter;
use crate::context::AnalysisContext;
use crate::origin_trial::{self, OriginTrialPayload};
use url::Url;

pub fn validate_origin_trial<A: TreeAdapter>(
    adapter: &A,
    element: &A::Node,
    ctx: &AnalysisContext,
) -> ElementValidation {
    let token = adapter.attribute(element, "content").unwrap_or_default();
    let payload = match origin_trial::decode(&token) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::debug!("undecodable origin trial token: {}", err);
            return ElementValidation::warning("invalid token");
        }
    };

    let mut result = ElementValidation::new();
    for problem in token_problems(&payload, ctx) {
        result.warn(problem);
    }
    result.with_payload(ValidationPayload::OriginTrial(payload))
}

/// Expiry and origin checks for a decoded token
pub(crate) fn token_problems(payload: &OriginTrialPayload, ctx: &AnalysisContext) -> Vec<&'static str> {
    let mut problems = Vec::new();
    if payload.is_expired(ctx.now()) {
        problems.push("expired");
    }

    let (Some(document), Some(token_origin)) = (ctx.document_url(), payload.origin_url()) else {
        return problems;
    };
    if document.origin() == token_origin.origin() {
        return problems;
    }

    if is_subdomain_of(document, &token_origin) {
        if !payload.is_subdomain {
            problems.push("invalid subdomain");
        }
    } else if !payload.is_third_party {
        problems.push("invalid third-party origin");
    }
    problems
}

/// `document` is served from a strict subdomain of `origin`'s host
fn is_subdomain_of(document: &Url, origin: &Url) -> bool {
    match (document.host_str(), origin.host_str()) {
        (Some(document), Some(origin)) => document
            .strip_suffix(origin)
            .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('.')),
        _ => false,
    }
}
