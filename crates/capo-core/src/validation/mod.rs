//! Validation Engine
//!
//! Two independent passes over the `<head>` children:
//!
//! - [`get_validation_warnings`]: document-wide structure (cardinality,
//!   disallowed tags, CSP meta, broken origin-trial tokens).
//! - [`get_custom_validations`]: per-element deep checks, dispatched to
//!   the first validator whose selector matches.
//!
//! Malformed markup is never an error here; it becomes a warning.

mod charset;
mod csp;
mod default_style;
mod document;
mod http_equiv;
mod preload;
mod trial;
mod viewport;

pub use charset::{is_content_type, validate_content_type};
pub use csp::{CspPolicy, validate_csp};
pub use default_style::{is_default_style, validate_default_style};
pub use document::{VALID_HEAD_ELEMENTS, get_validation_warnings, is_valid_element};
pub use http_equiv::validate_http_equiv;
pub use preload::{is_unnecessary_preload, validate_unnecessary_preload};
pub use trial::validate_origin_trial;
pub use viewport::{is_meta_viewport, validate_meta_viewport};

use crate::adapter::TreeAdapter;
use crate::context::AnalysisContext;
use crate::origin_trial::OriginTrialPayload;
use crate::weights::{is_meta_csp, is_origin_trial};
use serde::Serialize;
use std::collections::BTreeMap;

/// Head-wide problem found by the document pass
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning<N> {
    pub message: String,
    pub elements: Vec<N>,
}

impl<N> ValidationWarning<N> {
    pub fn new(message: impl Into<String>, elements: Vec<N>) -> Self {
        Self {
            message: message.into(),
            elements,
        }
    }
}

/// Result of the element pass for one element
#[derive(Debug, Clone, PartialEq)]
pub struct CustomValidation<N> {
    pub element: N,
    pub warnings: Vec<String>,
    pub payload: Option<ValidationPayload>,
}

/// What a single validator returns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementValidation {
    pub warnings: Vec<String>,
    pub payload: Option<ValidationPayload>,
}

impl ElementValidation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-warning result without payload
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            warnings: vec![message.into()],
            payload: None,
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn with_payload(mut self, payload: ValidationPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Nothing to report
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.payload.is_none()
    }
}

/// Structured data a validator extracted, for inspection only
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ValidationPayload {
    OriginTrial(OriginTrialPayload),
    ContentSecurityPolicy(CspPolicy),
    DefaultStyle {
        title: Option<String>,
        #[serde(rename = "alternateStylesheet")]
        alternate_stylesheet: Option<String>,
    },
    Charset {
        charset: Option<String>,
        #[serde(rename = "byteOffset")]
        byte_offset: Option<usize>,
    },
    Viewport {
        directives: BTreeMap<String, String>,
    },
    UnnecessaryPreload {
        href: String,
        url: String,
        #[serde(rename = "discoveredBy")]
        discovered_by: String,
    },
}

/// Deep checks for one element; empty when no validator applies
pub fn get_custom_validations<A: TreeAdapter>(
    adapter: &A,
    element: &A::Node,
    ctx: &AnalysisContext,
) -> ElementValidation {
    if is_origin_trial(adapter, element) {
        validate_origin_trial(adapter, element, ctx)
    } else if is_meta_csp(adapter, element) {
        validate_csp(adapter, element)
    } else if is_default_style(adapter, element) {
        validate_default_style(adapter, element)
    } else if is_content_type(adapter, element) {
        validate_content_type(adapter, element)
    } else if adapter.matches(element, "meta[http-equiv]") {
        validate_http_equiv(adapter, element)
    } else if is_meta_viewport(adapter, element) {
        validate_meta_viewport(adapter, element)
    } else if is_unnecessary_preload(adapter, element, ctx) {
        validate_unnecessary_preload(adapter, element, ctx)
    } else {
        ElementValidation::new()
    }
}
