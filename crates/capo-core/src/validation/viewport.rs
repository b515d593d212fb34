//! `<meta name="viewport">`

use super::{ElementValidation, ValidationPayload};
use crate::adapter::TreeAdapter;
use std::collections::BTreeMap;

const MIN_DIMENSION: f64 = 1.0;
const MAX_DIMENSION: f64 = 10000.0;
const MIN_SCALE: f64 = 0.1;
const MAX_SCALE: f64 = 10.0;
/// Zoom limits under this are an accessibility problem
const MIN_ACCESSIBLE_ZOOM: f64 = 2.0;

const INTERACTIVE_WIDGETS: &[&str] = &["resizes-visual", "resizes-content", "overlays-content"];
const VIEWPORT_FITS: &[&str] = &["auto", "contain", "cover"];

pub fn is_meta_viewport<A: TreeAdapter>(adapter: &A, element: &A::Node) -> bool {
    adapter.matches(element, "meta[name=viewport i]")
}

pub fn validate_meta_viewport<A: TreeAdapter>(adapter: &A, element: &A::Node) -> ElementValidation {
    // Only the first declaration is honored
    let first = adapter
        .parent(element)
        .map(|parent| adapter.children(&parent))
        .unwrap_or_default()
        .into_iter()
        .find(|child| is_meta_viewport(adapter, child));
    if first.is_some_and(|first| &first != element) {
        return ElementValidation::warning(
            "Another meta viewport element has already been declared. Having multiple viewport \
             settings can lead to unexpected behavior.",
        );
    }

    let content = adapter
        .attribute(element, "content")
        .filter(|c| !c.trim().is_empty());
    let Some(content) = content else {
        return ElementValidation::warning("Invalid viewport. The content attribute must be set.");
    };

    let directives = parse_directives(&content);
    let mut result = ElementValidation::new();
    for (directive, value) in &directives {
        check_directive(&mut result, directive, value);
    }

    result.with_payload(ValidationPayload::Viewport { directives })
}

/// `a=b, c=d` into a map; keys and values lowercased and trimmed
fn parse_directives(content: &str) -> BTreeMap<String, String> {
    content
        .to_ascii_lowercase()
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| match item.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (item.trim().to_string(), String::new()),
        })
        .collect()
}

fn check_directive(result: &mut ElementValidation, directive: &str, value: &str) {
    match directive {
        "width" => check_dimension(result, directive, value, "device-width"),
        "height" => check_dimension(result, directive, value, "device-height"),
        "initial-scale" | "minimum-scale" => {
            check_scale(result, directive, value);
        }
        "maximum-scale" => {
            if let Some(scale) = check_scale(result, directive, value) {
                if scale < MIN_ACCESSIBLE_ZOOM {
                    result.warn(format!(
                        "Disabling zoom levels under 2x can cause accessibility issues. Found \"{value}\"."
                    ));
                }
            }
        }
        "user-scalable" => match value {
            "yes" | "1" => {}
            "no" | "0" => result.warn(format!(
                "Disabling zooming can cause accessibility issues to users with visual impairments. \
                 Found \"{value}\"."
            )),
            _ => result.warn(format!(
                "Unsupported value \"{value}\" found for user-scalable. Use \"yes\" or \"no\"."
            )),
        },
        "interactive-widget" => check_keyword(result, directive, value, INTERACTIVE_WIDGETS),
        "viewport-fit" => check_keyword(result, directive, value, VIEWPORT_FITS),
        "shrink-to-fit" => result.warn(
            "The shrink-to-fit directive has been obsolete since iOS 9.2. \
             See https://www.scottohara.me/blog/2018/12/11/shrink-to-fit.html",
        ),
        _ => result.warn(format!("Invalid viewport directive \"{directive}\".")),
    }
}

fn check_dimension(result: &mut ElementValidation, directive: &str, value: &str, keyword: &str) {
    if value == keyword {
        return;
    }
    match value.parse::<f64>() {
        Ok(n) if (MIN_DIMENSION..=MAX_DIMENSION).contains(&n) => {}
        Ok(_) => result.warn(format!(
            "Invalid {directive} \"{value}\". Numeric values must be between 1 and 10000."
        )),
        Err(_) => result.warn(format!(
            "Unsupported value \"{value}\" found for {directive}. Use {keyword} or a number."
        )),
    }
}

/// Numeric scale in range, warning otherwise
fn check_scale(result: &mut ElementValidation, directive: &str, value: &str) -> Option<f64> {
    match value.parse::<f64>() {
        Ok(n) if (MIN_SCALE..=MAX_SCALE).contains(&n) => Some(n),
        Ok(n) => {
            result.warn(format!(
                "Unsupported value \"{value}\" found for {directive}. Values must be between 0.1 and 10."
            ));
            Some(n)
        }
        Err(_) => {
            result.warn(format!(
                "Unsupported value \"{value}\" found for {directive}. Values must be numbers."
            ));
            None
        }
    }
}

fn check_keyword(result: &mut ElementValidation, directive: &str, value: &str, allowed: &[&str]) {
    if !allowed.contains(&value) {
        result.warn(format!(
            "Unsupported value \"{value}\" found for {directive}. Use one of: {}.",
            allowed.join(", ")
        ));
    }
}
