//! Generic `http-equiv` pragmas

use super::ElementValidation;
use crate::adapter::TreeAdapter;

pub fn validate_http_equiv<A: TreeAdapter>(adapter: &A, element: &A::Node) -> ElementValidation {
    let pragma = adapter
        .attribute(element, "http-equiv")
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let content = adapter
        .attribute(element, "content")
        .map(|c| c.trim().to_ascii_lowercase());

    match pragma_warning(&pragma, content.as_deref()) {
        Some(message) => ElementValidation::warning(message),
        None => ElementValidation::new(),
    }
}

fn pragma_warning(pragma: &str, content: Option<&str>) -> Option<String> {
    let message = match pragma {
        // Legitimate, or checked by a dedicated validator
        "content-security-policy"
        | "content-security-policy-report-only"
        | "origin-trial"
        | "content-type"
        | "default-style"
        | "refresh" => return None,

        "x-dns-prefetch-control" => match content {
            Some("on") => {
                "DNS prefetching is enabled by default. Setting it to \"on\" has no effect."
                    .to_string()
            }
            Some("off") => "This is non-standard, however most browsers support disabling \
                speculative DNS prefetching. It should still be noted that DNS prefetching is a \
                generally accepted performance optimization and you should only disable it if you \
                have specific security concerns."
                .to_string(),
            other => format!(
                "This is a non-standard way of disabling DNS prefetching, which is a performance \
                 optimization. Found content=\"{}\". Use content=\"off\" if you have a legitimate \
                 security concern, otherwise remove it.",
                other.unwrap_or_default()
            ),
        },

        "cache-control" | "etag" | "pragma" | "expires" | "last-modified" => {
            "This doesn't do anything. Use HTTP headers for any cache directives.".to_string()
        }

        "x-frame-options" => "This doesn't do anything. Use the CSP HTTP header with the \
            frame-ancestors directive instead."
            .to_string(),

        "x-ua-compatible" | "content-style-type" | "content-script-type" | "imagetoolbar"
        | "cleartype" => "This doesn't do anything. It was an Internet Explorer feature and is \
            now deprecated."
            .to_string(),

        "page-enter" | "page-exit" | "site-enter" | "site-exit" => "This doesn't do anything. \
            It was an Internet Explorer feature and is now deprecated. Use the View Transitions \
            API instead."
            .to_string(),

        "content-language" | "language" => {
            "This is non-conforming. Use the global lang attribute instead.".to_string()
        }

        "set-cookie" => "This is non-conforming. Use the Set-Cookie HTTP header instead.".to_string(),

        "application-name" | "author" | "description" | "generator" | "keywords"
        | "referrer" | "theme-color" | "color-scheme" | "viewport" | "creator" | "googlebot"
        | "publisher" | "robots" => {
            format!("This doesn't do anything. Did you mean `meta[name={pragma}]`?")
        }

        "encoding" => "This doesn't do anything. Did you mean `meta[charset]`?".to_string(),

        "title" => {
            "This doesn't do anything. Did you mean to use the `title` tag instead?".to_string()
        }

        "accept-ch" | "delegate-ch" => "This is non-standard and may not work across browsers. \
            Use HTTP headers instead."
            .to_string(),

        _ => "This is non-standard and may not work across browsers. http-equiv is not an \
            alternative to HTTP headers."
            .to_string(),
    };
    Some(message)
}
