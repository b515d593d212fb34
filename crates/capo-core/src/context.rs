//! Analysis context
//!
//! Document facts the validators need but cannot read from the tree:
//! where the document lives and what time it is.

use crate::adapter::TreeAdapter;
use crate::error::ConfigError;
use chrono::{DateTime, Utc};
use url::Url;

/// Inputs shared by every validator of one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisContext {
    document_url: Option<Url>,
    base_url: Option<Url>,
    now: DateTime<Utc>,
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisContext {
    /// Context without a document URL, stamped with the current time
    pub fn new() -> Self {
        Self {
            document_url: None,
            base_url: None,
            now: Utc::now(),
        }
    }

    /// Context for a document served from `url`
    pub fn for_url(url: &str) -> Result<Self, ConfigError> {
        let document_url = parse_url("document", url)?;
        Ok(Self::new().with_document_url(document_url))
    }

    pub fn with_document_url(mut self, url: Url) -> Self {
        self.document_url = Some(url);
        self
    }

    /// Override the base URL instead of deriving it from `<base href>`
    pub fn with_base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Pin the clock used for token expiry
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn document_url(&self) -> Option<&Url> {
        self.document_url.as_ref()
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Base URL in effect for `head`: the explicit override, else the first
    /// `<base href>` resolved against the document URL, else the document URL.
    pub fn effective_base_url<A: TreeAdapter>(&self, adapter: &A, head: &A::Node) -> Option<Url> {
        if let Some(base) = &self.base_url {
            return Some(base.clone());
        }

        let base_href = adapter
            .children(head)
            .into_iter()
            .find(|child| adapter.matches(child, "base[href]"))
            .and_then(|base| adapter.attribute(&base, "href"));

        match (base_href, &self.document_url) {
            (Some(href), Some(document)) => document
                .join(href.trim())
                .ok()
                .or_else(|| Some(document.clone())),
            (Some(href), None) => Url::parse(href.trim()).ok(),
            (None, document) => document.clone(),
        }
    }
}

/// Parse an absolute URL supplied for `field` ("document", "base")
pub fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_tree::{TestAdapter, document, el};

    #[test]
    fn test_for_url() {
        let ctx = AnalysisContext::for_url("https://example.com/a/b.html").unwrap();
        assert_eq!(ctx.document_url().unwrap().host_str(), Some("example.com"));
        assert!(AnalysisContext::for_url("not a url").is_err());
    }

    #[test]
    fn test_effective_base_url() {
        let adapter = TestAdapter;
        let doc = document(vec![el("base", &[("href", "/static/")])]);
        let ctx = AnalysisContext::for_url("https://example.com/page").unwrap();

        let base = ctx.effective_base_url(&adapter, &doc.head).unwrap();
        assert_eq!(base.as_str(), "https://example.com/static/");

        let empty = document(vec![]);
        let base = ctx.effective_base_url(&adapter, &empty.head).unwrap();
        assert_eq!(base.as_str(), "https://example.com/page");

        let pinned = ctx.with_base_url(Url::parse("https://cdn.example.net/").unwrap());
        let base = pinned.effective_base_url(&adapter, &doc.head).unwrap();
        assert_eq!(base.as_str(), "https://cdn.example.net/");

        assert_eq!(AnalysisContext::new().effective_base_url(&adapter, &empty.head), None);
    }
}
