//! capo HTML - static markup backend
//!
//! Parses markup with html5ever into an rcdom and exposes it through
//! [`RcDomAdapter`]. Source positions of start tags are recovered by a
//! separate scan, see [`locator`].

mod adapter;
mod error;
pub mod locator;
mod parser;
mod static_doc;

pub use adapter::{RcDomAdapter, StaticNode};
pub use error::ParseError;
pub use parser::{parse_live, to_live};
pub use static_doc::StaticDocument;

/// Parse markup into a static document
pub fn parse(html: &str) -> StaticDocument {
    StaticDocument::parse(html)
}
