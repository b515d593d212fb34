//! Restricted selector matching
//!
//! Grammar: an optional tag name or `*`, followed by any number of
//! attribute tests `[attr]`, `[attr=value]`, `[attr="value"]` with an
//! optional `i` (or `s`) flag. Combinators, selector lists and
//! pseudo-classes are rejected: the pattern fails to parse and matches
//! nothing.

use crate::adapter::TreeAdapter;

/// Parsed compound selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplePattern {
    tag: Option<String>,
    attributes: Vec<AttributeTest>,
}

/// One `[name=value i]` test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTest {
    name: String,
    value: Option<String>,
    case_insensitive: bool,
}

impl SimplePattern {
    /// Parse a pattern string
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let mut cursor = Cursor::new(s);
        let universal = cursor.eat('*');
        let tag = if universal {
            None
        } else {
            cursor.ident().map(|t| t.to_ascii_lowercase())
        };

        let mut attributes = Vec::new();
        while cursor.eat('[') {
            attributes.push(cursor.attribute_test()?);
        }

        // Anything left is a combinator, list or pseudo-class
        if !cursor.at_end() {
            return None;
        }
        if !universal && tag.is_none() && attributes.is_empty() {
            return None;
        }

        Some(Self { tag, attributes })
    }

    /// Check a node against this pattern
    pub fn matches<A: TreeAdapter + ?Sized>(&self, adapter: &A, node: &A::Node) -> bool {
        if !adapter.is_element(node) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if adapter.tag_name(node) != *tag {
                return false;
            }
        }
        self.attributes.iter().all(|test| test.matches(adapter, node))
    }
}

impl AttributeTest {
    fn matches<A: TreeAdapter + ?Sized>(&self, adapter: &A, node: &A::Node) -> bool {
        match (adapter.attribute(node, &self.name), &self.value) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) if self.case_insensitive => {
                actual.eq_ignore_ascii_case(expected)
            }
            (Some(actual), Some(expected)) => actual == *expected,
        }
    }
}

/// True when any of `patterns` matches
pub fn matches_any<A: TreeAdapter + ?Sized>(adapter: &A, node: &A::Node, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| adapter.matches(node, p))
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let src = self.src;
        (self.pos > start).then(|| &src[start..self.pos])
    }

    fn quoted(&mut self, quote: char) -> Option<&'a str> {
        let start = self.pos;
        let len = self.src[start..].find(quote)?;
        self.pos = start + len + quote.len_utf8();
        Some(&self.src[start..start + len])
    }

    /// Body of `[...]`, opening bracket already consumed
    fn attribute_test(&mut self) -> Option<AttributeTest> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let mut test = AttributeTest {
            name,
            value: None,
            case_insensitive: false,
        };

        if self.eat('=') {
            self.skip_whitespace();
            let value = match self.peek()? {
                q @ ('"' | '\'') => {
                    self.eat(q);
                    self.quoted(q)?
                }
                _ => self.ident()?,
            };
            test.value = Some(value.to_string());
            self.skip_whitespace();
            if self.eat('i') || self.eat('I') {
                test.case_insensitive = true;
            } else if !self.eat('s') {
                self.eat('S');
            }
            self.skip_whitespace();
        }

        self.eat(']').then_some(test)
    }
}
