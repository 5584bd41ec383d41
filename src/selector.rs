//! Minimal compound selectors
//!
//! Supports exactly what exclusion lists and content-root lookups need:
//! an optional tag (or `*`) followed by any number of `#id`, `.class`,
//! `[attr]` and `[attr="value"]` conditions. Combinators are rejected.
//!
//! ```
//! use zh_toggle::selector::Selector;
//!
//! let home: Selector = r#"a[href="/"]"#.parse().unwrap();
//! assert_eq!(home.as_str(), r#"a[href="/"]"#);
//! ```

use std::fmt;
use std::str::FromStr;

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::attr::AttrsExt;
use crate::error::{ToggleError, ToggleResult};
use crate::node::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Id(CompactString),
    Class(CompactString),
    HasAttr(CompactString),
    AttrEquals(CompactString, String),
}

/// A compound selector matched against element nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: CompactString,
    tag: Option<CompactString>,
    conditions: SmallVec<[Condition; 2]>,
}

impl Selector {
    fn from_parts(source: String, tag: Option<&str>, conditions: SmallVec<[Condition; 2]>) -> Self {
        Self {
            source: source.into(),
            tag: tag.map(|t| CompactString::from(t.to_ascii_lowercase())),
            conditions,
        }
    }

    /// Match elements by tag name
    pub fn tag(name: &str) -> Self {
        Self::from_parts(name.to_ascii_lowercase(), Some(name), SmallVec::new())
    }

    /// Match elements by `id`
    pub fn id(id: &str) -> Self {
        let mut conditions = SmallVec::new();
        conditions.push(Condition::Id(id.into()));
        Self::from_parts(format!("#{id}"), None, conditions)
    }

    /// Match elements carrying `class`
    pub fn class(class: &str) -> Self {
        let mut conditions = SmallVec::new();
        conditions.push(Condition::Class(class.into()));
        Self::from_parts(format!(".{class}"), None, conditions)
    }

    /// Match elements that have attribute `name`
    pub fn attr(name: &str) -> Self {
        let mut conditions = SmallVec::new();
        conditions.push(Condition::HasAttr(name.into()));
        Self::from_parts(format!("[{name}]"), None, conditions)
    }

    /// Add an `[name="value"]` condition
    pub fn and_attr_eq(mut self, name: &str, value: &str) -> Self {
        self.source.push_str(&format!("[{name}=\"{value}\"]"));
        self.conditions
            .push(Condition::AttrEquals(name.into(), value.to_owned()));
        self
    }

    /// Parse selector text
    pub fn parse(input: &str) -> ToggleResult<Self> {
        let source = input.trim();
        if source.is_empty() {
            return Err(ToggleError::EmptySelector);
        }
        let fail = |reason| ToggleError::invalid_selector(source, reason);

        let mut p = Cursor { src: source, pos: 0 };
        let tag = if p.peek() == Some('*') {
            p.bump();
            None
        } else {
            p.ident()
        };

        let mut conditions = SmallVec::new();
        while let Some(c) = p.bump() {
            let condition = match c {
                '#' => Condition::Id(p.ident().ok_or_else(|| fail("expected id after `#`"))?.into()),
                '.' => Condition::Class(p.ident().ok_or_else(|| fail("expected class after `.`"))?.into()),
                '[' => {
                    let name = p.ident().ok_or_else(|| fail("expected attribute name"))?;
                    match p.bump() {
                        Some(']') => Condition::HasAttr(name.into()),
                        Some('=') => {
                            let value = p.value().ok_or_else(|| fail("unterminated attribute value"))?;
                            if p.bump() != Some(']') {
                                return Err(fail("unterminated attribute"));
                            }
                            Condition::AttrEquals(name.into(), value)
                        }
                        _ => return Err(fail("unterminated attribute")),
                    }
                }
                c if c.is_whitespace() || matches!(c, '>' | '+' | '~' | ',') => {
                    return Err(fail("combinators are not supported"));
                }
                _ => return Err(fail("unexpected character")),
            };
            conditions.push(condition);
        }

        Ok(Self::from_parts(source.to_owned(), tag, conditions))
    }

    /// Source text of the selector
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether `node` is an element matching this selector
    pub fn matches(&self, node: &Node) -> bool {
        let Some(elem) = node.as_element() else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if elem.tag() != tag.as_str() {
                return false;
            }
        }
        let attrs = elem.attrs();
        self.conditions.iter().all(|cond| match cond {
            Condition::Id(id) => attrs.get_attr("id") == Some(id.as_str()),
            Condition::Class(class) => attrs.has_class(class),
            Condition::HasAttr(name) => attrs.has_attr(name),
            Condition::AttrEquals(name, value) => attrs.get_attr(name) == Some(value.as_str()),
        })
    }
}

impl FromStr for Selector {
    type Err = ToggleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// =============================================================================
// Cursor
// =============================================================================

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn ident(&mut self) -> Option<&'a str> {
        let src = self.src;
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        let end = self.pos;
        (end > start).then(|| &src[start..end])
    }

    /// Quoted string, or a bare run up to the closing `]`
    fn value(&mut self) -> Option<String> {
        match self.peek()? {
            quote @ ('"' | '\'') => {
                self.bump();
                let start = self.pos;
                while let Some(c) = self.bump() {
                    if c == quote {
                        return Some(self.src[start..self.pos - 1].to_owned());
                    }
                }
                None
            }
            _ => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c != ']') {
                    self.bump();
                }
                let raw = self.src[start..self.pos].trim();
                (!raw.is_empty()).then(|| raw.to_owned())
            }
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}
