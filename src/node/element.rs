//! Element payload: tag name and attributes.

use std::cell::{Ref, RefCell, RefMut};

use compact_str::CompactString;

use crate::attr::{Attrs, AttrsExt};

/// Element data held by a `Node`
#[derive(Debug)]
pub struct ElementData {
    tag: CompactString,
    attrs: RefCell<Attrs>,
}

impl ElementData {
    /// Create element data. Tag names are stored lowercased.
    pub fn new(tag: impl Into<CompactString>) -> Self {
        let tag: CompactString = tag.into();
        let tag = if tag.bytes().any(|b| b.is_ascii_uppercase()) {
            CompactString::from(tag.to_ascii_lowercase())
        } else {
            tag
        };
        Self {
            tag,
            attrs: RefCell::new(Vec::new()),
        }
    }

    /// HTML tag name
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Borrow the attribute list
    pub fn attrs(&self) -> Ref<'_, Attrs> {
        self.attrs.borrow()
    }

    pub(crate) fn attrs_mut(&self) -> RefMut<'_, Attrs> {
        self.attrs.borrow_mut()
    }

    /// `id` attribute, if set
    pub fn id(&self) -> Option<String> {
        self.attrs().get_attr("id").map(str::to_owned)
    }

    /// Check if element is a void element (no children, no closing tag)
    pub fn is_void(&self) -> bool {
        matches!(
            self.tag.as_str(),
            "area"
                | "base"
                | "br"
                | "col"
                | "embed"
                | "hr"
                | "img"
                | "input"
                | "link"
                | "meta"
                | "param"
                | "source"
                | "track"
                | "wbr"
        )
    }

    /// Check if element content is raw text (not HTML-escaped when rendered)
    pub fn is_raw_text(&self) -> bool {
        matches!(self.tag.as_str(), "script" | "style")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_basics() {
        let elem = ElementData::new("DIV");
        assert_eq!(elem.tag(), "div");
        assert!(elem.attrs().is_empty());
        assert!(!elem.is_void());

        elem.attrs_mut().set_attr("id", "langLabel");
        assert_eq!(elem.id().as_deref(), Some("langLabel"));
    }

    #[test]
    fn test_element_kinds() {
        assert!(ElementData::new("input").is_void());
        assert!(ElementData::new("script").is_raw_text());
        assert!(!ElementData::new("pre").is_raw_text());
    }
}
