//! Text node payload
//!
//! Content sits behind a `RefCell` so the converter can rewrite it in place
//! while the node keeps its identity.

use std::cell::RefCell;

/// Text content of a `Node`
#[derive(Debug, Default)]
pub struct TextData {
    content: RefCell<String>,
}

impl TextData {
    /// Create a new text payload
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: RefCell::new(content.into()),
        }
    }

    /// Copy of the current content
    pub fn get(&self) -> String {
        self.content.borrow().clone()
    }

    /// Run `f` against the current content without copying it
    pub fn with<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        f(&self.content.borrow())
    }

    /// Check if text content is empty
    pub fn is_empty(&self) -> bool {
        self.content.borrow().is_empty()
    }

    /// Get text length in bytes
    pub fn len(&self) -> usize {
        self.content.borrow().len()
    }

    /// Check if text is only whitespace
    pub fn is_whitespace(&self) -> bool {
        self.content.borrow().trim().is_empty()
    }

    /// Swap in new content, returning the previous content
    pub(crate) fn replace(&self, content: String) -> String {
        self.content.replace(content)
    }
}
