//! Attribute storage for element nodes
//!
//! Attributes are plain `Vec<(String, String)>` pairs. Element counts per
//! node are tiny, so a linear scan beats hashing.

/// Element attributes as simple key-value pairs
pub type Attrs = Vec<(String, String)>;

/// Extension trait for attribute operations on Attrs
pub trait AttrsExt {
    /// Get an attribute value by name
    fn get_attr(&self, name: &str) -> Option<&str>;

    /// Check if an attribute exists
    fn has_attr(&self, name: &str) -> bool;

    /// Set an attribute value (insert or update)
    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>);

    /// Remove an attribute by name, returning the old value if present
    fn remove_attr(&mut self, name: &str) -> Option<String>;

    /// Check whether the whitespace-separated `class` list contains `class`
    fn has_class(&self, class: &str) -> bool;
}

/// Slot of attribute `name`, if present
fn slot(attrs: &Attrs, name: &str) -> Option<usize> {
    attrs.iter().position(|(key, _)| key == name)
}

impl AttrsExt for Attrs {
    fn get_attr(&self, name: &str) -> Option<&str> {
        slot(self, name).map(|i| self[i].1.as_str())
    }

    fn has_attr(&self, name: &str) -> bool {
        slot(self, name).is_some()
    }

    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        match slot(self, &name) {
            Some(i) => self[i].1 = value.into(),
            None => self.push((name, value.into())),
        }
    }

    fn remove_attr(&mut self, name: &str) -> Option<String> {
        let i = slot(self, name)?;
        Some(self.remove(i).1)
    }

    fn has_class(&self, class: &str) -> bool {
        match self.get_attr("class") {
            Some(list) => list.split_ascii_whitespace().any(|c| c == class),
            None => false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
