//! Live document tree: shared node handles with identity.
//!
//! Unlike an owned VDOM tree, nodes here are reference-counted handles so
//! that a node keeps its identity while the tree around it changes. This is
//! what the converter side table keys on.
//!
//! - `Node` - strong handle (cheap `Clone`, identity `Eq`/`Hash`)
//! - `WeakNode` - non-owning handle, used by `cache::WeakKeyMap`
//! - `Document` - root node carrying the mutation log
//!
//! Structural edits (`append_child`, `insert_before`, `remove_child`,
//! `set_text_content`) are recorded on the owning document while it is
//! observed (`Document::observe`), and drained by
//! `Document::deliver_mutations`.

mod document;
mod element;
mod text;

pub use document::{Document, DocumentData};
pub use element::ElementData;
pub use text::TextData;

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use compact_str::CompactString;
use smallvec::{SmallVec, smallvec};

use crate::attr::{Attrs, AttrsExt};
use crate::mutation::MutationRecord;
use crate::selector::Selector;

/// Type alias for children collection.
pub type Children = SmallVec<[Node; 8]>;

pub(crate) struct NodeInner {
    parent: RefCell<Weak<NodeInner>>,
    children: RefCell<Children>,
    data: NodeData,
}

/// Per-kind node payload.
pub enum NodeData {
    Document(DocumentData),
    Element(ElementData),
    Text(TextData),
}

// =============================================================================
// Node
// =============================================================================

/// Strong handle to a node in a live tree.
///
/// Equality and hashing use node identity, never content.
#[derive(Clone)]
pub struct Node(Rc<NodeInner>);

/// Identity key of a node, valid while any handle to it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey(usize);

impl Node {
    fn from_data(data: NodeData) -> Self {
        Self(Rc::new(NodeInner {
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(SmallVec::new()),
            data,
        }))
    }

    /// Create a detached element node
    pub fn element(tag: impl Into<CompactString>) -> Self {
        Self::from_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a detached text node
    pub fn text(content: impl Into<String>) -> Self {
        Self::from_data(NodeData::Text(TextData::new(content)))
    }

    pub(crate) fn document() -> Self {
        Self::from_data(NodeData::Document(DocumentData::default()))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Kind access
    // ─────────────────────────────────────────────────────────────────────────

    /// Node payload
    #[inline]
    pub fn data(&self) -> &NodeData {
        &self.0.data
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.0.data, NodeData::Element(_))
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.0.data, NodeData::Text(_))
    }

    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self.0.data, NodeData::Document(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.0.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&TextData> {
        match &self.0.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Tag name, for element nodes
    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(ElementData::tag)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────────

    /// Identity key for side tables
    #[inline]
    pub fn key(&self) -> NodeKey {
        NodeKey(Rc::as_ptr(&self.0) as usize)
    }

    /// Create a non-owning handle
    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.0))
    }

    /// Check whether two handles point at the same node
    #[inline]
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attributes (no-ops on non-element nodes)
    // ─────────────────────────────────────────────────────────────────────────

    pub fn get_attr(&self, name: &str) -> Option<String> {
        self.as_element()
            .and_then(|e| e.attrs().get_attr(name).map(str::to_owned))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.as_element().is_some_and(|e| e.attrs().has_attr(name))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.as_element().is_some_and(|e| e.attrs().has_class(class))
    }

    pub fn set_attr(&self, name: impl Into<String>, value: impl Into<String>) {
        if let Some(e) = self.as_element() {
            e.attrs_mut().set_attr(name, value);
        }
    }

    pub fn remove_attr(&self, name: &str) -> Option<String> {
        self.as_element().and_then(|e| e.attrs_mut().remove_attr(name))
    }

    /// Snapshot of the attribute list
    pub fn attrs(&self) -> Attrs {
        self.as_element()
            .map(|e| e.attrs().clone())
            .unwrap_or_default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder
    // ─────────────────────────────────────────────────────────────────────────

    pub fn with_attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_attr("class", class)
    }

    /// Append a child node and return self
    pub fn child(self, child: Node) -> Self {
        self.append_child(child);
        self
    }

    /// Append a text child and return self
    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.append_child(Node::text(content));
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tree navigation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn parent(&self) -> Option<Node> {
        self.0.parent.borrow().upgrade().map(Node)
    }

    pub fn has_parent(&self) -> bool {
        self.0.parent.borrow().strong_count() > 0
    }

    /// Iterate over ancestors, nearest first (excludes self)
    pub fn ancestors(&self) -> Ancestors {
        Ancestors { next: self.parent() }
    }

    /// Topmost ancestor, or self when detached
    pub fn root(&self) -> Node {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// Snapshot of the child handles
    pub fn children(&self) -> Children {
        self.0.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    pub fn first_child(&self) -> Option<Node> {
        self.0.children.borrow().first().cloned()
    }

    /// Check whether `self` is `other` or lies inside it
    pub fn is_inclusive_descendant_of(&self, other: &Node) -> bool {
        self.ptr_eq(other) || self.ancestors().any(|a| a.ptr_eq(other))
    }

    /// Pre-order traversal starting at (and including) self
    pub fn descendants(&self) -> Descendants {
        Descendants {
            stack: vec![self.clone()],
        }
    }

    /// Nearest inclusive ancestor element matching `selector`
    pub fn closest(&self, selector: &Selector) -> Option<Node> {
        std::iter::once(self.clone())
            .chain(self.ancestors())
            .find(|n| selector.matches(n))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tree mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Append `child`, detaching it from its previous parent first.
    ///
    /// Returns false when the insertion would be invalid (text parent,
    /// document child, or a cycle).
    pub fn append_child(&self, child: Node) -> bool {
        self.insert_before(child, None)
    }

    /// Insert `child` before `reference`, or at the end when `None`.
    pub fn insert_before(&self, child: Node, reference: Option<&Node>) -> bool {
        if self.is_text() || child.is_document() || self.is_inclusive_descendant_of(&child) {
            return false;
        }
        if let Some(r) = reference {
            if !r.parent().is_some_and(|p| p.ptr_eq(self)) {
                return false;
            }
        }
        // Inserting before itself means inserting before its next sibling
        let reference = match reference {
            Some(r) if r.ptr_eq(&child) => self.next_sibling_of(r),
            other => other.cloned(),
        };

        child.detach();
        {
            let mut children = self.0.children.borrow_mut();
            let index = reference
                .as_ref()
                .and_then(|r| children.iter().position(|c| c.ptr_eq(r)))
                .unwrap_or(children.len());
            children.insert(index, child.clone());
        }
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);

        self.record(MutationRecord::child_list(self.clone(), smallvec![child], SmallVec::new()));
        true
    }

    /// Remove a direct child. Returns false if `child` is not a child of self.
    pub fn remove_child(&self, child: &Node) -> bool {
        let removed = {
            let mut children = self.0.children.borrow_mut();
            match children.iter().position(|c| c.ptr_eq(child)) {
                Some(index) => children.remove(index),
                None => return false,
            }
        };
        *removed.0.parent.borrow_mut() = Weak::new();
        self.record(MutationRecord::child_list(self.clone(), SmallVec::new(), smallvec![removed]));
        true
    }

    /// Remove self from its parent, if attached
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }

    fn next_sibling_of(&self, node: &Node) -> Option<Node> {
        let children = self.0.children.borrow();
        let index = children.iter().position(|c| c.ptr_eq(node))?;
        children.get(index + 1).cloned()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text content
    // ─────────────────────────────────────────────────────────────────────────

    /// Concatenated text of self and all descendants
    pub fn text_content(&self) -> String {
        match &self.0.data {
            NodeData::Text(t) => t.get(),
            _ => {
                let mut buf = String::new();
                self.collect_text(&mut buf);
                buf
            }
        }
    }

    fn collect_text(&self, buf: &mut String) {
        for child in self.0.children.borrow().iter() {
            match &child.0.data {
                NodeData::Text(t) => t.with(|s| buf.push_str(s)),
                _ => child.collect_text(buf),
            }
        }
    }

    /// Replace the text of a text node, or the children of an element with
    /// a single text node (none when `content` is empty).
    pub fn set_text_content(&self, content: impl Into<String>) {
        let content = content.into();
        match &self.0.data {
            NodeData::Text(t) => {
                t.replace(content);
                self.record(MutationRecord::character_data(self.clone()));
            }
            NodeData::Element(_) => {
                let removed: SmallVec<[Node; 4]> = {
                    let mut children = self.0.children.borrow_mut();
                    children.drain(..).collect()
                };
                for node in &removed {
                    *node.0.parent.borrow_mut() = Weak::new();
                }
                let mut added = SmallVec::new();
                if !content.is_empty() {
                    let text = Node::text(content);
                    *text.0.parent.borrow_mut() = Rc::downgrade(&self.0);
                    self.0.children.borrow_mut().push(text.clone());
                    added.push(text);
                }
                self.record(MutationRecord::child_list(self.clone(), added, removed));
            }
            NodeData::Document(_) => {}
        }
    }

    /// Offer a record to the owning document, if attached to one; the
    /// document keeps it only for observed kinds
    fn record(&self, record: MutationRecord) {
        let root = self.root();
        if let NodeData::Document(doc) = &root.0.data {
            doc.push(record);
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.data {
            NodeData::Document(_) => f.write_str("#document"),
            NodeData::Element(e) => match e.attrs().get_attr("id") {
                Some(id) => write!(f, "<{}#{}>", e.tag(), id),
                None => write!(f, "<{}>", e.tag()),
            },
            NodeData::Text(t) => t.with(|s| write!(f, "{:?}", s)),
        }
    }
}

// =============================================================================
// WeakNode
// =============================================================================

/// Non-owning node handle
#[derive(Clone, Default)]
pub struct WeakNode(Weak<NodeInner>);

impl WeakNode {
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(Node)
    }

    /// True once every strong handle to the node is gone
    pub fn is_dead(&self) -> bool {
        self.0.strong_count() == 0
    }

    #[inline]
    pub fn key(&self) -> NodeKey {
        NodeKey(Weak::as_ptr(&self.0) as usize)
    }
}

impl fmt::Debug for WeakNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(node) => write!(f, "WeakNode({:?})", node),
            None => f.write_str("WeakNode(<dropped>)"),
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over a node's ancestors, nearest first
pub struct Ancestors {
    next: Option<Node>,
}

impl Iterator for Ancestors {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let node = self.next.take()?;
        self.next = node.parent();
        Some(node)
    }
}

/// Pre-order (document order) traversal
pub struct Descendants {
    stack: Vec<Node>,
}

impl Iterator for Descendants {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let node = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        self.stack
            .extend(node.0.children.borrow().iter().rev().cloned());
        Some(node)
    }
}
