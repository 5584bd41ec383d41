//! Document type and related utilities
//!
//! The root container for a live tree, with query APIs and the mutation log.

use std::cell::{Cell, RefCell};

use crate::mutation::{MutationListener, MutationRecord, ObserveOptions};
use crate::selector::Selector;

use super::{Node, NodeData};

// =============================================================================
// DocumentData
// =============================================================================

/// Payload of the document node: observation options and the pending
/// mutation log
#[derive(Debug, Default)]
pub struct DocumentData {
    options: Cell<ObserveOptions>,
    mutations: RefCell<Vec<MutationRecord>>,
}

impl DocumentData {
    /// Queue `record` if its kind is being observed
    pub(crate) fn push(&self, record: MutationRecord) {
        if self.options.get().accepts(record.kind) {
            self.mutations.borrow_mut().push(record);
        }
    }

    fn take(&self) -> Vec<MutationRecord> {
        std::mem::take(&mut *self.mutations.borrow_mut())
    }

    fn is_empty(&self) -> bool {
        self.mutations.borrow().is_empty()
    }
}

// =============================================================================
// Document
// =============================================================================

/// Root document container: `#document > html > (head, body)`
#[derive(Debug, Clone)]
pub struct Document {
    node: Node,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document with an empty head and body
    pub fn new() -> Self {
        Self::with_body(Node::element("body"))
    }

    /// Create a document around a prebuilt `body` element.
    ///
    /// The document starts unobserved.
    pub fn with_body(body: Node) -> Self {
        let node = Node::document();
        let html = Node::element("html")
            .child(Node::element("head"))
            .child(body);
        node.append_child(html);
        Self { node }
    }

    /// The document node itself
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The `<html>` element
    pub fn document_element(&self) -> Option<Node> {
        self.node.children().into_iter().find(Node::is_element)
    }

    pub fn head(&self) -> Option<Node> {
        self.top_level("head")
    }

    pub fn body(&self) -> Option<Node> {
        self.top_level("body")
    }

    fn top_level(&self, tag: &str) -> Option<Node> {
        self.document_element()?
            .children()
            .into_iter()
            .find(|n| n.tag() == Some(tag))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query API
    // ─────────────────────────────────────────────────────────────────────────

    /// Find the first element with the given `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<Node> {
        self.node
            .descendants()
            .find(|n| n.as_element().is_some_and(|e| e.id().as_deref() == Some(id)))
    }

    /// First element matching `selector`, in document order
    pub fn query_selector(&self, selector: &Selector) -> Option<Node> {
        self.node.descendants().find(|n| selector.matches(n))
    }

    /// All elements matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<Node> {
        self.node.descendants().filter(|n| selector.matches(n)).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation log
    // ─────────────────────────────────────────────────────────────────────────

    /// Start recording edits of the kinds selected by `options`.
    ///
    /// Calling it again replaces the options; pending records are kept.
    pub fn observe(&self, options: ObserveOptions) {
        if let Some(log) = self.log() {
            log.options.set(options);
        }
    }

    /// Stop recording and drop every pending record
    pub fn disconnect(&self) {
        if let Some(log) = self.log() {
            log.options.set(ObserveOptions::default());
            log.take();
        }
    }

    /// Check whether any kind of edit is being recorded
    pub fn is_observed(&self) -> bool {
        self.log()
            .is_some_and(|log| log.options.get() != ObserveOptions::default())
    }

    fn log(&self) -> Option<&DocumentData> {
        match self.node.data() {
            NodeData::Document(data) => Some(data),
            _ => None,
        }
    }

    /// Check whether edits are waiting to be delivered
    pub fn has_pending_mutations(&self) -> bool {
        self.log().is_some_and(|log| !log.is_empty())
    }

    /// Drain all pending records
    pub fn take_mutations(&self) -> Vec<MutationRecord> {
        self.log().map(DocumentData::take).unwrap_or_default()
    }

    /// Drain pending records and hand them to `listener` as one batch.
    ///
    /// Returns the number of records delivered. The listener is not called
    /// when the log is empty.
    pub fn deliver_mutations<L>(&self, listener: &mut L) -> usize
    where
        L: MutationListener + ?Sized,
    {
        let records = self.take_mutations();
        if records.is_empty() {
            return 0;
        }
        listener.on_mutations(&records);
        records.len()
    }
}
