//! Change notification for live documents.
//!
//! While a document is observed (`Document::observe`), edits to its nodes
//! push `MutationRecord`s onto its log. A host drains the log in batches
//! (typically once per event-loop turn) and hands each batch to a
//! `MutationListener`. One callback sees one whole batch. Unobserved
//! documents record nothing.

use smallvec::SmallVec;

use crate::node::Node;

/// What kind of change a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Children were added to or removed from `target`
    ChildList,
    /// The text of `target` (a text node) was rewritten
    CharacterData,
}

/// Which edits a document records while observed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObserveOptions {
    /// Record child insertions and removals
    pub child_list: bool,
    /// Record text rewrites of text nodes
    pub character_data: bool,
}

impl ObserveOptions {
    /// Structural edits only
    pub const CHILD_LIST: Self = Self {
        child_list: true,
        character_data: false,
    };

    /// Structural edits and text rewrites
    pub const ALL: Self = Self {
        child_list: true,
        character_data: true,
    };

    /// Check whether records of `kind` are kept
    #[inline]
    pub fn accepts(&self, kind: MutationKind) -> bool {
        match kind {
            MutationKind::ChildList => self.child_list,
            MutationKind::CharacterData => self.character_data,
        }
    }
}

/// A single recorded change
#[derive(Debug, Clone)]
pub struct MutationRecord {
    pub kind: MutationKind,
    /// Node whose children or text changed
    pub target: Node,
    /// Nodes inserted under `target`
    pub added: SmallVec<[Node; 4]>,
    /// Nodes removed from `target`
    pub removed: SmallVec<[Node; 4]>,
}

impl MutationRecord {
    pub fn child_list(
        target: Node,
        added: SmallVec<[Node; 4]>,
        removed: SmallVec<[Node; 4]>,
    ) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            added,
            removed,
        }
    }

    pub fn character_data(target: Node) -> Self {
        Self {
            kind: MutationKind::CharacterData,
            target,
            added: SmallVec::new(),
            removed: SmallVec::new(),
        }
    }

    #[inline]
    pub fn is_child_list(&self) -> bool {
        self.kind == MutationKind::ChildList
    }
}

/// Receiver of mutation batches.
///
/// Closures taking `&[MutationRecord]` implement this trait, which keeps
/// ad-hoc observers short.
pub trait MutationListener {
    /// Handle one drained batch, in recording order.
    fn on_mutations(&mut self, records: &[MutationRecord]);
}

impl<F> MutationListener for F
where
    F: FnMut(&[MutationRecord]),
{
    fn on_mutations(&mut self, records: &[MutationRecord]) {
        self(records)
    }
}
