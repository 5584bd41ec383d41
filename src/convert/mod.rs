//! Text node collection and lazy conversion
//!
//! - `Eligibility` - which text nodes take part in conversion
//! - `LazyConverter` - per-node memoized conversion and restore
//!
//! Both work on plain `Node` handles and need no controller, so they can be
//! driven directly for one-off batches.

mod collect;
mod lazy;

pub use collect::Eligibility;
pub use lazy::{ApplyOutcome, ConverterStats, LazyConverter, NodeState};
