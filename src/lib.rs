//! zh-toggle - Incremental Simplified/Traditional Chinese page conversion
//!
//! ## Core Concepts
//!
//! **Lazy, reversible conversion**: every text node remembers the text it was
//! authored with. Converting computes each node's counterpart at most once;
//! switching back restores the captured original, never a round-tripped copy.
//!
//! **Live document**: pages are shared, mutable node trees. Edits to attached
//! nodes are recorded and delivered in batches, so content inserted after the
//! page was converted follows the active variant.
//!
//! ## Modules
//! - `node`: Node/Document types and mutation recording
//! - `selector`: Minimal selector language for exclusion rules
//! - `variant`: Script variants and authored-variant detection
//! - `engine`: Conversion engine seam and a table-driven engine
//! - `convert`: Eligible text collection and lazy conversion
//! - `toggle`: The mounted toggle controller
//! - `render`: HTML rendering
//!
//! ## Usage
//!
//! ```
//! use std::rc::Rc;
//! use zh_toggle::prelude::*;
//!
//! let doc = Document::with_body(
//!     Node::element("body")
//!         .child(
//!             Node::element("button")
//!                 .with_id("langToggleBtn")
//!                 .child(Node::element("span").with_id("langLabel")),
//!         )
//!         .child(Node::element("p").with_text("简体中文")),
//! );
//!
//! let engine: SharedEngine = Rc::new(CharMapEngine::basic());
//! let mut toggle = LangToggle::mount(&doc, ToggleConfig::default(), Some(engine)).unwrap();
//!
//! toggle.activate();
//! assert_eq!(toggle.state(), ToggleState::Converted);
//! assert!(render_node(doc.body().as_ref().unwrap(), &RenderConfig::PROD).contains("簡體中文"));
//!
//! toggle.activate();
//! assert_eq!(toggle.state(), ToggleState::Original);
//! ```

// =============================================================================
// Core modules
// =============================================================================

/// Node types: Document, Node, ElementData, TextData
pub mod node;

/// Mutation records and listeners
pub mod mutation;

/// Attribute helpers
pub mod attr;

/// Selector parsing and matching
pub mod selector;

/// Weak-keyed side tables
pub mod cache;

/// Script variants and detection
pub mod variant;

/// Conversion engine seam
pub mod engine;

/// Text collection and lazy conversion
pub mod convert;

/// Toggle configuration
pub mod config;

/// The toggle controller
pub mod toggle;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

/// HTML rendering
pub mod render;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{Children, Document, Node, NodeData, NodeKey, WeakNode};

// Mutations
pub use mutation::{MutationKind, MutationListener, MutationRecord, ObserveOptions};

// Selectors
pub use selector::Selector;

// Variants
pub use variant::{Variant, VariantDetector};

// Engine
pub use engine::{CharMapEngine, ConversionEngine, Converter, SharedEngine};

// Conversion
pub use convert::{ApplyOutcome, Eligibility, LazyConverter};

// Toggle
pub use config::{ToggleConfig, ToggleLabels};
pub use toggle::{LangToggle, ToggleSession, ToggleState};

// Error types
pub use error::{ToggleError, ToggleResult};

// =============================================================================
// Tests
// =============================================================================
