//! Prelude module for common imports.
//!
//! ```
//! use zh_toggle::prelude::*;
//! ```

// Node types
pub use crate::node::{Children, Document, ElementData, Node, NodeData, TextData, WeakNode};

// Mutations
pub use crate::mutation::{MutationKind, MutationListener, MutationRecord, ObserveOptions};

// Attributes
pub use crate::attr::{Attrs, AttrsExt};

// Selectors
pub use crate::selector::Selector;

// Variants
pub use crate::variant::{MarkerCounts, Variant, VariantDetector, visible_text};

// Engine
pub use crate::engine::{CharMapEngine, ConversionEngine, Converter, SharedEngine};

// Conversion
pub use crate::convert::{ApplyOutcome, ConverterStats, Eligibility, LazyConverter, NodeState};

// Toggle
pub use crate::config::{ToggleConfig, ToggleLabels};
pub use crate::toggle::{LangToggle, ToggleSession, ToggleState};

// Error
pub use crate::error::{ToggleError, ToggleResult};

// Render
pub use crate::render::{RenderConfig, render_document, render_node};
