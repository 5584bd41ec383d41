//! Lazy, memoized conversion of text nodes.
//!
//! The first time a node is touched its current text is captured as the
//! original. A converted text is computed at most once per node and reused on
//! every later pass. Restoring to the source variant only needs the captured
//! original, so it works without any engine.

use std::fmt;

use crate::cache::WeakKeyMap;
use crate::engine::{Converter, SharedEngine};
use crate::node::Node;
use crate::variant::Variant;

/// Conversion state of one text node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeState {
    original: String,
    converted: Option<String>,
}

impl NodeState {
    fn capture(node: &Node) -> Self {
        Self {
            original: node.text_content(),
            converted: None,
        }
    }

    /// Text as authored, captured on first contact
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Cached converted text, once computed
    pub fn converted(&self) -> Option<&str> {
        self.converted.as_deref()
    }
}

/// Result of a single `apply` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Nodes were reset to their original text
    Restored(usize),
    /// Nodes now show converted text
    Converted(usize),
    /// No converter was available; nothing changed
    Skipped,
}

/// Counters kept across `apply` calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConverterStats {
    /// Calls into the engine-provided converter
    pub conversions: usize,
    /// Nodes served from their cached converted text
    pub cache_hits: usize,
    /// Nodes reset to their original text
    pub restores: usize,
    /// Directional converters obtained from the engine
    pub builds: usize,
}

/// Per-node memoizing converter for one source variant
pub struct LazyConverter {
    source: Variant,
    engine: Option<SharedEngine>,
    converter: Option<Converter>,
    states: WeakKeyMap<NodeState>,
    stats: ConverterStats,
}

impl fmt::Debug for LazyConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyConverter")
            .field("source", &self.source)
            .field("has_engine", &self.engine.is_some())
            .field("has_converter", &self.converter.is_some())
            .field("tracked", &self.states.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl LazyConverter {
    /// Create a converter whose originals are in `source`
    pub fn new(source: Variant, engine: Option<SharedEngine>) -> Self {
        Self {
            source,
            engine,
            converter: None,
            states: WeakKeyMap::new(),
            stats: ConverterStats::default(),
        }
    }

    pub fn source(&self) -> Variant {
        self.source
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Check whether a directional converter is cached
    pub fn has_converter(&self) -> bool {
        self.converter.is_some()
    }

    /// Drop the cached directional converter; the next conversion rebuilds it
    pub fn invalidate(&mut self) {
        self.converter = None;
    }

    /// Return the cached converter, building `source → target` if absent.
    ///
    /// `None` when `target` is the source variant, when there is no engine,
    /// or when the engine declines the direction.
    pub fn ensure_converter(&mut self, target: Variant) -> Option<Converter> {
        if target == self.source {
            return None;
        }
        if self.converter.is_none() {
            let engine = self.engine.as_ref()?;
            self.converter = engine.converter(self.source.locale(), target.locale());
            if self.converter.is_some() {
                self.stats.builds += 1;
            } else {
                #[cfg(feature = "tracing")]
                tracing::warn!(from = self.source.locale(), to = target.locale(), "engine declined direction");
            }
        }
        self.converter.clone()
    }

    /// Show `nodes` in `target`.
    ///
    /// Only the given nodes are touched. Restoring never consults the engine;
    /// converting is a no-op when no converter can be obtained.
    pub fn apply(&mut self, target: Variant, nodes: &[Node]) -> ApplyOutcome {
        if target == self.source {
            for node in nodes {
                let state = self.states.get_or_insert_with(node, || NodeState::capture(node));
                node.set_text_content(state.original.clone());
            }
            self.stats.restores += nodes.len();

            #[cfg(feature = "tracing")]
            tracing::debug!(variant = %target, count = nodes.len(), "restored text nodes");
            return ApplyOutcome::Restored(nodes.len());
        }

        let Some(converter) = self.ensure_converter(target) else {
            return ApplyOutcome::Skipped;
        };

        for node in nodes {
            let state = self.states.get_or_insert_with(node, || NodeState::capture(node));
            let text = match &state.converted {
                Some(cached) => {
                    self.stats.cache_hits += 1;
                    cached.clone()
                }
                None => {
                    let converted = converter.convert(&state.original);
                    self.stats.conversions += 1;
                    state.converted = Some(converted.clone());
                    converted
                }
            };
            node.set_text_content(text);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(variant = %target, count = nodes.len(), "converted text nodes");
        ApplyOutcome::Converted(nodes.len())
    }

    /// State recorded for `node`, if it has been touched
    pub fn state(&self, node: &Node) -> Option<&NodeState> {
        self.states.get(node)
    }

    pub fn stats(&self) -> ConverterStats {
        self.stats
    }

    /// Number of side-table entries (dead ones included until purged)
    pub fn tracked(&self) -> usize {
        self.states.len()
    }

    /// Drop state for nodes that no longer exist
    pub fn purge(&mut self) -> usize {
        self.states.purge()
    }
}
