//! Script variants and the variant detector.
//!
//! Detection is a presence heuristic: count how many characters of two small
//! marker sets (each exclusive to one variant) appear anywhere in the text.
//! It is best-effort, not a classifier.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::error::{ToggleError, ToggleResult};
use crate::node::{Node, NodeData};

/// Marker characters used only by Simplified Chinese
pub const SIMPLIFIED_MARKERS: [char; 11] = [
    '个', '简', '么', '国', '这', '没', '图', '发', '为', '与', '门',
];

/// Marker characters used only by Traditional Chinese
pub const TRADITIONAL_MARKERS: [char; 11] = [
    '個', '簡', '麼', '國', '這', '沒', '圖', '發', '為', '與', '門',
];

// =============================================================================
// Variant
// =============================================================================

/// One of the two script forms a page can be shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Simplified,
    Traditional,
}

impl Variant {
    /// Variant assumed when the text carries no evidence either way
    pub const BASELINE: Variant = Variant::Traditional;

    /// Short tag: `s` or `t`
    pub const fn tag(self) -> &'static str {
        match self {
            Variant::Simplified => "s",
            Variant::Traditional => "t",
        }
    }

    /// Locale code understood by conversion engines
    pub const fn locale(self) -> &'static str {
        match self {
            Variant::Simplified => "cn",
            Variant::Traditional => "hk",
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Variant::Simplified => Variant::Traditional,
            Variant::Traditional => Variant::Simplified,
        }
    }

    /// Parse a short tag (`s` / `t`)
    pub fn from_tag(tag: &str) -> ToggleResult<Self> {
        match tag {
            "s" => Ok(Variant::Simplified),
            "t" => Ok(Variant::Traditional),
            other => Err(ToggleError::UnknownVariant(other.to_owned())),
        }
    }
}

impl FromStr for Variant {
    type Err = ToggleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// =============================================================================
// VariantDetector
// =============================================================================

/// Number of distinct markers of each set found in a text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerCounts {
    pub simplified: usize,
    pub traditional: usize,
}

impl MarkerCounts {
    /// Decide the variant. Ties, including zero evidence, go to the baseline.
    pub fn verdict(&self) -> Variant {
        if self.traditional >= self.simplified {
            Variant::Traditional
        } else {
            Variant::Simplified
        }
    }
}

/// Presence-count detector over two marker sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDetector {
    simplified: SmallVec<[char; 16]>,
    traditional: SmallVec<[char; 16]>,
}

impl Default for VariantDetector {
    fn default() -> Self {
        Self::with_sets(SIMPLIFIED_MARKERS, TRADITIONAL_MARKERS)
    }
}

impl VariantDetector {
    /// Use custom marker sets. Duplicates are ignored.
    pub fn with_sets(
        simplified: impl IntoIterator<Item = char>,
        traditional: impl IntoIterator<Item = char>,
    ) -> Self {
        fn dedup(chars: impl IntoIterator<Item = char>) -> SmallVec<[char; 16]> {
            let mut set = SmallVec::new();
            for c in chars {
                if !set.contains(&c) {
                    set.push(c);
                }
            }
            set
        }
        Self {
            simplified: dedup(simplified),
            traditional: dedup(traditional),
        }
    }

    /// Count distinct markers present in `text`
    pub fn counts(&self, text: &str) -> MarkerCounts {
        let mut seen_s: SmallVec<[bool; 16]> = SmallVec::from_elem(false, self.simplified.len());
        let mut seen_t: SmallVec<[bool; 16]> = SmallVec::from_elem(false, self.traditional.len());
        for c in text.chars() {
            if let Some(i) = self.simplified.iter().position(|&m| m == c) {
                seen_s[i] = true;
            }
            if let Some(i) = self.traditional.iter().position(|&m| m == c) {
                seen_t[i] = true;
            }
        }
        MarkerCounts {
            simplified: seen_s.iter().filter(|&&s| s).count(),
            traditional: seen_t.iter().filter(|&&t| t).count(),
        }
    }

    /// Most likely variant of `text`
    pub fn detect(&self, text: &str) -> Variant {
        let counts = self.counts(text);
        if counts.simplified == 0 && counts.traditional == 0 {
            return Variant::BASELINE;
        }
        counts.verdict()
    }
}

// =============================================================================
// Visible text
// =============================================================================

/// Text a reader would see under `root`: skips script-like subtrees and
/// elements marked `hidden`.
pub fn visible_text(root: &Node) -> String {
    let mut buf = String::new();
    push_visible(root, &mut buf);
    buf
}

fn push_visible(node: &Node, buf: &mut String) {
    match node.data() {
        NodeData::Text(t) => t.with(|s| buf.push_str(s)),
        NodeData::Element(e) => {
            if matches!(e.tag(), "script" | "style" | "noscript" | "template")
                || node.has_attr("hidden")
            {
                return;
            }
            for child in node.children() {
                push_visible(&child, buf);
            }
        }
        NodeData::Document(_) => {
            for child in node.children() {
                push_visible(&child, buf);
            }
        }
    }
}
