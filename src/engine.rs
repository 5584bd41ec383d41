//! Conversion engine seam.
//!
//! The engine is an optional collaborator: given `from`/`to` locale codes it
//! hands out a synchronous string-to-string `Converter`, or declines.
//! `CharMapEngine` is a small table-driven implementation; real deployments
//! can plug in a phrase-level engine behind the same trait.

use std::fmt;
use std::rc::Rc;

use compact_str::CompactString;
use rustc_hash::FxHashMap;

use crate::error::{ToggleError, ToggleResult};
use crate::variant::{SIMPLIFIED_MARKERS, TRADITIONAL_MARKERS, Variant};

// =============================================================================
// Converter
// =============================================================================

/// Directional, pure text converter
#[derive(Clone)]
pub struct Converter(Rc<dyn Fn(&str) -> String>);

impl Converter {
    pub fn new(f: impl Fn(&str) -> String + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Convert `text`
    #[inline]
    pub fn convert(&self, text: &str) -> String {
        (self.0)(text)
    }

    /// Check whether two handles share the same function
    pub fn ptr_eq(&self, other: &Converter) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Converter(..)")
    }
}

// =============================================================================
// ConversionEngine
// =============================================================================

/// Factory for directional converters
pub trait ConversionEngine {
    /// Build a converter between two engine locale codes, or `None` when the
    /// direction is unsupported.
    fn converter(&self, from: &str, to: &str) -> Option<Converter>;
}

/// Shared engine handle as held by the toggle
pub type SharedEngine = Rc<dyn ConversionEngine>;

impl<F> ConversionEngine for F
where
    F: Fn(&str, &str) -> Option<Converter>,
{
    fn converter(&self, from: &str, to: &str) -> Option<Converter> {
        self(from, to)
    }
}

// =============================================================================
// CharMapEngine
// =============================================================================

/// Pairs added by `CharMapEngine::basic` on top of the detector markers
const BASIC_PAIRS: &[(char, char)] = &[
    ('们', '們'), ('说', '說'), ('时', '時'), ('来', '來'), ('会', '會'),
    ('学', '學'), ('语', '語'), ('对', '對'), ('开', '開'), ('关', '關'),
    ('问', '問'), ('题', '題'), ('后', '後'), ('书', '書'), ('体', '體'),
    ('转', '轉'), ('换', '換'), ('当', '當'), ('页', '頁'), ('简', '簡'),
    ('话', '話'), ('里', '裡'), ('读', '讀'), ('写', '寫'), ('长', '長'),
    ('东', '東'), ('车', '車'), ('马', '馬'), ('鸟', '鳥'), ('鱼', '魚'),
    ('见', '見'), ('觉', '覺'), ('边', '邊'), ('过', '過'), ('还', '還'),
];

type CharTable = FxHashMap<char, char>;

/// Character-for-character engine backed by lookup tables.
///
/// Each direction is a separate table, keyed by `(from, to)` locale codes.
#[derive(Debug, Default, Clone)]
pub struct CharMapEngine {
    tables: FxHashMap<(CompactString, CompactString), Rc<CharTable>>,
}

impl CharMapEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simplified/Traditional engine seeded with a small common-character set
    pub fn basic() -> Self {
        let pairs = SIMPLIFIED_MARKERS
            .iter()
            .copied()
            .zip(TRADITIONAL_MARKERS.iter().copied())
            .chain(BASIC_PAIRS.iter().copied())
            .filter(|(s, t)| s != t);
        Self::new().with_pairs(
            Variant::Simplified.locale(),
            Variant::Traditional.locale(),
            pairs,
        )
    }

    /// Register `a → b` pairs and their reverse `b → a`
    pub fn with_pairs(
        mut self,
        a: &str,
        b: &str,
        pairs: impl IntoIterator<Item = (char, char)>,
    ) -> Self {
        let mut forward = CharTable::default();
        let mut backward = CharTable::default();
        for (x, y) in pairs {
            forward.insert(x, y);
            backward.entry(y).or_insert(x);
        }
        self.extend_table(a, b, forward);
        self.extend_table(b, a, backward);
        self
    }

    /// Parse a pair table: one `from to` pair of single characters per line.
    /// Blank lines and lines starting with `#` are skipped.
    pub fn with_table_text(self, a: &str, b: &str, text: &str) -> ToggleResult<Self> {
        let mut pairs = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let pair = match (fields.next(), fields.next(), fields.next()) {
                (Some(x), Some(y), None) => single_char(x).zip(single_char(y)),
                _ => None,
            };
            match pair {
                Some(pair) => pairs.push(pair),
                None => {
                    return Err(ToggleError::engine_table(format!(
                        "line {}: expected two single characters, found `{}`",
                        lineno + 1,
                        line
                    )));
                }
            }
        }
        Ok(self.with_pairs(a, b, pairs))
    }

    fn extend_table(&mut self, from: &str, to: &str, entries: CharTable) {
        let slot = self
            .tables
            .entry(direction(from, to))
            .or_default();
        Rc::make_mut(slot).extend(entries);
    }

    /// Check whether a direction is registered
    pub fn supports(&self, from: &str, to: &str) -> bool {
        self.tables.contains_key(&direction(from, to))
    }
}

fn direction(from: &str, to: &str) -> (CompactString, CompactString) {
    (CompactString::from(from), CompactString::from(to))
}

fn single_char(field: &str) -> Option<char> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

impl ConversionEngine for CharMapEngine {
    fn converter(&self, from: &str, to: &str) -> Option<Converter> {
        let table = Rc::clone(self.tables.get(&direction(from, to))?);
        Some(Converter::new(move |text| {
            text.chars()
                .map(|c| table.get(&c).copied().unwrap_or(c))
                .collect()
        }))
    }
}
