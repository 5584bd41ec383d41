//! Toggle configuration
//!
//! Defaults match the theme markup: a `#langToggleBtn` button holding a
//! `#langLabel` label, article content under `.article-content`.

use crate::convert::Eligibility;
use crate::error::ToggleResult;
use crate::selector::Selector;
use crate::variant::{Variant, VariantDetector};

/// Default id of the toggle button
pub const DEFAULT_BUTTON_ID: &str = "langToggleBtn";

/// Default id of the label inside the button
pub const DEFAULT_LABEL_ID: &str = "langLabel";

/// Attribute that opts an element's subtree out of conversion
pub const IGNORE_ATTR: &str = "data-lang-toggle-ignore";

/// Elements whose text never takes part in conversion
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "pre", "code", "kbd", "samp", "textarea", "input", "select",
    "option", "svg", "math",
];

// =============================================================================
// ToggleLabels
// =============================================================================

/// Texts shown on the toggle control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleLabels {
    pub simplified_label: String,
    pub simplified_title: String,
    pub traditional_label: String,
    pub traditional_title: String,
    pub disabled_label: String,
    pub disabled_title: String,
}

impl Default for ToggleLabels {
    fn default() -> Self {
        Self {
            simplified_label: "简体".to_owned(),
            simplified_title: "当前为简体中文，切换为繁体中文".to_owned(),
            traditional_label: "繁體".to_owned(),
            traditional_title: "當前為繁體中文，切換為簡體中文".to_owned(),
            disabled_label: "简繁切换".to_owned(),
            disabled_title: "简繁转换库未加载".to_owned(),
        }
    }
}

impl ToggleLabels {
    /// Label text while `variant` is displayed
    pub fn label(&self, variant: Variant) -> &str {
        match variant {
            Variant::Simplified => &self.simplified_label,
            Variant::Traditional => &self.traditional_label,
        }
    }

    /// Button title while `variant` is displayed
    pub fn title(&self, variant: Variant) -> &str {
        match variant {
            Variant::Simplified => &self.simplified_title,
            Variant::Traditional => &self.traditional_title,
        }
    }
}

// =============================================================================
// ToggleConfig
// =============================================================================

/// Configuration for `LangToggle::mount`
#[derive(Debug, Clone)]
pub struct ToggleConfig {
    /// Id of the toggle button element
    pub button_id: String,
    /// Id of the label element
    pub label_id: String,
    /// Detection regions, tried in order before falling back to `<body>`
    pub content_roots: Vec<Selector>,
    /// Subtrees excluded from conversion (the button and label are always
    /// excluded on top of these)
    pub skip: Vec<Selector>,
    /// Site logo / home-link region, also excluded
    pub home: Vec<Selector>,
    pub detector: VariantDetector,
    pub labels: ToggleLabels,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        let skip = std::iter::once(Selector::attr(IGNORE_ATTR))
            .chain(SKIP_TAGS.iter().map(|tag| Selector::tag(tag)))
            .collect();
        Self {
            button_id: DEFAULT_BUTTON_ID.to_owned(),
            label_id: DEFAULT_LABEL_ID.to_owned(),
            content_roots: vec![Selector::class("article-content"), Selector::tag("article")],
            skip,
            home: vec![Selector::class("logo"), Selector::tag("a").and_attr_eq("href", "/")],
            detector: VariantDetector::default(),
            labels: ToggleLabels::default(),
        }
    }
}

impl ToggleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_button_id(mut self, id: impl Into<String>) -> Self {
        self.button_id = id.into();
        self
    }

    pub fn with_label_id(mut self, id: impl Into<String>) -> Self {
        self.label_id = id.into();
        self
    }

    /// Exclude another subtree from conversion
    pub fn with_skip_selector(mut self, selector: &str) -> ToggleResult<Self> {
        self.skip.push(Selector::parse(selector)?);
        Ok(self)
    }

    /// Add another logo / home-link selector
    pub fn with_home_selector(mut self, selector: &str) -> ToggleResult<Self> {
        self.home.push(Selector::parse(selector)?);
        Ok(self)
    }

    /// Append a detection region to the lookup order
    pub fn with_content_root(mut self, selector: &str) -> ToggleResult<Self> {
        self.content_roots.push(Selector::parse(selector)?);
        Ok(self)
    }

    /// Replace the detection regions
    pub fn with_content_roots(mut self, roots: Vec<Selector>) -> Self {
        self.content_roots = roots;
        self
    }

    pub fn with_detector(mut self, detector: VariantDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_labels(mut self, labels: ToggleLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Eligibility rules, including the toggle's own button and label
    pub fn eligibility(&self) -> Eligibility {
        let skip = [Selector::id(&self.button_id), Selector::id(&self.label_id)]
            .into_iter()
            .chain(self.skip.iter().cloned())
            .collect();
        Eligibility::new(skip, self.home.clone())
    }
}
