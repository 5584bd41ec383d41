//! The language toggle controller.
//!
//! `LangToggle` binds a `ToggleSession` to a live document: it detects the
//! authored variant at mount, converts the body on activation, keeps the
//! button label in sync, and converts content inserted while converted.
//!
//! # Example
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
//!         .child(Node::element("article").child(Node::element("p").with_text("这个国家"))),
//! );
//!
//! let engine: SharedEngine = Rc::new(CharMapEngine::basic());
//! let mut toggle = LangToggle::mount(&doc, ToggleConfig::default(), Some(engine)).unwrap();
//! assert_eq!(toggle.current_variant(), Variant::Simplified);
//!
//! toggle.activate();
//! let article = doc.query_selector(&Selector::tag("article")).unwrap();
//! assert_eq!(article.text_content(), "這個國家");
//!
//! // Content added later follows the active variant
//! let body = doc.body().unwrap();
//! body.append_child(Node::element("p").with_text("没有门"));
//! doc.deliver_mutations(&mut toggle);
//! assert!(body.text_content().ends_with("沒有門"));
//! ```

mod session;

pub use session::{ToggleSession, ToggleState};

use crate::config::{ToggleConfig, ToggleLabels};
use crate::convert::{ApplyOutcome, Eligibility, LazyConverter};
use crate::engine::SharedEngine;
use crate::error::{ToggleError, ToggleResult};
use crate::mutation::{MutationListener, MutationRecord, ObserveOptions};
use crate::node::{Document, Node};
use crate::variant::{Variant, visible_text};

/// Simplified/Traditional toggle mounted on a document
#[derive(Debug)]
pub struct LangToggle {
    document: Document,
    session: ToggleSession,
    converter: LazyConverter,
    eligibility: Eligibility,
    labels: ToggleLabels,
    body: Node,
    button: Node,
    label: Node,
}

impl LangToggle {
    /// Mount the toggle on `doc`.
    ///
    /// Returns `None` when the button, label or body is missing; pages
    /// without the control simply get no toggle. `try_mount` reports which
    /// element was missing.
    pub fn mount(doc: &Document, config: ToggleConfig, engine: Option<SharedEngine>) -> Option<Self> {
        match Self::try_mount(doc, config, engine) {
            Ok(toggle) => Some(toggle),
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(error = %_err, "toggle not mounted");
                None
            }
        }
    }

    /// Mount the toggle on `doc`, reporting which element is missing.
    ///
    /// The detection region is the first content root with visible text,
    /// else the body. Without an engine the toggle mounts in the terminal
    /// `Disabled` state and leaves the document unobserved. Otherwise the
    /// document is observed for child-list edits from here on, until the
    /// toggle is dropped.
    pub fn try_mount(
        doc: &Document,
        config: ToggleConfig,
        engine: Option<SharedEngine>,
    ) -> ToggleResult<Self> {
        let find = |id: &str| {
            doc.get_element_by_id(id)
                .ok_or_else(|| ToggleError::MissingElement(format!("#{id}")))
        };
        let button = find(config.button_id.as_str())?;
        let label = find(config.label_id.as_str())?;
        let body = doc
            .body()
            .ok_or_else(|| ToggleError::MissingElement("body".to_owned()))?;

        let region_text = config
            .content_roots
            .iter()
            .find_map(|sel| doc.query_selector(sel))
            .map(|region| visible_text(&region))
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| visible_text(&body));
        let detected = config.detector.detect(&region_text);

        let has_engine = engine.is_some();
        let mut toggle = Self {
            document: doc.clone(),
            session: ToggleSession::new(detected),
            converter: LazyConverter::new(detected, engine),
            eligibility: config.eligibility(),
            labels: config.labels,
            body,
            button,
            label,
        };
        toggle.update_ui();

        if !has_engine {
            toggle.session.disable();
            toggle.disable_ui();
            #[cfg(feature = "tracing")]
            tracing::warn!(detected = %detected, "conversion engine unavailable; toggle disabled");
        } else {
            doc.disconnect();
            doc.observe(ObserveOptions::CHILD_LIST);
            #[cfg(feature = "tracing")]
            tracing::info!(detected = %detected, "language toggle mounted");
        }
        Ok(toggle)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> ToggleState {
        self.session.state()
    }

    pub fn session(&self) -> &ToggleSession {
        &self.session
    }

    pub fn detected_variant(&self) -> Variant {
        self.session.detected()
    }

    pub fn current_variant(&self) -> Variant {
        self.session.current()
    }

    /// The lazy converter, for stats and per-node state
    pub fn converter(&self) -> &LazyConverter {
        &self.converter
    }

    pub fn eligibility(&self) -> &Eligibility {
        &self.eligibility
    }

    pub fn button(&self) -> &Node {
        &self.button
    }

    pub fn label(&self) -> &Node {
        &self.label
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle a click on the toggle button.
    ///
    /// Returns `None` when disabled. The cached directional converter is
    /// dropped on every activation, and the label is refreshed whatever the
    /// conversion outcome.
    pub fn activate(&mut self) -> Option<ApplyOutcome> {
        let target = self.session.toggle()?;
        self.converter.invalidate();

        let nodes = self.eligibility.collect(&self.body);
        let outcome = self.converter.apply(target, &nodes);
        self.update_ui();

        #[cfg(feature = "tracing")]
        tracing::info!(variant = %target, nodes = nodes.len(), ?outcome, "language toggled");
        Some(outcome)
    }

    fn update_ui(&self) {
        let current = self.session.current();
        self.set_label(self.labels.label(current));
        self.button.set_attr("title", self.labels.title(current));
    }

    fn disable_ui(&self) {
        self.button.set_attr("disabled", "");
        self.button.set_attr("title", self.labels.disabled_title.as_str());
        self.set_label(self.labels.disabled_label.as_str());
    }

    /// Rewrite the label's single text child in place, so label updates
    /// leave no child-list records behind
    fn set_label(&self, text: &str) {
        match self.label.first_child() {
            Some(child) if child.is_text() && self.label.child_count() == 1 => {
                child.set_text_content(text);
            }
            _ => self.label.set_text_content(text),
        }
    }

    /// Eligible text nodes added by a batch of child-list records in the body
    fn collect_added(&self, records: &[MutationRecord]) -> Vec<Node> {
        let mut added = Vec::new();
        for record in records
            .iter()
            .filter(|r| r.is_child_list() && r.target.is_inclusive_descendant_of(&self.body))
        {
            for node in &record.added {
                if node.is_text() {
                    if self.eligibility.is_eligible(node) {
                        added.push(node.clone());
                    }
                } else if node.is_element() {
                    added.extend(self.eligibility.collect(node));
                }
            }
        }
        added
    }
}

impl Drop for LangToggle {
    /// Stop observing, dropping any undelivered records
    fn drop(&mut self) {
        self.document.disconnect();
    }
}

impl MutationListener for LangToggle {
    /// Convert content inserted while the page shows the converted variant.
    ///
    /// The cached directional converter is reused; it is only built if absent.
    fn on_mutations(&mut self, records: &[MutationRecord]) {
        if !self.session.is_converted() {
            return;
        }
        let added = self.collect_added(records);
        if added.is_empty() {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(records = records.len(), nodes = added.len(), "converting inserted content");
        self.converter.apply(self.session.current(), &added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::engine::{CharMapEngine, ConversionEngine, Converter};
    use crate::selector::Selector;

    /// Counts converter invocations and engine factory calls
    #[derive(Clone, Default)]
    struct Counters {
        conversions: Rc<Cell<usize>>,
        builds: Rc<Cell<usize>>,
    }

    fn counting_engine(counters: &Counters) -> SharedEngine {
        let inner = CharMapEngine::basic();
        let counters = counters.clone();
        Rc::new(move |from: &str, to: &str| -> Option<Converter> {
            counters.builds.set(counters.builds.get() + 1);
            let convert = inner.converter(from, to)?;
            let conversions = Rc::clone(&counters.conversions);
            Some(Converter::new(move |text| {
                conversions.set(conversions.get() + 1);
                convert.convert(text)
            }))
        })
    }

    fn controls() -> Node {
        Node::element("header")
            .child(Node::element("a").with_attr("href", "/").with_class("logo").with_text("我的博客"))
            .child(
                Node::element("button")
                    .with_id("langToggleBtn")
                    .child(Node::element("span").with_id("langLabel").with_text("简繁")),
            )
    }

    fn simplified_page() -> Document {
        Document::with_body(
            Node::element("body")
                .child(controls())
                .child(
                    Node::element("div")
                        .with_class("article-content")
                        .child(Node::element("h1").with_text("这个国家"))
                        .child(Node::element("p").with_text("为什么没有门"))
                        .child(Node::element("pre").child(Node::element("code").with_text("let 这 = 个;"))),
                )
                .child(Node::element("footer").with_text("发表于")),
        )
    }

    fn mount(doc: &Document, counters: &Counters) -> LangToggle {
        LangToggle::mount(doc, ToggleConfig::default(), Some(counting_engine(counters))).unwrap()
    }

    fn text_of(doc: &Document, selector: &str) -> String {
        doc.query_selector(&Selector::parse(selector).unwrap())
            .unwrap()
            .text_content()
    }

    #[test]
    fn test_mount_detects_and_labels() {
        let doc = simplified_page();
        let toggle = mount(&doc, &Counters::default());

        assert_eq!(toggle.detected_variant(), Variant::Simplified);
        assert_eq!(toggle.state(), ToggleState::Original);
        assert_eq!(toggle.label().text_content(), "简体");
        assert_eq!(
            toggle.button().get_attr("title").as_deref(),
            Some("当前为简体中文，切换为繁体中文")
        );
        assert!(!doc.has_pending_mutations());
    }

    #[test]
    fn test_mount_detects_traditional_region() {
        let doc = Document::with_body(
            Node::element("body")
                .child(controls())
                // Simplified text outside the content region is ignored
                .child(Node::element("nav").with_text("这个 图 发"))
                .child(Node::element("article").with_text("這個國家")),
        );
        let toggle = mount(&doc, &Counters::default());
        assert_eq!(toggle.detected_variant(), Variant::Traditional);
        assert_eq!(toggle.label().text_content(), "繁體");
    }

    #[test]
    fn test_mount_falls_back_to_body() {
        let doc = Document::with_body(
            Node::element("body")
                .child(controls())
                .child(Node::element("section").with_text("这个没有")),
        );
        let toggle = mount(&doc, &Counters::default());
        assert_eq!(toggle.detected_variant(), Variant::Simplified);
    }

    #[test]
    fn test_mount_requires_controls() {
        let doc = Document::with_body(Node::element("body").with_text("这个"));
        let engine: SharedEngine = Rc::new(CharMapEngine::basic());
        assert!(LangToggle::mount(&doc, ToggleConfig::default(), Some(engine)).is_none());

        let doc = Document::with_body(
            Node::element("body").child(Node::element("button").with_id("langToggleBtn")),
        );
        assert!(LangToggle::mount(&doc, ToggleConfig::default(), None).is_none());

        let err = LangToggle::try_mount(&doc, ToggleConfig::default(), None).unwrap_err();
        assert!(matches!(&err, ToggleError::MissingElement(id) if id == "#langLabel"));
        assert!(!doc.has_pending_mutations());
    }

    #[test]
    fn test_disabled_without_engine() {
        let doc = simplified_page();
        let mut toggle = LangToggle::mount(&doc, ToggleConfig::default(), None).unwrap();

        assert_eq!(toggle.state(), ToggleState::Disabled);
        assert!(toggle.button().has_attr("disabled"));
        assert_eq!(toggle.button().get_attr("title").as_deref(), Some("简繁转换库未加载"));
        assert_eq!(toggle.label().text_content(), "简繁切换");

        assert_eq!(toggle.activate(), None);
        assert_eq!(toggle.activate(), None);
        assert_eq!(toggle.state(), ToggleState::Disabled);
        assert_eq!(text_of(&doc, "h1"), "这个国家");
    }

    #[test]
    fn test_activate_converts_eligible_text_only() {
        let doc = simplified_page();
        let mut toggle = mount(&doc, &Counters::default());

        assert_eq!(toggle.activate(), Some(ApplyOutcome::Converted(3)));
        assert_eq!(toggle.state(), ToggleState::Converted);
        assert_eq!(text_of(&doc, "h1"), "這個國家");
        assert_eq!(text_of(&doc, "p"), "為什麼沒有門");
        assert_eq!(text_of(&doc, "footer"), "發表于");
        // Excluded regions keep their authored text
        assert_eq!(text_of(&doc, "code"), "let 这 = 个;");
        assert_eq!(text_of(&doc, ".logo"), "我的博客");
        // The label reflects the new variant
        assert_eq!(toggle.label().text_content(), "繁體");
        assert_eq!(
            toggle.button().get_attr("title").as_deref(),
            Some("當前為繁體中文，切換為簡體中文")
        );
    }

    #[test]
    fn test_round_trip_restores_exactly() {
        let doc = simplified_page();
        let before = doc.body().unwrap().text_content();
        let mut toggle = mount(&doc, &Counters::default());

        toggle.activate();
        assert_ne!(doc.body().unwrap().text_content(), before);
        assert_eq!(toggle.activate(), Some(ApplyOutcome::Restored(3)));
        assert_eq!(toggle.state(), ToggleState::Original);

        // Only the label differs: it now names the current variant
        let label = toggle.label().clone();
        let restored = doc.body().unwrap().text_content();
        assert_eq!(restored.replace("简体", "简繁"), before);
        assert_eq!(label.text_content(), "简体");
    }

    #[test]
    fn test_repeated_cycles_do_not_drift() {
        let doc = simplified_page();
        let counters = Counters::default();
        let mut toggle = mount(&doc, &counters);

        toggle.activate();
        let converted = doc.body().unwrap().text_content();
        toggle.activate();
        let original = doc.body().unwrap().text_content();

        for _ in 0..5 {
            toggle.activate();
            assert_eq!(doc.body().unwrap().text_content(), converted);
            toggle.activate();
            assert_eq!(doc.body().unwrap().text_content(), original);
        }

        // Each node converted exactly once across all cycles
        assert_eq!(counters.conversions.get(), 3);
        // A fresh converter is built on every activation into Converted
        assert_eq!(counters.builds.get(), 6);
        assert_eq!(toggle.converter().stats().cache_hits, 15);
    }

    #[test]
    fn test_inserted_content_converted_when_active() {
        let doc = simplified_page();
        let counters = Counters::default();
        let mut toggle = mount(&doc, &counters);
        toggle.activate();
        doc.deliver_mutations(&mut toggle);
        let baseline = counters.conversions.get();

        let content = doc.query_selector(&Selector::class("article-content")).unwrap();
        let para = Node::element("p").with_id("late").with_text("这个图");
        content.append_child(para);
        doc.deliver_mutations(&mut toggle);

        assert_eq!(text_of(&doc, "#late"), "這個圖");
        // Only the new node was converted; earlier nodes were not revisited
        assert_eq!(counters.conversions.get(), baseline + 1);
        assert_eq!(toggle.converter().stats().cache_hits, 0);
        // The directional converter from activation was reused
        assert_eq!(counters.builds.get(), 1);
    }

    #[test]
    fn test_inserted_content_ignored_when_original() {
        let doc = simplified_page();
        let counters = Counters::default();
        let mut toggle = mount(&doc, &counters);

        let body = doc.body().unwrap();
        body.append_child(Node::element("p").with_id("late").with_text("这个"));
        doc.deliver_mutations(&mut toggle);

        assert_eq!(text_of(&doc, "#late"), "这个");
        assert_eq!(counters.conversions.get(), 0);
        assert_eq!(counters.builds.get(), 0);
    }

    #[test]
    fn test_inserted_excluded_content_untouched() {
        let doc = simplified_page();
        let mut toggle = mount(&doc, &Counters::default());
        toggle.activate();

        let body = doc.body().unwrap();
        let pre = doc.query_selector(&Selector::tag("pre")).unwrap();
        pre.append_child(Node::element("span").with_id("in-pre").with_text("这个"));
        body.append_child(Node::element("code").with_id("late-code").with_text("这个"));
        body.append_child(Node::element("div").with_attr("data-lang-toggle-ignore", "").with_text("门"));
        doc.deliver_mutations(&mut toggle);

        assert_eq!(text_of(&doc, "#in-pre"), "这个");
        assert_eq!(text_of(&doc, "#late-code"), "这个");
        assert_eq!(text_of(&doc, "[data-lang-toggle-ignore]"), "门");
    }

    #[test]
    fn test_inserted_text_node_converted() {
        let doc = simplified_page();
        let mut toggle = mount(&doc, &Counters::default());
        toggle.activate();

        let footer = doc.query_selector(&Selector::tag("footer")).unwrap();
        footer.append_child(Node::text("没有"));
        footer.append_child(Node::text("   "));
        doc.deliver_mutations(&mut toggle);

        assert_eq!(footer.text_content(), "發表于沒有   ");
    }

    #[test]
    fn test_batch_is_converted_together() {
        let doc = simplified_page();
        let mut toggle = mount(&doc, &Counters::default());
        toggle.activate();
        doc.deliver_mutations(&mut toggle);

        let body = doc.body().unwrap();
        let list = Node::element("ul");
        body.append_child(list.clone());
        list.append_child(Node::element("li").with_text("这"));
        list.append_child(Node::element("li").with_text("个"));

        let records = doc.take_mutations();
        assert_eq!(records.len(), 3);
        let before = toggle.converter().stats();
        toggle.on_mutations(&records);
        let after = toggle.converter().stats();

        assert_eq!(list.text_content(), "這個");
        // Both items are seen through the `ul` subtree and again through their
        // own records; the second sighting is a cache hit
        assert_eq!(after.conversions - before.conversions, 2);
        assert_eq!(after.cache_hits - before.cache_hits, 2);
    }

    #[test]
    fn test_mutations_outside_body_ignored() {
        let doc = simplified_page();
        let mut toggle = mount(&doc, &Counters::default());
        toggle.activate();

        let head = doc.head().unwrap();
        let title = Node::element("title");
        head.append_child(title.clone());
        title.append_child(Node::text("这个"));
        doc.deliver_mutations(&mut toggle);

        assert_eq!(title.text_content(), "这个");
    }

    #[test]
    fn test_content_added_after_round_trip_stays_authored() {
        let doc = simplified_page();
        let mut toggle = mount(&doc, &Counters::default());
        toggle.activate();
        toggle.activate();
        doc.deliver_mutations(&mut toggle);

        let body = doc.body().unwrap();
        body.append_child(Node::element("p").with_id("late").with_text("这个"));
        doc.deliver_mutations(&mut toggle);
        assert_eq!(text_of(&doc, "#late"), "这个");

        // Converted on the next activation like any other content
        toggle.activate();
        assert_eq!(text_of(&doc, "#late"), "這個");
    }

    #[test]
    fn test_declining_engine_still_updates_label() {
        let doc = simplified_page();
        let engine: SharedEngine = Rc::new(|_: &str, _: &str| -> Option<Converter> { None });
        let mut toggle = LangToggle::mount(&doc, ToggleConfig::default(), Some(engine)).unwrap();

        assert_eq!(toggle.activate(), Some(ApplyOutcome::Skipped));
        assert_eq!(toggle.state(), ToggleState::Converted);
        assert_eq!(toggle.label().text_content(), "繁體");
        assert_eq!(text_of(&doc, "h1"), "这个国家");

        assert_eq!(toggle.activate(), Some(ApplyOutcome::Restored(3)));
        assert_eq!(text_of(&doc, "h1"), "这个国家");
    }

    #[test]
    fn test_custom_controls_and_skip() {
        let doc = Document::with_body(
            Node::element("body")
                .child(Node::element("button").with_id("zh").child(Node::element("b").with_id("zh-label")))
                .child(Node::element("p").with_class("raw").with_text("这个"))
                .child(Node::element("p").with_text("这个")),
        );
        let config = ToggleConfig::new()
            .with_button_id("zh")
            .with_label_id("zh-label")
            .with_skip_selector("p.raw")
            .unwrap();
        let engine: SharedEngine = Rc::new(CharMapEngine::basic());
        let mut toggle = LangToggle::mount(&doc, config, Some(engine)).unwrap();

        toggle.activate();
        assert_eq!(text_of(&doc, "p.raw"), "这个");
        assert_eq!(doc.body().unwrap().text_content(), "繁體这个這個");
    }

    #[test]
    fn test_mount_empty_region_falls_back_to_body() {
        let doc = Document::with_body(
            Node::element("body")
                .child(controls())
                .child(Node::element("article").with_text("  \n"))
                .child(Node::element("p").with_text("这个国家没有门")),
        );
        let mut toggle = mount(&doc, &Counters::default());
        assert_eq!(toggle.detected_variant(), Variant::Simplified);
        assert_eq!(toggle.label().text_content(), "简体");

        assert_eq!(toggle.activate(), Some(ApplyOutcome::Converted(1)));
        assert_eq!(text_of(&doc, "p"), "這個國家沒有門");
    }

    #[test]
    fn test_activations_leave_log_empty() {
        let doc = simplified_page();
        let mut toggle = mount(&doc, &Counters::default());
        assert!(doc.is_observed());

        for _ in 0..1000 {
            toggle.activate();
        }
        assert!(!doc.has_pending_mutations());
        assert_eq!(toggle.state(), ToggleState::Original);
    }

    #[test]
    fn test_removed_content_released_after_delivery() {
        let doc = simplified_page();
        let mut toggle = mount(&doc, &Counters::default());
        toggle.activate();

        let body = doc.body().unwrap();
        let weak = {
            let p = Node::element("p").with_text("图片");
            body.append_child(p.clone());
            doc.deliver_mutations(&mut toggle);
            assert_eq!(p.text_content(), "圖片");
            body.remove_child(&p);
            p.downgrade()
        };
        doc.deliver_mutations(&mut toggle);
        assert!(weak.is_dead());
    }

    #[test]
    fn test_unmounted_document_is_not_observed() {
        let doc = simplified_page();
        let toggle = LangToggle::mount(&doc, ToggleConfig::default(), None).unwrap();
        assert_eq!(toggle.state(), ToggleState::Disabled);
        assert!(!doc.is_observed());

        let bare = Document::with_body(Node::element("body").with_text("这个"));
        assert!(LangToggle::mount(&bare, ToggleConfig::default(), None).is_none());
        assert!(!bare.is_observed());

        let mounted = mount(&doc, &Counters::default());
        assert!(doc.is_observed());
        doc.body().unwrap().append_child(Node::element("p"));
        drop(mounted);
        assert!(!doc.is_observed());
        assert!(!doc.has_pending_mutations());
    }
}
