//! Eligible text node collection.

use crate::node::{Node, NodeData};
use crate::selector::Selector;

/// Rules deciding which text nodes take part in conversion.
///
/// A text node is eligible when it has non-whitespace content, has a parent,
/// and neither its parent nor any ancestor up to the document root matches
/// a skip selector or a home-region selector.
#[derive(Debug, Clone, Default)]
pub struct Eligibility {
    skip: Vec<Selector>,
    home: Vec<Selector>,
}

impl Eligibility {
    pub fn new(skip: Vec<Selector>, home: Vec<Selector>) -> Self {
        Self { skip, home }
    }

    pub fn skip_selectors(&self) -> &[Selector] {
        &self.skip
    }

    pub fn home_selectors(&self) -> &[Selector] {
        &self.home
    }

    /// Check whether an element hides its whole subtree from conversion
    pub fn is_excluded(&self, node: &Node) -> bool {
        self.skip
            .iter()
            .chain(&self.home)
            .any(|sel| sel.matches(node))
    }

    /// Check a single text node against every rule
    pub fn is_eligible(&self, node: &Node) -> bool {
        let Some(text) = node.as_text() else {
            return false;
        };
        if text.is_whitespace() {
            return false;
        }
        let Some(parent) = node.parent() else {
            return false;
        };
        !self.excluded_inclusive(&parent)
    }

    fn excluded_inclusive(&self, node: &Node) -> bool {
        self.is_excluded(node) || node.ancestors().any(|a| self.is_excluded(&a))
    }

    /// Eligible text nodes under `root` in document order.
    ///
    /// `root` may be a text node (checked on its own), an element, or the
    /// document node. Ancestors above `root` count too, so collecting a
    /// subtree freshly inserted into a `<pre>` yields nothing.
    pub fn collect(&self, root: &Node) -> Vec<Node> {
        let mut out = Vec::new();
        if root.is_text() {
            if self.is_eligible(root) {
                out.push(root.clone());
            }
            return out;
        }
        if self.excluded_inclusive(root) {
            return out;
        }

        let mut stack: Vec<Node> = root.children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            match node.data() {
                NodeData::Text(text) => {
                    if !text.is_whitespace() {
                        out.push(node);
                    }
                }
                NodeData::Element(_) => {
                    if !self.is_excluded(&node) {
                        stack.extend(node.children().into_iter().rev());
                    }
                }
                NodeData::Document(_) => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> Eligibility {
        Eligibility::new(
            vec![Selector::tag("pre"), Selector::tag("code"), Selector::attr("data-lang-toggle-ignore")],
            vec![Selector::class("logo"), Selector::tag("a").and_attr_eq("href", "/")],
        )
    }

    fn texts(nodes: &[Node]) -> Vec<String> {
        nodes.iter().map(Node::text_content).collect()
    }

    #[test]
    fn test_collect_document_order() {
        let root = Node::element("body")
            .child(Node::element("h1").with_text("标题"))
            .child(
                Node::element("p")
                    .with_text("第一")
                    .child(Node::element("em").with_text("第二"))
                    .with_text("第三"),
            )
            .with_text("第四");
        assert_eq!(texts(&rules().collect(&root)), vec!["标题", "第一", "第二", "第三", "第四"]);
    }

    #[test]
    fn test_skips_whitespace_and_excluded() {
        let root = Node::element("body")
            .with_text("  \n ")
            .child(Node::element("pre").child(Node::element("span").with_text("代码")))
            .child(Node::element("code").with_text("这个"))
            .child(Node::element("div").with_attr("data-lang-toggle-ignore", "").with_text("忽略"))
            .child(Node::element("div").with_class("logo").with_text("站点"))
            .child(Node::element("a").with_attr("href", "/").with_text("首页"))
            .child(Node::element("a").with_attr("href", "/posts/").with_text("文章"));
        assert_eq!(texts(&rules().collect(&root)), vec!["文章"]);
    }

    #[test]
    fn test_excluded_ancestor_above_root() {
        let inner = Node::element("span").with_text("代码");
        let _pre = Node::element("pre").child(inner.clone());
        assert!(rules().collect(&inner).is_empty());

        let text = inner.first_child().unwrap();
        assert!(!rules().is_eligible(&text));
        assert!(rules().collect(&text).is_empty());
    }

    #[test]
    fn test_text_root() {
        let p = Node::element("p").with_text("段落");
        let text = p.first_child().unwrap();
        assert_eq!(rules().collect(&text), vec![text.clone()]);

        // Detached text has no parent
        let orphan = Node::text("孤儿");
        assert!(!rules().is_eligible(&orphan));
        assert!(rules().collect(&orphan).is_empty());
    }

    #[test]
    fn test_elements_are_never_eligible() {
        let p = Node::element("p").with_text("段落");
        assert!(!rules().is_eligible(&p));
    }
}
