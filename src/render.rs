//! HTML rendering for the document model
//!
//! Renders documents and subtrees to HTML strings, mostly for inspection and
//! snapshot tests of converted pages.

use crate::attr::Attrs;
use crate::node::{Document, ElementData, Node, NodeData};

// =============================================================================
// RenderConfig
// =============================================================================

/// Indentation unit for pretty output.
const INDENT: &str = "  ";

/// Configuration for HTML rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Whether to emit a `<!DOCTYPE html>` line before the document element.
    pub doctype: bool,
    /// Whether to put element-only children on their own indented lines.
    ///
    /// Elements with any text child are always rendered inline, so pretty
    /// output never changes text content.
    pub pretty: bool,
}

impl RenderConfig {
    /// Development config (doctype, pretty).
    pub const DEV: Self = Self {
        doctype: true,
        pretty: true,
    };

    /// Production config (doctype, minified).
    pub const PROD: Self = Self {
        doctype: true,
        pretty: false,
    };

    /// Create a new config.
    pub fn new(doctype: bool, pretty: bool) -> Self {
        Self { doctype, pretty }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::PROD
    }
}

// =============================================================================
// Document Rendering
// =============================================================================

/// Render a document to HTML string.
pub fn render_document(doc: &Document, config: &RenderConfig) -> String {
    let mut output = String::new();
    if config.doctype {
        output.push_str("<!DOCTYPE html>");
        if config.pretty {
            output.push('\n');
        }
    }
    for child in doc.node().children() {
        render_into(&child, config, 0, &mut output);
    }
    output
}

/// Render a single node (and its subtree) to HTML.
pub fn render_node(node: &Node, config: &RenderConfig) -> String {
    let mut output = String::new();
    match node.data() {
        NodeData::Document(_) => {
            for child in node.children() {
                render_into(&child, config, 0, &mut output);
            }
        }
        _ => render_into(node, config, 0, &mut output),
    }
    output
}

fn render_into(node: &Node, config: &RenderConfig, depth: usize, output: &mut String) {
    match node.data() {
        NodeData::Element(elem) => render_element(node, elem, config, depth, output),
        NodeData::Text(text) => {
            let raw = node
                .parent()
                .and_then(|p| p.as_element().map(ElementData::is_raw_text))
                .unwrap_or(false);
            text.with(|s| {
                if raw {
                    // Raw text (script/style): output as-is without escaping
                    output.push_str(s);
                } else {
                    output.push_str(&escape_html(s));
                }
            });
        }
        NodeData::Document(_) => {}
    }
}

/// Render an element to HTML.
fn render_element(
    node: &Node,
    elem: &ElementData,
    config: &RenderConfig,
    depth: usize,
    output: &mut String,
) {
    output.push('<');
    output.push_str(elem.tag());
    render_attrs(&elem.attrs(), output);

    // Void elements
    if elem.is_void() {
        output.push_str(" />");
        return;
    }

    output.push('>');

    let children = node.children();
    let block = config.pretty && !children.is_empty() && children.iter().all(Node::is_element);
    for child in &children {
        if block {
            push_newline(depth + 1, output);
        }
        render_into(child, config, depth + 1, output);
    }
    if block {
        push_newline(depth, output);
    }

    output.push_str("</");
    output.push_str(elem.tag());
    output.push('>');
}

fn push_newline(depth: usize, output: &mut String) {
    output.push('\n');
    for _ in 0..depth {
        output.push_str(INDENT);
    }
}

/// Render attributes to HTML.
fn render_attrs(attrs: &Attrs, output: &mut String) {
    for (name, value) in attrs.iter() {
        output.push(' ');
        output.push_str(name);
        if value.is_empty() {
            continue;
        }
        output.push_str("=\"");
        output.push_str(&escape_attr(value));
        output.push('"');
    }
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute value special characters.
fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Document {
        Document::with_body(
            Node::element("body")
                .child(Node::element("p").with_class("lead").with_text("这个 & 那个"))
                .child(Node::element("script").with_text("if (a < b) {}"))
                .child(Node::element("img").with_attr("alt", "\"图\"")),
        )
    }

    #[test]
    fn test_render_minified() {
        let html = render_document(&page(), &RenderConfig::PROD);
        assert_eq!(
            html,
            "<!DOCTYPE html><html><head></head><body>\
             <p class=\"lead\">这个 &amp; 那个</p>\
             <script>if (a < b) {}</script>\
             <img alt=\"&quot;图&quot;\" /></body></html>"
        );
    }

    #[test]
    fn test_render_pretty() {
        let doc = Document::with_body(
            Node::element("body").child(Node::element("ul").child(Node::element("li").with_text("一"))),
        );
        let html = render_document(&doc, &RenderConfig::DEV);
        assert_eq!(
            html,
            "<!DOCTYPE html>\n<html>\n  <head></head>\n  <body>\n    <ul>\n      <li>一</li>\n    </ul>\n  </body>\n</html>"
        );
    }

    #[test]
    fn test_pretty_keeps_mixed_content_inline() {
        let p = Node::element("p")
            .with_text("前")
            .child(Node::element("em").with_text("中"))
            .with_text("后");
        let config = RenderConfig::new(false, true);
        assert_eq!(render_node(&p, &config), "<p>前<em>中</em>后</p>");
    }

    #[test]
    fn test_boolean_attribute() {
        let button = Node::element("button").with_attr("disabled", "").with_id("b");
        assert_eq!(
            render_node(&button, &RenderConfig::default()),
            "<button disabled id=\"b\"></button>"
        );
    }

    #[test]
    fn test_render_reflects_live_text() {
        let doc = page();
        let p = doc.query_selector(&crate::selector::Selector::tag("p")).unwrap();
        p.set_text_content("這個");
        let html = render_node(doc.body().as_ref().unwrap(), &RenderConfig::PROD);
        assert!(html.starts_with("<body><p class=\"lead\">這個</p>"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
    }
}
