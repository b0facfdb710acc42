//! [`MarkupNode`] over an `html5ever` parse tree
//!
//! We use the `html5ever` + `markup5ever_rcdom` pair for parsing: the parser is the
//! browser-grade WHATWG implementation from Servo, so the tree we classify has the same
//! shape a browser would build (implicit `<tbody>`, repaired nesting, and so on).

use super::MarkupNode;
use crate::error::{ExportError, Result};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Elements whose text never renders
const HIDDEN_TAGS: &[&str] = &["script", "style", "template", "noscript", "head"];

/// Elements rendered as their own box, so their text sits on separate lines
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "caption", "dd", "details", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table", "tr",
    "ul",
];

/// A parsed HTML document.
pub struct HtmlDocument {
    dom: RcDom,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Result<Self> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut source.as_bytes())
            .map_err(|e| ExportError::MalformedTree(format!("HTML parsing failed: {e}")))?;
        Ok(Self { dom })
    }

    /// First element, in document order, whose class list contains `class`.
    pub fn find_by_class(&self, class: &str) -> Option<DomNode> {
        find_first(&self.dom.document, &|node: &DomNode| node.has_class(class))
    }

    /// Like [`find_by_class`](Self::find_by_class) but missing containers are an error.
    pub fn container(&self, class: &str) -> Result<DomNode> {
        self.find_by_class(class)
            .ok_or_else(|| ExportError::ContainerNotFound(class.to_string()))
    }
}

fn find_first(handle: &Handle, predicate: &dyn Fn(&DomNode) -> bool) -> Option<DomNode> {
    for child in handle.children.borrow().iter() {
        if let NodeData::Element { .. } = child.data {
            let node = DomNode(child.clone());
            if predicate(&node) {
                return Some(node);
            }
        }
        if let Some(found) = find_first(child, predicate) {
            return Some(found);
        }
    }
    None
}

/// An element handle in a parsed document.
#[derive(Clone)]
pub struct DomNode(Handle);

impl DomNode {
    fn local_name(&self) -> Option<String> {
        match &self.0.data {
            NodeData::Element { name, .. } => Some(name.local.to_string()),
            _ => None,
        }
    }
}

impl std::fmt::Debug for DomNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomNode")
            .field("tag", &self.tag_name())
            .field("id", &self.id())
            .field("class", &self.class_list())
            .finish()
    }
}

impl MarkupNode for DomNode {
    fn tag_name(&self) -> String {
        self.local_name()
            .map(|name| name.to_ascii_uppercase())
            .unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match &self.0.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|attr| attr.name.local.as_ref() == name)
                .map(|attr| attr.value.to_string()),
            _ => None,
        }
    }

    fn rendered_text(&self) -> String {
        let mut lines = vec![String::new()];
        collect_text(&self.0, &mut lines);
        normalize_lines(&lines)
    }

    fn children(&self) -> Vec<Self> {
        self.0
            .children
            .borrow()
            .iter()
            .filter(|child| matches!(child.data, NodeData::Element { .. }))
            .map(|child| DomNode(child.clone()))
            .collect()
    }
}

/// Gather text into lines; only `<br>` starts a new line.
fn collect_text(handle: &Handle, lines: &mut Vec<String>) {
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => {
                if let Some(line) = lines.last_mut() {
                    line.push_str(&contents.borrow());
                }
            }
            NodeData::Element { name, .. } => {
                let tag = name.local.as_ref();
                if tag == "br" {
                    lines.push(String::new());
                } else if BLOCK_TAGS.contains(&tag) {
                    lines.push(String::new());
                    collect_text(child, lines);
                    lines.push(String::new());
                } else if !HIDDEN_TAGS.contains(&tag) {
                    collect_text(child, lines);
                }
            }
            _ => {}
        }
    }
}

/// Collapse whitespace the way rendering does: runs become one space, blank lines vanish.
fn normalize_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
