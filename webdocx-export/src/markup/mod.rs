//! The markup environment seen by the classifier
//!
//!     The classifier never touches a concrete DOM. It reads nodes through [`MarkupNode`],
//!     which exposes only what a rendering environment can answer about an element: its
//!     tag, attributes, rendered text, element children, rendered size and image source.
//!
//!     [`dom`] provides the implementation over an `html5ever` parse tree. Anything else
//!     that can answer those questions (a live browser bridge, a test fixture) can be
//!     classified the same way.

pub mod dom;

pub use dom::{DomNode, HtmlDocument};

/// Read-only view of one element in a markup tree.
pub trait MarkupNode: Sized {
    /// Upper-cased tag name (`"TABLE"`, `"IMG"`, ...)
    fn tag_name(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    /// Rendered text of the element and all its descendants
    fn rendered_text(&self) -> String;

    /// Element children in document order (text and comment nodes excluded)
    fn children(&self) -> Vec<Self>;

    fn is_tag(&self, tag: &str) -> bool {
        self.tag_name().eq_ignore_ascii_case(tag)
    }

    fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    /// Raw `class` attribute, empty when absent
    fn class_list(&self) -> String {
        self.attribute("class").unwrap_or_default()
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_list().split_whitespace().any(|c| c == class)
    }

    /// Rendered width and height in pixels; 0 where the environment cannot tell.
    fn natural_size(&self) -> (u32, u32) {
        let width = self.attribute("width").and_then(|v| parse_dimension(&v));
        let height = self.attribute("height").and_then(|v| parse_dimension(&v));
        (width.unwrap_or(0), height.unwrap_or(0))
    }

    /// Image source reference (URL, path or data URI)
    fn source(&self) -> Option<String> {
        self.attribute("src")
    }
}

/// Parse a pixel dimension such as `"640"`, `"640px"` or `"640.4"`.
pub fn parse_dimension(raw: &str) -> Option<u32> {
    let value = raw.trim();
    let value = value.strip_suffix("px").unwrap_or(value).trim();
    let parsed: f64 = value.parse().ok()?;
    if parsed.is_finite() && parsed >= 0.0 {
        Some(parsed.round() as u32)
    } else {
        None
    }
}
