//! Knobs for classification, styling and fetching.
//!
//! Every export call receives its own copy of [`ExportOptions`]; nothing here is
//! shared mutable state. `webdocx-config` deserializes the same knobs from TOML and
//! converts them into these types.

use std::time::Duration;

/// Rules applied while flattening the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Class marker that turns a subtree into a single text block
    pub atomic_group_class: String,
    /// Images wider than this are exported at `forced_image_size`
    pub image_max_width: u32,
    pub forced_image_size: (u32, u32),
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            atomic_group_class: "span-arr".to_string(),
            image_max_width: 900,
            forced_image_size: (700, 350),
        }
    }
}

impl ClassifyOptions {
    /// Export size for an image with the given natural size.
    ///
    /// Aspect ratio is deliberately not preserved when the forced size applies.
    pub fn image_size(&self, width: u32, height: u32) -> (u32, u32) {
        if width > self.image_max_width {
            self.forced_image_size
        } else {
            (width, height)
        }
    }
}

/// Paragraph and table formatting applied during assembly.
///
/// Sizes are in half-points, spacing and indents in twentieths of a point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRules {
    /// `id` value that marks the document heading
    pub heading_id: String,
    /// Class marker for subheadings
    pub subheading_class: String,
    pub heading_font_size: usize,
    pub subheading_font_size: usize,
    pub spacing_after: u32,
    pub first_line_indent: i32,
    pub table_width_percent: u32,
}

impl Default for StyleRules {
    fn default() -> Self {
        Self {
            heading_id: "head-line".to_string(),
            subheading_class: "sub-title".to_string(),
            heading_font_size: 36,
            subheading_font_size: 24,
            spacing_after: 200,
            first_line_indent: 500,
            table_width_percent: 100,
        }
    }
}

/// Timeout and retry policy for image fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Bound on a single attempt
    pub timeout: Duration,
    /// Extra attempts after the first failure
    pub retries: u32,
    /// Delay before the first retry; doubles on each subsequent one
    pub backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retries: 2,
            backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
        }
    }
}

/// Everything one export call needs to know.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub classify: ClassifyOptions,
    pub style: StyleRules,
    pub fetch: FetchPolicy,
}
