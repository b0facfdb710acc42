//! Shared configuration loader for webdocx.
//!
//! `defaults/webdocx.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`WebdocxConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use webdocx_export::{ClassifyOptions, ExportOptions, FetchPolicy, StyleRules};

const DEFAULT_TOML: &str = include_str!("../defaults/webdocx.default.toml");

/// Top-level configuration consumed by webdocx applications.
#[derive(Debug, Clone, Deserialize)]
pub struct WebdocxConfig {
    pub classify: ClassifyConfig,
    pub style: StyleConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
}

impl WebdocxConfig {
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            classify: (&self.classify).into(),
            style: (&self.style).into(),
            fetch: (&self.fetch).into(),
        }
    }

    /// The configured base URL, if any.
    pub fn base_url(&self) -> Option<&str> {
        let url = self.fetch.base_url.trim();
        (!url.is_empty()).then_some(url)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyConfig {
    pub atomic_group_class: String,
    pub image_max_width: u32,
    pub forced_image_width: u32,
    pub forced_image_height: u32,
}

impl From<&ClassifyConfig> for ClassifyOptions {
    fn from(config: &ClassifyConfig) -> Self {
        ClassifyOptions {
            atomic_group_class: config.atomic_group_class.clone(),
            image_max_width: config.image_max_width,
            forced_image_size: (config.forced_image_width, config.forced_image_height),
        }
    }
}

/// Mirrors [`StyleRules`].
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    pub heading_id: String,
    pub subheading_class: String,
    pub heading_font_size: usize,
    pub subheading_font_size: usize,
    pub spacing_after: u32,
    pub first_line_indent: i32,
    pub table_width_percent: u32,
}

impl From<&StyleConfig> for StyleRules {
    fn from(config: &StyleConfig) -> Self {
        StyleRules {
            heading_id: config.heading_id.clone(),
            subheading_class: config.subheading_class.clone(),
            heading_font_size: config.heading_font_size,
            subheading_font_size: config.subheading_font_size,
            spacing_after: config.spacing_after,
            first_line_indent: config.first_line_indent,
            table_width_percent: config.table_width_percent,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub base_url: String,
}

impl From<&FetchConfig> for FetchPolicy {
    fn from(config: &FetchConfig) -> Self {
        FetchPolicy {
            timeout: Duration::from_millis(config.timeout_ms),
            retries: config.retries,
            backoff: Duration::from_millis(config.backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms.max(config.backoff_ms)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<WebdocxConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<WebdocxConfig, ConfigError> {
    Loader::new().build()
}
