//! Export a rendered HTML view as an editable word processing document
//!
//!     This crate takes an HTML page, finds the container the user wants exported, and writes
//!     it out as a DOCX file with headings, paragraphs, tables and images.
//!
//!     This is a pure lib, it powers webdocx-cli but is shell agnostic: no printing, no env
//!     vars, no assumptions about where output goes beyond the Saver it is given.
//!
//! Architecture
//!
//!     Data flows one way, with no feedback between stages:
//!
//!         markup tree → block descriptors → content model → encoded bytes → saved file
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── options.rs              # Classification, style and fetch knobs
//!     ├── markup                  # The tree we read from
//!     │   ├── mod.rs              # MarkupNode trait
//!     │   └── dom.rs              # html5ever backed implementation
//!     ├── blocks.rs               # Classified block descriptors
//!     ├── classify.rs             # Tree → blocks
//!     ├── model.rs                # Style-resolved content model
//!     ├── assemble.rs             # Blocks → model (async image fetch)
//!     ├── fetch                   # Data URI, file and HTTP fetchers, retry policy
//!     ├── encode                  # DocumentEncoder trait, grid layout, DOCX encoder
//!     ├── save.rs                 # Saver trait and directory saver
//!     └── export.rs               # Exporter, the entry point
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── common
//!     └── <area>
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so these are
//!     mounted from tests/lib.rs.
//!
//! Core Algorithms
//!
//!     The structural work happens in two places. The classifier (./classify.rs) flattens an
//!     arbitrary subtree into blocks with a small rule set, collapsing tables and marked
//!     groups. The assembler (./assemble.rs) fetches all images concurrently, joins them back
//!     by position, and then builds the model in one synchronous pass. Everything after that
//!     is mechanical: the encoder only maps resolved elements onto docx-rs builders, apart
//!     from the row span grid (./encode/grid.rs).
//!
//! Library Choices
//!
//!     We never parse HTML or write OOXML ourselves. html5ever gives us the tree a browser
//!     would build, docx-rs writes the package, image decodes and transcodes pictures.

pub mod assemble;
pub mod blocks;
pub mod classify;
pub mod encode;
pub mod error;
pub mod export;
pub mod fetch;
pub mod markup;
pub mod model;
pub mod options;
pub mod save;

pub use blocks::BlockDescriptor;
pub use encode::{DocumentEncoder, DocxEncoder};
pub use error::{ExportError, FetchError, Result};
pub use export::{classify_html, ExportHandle, ExportReport, Exporter};
pub use fetch::{ResourceFetcher, SourceFetcher};
pub use model::ContentModel;
pub use options::{ClassifyOptions, ExportOptions, FetchPolicy, StyleRules};
pub use save::{DirectorySaver, Saver};

pub use tokio_util::sync::CancellationToken;
