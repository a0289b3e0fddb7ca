//! # markupdoc
//!
//! Fluent builder for AsciiDoc, Markdown, and Confluence wiki markup.
//!
//! Callers describe a document with semantic operations (titles, text,
//! paragraphs, listings, lists, tables, anchors, cross-references) and the
//! builder renders the markup of the dialect it was created for.
//!
//! ## Quick Start
//!
//! ```
//! use markupdoc::MarkupLanguage;
//!
//! let mut doc = MarkupLanguage::AsciiDoc.builder();
//! doc.document_title("Petstore")?
//!     .section_title_level1("Paths")?
//!     .paragraph("Every operation of the API.")
//!     .table([["GET", "/pets"], ["POST", "/pets"]])?;
//!
//! assert!(doc.render().starts_with("= Petstore\n\n[[_paths]]\n== Paths\n"));
//! # Ok::<(), markupdoc::Error>(())
//! ```
//!
//! ## Writing Files
//!
//! ```no_run
//! use markupdoc::{encoding_rs::UTF_8, MarkupLanguage};
//!
//! let mut doc = MarkupLanguage::Markdown.builder();
//! doc.section_title_level1("Definitions")?;
//!
//! // Writes out/definitions.md and resets the builder
//! let path = doc.write_to_file("out", "definitions", UTF_8)?;
//! # Ok::<(), markupdoc::Error>(())
//! ```
//!
//! ## Scripts
//!
//! A [`Script`] replays a JSON list of operations, so the same description
//! can be rendered in every dialect:
//!
//! ```
//! use markupdoc::{render_script, MarkupLanguage};
//!
//! let json = r#"{"operations": [{"op": "bold_text_line", "text": "Note"}]}"#;
//! assert_eq!(render_script(json, MarkupLanguage::Markdown)?, "**Note**\n");
//! # Ok::<(), markupdoc::Error>(())
//! ```

pub mod anchor;
pub mod builder;
pub mod error;
pub mod language;
pub mod model;
pub mod options;
pub mod render;
pub mod script;
pub mod storage;

// Re-exports
pub use anchor::{normalize_anchor, AnchorRegistry, ANCHOR_SEPARATOR};
pub use builder::MarkupDocBuilder;
pub use error::{Error, Result};
pub use language::MarkupLanguage;
pub use model::{ColumnAlignment, HeadingLevel, SectionState, TableColumn, TableSpec};
pub use options::BuilderOptions;
pub use script::{Operation, Script};
pub use storage::{DocumentSink, FileSink, MemorySink};

pub use encoding_rs;

/// Create an empty builder for a dialect.
pub fn builder(language: MarkupLanguage) -> MarkupDocBuilder {
    MarkupDocBuilder::new(language)
}

/// Render a JSON operation script in a dialect.
///
/// # Example
///
/// ```
/// use markupdoc::{render_script, MarkupLanguage};
///
/// let json = r#"{"operations": [{"op": "document_title", "title": "API"}]}"#;
/// assert_eq!(render_script(json, MarkupLanguage::Confluence)?, "h1. API\n");
/// # Ok::<(), markupdoc::Error>(())
/// ```
pub fn render_script(json: &str, language: MarkupLanguage) -> Result<String> {
    Script::from_json(json)?.render(language)
}
