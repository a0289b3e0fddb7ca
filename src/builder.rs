//! The fluent document builder.
//!
//! [`MarkupDocBuilder`] accumulates a document for one dialect. Operations
//! validate their input eagerly, reduce it to a render [`Instruction`] and
//! append the resulting fragment, keeping the blank-line discipline of the
//! target markup in [`SectionState`].
//!
//! ```
//! use markupdoc::MarkupLanguage;
//!
//! let mut doc = MarkupLanguage::Markdown.builder();
//! doc.document_title("Petstore")?
//!     .section_title_level1("API Overview")?
//!     .text("See ")
//!     .cross_reference_local("API Overview", None)?;
//!
//! assert_eq!(
//!     doc.render(),
//!     "# Petstore\n\n<a name=\"_api_overview\"></a>\n## API Overview\n\nSee [API Overview](#_api_overview)"
//! );
//! # Ok::<(), markupdoc::Error>(())
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;

use crate::anchor::{normalize_anchor, AnchorRegistry};
use crate::error::{Error, Result};
use crate::language::MarkupLanguage;
use crate::model::{Document, HeadingLevel, SectionState, TableColumn, TableSpec};
use crate::options::{normalize_prefix, BuilderOptions};
use crate::render::{
    escape_list_item, needs_link_text, render_instruction, single_line, table, Instruction,
    TextStyle,
};
use crate::storage::{DocumentSink, FileSink};

impl MarkupLanguage {
    /// Create an empty builder for this dialect.
    pub fn builder(self) -> MarkupDocBuilder {
        MarkupDocBuilder::new(self)
    }
}

/// Accumulates a markup document through chainable operations.
#[derive(Debug, Clone, Default)]
pub struct MarkupDocBuilder {
    options: BuilderOptions,
    anchor_prefix: Option<String>,
    document: Document,
    anchors: AnchorRegistry,
    state: SectionState,
}

impl MarkupDocBuilder {
    /// Create an empty builder for a dialect.
    pub fn new(language: MarkupLanguage) -> Self {
        Self::with_options(BuilderOptions::new(language))
    }

    /// Create an empty builder from options.
    pub fn with_options(options: BuilderOptions) -> Self {
        let anchor_prefix = normalize_prefix(options.anchor_prefix.clone());
        Self {
            options,
            anchor_prefix,
            ..Default::default()
        }
    }

    // ------------------------------------------------------------------
    // Titles
    // ------------------------------------------------------------------

    /// Emit the document title (level 0). Document titles carry no anchor.
    pub fn document_title(&mut self, title: &str) -> Result<&mut Self> {
        let title = heading_text(title)?;
        self.heading(HeadingLevel::Title, &title, None)
    }

    /// Emit a section title at `level` (1-4) with an anchor generated from
    /// the title.
    pub fn section_title_level(&mut self, level: u8, title: &str) -> Result<&mut Self> {
        self.section_title_with_anchor_level(level, title, None)
    }

    pub fn section_title_level1(&mut self, title: &str) -> Result<&mut Self> {
        self.section_title_level(1, title)
    }

    pub fn section_title_level2(&mut self, title: &str) -> Result<&mut Self> {
        self.section_title_level(2, title)
    }

    pub fn section_title_level3(&mut self, title: &str) -> Result<&mut Self> {
        self.section_title_level(3, title)
    }

    pub fn section_title_level4(&mut self, title: &str) -> Result<&mut Self> {
        self.section_title_level(4, title)
    }

    /// Emit a section title at `level` (1-4) with an explicit anchor.
    ///
    /// The anchor (or the title when `anchor` is `None`) is normalized with
    /// the current prefix and registered; a colliding token gets a numeric
    /// suffix. The registered token is available from
    /// [`last_anchor`](Self::last_anchor).
    pub fn section_title_with_anchor_level(
        &mut self,
        level: u8,
        title: &str,
        anchor: Option<&str>,
    ) -> Result<&mut Self> {
        let level = HeadingLevel::from_number(level)
            .filter(|l| *l != HeadingLevel::Title)
            .ok_or_else(|| {
                Error::InvalidInput(format!("section level must be 1-4, got {level}"))
            })?;
        let title = heading_text(title)?;

        let source = anchor
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(title.as_str());
        let token = normalize_anchor(source, self.anchor_prefix.as_deref())?;
        let token = self.anchors.register(&token, title.as_str());

        self.heading(level, &title, Some(&token))
    }

    pub fn section_title_with_anchor_level1(
        &mut self,
        title: &str,
        anchor: Option<&str>,
    ) -> Result<&mut Self> {
        self.section_title_with_anchor_level(1, title, anchor)
    }

    pub fn section_title_with_anchor_level2(
        &mut self,
        title: &str,
        anchor: Option<&str>,
    ) -> Result<&mut Self> {
        self.section_title_with_anchor_level(2, title, anchor)
    }

    pub fn section_title_with_anchor_level3(
        &mut self,
        title: &str,
        anchor: Option<&str>,
    ) -> Result<&mut Self> {
        self.section_title_with_anchor_level(3, title, anchor)
    }

    pub fn section_title_with_anchor_level4(
        &mut self,
        title: &str,
        anchor: Option<&str>,
    ) -> Result<&mut Self> {
        self.section_title_with_anchor_level(4, title, anchor)
    }

    fn heading(
        &mut self,
        level: HeadingLevel,
        title: &str,
        anchor: Option<&str>,
    ) -> Result<&mut Self> {
        if let Some(previous) = self.state.depth {
            if level.level() > previous.level() + 1 {
                tracing::debug!(
                    from = previous.level(),
                    to = level.level(),
                    title,
                    "heading level skipped"
                );
            }
        }

        self.begin_block();
        self.emit(Instruction::Heading {
            level,
            title,
            anchor,
        });
        self.state.depth = Some(level);
        self.end_block();
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Inline text
    // ------------------------------------------------------------------

    /// Append plain text to the current line.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.styled(text, TextStyle::Plain)
    }

    pub fn bold_text(&mut self, text: &str) -> &mut Self {
        self.styled(text, TextStyle::Bold)
    }

    pub fn italic_text(&mut self, text: &str) -> &mut Self {
        self.styled(text, TextStyle::Italic)
    }

    /// Append text and end the line.
    pub fn text_line(&mut self, text: &str) -> &mut Self {
        self.text_line_with_break(text, false)
    }

    /// Append text and end the line, with a hard break marker when
    /// `force_line_break` is set.
    pub fn text_line_with_break(&mut self, text: &str, force_line_break: bool) -> &mut Self {
        self.text(text).new_line_with_break(force_line_break)
    }

    pub fn bold_text_line(&mut self, text: &str) -> &mut Self {
        self.bold_text_line_with_break(text, false)
    }

    pub fn bold_text_line_with_break(&mut self, text: &str, force_line_break: bool) -> &mut Self {
        self.bold_text(text).new_line_with_break(force_line_break)
    }

    pub fn italic_text_line(&mut self, text: &str) -> &mut Self {
        self.italic_text_line_with_break(text, false)
    }

    pub fn italic_text_line_with_break(
        &mut self,
        text: &str,
        force_line_break: bool,
    ) -> &mut Self {
        self.italic_text(text).new_line_with_break(force_line_break)
    }

    /// End the current line.
    pub fn new_line(&mut self) -> &mut Self {
        self.new_line_with_break(false)
    }

    /// End the current line, with a hard break marker when
    /// `force_line_break` is set.
    pub fn new_line_with_break(&mut self, force_line_break: bool) -> &mut Self {
        self.state.pending_break = false;
        self.state.in_list = false;
        self.emit(Instruction::LineEnd {
            hard_break: force_line_break,
        });
        self
    }

    fn styled(&mut self, text: &str, style: TextStyle) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        self.begin_inline();
        self.emit(Instruction::Text { text, style });
        self
    }

    // ------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------

    /// Emit a paragraph whose line breaks are all hard breaks.
    pub fn paragraph(&mut self, text: &str) -> &mut Self {
        let text = block_text(text);
        if text.trim().is_empty() {
            return self;
        }
        self.block(Instruction::Paragraph { text: &text })
    }

    /// Emit a verbatim literal block.
    pub fn listing(&mut self, text: &str) -> &mut Self {
        let text = block_text(text);
        if text.is_empty() {
            return self;
        }
        self.block(Instruction::Listing {
            text: &text,
            language: None,
        })
    }

    /// Emit a source block with a syntax-highlighting hint. A blank language
    /// is the same as [`listing`](Self::listing).
    pub fn source(&mut self, text: &str, language: &str) -> &mut Self {
        let language = language.trim();
        if language.is_empty() {
            return self.listing(text);
        }
        let text = block_text(text);
        if text.is_empty() {
            return self;
        }
        self.block(Instruction::Listing {
            text: &text,
            language: Some(language),
        })
    }

    // ------------------------------------------------------------------
    // Lists
    // ------------------------------------------------------------------

    /// Emit a complete top-level list.
    pub fn unordered_list<I, S>(&mut self, items: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = items
            .into_iter()
            .map(|item| self.list_item_text(item.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        if items.is_empty() {
            return Ok(self);
        }

        self.begin_block();
        for item in &items {
            self.emit(Instruction::ListItem {
                depth: 1,
                text: item,
            });
        }
        self.end_block();
        Ok(self)
    }

    /// Emit one list item at the current implicit depth.
    pub fn unordered_list_item(&mut self, item: &str) -> Result<&mut Self> {
        self.unordered_list_item_level(self.state.list_depth, item)
    }

    /// Emit one list item at an explicit depth (1 = top level).
    pub fn unordered_list_item_level(&mut self, level: usize, item: &str) -> Result<&mut Self> {
        if level == 0 {
            return Err(Error::InvalidInput("list level must be at least 1".to_string()));
        }
        let text = self.list_item_text(item)?;

        if self.state.in_list {
            self.end_open_line();
        } else {
            self.begin_block();
        }
        self.emit(Instruction::ListItem { depth: level, text: &text });
        self.state.in_list = true;
        self.state.pending_break = true;
        Ok(self)
    }

    /// Nest subsequent [`unordered_list_item`](Self::unordered_list_item)
    /// calls one level deeper.
    pub fn indent_list(&mut self) -> &mut Self {
        self.state.list_depth += 1;
        self
    }

    /// Undo one [`indent_list`](Self::indent_list). Stops at the top level.
    pub fn outdent_list(&mut self) -> &mut Self {
        self.state.list_depth = self.state.list_depth.saturating_sub(1).max(1);
        self
    }

    fn list_item_text(&self, item: &str) -> Result<String> {
        if item.trim().is_empty() {
            return Err(Error::InvalidInput("list item is blank".to_string()));
        }
        Ok(escape_list_item(self.language(), item))
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    /// Emit a table without column specifiers.
    ///
    /// Rows may be ragged; short rows are padded with empty cells. Markdown
    /// has no headerless tables and gets a blank header row.
    pub fn table<I, R, S>(&mut self, rows: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.table_with_column_specs(None, rows)
    }

    /// Emit a table, with a header row when `columns` is given.
    ///
    /// With column specifiers every row must have one cell per column,
    /// otherwise [`Error::TableShape`] is returned and nothing is emitted.
    pub fn table_with_column_specs<I, R, S>(
        &mut self,
        columns: Option<&[TableColumn]>,
        rows: I,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(|cell| cell.as_ref().to_string()).collect())
            .collect();
        self.emit_table(columns, &rows)
    }

    /// Emit a [`TableSpec`].
    pub fn table_spec(&mut self, spec: &TableSpec) -> Result<&mut Self> {
        self.emit_table(spec.columns.as_deref(), &spec.rows)
    }

    /// Emit a table from pipe-separated rows, the first being the header.
    pub fn table_with_header_row<S: AsRef<str>>(&mut self, rows: &[S]) -> Result<&mut Self> {
        let spec = TableSpec::from_psv(rows)?;
        self.table_spec(&spec)
    }

    fn emit_table(
        &mut self,
        columns: Option<&[TableColumn]>,
        rows: &[Vec<String>],
    ) -> Result<&mut Self> {
        let prepared = table::prepare(self.language(), columns, rows)?;
        let width = prepared
            .columns
            .as_ref()
            .map_or_else(|| prepared.rows.first().map_or(0, Vec::len), Vec::len);
        if width == 0 {
            return Ok(self);
        }

        Ok(self.block(Instruction::Table {
            columns: prepared.columns.as_deref(),
            rows: &prepared.rows,
        }))
    }

    // ------------------------------------------------------------------
    // Anchors and cross-references
    // ------------------------------------------------------------------

    /// Emit an inline anchor. The raw input is its display fallback.
    pub fn anchor(&mut self, anchor: &str) -> Result<&mut Self> {
        self.inline_anchor(anchor, None)
    }

    /// Emit an inline anchor with display text.
    ///
    /// AsciiDoc shows the text when a reference to the anchor has none; the
    /// other dialects cannot attach text to an anchor, so the builder
    /// substitutes it into local cross-references instead.
    pub fn anchor_with_text(&mut self, anchor: &str, text: &str) -> Result<&mut Self> {
        self.inline_anchor(anchor, Some(text))
    }

    fn inline_anchor(&mut self, anchor: &str, text: Option<&str>) -> Result<&mut Self> {
        let token = normalize_anchor(anchor, self.anchor_prefix.as_deref())?;
        let text = text.map(single_line).filter(|t| !t.is_empty());
        let display = text.clone().unwrap_or_else(|| anchor.trim().to_string());
        let token = self.anchors.register(&token, display);

        self.begin_inline();
        self.emit(Instruction::Anchor {
            anchor: &token,
            text: text.as_deref(),
        });
        Ok(self)
    }

    /// Emit a reference to an anchor, byte-for-byte.
    ///
    /// `document` names another document; `None` links within this one.
    pub fn cross_reference_raw(
        &mut self,
        document: Option<&str>,
        anchor: &str,
        text: Option<&str>,
    ) -> Result<&mut Self> {
        if anchor.trim().is_empty() {
            return Err(Error::InvalidAnchor(
                "cross-reference anchor is blank".to_string(),
            ));
        }
        let document = document.map(str::trim).filter(|d| !d.is_empty());
        let mut text = text.map(single_line).filter(|t| !t.is_empty());

        if text.is_none() && document.is_none() && needs_link_text(self.language()) {
            text = self.anchors.display_text(anchor).map(str::to_string);
        }

        self.begin_inline();
        self.emit(Instruction::CrossReference {
            document,
            anchor,
            text: text.as_deref(),
        });
        Ok(self)
    }

    /// Emit a raw reference to an anchor in this document.
    pub fn cross_reference_raw_local(
        &mut self,
        anchor: &str,
        text: Option<&str>,
    ) -> Result<&mut Self> {
        self.cross_reference_raw(None, anchor, text)
    }

    /// Emit a reference to an anchor, normalizing it with the current prefix.
    pub fn cross_reference(
        &mut self,
        document: Option<&str>,
        anchor: &str,
        text: Option<&str>,
    ) -> Result<&mut Self> {
        let token = normalize_anchor(anchor, self.anchor_prefix.as_deref())?;
        self.cross_reference_raw(document, &token, text)
    }

    /// Emit a normalized reference to an anchor in this document.
    pub fn cross_reference_local(&mut self, anchor: &str, text: Option<&str>) -> Result<&mut Self> {
        self.cross_reference(None, anchor, text)
    }

    // ------------------------------------------------------------------
    // Configuration and copies
    // ------------------------------------------------------------------

    /// Set the prefix for anchors generated or normalized from now on.
    /// Anchors already emitted keep their tokens.
    pub fn with_anchor_prefix(&mut self, prefix: Option<&str>) -> &mut Self {
        self.anchor_prefix = normalize_prefix(prefix.map(str::to_string));
        self
    }

    /// Current anchor prefix.
    pub fn anchor_prefix(&self) -> Option<&str> {
        self.anchor_prefix.as_deref()
    }

    /// Independent deep copy of the builder.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Empty builder for another dialect with the current anchor prefix.
    pub fn copy_as(&self, language: MarkupLanguage) -> Self {
        let mut options = self.options.clone().with_language(language);
        options.anchor_prefix = self.anchor_prefix.clone();
        Self::with_options(options)
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// The accumulated text. Does not clear the builder.
    pub fn render(&self) -> String {
        self.document.render()
    }

    /// Append the dialect file suffix to a file name.
    pub fn add_file_extension(&self, file_name: &str) -> String {
        format!("{file_name}.{}", self.language().extension())
    }

    /// Write the document to `dir/file_name.<suffix>` and reset the builder.
    pub fn write_to_file(
        &mut self,
        dir: impl AsRef<Path>,
        file_name: &str,
        encoding: &'static Encoding,
    ) -> Result<PathBuf> {
        let file_name = self.add_file_extension(file_name);
        self.write_to_file_without_extension(dir, &file_name, encoding)
    }

    /// Write the document to `dir/file_name` and reset the builder.
    pub fn write_to_file_without_extension(
        &mut self,
        dir: impl AsRef<Path>,
        file_name: &str,
        encoding: &'static Encoding,
    ) -> Result<PathBuf> {
        if file_name.trim().is_empty() {
            return Err(Error::InvalidInput("file name is blank".to_string()));
        }
        let path = dir.as_ref().join(file_name);
        self.write_to_sink(&mut FileSink, &path, encoding)?;
        Ok(path)
    }

    /// Hand the rendered document to `sink`, then reset the builder to its
    /// construction state. On failure the builder is left untouched.
    pub fn write_to_sink<S: DocumentSink + ?Sized>(
        &mut self,
        sink: &mut S,
        path: &Path,
        encoding: &'static Encoding,
    ) -> Result<&mut Self> {
        sink.write(path, &self.render(), encoding)?;
        self.reset();
        Ok(self)
    }

    fn reset(&mut self) {
        self.document.clear();
        self.anchors.clear();
        self.state = SectionState::default();
        self.anchor_prefix = normalize_prefix(self.options.anchor_prefix.clone());
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn language(&self) -> MarkupLanguage {
        self.options.language
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Anchors registered so far.
    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    /// Token of the most recently registered anchor.
    pub fn last_anchor(&self) -> Option<&str> {
        self.anchors.last()
    }

    pub fn section_state(&self) -> &SectionState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Check if nothing was emitted yet.
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    // ------------------------------------------------------------------
    // Fragment plumbing
    // ------------------------------------------------------------------

    fn emit(&mut self, instruction: Instruction<'_>) {
        let fragment = render_instruction(self.language(), &instruction);
        self.document.push(fragment);
    }

    fn end_open_line(&mut self) {
        if !self.document.at_line_start() {
            self.document.push("\n");
        }
    }

    /// Blocks start on a fresh line, separated from earlier content by one
    /// blank line.
    fn begin_block(&mut self) {
        self.end_open_line();
        if !self.document.at_blank_line() {
            self.document.push("\n");
        }
        self.state.in_list = false;
    }

    fn end_block(&mut self) {
        self.state.pending_break = true;
    }

    fn block(&mut self, instruction: Instruction<'_>) -> &mut Self {
        self.begin_block();
        self.emit(instruction);
        self.end_block();
        self
    }

    fn begin_inline(&mut self) {
        if self.state.pending_break {
            self.end_open_line();
            if !self.document.at_blank_line() {
                self.document.push("\n");
            }
            self.state.pending_break = false;
        }
        self.state.in_list = false;
    }
}

impl fmt::Display for MarkupDocBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in self.document.fragments() {
            f.write_str(fragment)?;
        }
        Ok(())
    }
}

/// Titles must stay on one line.
fn heading_text(title: &str) -> Result<String> {
    let title = single_line(title);
    if title.is_empty() {
        return Err(Error::InvalidInput("title is blank".to_string()));
    }
    Ok(title)
}

fn block_text(text: &str) -> String {
    text.replace("\r\n", "\n")
}
