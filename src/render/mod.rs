//! Dialect renderers.
//!
//! The builder reduces every operation to an [`Instruction`]; each dialect
//! module turns an instruction into the exact text fragment for that markup.
//! Renderers are total: features a dialect cannot express degrade to a valid
//! fallback instead of failing.
//!
//! # Example
//!
//! ```
//! use markupdoc::render::{render_instruction, Instruction, TextStyle};
//! use markupdoc::MarkupLanguage;
//!
//! let bold = Instruction::Text { text: "Warning", style: TextStyle::Bold };
//! assert_eq!(render_instruction(MarkupLanguage::AsciiDoc, &bold), "*Warning*");
//! assert_eq!(render_instruction(MarkupLanguage::Markdown, &bold), "**Warning**");
//! ```

mod asciidoc;
mod confluence;
mod markdown;
pub mod table;

use crate::language::MarkupLanguage;
use crate::model::{HeadingLevel, TableColumn};

pub use table::{escape_cell, escape_list_item, single_line};

/// Emphasis applied to inline text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextStyle {
    #[default]
    Plain,
    Bold,
    Italic,
}

/// A structural instruction with already-validated parameters.
///
/// Anchors are final tokens, table rows are escaped and rectangular.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction<'a> {
    /// Document or section title, optionally carrying an anchor
    Heading {
        level: HeadingLevel,
        title: &'a str,
        anchor: Option<&'a str>,
    },
    /// Inline text
    Text { text: &'a str, style: TextStyle },
    /// Line terminator, optionally preceded by a hard break marker
    LineEnd { hard_break: bool },
    /// Multi-line text whose line breaks are all hard breaks
    Paragraph { text: &'a str },
    /// Verbatim block, with an optional syntax-highlighting language
    Listing {
        text: &'a str,
        language: Option<&'a str>,
    },
    /// One unordered list item at a nesting depth (1 = top level)
    ListItem { depth: usize, text: &'a str },
    /// Table; `columns` is `None` for a headerless table
    Table {
        columns: Option<&'a [TableColumn]>,
        rows: &'a [Vec<String>],
    },
    /// Inline anchor with optional display text
    Anchor {
        anchor: &'a str,
        text: Option<&'a str>,
    },
    /// Link to an anchor, in this document when `document` is `None`
    CrossReference {
        document: Option<&'a str>,
        anchor: &'a str,
        text: Option<&'a str>,
    },
}

/// Render one instruction in the given dialect.
///
/// Headerless tables in a dialect without them get a row of blank headers.
pub fn render_instruction(language: MarkupLanguage, instruction: &Instruction<'_>) -> String {
    if let Instruction::Table {
        columns: None,
        rows,
    } = *instruction
    {
        if !language.supports_headerless_tables() {
            let blank = table::blank_columns(rows);
            return render_instruction(
                language,
                &Instruction::Table {
                    columns: Some(blank.as_slice()),
                    rows,
                },
            );
        }
    }

    match language {
        MarkupLanguage::AsciiDoc => asciidoc::render(instruction),
        MarkupLanguage::Markdown => markdown::render(instruction),
        MarkupLanguage::Confluence => confluence::render(instruction),
    }
}

/// Whether a cross-reference without text renders poorly in this dialect.
///
/// AsciiDoc resolves the anchor's own title; the other dialects would show
/// the bare token.
pub fn needs_link_text(language: MarkupLanguage) -> bool {
    !matches!(language, MarkupLanguage::AsciiDoc)
}

/// Choose a fence at least `min` characters long that no line of `text`
/// starts with.
pub(crate) fn fence(text: &str, ch: char, min: usize) -> String {
    let longest = text
        .lines()
        .map(|line| line.trim_start().chars().take_while(|&c| c == ch).count())
        .max()
        .unwrap_or(0);
    ch.to_string().repeat(min.max(longest + 1))
}

/// Strip one trailing line terminator from block content.
pub(crate) fn block_body(text: &str) -> &str {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.strip_suffix('\r').unwrap_or(text)
}
