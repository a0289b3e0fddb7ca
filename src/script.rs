//! Operation scripts.
//!
//! A [`Script`] is a serializable list of builder operations. Replaying it
//! on a builder is equivalent to issuing the same calls directly, which lets
//! one description of a document be rendered in every dialect.
//!
//! ```
//! use markupdoc::{MarkupLanguage, Script};
//!
//! let script = Script::from_json(r#"{
//!     "operations": [
//!         {"op": "section_title", "level": 1, "title": "Paths"},
//!         {"op": "unordered_list", "items": ["GET /pets", "POST /pets"]}
//!     ]
//! }"#)?;
//!
//! assert_eq!(
//!     script.render(MarkupLanguage::Confluence)?,
//!     "h2. {anchor:_paths}Paths\n\n* GET /pets\n* POST /pets\n"
//! );
//! # Ok::<(), markupdoc::Error>(())
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builder::MarkupDocBuilder;
use crate::error::Result;
use crate::language::MarkupLanguage;
use crate::model::{TableColumn, TableSpec};
use crate::options::BuilderOptions;

/// One builder operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    DocumentTitle {
        title: String,
    },
    /// Section title; the anchor defaults to one generated from the title
    SectionTitle {
        level: u8,
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anchor: Option<String>,
    },
    Text {
        text: String,
    },
    BoldText {
        text: String,
    },
    ItalicText {
        text: String,
    },
    TextLine {
        text: String,
        #[serde(default)]
        force_line_break: bool,
    },
    BoldTextLine {
        text: String,
        #[serde(default)]
        force_line_break: bool,
    },
    ItalicTextLine {
        text: String,
        #[serde(default)]
        force_line_break: bool,
    },
    NewLine {
        #[serde(default)]
        force_line_break: bool,
    },
    Paragraph {
        text: String,
    },
    Listing {
        text: String,
    },
    Source {
        text: String,
        language: String,
    },
    UnorderedList {
        items: Vec<String>,
    },
    /// Single item, at `level` or else the implicit depth
    UnorderedListItem {
        item: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<usize>,
    },
    IndentList,
    OutdentList,
    Table {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        columns: Option<Vec<TableColumn>>,
        rows: Vec<Vec<String>>,
    },
    /// Pipe-separated rows, the first being the header
    TableWithHeaderRow {
        rows: Vec<String>,
    },
    Anchor {
        anchor: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    /// Cross-reference; `raw` skips anchor normalization
    CrossReference {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        document: Option<String>,
        anchor: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default)]
        raw: bool,
    },
    AnchorPrefix {
        #[serde(default)]
        prefix: Option<String>,
    },
}

impl Operation {
    /// Issue this operation on a builder.
    pub fn apply(&self, builder: &mut MarkupDocBuilder) -> Result<()> {
        match self {
            Operation::DocumentTitle { title } => {
                builder.document_title(title)?;
            }
            Operation::SectionTitle {
                level,
                title,
                anchor,
            } => {
                builder.section_title_with_anchor_level(*level, title, anchor.as_deref())?;
            }
            Operation::Text { text } => {
                builder.text(text);
            }
            Operation::BoldText { text } => {
                builder.bold_text(text);
            }
            Operation::ItalicText { text } => {
                builder.italic_text(text);
            }
            Operation::TextLine {
                text,
                force_line_break,
            } => {
                builder.text_line_with_break(text, *force_line_break);
            }
            Operation::BoldTextLine {
                text,
                force_line_break,
            } => {
                builder.bold_text_line_with_break(text, *force_line_break);
            }
            Operation::ItalicTextLine {
                text,
                force_line_break,
            } => {
                builder.italic_text_line_with_break(text, *force_line_break);
            }
            Operation::NewLine { force_line_break } => {
                builder.new_line_with_break(*force_line_break);
            }
            Operation::Paragraph { text } => {
                builder.paragraph(text);
            }
            Operation::Listing { text } => {
                builder.listing(text);
            }
            Operation::Source { text, language } => {
                builder.source(text, language);
            }
            Operation::UnorderedList { items } => {
                builder.unordered_list(items)?;
            }
            Operation::UnorderedListItem { item, level } => match level {
                Some(level) => {
                    builder.unordered_list_item_level(*level, item)?;
                }
                None => {
                    builder.unordered_list_item(item)?;
                }
            },
            Operation::IndentList => {
                builder.indent_list();
            }
            Operation::OutdentList => {
                builder.outdent_list();
            }
            Operation::Table { columns, rows } => {
                builder.table_spec(&TableSpec {
                    columns: columns.clone(),
                    rows: rows.clone(),
                })?;
            }
            Operation::TableWithHeaderRow { rows } => {
                builder.table_with_header_row(rows.as_slice())?;
            }
            Operation::Anchor { anchor, text } => match text {
                Some(text) => {
                    builder.anchor_with_text(anchor, text)?;
                }
                None => {
                    builder.anchor(anchor)?;
                }
            },
            Operation::CrossReference {
                document,
                anchor,
                text,
                raw,
            } => {
                if *raw {
                    builder.cross_reference_raw(document.as_deref(), anchor, text.as_deref())?;
                } else {
                    builder.cross_reference(document.as_deref(), anchor, text.as_deref())?;
                }
            }
            Operation::AnchorPrefix { prefix } => {
                builder.with_anchor_prefix(prefix.as_deref());
            }
        }
        Ok(())
    }
}

/// A document described as a list of operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Initial anchor prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_prefix: Option<String>,

    /// Operations in call order
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl Script {
    /// Parse a script from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON script file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the script to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replay every operation on `builder`, stopping at the first failure.
    pub fn apply(&self, builder: &mut MarkupDocBuilder) -> Result<()> {
        if let Some(prefix) = &self.anchor_prefix {
            builder.with_anchor_prefix(Some(prefix));
        }
        for (index, operation) in self.operations.iter().enumerate() {
            if let Err(err) = operation.apply(builder) {
                tracing::debug!(index, ?operation, "script operation failed");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Builder for `language` with this script applied.
    pub fn build(&self, language: MarkupLanguage) -> Result<MarkupDocBuilder> {
        let mut options = BuilderOptions::new(language);
        options.anchor_prefix = self.anchor_prefix.clone();
        let mut builder = MarkupDocBuilder::with_options(options);
        self.apply(&mut builder)?;
        Ok(builder)
    }

    /// Render the script in `language`.
    pub fn render(&self, language: MarkupLanguage) -> Result<String> {
        Ok(self.build(language)?.render())
    }
}
