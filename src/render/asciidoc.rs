//! AsciiDoc renderer implementation.

use super::{block_body, fence, Instruction, TextStyle};
use crate::model::{ColumnAlignment, TableColumn};

const HARD_BREAK: &str = " +";

/// Deepest list level expressible with repeated `*` markers.
const MAX_LIST_DEPTH: usize = 5;

pub(super) fn render(instruction: &Instruction<'_>) -> String {
    match *instruction {
        Instruction::Heading {
            level,
            title,
            anchor,
        } => {
            let marker = "=".repeat(usize::from(level.level()) + 1);
            match anchor {
                Some(anchor) => format!("[[{anchor}]]\n{marker} {title}\n"),
                None => format!("{marker} {title}\n"),
            }
        }
        Instruction::Text { text, style } => match style {
            TextStyle::Plain => text.to_string(),
            TextStyle::Bold => format!("*{text}*"),
            TextStyle::Italic => format!("_{text}_"),
        },
        Instruction::LineEnd { hard_break: true } => format!("{HARD_BREAK}\n"),
        Instruction::LineEnd { hard_break: false } => "\n".to_string(),
        Instruction::Paragraph { text } => hardbreak_paragraphs(block_body(text)),
        Instruction::Listing { text, language } => {
            let body = block_body(text);
            let delimiter = fence(body, '-', 4);
            let style = language
                .map(|lang| format!("[source,{lang}]\n"))
                .unwrap_or_default();
            format!("{style}{delimiter}\n{body}\n{delimiter}\n")
        }
        Instruction::ListItem { depth, text } => {
            format!("{} {text}\n", "*".repeat(depth.clamp(1, MAX_LIST_DEPTH)))
        }
        Instruction::Table { columns, rows } => render_table(columns, rows),
        Instruction::Anchor { anchor, text } => match text {
            Some(text) => format!("[[{anchor},{text}]]"),
            None => format!("[[{anchor}]]"),
        },
        Instruction::CrossReference {
            document,
            anchor,
            text,
        } => {
            let target = match document {
                Some(document) => format!("{document}#{anchor}"),
                None => anchor.to_string(),
            };
            match text {
                Some(text) => format!("<<{target},{text}>>"),
                None => format!("<<{target}>>"),
            }
        }
    }
}

/// A `[%hardbreaks]` paragraph per run of non-blank lines.
///
/// The attribute only covers the paragraph directly after it, so a blank line
/// in the text starts a new attributed paragraph.
fn hardbreak_paragraphs(body: &str) -> String {
    let mut chunks: Vec<Vec<&str>> = vec![Vec::new()];
    for line in body.lines() {
        if line.trim().is_empty() {
            if chunks.last().is_some_and(|chunk| !chunk.is_empty()) {
                chunks.push(Vec::new());
            }
        } else if let Some(chunk) = chunks.last_mut() {
            chunk.push(line);
        }
    }
    chunks.retain(|chunk| !chunk.is_empty());

    if chunks.is_empty() {
        return format!("[%hardbreaks]\n{body}\n");
    }
    chunks
        .iter()
        .map(|chunk| format!("[%hardbreaks]\n{}\n", chunk.join("\n")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Column spec such as `^2h`: alignment, relative width, header style.
fn column_spec(column: &TableColumn) -> String {
    let alignment = match column.alignment {
        ColumnAlignment::Left => "<",
        ColumnAlignment::Center => "^",
        ColumnAlignment::Right => ">",
    };
    let width = column.width_ratio.max(1);
    let style = if column.header_column { "h" } else { "" };
    format!("{alignment}{width}{style}")
}

fn render_row<'a>(output: &mut String, cells: impl Iterator<Item = &'a str>) {
    for cell in cells {
        output.push('|');
        // A bare `|` directly followed by the next separator reads as one cell.
        output.push_str(if cell.is_empty() { " " } else { cell });
    }
    output.push('\n');
}

fn render_table(columns: Option<&[TableColumn]>, rows: &[Vec<String>]) -> String {
    let mut output = String::new();

    match columns {
        Some(columns) => {
            let specs: Vec<String> = columns.iter().map(column_spec).collect();
            output.push_str(&format!(
                "[options=\"header\",cols=\"{}\"]\n",
                specs.join(",")
            ));
        }
        None => {
            let count = rows.first().map_or(0, Vec::len);
            output.push_str(&format!("[cols=\"{}\"]\n", vec!["1"; count].join(",")));
        }
    }

    output.push_str("|===\n");
    if let Some(columns) = columns {
        render_row(&mut output, columns.iter().map(|c| c.header.as_str()));
    }
    for row in rows {
        render_row(&mut output, row.iter().map(String::as_str));
    }
    output.push_str("|===\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    #[test]
    fn test_headings() {
        let title = Instruction::Heading {
            level: HeadingLevel::Title,
            title: "Petstore",
            anchor: None,
        };
        assert_eq!(render(&title), "= Petstore\n");

        let section = Instruction::Heading {
            level: HeadingLevel::L2,
            title: "Paths",
            anchor: Some("_paths"),
        };
        assert_eq!(render(&section), "[[_paths]]\n=== Paths\n");
    }

    #[test]
    fn test_listing_and_source() {
        let listing = Instruction::Listing {
            text: "a\nb\n",
            language: None,
        };
        assert_eq!(render(&listing), "----\na\nb\n----\n");

        let source = Instruction::Listing {
            text: "fn main() {}",
            language: Some("rust"),
        };
        assert_eq!(render(&source), "[source,rust]\n----\nfn main() {}\n----\n");
    }

    #[test]
    fn test_paragraph_split_on_blank_lines() {
        let para = Instruction::Paragraph { text: "a\nb" };
        assert_eq!(render(&para), "[%hardbreaks]\na\nb\n");

        let para = Instruction::Paragraph {
            text: "a\nb\n\n  \nc\nd\n",
        };
        assert_eq!(
            render(&para),
            "[%hardbreaks]\na\nb\n\n[%hardbreaks]\nc\nd\n"
        );
    }

    #[test]
    fn test_list_depth_clamped() {
        let item = Instruction::ListItem { depth: 7, text: "deep" };
        assert_eq!(render(&item), "***** deep\n");
    }

    #[test]
    fn test_table_with_columns() {
        let columns = [
            TableColumn::new("Name").with_width_ratio(2),
            TableColumn::new("Type")
                .with_alignment(ColumnAlignment::Center)
                .with_header_column(true),
        ];
        let rows = vec![vec!["id".to_string(), String::new()]];
        let table = Instruction::Table {
            columns: Some(&columns[..]),
            rows: &rows,
        };
        assert_eq!(
            render(&table),
            "[options=\"header\",cols=\"<2,^1h\"]\n|===\n|Name|Type\n|id| \n|===\n"
        );
    }

    #[test]
    fn test_headerless_table_is_native() {
        let rows = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string(), "d".to_string()],
        ];
        let table = Instruction::Table {
            columns: None,
            rows: &rows,
        };
        assert_eq!(render(&table), "[cols=\"1,1\"]\n|===\n|a|b\n|c|d\n|===\n");
    }

    #[test]
    fn test_references() {
        let local = Instruction::CrossReference {
            document: None,
            anchor: "_paths",
            text: None,
        };
        assert_eq!(render(&local), "<<_paths>>");

        let remote = Instruction::CrossReference {
            document: Some("definitions.adoc"),
            anchor: "_pet",
            text: Some("Pet"),
        };
        assert_eq!(render(&remote), "<<definitions.adoc#_pet,Pet>>");

        let anchor = Instruction::Anchor {
            anchor: "_pet",
            text: Some("Pet"),
        };
        assert_eq!(render(&anchor), "[[_pet,Pet]]");
    }
}
