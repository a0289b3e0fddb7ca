//! Markdown renderer implementation.
//!
//! Targets GitHub-flavoured Markdown. Two capability gaps degrade instead of
//! failing: pipe tables always need a header row, so headerless tables get a
//! blank one, and anchors cannot carry display text, so it is dropped.

use super::table::{blank_columns, column_widths, pad};
use super::{block_body, fence, Instruction, TextStyle};
use crate::model::{ColumnAlignment, TableColumn};

/// Two trailing spaces: CommonMark hard line break.
const HARD_BREAK: &str = "  ";

/// Indentation per nested list level.
const LIST_INDENT: &str = "    ";

/// Unordered list marker.
const LIST_MARKER: char = '-';

pub(super) fn render(instruction: &Instruction<'_>) -> String {
    match *instruction {
        Instruction::Heading {
            level,
            title,
            anchor,
        } => {
            let marker = "#".repeat(usize::from(level.level()) + 1);
            match anchor {
                Some(anchor) => format!("{}\n{marker} {title}\n", html_anchor(anchor)),
                None => format!("{marker} {title}\n"),
            }
        }
        Instruction::Text { text, style } => match style {
            TextStyle::Plain => text.to_string(),
            TextStyle::Bold => format!("**{text}**"),
            TextStyle::Italic => format!("*{text}*"),
        },
        Instruction::LineEnd { hard_break: true } => format!("{HARD_BREAK}\n"),
        Instruction::LineEnd { hard_break: false } => "\n".to_string(),
        Instruction::Paragraph { text } => {
            let lines: Vec<&str> = block_body(text).lines().collect();
            format!("{}\n", lines.join(&format!("{HARD_BREAK}\n")))
        }
        Instruction::Listing { text, language } => {
            let body = block_body(text);
            let delimiter = fence(body, '`', 3);
            format!(
                "{delimiter}{}\n{body}\n{delimiter}\n",
                language.unwrap_or_default()
            )
        }
        Instruction::ListItem { depth, text } => format!(
            "{}{LIST_MARKER} {text}\n",
            LIST_INDENT.repeat(depth.max(1) - 1)
        ),
        Instruction::Table { columns, rows } => render_table(columns, rows),
        Instruction::Anchor { anchor, .. } => html_anchor(anchor),
        Instruction::CrossReference {
            document,
            anchor,
            text,
        } => {
            let text = link_text(text.unwrap_or(anchor));
            format!("[{text}]({}#{anchor})", document.unwrap_or_default())
        }
    }
}

fn html_anchor(anchor: &str) -> String {
    format!("<a name=\"{anchor}\"></a>")
}

/// Brackets would end the link label early.
fn link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

fn render_row(output: &mut String, cells: &[String], widths: &[usize]) {
    output.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        output.push(' ');
        output.push_str(&pad(cell, *width));
        output.push_str(" |");
    }
    output.push('\n');
}

fn separator(alignment: ColumnAlignment, width: usize) -> String {
    match alignment {
        ColumnAlignment::Left => "-".repeat(width),
        ColumnAlignment::Center => format!(":{}:", "-".repeat(width - 2)),
        ColumnAlignment::Right => format!("{}:", "-".repeat(width - 1)),
    }
}

/// Render a padded pipe table.
///
/// Pipe tables cannot omit the header row; without column specifiers it is
/// synthesized from blank cells. Width ratios have no Markdown equivalent and
/// are ignored; header columns are rendered bold.
fn render_table(columns: Option<&[TableColumn]>, rows: &[Vec<String>]) -> String {
    let Some(columns) = columns else {
        return render_table(Some(blank_columns(rows).as_slice()), rows);
    };
    let header: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(i, cell)| {
                    let header_column = columns.get(i).is_some_and(|c| c.header_column);
                    if header_column && !cell.is_empty() {
                        format!("**{cell}**")
                    } else {
                        cell.clone()
                    }
                })
                .collect()
        })
        .collect();

    let widths = column_widths(Some(header.as_slice()), &body);
    let mut output = String::new();
    render_row(&mut output, &header, &widths);

    let separators: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, &width)| {
            let alignment = columns.get(i).map(|c| c.alignment).unwrap_or_default();
            separator(alignment, width)
        })
        .collect();
    render_row(&mut output, &separators, &widths);

    for row in &body {
        render_row(&mut output, row, &widths);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    #[test]
    fn test_heading() {
        let heading = Instruction::Heading {
            level: HeadingLevel::L1,
            title: "Title",
            anchor: None,
        };
        assert_eq!(render(&heading), "## Title\n");
    }

    #[test]
    fn test_heading_with_anchor() {
        let heading = Instruction::Heading {
            level: HeadingLevel::L3,
            title: "Pet",
            anchor: Some("_pet"),
        };
        assert_eq!(render(&heading), "<a name=\"_pet\"></a>\n#### Pet\n");
    }

    #[test]
    fn test_formatted_text() {
        let bold = Instruction::Text {
            text: "bold",
            style: TextStyle::Bold,
        };
        let italic = Instruction::Text {
            text: "italic",
            style: TextStyle::Italic,
        };
        assert_eq!(render(&bold), "**bold**");
        assert_eq!(render(&italic), "*italic*");
    }

    #[test]
    fn test_paragraph_hard_breaks() {
        let para = Instruction::Paragraph {
            text: "First line\nSecond line\n",
        };
        assert_eq!(render(&para), "First line  \nSecond line\n");
    }

    #[test]
    fn test_source_fence_avoids_content() {
        let source = Instruction::Listing {
            text: "```\nnested\n```",
            language: Some("markdown"),
        };
        assert_eq!(
            render(&source),
            "````markdown\n```\nnested\n```\n````\n"
        );
    }

    #[test]
    fn test_nested_list_item() {
        let item = Instruction::ListItem { depth: 3, text: "x" };
        assert_eq!(render(&item), "        - x\n");
    }

    #[test]
    fn test_simple_table() {
        let columns = [TableColumn::new("A"), TableColumn::new("B")];
        let rows = vec![vec!["1".to_string(), "2".to_string()]];
        let md = render(&Instruction::Table {
            columns: Some(&columns[..]),
            rows: &rows,
        });
        assert_eq!(md, "| A   | B   |\n| --- | --- |\n| 1   | 2   |\n");
    }

    #[test]
    fn test_headerless_table_gets_blank_header() {
        let rows = vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string(), "d".to_string()],
        ];
        let md = render(&Instruction::Table {
            columns: None,
            rows: &rows,
        });
        assert_eq!(
            md,
            "|     |     |\n| --- | --- |\n| a   | b   |\n| c   | d   |\n"
        );
    }

    #[test]
    fn test_table_alignment_and_header_column() {
        let columns = [
            TableColumn::new("Left").with_header_column(true),
            TableColumn::new("Center").with_alignment(ColumnAlignment::Center),
            TableColumn::new("Right").with_alignment(ColumnAlignment::Right),
        ];
        let rows = vec![vec!["L".to_string(), "C".to_string(), "R".to_string()]];
        let md = render(&Instruction::Table {
            columns: Some(&columns[..]),
            rows: &rows,
        });
        assert!(md.contains("| ----- | :----: | ----: |"), "got: {md}");
        assert!(md.contains("| **L** | C      | R     |"), "got: {md}");
    }

    #[test]
    fn test_cross_references() {
        let local = Instruction::CrossReference {
            document: None,
            anchor: "_api_overview",
            text: Some("API Overview"),
        };
        assert_eq!(render(&local), "[API Overview](#_api_overview)");

        let remote = Instruction::CrossReference {
            document: Some("definitions.md"),
            anchor: "_pet",
            text: None,
        };
        assert_eq!(render(&remote), "[_pet](definitions.md#_pet)");
    }

    #[test]
    fn test_link_text_brackets_escaped() {
        let link = Instruction::CrossReference {
            document: None,
            anchor: "_x",
            text: Some("a]b [c]"),
        };
        assert_eq!(render(&link), "[a\\]b \\[c\\]](#_x)");
    }
}
