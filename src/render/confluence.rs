//! Confluence wiki markup renderer implementation.

use super::{block_body, Instruction, TextStyle};
use crate::model::TableColumn;

/// Forced line break (`\\`), preceded by a space so it never touches a word.
const HARD_BREAK: &str = " \\\\";

const NOFORMAT: &str = "{noformat}";
const CODE_CLOSE: &str = "{code}";

pub(super) fn render(instruction: &Instruction<'_>) -> String {
    match *instruction {
        Instruction::Heading {
            level,
            title,
            anchor,
        } => {
            let anchor = anchor.map(macro_anchor).unwrap_or_default();
            format!("h{}. {anchor}{title}\n", level.level() + 1)
        }
        Instruction::Text { text, style } => match style {
            TextStyle::Plain => text.to_string(),
            TextStyle::Bold => format!("*{text}*"),
            TextStyle::Italic => format!("_{text}_"),
        },
        Instruction::LineEnd { hard_break: true } => format!("{HARD_BREAK}\n"),
        Instruction::LineEnd { hard_break: false } => "\n".to_string(),
        Instruction::Paragraph { text } => {
            let lines: Vec<&str> = block_body(text).lines().collect();
            format!("{}\n", lines.join(&format!("{HARD_BREAK}\n")))
        }
        Instruction::Listing { text, language } => verbatim_block(block_body(text), language),
        Instruction::ListItem { depth, text } => format!("{} {text}\n", "*".repeat(depth.max(1))),
        Instruction::Table { columns, rows } => render_table(columns, rows),
        Instruction::Anchor { anchor, .. } => macro_anchor(anchor),
        Instruction::CrossReference {
            document,
            anchor,
            text,
        } => {
            let target = format!("{}#{anchor}", document.unwrap_or_default());
            match text {
                Some(text) => format!("[{}|{target}]", link_text(text)),
                None => format!("[{target}]"),
            }
        }
    }
}

/// Wrap verbatim text in a `{noformat}` or `{code}` macro.
///
/// Neither macro can escape its own closing tag, so a body containing it
/// switches to the other macro. Source blocks lose their highlighting when
/// that happens; a body containing both tags gets its `{noformat}` tags
/// backslash-escaped.
fn verbatim_block(body: &str, language: Option<&str>) -> String {
    let code_safe = !body.contains(CODE_CLOSE);
    let noformat_safe = !body.contains(NOFORMAT);

    match language {
        Some(language) if code_safe => {
            format!("{{code:language={language}}}\n{body}\n{CODE_CLOSE}\n")
        }
        _ if noformat_safe => format!("{NOFORMAT}\n{body}\n{NOFORMAT}\n"),
        _ if code_safe => format!("{{code}}\n{body}\n{CODE_CLOSE}\n"),
        _ => format!(
            "{NOFORMAT}\n{}\n{NOFORMAT}\n",
            body.replace(NOFORMAT, "\\{noformat}")
        ),
    }
}

/// `|` separates the alias from the target and brackets delimit the link.
fn link_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '|' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn macro_anchor(anchor: &str) -> String {
    format!("{{anchor:{anchor}}}")
}

/// Empty cells collapse the separators around them, so they get a space.
fn cell_text(cell: &str) -> &str {
    if cell.is_empty() {
        " "
    } else {
        cell
    }
}

/// Render a wiki table.
///
/// Header cells use `||`, data cells `|`; a header column turns the cells of
/// that column into header cells. Alignment and width hints have no wiki
/// syntax and are ignored.
fn render_table(columns: Option<&[TableColumn]>, rows: &[Vec<String>]) -> String {
    let mut output = String::new();

    if let Some(columns) = columns {
        output.push_str("||");
        for column in columns {
            output.push_str(cell_text(&column.header));
            output.push_str("||");
        }
        output.push('\n');
    }

    for row in rows {
        let mut last_header = false;
        for (i, cell) in row.iter().enumerate() {
            last_header = columns
                .and_then(|c| c.get(i))
                .is_some_and(|c| c.header_column);
            output.push_str(if last_header { "||" } else { "|" });
            output.push_str(cell_text(cell));
        }
        output.push_str(if last_header { "||" } else { "|" });
        output.push('\n');
    }
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
        assert_eq!(render(&title), "h1. Petstore\n");

        let section = Instruction::Heading {
            level: HeadingLevel::L4,
            title: "Body",
            anchor: Some("_body"),
        };
        assert_eq!(render(&section), "h5. {anchor:_body}Body\n");
    }

    #[test]
    fn test_hard_break() {
        assert_eq!(render(&Instruction::LineEnd { hard_break: true }), " \\\\\n");
        assert_eq!(
            render(&Instruction::Paragraph { text: "a\nb" }),
            "a \\\\\nb\n"
        );
    }

    #[test]
    fn test_listing_and_code() {
        let listing = Instruction::Listing {
            text: "raw",
            language: None,
        };
        assert_eq!(render(&listing), "{noformat}\nraw\n{noformat}\n");

        let code = Instruction::Listing {
            text: "{}",
            language: Some("json"),
        };
        assert_eq!(render(&code), "{code:language=json}\n{}\n{code}\n");
    }

    #[test]
    fn test_verbatim_body_containing_closing_tag() {
        let listing = Instruction::Listing {
            text: "before\n{noformat}\nafter",
            language: None,
        };
        assert_eq!(
            render(&listing),
            "{code}\nbefore\n{noformat}\nafter\n{code}\n"
        );

        let source = Instruction::Listing {
            text: "x\n{code}\ny",
            language: Some("java"),
        };
        assert_eq!(render(&source), "{noformat}\nx\n{code}\ny\n{noformat}\n");

        let both = Instruction::Listing {
            text: "{code}\n{noformat}",
            language: None,
        };
        assert_eq!(
            render(&both),
            "{noformat}\n{code}\n\\{noformat}\n{noformat}\n"
        );
    }

    #[test]
    fn test_table_with_header() {
        let columns = [TableColumn::new("Name"), TableColumn::new("Type")];
        let rows = vec![vec!["id".to_string(), String::new()]];
        let table = Instruction::Table {
            columns: Some(&columns[..]),
            rows: &rows,
        };
        assert_eq!(render(&table), "||Name||Type||\n|id| |\n");
    }

    #[test]
    fn test_table_header_column() {
        let columns = [
            TableColumn::new("Key").with_header_column(true),
            TableColumn::new("Value"),
        ];
        let rows = vec![vec!["a".to_string(), "1".to_string()]];
        let table = Instruction::Table {
            columns: Some(&columns[..]),
            rows: &rows,
        };
        assert_eq!(render(&table), "||Key||Value||\n||a|1|\n");
    }

    #[test]
    fn test_headerless_table_is_native() {
        let rows = vec![vec!["a".to_string(), "b".to_string()]];
        let table = Instruction::Table {
            columns: None,
            rows: &rows,
        };
        assert_eq!(render(&table), "|a|b|\n");
    }

    #[test]
    fn test_references() {
        let local = Instruction::CrossReference {
            document: None,
            anchor: "_pet",
            text: Some("Pet"),
        };
        assert_eq!(render(&local), "[Pet|#_pet]");

        let remote = Instruction::CrossReference {
            document: Some("Definitions"),
            anchor: "_pet",
            text: None,
        };
        assert_eq!(render(&remote), "[Definitions#_pet]");
    }

    #[test]
    fn test_link_text_separators_escaped() {
        let link = Instruction::CrossReference {
            document: None,
            anchor: "_x",
            text: Some("in|out [v2]"),
        };
        assert_eq!(render(&link), "[in\\|out \\[v2\\]|#_x]");
    }
}
