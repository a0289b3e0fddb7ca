//! Table and list formatting shared by the dialect renderers.

use unicode_width::UnicodeWidthStr;

use crate::error::{Error, Result};
use crate::language::MarkupLanguage;
use crate::model::TableColumn;

/// Minimum column width for padded tables (GFM needs three dashes).
const MIN_COLUMN_WIDTH: usize = 3;

/// A table whose cells are escaped and whose rows all have the same width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PreparedTable {
    pub columns: Option<Vec<TableColumn>>,
    pub rows: Vec<Vec<String>>,
}

/// Check the table shape and return its column count.
///
/// With column specifiers every row must have exactly one cell per column.
/// Without them rows may be ragged; the widest row sets the column count.
pub fn validate_shape(columns: Option<&[TableColumn]>, rows: &[Vec<String>]) -> Result<usize> {
    match columns {
        Some(columns) => {
            let expected = columns.len();
            if let Some((row, cells)) = rows
                .iter()
                .enumerate()
                .find(|(_, cells)| cells.len() != expected)
            {
                return Err(Error::TableShape {
                    row,
                    expected,
                    found: cells.len(),
                });
            }
            Ok(expected)
        }
        None => Ok(rows.iter().map(Vec::len).max().unwrap_or(0)),
    }
}

/// Validate, pad and escape a table for `language`.
pub(crate) fn prepare(
    language: MarkupLanguage,
    columns: Option<&[TableColumn]>,
    rows: &[Vec<String>],
) -> Result<PreparedTable> {
    let width = validate_shape(columns, rows)?;

    let columns = columns.map(|columns| {
        columns
            .iter()
            .map(|column| TableColumn {
                header: escape_cell(language, &column.header),
                ..column.clone()
            })
            .collect()
    });

    let rows = rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(|c| escape_cell(language, c)).collect();
            cells.resize(width, String::new());
            cells
        })
        .collect();

    Ok(PreparedTable { columns, rows })
}

/// Escape text for use inside a table cell.
///
/// The column separator `|` is backslash-escaped in every dialect. Line
/// breaks become `<br>` in Markdown and a forced break in Confluence, where a
/// raw newline would end the row. AsciiDoc cells keep their newlines.
///
/// # Example
///
/// ```
/// use markupdoc::render::escape_cell;
/// use markupdoc::MarkupLanguage;
///
/// assert_eq!(escape_cell(MarkupLanguage::Markdown, "a|b\nc"), "a\\|b<br>c");
/// ```
pub fn escape_cell(language: MarkupLanguage, text: &str) -> String {
    let escaped = text.replace('\r', "").replace('|', "\\|");
    match language {
        MarkupLanguage::AsciiDoc => escaped,
        MarkupLanguage::Markdown => escaped.replace('\n', "<br>"),
        MarkupLanguage::Confluence => escaped.replace('\n', " \\\\ "),
    }
}

/// Escape text for use as a single list item.
///
/// Items must stay on one line. A block marker at the start of the text is
/// escaped so it is not read as a deeper nesting level: `*` in AsciiDoc and
/// Confluence, and in Markdown any bullet, heading, quote or ordered-list
/// marker.
///
/// # Example
///
/// ```
/// use markupdoc::render::escape_list_item;
/// use markupdoc::MarkupLanguage;
///
/// assert_eq!(escape_list_item(MarkupLanguage::Markdown, "1. first"), "1\\. first");
/// assert_eq!(escape_list_item(MarkupLanguage::Markdown, "# tag"), "\\# tag");
/// ```
pub fn escape_list_item(language: MarkupLanguage, text: &str) -> String {
    let line = single_line(text);
    match language {
        MarkupLanguage::Markdown => escape_markdown_marker(line),
        MarkupLanguage::AsciiDoc => match line.strip_prefix('*') {
            Some(rest) => format!("{{asterisk}}{rest}"),
            None => line,
        },
        MarkupLanguage::Confluence => match line.strip_prefix('*') {
            Some(rest) => format!("\\*{rest}"),
            None => line,
        },
    }
}

/// Backslash-escape a leading Markdown block marker.
fn escape_markdown_marker(line: String) -> String {
    if line.starts_with(['*', '-', '+', '#', '>']) {
        return format!("\\{line}");
    }
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    match line[digits..].chars().next() {
        Some(marker @ ('.' | ')')) if digits > 0 => {
            format!("{}\\{marker}{}", &line[..digits], &line[digits + 1..])
        }
        _ => line,
    }
}

/// Join the lines of `text` with single spaces.
pub fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Blank column specifiers, one per cell of the first row.
pub(crate) fn blank_columns(rows: &[Vec<String>]) -> Vec<TableColumn> {
    vec![TableColumn::default(); rows.first().map_or(0, Vec::len)]
}

/// Display width of each column, at least [`MIN_COLUMN_WIDTH`].
pub(crate) fn column_widths(header: Option<&[String]>, rows: &[Vec<String>]) -> Vec<usize> {
    let count = header
        .map(<[String]>::len)
        .unwrap_or_else(|| rows.first().map_or(0, Vec::len));
    let mut widths = vec![MIN_COLUMN_WIDTH; count];

    for row in header.into_iter().chain(rows.iter().map(Vec::as_slice)) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(UnicodeWidthStr::width(cell.as_str()));
        }
    }
    widths
}

/// Pad `text` with spaces to a display width.
pub(crate) fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{text}{}", " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_validate_with_columns() {
        let columns = [TableColumn::new("A"), TableColumn::new("B")];
        let rows = grid(&[&["1", "2"], &["3", "4"]]);
        assert_eq!(validate_shape(Some(&columns[..]), &rows).unwrap(), 2);
    }

    #[test]
    fn test_validate_rejects_wrong_width() {
        let columns = [TableColumn::new("A"), TableColumn::new("B")];
        let rows = grid(&[&["1", "2"], &["3"]]);
        match validate_shape(Some(&columns[..]), &rows) {
            Err(Error::TableShape {
                row,
                expected,
                found,
            }) => {
                assert_eq!((row, expected, found), (1, 2, 1));
            }
            other => panic!("expected shape error, got {other:?}"),
        }

        let rows = grid(&[&["1", "2", "3"]]);
        assert!(validate_shape(Some(&columns[..]), &rows).is_err());
    }

    #[test]
    fn test_validate_empty_columns_with_rows() {
        let rows = grid(&[&["1"]]);
        assert!(validate_shape(Some(&[][..]), &rows).is_err());
        assert_eq!(validate_shape(Some(&[][..]), &[]).unwrap(), 0);
    }

    #[test]
    fn test_prepare_pads_ragged_headerless_rows() {
        let rows = grid(&[&["a"], &["b", "c|d"]]);
        let table = prepare(MarkupLanguage::AsciiDoc, None, &rows).unwrap();
        assert_eq!(table.rows, grid(&[&["a", ""], &["b", "c\\|d"]]));
    }

    #[test]
    fn test_prepare_escapes_headers() {
        let columns = [TableColumn::new("In|Out")];
        let table = prepare(MarkupLanguage::Confluence, Some(&columns[..]), &[]).unwrap();
        assert_eq!(table.columns.unwrap()[0].header, "In\\|Out");
    }

    #[test]
    fn test_escape_cell_per_dialect() {
        assert_eq!(escape_cell(MarkupLanguage::AsciiDoc, "a|b\nc"), "a\\|b\nc");
        assert_eq!(escape_cell(MarkupLanguage::Markdown, "a\r\nb"), "a<br>b");
        assert_eq!(escape_cell(MarkupLanguage::Confluence, "a\nb"), "a \\\\ b");
    }

    #[test]
    fn test_escape_list_item() {
        assert_eq!(escape_list_item(MarkupLanguage::Markdown, "one\n two"), "one two");
        assert_eq!(escape_list_item(MarkupLanguage::Markdown, "- dash"), "\\- dash");
        assert_eq!(escape_list_item(MarkupLanguage::Markdown, "+ plus"), "\\+ plus");
        assert_eq!(escape_list_item(MarkupLanguage::Markdown, "> quote"), "\\> quote");
        assert_eq!(escape_list_item(MarkupLanguage::Markdown, "12) twelve"), "12\\) twelve");
        assert_eq!(escape_list_item(MarkupLanguage::Markdown, "2024 release"), "2024 release");
        assert_eq!(escape_list_item(MarkupLanguage::Markdown, "v1. x"), "v1. x");
        assert_eq!(
            escape_list_item(MarkupLanguage::Confluence, "*starred*"),
            "\\*starred*"
        );
        assert_eq!(
            escape_list_item(MarkupLanguage::AsciiDoc, "*x"),
            "{asterisk}x"
        );
    }

    #[test]
    fn test_column_widths_use_display_width() {
        let header = vec!["Name".to_string(), "V".to_string()];
        let rows = grid(&[&["日本", "x"]]);
        assert_eq!(column_widths(Some(header.as_slice()), &rows), vec![4, 3]);

        let rows = grid(&[&["日本語", "x"]]);
        assert_eq!(column_widths(None, &rows), vec![6, 3]);
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("日本", 5), "日本 ");
        assert_eq!(pad("long", 2), "long");
    }
}
