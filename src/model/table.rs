//! Table model structures.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Horizontal alignment for a table column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A column specifier: header text plus layout hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Header text
    pub header: String,

    /// Relative width (0 = let the renderer decide)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub width_ratio: u32,

    /// Horizontal alignment
    #[serde(default, skip_serializing_if = "is_default_alignment")]
    pub alignment: ColumnAlignment,

    /// Cells of this column are header cells
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub header_column: bool,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

fn is_default_alignment(a: &ColumnAlignment) -> bool {
    *a == ColumnAlignment::Left
}

impl TableColumn {
    /// Create a column with a header.
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Default::default()
        }
    }

    /// Set the relative width.
    pub fn with_width_ratio(mut self, ratio: u32) -> Self {
        self.width_ratio = ratio;
        self
    }

    /// Set the alignment.
    pub fn with_alignment(mut self, alignment: ColumnAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Mark the column as a header column.
    pub fn with_header_column(mut self, header_column: bool) -> Self {
        self.header_column = header_column;
        self
    }
}

/// A table: optional column specifiers and a grid of cell strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Column specifiers; `None` for a headerless table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<TableColumn>>,

    /// Cell rows
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl TableSpec {
    /// Create a headerless table.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self {
            columns: None,
            rows,
        }
    }

    /// Create a table with column specifiers.
    pub fn with_columns(columns: Vec<TableColumn>, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns: Some(columns),
            rows,
        }
    }

    /// Parse pipe-separated rows, the first being the header row.
    ///
    /// `"Name|Type"` yields a column named `Name` and one named `Type`. A `\|`
    /// sequence is a literal pipe inside a cell.
    pub fn from_psv<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let mut rows = lines.iter().map(|line| split_psv(line.as_ref()));
        let header = rows
            .next()
            .ok_or_else(|| Error::InvalidInput("PSV table has no header row".to_string()))?;
        if header.iter().all(|cell| cell.is_empty()) {
            return Err(Error::InvalidInput("PSV header row is empty".to_string()));
        }

        let columns = header.into_iter().map(TableColumn::new).collect();
        Ok(Self::with_columns(columns, rows.collect()))
    }

    /// Number of columns (from the specifiers, else the widest row).
    pub fn column_count(&self) -> usize {
        match &self.columns {
            Some(columns) => columns.len(),
            None => self.rows.iter().map(Vec::len).max().unwrap_or(0),
        }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has neither columns nor rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.as_ref().is_none_or(Vec::is_empty)
    }
}

fn split_psv(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_builder() {
        let column = TableColumn::new("Name")
            .with_width_ratio(3)
            .with_alignment(ColumnAlignment::Center)
            .with_header_column(true);
        assert_eq!(column.header, "Name");
        assert_eq!(column.width_ratio, 3);
        assert_eq!(column.alignment, ColumnAlignment::Center);
        assert!(column.header_column);
    }

    #[test]
    fn test_column_count() {
        let table = TableSpec::new(vec![
            vec!["a".to_string()],
            vec!["b".to_string(), "c".to_string()],
        ]);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 2);

        let table = TableSpec::with_columns(vec![TableColumn::new("x")], vec![]);
        assert_eq!(table.column_count(), 1);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_from_psv() {
        let table = TableSpec::from_psv(&["Name|Type", "id | integer", "pipe\\|name|string"]).unwrap();
        let columns = table.columns.as_ref().unwrap();
        assert_eq!(columns[0].header, "Name");
        assert_eq!(columns[1].header, "Type");
        assert_eq!(table.rows[0], vec!["id", "integer"]);
        assert_eq!(table.rows[1], vec!["pipe|name", "string"]);
    }

    #[test]
    fn test_from_psv_rejects_missing_header() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            TableSpec::from_psv(&empty),
            Err(Error::InvalidInput(_))
        ));
        assert!(TableSpec::from_psv(&[" | "]).is_err());
    }

    #[test]
    fn test_column_serialization_skips_defaults() {
        let json = serde_json::to_string(&TableColumn::new("Name")).unwrap();
        assert_eq!(json, "{\"header\":\"Name\"}");
    }
}
