//! Raw spreadsheet cell grid.

use serde::{Deserialize, Serialize};

/// A single spreadsheet cell.
///
/// Serialized as a JSON number, string or `null`. Empty strings and `null`
/// both read back as [`Cell::Empty`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged, from = "RawCell")]
pub enum Cell {
    /// Numeric cell (integers and floats alike).
    Number(f64),
    /// Text cell.
    Text(String),
    /// Blank or absent cell.
    #[default]
    Empty,
}

impl Cell {
    /// Text content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the cell holds nothing.
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Render the cell the way it would read on the sheet.
    ///
    /// Whole numbers are rendered without a fractional part.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Number(f64),
    Bool(bool),
    Text(String),
    Empty(()),
}

impl From<RawCell> for Cell {
    fn from(raw: RawCell) -> Self {
        match raw {
            RawCell::Number(n) => Cell::Number(n),
            RawCell::Bool(b) => Cell::Number(if b { 1.0 } else { 0.0 }),
            RawCell::Text(s) if s.is_empty() => Cell::Empty,
            RawCell::Text(s) => Cell::Text(s),
            RawCell::Empty(()) => Cell::Empty,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

/// A worksheet materialized as rows of cells.
///
/// Rows may have different lengths; missing trailing cells read as blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// A single row by index.
    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<Vec<Cell>>> for Grid {
    fn from(rows: Vec<Vec<Cell>>) -> Self {
        Self::new(rows)
    }
}

/// First non-blank cell strictly to the right of `col`.
pub fn next_non_blank(row: &[Cell], col: usize) -> Option<&Cell> {
    row.iter().skip(col + 1).find(|cell| !cell.is_blank())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_numbers() {
        assert_eq!(Cell::Number(2.0).render(), "2");
        assert_eq!(Cell::Number(150.005).render(), "150.005");
        assert_eq!(Cell::Empty.render(), "");
        assert_eq!(Cell::from("PO#").render(), "PO#");
    }

    #[test]
    fn test_next_non_blank_skips_blanks() {
        let row = vec![
            Cell::from("PO#"),
            Cell::Empty,
            Cell::Empty,
            Cell::from("PO-1001"),
            Cell::from("later"),
        ];
        assert_eq!(next_non_blank(&row, 0), Some(&Cell::from("PO-1001")));
        assert_eq!(next_non_blank(&row, 4), None);
    }

    #[test]
    fn test_grid_deserializes_mixed_cells() {
        let grid: Grid = serde_json::from_str(r#"[["PO#", null, 42], []]"#).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(
            grid.row(0).unwrap(),
            &[Cell::from("PO#"), Cell::Empty, Cell::Number(42.0)]
        );
        assert!(grid.row(1).unwrap().is_empty());
    }

    #[test]
    fn test_empty_string_reads_as_blank() {
        let grid: Grid = serde_json::from_str(r#"[["PO#", "", "FKPO1", true]]"#).unwrap();
        assert_eq!(
            grid.row(0).unwrap(),
            &[Cell::from("PO#"), Cell::Empty, Cell::from("FKPO1"), Cell::Number(1.0)]
        );
        assert_eq!(serde_json::to_string(&Cell::Empty).unwrap(), "null");
    }
}
