//! Header scan: label/value pairs above the order details table.

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::{next_non_blank, Cell, Grid, HeaderField, HeaderFields};

use super::patterns::BOUNDARY_MARKER;

/// Output of a header scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// Header values found above (and on) the boundary row.
    pub fields: HeaderFields,
    /// Index of the row holding the boundary marker.
    pub boundary_row: usize,
}

/// Scans a grid top to bottom for header labels until the boundary marker.
#[derive(Debug, Clone)]
pub struct DocumentScanner {
    boundary_marker: String,
}

impl DocumentScanner {
    pub fn new() -> Self {
        Self {
            boundary_marker: BOUNDARY_MARKER.to_string(),
        }
    }

    /// Scan the grid.
    ///
    /// Only rows whose first cell is text are looked at. Within a row, cells are
    /// visited left to right; the row holding the boundary marker is scanned up
    /// to and including the marker cell.
    pub fn scan(&self, grid: &Grid) -> Result<ScanResult, ExtractionError> {
        let mut fields = HeaderFields::new();

        for (index, row) in grid.rows().iter().enumerate() {
            if !matches!(row.first(), Some(Cell::Text(_))) {
                continue;
            }

            for (col, cell) in row.iter().enumerate() {
                let Some(text) = cell.as_text() else {
                    continue;
                };

                record_labels(&mut fields, row, col, text);

                if text.contains(&self.boundary_marker) {
                    info!(
                        "Found {} section at row {} with {} header fields",
                        self.boundary_marker,
                        index,
                        fields.len()
                    );
                    return Ok(ScanResult {
                        fields,
                        boundary_row: index,
                    });
                }
            }
        }

        Err(ExtractionError::MissingSection {
            marker: self.boundary_marker.clone(),
        })
    }
}

impl Default for DocumentScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan a grid with the standard template vocabulary.
pub fn scan(grid: &Grid) -> Result<ScanResult, ExtractionError> {
    DocumentScanner::new().scan(grid)
}

/// Record every field the text cell at `col` labels.
fn record_labels(fields: &mut HeaderFields, row: &[Cell], col: usize, text: &str) {
    if let Some(field) = HeaderField::from_label(text) {
        let value = next_non_blank(row, col).cloned();
        debug!("{} -> {:?}", field.key(), value);
        fields.set(field, value);
    }

    for (needle, field) in HeaderField::CONTAINS {
        if text.contains(needle) {
            let value = next_non_blank(row, col).cloned();
            debug!("{} -> {:?}", field.key(), value);
            fields.set(field, value);
        }
    }
}
