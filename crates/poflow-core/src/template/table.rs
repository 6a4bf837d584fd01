//! Line-item table extraction below the boundary marker.

use tracing::{debug, info};

use crate::models::{next_non_blank, Cell, Grid, LineItem, StatedTotals};

use super::patterns::{TOTAL_AMOUNT_MARKER, TOTAL_QUANTITY_MARKER, TRUNCATION_MARKER};

/// The line-item table and the footer totals below it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedTable {
    /// Column headers, verbatim from the first table row (blank headers render empty).
    pub columns: Vec<String>,

    /// One record per row after the header row; the last one is the grand-total row.
    pub items: Vec<LineItem>,

    /// Footer totals, present only when the truncation marker row was found.
    pub totals: Option<StatedTotals>,

    /// Grid index of the truncation marker row.
    pub marker_row: Option<usize>,
}

impl ExtractedTable {
    /// Rows that become products: everything but the grand-total row.
    pub fn product_rows(&self) -> &[LineItem] {
        match self.items.split_last() {
            Some((_, products)) => products,
            None => &[],
        }
    }

    /// The grand-total row.
    pub fn grand_total_row(&self) -> Option<&LineItem> {
        self.items.last()
    }
}

/// Carves the line-item table out of the rows following the boundary.
#[derive(Debug, Clone)]
pub struct LineItemTableExtractor {
    truncation_marker: String,
}

impl LineItemTableExtractor {
    pub fn new() -> Self {
        Self {
            truncation_marker: TRUNCATION_MARKER.to_string(),
        }
    }

    /// Extract the table that starts right after `boundary_row`.
    pub fn extract(&self, grid: &Grid, boundary_row: usize) -> ExtractedTable {
        let start = boundary_row + 1;
        let region = grid.rows().get(start..).unwrap_or(&[]);

        let marker_offset = region.iter().position(|row| self.is_marker_row(row));

        let table_rows = match marker_offset {
            Some(offset) => {
                info!("Found {} at row {}", self.truncation_marker, start + offset);
                &region[..offset]
            }
            None => {
                debug!("No {} row, using the whole region", self.truncation_marker);
                region
            }
        };

        let Some((header, body)) = table_rows.split_first() else {
            return ExtractedTable {
                totals: marker_offset.map(|offset| read_totals(&region[offset])),
                marker_row: marker_offset.map(|offset| start + offset),
                ..ExtractedTable::default()
            };
        };

        let columns: Vec<String> = header.iter().map(Cell::render).collect();

        let items: Vec<LineItem> = body
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut item = LineItem::new(start + 1 + i);
                for (label, cell) in columns.iter().zip(row.iter()) {
                    if !label.is_empty() {
                        item.insert(label, cell.clone());
                    }
                }
                item
            })
            .collect();

        info!("Extracted {} line items", items.len());

        ExtractedTable {
            columns,
            items,
            totals: marker_offset.map(|offset| read_totals(&region[offset])),
            marker_row: marker_offset.map(|offset| start + offset),
        }
    }

    fn is_marker_row(&self, row: &[Cell]) -> bool {
        row.iter()
            .any(|cell| cell.render().contains(&self.truncation_marker))
    }
}

impl Default for LineItemTableExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the table with the standard template vocabulary.
pub fn extract_table(grid: &Grid, boundary_row: usize) -> ExtractedTable {
    LineItemTableExtractor::new().extract(grid, boundary_row)
}

/// Read the footer totals from the marker row.
fn read_totals(row: &[Cell]) -> StatedTotals {
    let mut totals = StatedTotals::default();

    for (col, cell) in row.iter().enumerate() {
        let Some(text) = cell.as_text() else {
            continue;
        };
        if text.contains(TOTAL_QUANTITY_MARKER) {
            totals.total_quantity = next_non_blank(row, col).cloned();
            debug!("Total Quantity: {:?}", totals.total_quantity);
        }
        if text.contains(TOTAL_AMOUNT_MARKER) {
            totals.total_amount = next_non_blank(row, col).cloned();
            debug!("Total Amount: {:?}", totals.total_amount);
        }
    }

    totals
}
