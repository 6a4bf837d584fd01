//! Purchase-order template parsing: header scan, line-item table and addresses.

mod address;
pub mod patterns;
mod scanner;
mod table;

pub use address::{normalize_address, OrderAddresses};
pub use scanner::{scan, DocumentScanner, ScanResult};
pub use table::{extract_table, ExtractedTable, LineItemTableExtractor};

use crate::error::ExtractionError;
use crate::models::Grid;

/// Everything read off a purchase-order grid before assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub scan: ScanResult,
    pub table: ExtractedTable,
    pub addresses: OrderAddresses,
}

/// Run the header scan, table extraction and address normalization in order.
pub fn parse_document(grid: &Grid) -> Result<ParsedDocument, ExtractionError> {
    let scanned = scan(grid)?;
    let table = extract_table(grid, scanned.boundary_row);
    let addresses = OrderAddresses::from_fields(&scanned.fields);

    Ok(ParsedDocument {
        scan: scanned,
        table,
        addresses,
    })
}
