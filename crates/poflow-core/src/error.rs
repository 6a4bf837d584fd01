//! Error types for the poflow-core library.

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the poflow library.
#[derive(Error, Debug)]
pub enum PoflowError {
    /// Grid scanning or table extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Order assembly or reconciliation error.
    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Workbook decoding error.
    #[error("workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while locating sections and fields in the grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The section boundary marker never appeared in the grid.
    #[error("could not find {marker} section in the document")]
    MissingSection { marker: String },

    /// A required extra field could not be resolved. Reported, never fatal.
    #[error("missing extra field: {0}")]
    MissingField(String),
}

/// Errors raised while building the canonical order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    /// Calculated and stated totals differ by more than the tolerance.
    #[error(
        "calculated total {calculated} does not match stated total {stated} \
         (difference {difference}, tolerance {tolerance})"
    )]
    ReconciliationMismatch {
        calculated: Decimal,
        stated: Decimal,
        difference: Decimal,
        tolerance: Decimal,
    },

    /// The totals footer row was never found, so nothing can be reconciled.
    #[error("no totals row found after the line items")]
    MissingTotals,

    /// The line-item table has no grand-total row.
    #[error("line-item table has no grand total row")]
    MissingGrandTotal,

    /// The order date does not match the DD-MM-YY pattern.
    #[error("failed to parse order date: {value:?}")]
    DateParse { value: String },

    /// An amount, rate or quantity is not a number.
    #[error("failed to parse {field} on row {row}: {value:?}")]
    NumericParse {
        field: String,
        row: usize,
        value: String,
    },

    /// A required line-item cell is blank.
    #[error("missing {field} on row {row}")]
    MissingValue { field: String, row: usize },

    /// The configured order status is not in the status list.
    #[error("order status {0:?} not found")]
    UnresolvedStatus(String),

    /// The configured order source is not in the source list.
    #[error("order source {0:?} not found")]
    UnresolvedSource(String),
}

/// Errors related to workbook decoding.
#[derive(Error, Debug)]
pub enum WorkbookError {
    /// The bytes are not a readable legacy workbook.
    #[error("failed to open workbook: {0}")]
    Open(String),

    /// The workbook has no worksheet.
    #[error("workbook has no worksheets")]
    NoWorksheet,

    /// The first worksheet could not be read.
    #[error("failed to read worksheet: {0}")]
    Read(String),
}

/// Result type for the poflow library.
pub type Result<T> = std::result::Result<T, PoflowError>;
