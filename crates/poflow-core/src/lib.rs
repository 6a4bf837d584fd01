//! Core library for purchase-order spreadsheet ingestion.
//!
//! This crate provides:
//! - A cell-grid model and legacy `.xls` workbook decoding
//! - Header field scanning and line-item table extraction
//! - Indian address normalization (PIN code and state)
//! - Canonical order assembly with total reconciliation

pub mod error;
pub mod models;
pub mod order;
pub mod pipeline;
pub mod template;
#[cfg(feature = "workbook")]
pub mod workbook;

pub use error::{AssemblyError, ExtractionError, PoflowError, Result, WorkbookError};
pub use models::config::PoflowConfig;
pub use models::{CanonicalOrder, Cell, Grid, HeaderField, HeaderFields, LineItem, OrderLookups, Product};
pub use order::{AssembledOrder, OrderAssembler, ResolvedLookups};
pub use pipeline::{Checklist, Notice, OrderPipeline, ProcessedOrder, ProcessingError, Stage};
pub use template::{normalize_address, parse_document, DocumentScanner, LineItemTableExtractor, ParsedDocument};
#[cfg(feature = "workbook")]
pub use workbook::{read_first_worksheet, read_workbook_file};
