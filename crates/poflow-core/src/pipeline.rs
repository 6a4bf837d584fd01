//! End-to-end processing of one purchase-order document.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::{ExtractionError, PoflowError};
use crate::models::config::{ExtraFieldSource, PoflowConfig};
use crate::models::{CanonicalOrder, Cell, Grid, HeaderField, HeaderFields, OrderLookups};
use crate::order::{find_duplicate, AssembledOrder, OrderAssembler, ResolvedLookups};
use crate::template::parse_document;

/// Processing stages, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ResolveStatus,
    ResolveSource,
    ResolveExtraFields,
    ParseFile,
    DuplicateCheck,
    BuildOrder,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::ResolveStatus,
        Stage::ResolveSource,
        Stage::ResolveExtraFields,
        Stage::ParseFile,
        Stage::DuplicateCheck,
        Stage::BuildOrder,
    ];

    pub fn description(self) -> &'static str {
        match self {
            Stage::ResolveStatus => "Resolve order status",
            Stage::ResolveSource => "Resolve order source",
            Stage::ResolveExtraFields => "Resolve extra fields",
            Stage::ParseFile => "Parse purchase order",
            Stage::DuplicateCheck => "Check for duplicate order",
            Stage::BuildOrder => "Build order",
        }
    }
}

/// Stages completed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Checklist {
    completed: Vec<Stage>,
}

impl Checklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn complete(&mut self, stage: Stage) {
        debug!("Completed: {}", stage.description());
        if !self.completed.contains(&stage) {
            self.completed.push(stage);
        }
    }

    pub fn is_complete(&self, stage: Stage) -> bool {
        self.completed.contains(&stage)
    }

    pub fn completed(&self) -> &[Stage] {
        &self.completed
    }

    /// First stage that has not completed.
    pub fn next_pending(&self) -> Option<Stage> {
        Stage::ALL.into_iter().find(|stage| !self.is_complete(*stage))
    }
}

impl fmt::Display for Checklist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stage in Stage::ALL {
            let mark = if self.is_complete(stage) { "x" } else { " " };
            writeln!(f, "[{}] {}", mark, stage.description())?;
        }
        Ok(())
    }
}

/// A non-fatal finding reported alongside a processed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// An extra field is not defined in the order-management system.
    MissingField { name: String },
    /// An order with the same PO number already exists.
    DuplicateOrder { order_id: i64, po_number: String },
    Warning { message: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::MissingField { name } => write!(f, "missing extra field: {}", name),
            Notice::DuplicateOrder {
                order_id,
                po_number,
            } => write!(f, "PO {} already exists as order {}", po_number, order_id),
            Notice::Warning { message } => f.write_str(message),
        }
    }
}

impl From<ExtractionError> for Notice {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::MissingField(name) => Notice::MissingField { name },
            other => Notice::Warning {
                message: other.to_string(),
            },
        }
    }
}

/// A document that made it all the way to a reconciled order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedOrder {
    pub order: CanonicalOrder,

    /// PO number read from the header.
    pub po_number: Option<String>,

    /// EAN to unit price.
    pub sku_prices: BTreeMap<String, Decimal>,

    pub notices: Vec<Notice>,
    pub checklist: Checklist,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// A failed document, with the stages it got through.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ProcessingError {
    #[source]
    pub source: PoflowError,
    pub checklist: Checklist,
}

/// Runs lookups, parsing, duplicate detection and assembly for one document.
#[derive(Debug, Clone, Default)]
pub struct OrderPipeline {
    config: PoflowConfig,
}

impl OrderPipeline {
    pub fn new(config: PoflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PoflowConfig {
        &self.config
    }

    /// Process a decoded grid.
    pub fn process(
        &self,
        grid: &Grid,
        lookups: &OrderLookups,
    ) -> Result<ProcessedOrder, ProcessingError> {
        let start = start_timer();
        let mut checklist = Checklist::new();

        match self.run(grid, lookups, &mut checklist) {
            Ok((assembled, po_number, notices)) => {
                let processing_time_ms = start
                    .map(|s| s.elapsed().as_millis() as u64)
                    .unwrap_or_default();
                info!(
                    "Processed order with {} products in {} ms",
                    assembled.order.products.len(),
                    processing_time_ms
                );
                Ok(ProcessedOrder {
                    order: assembled.order,
                    po_number,
                    sku_prices: assembled.sku_prices,
                    notices,
                    checklist,
                    processing_time_ms,
                })
            }
            Err(source) => {
                warn!(
                    "Processing failed at {:?}: {}",
                    checklist.next_pending(),
                    source
                );
                Err(ProcessingError { source, checklist })
            }
        }
    }

    /// Decode an `.xls` workbook and process its first worksheet.
    #[cfg(feature = "workbook")]
    pub fn process_workbook(
        &self,
        bytes: &[u8],
        lookups: &OrderLookups,
    ) -> Result<ProcessedOrder, ProcessingError> {
        let grid = crate::workbook::read_first_worksheet(bytes).map_err(|e| ProcessingError {
            source: e.into(),
            checklist: Checklist::new(),
        })?;
        self.process(&grid, lookups)
    }

    fn run(
        &self,
        grid: &Grid,
        lookups: &OrderLookups,
        checklist: &mut Checklist,
    ) -> Result<(AssembledOrder, Option<String>, Vec<Notice>), PoflowError> {
        let resolved = ResolvedLookups::resolve(lookups, &self.config.lookups)?;
        checklist.complete(Stage::ResolveStatus);
        checklist.complete(Stage::ResolveSource);

        let mut notices: Vec<Notice> = resolved.missing.iter().cloned().map(Notice::from).collect();
        checklist.complete(Stage::ResolveExtraFields);

        let document = parse_document(grid)?;
        checklist.complete(Stage::ParseFile);

        if let Some(notice) = self.check_duplicate(&document.scan.fields, &resolved, lookups) {
            warn!("{}", notice);
            notices.push(notice);
        }
        checklist.complete(Stage::DuplicateCheck);

        let assembled = OrderAssembler::new(self.config.order.clone()).assemble(
            &document.scan.fields,
            &document.addresses,
            &document.table,
            &resolved,
        )?;
        notices.extend(
            assembled
                .warnings
                .iter()
                .map(|message| Notice::Warning {
                    message: message.clone(),
                }),
        );
        checklist.complete(Stage::BuildOrder);

        let po_number = document.scan.fields.text(HeaderField::PoNumber);
        Ok((assembled, po_number, notices))
    }

    fn check_duplicate(
        &self,
        fields: &HeaderFields,
        resolved: &ResolvedLookups,
        lookups: &OrderLookups,
    ) -> Option<Notice> {
        let po_field = &self.config.lookups.po_number_field;
        let Some(binding) = resolved
            .extra_fields
            .iter()
            .find(|field| &field.binding.name == po_field)
        else {
            debug!("PO number field {:?} unresolved, skipping duplicate check", po_field);
            return None;
        };

        let po_number = match &binding.binding.source {
            ExtraFieldSource::Header(name) => fields.get_named(name).map(Cell::render)?,
            ExtraFieldSource::Sender => resolved.sender_email.clone(),
        };

        find_duplicate(&lookups.existing_orders, binding.id, &po_number).map(|existing| {
            Notice::DuplicateOrder {
                order_id: existing.order_id,
                po_number,
            }
        })
    }
}

/// The clock is unavailable on `wasm32-unknown-unknown`; callers there time externally.
#[cfg(not(target_arch = "wasm32"))]
fn start_timer() -> Option<Instant> {
    Some(Instant::now())
}

#[cfg(target_arch = "wasm32")]
fn start_timer() -> Option<Instant> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssemblyError;
    use crate::models::{ExistingOrder, ExtraFieldDef, OrderSource, OrderStatus};
    use pretty_assertions::assert_eq;

    fn t(s: &str) -> Cell {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::from(s)
        }
    }

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| t(c)).collect()
    }

    fn sample_grid(grand_total: &str) -> Grid {
        Grid::new(vec![
            row(&["PO#", "FKPO777", "PO Expiry", "31-01-24"]),
            row(&["ORDER DATE", "05-01-24"]),
            row(&["SHIPPED TO ADDRESS", "FC Kolkata, West Bengal 711302"]),
            row(&["ORDER DETAILS"]),
            row(&["FSN/ISBN13", "Title", "Quantity", "Total Amount", "IGST Rate"]),
            row(&["SUGAR 1", "Sugar 1kg", "4", "180", "5%"]),
            row(&["", "", "", grand_total]),
            row(&["Important Notification", "Total Quantity=", "4", "Total=", grand_total]),
        ])
    }

    fn lookups() -> OrderLookups {
        OrderLookups {
            statuses: vec![OrderStatus { id: 3, name: "new orders".to_string() }],
            sources: vec![OrderSource { id: "9".to_string(), name: "FLIPKART GROCERY".to_string() }],
            extra_fields: vec![
                ExtraFieldDef { id: 41, name: "PO Number".to_string() },
                ExtraFieldDef { id: 42, name: "Sender Mail".to_string() },
            ],
            existing_orders: Vec::new(),
        }
    }

    #[test]
    fn test_process_success() {
        let processed = OrderPipeline::default()
            .process(&sample_grid("INR 180.00"), &lookups())
            .unwrap();

        assert_eq!(processed.order.order_status_id, 3);
        assert_eq!(processed.po_number.as_deref(), Some("FKPO777"));
        assert_eq!(processed.order.products.len(), 1);
        assert_eq!(processed.order.delivery_state.as_deref(), Some("West Bengal"));
        assert_eq!(processed.checklist.completed(), &Stage::ALL[..]);
        assert_eq!(
            processed.notices,
            vec![Notice::MissingField {
                name: "PO Expiry".to_string()
            }]
        );
    }

    #[test]
    fn test_duplicate_is_reported() {
        let mut lookups = lookups();
        lookups.existing_orders.push(ExistingOrder {
            order_id: 5001,
            custom_extra_fields: [("41".to_string(), "FKPO777".to_string())].into(),
        });

        let processed = OrderPipeline::default()
            .process(&sample_grid("INR 180.00"), &lookups)
            .unwrap();
        assert!(processed.notices.contains(&Notice::DuplicateOrder {
            order_id: 5001,
            po_number: "FKPO777".to_string(),
        }));
    }

    #[test]
    fn test_failure_keeps_checklist() {
        let err = OrderPipeline::default()
            .process(&sample_grid("INR 190.00"), &lookups())
            .unwrap_err();

        assert!(matches!(
            err.source,
            PoflowError::Assembly(AssemblyError::ReconciliationMismatch { .. })
        ));
        assert!(err.checklist.is_complete(Stage::DuplicateCheck));
        assert_eq!(err.checklist.next_pending(), Some(Stage::BuildOrder));
    }

    #[test]
    fn test_missing_section_stops_before_parse() {
        let grid = Grid::new(vec![row(&["PO#", "FKPO1"])]);
        let err = OrderPipeline::default().process(&grid, &lookups()).unwrap_err();

        assert!(matches!(
            err.source,
            PoflowError::Extraction(ExtractionError::MissingSection { .. })
        ));
        assert_eq!(err.checklist.next_pending(), Some(Stage::ParseFile));
    }

    #[test]
    fn test_unresolved_status_fails_first() {
        let mut lookups = lookups();
        lookups.statuses.clear();
        let err = OrderPipeline::default()
            .process(&sample_grid("INR 180.00"), &lookups)
            .unwrap_err();

        assert!(err.checklist.completed().is_empty());
    }

    #[test]
    fn test_checklist_display() {
        let mut checklist = Checklist::new();
        checklist.complete(Stage::ResolveStatus);
        let text = checklist.to_string();

        assert!(text.starts_with("[x] Resolve order status\n[ ] Resolve order source"));
    }
}
