//! Resolution of configured names against the collaborator lookup tables.

use tracing::{debug, warn};

use crate::error::{AssemblyError, ExtractionError};
use crate::models::config::{ExtraFieldBinding, LookupConfig};
use crate::models::{ExistingOrder, ExtraFieldDef, OrderLookups, OrderSource, OrderStatus};

/// Status id for `name`, compared case-insensitively. First match wins.
pub fn resolve_status_id(statuses: &[OrderStatus], name: &str) -> Option<i64> {
    let wanted = name.to_lowercase();
    statuses
        .iter()
        .find(|status| status.name.to_lowercase() == wanted)
        .map(|status| status.id)
}

/// Source id for `name`, compared exactly. First match wins.
pub fn resolve_source_id<'a>(sources: &'a [OrderSource], name: &str) -> Option<&'a str> {
    sources
        .iter()
        .find(|source| source.name == name)
        .map(|source| source.id.as_str())
}

/// Extra field id for `name`, compared exactly. First match wins.
pub fn resolve_extra_field_id(defs: &[ExtraFieldDef], name: &str) -> Option<i64> {
    defs.iter().find(|def| def.name == name).map(|def| def.id)
}

/// An extra field binding with its resolved id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExtraField {
    pub id: i64,
    pub binding: ExtraFieldBinding,
}

/// Identifiers the assembler stamps on an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLookups {
    pub status_id: i64,
    pub source_id: String,
    pub extra_fields: Vec<ResolvedExtraField>,

    /// Populates extra fields bound to the sender.
    pub sender_email: String,

    /// Extra fields that could not be resolved and will be left off the order.
    pub missing: Vec<ExtractionError>,
}

impl ResolvedLookups {
    /// Resolve the configured names.
    ///
    /// An unknown status or source is fatal. An unknown extra field is
    /// recorded in `missing` and skipped.
    pub fn resolve(lookups: &OrderLookups, config: &LookupConfig) -> Result<Self, AssemblyError> {
        let status_id = resolve_status_id(&lookups.statuses, &config.status_name)
            .ok_or_else(|| AssemblyError::UnresolvedStatus(config.status_name.clone()))?;
        debug!("Status {:?} -> {}", config.status_name, status_id);

        let source_id = resolve_source_id(&lookups.sources, &config.source_name)
            .ok_or_else(|| AssemblyError::UnresolvedSource(config.source_name.clone()))?
            .to_string();
        debug!("Source {:?} -> {}", config.source_name, source_id);

        let mut extra_fields = Vec::new();
        let mut missing = Vec::new();

        for binding in &config.extra_fields {
            match resolve_extra_field_id(&lookups.extra_fields, &binding.name) {
                Some(id) => extra_fields.push(ResolvedExtraField {
                    id,
                    binding: binding.clone(),
                }),
                None => {
                    warn!("Extra field {:?} not found", binding.name);
                    missing.push(ExtractionError::MissingField(binding.name.clone()));
                }
            }
        }

        Ok(Self {
            status_id,
            source_id,
            extra_fields,
            sender_email: config.sender_email.clone(),
            missing,
        })
    }

    /// Id of the extra field named `name`, if it resolved.
    pub fn extra_field_id(&self, name: &str) -> Option<i64> {
        self.extra_fields
            .iter()
            .find(|field| field.binding.name == name)
            .map(|field| field.id)
    }
}

/// First existing order whose PO-number extra field equals `po_number`.
pub fn find_duplicate<'a>(
    existing: &'a [ExistingOrder],
    po_field_id: i64,
    po_number: &str,
) -> Option<&'a ExistingOrder> {
    let key = po_field_id.to_string();
    existing.iter().find(|order| {
        order
            .custom_extra_fields
            .get(&key)
            .is_some_and(|value| value == po_number)
    })
}
