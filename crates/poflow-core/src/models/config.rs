//! Configuration structures for the ingestion pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Allowed absolute difference between calculated and stated totals.
pub const RECONCILIATION_TOLERANCE: i64 = 5;

/// Main configuration for the poflow pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoflowConfig {
    /// Order finalization constants.
    pub order: OrderConfig,

    /// Names resolved against the lookup tables.
    pub lookups: LookupConfig,
}

/// Constants stamped on every canonical order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    /// Currency code, also stripped from the grand-total cell.
    pub currency: String,

    /// Country code for delivery and invoice addresses.
    pub country_code: String,

    /// Mark orders as cash on delivery.
    pub cash_on_delivery: bool,

    /// Allowed difference between calculated and stated totals.
    pub reconciliation_tolerance: Decimal,

    /// Offset from UTC, in minutes, of the midnight the order date maps to.
    pub utc_offset_minutes: i32,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            country_code: "IN".to_string(),
            cash_on_delivery: true,
            reconciliation_tolerance: Decimal::from(RECONCILIATION_TOLERANCE),
            utc_offset_minutes: 0,
        }
    }
}

/// Where an extra field takes its value from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "from", content = "field")]
pub enum ExtraFieldSource {
    /// A header field, by normalized name.
    Header(String),
    /// The configured sender email.
    Sender,
}

/// A custom extra field the order must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraFieldBinding {
    /// Extra field name in the order-management system.
    pub name: String,
    pub source: ExtraFieldSource,
}

/// Names looked up in the collaborator-supplied tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Status new orders are created in.
    pub status_name: String,

    /// Order source the purchase orders belong to.
    pub source_name: String,

    /// Extra fields to populate.
    pub extra_fields: Vec<ExtraFieldBinding>,

    /// Extra field holding the PO number, used for duplicate detection.
    pub po_number_field: String,

    /// Identity of the mailbox the purchase orders arrive from.
    pub sender_email: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            status_name: "New orders".to_string(),
            source_name: "FLIPKART GROCERY".to_string(),
            extra_fields: vec![
                ExtraFieldBinding {
                    name: "PO Number".to_string(),
                    source: ExtraFieldSource::Header("po#".to_string()),
                },
                ExtraFieldBinding {
                    name: "PO Expiry".to_string(),
                    source: ExtraFieldSource::Header("po_expiry".to_string()),
                },
                ExtraFieldBinding {
                    name: "Sender Mail".to_string(),
                    source: ExtraFieldSource::Sender,
                },
            ],
            po_number_field: "PO Number".to_string(),
            sender_email: String::new(),
        }
    }
}

impl PoflowConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PoflowConfig::default();
        assert_eq!(config.order.currency, "INR");
        assert_eq!(config.order.reconciliation_tolerance, Decimal::from(5));
        assert_eq!(config.lookups.extra_fields.len(), 3);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: PoflowConfig =
            serde_json::from_str(r#"{"lookups": {"sender_email": "po@example.com"}}"#).unwrap();
        assert_eq!(config.lookups.sender_email, "po@example.com");
        assert_eq!(config.lookups.status_name, "New orders");
        assert!(config.order.cash_on_delivery);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PoflowConfig::default();
        config.order.utc_offset_minutes = 330;
        config.save(&path).unwrap();

        let loaded = PoflowConfig::from_file(&path).unwrap();
        assert_eq!(loaded.order.utc_offset_minutes, 330);
        assert_eq!(loaded.lookups.extra_fields, config.lookups.extra_fields);
    }
}
