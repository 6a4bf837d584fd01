//! Identifier tables supplied by the order-management system.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An order status known to the order-management system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatus {
    pub id: i64,
    pub name: String,
}

/// A personal order source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSource {
    pub id: String,
    pub name: String,
}

/// A custom extra field definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraFieldDef {
    #[serde(alias = "extra_field_id")]
    pub id: i64,
    pub name: String,
}

/// An order already present in the order-management system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingOrder {
    pub order_id: i64,

    /// Extra field id (as text) to value.
    #[serde(default)]
    pub custom_extra_fields: BTreeMap<String, String>,
}

/// Everything the collaborators fetched before a document is processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLookups {
    #[serde(default)]
    pub statuses: Vec<OrderStatus>,

    #[serde(default)]
    pub sources: Vec<OrderSource>,

    #[serde(default)]
    pub extra_fields: Vec<ExtraFieldDef>,

    /// Orders from the same source, used to spot duplicate purchase orders.
    #[serde(default)]
    pub existing_orders: Vec<ExistingOrder>,
}

impl OrderLookups {
    /// Load lookup tables from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
