//! Canonical order record handed to the order-management API.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A free-text address split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedAddress {
    /// Address text with postal code, region and GSTIN label removed.
    pub address: String,

    /// Six-digit postal code (PIN).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    /// State or union territory name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl NormalizedAddress {
    /// Check if the address has any data.
    pub fn is_empty(&self) -> bool {
        self.address.is_empty() && self.postal_code.is_none() && self.region.is_none()
    }
}

/// A product line on the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,

    /// EAN/FSN code with all whitespace removed.
    pub ean: String,

    /// Gross unit price, two decimal places.
    #[serde(rename = "price_brutto", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// Sum of the SGST/UTGST, CGST and IGST percentages.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_rate: Decimal,

    pub quantity: u32,
}

impl Product {
    /// Unit price times quantity, rounded to two places; `None` on overflow.
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .map(crate::order::amounts::round_money)
    }
}

/// Serialize booleans as the `"1"`/`"0"` flags the order API expects.
mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "1" } else { "0" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw == "1")
    }
}

/// The finished order, laid out as the flat mapping the order API accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalOrder {
    pub order_status_id: i64,
    pub custom_source_id: String,

    /// Order date as a unix timestamp.
    pub date_add: i64,
    pub currency: String,

    #[serde(with = "flag")]
    pub payment_method_cod: bool,
    #[serde(with = "flag")]
    pub paid: bool,

    pub email: String,
    pub phone: String,

    pub delivery_fullname: String,
    pub delivery_company: String,
    pub delivery_address: String,
    pub delivery_state: Option<String>,
    pub delivery_postcode: Option<String>,
    pub delivery_country_code: String,

    pub delivery_point_id: String,
    pub delivery_point_name: Option<String>,
    pub delivery_point_address: String,
    pub delivery_point_postcode: Option<String>,

    /// Supplier GSTIN.
    pub invoice_nip: Option<String>,
    pub invoice_company: String,
    pub invoice_address: String,
    pub invoice_state: Option<String>,
    pub invoice_postcode: Option<String>,
    pub invoice_country_code: String,

    pub products: Vec<Product>,

    /// Extra field id to value.
    pub custom_extra_fields: BTreeMap<i64, Option<String>>,

    /// Sum of per-product rounded line totals.
    #[serde(skip)]
    pub calculated_total: Decimal,
}

impl CanonicalOrder {
    /// Total number of units across all products.
    pub fn total_quantity(&self) -> u64 {
        self.products.iter().map(|p| u64::from(p.quantity)).sum()
    }
}
