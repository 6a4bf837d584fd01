//! Header fields collected from the top of a purchase order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::grid::Cell;

/// Normalize a sheet label into a field name.
///
/// Lower-cases, turns whitespace runs into single underscores and drops
/// leading, trailing and repeated underscores (`"PO Expiry"` becomes `"po_expiry"`).
pub fn normalize_field_name(label: &str) -> String {
    let lowered = label.trim().to_lowercase();
    let underscored = lowered.split_whitespace().collect::<Vec<_>>().join("_");
    underscored
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Header fields known to the purchase-order template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    PoNumber,
    NatureOfSupply,
    NatureOfTransaction,
    PoExpiry,
    Category,
    OrderDate,
    SupplierName,
    SupplierAddress,
    SupplierContact,
    BilledBy,
    ShippedFrom,
    BilledToAddress,
    ShippedToAddress,
    ModeOfPayment,
    ContractRefId,
    ContractVersion,
    CreditTerm,
    /// Any label containing `EMAIL`.
    SupplierEmail,
    /// Any label containing `GSTIN`.
    BilledByGstin,
    /// Any label containing `State Code`.
    BilledByStateCode,
}

impl HeaderField {
    /// Fields matched by an exact label in the sheet.
    pub const EXACT: [HeaderField; 17] = [
        HeaderField::PoNumber,
        HeaderField::NatureOfSupply,
        HeaderField::NatureOfTransaction,
        HeaderField::PoExpiry,
        HeaderField::Category,
        HeaderField::OrderDate,
        HeaderField::SupplierName,
        HeaderField::SupplierAddress,
        HeaderField::SupplierContact,
        HeaderField::BilledBy,
        HeaderField::ShippedFrom,
        HeaderField::BilledToAddress,
        HeaderField::ShippedToAddress,
        HeaderField::ModeOfPayment,
        HeaderField::ContractRefId,
        HeaderField::ContractVersion,
        HeaderField::CreditTerm,
    ];

    /// Fields matched by a substring anywhere in a cell, with the substring.
    pub const CONTAINS: [(&'static str, HeaderField); 3] = [
        ("EMAIL", HeaderField::SupplierEmail),
        ("GSTIN", HeaderField::BilledByGstin),
        ("State Code", HeaderField::BilledByStateCode),
    ];

    /// The label as printed on the sheet.
    pub fn label(self) -> &'static str {
        match self {
            HeaderField::PoNumber => "PO#",
            HeaderField::NatureOfSupply => "Nature Of Supply",
            HeaderField::NatureOfTransaction => "Nature of Transaction",
            HeaderField::PoExpiry => "PO Expiry",
            HeaderField::Category => "CATEGORY",
            HeaderField::OrderDate => "ORDER DATE",
            HeaderField::SupplierName => "SUPPLIER NAME",
            HeaderField::SupplierAddress => "SUPPLIER ADDRESS",
            HeaderField::SupplierContact => "SUPPLIER CONTACT",
            HeaderField::BilledBy => "Billed by",
            HeaderField::ShippedFrom => "Shipped From",
            HeaderField::BilledToAddress => "BILLED TO ADDRESS",
            HeaderField::ShippedToAddress => "SHIPPED TO ADDRESS",
            HeaderField::ModeOfPayment => "MODE OF PAYMENT",
            HeaderField::ContractRefId => "CONTRACT REF ID",
            HeaderField::ContractVersion => "CONTRACT VERSION",
            HeaderField::CreditTerm => "CREDIT TERM",
            HeaderField::SupplierEmail => "Supplier EMAIL",
            HeaderField::BilledByGstin => "Billed By GSTIN",
            HeaderField::BilledByStateCode => "Billed By State Code",
        }
    }

    /// The normalized field name.
    pub fn key(self) -> String {
        normalize_field_name(self.label())
    }

    /// Look a field up by its normalized name.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::EXACT
            .iter()
            .copied()
            .chain(Self::CONTAINS.iter().map(|(_, field)| *field))
            .find(|field| field.key() == key)
    }

    /// Field whose exact label is `text`.
    pub fn from_label(text: &str) -> Option<Self> {
        Self::EXACT.iter().copied().find(|field| field.label() == text)
    }
}

/// Header values keyed by field, with last-write-wins semantics.
///
/// A field that was seen without a value to its right is stored as absent,
/// which also clears any earlier value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderFields {
    values: BTreeMap<HeaderField, Cell>,
    /// Values for names outside the template schema.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    overflow: BTreeMap<String, Cell>,
}

impl HeaderFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value for a known field.
    pub fn set(&mut self, field: HeaderField, value: Option<Cell>) {
        match value {
            Some(cell) => {
                self.values.insert(field, cell);
            }
            None => {
                self.values.remove(&field);
            }
        }
    }

    /// Record a value under an arbitrary name, routing known names to their slot.
    pub fn set_named(&mut self, name: &str, value: Option<Cell>) {
        let key = normalize_field_name(name);
        if let Some(field) = HeaderField::from_key(&key) {
            self.set(field, value);
        } else {
            match value {
                Some(cell) => {
                    self.overflow.insert(key, cell);
                }
                None => {
                    self.overflow.remove(&key);
                }
            }
        }
    }

    pub fn get(&self, field: HeaderField) -> Option<&Cell> {
        self.values.get(&field)
    }

    /// Look a value up by name; the name is normalized first.
    pub fn get_named(&self, name: &str) -> Option<&Cell> {
        let key = normalize_field_name(name);
        match HeaderField::from_key(&key) {
            Some(field) => self.get(field),
            None => self.overflow.get(&key),
        }
    }

    /// The value rendered as text, if present.
    pub fn text(&self, field: HeaderField) -> Option<String> {
        self.get(field).map(Cell::render)
    }

    /// Number of fields holding a value.
    pub fn len(&self) -> usize {
        self.values.len() + self.overflow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Totals printed in the footer row below the line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatedTotals {
    /// Value next to `Total Quantity=`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_quantity: Option<Cell>,
    /// Value next to `Total=`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Cell>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_field_name() {
        assert_eq!(normalize_field_name("PO#"), "po#");
        assert_eq!(normalize_field_name("  PO   Expiry "), "po_expiry");
        assert_eq!(normalize_field_name("Total Quantity="), "total_quantity=");
        assert_eq!(normalize_field_name("_Billed__by_"), "billed_by");
        assert_eq!(normalize_field_name(""), "");
    }

    #[test]
    fn test_keys_round_trip_through_lookup() {
        for field in HeaderField::EXACT {
            assert_eq!(HeaderField::from_key(&field.key()), Some(field));
        }
        assert_eq!(HeaderField::BilledByGstin.key(), "billed_by_gstin");
        assert_eq!(HeaderField::from_key("nope"), None);
    }

    #[test]
    fn test_last_write_wins_including_absent() {
        let mut fields = HeaderFields::new();
        fields.set(HeaderField::PoNumber, Some(Cell::from("A")));
        fields.set(HeaderField::PoNumber, Some(Cell::from("B")));
        assert_eq!(fields.text(HeaderField::PoNumber).as_deref(), Some("B"));

        fields.set(HeaderField::PoNumber, None);
        assert_eq!(fields.get(HeaderField::PoNumber), None);
    }

    #[test]
    fn test_named_access_uses_slots_and_overflow() {
        let mut fields = HeaderFields::new();
        fields.set_named("PO Expiry", Some(Cell::from("31-01-24")));
        fields.set_named("Vendor Code", Some(Cell::from("V-9")));

        assert_eq!(fields.get(HeaderField::PoExpiry), Some(&Cell::from("31-01-24")));
        assert_eq!(fields.get_named("po_expiry"), Some(&Cell::from("31-01-24")));
        assert_eq!(fields.get_named("vendor code"), Some(&Cell::from("V-9")));
        assert_eq!(fields.len(), 2);
    }
}
