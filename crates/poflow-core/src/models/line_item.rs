//! Line-item rows taken from the order details table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::grid::Cell;

/// Table columns the order assembler reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineItemColumn {
    Title,
    Ean,
    Quantity,
    TotalAmount,
    SgstRate,
    CgstRate,
    IgstRate,
}

impl LineItemColumn {
    pub const ALL: [LineItemColumn; 7] = [
        LineItemColumn::Title,
        LineItemColumn::Ean,
        LineItemColumn::Quantity,
        LineItemColumn::TotalAmount,
        LineItemColumn::SgstRate,
        LineItemColumn::CgstRate,
        LineItemColumn::IgstRate,
    ];

    /// The three GST components summed into a product tax rate.
    pub const TAX_COMPONENTS: [LineItemColumn; 3] = [
        LineItemColumn::SgstRate,
        LineItemColumn::CgstRate,
        LineItemColumn::IgstRate,
    ];

    /// Column header as printed in the table.
    pub fn label(self) -> &'static str {
        match self {
            LineItemColumn::Title => "Title",
            LineItemColumn::Ean => "FSN/ISBN13",
            LineItemColumn::Quantity => "Quantity",
            LineItemColumn::TotalAmount => "Total Amount",
            LineItemColumn::SgstRate => "SGST/UTGST Rate",
            LineItemColumn::CgstRate => "CGST Rate",
            LineItemColumn::IgstRate => "IGST Rate",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|column| column.label() == label)
    }
}

/// One row of the line-item table.
///
/// Known columns get their own slot; everything else lands in `other`
/// under its verbatim header. Blank cells are never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Zero-based row index in the source grid.
    pub row: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Cell>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ean: Option<Cell>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Cell>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Cell>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sgst_rate: Option<Cell>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgst_rate: Option<Cell>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub igst_rate: Option<Cell>,

    /// Columns outside the known set.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub other: BTreeMap<String, Cell>,
}

impl LineItem {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            ..Self::default()
        }
    }

    fn slot_mut(&mut self, column: LineItemColumn) -> &mut Option<Cell> {
        match column {
            LineItemColumn::Title => &mut self.title,
            LineItemColumn::Ean => &mut self.ean,
            LineItemColumn::Quantity => &mut self.quantity,
            LineItemColumn::TotalAmount => &mut self.total_amount,
            LineItemColumn::SgstRate => &mut self.sgst_rate,
            LineItemColumn::CgstRate => &mut self.cgst_rate,
            LineItemColumn::IgstRate => &mut self.igst_rate,
        }
    }

    /// Store a cell under its column header. Blank cells are skipped.
    pub fn insert(&mut self, label: &str, cell: Cell) {
        if cell.is_blank() {
            return;
        }
        match LineItemColumn::from_label(label) {
            Some(column) => *self.slot_mut(column) = Some(cell),
            None => {
                self.other.insert(label.to_string(), cell);
            }
        }
    }

    pub fn get(&self, column: LineItemColumn) -> Option<&Cell> {
        match column {
            LineItemColumn::Title => self.title.as_ref(),
            LineItemColumn::Ean => self.ean.as_ref(),
            LineItemColumn::Quantity => self.quantity.as_ref(),
            LineItemColumn::TotalAmount => self.total_amount.as_ref(),
            LineItemColumn::SgstRate => self.sgst_rate.as_ref(),
            LineItemColumn::CgstRate => self.cgst_rate.as_ref(),
            LineItemColumn::IgstRate => self.igst_rate.as_ref(),
        }
    }

    /// Look a cell up by its verbatim column header.
    pub fn get_labeled(&self, label: &str) -> Option<&Cell> {
        match LineItemColumn::from_label(label) {
            Some(column) => self.get(column),
            None => self.other.get(label),
        }
    }
}
