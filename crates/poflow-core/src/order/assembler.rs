//! Canonical order assembly and total reconciliation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::AssemblyError;
use crate::models::config::{ExtraFieldSource, OrderConfig};
use crate::models::{CanonicalOrder, Cell, HeaderField, HeaderFields, LineItem, LineItemColumn, Product};
use crate::template::{ExtractedTable, OrderAddresses};

use super::amounts::{parse_amount, parse_grand_total, parse_quantity, parse_rate, round_money};
use super::dates::order_timestamp;
use super::lookup::ResolvedLookups;

/// An order that passed reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledOrder {
    pub order: CanonicalOrder,

    /// EAN to unit price; a repeated EAN keeps the last price.
    pub sku_prices: BTreeMap<String, Decimal>,

    /// Non-fatal findings, such as a stated quantity that disagrees with the items.
    pub warnings: Vec<String>,
}

/// Builds canonical orders from extracted documents.
#[derive(Debug, Clone, Default)]
pub struct OrderAssembler {
    config: OrderConfig,
}

impl OrderAssembler {
    pub fn new(config: OrderConfig) -> Self {
        Self { config }
    }

    /// Assemble and reconcile an order.
    ///
    /// Every table row except the last becomes a product; the last row carries
    /// the grand total. Fails when the summed line totals differ from the grand
    /// total by more than the configured tolerance.
    pub fn assemble(
        &self,
        fields: &HeaderFields,
        addresses: &OrderAddresses,
        table: &ExtractedTable,
        lookups: &ResolvedLookups,
    ) -> Result<AssembledOrder, AssemblyError> {
        let order_date = fields.text(HeaderField::OrderDate).unwrap_or_default();
        let date_add = order_timestamp(&order_date, self.config.utc_offset_minutes)?;

        let mut products = Vec::with_capacity(table.product_rows().len());
        let mut sku_prices = BTreeMap::new();
        let mut calculated = Decimal::ZERO;

        for item in table.product_rows() {
            let product = build_product(item)?;
            debug!(
                "Row {}: {} x {} @ {} (tax {}%)",
                item.row, product.ean, product.quantity, product.unit_price, product.tax_rate
            );
            calculated = product
                .line_total()
                .and_then(|total| calculated.checked_add(total))
                .ok_or_else(|| overflow_error(item))?;
            sku_prices.insert(product.ean.clone(), product.unit_price);
            products.push(product);
        }

        let totals = table.totals.as_ref().ok_or(AssemblyError::MissingTotals)?;
        let (stated, total_row) = self.grand_total(table)?;

        let difference = calculated
            .checked_sub(stated)
            .ok_or_else(|| overflow_error(total_row))?
            .abs();
        if difference > self.config.reconciliation_tolerance {
            warn!(
                "Total mismatch: calculated {} vs stated {}",
                calculated, stated
            );
            return Err(AssemblyError::ReconciliationMismatch {
                calculated,
                stated,
                difference,
                tolerance: self.config.reconciliation_tolerance,
            });
        }
        info!(
            "Totals reconcile: calculated {} vs stated {} over {} products",
            calculated,
            stated,
            products.len()
        );

        let mut warnings = Vec::new();
        let summed_quantity: u64 = products.iter().map(|p| u64::from(p.quantity)).sum();
        if let Some(stated_quantity) = totals.total_quantity.as_ref().and_then(parse_amount) {
            if stated_quantity != Decimal::from(summed_quantity) {
                let message = format!(
                    "stated total quantity {} does not match item quantities {}",
                    stated_quantity, summed_quantity
                );
                warn!("{}", message);
                warnings.push(message);
            }
        }

        let custom_extra_fields = lookups
            .extra_fields
            .iter()
            .map(|field| {
                let value = match &field.binding.source {
                    ExtraFieldSource::Header(name) => fields.get_named(name).map(Cell::render),
                    ExtraFieldSource::Sender => Some(lookups.sender_email.clone()),
                };
                (field.id, value)
            })
            .collect();

        let order = CanonicalOrder {
            order_status_id: lookups.status_id,
            custom_source_id: lookups.source_id.clone(),
            date_add,
            currency: self.config.currency.clone(),
            payment_method_cod: self.config.cash_on_delivery,
            paid: false,
            email: String::new(),
            phone: String::new(),
            delivery_fullname: String::new(),
            delivery_company: String::new(),
            delivery_address: addresses.shipped_to.address.clone(),
            delivery_state: addresses.shipped_to.region.clone(),
            delivery_postcode: addresses.shipped_to.postal_code.clone(),
            delivery_country_code: self.config.country_code.clone(),
            delivery_point_id: String::new(),
            delivery_point_name: fields.text(HeaderField::SupplierName),
            delivery_point_address: addresses.supplier.address.clone(),
            delivery_point_postcode: addresses.supplier.postal_code.clone(),
            invoice_nip: fields.text(HeaderField::BilledByGstin),
            invoice_company: String::new(),
            invoice_address: addresses.billed_to.address.clone(),
            invoice_state: addresses.billed_to.region.clone(),
            invoice_postcode: addresses.billed_to.postal_code.clone(),
            invoice_country_code: self.config.country_code.clone(),
            products,
            custom_extra_fields,
            calculated_total: calculated,
        };

        Ok(AssembledOrder {
            order,
            sku_prices,
            warnings,
        })
    }

    fn grand_total<'t>(
        &self,
        table: &'t ExtractedTable,
    ) -> Result<(Decimal, &'t LineItem), AssemblyError> {
        let row = table
            .grand_total_row()
            .ok_or(AssemblyError::MissingGrandTotal)?;
        let cell = required(row, LineItemColumn::TotalAmount)?;
        let total = parse_grand_total(cell, &self.config.currency)
            .ok_or_else(|| numeric_error(row, LineItemColumn::TotalAmount, cell))?;
        Ok((total, row))
    }
}

fn build_product(item: &LineItem) -> Result<Product, AssemblyError> {
    let name = item.get(LineItemColumn::Title).map(Cell::render).unwrap_or_default();

    let ean: String = required(item, LineItemColumn::Ean)?
        .render()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let quantity_cell = required(item, LineItemColumn::Quantity)?;
    let quantity = parse_quantity(quantity_cell)
        .filter(|q| *q > 0)
        .ok_or_else(|| numeric_error(item, LineItemColumn::Quantity, quantity_cell))?;

    let amount_cell = required(item, LineItemColumn::TotalAmount)?;
    let amount = parse_amount(amount_cell)
        .ok_or_else(|| numeric_error(item, LineItemColumn::TotalAmount, amount_cell))?;

    let tax_rate = LineItemColumn::TAX_COMPONENTS
        .iter()
        .try_fold(Decimal::ZERO, |sum, &column| match item.get(column) {
            None => Ok(sum),
            Some(cell) => parse_rate(cell)
                .and_then(|rate| sum.checked_add(rate))
                .ok_or_else(|| numeric_error(item, column, cell)),
        })?;

    Ok(Product {
        name,
        ean,
        unit_price: round_money(amount / Decimal::from(quantity)),
        tax_rate,
        quantity,
    })
}

fn required(item: &LineItem, column: LineItemColumn) -> Result<&Cell, AssemblyError> {
    item.get(column).ok_or_else(|| AssemblyError::MissingValue {
        field: column.label().to_string(),
        row: item.row,
    })
}

fn numeric_error(item: &LineItem, column: LineItemColumn, cell: &Cell) -> AssemblyError {
    AssemblyError::NumericParse {
        field: column.label().to_string(),
        row: item.row,
        value: cell.render(),
    }
}

/// Amounts too large to total are reported against the row's total amount.
fn overflow_error(item: &LineItem) -> AssemblyError {
    AssemblyError::NumericParse {
        field: LineItemColumn::TotalAmount.label().to_string(),
        row: item.row,
        value: item
            .get(LineItemColumn::TotalAmount)
            .map(Cell::render)
            .unwrap_or_default(),
    }
}
