//! Data models for grids, extracted fields, line items and orders.

pub mod config;
pub mod fields;
pub mod grid;
pub mod line_item;
pub mod lookup;
pub mod order;

pub use fields::{normalize_field_name, HeaderField, HeaderFields, StatedTotals};
pub use grid::{next_non_blank, Cell, Grid};
pub use line_item::{LineItem, LineItemColumn};
pub use lookup::{ExistingOrder, ExtraFieldDef, OrderLookups, OrderSource, OrderStatus};
pub use order::{CanonicalOrder, NormalizedAddress, Product};
