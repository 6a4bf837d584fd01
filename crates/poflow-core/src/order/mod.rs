//! Order assembly: amounts, dates, lookups and reconciliation.

pub mod amounts;
mod assembler;
pub mod dates;
pub mod lookup;

pub use assembler::{AssembledOrder, OrderAssembler};
pub use lookup::{find_duplicate, resolve_source_id, resolve_status_id, ResolvedExtraField, ResolvedLookups};
