//! Read-only report aggregates

use rust_decimal::Decimal;
use serde::Serialize;

/// Point-in-time aggregate over the entity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSnapshot {
    pub catalog_entries: i64,
    pub total_copies: i64,
    pub available_copies: i64,
    pub members: i64,
    pub outstanding_fines: Decimal,
    pub open_loans: i64,
}
