//! Loan record model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The record of one copy lent to one member.
///
/// A record is open until returned. The return transition happens exactly
/// once, setting the return date and the assessed fine; the record is
/// immutable afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: String,
    pub catalog_id: String,
    pub member_id: String,
    pub borrow_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub fine: Decimal,
}

impl LoanRecord {
    /// An open loan has not been returned yet.
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

impl fmt::Display for LoanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_open() { "Borrowed" } else { "Returned" };
        write!(
            f,
            "Loan {}: entry {} by member {} ({})",
            self.id, self.catalog_id, self.member_id, status
        )
    }
}
