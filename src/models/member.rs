//! Member (borrower) model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A registered borrower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub contact: String,
    /// Catalog ids of this member's open loans. Derived state: kept in step
    /// with the loan records by the ledger engine and rebuilt on reload.
    #[serde(default)]
    pub held: HashSet<String>,
    pub outstanding_fine: Decimal,
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (ID: {}, Contact: {}, Fines: ${:.2})",
            self.name, self.id, self.contact, self.outstanding_fine
        )
    }
}
