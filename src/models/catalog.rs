//! Catalog entry (lendable title) model

use serde::{Deserialize, Serialize};
use std::fmt;

/// A lendable title with a total and an available copy count.
///
/// Created on catalog addition with full availability; the copy counts are
/// mutated only by the ledger engine during borrow/return. Invariant:
/// `0 <= available_copies <= total_copies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub creator: String,
    pub year: i32,
    pub total_copies: i64,
    pub available_copies: i64,
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} (ID: {}, Year: {}, Copies: {}/{})",
            self.title, self.creator, self.id, self.year, self.available_copies, self.total_copies
        )
    }
}
