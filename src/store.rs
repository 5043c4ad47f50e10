//! In-memory entity store
//!
//! The authoritative owner of the three collections: catalog entries,
//! members and loan records. The ledger engine borrows mutable access for
//! the duration of one operation; the persistence gateway serializes and
//! rebuilds the whole store.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{CatalogEntry, LoanRecord, Member};

/// Width of the numeric part of generated loan identifiers.
const LOAN_ID_WIDTH: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityStore {
    catalog: BTreeMap<String, CatalogEntry>,
    members: BTreeMap<String, Member>,
    loans: BTreeMap<String, LoanRecord>,
}

impl EntityStore {
    /// Insert a new catalog entry with full availability.
    pub fn add_catalog_entry(&mut self, mut entry: CatalogEntry) -> LedgerResult<()> {
        if self.catalog.contains_key(&entry.id) {
            return Err(LedgerError::DuplicateKey(entry.id));
        }
        entry.available_copies = entry.total_copies;
        self.catalog.insert(entry.id.clone(), entry);
        Ok(())
    }

    /// Insert a new member with empty holdings and a zero fine balance.
    pub fn add_member(&mut self, mut member: Member) -> LedgerResult<()> {
        if self.members.contains_key(&member.id) {
            return Err(LedgerError::DuplicateKey(member.id));
        }
        member.held.clear();
        member.outstanding_fine = Decimal::ZERO;
        self.members.insert(member.id.clone(), member);
        Ok(())
    }

    pub fn catalog_entry(&self, id: &str) -> LedgerResult<&CatalogEntry> {
        self.catalog
            .get(id)
            .ok_or_else(|| LedgerError::NotFound(format!("catalog entry {}", id)))
    }

    pub(crate) fn catalog_entry_mut(&mut self, id: &str) -> LedgerResult<&mut CatalogEntry> {
        self.catalog
            .get_mut(id)
            .ok_or_else(|| LedgerError::NotFound(format!("catalog entry {}", id)))
    }

    pub fn member(&self, id: &str) -> LedgerResult<&Member> {
        self.members
            .get(id)
            .ok_or_else(|| LedgerError::NotFound(format!("member {}", id)))
    }

    pub(crate) fn member_mut(&mut self, id: &str) -> LedgerResult<&mut Member> {
        self.members
            .get_mut(id)
            .ok_or_else(|| LedgerError::NotFound(format!("member {}", id)))
    }

    pub fn loan(&self, id: &str) -> LedgerResult<&LoanRecord> {
        self.loans
            .get(id)
            .ok_or_else(|| LedgerError::NotFound(format!("loan {}", id)))
    }

    pub(crate) fn loan_mut(&mut self, id: &str) -> LedgerResult<&mut LoanRecord> {
        self.loans
            .get_mut(id)
            .ok_or_else(|| LedgerError::NotFound(format!("loan {}", id)))
    }

    /// Next loan identifier: `"T"` followed by a zero-padded sequence number.
    ///
    /// Valid only while records are never deleted; deletion is not supported
    /// by this crate.
    pub fn next_loan_id(&self) -> String {
        format!("T{:0width$}", self.loans.len() + 1, width = LOAN_ID_WIDTH)
    }

    // Raw insertion, used by the gateway's reload and the engine's borrow
    // path. Registration goes through the add_* methods above.
    pub(crate) fn insert_catalog_entry(&mut self, entry: CatalogEntry) {
        self.catalog.insert(entry.id.clone(), entry);
    }

    pub(crate) fn insert_member(&mut self, member: Member) {
        self.members.insert(member.id.clone(), member);
    }

    pub(crate) fn insert_loan(&mut self, loan: LoanRecord) {
        self.loans.insert(loan.id.clone(), loan);
    }

    // Removal exists solely for persist-failure rollback; it is not part of
    // the public API, which keeps the loan-id sequence gap-free.
    pub(crate) fn remove_catalog_entry(&mut self, id: &str) {
        self.catalog.remove(id);
    }

    pub(crate) fn remove_member(&mut self, id: &str) {
        self.members.remove(id);
    }

    pub(crate) fn remove_loan(&mut self, id: &str) {
        self.loans.remove(id);
    }

    /// Catalog entries in id order.
    pub fn catalog_entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.catalog.values()
    }

    /// Members in id order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Loan records in id order.
    pub fn loans(&self) -> impl Iterator<Item = &LoanRecord> {
        self.loans.values()
    }

    pub fn catalog_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn loan_count(&self) -> usize {
        self.loans.len()
    }
}
