//! Ledger engine: the borrow/return state machine
//!
//! Owns the entity store and the persistence gateway. Every mutating
//! operation checks its preconditions before touching any state, applies the
//! mutation in memory, then persists the full store; a failed persist is
//! rolled back so the in-memory and durable states never diverge.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::config::DatabaseConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{CatalogEntry, LoanRecord, Member, ReportSnapshot};
use crate::repository::LedgerRepository;
use crate::store::EntityStore;
use crate::validation;

/// Maximum simultaneous open loans per member.
pub const BORROW_LIMIT: usize = 3;

/// Days a copy may be kept before the daily fine starts accruing.
pub const GRACE_PERIOD_DAYS: i64 = 14;

/// Fine per day past the grace period, in currency units.
pub const DAILY_FINE: Decimal = Decimal::ONE;

/// Fine owed for a loan held `days_borrowed` calendar days.
fn late_fine(days_borrowed: i64) -> Decimal {
    Decimal::from((days_borrowed - GRACE_PERIOD_DAYS).max(0)) * DAILY_FINE
}

/// The lending ledger: catalog, members and loan history behind one
/// serialized mutation surface.
pub struct Ledger {
    store: EntityStore,
    repository: LedgerRepository,
}

impl Ledger {
    /// Open the ledger: connect to the database, apply the schema, and
    /// rebuild the in-memory store from durable state.
    pub async fn open(config: &DatabaseConfig) -> LedgerResult<Self> {
        let repository = LedgerRepository::connect(&config.url).await?;
        let store = repository.reload().await?;
        tracing::info!(
            "Ledger opened: {} catalog entries, {} members, {} loans",
            store.catalog_count(),
            store.member_count(),
            store.loan_count()
        );
        Ok(Self { store, repository })
    }

    /// Read-only view of the entity store, for listings and reports.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Register a new catalog entry with `copies` copies, all available.
    pub async fn register_catalog_entry(
        &mut self,
        id: &str,
        title: &str,
        creator: &str,
        year: i32,
        copies: i64,
    ) -> LedgerResult<()> {
        if !validation::valid_catalog_id(id) {
            return Err(LedgerError::Validation(format!("invalid catalog id: {}", id)));
        }
        if copies < 0 {
            return Err(LedgerError::Validation(format!(
                "negative copy count: {}",
                copies
            )));
        }

        self.store.add_catalog_entry(CatalogEntry {
            id: id.to_string(),
            title: title.to_string(),
            creator: creator.to_string(),
            year,
            total_copies: copies,
            available_copies: copies,
        })?;

        if let Err(e) = self.repository.persist(&self.store).await {
            self.store.remove_catalog_entry(id);
            return Err(e);
        }

        tracing::info!("Catalog entry {} registered: {}", id, title);
        Ok(())
    }

    /// Register a new member with empty holdings and a zero fine balance.
    pub async fn register_member(
        &mut self,
        id: &str,
        name: &str,
        contact: &str,
    ) -> LedgerResult<()> {
        if !validation::valid_contact(contact) {
            return Err(LedgerError::Validation(format!(
                "invalid contact address: {}",
                contact
            )));
        }

        self.store.add_member(Member {
            id: id.to_string(),
            name: name.to_string(),
            contact: contact.to_string(),
            held: Default::default(),
            outstanding_fine: Decimal::ZERO,
        })?;

        if let Err(e) = self.repository.persist(&self.store).await {
            self.store.remove_member(id);
            return Err(e);
        }

        tracing::info!("Member {} registered: {}", id, name);
        Ok(())
    }

    /// Borrow a copy for a member, dated today.
    pub async fn borrow(&mut self, member_id: &str, catalog_id: &str) -> LedgerResult<LoanRecord> {
        self.borrow_on(member_id, catalog_id, Utc::now().date_naive()).await
    }

    /// Borrow a copy with an explicit borrow date.
    pub async fn borrow_on(
        &mut self,
        member_id: &str,
        catalog_id: &str,
        date: NaiveDate,
    ) -> LedgerResult<LoanRecord> {
        // Preconditions in order, first failure wins; nothing is mutated
        // until all of them pass.
        let member = self.store.member(member_id)?;
        let entry = self.store.catalog_entry(catalog_id)?;
        if entry.available_copies == 0 {
            return Err(LedgerError::OutOfStock(catalog_id.to_string()));
        }
        if member.held.len() >= BORROW_LIMIT {
            return Err(LedgerError::LimitExceeded(member_id.to_string()));
        }

        let record = LoanRecord {
            id: self.store.next_loan_id(),
            catalog_id: catalog_id.to_string(),
            member_id: member_id.to_string(),
            borrow_date: date,
            return_date: None,
            fine: Decimal::ZERO,
        };

        self.store.catalog_entry_mut(catalog_id)?.available_copies -= 1;
        // False when the member already holds another copy of this title.
        let newly_held = self
            .store
            .member_mut(member_id)?
            .held
            .insert(catalog_id.to_string());
        self.store.insert_loan(record.clone());

        if let Err(e) = self.repository.persist(&self.store).await {
            self.store.remove_loan(&record.id);
            if newly_held {
                self.store.member_mut(member_id)?.held.remove(catalog_id);
            }
            self.store.catalog_entry_mut(catalog_id)?.available_copies += 1;
            return Err(e);
        }

        tracing::info!(
            "Loan {} opened: entry {} to member {}",
            record.id,
            catalog_id,
            member_id
        );
        Ok(record)
    }

    /// Return a loan, dated today. Returns the assessed fine.
    pub async fn return_loan(&mut self, loan_id: &str) -> LedgerResult<Decimal> {
        self.return_loan_on(loan_id, Utc::now().date_naive()).await
    }

    /// Return a loan with an explicit return date.
    pub async fn return_loan_on(
        &mut self,
        loan_id: &str,
        date: NaiveDate,
    ) -> LedgerResult<Decimal> {
        let record = self.store.loan(loan_id)?;
        if !record.is_open() {
            return Err(LedgerError::AlreadyReturned(loan_id.to_string()));
        }

        let catalog_id = record.catalog_id.clone();
        let member_id = record.member_id.clone();

        // Calendar-date difference: a same-day return is zero days borrowed
        // regardless of time of day.
        let days_borrowed = (date - record.borrow_date).num_days();
        let fine = late_fine(days_borrowed);

        {
            let record = self.store.loan_mut(loan_id)?;
            record.return_date = Some(date);
            record.fine = fine;
        }
        self.store.catalog_entry_mut(&catalog_id)?.available_copies += 1;

        // The held set is keyed by catalog id: drop the entry only when no
        // other open loan by this member still references it.
        let still_held = self.store.loans().any(|l| {
            l.is_open() && l.id != loan_id && l.member_id == member_id && l.catalog_id == catalog_id
        });
        {
            let member = self.store.member_mut(&member_id)?;
            if !still_held {
                member.held.remove(&catalog_id);
            }
            member.outstanding_fine += fine;
        }

        if let Err(e) = self.repository.persist(&self.store).await {
            {
                let record = self.store.loan_mut(loan_id)?;
                record.return_date = None;
                record.fine = Decimal::ZERO;
            }
            self.store.catalog_entry_mut(&catalog_id)?.available_copies -= 1;
            let member = self.store.member_mut(&member_id)?;
            member.held.insert(catalog_id.clone());
            member.outstanding_fine -= fine;
            return Err(e);
        }

        tracing::info!("Loan {} returned, fine {}", loan_id, fine);
        Ok(fine)
    }

    /// Aggregate a read-only report over the store.
    pub fn report(&self) -> ReportSnapshot {
        ReportSnapshot {
            catalog_entries: self.store.catalog_count() as i64,
            total_copies: self.store.catalog_entries().map(|e| e.total_copies).sum(),
            available_copies: self
                .store
                .catalog_entries()
                .map(|e| e.available_copies)
                .sum(),
            members: self.store.member_count() as i64,
            outstanding_fines: self.store.members().map(|m| m.outstanding_fine).sum(),
            open_loans: self.store.loans().filter(|l| l.is_open()).count() as i64,
        }
    }
}
