//! Emprunt - Lending Ledger for Small Library Collections
//!
//! The crate keeps catalog inventory counts, member borrowing state and loan
//! history mutually consistent across borrow/return operations and reloads
//! from the SQLite backing store. Interactive concerns (menus, input parsing,
//! rendering) are left to the embedding caller, which drives the [`Ledger`]
//! with already-validated arguments.

pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod repository;
pub mod store;
pub mod telemetry;
pub mod validation;

pub use config::AppConfig;
pub use error::{LedgerError, LedgerResult};
pub use ledger::Ledger;
pub use models::{CatalogEntry, LoanRecord, Member, ReportSnapshot};
pub use store::EntityStore;
