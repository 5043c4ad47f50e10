//! Persistence gateway between the entity store and SQLite
//!
//! One column list per table is shared by the read and write paths, so the
//! durable schema cannot drift between `persist` and `reload`.

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use crate::error::LedgerResult;
use crate::models::{CatalogEntry, LoanRecord, Member};
use crate::store::EntityStore;

const CATALOG_COLUMNS: &str = "id, title, creator, year, total_copies, available_copies";
const MEMBER_COLUMNS: &str = "id, name, contact, outstanding_fine";
const LOAN_COLUMNS: &str = "id, catalog_id, member_id, borrow_date, return_date, fine";

/// Monetary amounts are stored as canonical decimal TEXT.
fn decode_amount(column: &str, raw: &str) -> Result<Decimal, sqlx::Error> {
    Decimal::from_str(raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

#[derive(Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    /// Open the database, creating the file and the schema when missing.
    pub async fn connect(url: &str) -> LedgerResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        // One serialized session, one connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::raw_sql(include_str!("../migrations/001_create_tables.sql"))
            .execute(&pool)
            .await?;

        Ok(Self { pool })
    }

    /// Rebuild the in-memory store from the durable tables.
    ///
    /// Catalog entries are materialized at full availability and member
    /// holdings empty; every open loan then decrements its entry and extends
    /// its member's held set. The persisted `available_copies` column (the
    /// post-borrow value) is intentionally not read back, so a restart never
    /// applies a decrement twice.
    pub async fn reload(&self) -> LedgerResult<EntityStore> {
        let mut store = EntityStore::default();

        let select_entries = format!("SELECT {} FROM catalog_entries ORDER BY id", CATALOG_COLUMNS);
        for row in sqlx::query(&select_entries).fetch_all(&self.pool).await? {
            let total: i64 = row.get("total_copies");
            store.insert_catalog_entry(CatalogEntry {
                id: row.get("id"),
                title: row.get("title"),
                creator: row.get("creator"),
                year: row.get("year"),
                total_copies: total,
                available_copies: total,
            });
        }

        let select_members = format!("SELECT {} FROM members ORDER BY id", MEMBER_COLUMNS);
        for row in sqlx::query(&select_members).fetch_all(&self.pool).await? {
            let fine: String = row.get("outstanding_fine");
            store.insert_member(Member {
                id: row.get("id"),
                name: row.get("name"),
                contact: row.get("contact"),
                held: Default::default(),
                outstanding_fine: decode_amount("outstanding_fine", &fine)?,
            });
        }

        let select_loans = format!("SELECT {} FROM loans ORDER BY id", LOAN_COLUMNS);
        for row in sqlx::query(&select_loans).fetch_all(&self.pool).await? {
            let fine: String = row.get("fine");
            let record = LoanRecord {
                id: row.get("id"),
                catalog_id: row.get("catalog_id"),
                member_id: row.get("member_id"),
                borrow_date: row.get("borrow_date"),
                return_date: row.get("return_date"),
                fine: decode_amount("fine", &fine)?,
            };
            if record.is_open() {
                store
                    .catalog_entry_mut(&record.catalog_id)?
                    .available_copies -= 1;
                store
                    .member_mut(&record.member_id)?
                    .held
                    .insert(record.catalog_id.clone());
            }
            store.insert_loan(record);
        }

        tracing::debug!(
            "Reloaded {} catalog entries, {} members, {} loans",
            store.catalog_count(),
            store.member_count(),
            store.loan_count()
        );
        Ok(store)
    }

    /// Replace the durable contents with the store's current state, in one
    /// transaction.
    pub async fn persist(&self, store: &EntityStore) -> LedgerResult<()> {
        let mut tx = self.pool.begin().await?;

        // Children first: loans reference the other two tables.
        sqlx::query("DELETE FROM loans").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM members").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM catalog_entries").execute(&mut *tx).await?;

        let insert_entry = format!(
            "INSERT INTO catalog_entries ({}) VALUES (?, ?, ?, ?, ?, ?)",
            CATALOG_COLUMNS
        );
        for entry in store.catalog_entries() {
            sqlx::query(&insert_entry)
                .bind(&entry.id)
                .bind(&entry.title)
                .bind(&entry.creator)
                .bind(entry.year)
                .bind(entry.total_copies)
                .bind(entry.available_copies)
                .execute(&mut *tx)
                .await?;
        }

        let insert_member = format!("INSERT INTO members ({}) VALUES (?, ?, ?, ?)", MEMBER_COLUMNS);
        for member in store.members() {
            sqlx::query(&insert_member)
                .bind(&member.id)
                .bind(&member.name)
                .bind(&member.contact)
                .bind(member.outstanding_fine.to_string())
                .execute(&mut *tx)
                .await?;
        }

        let insert_loan = format!(
            "INSERT INTO loans ({}) VALUES (?, ?, ?, ?, ?, ?)",
            LOAN_COLUMNS
        );
        for loan in store.loans() {
            sqlx::query(&insert_loan)
                .bind(&loan.id)
                .bind(&loan.catalog_id)
                .bind(&loan.member_id)
                .bind(loan.borrow_date)
                .bind(loan.return_date)
                .bind(loan.fine.to_string())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Persisted {} catalog entries, {} members, {} loans",
            store.catalog_count(),
            store.member_count(),
            store.loan_count()
        );
        Ok(())
    }
}
