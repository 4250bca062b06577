//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresInvoiceStore`, an [`InvoiceStore`] backed by a
//! PostgreSQL database via `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! invoice-actions = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! Invoices live in one `invoices` table. Ids are generated by the database
//! (`gen_random_uuid()`), amounts are stored in cents, and the table repeats
//! the form rules as CHECK constraints.

use crate::core::InvoiceStore;
use crate::core::error::StorageError;
use crate::core::invoice::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

const BACKEND: &str = "PostgreSQL";

type InvoiceRow = (Uuid, String, i64, String, NaiveDate);

// ---------------------------------------------------------------------------
// Connection and schema management
// ---------------------------------------------------------------------------

/// Open a connection pool
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
        .map_err(|e| {
            StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            }
            .into()
        })
}

/// Create the `invoices` table if it does not exist.
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS invoices (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            customer_id VARCHAR(255) NOT NULL,
            amount BIGINT NOT NULL CHECK (amount > 0),
            status VARCHAR(16) NOT NULL CHECK (status IN ('pending', 'paid')),
            date DATE NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| query_error("create invoices table", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_invoices_date ON invoices (date DESC)")
        .execute(pool)
        .await
        .map_err(|e| query_error("create invoices index", e))?;

    Ok(())
}

fn query_error(operation: &str, e: sqlx::Error) -> anyhow::Error {
    StorageError::QueryError {
        backend: BACKEND.to_string(),
        message: format!("{}: {}", operation, e),
    }
    .into()
}

fn from_row((id, customer_id, amount, status, date): InvoiceRow) -> Result<Invoice> {
    let status = status.parse::<InvoiceStatus>().map_err(|message| StorageError::CorruptRow {
        backend: BACKEND.to_string(),
        message,
    })?;
    Ok(Invoice {
        id,
        customer_id,
        amount,
        status,
        date,
    })
}

// ---------------------------------------------------------------------------
// PostgresInvoiceStore
// ---------------------------------------------------------------------------

/// Invoice store backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// use invoice_actions::storage::postgres::{connect, ensure_schema, PostgresInvoiceStore};
///
/// let pool = connect("postgres://localhost/dashboard", 5).await?;
/// ensure_schema(&pool).await?;
/// let store = PostgresInvoiceStore::new(pool);
/// ```
#[derive(Clone, Debug)]
pub struct PostgresInvoiceStore {
    pool: PgPool,
}

impl PostgresInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO invoices (customer_id, amount, status, date) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&invoice.customer_id)
        .bind(invoice.amount)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| query_error("insert invoice", e))?;

        Ok(invoice.into_invoice(id))
    }

    async fn update(&self, id: &Uuid, changes: InvoiceChanges) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE invoices SET customer_id = $1, amount = $2, status = $3 WHERE id = $4",
        )
        .bind(&changes.customer_id)
        .bind(changes.amount)
        .bind(changes.status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| query_error("update invoice", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("delete invoice", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, customer_id, amount, status, date FROM invoices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_error("get invoice", e))?;

        row.map(from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, customer_id, amount, status, date FROM invoices ORDER BY date DESC, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| query_error("list invoices", e))?;

        rows.into_iter().map(from_row).collect()
    }
}
