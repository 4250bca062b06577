//! Service traits for invoice persistence

use crate::core::invoice::{Invoice, InvoiceChanges, NewInvoice};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence for invoice records
///
/// Each write is a single statement. Implementations are free to fail any
/// call; the actions turn failures into fixed user-facing messages and log
/// the cause.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a new invoice, assigning its id
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice>;

    /// Overwrite customer, amount and status of an invoice
    ///
    /// Returns `false` when no invoice has that id.
    async fn update(&self, id: &Uuid, changes: InvoiceChanges) -> Result<bool>;

    /// Remove an invoice
    ///
    /// Returns `false` when no invoice has that id.
    async fn delete(&self, id: &Uuid) -> Result<bool>;

    /// Get an invoice by ID
    async fn get(&self, id: &Uuid) -> Result<Option<Invoice>>;

    /// List all invoices, newest date first
    async fn list(&self) -> Result<Vec<Invoice>>;
}
