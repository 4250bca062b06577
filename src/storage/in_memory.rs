//! In-memory implementation of InvoiceStore for testing and development

use crate::core::InvoiceStore;
use crate::core::error::StorageError;
use crate::core::invoice::{Invoice, InvoiceChanges, NewInvoice};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

const BACKEND: &str = "in-memory";

/// In-memory invoice store
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<Uuid, Invoice>>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-built invoices as they are, ids included
    pub fn with_invoices(invoices: impl IntoIterator<Item = Invoice>) -> Self {
        let map = invoices.into_iter().map(|inv| (inv.id, inv)).collect();
        Self {
            invoices: Arc::new(RwLock::new(map)),
        }
    }

    pub fn len(&self) -> usize {
        self.read().map(|invoices| invoices.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, Invoice>>> {
        self.invoices.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, Invoice>>> {
        self.invoices.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> anyhow::Error {
    anyhow::Error::new(StorageError::Unavailable {
        backend: BACKEND.to_string(),
    })
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice> {
        let invoice = invoice.into_invoice(Uuid::new_v4());
        self.write()?.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn update(&self, id: &Uuid, changes: InvoiceChanges) -> Result<bool> {
        let mut invoices = self.write()?;
        match invoices.get_mut(id) {
            Some(invoice) => {
                changes.apply_to(invoice);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        Ok(self.write()?.remove(id).is_some())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Invoice>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let mut invoices: Vec<Invoice> = self.read()?.values().cloned().collect();
        invoices.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(invoices)
    }
}
