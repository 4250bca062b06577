//! # invoice-actions
//!
//! Server-side form actions for a dashboard's invoices: create, update and
//! delete, each validating the submitted form, writing a single statement,
//! invalidating the cached listing and reporting where to go next.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_actions::prelude::*;
//!
//! let store = Arc::new(InMemoryInvoiceStore::new());
//! let views = ViewCache::new();
//! let actions = InvoiceActions::new(store, Arc::new(views.clone()));
//!
//! let form = FormInput::from_pairs([
//!     ("customerId", "c1"),
//!     ("amount", "42.5"),
//!     ("status", "pending"),
//! ]);
//!
//! // Stores 4250 cents dated today and redirects to the listing
//! let outcome = actions.create_invoice(&form).await;
//! assert!(outcome.is_success());
//! ```
//!
//! ## Features
//!
//! - `in-memory` (default): [`storage::InMemoryInvoiceStore`]
//! - `postgres`: `storage::PostgresInvoiceStore` on a `sqlx` pool

pub mod actions;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Actions ===
    pub use crate::actions::{ActionOutcome, ActionState, InvoiceActions};

    // === Core ===
    pub use crate::core::{
        ActionError, ActionResult, FieldErrors, FormFields, FormInput, FormSchema, Invoice,
        InvoiceChanges, InvoiceStatus, InvoiceStore, NewInvoice, ViewCache, ViewInvalidator,
    };

    // === Storage ===
    pub use crate::storage::InMemoryInvoiceStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresInvoiceStore;

    // === Config ===
    pub use crate::config::{AppConfig, DeleteMode};

    // === Server ===
    pub use crate::server::{InvoiceAppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
