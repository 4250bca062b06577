//! Invoice mutations invoked from dashboard forms
//!
//! [`InvoiceActions`] validates a submitted form, writes one statement to the
//! [`InvoiceStore`], marks the listing view stale and tells the caller where
//! to go next. Storage failures are logged with their cause and reported to
//! the form as a fixed message.

pub mod outcome;

pub use outcome::{ActionOutcome, ActionState};

use crate::config::{AppConfig, DEFAULT_LISTING_PATH, DeleteMode};
use crate::core::error::{ActionError, ActionResult, ValidationError};
use crate::core::invoice::{InvoiceChanges, InvoiceStatus, NewInvoice, to_minor_units};
use crate::core::validation::schema::decode;
use crate::core::validation::{FormFields, FormSchema, create_invoice_schema, update_invoice_schema};
use crate::core::{InvoiceStore, ViewInvalidator};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

pub const CREATE_INVALID_MESSAGE: &str = "Missing Fields. Failed to Create Invoice.";
pub const CREATE_FAILED_MESSAGE: &str = "Database Error: Failed to Create Invoice.";
pub const UPDATE_INVALID_MESSAGE: &str = "Missing Fields. Failed to Update Invoice.";
pub const UPDATE_FAILED_MESSAGE: &str = "Database Error: Failed to Update Invoice.";
pub const DELETE_FAILED_MESSAGE: &str = "Database Error: Failed to Delete Invoice.";

/// The mutable invoice fields, as validated from a form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceForm {
    customer_id: String,
    amount: f64,
    status: InvoiceStatus,
}

/// Create, update and delete for invoices
#[derive(Clone)]
pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    views: Arc<dyn ViewInvalidator>,
    listing_path: String,
    delete_mode: DeleteMode,
    today: fn() -> NaiveDate,
    create_schema: FormSchema,
    update_schema: FormSchema,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl InvoiceActions {
    pub fn new(store: Arc<dyn InvoiceStore>, views: Arc<dyn ViewInvalidator>) -> Self {
        Self {
            store,
            views,
            listing_path: DEFAULT_LISTING_PATH.to_string(),
            delete_mode: DeleteMode::default(),
            today: utc_today,
            create_schema: create_invoice_schema(),
            update_schema: update_invoice_schema(),
        }
    }

    /// Build from the `invoices` section of the configuration
    pub fn from_config(
        store: Arc<dyn InvoiceStore>,
        views: Arc<dyn ViewInvalidator>,
        config: &AppConfig,
    ) -> Self {
        Self::new(store, views)
            .with_listing_path(config.invoices.listing_path.clone())
            .with_delete_mode(config.invoices.delete_mode)
    }

    pub fn with_listing_path(mut self, path: impl Into<String>) -> Self {
        self.listing_path = path.into();
        self
    }

    pub fn with_delete_mode(mut self, mode: DeleteMode) -> Self {
        self.delete_mode = mode;
        self
    }

    /// Replace the clock used to stamp new invoices
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn listing_path(&self) -> &str {
        &self.listing_path
    }

    pub fn delete_mode(&self) -> DeleteMode {
        self.delete_mode
    }

    pub fn store(&self) -> &Arc<dyn InvoiceStore> {
        &self.store
    }

    /// Create an invoice from a form submission
    ///
    /// Validation failures come back as [`ActionOutcome::Invalid`] with every
    /// field message; nothing is written.
    pub async fn create_invoice(&self, input: &FormFields) -> ActionOutcome {
        let form: InvoiceForm = match self.create_schema.safe_parse(input) {
            Ok(fields) => match decode(fields) {
                Ok(form) => form,
                Err(e) => return invalid("create", e, CREATE_INVALID_MESSAGE),
            },
            Err(errors) => {
                return invalid(
                    "create",
                    ValidationError::FieldErrors(errors),
                    CREATE_INVALID_MESSAGE,
                );
            }
        };

        let invoice = NewInvoice {
            customer_id: form.customer_id,
            amount: to_minor_units(form.amount),
            status: form.status,
            date: (self.today)(),
        };

        match self.store.insert(invoice).await {
            Ok(created) => {
                tracing::info!(invoice_id = %created.id, amount = created.amount, "invoice created");
                self.views.revalidate_path(&self.listing_path);
                ActionOutcome::redirect(self.listing_path.clone())
            }
            Err(e) => {
                tracing::error!("failed to create invoice: {:#}", e);
                ActionOutcome::Failed(ActionState::message(CREATE_FAILED_MESSAGE))
            }
        }
    }

    /// Overwrite customer, amount and status of an invoice
    ///
    /// The creation date is never touched. An id with no matching invoice
    /// still redirects, as the statement simply matches no row.
    pub async fn update_invoice(&self, id: Uuid, input: &FormFields) -> ActionOutcome {
        let mut input = input.clone();
        input.insert("id".to_string(), Value::String(id.to_string()));

        let form: InvoiceForm = match self.update_schema.parse_as(&input) {
            Ok(form) => form,
            Err(e) => return invalid("update", e, UPDATE_INVALID_MESSAGE),
        };

        let changes = InvoiceChanges {
            customer_id: form.customer_id,
            amount: to_minor_units(form.amount),
            status: form.status,
        };

        match self.store.update(&id, changes).await {
            Ok(found) => {
                if found {
                    tracing::info!(invoice_id = %id, "invoice updated");
                } else {
                    tracing::warn!(invoice_id = %id, "update matched no invoice");
                }
                self.views.revalidate_path(&self.listing_path);
                ActionOutcome::redirect(self.listing_path.clone())
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, "failed to update invoice: {:#}", e);
                ActionOutcome::Failed(ActionState::message(UPDATE_FAILED_MESSAGE))
            }
        }
    }

    /// Delete an invoice
    ///
    /// With [`DeleteMode::Disabled`] this always fails with
    /// [`ActionError::Disabled`] and neither the store nor the view cache is
    /// touched.
    pub async fn delete_invoice(&self, id: Uuid) -> ActionResult<ActionOutcome> {
        if self.delete_mode == DeleteMode::Disabled {
            tracing::warn!(invoice_id = %id, "delete requested while deletes are disabled");
            return Err(ActionError::Disabled {
                operation: "Delete".to_string(),
            });
        }

        match self.store.delete(&id).await {
            Ok(found) => {
                if found {
                    tracing::info!(invoice_id = %id, "invoice deleted");
                } else {
                    tracing::warn!(invoice_id = %id, "delete matched no invoice");
                }
                self.views.revalidate_path(&self.listing_path);
                Ok(ActionOutcome::Completed)
            }
            Err(e) => {
                tracing::error!(invoice_id = %id, "failed to delete invoice: {:#}", e);
                Ok(ActionOutcome::Failed(ActionState::message(
                    DELETE_FAILED_MESSAGE,
                )))
            }
        }
    }
}

fn invalid(operation: &str, error: ValidationError, message: &str) -> ActionOutcome {
    let errors = error.into_field_errors();
    let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
    tracing::warn!(operation, fields = ?fields, "invoice form rejected");
    ActionOutcome::Invalid(ActionState::invalid(errors, message))
}
