//! Core types and traits shared by the actions, storage and server layers

pub mod error;
pub mod invoice;
pub mod revalidate;
pub mod service;
pub mod validation;

pub use error::{ActionError, ActionResult};
pub use invoice::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};
pub use revalidate::{ViewCache, ViewInvalidator};
pub use service::InvoiceStore;
pub use validation::{FieldErrors, FormFields, FormInput, FormSchema};
