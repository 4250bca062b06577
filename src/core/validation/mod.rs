//! Validation and filtering system
//!
//! Form submissions are checked against a declarative [`FormSchema`]: each
//! field is filtered (trimmed, coerced) and then validated, and failures are
//! reported per field so a form can show them next to its inputs.

pub mod extractor;
pub mod filters;
pub mod schema;
pub mod validators;

pub use extractor::FormInput;
pub use schema::{
    FieldErrors, FieldRule, FormFields, FormSchema, create_invoice_schema, invoice_schema,
    update_invoice_schema,
};
