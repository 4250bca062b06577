//! HTTP server for the invoice dashboard
//!
//! [`ServerBuilder`] wires a store, the view cache and the configuration
//! into an axum router with the listing, form action and health routes.

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::InvoiceAppState;
pub use router::build_router;
