//! HTTP handlers for the invoice dashboard

use crate::actions::{ActionOutcome, InvoiceActions};
use crate::core::error::{ActionError, RequestError, StorageError};
use crate::core::validation::FormInput;
use crate::core::{InvoiceStore, ViewCache};
use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

/// Application state shared across handlers
#[derive(Clone)]
pub struct InvoiceAppState {
    pub actions: Arc<InvoiceActions>,
    pub views: ViewCache,
}

impl InvoiceAppState {
    pub fn store(&self) -> &Arc<dyn InvoiceStore> {
        self.actions.store()
    }

    pub fn listing_path(&self) -> &str {
        self.actions.listing_path()
    }
}

fn parse_id(id: &str) -> Result<Uuid, ActionError> {
    Uuid::parse_str(id).map_err(|_| {
        RequestError::InvalidEntityId {
            id: id.to_string(),
        }
        .into()
    })
}

/// Listing view, served from the view cache until a mutation invalidates it
pub async fn list_invoices(
    State(state): State<InvoiceAppState>,
) -> Result<Json<Value>, ActionError> {
    let path = state.listing_path();
    if let Some(view) = state.views.get(path) {
        tracing::debug!(path, "serving cached listing");
        return Ok(Json(view));
    }

    let generation = state.views.generation(path);
    let invoices = state.store().list().await.map_err(|e| {
        tracing::error!("failed to list invoices: {:#}", e);
        match e.downcast::<StorageError>() {
            Ok(storage) => ActionError::Storage(storage),
            Err(_) => ActionError::Internal("failed to list invoices".to_string()),
        }
    })?;

    let view = serde_json::to_value(&invoices)
        .map_err(|e| ActionError::Internal(format!("failed to render listing: {}", e)))?;
    if !state.views.put_if_generation(path, view.clone(), generation) {
        tracing::debug!(path, "listing changed while rendering, not cached");
    }
    Ok(Json(view))
}

/// Create an invoice from a submitted form
pub async fn create_invoice(
    State(state): State<InvoiceAppState>,
    FormInput(fields): FormInput,
) -> ActionOutcome {
    state.actions.create_invoice(&fields).await
}

/// Update an invoice from a submitted form
pub async fn update_invoice(
    State(state): State<InvoiceAppState>,
    Path(id): Path<String>,
    FormInput(fields): FormInput,
) -> Result<ActionOutcome, ActionError> {
    let id = parse_id(&id)?;
    Ok(state.actions.update_invoice(id, &fields).await)
}

/// Delete an invoice
pub async fn delete_invoice(
    State(state): State<InvoiceAppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    match state.actions.delete_invoice(id).await {
        Ok(outcome) => outcome.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Health check endpoint handler
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
