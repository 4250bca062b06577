//! Router builder for the invoice routes

use super::handlers::{
    InvoiceAppState, create_invoice, delete_invoice, health_check, list_invoices, update_invoice,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the invoice routes under the listing path
///
/// With the default listing path:
/// - GET  /dashboard/invoices - Listing view
/// - POST /dashboard/invoices/create - Create an invoice
/// - POST /dashboard/invoices/{id}/edit - Update an invoice
/// - POST /dashboard/invoices/{id}/delete - Delete an invoice
pub fn build_invoice_routes(state: InvoiceAppState) -> Router {
    let base = state.listing_path().trim_end_matches('/').to_string();

    Router::new()
        .route(&base, get(list_invoices))
        .route(&format!("{}/create", base), post(create_invoice))
        .route(&format!("{}/{{id}}/edit", base), post(update_invoice))
        .route(&format!("{}/{{id}}/delete", base), post(delete_invoice))
        .with_state(state)
}

/// Build health check routes
pub fn build_health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

/// Every route, wrapped in request tracing
pub fn build_router(state: InvoiceAppState) -> Router {
    build_health_routes()
        .merge(build_invoice_routes(state))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::InvoiceActions;
    use crate::core::ViewCache;
    use crate::storage::InMemoryInvoiceStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(listing_path: &str) -> InvoiceAppState {
        let views = ViewCache::new();
        let actions = InvoiceActions::new(
            Arc::new(InMemoryInvoiceStore::new()),
            Arc::new(views.clone()),
        )
        .with_listing_path(listing_path);
        InvoiceAppState {
            actions: Arc::new(actions),
            views,
        }
    }

    async fn status(router: Router, method: &str, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        router.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_listing_route_follows_listing_path() {
        let router = build_router(state("/billing/"));
        assert_eq!(status(router.clone(), "GET", "/billing").await, StatusCode::OK);
        assert_eq!(
            status(router, "GET", "/dashboard/invoices").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_delete_is_post_only() {
        let router = build_router(state("/dashboard/invoices"));
        let uri = format!("/dashboard/invoices/{}/delete", uuid::Uuid::new_v4());
        assert_eq!(
            status(router.clone(), "DELETE", &uri).await,
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(status(router, "POST", &uri).await, StatusCode::NO_CONTENT);
    }
}
