//! ServerBuilder for fluent API to build the invoice HTTP server

use super::handlers::InvoiceAppState;
use super::router::build_router;
use crate::actions::InvoiceActions;
use crate::config::AppConfig;
use crate::core::{InvoiceStore, ViewCache};
use crate::storage::InMemoryInvoiceStore;
use anyhow::{Result, anyhow};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the invoice server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(AppConfig::default())
///     .with_store(InMemoryInvoiceStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn InvoiceStore>>,
    config: AppConfig,
    views: ViewCache,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration
    pub fn new() -> Self {
        Self {
            store: None,
            config: AppConfig::default(),
            views: ViewCache::new(),
        }
    }

    /// Set the invoice store (required by [`build`](Self::build))
    pub fn with_store(mut self, store: impl InvoiceStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Share a view cache with the caller, e.g. to inspect it in tests
    pub fn with_view_cache(mut self, views: ViewCache) -> Self {
        self.views = views;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Pick the store the configuration asks for
    ///
    /// A `database` section needs the `postgres` feature; without one the
    /// in-memory store is used.
    pub async fn with_configured_store(self) -> Result<Self> {
        match self.config.database.clone() {
            None => {
                tracing::info!("no database configured, using the in-memory store");
                Ok(self.with_store(InMemoryInvoiceStore::new()))
            }
            #[cfg(feature = "postgres")]
            Some(database) => {
                use crate::storage::postgres::{PostgresInvoiceStore, connect, ensure_schema};

                let pool = connect(&database.url, database.max_connections).await?;
                ensure_schema(&pool).await?;
                tracing::info!("connected to PostgreSQL");
                Ok(self.with_store(PostgresInvoiceStore::new(pool)))
            }
            #[cfg(not(feature = "postgres"))]
            Some(_) => Err(anyhow!(
                "a database is configured but the `postgres` feature is not enabled"
            )),
        }
    }

    /// Build the shared handler state
    pub fn build_state(&self) -> Result<InvoiceAppState> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| anyhow!("an invoice store is required"))?;

        let actions =
            InvoiceActions::from_config(store, Arc::new(self.views.clone()), &self.config);

        Ok(InvoiceAppState {
            actions: Arc::new(actions),
            views: self.views.clone(),
        })
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        Ok(build_router(self.build_state()?))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `server.host:server.port` from the configuration and handles
    /// SIGTERM and SIGINT (Ctrl+C) for graceful shutdown.
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.server.bind_addr();
        let delete_mode = self.config.invoices.delete_mode;
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!(%delete_mode, "Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeleteMode;

    #[test]
    fn test_build_without_store_fails() {
        let err = ServerBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("invoice store"));
    }

    #[test]
    fn test_state_follows_config() {
        let mut config = AppConfig::default();
        config.invoices.delete_mode = DeleteMode::Disabled;
        config.invoices.listing_path = "/billing/invoices".to_string();

        let state = ServerBuilder::new()
            .with_config(config)
            .with_store(InMemoryInvoiceStore::new())
            .build_state()
            .unwrap();

        assert_eq!(state.listing_path(), "/billing/invoices");
        assert_eq!(state.actions.delete_mode(), DeleteMode::Disabled);
    }

    #[tokio::test]
    async fn test_no_database_selects_in_memory_store() {
        let builder = ServerBuilder::new().with_configured_store().await.unwrap();
        assert!(builder.build().is_ok());
    }
}
