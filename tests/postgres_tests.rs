//! Integration tests for the PostgreSQL invoice store.
//!
//! # Requirements
//!
//! - Docker must be running (testcontainers launches a PostgreSQL container)
//! - Feature flag `postgres` must be enabled
//!
//! # Running
//!
//! ```sh
//! cargo test --features postgres --test postgres_tests -- --test-threads=1
//! ```
//!
//! All tests share a single container. Each test creates a fresh `PgPool`
//! and truncates the `invoices` table before running.

#![cfg(feature = "postgres")]

use chrono::NaiveDate;
use invoice_actions::prelude::*;
use invoice_actions::storage::postgres::{connect, ensure_schema};
use sqlx::PgPool;
use std::sync::OnceLock;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;

// ---------------------------------------------------------------------------
// Shared test environment (single container, fresh pool per test)
// ---------------------------------------------------------------------------

struct PgTestEnv {
    /// Dropping this stops the container
    _container: testcontainers::ContainerAsync<Postgres>,
    connection_url: String,
}

/// Outlives the runtime of any single `#[tokio::test]`
static TEST_ENV: OnceLock<PgTestEnv> = OnceLock::new();

async fn init_pg_env() -> &'static PgTestEnv {
    if let Some(env) = TEST_ENV.get() {
        return env;
    }

    let container = Postgres::default()
        .with_tag("16-alpine")
        .start()
        .await
        .expect("Failed to start PostgreSQL container, is Docker running?");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = connect(&url, 1).await.expect("Failed to connect to PostgreSQL");
    ensure_schema(&pool).await.expect("Failed to create schema");
    pool.close().await;

    let _ = TEST_ENV.set(PgTestEnv {
        _container: container,
        connection_url: url,
    });
    TEST_ENV.get().unwrap()
}

/// A pool bound to the current runtime, over an empty `invoices` table
async fn clean_pool() -> PgPool {
    let env = init_pg_env().await;
    let pool = connect(&env.connection_url, 2)
        .await
        .expect("Failed to connect to PostgreSQL");
    sqlx::query("TRUNCATE invoices")
        .execute(&pool)
        .await
        .expect("Failed to truncate invoices table");
    pool
}

async fn clean_store() -> PostgresInvoiceStore {
    PostgresInvoiceStore::new(clean_pool().await)
}

fn new_invoice(customer: &str, amount: i64, day: u32) -> NewInvoice {
    NewInvoice {
        customer_id: customer.to_string(),
        amount,
        status: InvoiceStatus::Pending,
        date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_ensure_schema_is_idempotent() {
    let pool = clean_pool().await;
    ensure_schema(&pool).await.unwrap();
    ensure_schema(&pool).await.unwrap();
}

#[tokio::test]
async fn test_insert_then_get() {
    let store = clean_store().await;

    let created = store.insert(new_invoice("c1", 4250, 2)).await.unwrap();
    let fetched = store.get(&created.id).await.unwrap();

    assert_eq!(fetched, Some(created));
}

#[tokio::test]
async fn test_update_keeps_date() {
    let store = clean_store().await;
    let created = store.insert(new_invoice("c1", 100, 2)).await.unwrap();

    let found = store
        .update(
            &created.id,
            InvoiceChanges {
                customer_id: "c2".to_string(),
                amount: 700,
                status: InvoiceStatus::Paid,
            },
        )
        .await
        .unwrap();
    assert!(found);

    let updated = store.get(&created.id).await.unwrap().unwrap();
    assert_eq!(updated.customer_id, "c2");
    assert_eq!(updated.amount, 700);
    assert_eq!(updated.status, InvoiceStatus::Paid);
    assert_eq!(updated.date, created.date);
}

#[tokio::test]
async fn test_missing_rows_are_reported() {
    let store = clean_store().await;
    let id = Uuid::new_v4();

    assert!(!store.delete(&id).await.unwrap());
    assert!(
        !store
            .update(
                &id,
                InvoiceChanges {
                    customer_id: "c1".to_string(),
                    amount: 1,
                    status: InvoiceStatus::Paid,
                },
            )
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_list_newest_first() {
    let store = clean_store().await;
    store.insert(new_invoice("old", 1, 1)).await.unwrap();
    store.insert(new_invoice("new", 1, 28)).await.unwrap();

    let customers: Vec<String> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|inv| inv.customer_id)
        .collect();
    assert_eq!(customers, vec!["new", "old"]);
}

#[tokio::test]
async fn test_check_constraint_rejects_non_positive_amount() {
    let store = clean_store().await;
    let err = store.insert(new_invoice("c1", 0, 1)).await.unwrap_err();
    assert!(err.to_string().contains("insert invoice"));
}

// ---------------------------------------------------------------------------
// Actions over PostgreSQL
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_and_delete_through_actions() {
    let store = clean_store().await;
    let actions = InvoiceActions::new(Arc::new(store.clone()), Arc::new(ViewCache::new()));

    let input = FormInput::from_pairs([
        ("customerId", "c1"),
        ("amount", "42.5"),
        ("status", "pending"),
    ]);
    let outcome = actions.create_invoice(&input).await;
    assert!(outcome.is_success());

    let invoices = store.list().await.unwrap();
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].amount, 4250);

    let outcome = actions.delete_invoice(invoices[0].id).await.unwrap();
    assert_eq!(outcome, ActionOutcome::Completed);
    assert!(store.list().await.unwrap().is_empty());
}
