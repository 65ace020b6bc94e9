//! Integration tests for the PostgreSQL order store using the store test harness.
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
//! # Test isolation
//!
//! All tests share a single PostgreSQL container (via `OnceLock`). Each test
//! creates a fresh `PgPool` and truncates the table, restarting ids at 1.

#![cfg(feature = "postgres")]

#[macro_use]
mod store_harness;

use repair_desk::storage::{PostgresOrderStore, ensure_schema};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::OnceLock;
use store_harness::*;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;

// ---------------------------------------------------------------------------
// Shared test environment (single container, fresh pool per test)
// ---------------------------------------------------------------------------

/// Container handle plus connection URL.
///
/// Kept in a std `OnceLock` so the container outlives the tokio runtime of
/// each `#[tokio::test]`.
struct PgTestEnv {
    _container: testcontainers::ContainerAsync<Postgres>,
    connection_url: String,
}

static TEST_ENV: OnceLock<PgTestEnv> = OnceLock::new();

async fn init_pg_env() -> &'static PgTestEnv {
    if let Some(env) = TEST_ENV.get() {
        return env;
    }

    let container = Postgres::default()
        .start()
        .await
        .expect("Failed to start PostgreSQL container — is Docker running?");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to connect to PostgreSQL");
    ensure_schema(&pool).await.expect("Failed to create schema");
    // running it twice must be harmless
    ensure_schema(&pool).await.expect("Schema creation is not idempotent");
    pool.close().await;

    let _ = TEST_ENV.set(PgTestEnv {
        _container: container,
        connection_url: url,
    });
    TEST_ENV.get().unwrap()
}

/// Fresh pool bound to the current test's runtime
async fn pg_pool() -> PgPool {
    let env = init_pg_env().await;
    PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&env.connection_url)
        .await
        .expect("Failed to connect to PostgreSQL")
}

/// Store over an empty `repair_orders` table with ids restarting at 1
async fn clean_pg_store() -> PostgresOrderStore {
    let pool = pg_pool().await;
    sqlx::query("TRUNCATE repair_orders RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("Failed to truncate repair_orders");
    PostgresOrderStore::new(pool)
}

order_store_tests!(clean_pg_store().await);

mod postgres_specific {
    use super::*;
    use repair_desk::core::store::OrderStore;
    use repair_desk::prelude::*;

    #[tokio::test]
    async fn test_cost_keeps_two_decimals() {
        let store = clean_pg_store().await;
        let order = store.create(record("Ana", "Laptop")).await.unwrap();

        let patch = repair_desk::core::OrderPatch::repaired(
            Decimal::new(15000, 2),
            "Replaced fan".to_string(),
            intake_date(),
        );
        store.update(order.id, patch).await.unwrap();

        let stored = store.get(order.id).await.unwrap().unwrap();
        assert_eq!(stored.estimated_cost.unwrap().to_string(), "150.00");
    }

    #[tokio::test]
    async fn test_service_over_postgres() {
        let store: Arc<dyn OrderStore> = Arc::new(clean_pg_store().await);
        let clock = Arc::new(FixedClock::new(intake_date()));
        let service = OrderService::new(store, clock);

        let order = service
            .create_order(NewOrder::new("Ana", "Laptop").with_phone("555-1"))
            .await
            .unwrap();
        service
            .mark_repaired(order.id, RepairDetails::new(Decimal::new(150, 0), "Replaced fan"))
            .await
            .unwrap();
        let picked = service
            .mark_picked_up(order.id, PickupDetails::by("Carlos"))
            .await
            .unwrap();

        assert_eq!(picked.status, OrderStatus::PickedUp);
        assert_eq!(picked.picked_up_by.as_deref(), Some("Carlos"));
        assert_eq!(picked.pickup_date, Some(intake_date()));
    }

    #[tokio::test]
    async fn test_service_rejects_cost_the_column_cannot_hold() {
        let store: Arc<dyn OrderStore> = Arc::new(clean_pg_store().await);
        let clock = Arc::new(FixedClock::new(intake_date()));
        let service = OrderService::new(store, clock);

        let order = service
            .create_order(NewOrder::new("Ana", "Laptop").with_phone("555-1"))
            .await
            .unwrap();

        let err = service
            .mark_repaired(order.id, RepairDetails::new(Decimal::new(1_000_000_000, 0), "x"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let repaired = service
            .mark_repaired(order.id, RepairDetails::new(Decimal::new(9_999_999_999, 2), "x"))
            .await
            .unwrap();
        assert_eq!(repaired.estimated_cost, Some(Decimal::new(9_999_999_999, 2)));
    }
}
