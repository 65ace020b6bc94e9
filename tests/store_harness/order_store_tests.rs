//! Macro-generated test suite for `OrderStore` contract validation.
//!
//! The `order_store_tests!` macro generates a test module that validates any
//! `OrderStore` implementation: id assignment, listing order, search, typed
//! patches, deletion, maintenance operations and concurrent access.
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_assigns_sequential_ids`
//! - `test_create_keeps_all_fields`
//! - `test_get_nonexistent`
//! - `test_list_empty`
//! - `test_list_newest_first`
//! - `test_update_transition_patch`
//! - `test_update_clears_nullable_fields`
//! - `test_update_nonexistent`
//! - `test_delete_existing`
//! - `test_delete_nonexistent`
//!
//! ## Search
//! - `test_search_each_column`
//! - `test_search_case_insensitive`
//! - `test_search_by_status`
//! - `test_search_wildcards_are_literal`
//! - `test_search_no_results`
//!
//! ## Maintenance & concurrency
//! - `test_count_and_reset`
//! - `test_concurrent_creates`

/// Generate a full `OrderStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh, empty store. It is re-evaluated for
/// each test. For the concurrent test the store must also be `Clone + 'static`.
#[macro_export]
macro_rules! order_store_tests {
    ($factory:expr) => {
        mod order_store_contract_tests {
            use super::*;
            use chrono::NaiveDate;
            use repair_desk::core::order::{OrderPatch, OrderStatus};
            use repair_desk::core::store::OrderStore;
            use repair_desk::core::{OrderError, RepairError};
            use rust_decimal::Decimal;

            fn repaired_on() -> NaiveDate {
                NaiveDate::from_ymd_opt(2025, 6, 9).unwrap()
            }

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_assigns_sequential_ids() {
                let store = $factory;
                let first = store.create(record("Ana", "Laptop")).await.unwrap();
                let second = store.create(record("Luis", "Phone")).await.unwrap();

                assert_eq!(first.id, 1);
                assert_eq!(second.id, 2);
                assert_eq!(first.status, OrderStatus::Pending);
                assert_eq!(first.intake_date, intake_date());
                assert!(first.repaired_date.is_none());
                assert!(first.pickup_date.is_none());
                assert!(!first.same_owner_pickup);
            }

            #[tokio::test]
            async fn test_create_keeps_all_fields() {
                let store = $factory;
                let created = store
                    .create(full_record("Marta", "Tablet", "marta@example.com"))
                    .await
                    .unwrap();

                let fetched = store.get(created.id).await.unwrap().unwrap();
                assert_eq!(fetched.client_name, "Marta");
                assert_eq!(fetched.device, "Tablet");
                assert_eq!(fetched.fault_description.as_deref(), Some("Does not boot"));
                assert_eq!(fetched.accessories.as_deref(), Some("Charger"));
                assert_eq!(fetched.phone.as_deref(), Some("555-0199"));
                assert_eq!(fetched.email.as_deref(), Some("marta@example.com"));
                assert!(fetched.estimated_cost.is_none());
                assert!(fetched.technical_note.is_none());
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                assert!(store.get(404).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_list_empty() {
                let store = $factory;
                assert!(store.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_newest_first() {
                let store = $factory;
                for name in ["a", "b", "c", "d"] {
                    store.create(record(name, "Console")).await.unwrap();
                }

                let ids: Vec<u64> = store.list().await.unwrap().iter().map(|o| o.id).collect();
                assert_eq!(ids, vec![4, 3, 2, 1]);
            }

            #[tokio::test]
            async fn test_update_transition_patch() {
                let store = $factory;
                let order = store.create(record("Ana", "Laptop")).await.unwrap();

                let patch = OrderPatch::repaired(
                    Decimal::new(15000, 2),
                    "Replaced fan".to_string(),
                    repaired_on(),
                );
                let updated = store.update(order.id, patch).await.unwrap();

                assert_eq!(updated.status, OrderStatus::Repaired);
                assert_eq!(updated.estimated_cost, Some(Decimal::new(15000, 2)));
                assert_eq!(updated.technical_note.as_deref(), Some("Replaced fan"));
                assert_eq!(updated.repaired_date, Some(repaired_on()));
                // untouched columns survive
                assert_eq!(updated.client_name, "Ana");
                assert_eq!(updated.phone.as_deref(), Some("555-0100"));
                assert_eq!(updated.intake_date, intake_date());

                let stored = store.get(order.id).await.unwrap().unwrap();
                assert_eq!(stored.status, OrderStatus::Repaired);
                assert_eq!(stored.estimated_cost, Some(Decimal::new(15000, 2)));

                let pickup = OrderPatch::picked_up(None, true, repaired_on());
                let picked = store.update(order.id, pickup).await.unwrap();
                assert_eq!(picked.status, OrderStatus::PickedUp);
                assert!(picked.same_owner_pickup);
                assert!(picked.picked_up_by.is_none());
                assert_eq!(picked.repaired_date, Some(repaired_on()));
            }

            #[tokio::test]
            async fn test_update_clears_nullable_fields() {
                let store = $factory;
                let order = store
                    .create(full_record("Marta", "Tablet", "marta@example.com"))
                    .await
                    .unwrap();

                let patch = OrderPatch {
                    phone: Some(None),
                    accessories: Some(Some("Case".to_string())),
                    ..OrderPatch::default()
                };
                let updated = store.update(order.id, patch).await.unwrap();

                assert!(updated.phone.is_none());
                assert_eq!(updated.email.as_deref(), Some("marta@example.com"));
                assert_eq!(updated.accessories.as_deref(), Some("Case"));
                assert_eq!(updated.fault_description.as_deref(), Some("Does not boot"));
                assert_eq!(updated.status, OrderStatus::Pending);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let store = $factory;
                let err = store
                    .update(77, OrderPatch::picked_up(None, true, repaired_on()))
                    .await
                    .unwrap_err();
                assert!(matches!(
                    err,
                    RepairError::Order(OrderError::NotFound { id: 77 })
                ));
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let store = $factory;
                let order = store.create(record("Ana", "Laptop")).await.unwrap();

                assert_eq!(store.delete(order.id).await.unwrap(), 1);
                assert!(store.get(order.id).await.unwrap().is_none());
                assert!(store.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let store = $factory;
                let err = store.delete(999).await.unwrap_err();
                assert!(matches!(
                    err,
                    RepairError::Order(OrderError::NotFound { id: 999 })
                ));
            }

            // ==================================================================
            // Search
            // ==================================================================

            #[tokio::test]
            async fn test_search_each_column() {
                let store = $factory;
                let ana = store.create(record("Ana Pérez", "Laptop")).await.unwrap();
                let luis = store
                    .create(full_record("Luis", "Phone", "luis@shop.test"))
                    .await
                    .unwrap();
                store
                    .update(
                        ana.id,
                        OrderPatch::repaired(
                            Decimal::new(5000, 2),
                            "Thermal paste renewed".to_string(),
                            repaired_on(),
                        ),
                    )
                    .await
                    .unwrap();

                let ids = |orders: Vec<repair_desk::core::RepairOrder>| {
                    orders.iter().map(|o| o.id).collect::<Vec<_>>()
                };

                assert_eq!(ids(store.search("Pérez").await.unwrap()), vec![ana.id]);
                assert_eq!(ids(store.search("phone").await.unwrap()), vec![luis.id]);
                assert_eq!(ids(store.search("0199").await.unwrap()), vec![luis.id]);
                assert_eq!(ids(store.search("shop.test").await.unwrap()), vec![luis.id]);
                assert_eq!(ids(store.search("thermal").await.unwrap()), vec![ana.id]);
                // shared phone prefix hits both, newest first
                assert_eq!(ids(store.search("555").await.unwrap()), vec![luis.id, ana.id]);
            }

            #[tokio::test]
            async fn test_search_case_insensitive() {
                let store = $factory;
                store.create(record("Ana", "MacBook Pro")).await.unwrap();

                assert_eq!(store.search("macbook").await.unwrap().len(), 1);
                assert_eq!(store.search("MACBOOK PRO").await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_search_by_status() {
                let store = $factory;
                let first = store.create(record("Ana", "Laptop")).await.unwrap();
                store.create(record("Luis", "Phone")).await.unwrap();
                store
                    .update(
                        first.id,
                        OrderPatch::repaired(Decimal::ZERO, "Cleaned".to_string(), repaired_on()),
                    )
                    .await
                    .unwrap();

                let repaired = store.search("repaired").await.unwrap();
                assert_eq!(repaired.len(), 1);
                assert_eq!(repaired[0].id, first.id);
                assert_eq!(store.search("pending").await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_search_wildcards_are_literal() {
                let store = $factory;
                store.create(record("Ana", "Laptop")).await.unwrap();
                store.create(record("100% Repairs", "Phone")).await.unwrap();

                let hits = store.search("%").await.unwrap();
                assert_eq!(hits.len(), 1);
                assert_eq!(hits[0].client_name, "100% Repairs");
                assert!(store.search("_").await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_search_no_results() {
                let store = $factory;
                store.create(record("Ana", "Laptop")).await.unwrap();
                assert!(store.search("zzz-nothing").await.unwrap().is_empty());
            }

            // ==================================================================
            // Maintenance & concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_count_and_reset() {
                let store = $factory;
                for name in ["a", "b", "c"] {
                    store.create(record(name, "Router")).await.unwrap();
                }
                assert_eq!(store.count().await.unwrap(), 3);

                store.reset().await.unwrap();
                assert_eq!(store.count().await.unwrap(), 0);

                let fresh = store.create(record("d", "Router")).await.unwrap();
                assert_eq!(fresh.id, 1);
            }

            #[tokio::test]
            async fn test_concurrent_creates() {
                let store = $factory;
                let mut handles = Vec::new();
                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store
                            .create(record(&format!("client-{}", i), "Phone"))
                            .await
                            .unwrap()
                            .id
                    }));
                }

                let mut ids = Vec::new();
                for handle in handles {
                    ids.push(handle.await.unwrap());
                }
                ids.sort_unstable();
                assert_eq!(ids, (1..=10).collect::<Vec<u64>>());
                assert_eq!(store.count().await.unwrap(), 10);
            }
        }
    };
}
