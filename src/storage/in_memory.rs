//! In-memory implementation of OrderStore for testing and development

use crate::core::error::{RepairError, RepairResult};
use crate::core::order::{NewOrderRecord, OrderPatch, RepairOrder};
use crate::core::store::OrderStore;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory order store
///
/// Records live in a sharded `DashMap`, so writers on different ids do not
/// contend on a single lock. Ids come from an atomic counter starting at 1.
#[derive(Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<DashMap<u64, RepairOrder>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryOrderStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            orders: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn newest_first(mut orders: Vec<RepairOrder>) -> Vec<RepairOrder> {
        orders.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        orders
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, record: NewOrderRecord) -> RepairResult<RepairOrder> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let order = RepairOrder::from_record(id, record);
        self.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: u64) -> RepairResult<Option<RepairOrder>> {
        Ok(self.orders.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> RepairResult<Vec<RepairOrder>> {
        let orders = self.orders.iter().map(|entry| entry.value().clone()).collect();
        Ok(Self::newest_first(orders))
    }

    async fn search(&self, term: &str) -> RepairResult<Vec<RepairOrder>> {
        let needle = term.to_lowercase();
        let orders = self
            .orders
            .iter()
            .filter(|entry| entry.value().matches(&needle))
            .map(|entry| entry.value().clone())
            .collect();
        Ok(Self::newest_first(orders))
    }

    async fn update(&self, id: u64, patch: OrderPatch) -> RepairResult<RepairOrder> {
        let mut entry = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| RepairError::not_found(id))?;

        patch.apply_to(entry.value_mut());
        Ok(entry.value().clone())
    }

    async fn delete(&self, id: u64) -> RepairResult<u64> {
        self.orders
            .remove(&id)
            .map(|_| 1)
            .ok_or_else(|| RepairError::not_found(id))
    }

    async fn count(&self) -> RepairResult<u64> {
        Ok(self.orders.len() as u64)
    }

    async fn reset(&self) -> RepairResult<()> {
        self.orders.clear();
        self.next_id.store(1, Ordering::SeqCst);
        Ok(())
    }
}
