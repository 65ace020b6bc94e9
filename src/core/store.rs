//! Storage abstraction for repair orders

use crate::core::error::RepairResult;
use crate::core::order::{NewOrderRecord, OrderPatch, RepairOrder};
use async_trait::async_trait;

/// Durable table of repair orders
///
/// Implementations assign ids (starting at 1), return listings newest id
/// first, and report failures as [`RepairError`](crate::core::RepairError):
/// `Order(NotFound)` for unknown ids, `Storage` for backend trouble.
/// The service is agnostic to the underlying storage mechanism.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Short backend name used in logs and health output
    fn backend_name(&self) -> &'static str;

    /// Insert a validated intake and assign it the next id
    async fn create(&self, record: NewOrderRecord) -> RepairResult<RepairOrder>;

    /// Get an order by id
    async fn get(&self, id: u64) -> RepairResult<Option<RepairOrder>>;

    /// List all orders, newest first
    async fn list(&self) -> RepairResult<Vec<RepairOrder>>;

    /// Case-insensitive substring search over client name, device, phone,
    /// email, status and technical note, newest first
    async fn search(&self, term: &str) -> RepairResult<Vec<RepairOrder>>;

    /// Apply a typed partial update and return the stored result
    async fn update(&self, id: u64, patch: OrderPatch) -> RepairResult<RepairOrder>;

    /// Hard-delete an order, returning the number of removed rows
    async fn delete(&self, id: u64) -> RepairResult<u64>;

    /// Number of stored orders
    async fn count(&self) -> RepairResult<u64>;

    /// Remove every order and restart ids at 1
    async fn reset(&self) -> RepairResult<()>;
}
