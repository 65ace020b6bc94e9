//! Storage implementations for different backends

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryOrderStore;
#[cfg(feature = "postgres")]
pub use postgres::{PostgresOrderStore, ensure_schema};

use crate::config::{StorageBackend, StorageConfig};
use crate::core::error::RepairResult;
use crate::core::store::OrderStore;
use std::sync::Arc;

/// Open the backend selected in the configuration
pub async fn connect(config: &StorageConfig) -> RepairResult<Arc<dyn OrderStore>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory order store; data is lost on restart");
            Ok(Arc::new(InMemoryOrderStore::new()))
        }
        #[cfg(feature = "postgres")]
        StorageBackend::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                crate::core::error::ConfigError::MissingField {
                    field: "storage.database_url".to_string(),
                    context: "storage section".to_string(),
                }
            })?;
            let store = PostgresOrderStore::connect(url, config.max_connections).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "postgres"))]
        StorageBackend::Postgres => Err(crate::core::error::StorageError::Unavailable {
            backend: "postgres (built without the `postgres` feature)".to_string(),
        }
        .into()),
    }
}
