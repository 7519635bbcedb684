//! Cache
//!
//! La cache reemplaza al almacenamiento local del navegador: claves string
//! con JSON guardado tal cual. Se pasa explícitamente en el estado de la
//! aplicación; no hay acceso global.

pub mod cache_config;
pub mod dashboard_cache;
pub mod memory_store;
pub mod redis_client;

pub use cache_config::CacheConfig;
pub use dashboard_cache::DashboardCache;
pub use memory_store::MemoryStore;
pub use redis_client::RedisClient;

use async_trait::async_trait;

use crate::utils::errors::AppResult;

/// Operaciones de cache sobre valores string
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get_raw(&self, key: &str) -> AppResult<Option<String>>;

    async fn set_raw(&self, key: &str, value: String) -> AppResult<()>;

    async fn delete(&self, key: &str) -> AppResult<()>;
}
