use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use tracing::{debug, error, info, warn};

use super::{CacheConfig, CacheStore};
use crate::utils::errors::{AppError, AppResult};

/// Cliente Redis con connection manager y operaciones async
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
    config: CacheConfig,
}

impl RedisClient {
    /// Crear nuevo cliente Redis
    pub async fn new(redis_url: &str, config: CacheConfig) -> AppResult<Self> {
        info!("🔗 Conectando a Redis: {}", redis_url);

        let client = redis::Client::open(redis_url).map_err(redis_error)?;
        let manager = ConnectionManager::new(client).await.map_err(redis_error)?;

        // Test de conexión usando un comando simple
        let mut conn = manager.clone();
        let _: () = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(redis_error)?;

        info!("✅ Redis conectado exitosamente");

        Ok(Self { manager, config })
    }

    /// Generar clave de cache con prefijo
    fn make_key(&self, key: &str) -> String {
        format!("{}:{}", self.config.key_prefix, key)
    }
}

#[async_trait]
impl CacheStore for RedisClient {
    async fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.manager.clone();
        let key = self.make_key(key);

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(value)) => {
                debug!("📥 Cache HIT para clave: {}", key);
                Ok(Some(value))
            }
            Ok(None) => {
                debug!("❌ Cache MISS para clave: {}", key);
                Ok(None)
            }
            Err(e) => {
                warn!("⚠️ Error leyendo cache para clave {}: {}", key, e);
                Err(redis_error(e))
            }
        }
    }

    async fn set_raw(&self, key: &str, value: String) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let key = self.make_key(key);
        let ttl = self.config.default_ttl;

        let result: RedisResult<()> = if ttl > 0 {
            conn.set_ex(&key, value, ttl).await
        } else {
            conn.set(&key, value).await
        };

        match result {
            Ok(()) => {
                debug!("💾 Cache SET para clave: {} (TTL: {}s)", key, ttl);
                Ok(())
            }
            Err(e) => {
                error!("❌ Error guardando en cache para clave {}: {}", key, e);
                Err(redis_error(e))
            }
        }
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let key = self.make_key(key);

        let result: RedisResult<i64> = conn.del(&key).await;

        match result {
            Ok(count) => {
                debug!("🗑️ Cache DELETE para clave: {} (eliminados: {})", key, count);
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ Error eliminando cache para clave {}: {}", key, e);
                Ok(()) // No fallar si no se puede eliminar
            }
        }
    }
}

fn redis_error(e: redis::RedisError) -> AppError {
    AppError::Cache(format!("Redis: {}", e))
}
