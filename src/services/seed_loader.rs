//! Carga de la semilla del optimizador
//!
//! Primero la cache, después `GET /api/map/seed`. Lo que llega del backend
//! se vuelve a guardar en la cache.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::cache::DashboardCache;
use crate::client::BackendClient;
use crate::dto::seed_dto::SeedStatusResponse;
use crate::models::SeedData;
use crate::utils::errors::{AppError, AppResult};

/// Estado visible de la semilla: (datos, cargando, error)
#[derive(Debug, Clone, Default)]
pub enum SeedState {
    #[default]
    Loading,
    Ready(SeedData),
    Failed(String),
}

impl SeedState {
    pub fn to_response(&self) -> SeedStatusResponse {
        match self {
            SeedState::Loading => SeedStatusResponse {
                state: "loading",
                loading: true,
                summary: None,
                error: None,
            },
            SeedState::Ready(seed) => SeedStatusResponse {
                state: "ready",
                loading: false,
                summary: Some(seed.summary()),
                error: None,
            },
            SeedState::Failed(message) => SeedStatusResponse {
                state: "failed",
                loading: false,
                summary: None,
                error: Some(message.clone()),
            },
        }
    }
}

#[derive(Clone)]
pub struct SeedLoader {
    cache: DashboardCache,
    backend: Arc<BackendClient>,
    state: Arc<RwLock<SeedState>>,
}

impl SeedLoader {
    pub fn new(cache: DashboardCache, backend: Arc<BackendClient>) -> Self {
        Self {
            cache,
            backend,
            state: Arc::new(RwLock::new(SeedState::default())),
        }
    }

    pub async fn state(&self) -> SeedState {
        self.state.read().await.clone()
    }

    /// Semilla lista para usar; si todavía no hay, se carga
    pub async fn current(&self) -> AppResult<SeedData> {
        if let SeedState::Ready(seed) = &*self.state.read().await {
            return Ok(seed.clone());
        }
        self.load().await
    }

    /// Cache primero; ante ausencia o error de cache, el backend
    pub async fn load(&self) -> AppResult<SeedData> {
        match self.cache.load_seed().await {
            Ok(Some(seed)) => {
                info!("📥 Semilla tomada de la cache ({} filas)", seed.rows().len());
                *self.state.write().await = SeedState::Ready(seed.clone());
                return Ok(seed);
            }
            Ok(None) => info!("🌱 Semilla no está en cache, se pide al backend"),
            Err(e) => warn!("⚠️ Cache no disponible para la semilla: {}", e),
        }

        self.refresh_from_backend().await
    }

    /// Ignorar la cache y pedir la semilla al backend
    pub async fn refresh_from_backend(&self) -> AppResult<SeedData> {
        *self.state.write().await = SeedState::Loading;

        let result = match self.backend.fetch_seed().await {
            Ok(response) => SeedData::from_response(response),
            Err(e) => Err(e),
        };

        match result {
            Ok(seed) => {
                if let Err(e) = self.cache.save_seed(&seed).await {
                    warn!("⚠️ No se pudo guardar la semilla en cache: {}", e);
                }
                info!(
                    "✅ Semilla recibida: {} filas, {} vehículos",
                    seed.rows().len(),
                    seed.vehicles().len()
                );
                *self.state.write().await = SeedState::Ready(seed.clone());
                Ok(seed)
            }
            Err(e) => {
                error!("❌ Error cargando la semilla: {}", e);
                *self.state.write().await = SeedState::Failed(e.to_string());
                Err(e)
            }
        }
    }
}

/// Error para cuando una operación necesita semilla y no la hay
pub fn empty_seed_error() -> AppError {
    AppError::NotFound("No seed data available; upload customers first".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use std::time::Duration;

    fn loader() -> (DashboardCache, SeedLoader) {
        let cache = DashboardCache::new(Arc::new(MemoryStore::new()));
        // Puerto sin servidor: cualquier llamada al backend falla enseguida
        let backend = BackendClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        (cache.clone(), SeedLoader::new(cache, Arc::new(backend)))
    }

    #[tokio::test]
    async fn test_cache_hit_needs_no_backend() {
        let (cache, loader) = loader();
        cache
            .save_seed(&SeedData::new(vec![serde_json::json!({ "id": 1 })], vec![vec![0, 1, 0]]))
            .await
            .unwrap();

        let seed = loader.current().await.unwrap();
        assert_eq!(seed.vehicles(), &[vec![0, 1, 0]]);
        assert_eq!(loader.state().await.to_response().state, "ready");
    }

    #[tokio::test]
    async fn test_backend_failure_is_reported_in_state() {
        let (_, loader) = loader();
        assert_eq!(loader.state().await.to_response().state, "loading");

        assert!(loader.load().await.is_err());

        let response = loader.state().await.to_response();
        assert_eq!(response.state, "failed");
        assert!(!response.loading);
        assert!(response.error.is_some());
    }
}
