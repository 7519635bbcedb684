//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::cache::{CacheStore, DashboardCache};
use crate::client::BackendClient;
use crate::config::environment::EnvironmentConfig;
use crate::services::{EditorService, GeometryService, SeedLoader, UploadService};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub cache: DashboardCache,
    pub backend: Arc<BackendClient>,
    pub seed_loader: SeedLoader,
    pub editor: EditorService,
    pub geometry: GeometryService,
    pub upload: UploadService,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, store: Arc<dyn CacheStore>) -> AppResult<Self> {
        let backend = Arc::new(BackendClient::new(
            &config.backend_base_url,
            config.backend_timeout,
        )?);
        let cache = DashboardCache::new(store);
        let seed_loader = SeedLoader::new(cache.clone(), backend.clone());

        Ok(Self {
            editor: EditorService::new(
                backend.clone(),
                cache.clone(),
                config.company.clone(),
                config.session_ttl,
            ),
            geometry: GeometryService::new(backend.clone(), config.poll),
            upload: UploadService::new(cache.clone(), seed_loader.clone()),
            seed_loader,
            backend,
            cache,
            config,
        })
    }
}
