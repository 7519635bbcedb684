//! Configuración de cache
//!
//! Este módulo contiene la configuración para el sistema de cache.

use serde::{Deserialize, Serialize};

/// Configuración del cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Sin URL se usa la cache en memoria
    pub redis_url: Option<String>,
    /// TTL en segundos; 0 = sin expiración (como el almacenamiento del navegador)
    pub default_ttl: u64,
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            default_ttl: 0,
            key_prefix: "route_dispatch".to_string(),
        }
    }
}
