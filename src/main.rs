use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use dotenvy::dotenv;

use route_dispatch::cache::{CacheConfig, CacheStore, MemoryStore, RedisClient};
use route_dispatch::config::environment::EnvironmentConfig;
use route_dispatch::routes::create_app_router;
use route_dispatch::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(if config.is_development() {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    info!("🚚 Route Dispatch - Panel de despacho");
    info!("=====================================");
    info!("🔗 Backend del optimizador: {}", config.backend_base_url);

    // Inicializar cache: Redis si hay URL, si no en memoria
    let store: Arc<dyn CacheStore> = match &config.redis_url {
        Some(redis_url) => {
            let cache_config = CacheConfig {
                redis_url: Some(redis_url.clone()),
                default_ttl: config.cache_ttl,
                ..CacheConfig::default()
            };
            match RedisClient::new(redis_url, cache_config).await {
                Ok(client) => Arc::new(client),
                Err(e) => {
                    error!("❌ Error conectando a Redis: {}", e);
                    return Err(anyhow::anyhow!("Error de Redis: {}", e));
                }
            }
        }
        None => {
            warn!("⚠️ REDIS_URL no definido, usando cache en memoria");
            Arc::new(MemoryStore::new())
        }
    };

    let app_state = AppState::new(config.clone(), store)?;

    // Precargar la semilla; si falla se reintenta en la primera consulta
    if let Err(e) = app_state.seed_loader.load().await {
        warn!("⚠️ Semilla no disponible al iniciar: {}", e);
    }

    let app = create_app_router(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio");
    info!("🌱 Semilla y carga:");
    info!("   GET  /api/seed - Estado de la semilla");
    info!("   POST /api/seed/refresh - Pedir semilla al backend");
    info!("   POST /api/upload - Cargar clientes y depósito");
    info!("📋 Editor de asignaciones:");
    info!("   POST /api/editor/sessions - Crear sesión");
    info!("   GET  /api/editor/sessions/:id - Ver sesión");
    info!("   DELETE /api/editor/sessions/:id - Cerrar sesión");
    info!("   POST /api/editor/sessions/:id/rebuild - Reconstruir con semilla nueva");
    info!("   POST /api/editor/sessions/:id/drag-start - Empezar arrastre");
    info!("   POST /api/editor/sessions/:id/drag-end - Soltar parada");
    info!("   PUT  /api/editor/sessions/:id/drivers/:index/name - Renombrar conductor");
    info!("   PUT  /api/editor/sessions/:id/drivers/:index/status - Cambiar estado");
    info!("   POST /api/editor/sessions/:id/save - Guardar asignaciones");
    info!("🗺️ Mapa:");
    info!("   GET  /api/map/sessions/:id - Capas del mapa");
    info!("   POST /api/map/assign-customer - Asignar cliente");
    info!("🚗 Conductor:");
    info!("   GET|POST|DELETE /api/driver/:driver/routes - Rutas del conductor");
    info!("   GET  /api/role-route/:role - Página según el rol");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
