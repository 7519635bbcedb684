use serde_json::{json, Value};

use crate::cache::DashboardCache;
use crate::dto::ApiResponse;
use crate::models::driver::{DriverProfile, DriverRouteRecord, DriverSession, Role};
use crate::services::driver_view::format_driver_routes;
use crate::services::SeedLoader;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct DriverController {
    cache: DashboardCache,
    seed_loader: SeedLoader,
    company: String,
}

impl DriverController {
    pub fn new(state: &AppState) -> Self {
        Self {
            cache: state.cache.clone(),
            seed_loader: state.seed_loader.clone(),
            company: state.config.company.clone(),
        }
    }

    /// Rutas guardadas del conductor; otros roles no pueden verlas
    pub async fn routes(&self, driver: &str, role: Option<&str>) -> Result<ApiResponse<DriverSession>, AppError> {
        if let Some(role) = role {
            Role::from_label(role).ensure_driver()?;
        }
        let session = self.cache.read_driver_session(driver).await;
        let message = if session.routes.is_empty() {
            "No routes assigned".to_string()
        } else {
            format!("{} stops assigned", session.total_stops())
        };
        Ok(ApiResponse::success_with_message(session, message))
    }

    /// Importar filas de vehículo de la base externa como sesión del conductor
    pub async fn import(
        &self,
        driver: &str,
        records: Vec<DriverRouteRecord>,
    ) -> Result<ApiResponse<DriverSession>, AppError> {
        let seed = self.seed_loader.current().await?;
        let routes = format_driver_routes(&records, seed.customers());
        let profile = DriverProfile {
            email: driver.to_string(),
            company: self.company.clone(),
        };

        self.cache.persist_driver_session(driver, &profile, &routes).await?;
        tracing::info!("🚚 {} rutas importadas para {}", routes.len(), driver);

        Ok(ApiResponse::success(DriverSession {
            routes,
            profile: Some(profile),
        }))
    }

    pub async fn clear(&self, driver: &str) -> Result<ApiResponse<Value>, AppError> {
        self.cache.clear_driver_session(driver).await?;
        Ok(ApiResponse::success_with_message(
            json!({ "driver": driver }),
            "Driver session cleared".to_string(),
        ))
    }

    pub fn role_route(&self, role: &str) -> ApiResponse<Value> {
        let resolved = Role::from_label(role);
        ApiResponse::success(json!({
            "role": resolved,
            "path": resolved.landing_path(),
        }))
    }
}
