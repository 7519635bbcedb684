//! Cache del panel
//!
//! Operaciones tipadas de carga y guardado sobre un `CacheStore`. Las claves
//! son las mismas que usaba el almacenamiento del navegador.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::CacheStore;
use crate::dto::upload_dto::DepotLocation;
use crate::models::driver::{DriverProfile, DriverRoute, DriverSession};
use crate::models::seed::{parse_vehicles, SeedData};
use crate::utils::errors::AppResult;

pub const SEED_ROWS_KEY: &str = "seedDf";
pub const SEED_VEHICLES_KEY: &str = "seedVehicles";
pub const UPLOADED_ROWS_KEY: &str = "uploadedExcelData";
pub const DEPOT_LOCATION_KEY: &str = "depotLocation";
pub const DRIVER_ROUTES_KEY: &str = "driverDashboardRoutes";
pub const DRIVER_PROFILE_KEY: &str = "driverDashboardProfile";

#[derive(Clone)]
pub struct DashboardCache {
    store: Arc<dyn CacheStore>,
}

impl DashboardCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.store.get_raw(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize + ?Sized + Sync>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set_raw(key, raw).await
    }

    /// Última semilla vista. Entradas corruptas cuentan como ausentes.
    pub async fn load_seed(&self) -> AppResult<Option<SeedData>> {
        let rows = self.get_json::<Vec<Value>>(SEED_ROWS_KEY).await;
        let vehicles = self.get_json::<Value>(SEED_VEHICLES_KEY).await;

        match (rows, vehicles) {
            (Ok(Some(rows)), Ok(Some(vehicles))) => match parse_vehicles(&vehicles) {
                Ok(vehicles) => {
                    debug!("📥 Semilla leída de cache: {} filas, {} vehículos", rows.len(), vehicles.len());
                    Ok(Some(SeedData::new(rows, vehicles)))
                }
                Err(e) => {
                    warn!("⚠️ Vehículos en cache inválidos: {}", e);
                    Ok(None)
                }
            },
            (Ok(_), Ok(_)) => Ok(None),
            (Err(e), _) | (_, Err(e)) => {
                warn!("⚠️ Semilla en cache ilegible: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn save_seed(&self, seed: &SeedData) -> AppResult<()> {
        self.set_json(SEED_ROWS_KEY, seed.rows()).await?;
        self.set_json(SEED_VEHICLES_KEY, seed.vehicles()).await
    }

    pub async fn load_uploaded_rows(&self) -> AppResult<Option<Vec<Value>>> {
        self.get_json(UPLOADED_ROWS_KEY).await
    }

    pub async fn save_uploaded_rows(&self, rows: &[Value]) -> AppResult<()> {
        self.set_json(UPLOADED_ROWS_KEY, rows).await
    }

    pub async fn load_depot(&self) -> AppResult<Option<DepotLocation>> {
        self.get_json(DEPOT_LOCATION_KEY).await
    }

    pub async fn save_depot(&self, depot: &DepotLocation) -> AppResult<()> {
        self.set_json(DEPOT_LOCATION_KEY, depot).await
    }

    pub async fn persist_driver_session(
        &self,
        driver: &str,
        profile: &DriverProfile,
        routes: &[DriverRoute],
    ) -> AppResult<()> {
        self.set_json(&driver_key(DRIVER_ROUTES_KEY, driver), routes).await?;
        self.set_json(&driver_key(DRIVER_PROFILE_KEY, driver), profile).await
    }

    /// Sesión guardada del conductor; si no se puede leer, sesión vacía
    pub async fn read_driver_session(&self, driver: &str) -> DriverSession {
        let routes = self
            .get_json::<Vec<DriverRoute>>(&driver_key(DRIVER_ROUTES_KEY, driver))
            .await;
        let profile = self
            .get_json::<DriverProfile>(&driver_key(DRIVER_PROFILE_KEY, driver))
            .await;

        match (routes, profile) {
            (Ok(routes), Ok(profile)) => DriverSession {
                routes: routes.unwrap_or_default(),
                profile,
            },
            (Err(e), _) | (_, Err(e)) => {
                error!("❌ No se pudo leer la sesión del conductor {}: {}", driver, e);
                DriverSession::default()
            }
        }
    }

    pub async fn clear_driver_session(&self, driver: &str) -> AppResult<()> {
        self.store.delete(&driver_key(DRIVER_ROUTES_KEY, driver)).await?;
        self.store.delete(&driver_key(DRIVER_PROFILE_KEY, driver)).await
    }
}

fn driver_key(prefix: &str, driver: &str) -> String {
    format!("{}:{}", prefix, driver.trim().to_lowercase())
}
