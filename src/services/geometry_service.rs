//! Geometría de rutas
//!
//! Pide al backend la polilínea de cada ruta en paralelo. Una ruta que
//! falla no bloquea a las demás: queda con geometría vacía y un aviso.

use futures::future::join_all;
use std::sync::Arc;

use crate::client::BackendClient;
use crate::config::PollSettings;
use crate::dto::seed_dto::{GeometryReply, RouteGeometry};
use crate::models::DEPOT_ID;
use crate::services::task_poller::{CancellationFlag, TaskPoller};
use crate::utils::errors::{AppError, AppResult};

/// Geometrías alineadas con las rutas pedidas, más los avisos de las que fallaron
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBatch {
    pub geometries: Vec<RouteGeometry>,
    pub warnings: Vec<String>,
}

#[derive(Clone)]
pub struct GeometryService {
    backend: Arc<BackendClient>,
    poll: PollSettings,
}

impl GeometryService {
    pub fn new(backend: Arc<BackendClient>, poll: PollSettings) -> Self {
        Self { backend, poll }
    }

    /// Geometría de una ruta `[0, ids..., 0]`; espera la tarea si el backend la encola
    pub async fn route_geometry(&self, route: &[i64], cancel: &CancellationFlag) -> AppResult<RouteGeometry> {
        match self.backend.request_route_geometry(route).await? {
            GeometryReply::Ready(geometry) => Ok(geometry),
            GeometryReply::Enqueued { task_id } => {
                log::info!("⏳ Geometría encolada como tarea {}", task_id);
                TaskPoller::new(self.backend.clone(), self.poll)
                    .poll(&task_id, cancel)
                    .await
            }
        }
    }

    /// Geometría de todas las rutas en paralelo.
    ///
    /// Cada entrada de `stops` son los clientes de un vehículo, sin depósito.
    /// Si se cancela antes de terminar, el lote no se aplica.
    pub async fn fetch_all(&self, stops: &[Vec<i64>], cancel: &CancellationFlag) -> AppResult<GeometryBatch> {
        let requests = stops.iter().map(|ids| async move {
            if ids.is_empty() {
                return Ok(RouteGeometry::default());
            }
            let route = depot_bounded(ids);
            self.route_geometry(&route, cancel).await
        });
        let results = join_all(requests).await;

        if cancel.is_cancelled() {
            return Err(AppError::TaskCancelled);
        }

        Ok(collect_batch(results))
    }
}

/// Ruta completa del vehículo: sale y vuelve al depósito
pub fn depot_bounded(ids: &[i64]) -> Vec<i64> {
    let mut route = Vec::with_capacity(ids.len() + 2);
    route.push(DEPOT_ID);
    route.extend(ids.iter().copied().filter(|id| *id != DEPOT_ID));
    route.push(DEPOT_ID);
    route
}

fn collect_batch(results: Vec<AppResult<RouteGeometry>>) -> GeometryBatch {
    let mut batch = GeometryBatch::default();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(geometry) => batch.geometries.push(geometry),
            Err(e) => {
                log::warn!("⚠️ Geometría del vehículo {} no disponible: {}", index + 1, e);
                batch.warnings.push(format!("Vehicle {}: {}", index + 1, e));
                batch.geometries.push(RouteGeometry::default());
            }
        }
    }
    batch
}
