//! Carga de clientes
//!
//! Valida el formulario, guarda filas y depósito en la cache y pide una
//! semilla nueva al backend.

use serde_json::Value;
use validator::Validate;

use crate::cache::DashboardCache;
use crate::dto::upload_dto::{UploadReport, UploadRequest};
use crate::services::seed_loader::SeedLoader;
use crate::utils::errors::{AppError, AppResult};

#[derive(Clone)]
pub struct UploadService {
    cache: DashboardCache,
    seed_loader: SeedLoader,
}

impl UploadService {
    pub fn new(cache: DashboardCache, seed_loader: SeedLoader) -> Self {
        Self { cache, seed_loader }
    }

    pub async fn submit(&self, request: UploadRequest) -> AppResult<UploadReport> {
        request.validate()?;
        let rows = spreadsheet_rows(&request.rows)?;
        let depot = request.depot();

        tracing::info!(
            "📤 Carga de {} filas, depósito ({}, {}), {} vehículos de capacidad {}",
            rows.len(),
            depot.latitude,
            depot.longitude,
            request.num_vehicles,
            request.max_capacity
        );

        self.cache.save_uploaded_rows(rows).await?;
        self.cache.save_depot(&depot).await?;

        let seed = self.seed_loader.refresh_from_backend().await?;

        Ok(UploadReport {
            rows_stored: rows.len(),
            depot,
            seed: seed.summary(),
        })
    }
}

/// Las filas deben ser un arreglo no vacío de objetos
pub fn spreadsheet_rows(value: &Value) -> AppResult<&[Value]> {
    let rows = value
        .as_array()
        .ok_or_else(|| AppError::SpreadsheetParse("rows must be an array of objects".to_string()))?;

    if rows.is_empty() {
        return Err(AppError::SpreadsheetParse("the spreadsheet has no rows".to_string()));
    }

    if let Some(index) = rows.iter().position(|row| !row.is_object()) {
        return Err(AppError::SpreadsheetParse(format!(
            "row {} is not an object",
            index + 1
        )));
    }

    Ok(rows)
}
