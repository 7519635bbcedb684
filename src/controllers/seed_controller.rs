use crate::dto::seed_dto::SeedStatusResponse;
use crate::dto::upload_dto::{UploadReport, UploadRequest};
use crate::dto::ApiResponse;
use crate::services::{SeedLoader, UploadService};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct SeedController {
    seed_loader: SeedLoader,
    upload: UploadService,
}

impl SeedController {
    pub fn new(state: &AppState) -> Self {
        Self {
            seed_loader: state.seed_loader.clone(),
            upload: state.upload.clone(),
        }
    }

    /// Estado de la semilla; la primera consulta dispara la carga
    pub async fn status(&self) -> Result<ApiResponse<SeedStatusResponse>, AppError> {
        if let Err(e) = self.seed_loader.current().await {
            tracing::warn!("⚠️ Semilla no disponible: {}", e);
        }
        Ok(ApiResponse::success(self.seed_loader.state().await.to_response()))
    }

    pub async fn refresh(&self) -> Result<ApiResponse<SeedStatusResponse>, AppError> {
        self.seed_loader.refresh_from_backend().await?;
        Ok(ApiResponse::success_with_message(
            self.seed_loader.state().await.to_response(),
            "Seed refreshed from backend".to_string(),
        ))
    }

    pub async fn upload(&self, request: UploadRequest) -> Result<ApiResponse<UploadReport>, AppError> {
        let report = self.upload.submit(request).await?;
        Ok(ApiResponse::success_with_message(
            report,
            "Customers uploaded".to_string(),
        ))
    }
}
