use uuid::Uuid;

use crate::dto::assignment_dto::SaveReport;
use crate::dto::editor_dto::{
    DragEndRequest, DragEndResponse, EditorSnapshot, RenameDriverRequest, UpdateStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::{DragPosition, RouteStatus, SeedData};
use crate::services::seed_loader::empty_seed_error;
use crate::services::{EditorService, SeedLoader};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct EditorController {
    editor: EditorService,
    seed_loader: SeedLoader,
}

impl EditorController {
    pub fn new(state: &AppState) -> Self {
        Self {
            editor: state.editor.clone(),
            seed_loader: state.seed_loader.clone(),
        }
    }

    async fn seed(&self) -> Result<SeedData, AppError> {
        let seed = self.seed_loader.current().await?;
        if seed.is_empty() {
            return Err(empty_seed_error());
        }
        Ok(seed)
    }

    pub async fn create(&self) -> Result<ApiResponse<EditorSnapshot>, AppError> {
        let seed = self.seed().await?;
        let snapshot = self.editor.create(&seed).await;
        Ok(ApiResponse::success_with_message(
            snapshot,
            "Editor session created".to_string(),
        ))
    }

    pub async fn close(&self, id: Uuid) -> Result<ApiResponse<()>, AppError> {
        self.editor.close(id).await?;
        Ok(ApiResponse::success_with_message((), "Editor session closed".to_string()))
    }

    pub async fn get(&self, id: Uuid) -> Result<ApiResponse<EditorSnapshot>, AppError> {
        Ok(ApiResponse::success(self.editor.snapshot(id).await?))
    }

    /// Semilla nueva del backend aplicada sobre la sesión
    pub async fn rebuild(&self, id: Uuid) -> Result<ApiResponse<EditorSnapshot>, AppError> {
        let seed = self.seed_loader.refresh_from_backend().await?;
        Ok(ApiResponse::success(self.editor.rebuild(id, &seed).await?))
    }

    pub async fn drag_start(
        &self,
        id: Uuid,
        position: DragPosition,
    ) -> Result<ApiResponse<EditorSnapshot>, AppError> {
        Ok(ApiResponse::success(self.editor.begin_drag(id, position).await?))
    }

    pub async fn drag_end(
        &self,
        id: Uuid,
        request: DragEndRequest,
    ) -> Result<ApiResponse<DragEndResponse>, AppError> {
        let response = self
            .editor
            .end_drag(id, request.source, request.destination)
            .await?;
        Ok(ApiResponse::success(response))
    }

    pub async fn rename(
        &self,
        id: Uuid,
        driver_index: usize,
        request: RenameDriverRequest,
    ) -> Result<ApiResponse<EditorSnapshot>, AppError> {
        let snapshot = self
            .editor
            .rename_driver(id, driver_index, request.name)
            .await?;
        Ok(ApiResponse::success(snapshot))
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        driver_index: usize,
        request: UpdateStatusRequest,
    ) -> Result<ApiResponse<EditorSnapshot>, AppError> {
        let status: RouteStatus = request.status.parse()?;
        let snapshot = self.editor.set_status(id, driver_index, status).await?;
        Ok(ApiResponse::success(snapshot))
    }

    pub async fn save(&self, id: Uuid) -> Result<ApiResponse<SaveReport>, AppError> {
        let report = self.editor.save(id).await?;
        Ok(ApiResponse::success_with_message(
            report,
            "Driver assignments saved".to_string(),
        ))
    }
}
