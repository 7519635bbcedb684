use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::editor_controller::EditorController;
use crate::dto::assignment_dto::SaveReport;
use crate::dto::editor_dto::{
    DragEndRequest, DragEndResponse, EditorSnapshot, RenameDriverRequest, UpdateStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::DragPosition;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_editor_router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(close_session))
        .route("/sessions/:id/rebuild", post(rebuild_session))
        .route("/sessions/:id/drag-start", post(drag_start))
        .route("/sessions/:id/drag-end", post(drag_end))
        .route("/sessions/:id/drivers/:index/name", put(rename_driver))
        .route("/sessions/:id/drivers/:index/status", put(update_status))
        .route("/sessions/:id/save", post(save_session))
}

type SnapshotResult = Result<Json<ApiResponse<EditorSnapshot>>, AppError>;

async fn create_session(State(state): State<AppState>) -> SnapshotResult {
    let controller = EditorController::new(&state);
    Ok(Json(controller.create().await?))
}

async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> SnapshotResult {
    let controller = EditorController::new(&state);
    Ok(Json(controller.get(id).await?))
}

async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = EditorController::new(&state);
    Ok(Json(controller.close(id).await?))
}

async fn rebuild_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> SnapshotResult {
    let controller = EditorController::new(&state);
    Ok(Json(controller.rebuild(id).await?))
}

async fn drag_start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(position): Json<DragPosition>,
) -> SnapshotResult {
    let controller = EditorController::new(&state);
    Ok(Json(controller.drag_start(id, position).await?))
}

async fn drag_end(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<DragEndRequest>,
) -> Result<Json<ApiResponse<DragEndResponse>>, AppError> {
    let controller = EditorController::new(&state);
    Ok(Json(controller.drag_end(id, request).await?))
}

async fn rename_driver(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(request): Json<RenameDriverRequest>,
) -> SnapshotResult {
    let controller = EditorController::new(&state);
    Ok(Json(controller.rename(id, index, request).await?))
}

async fn update_status(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(request): Json<UpdateStatusRequest>,
) -> SnapshotResult {
    let controller = EditorController::new(&state);
    Ok(Json(controller.set_status(id, index, request).await?))
}

async fn save_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SaveReport>>, AppError> {
    let controller = EditorController::new(&state);
    Ok(Json(controller.save(id).await?))
}
