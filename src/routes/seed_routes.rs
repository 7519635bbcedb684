use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::seed_controller::SeedController;
use crate::dto::seed_dto::SeedStatusResponse;
use crate::dto::upload_dto::{UploadReport, UploadRequest};
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_seed_router() -> Router<AppState> {
    Router::new()
        .route("/seed", get(seed_status))
        .route("/seed/refresh", post(refresh_seed))
        .route("/upload", post(upload_customers))
}

async fn seed_status(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SeedStatusResponse>>, AppError> {
    let controller = SeedController::new(&state);
    Ok(Json(controller.status().await?))
}

async fn refresh_seed(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SeedStatusResponse>>, AppError> {
    let controller = SeedController::new(&state);
    Ok(Json(controller.refresh().await?))
}

async fn upload_customers(
    State(state): State<AppState>,
    Json(request): Json<UploadRequest>,
) -> Result<Json<ApiResponse<UploadReport>>, AppError> {
    let controller = SeedController::new(&state);
    Ok(Json(controller.upload(request).await?))
}
