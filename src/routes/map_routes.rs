use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::map_controller::MapController;
use crate::dto::assignment_dto::AssignCustomerRequest;
use crate::dto::map_dto::MapView;
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_map_router() -> Router<AppState> {
    Router::new()
        .route("/sessions/:id", get(session_map))
        .route("/assign-customer", post(assign_customer))
}

async fn session_map(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MapView>>, AppError> {
    let controller = MapController::new(&state);
    Ok(Json(controller.session_map(id).await?))
}

async fn assign_customer(
    State(state): State<AppState>,
    Json(request): Json<AssignCustomerRequest>,
) -> Result<Json<ApiResponse<AssignCustomerRequest>>, AppError> {
    let controller = MapController::new(&state);
    Ok(Json(controller.assign_customer(request).await?))
}
