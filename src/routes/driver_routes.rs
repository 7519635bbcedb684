use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use crate::controllers::driver_controller::DriverController;
use crate::dto::ApiResponse;
use crate::models::driver::{DriverRouteRecord, DriverSession};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route(
            "/driver/:driver/routes",
            get(driver_routes).post(import_driver_routes).delete(clear_driver_routes),
        )
        .route("/role-route/:role", get(role_route))
}

/// Rol informado por el proveedor de autenticación
#[derive(Debug, Deserialize)]
struct RoleQuery {
    role: Option<String>,
}

async fn driver_routes(
    State(state): State<AppState>,
    Path(driver): Path<String>,
    Query(query): Query<RoleQuery>,
) -> Result<Json<ApiResponse<DriverSession>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.routes(&driver, query.role.as_deref()).await?))
}

async fn import_driver_routes(
    State(state): State<AppState>,
    Path(driver): Path<String>,
    Json(records): Json<Vec<DriverRouteRecord>>,
) -> Result<Json<ApiResponse<DriverSession>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.import(&driver, records).await?))
}

async fn clear_driver_routes(
    State(state): State<AppState>,
    Path(driver): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let controller = DriverController::new(&state);
    Ok(Json(controller.clear(&driver).await?))
}

async fn role_route(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Json<ApiResponse<Value>> {
    let controller = DriverController::new(&state);
    Json(controller.role_route(&role))
}
