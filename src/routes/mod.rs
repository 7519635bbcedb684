//! Routes
//!
//! Un router por área del panel, combinados en `create_app_router`.

pub mod driver_routes;
pub mod editor_routes;
pub mod map_routes;
pub mod seed_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest(
            "/api",
            seed_routes::create_seed_router().merge(driver_routes::create_driver_router()),
        )
        .nest("/api/editor", editor_routes::create_editor_router())
        .nest("/api/map", map_routes::create_map_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "route_dispatch",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
