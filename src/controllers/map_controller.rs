use std::sync::Arc;
use uuid::Uuid;

use crate::client::BackendClient;
use crate::dto::assignment_dto::AssignCustomerRequest;
use crate::dto::map_dto::MapView;
use crate::dto::ApiResponse;
use crate::services::map_view::build_map_view;
use crate::services::{EditorService, GeometryService};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct MapController {
    editor: EditorService,
    geometry: GeometryService,
    backend: Arc<BackendClient>,
}

impl MapController {
    pub fn new(state: &AppState) -> Self {
        Self {
            editor: state.editor.clone(),
            geometry: state.geometry.clone(),
            backend: state.backend.clone(),
        }
    }

    /// Capas del mapa de la sesión; las geometrías que fallan van como avisos.
    ///
    /// El sondeo se corta si la sesión se cierra o se reconstruye mientras tanto.
    pub async fn session_map(&self, id: Uuid) -> Result<ApiResponse<MapView>, AppError> {
        let board = self.editor.board(id).await?;
        let stops: Vec<Vec<i64>> = board
            .assignments
            .routes()
            .iter()
            .map(|route| route.customer_ids())
            .collect();

        let batch = self.geometry.fetch_all(&stops, &board.cancel).await?;
        let view = build_map_view(&board.assignments, &board.customers, &batch.geometries);

        Ok(ApiResponse::success(view).with_warnings(batch.warnings))
    }

    pub async fn assign_customer(
        &self,
        request: AssignCustomerRequest,
    ) -> Result<ApiResponse<AssignCustomerRequest>, AppError> {
        self.backend.assign_customer(request.customer_id).await?;
        Ok(ApiResponse::success_with_message(
            request,
            format!("Customer {} sent for assignment", request.customer_id),
        ))
    }
}
