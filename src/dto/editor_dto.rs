//! DTOs del editor de asignaciones

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::assignment::{DragOutcome, DragPosition};
use crate::models::route::{Route, Stop};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEndRequest {
    pub source: DragPosition,
    /// Ausente cuando se suelta fuera de cualquier destino válido
    #[serde(default)]
    pub destination: Option<DragPosition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenameDriverRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Estado visible de una sesión del editor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub session_id: Uuid,
    pub routes: Vec<Route>,
    pub active_stop: Option<Stop>,
    pub total_stops: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragEndResponse {
    pub outcome: DragOutcome,
    pub snapshot: EditorSnapshot,
}
