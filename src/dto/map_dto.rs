//! DTOs del mapa
//!
//! Capas listas para dibujar con cualquier librería de mapas: una capa por
//! ruta, marcadores numerados y la capa de clientes sin asignar.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPopup {
    pub arrival: String,
    pub service_start: String,
    pub finish: String,
    pub time_window: String,
    pub cluster: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopMarker {
    pub customer_id: i64,
    /// Número de secuencia mostrado en el marcador
    pub label: String,
    pub position: [f64; 2],
    pub popup: StopPopup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLayer {
    pub driver_index: usize,
    pub driver_name: String,
    pub name: String,
    pub color: &'static str,
    pub polyline: Vec<[f64; 2]>,
    pub distance_m: f64,
    pub markers: Vec<StopMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignedMarker {
    pub customer_id: i64,
    pub position: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: [f64; 2],
    pub layers: Vec<RouteLayer>,
    pub unassigned: Vec<UnassignedMarker>,
    pub distance_log: Vec<String>,
}

