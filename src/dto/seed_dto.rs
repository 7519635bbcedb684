//! DTOs del optimizador externo
//!
//! Contratos de `GET /api/map/seed`, `POST /api/route-geometry` y
//! `GET /api/task-status/:taskId`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Respuesta cruda de `GET /api/map/seed`; la forma se valida en `SeedData`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedResponse {
    #[serde(default)]
    pub df: Value,
    #[serde(default)]
    pub vehicles: Value,
}

/// Body de `POST /api/route-geometry`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRequest {
    pub route: Vec<i64>,
    #[serde(rename = "routeKey")]
    pub route_key: String,
}

impl GeometryRequest {
    pub fn for_route(route: &[i64]) -> Self {
        Self {
            route: route.to_vec(),
            route_key: route_key(route),
        }
    }
}

/// Clave de cache de geometría del backend: ids unidos con `-`
pub fn route_key(route: &[i64]) -> String {
    route
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// Polilínea `[lat, lon]` y distancia en metros
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    #[serde(default)]
    pub points: Vec<[f64; 2]>,
    #[serde(default)]
    pub distance_m: f64,
}

/// Respuesta de geometría: inmediata o encolada como tarea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeometryReply {
    Enqueued { task_id: String },
    Ready(RouteGeometry),
}

/// Estado de una tarea del backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Started,
    Success,
    Failure,
    #[serde(other)]
    Unknown,
}

/// Respuesta de `GET /api/task-status/:taskId`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusResponse {
    pub status: TaskStatus,
    #[serde(default)]
    pub result: Option<RouteGeometry>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Estado de la semilla expuesto en `GET /api/seed`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedStatusResponse {
    pub state: &'static str,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<crate::models::seed::SeedSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_key_joins_ids() {
        assert_eq!(route_key(&[0, 101, 102, 0]), "0-101-102-0");
        assert_eq!(GeometryRequest::for_route(&[]).route_key, "");
    }

    #[test]
    fn test_geometry_reply_distinguishes_task_from_result() {
        let queued: GeometryReply = serde_json::from_value(json!({ "task_id": "abc" })).unwrap();
        assert_eq!(queued, GeometryReply::Enqueued { task_id: "abc".into() });

        let ready: GeometryReply = serde_json::from_value(json!({
            "points": [[35.7, 51.4], [35.8, 51.5]], "distance_m": 1200.5
        }))
        .unwrap();
        match ready {
            GeometryReply::Ready(geometry) => {
                assert_eq!(geometry.points.len(), 2);
                assert_eq!(geometry.distance_m, 1200.5);
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[test]
    fn test_unknown_task_status_does_not_fail_parsing() {
        let response: TaskStatusResponse =
            serde_json::from_value(json!({ "status": "retry" })).unwrap();
        assert_eq!(response.status, TaskStatus::Unknown);
        assert!(response.result.is_none());
    }
}
