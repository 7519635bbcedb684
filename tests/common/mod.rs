//! Backend del optimizador simulado y helpers del router

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

use route_dispatch::cache::MemoryStore;
use route_dispatch::config::{EnvironmentConfig, PollSettings};
use route_dispatch::routes::create_app_router;
use route_dispatch::state::AppState;

#[derive(Default)]
pub struct MockBackend {
    pub seed: Value,
    pub fail_assignments: bool,
    pub async_geometry: bool,
    pub failing_route_key: Option<String>,
    pub calls: Mutex<Vec<String>>,
    pub bodies: Mutex<HashMap<String, Vec<Value>>>,
    pub task_polls: Mutex<HashMap<String, u32>>,
}

impl MockBackend {
    pub fn with_seed(seed: Value) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|call| call.starts_with(prefix)).count()
    }

    pub fn bodies(&self, path: &str) -> Vec<Value> {
        self.bodies.lock().unwrap().get(path).cloned().unwrap_or_default()
    }

    fn record(&self, call: String, body: Option<(&str, Value)>) {
        self.calls.lock().unwrap().push(call);
        if let Some((path, body)) = body {
            self.bodies
                .lock()
                .unwrap()
                .entry(path.to_string())
                .or_default()
                .push(body);
        }
    }
}

pub fn sample_seed() -> Value {
    json!({
        "df": [
            { "id": 0, "CustomerName": "Depot", "x": 51.38, "y": 35.68 },
            { "id": 101, "CustomerName": "Darou Pakhsh", "Address": "Valiasr St.", "x": 51.40, "y": 35.70,
              "ServiceTime": 15, "CustomerTimeWindow": "08:00-12:00", "arrival_time": 486 },
            { "id": 102, "CustomerName": "Shafa Pharmacy", "x": 51.41, "y": 35.71 },
            { "id": 201, "CustomerName": "Razi Clinic", "x": 51.42, "y": 35.72 },
            { "id": 301, "CustomerName": "Sina Pharmacy", "x": 51.43, "y": 35.73 }
        ],
        "vehicles": [[0, 101, 102, 0], [0, 201, 0]]
    })
}

async fn seed(State(mock): State<Arc<MockBackend>>) -> Json<Value> {
    mock.record("GET /api/map/seed".to_string(), None);
    Json(mock.seed.clone())
}

async fn route_geometry(State(mock): State<Arc<MockBackend>>, Json(body): Json<Value>) -> Response {
    let key = body["routeKey"].as_str().unwrap_or_default().to_string();
    mock.record(format!("POST /api/route-geometry {}", key), Some(("/api/route-geometry", body)));

    if mock.failing_route_key.as_deref() == Some(key.as_str()) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "routing engine down").into_response();
    }
    if mock.async_geometry {
        return Json(json!({ "task_id": format!("task {}", key) })).into_response();
    }
    Json(json!({ "points": [[35.68, 51.38], [35.70, 51.40]], "distance_m": 1500.0 })).into_response()
}

async fn task_status(State(mock): State<Arc<MockBackend>>, Path(task_id): Path<String>) -> Json<Value> {
    mock.record(format!("GET /api/task-status/{}", task_id), None);
    let polls = {
        let mut polls = mock.task_polls.lock().unwrap();
        let count = polls.entry(task_id).or_insert(0);
        *count += 1;
        *count
    };
    if polls < 2 {
        Json(json!({ "status": "pending" }))
    } else {
        Json(json!({
            "status": "success",
            "result": { "points": [[35.68, 51.38], [35.70, 51.40], [35.68, 51.38]], "distance_m": 2500.0 }
        }))
    }
}

async fn driver_assignments(State(mock): State<Arc<MockBackend>>, Json(body): Json<Value>) -> Response {
    mock.record(
        "POST /api/map/driver-assignments".to_string(),
        Some(("/api/map/driver-assignments", body)),
    );
    if mock.fail_assignments {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response();
    }
    Json(json!({ "ok": true })).into_response()
}

async fn customers(State(mock): State<Arc<MockBackend>>, Json(body): Json<Value>) -> Json<Value> {
    mock.record("POST /api/customers".to_string(), Some(("/api/customers", body)));
    Json(json!({ "ok": true }))
}

async fn assign_customer(State(mock): State<Arc<MockBackend>>, Json(body): Json<Value>) -> Json<Value> {
    mock.record("POST /api/assign-customer".to_string(), Some(("/api/assign-customer", body)));
    Json(json!({ "ok": true }))
}

/// Levantar el backend simulado en un puerto libre y devolver su URL base
pub async fn spawn_backend(mock: Arc<MockBackend>) -> String {
    let router = Router::new()
        .route("/api/map/seed", get(seed))
        .route("/api/route-geometry", post(route_geometry))
        .route("/api/task-status/:task_id", get(task_status))
        .route("/api/map/driver-assignments", post(driver_assignments))
        .route("/api/customers", post(customers))
        .route("/api/assign-customer", post(assign_customer))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn test_app(backend_base_url: &str) -> Router {
    let config = EnvironmentConfig {
        backend_base_url: backend_base_url.to_string(),
        backend_timeout: Duration::from_secs(5),
        company: "Acme".to_string(),
        poll: PollSettings {
            interval: Duration::from_millis(10),
            max_attempts: 10,
            deadline: Duration::from_secs(5),
        },
        ..EnvironmentConfig::default()
    };
    let state = AppState::new(config, Arc::new(MemoryStore::new())).unwrap();
    create_app_router(state)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Crear una sesión del editor y devolver su id
pub async fn create_session(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/api/editor/sessions", None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["data"]["sessionId"].as_str().unwrap().to_string()
}
