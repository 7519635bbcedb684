//! Cliente HTTP del backend del optimizador
//!
//! Este módulo contiene el cliente para los contratos HTTP del backend
//! externo: semilla, geometría de rutas, estado de tareas y guardado de
//! asignaciones.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::dto::assignment_dto::{
    AssignCustomerRequest, CustomerDetailsPayload, DriverAssignmentPayload,
};
use crate::dto::seed_dto::{GeometryReply, GeometryRequest, SeedResponse, TaskStatusResponse};
use crate::utils::errors::{AppError, AppResult};

/// Fuente del estado de una tarea del backend
#[async_trait]
pub trait TaskStatusSource: Send + Sync {
    async fn task_status(&self, task_id: &str) -> AppResult<TaskStatusResponse>;
}

/// Cliente HTTP del backend del optimizador
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Crear nuevo cliente con la URL base y el timeout de cada request
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("RouteDispatch/1.0")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/map/seed`
    pub async fn fetch_seed(&self) -> AppResult<SeedResponse> {
        let url = self.url("/api/map/seed");
        log::info!("🌱 Pidiendo semilla al backend: {}", url);

        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }

    /// `POST /api/route-geometry`
    pub async fn request_route_geometry(&self, route: &[i64]) -> AppResult<GeometryReply> {
        let body = GeometryRequest::for_route(route);
        log::debug!("🗺️ Geometría solicitada para ruta {}", body.route_key);

        let response = self
            .client
            .post(self.url("/api/route-geometry"))
            .json(&body)
            .send()
            .await?;
        read_json(response).await
    }

    /// `POST /api/map/driver-assignments`
    pub async fn post_driver_assignments(
        &self,
        assignments: &[DriverAssignmentPayload],
    ) -> AppResult<()> {
        log::info!("📤 Enviando {} asignaciones de conductor", assignments.len());

        let response = self
            .client
            .post(self.url("/api/map/driver-assignments"))
            .json(assignments)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }

    /// `POST /api/customers`
    pub async fn post_customers(&self, payload: &CustomerDetailsPayload) -> AppResult<()> {
        log::info!(
            "📤 Enviando detalle de {} clientes para {}",
            payload.customers.len(),
            payload.company
        );

        let response = self
            .client
            .post(self.url("/api/customers"))
            .json(payload)
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }

    /// `POST /api/assign-customer`
    pub async fn assign_customer(&self, customer_id: i64) -> AppResult<()> {
        let response = self
            .client
            .post(self.url("/api/assign-customer"))
            .json(&AssignCustomerRequest { customer_id })
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }
}

#[async_trait]
impl TaskStatusSource for BackendClient {
    /// `GET /api/task-status/:taskId`
    async fn task_status(&self, task_id: &str) -> AppResult<TaskStatusResponse> {
        let url = self.url(&format!("/api/task-status/{}", urlencoding::encode(task_id)));
        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }
}

async fn ensure_success(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    log::warn!("📡 Backend respondió {}: {}", status, body);
    Err(AppError::BackendStatus {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let response = ensure_success(response).await?;
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}
