//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del panel de despacho
//! y su conversión a notificaciones HTTP transitorias.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend responded {status}: {body}")]
    BackendStatus { status: u16, body: String },

    #[error("Backend task failed: {0}")]
    TaskFailed(String),

    #[error("Backend task timed out after {attempts} attempts ({elapsed_ms} ms)")]
    TaskTimeout { attempts: u32, elapsed_ms: u128 },

    #[error("Backend task polling cancelled")]
    TaskCancelled,

    #[error("Malformed seed data: {0}")]
    MalformedSeed(String),

    #[error("No route to save: {0}")]
    EmptyAssignment(String),

    #[error("Spreadsheet parse error: {0}")]
    SpreadsheetParse(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Nivel de la notificación mostrada al operador
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Warning,
    Error,
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: &'static str,
    message: String,
    level: NotificationLevel,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl AppError {
    /// Estado HTTP, título y código estable de cada tipo de error
    fn parts(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            AppError::Transport(_) => (StatusCode::BAD_GATEWAY, "Network Error", "TRANSPORT_ERROR"),
            AppError::BackendStatus { .. } => (StatusCode::BAD_GATEWAY, "Backend Error", "BACKEND_ERROR"),
            AppError::TaskFailed(_) => (StatusCode::BAD_GATEWAY, "Task Failed", "TASK_FAILED"),
            AppError::TaskTimeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "Task Timeout", "TASK_TIMEOUT"),
            AppError::TaskCancelled => (StatusCode::SERVICE_UNAVAILABLE, "Task Cancelled", "TASK_CANCELLED"),
            AppError::MalformedSeed(_) => (StatusCode::UNPROCESSABLE_ENTITY, "Malformed Seed Data", "MALFORMED_SEED"),
            AppError::EmptyAssignment(_) => (StatusCode::UNPROCESSABLE_ENTITY, "No Route", "EMPTY_ASSIGNMENT"),
            AppError::SpreadsheetParse(_) => (StatusCode::BAD_REQUEST, "Spreadsheet Error", "SPREADSHEET_PARSE_ERROR"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error", "VALIDATION_ERROR"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden", "FORBIDDEN"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found", "NOT_FOUND"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad Request", "BAD_REQUEST"),
            AppError::Cache(_) => (StatusCode::SERVICE_UNAVAILABLE, "Cache Error", "CACHE_ERROR"),
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration Error", "CONFIG_ERROR"),
            AppError::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Serialization Error", "SERIALIZATION_ERROR"),
        }
    }

    /// Los avisos no son fallos: el operador sólo debe corregir su entrada
    pub fn level(&self) -> NotificationLevel {
        match self {
            AppError::EmptyAssignment(_) | AppError::Validation(_) | AppError::SpreadsheetParse(_) => {
                NotificationLevel::Warning
            }
            _ => NotificationLevel::Error,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, code) = self.parts();
        let level = self.level();

        match level {
            NotificationLevel::Warning => tracing::warn!("⚠️ {}", self),
            NotificationLevel::Error => tracing::error!("❌ {}", self),
        }

        let details = match &self {
            AppError::Validation(e) => Some(json!(e)),
            AppError::BackendStatus { status, .. } => Some(json!({ "backend_status": status })),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error,
            message: self.to_string(),
            level,
            code,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_assignment_is_a_warning() {
        let err = AppError::EmptyAssignment("nothing to send".to_string());
        assert_eq!(err.level(), NotificationLevel::Warning);
        assert!(err.to_string().to_lowercase().contains("no route"));
        assert_eq!(err.parts().0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err = AppError::TaskTimeout { attempts: 3, elapsed_ms: 1500 };
        assert_eq!(err.parts().0, StatusCode::GATEWAY_TIMEOUT);
        assert!(err.to_string().contains("timed out"));
        assert_eq!(err.level(), NotificationLevel::Error);
    }
}
