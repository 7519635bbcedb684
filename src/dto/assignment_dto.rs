//! DTOs de asignación de conductores
//!
//! Estructuras enviadas al backend al guardar el tablero de asignaciones.
//! Los nombres de campo siguen exactamente el contrato del backend.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::route::Stop;

/// Body de `POST /api/map/driver-assignments` (un elemento por conductor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverAssignmentPayload {
    #[serde(rename = "driverName")]
    pub driver_name: String,
    pub route: Vec<i64>,
    pub company: String,
}

/// Detalle de un cliente asignado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetailRecord {
    #[serde(rename = "customerId")]
    pub customer_id: i64,
    #[serde(rename = "CustomerName")]
    pub customer_name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "ServiceTime")]
    pub service_time: Option<Value>,
    #[serde(rename = "CustomerTimeWindow")]
    pub customer_time_window: Option<Value>,
}

impl From<&Stop> for CustomerDetailRecord {
    fn from(stop: &Stop) -> Self {
        Self {
            customer_id: stop.customer_id,
            customer_name: stop.customer_name.clone(),
            address: stop.address.clone(),
            latitude: stop.latitude.filter(|v| v.is_finite()),
            longitude: stop.longitude.filter(|v| v.is_finite()),
            service_time: stop.service_time.clone(),
            customer_time_window: stop.customer_time_window.clone(),
        }
    }
}

/// Body de `POST /api/customers`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetailsPayload {
    pub company: String,
    pub customers: Vec<CustomerDetailRecord>,
}

/// Body de `POST /api/assign-customer`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignCustomerRequest {
    #[serde(rename = "customerId")]
    pub customer_id: i64,
}

/// Lo que se envía en un guardado: asignaciones y detalle aplanado
#[derive(Debug, Clone, PartialEq)]
pub struct SavePlan {
    pub assignments: Vec<DriverAssignmentPayload>,
    pub customers: CustomerDetailsPayload,
}

/// Resultado de un guardado exitoso
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReport {
    pub drivers_saved: usize,
    pub customers_saved: usize,
    pub saved_at: chrono::DateTime<chrono::Utc>,
}
