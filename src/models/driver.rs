//! Modelos de la vista del conductor
//!
//! Perfil, rutas y paradas tal como las ve un conductor en su panel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::errors::{AppError, AppResult};

/// Perfil guardado en la sesión del conductor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverProfile {
    pub email: String,
    pub company: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRouteStop {
    pub id: i64,
    pub order: usize,
    pub customer_name: String,
    #[serde(default)]
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub service_time: Option<Value>,
    #[serde(default)]
    pub customer_time_window: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRoute {
    pub id: Value,
    pub name: String,
    pub departure: String,
    pub arrival: String,
    pub status: String,
    pub stops: Vec<DriverRouteStop>,
}

/// Fila de vehículo tal como la entrega la base externa.
/// `route` puede venir como arreglo o como string JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRouteRecord {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub driver_email: Option<String>,
    #[serde(default)]
    pub route: Value,
}

/// Instantánea de sesión: rutas y perfil
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverSession {
    pub routes: Vec<DriverRoute>,
    pub profile: Option<DriverProfile>,
}

impl DriverSession {
    pub fn total_stops(&self) -> usize {
        self.routes.iter().map(|route| route.stops.len()).sum()
    }
}

/// Rol informado por el proveedor de autenticación externo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Driver,
    Operator,
}

impl Role {
    /// Cualquier rol distinto de `driver` opera el tablero
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("driver") {
            Role::Driver
        } else {
            Role::Operator
        }
    }

    /// Página a la que se envía a cada rol después de entrar
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Driver => "/driver-dashboard",
            Role::Operator => "/upload-customer",
        }
    }

    pub fn ensure_driver(&self) -> AppResult<()> {
        match self {
            Role::Driver => Ok(()),
            Role::Operator => Err(AppError::Forbidden(
                "this page is only for drivers".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_route_to_their_pages() {
        assert_eq!(Role::from_label("Driver").landing_path(), "/driver-dashboard");
        assert_eq!(Role::from_label("admin").landing_path(), "/upload-customer");
        assert_eq!(Role::from_label("").landing_path(), "/upload-customer");
    }

    #[test]
    fn test_only_drivers_reach_driver_view() {
        assert!(Role::Driver.ensure_driver().is_ok());
        assert!(matches!(Role::Operator.ensure_driver(), Err(AppError::Forbidden(_))));
    }
}
