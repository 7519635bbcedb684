//! DTOs del formulario de carga de clientes
//!
//! Depósito, restricciones de vehículos y las filas ya leídas de la hoja.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::models::seed::SeedSummary;
use crate::utils::validation::{parse_clock, validate_clock};

fn default_start_time() -> String {
    "08:00".to_string()
}

fn default_finish_time() -> String {
    "20:00".to_string()
}

// Request del formulario de carga
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_service_window", skip_on_field_errors = true))]
pub struct UploadRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub depot_latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub depot_longitude: f64,

    #[serde(default = "default_start_time")]
    #[validate(custom = "validate_clock")]
    pub start_time: String,

    #[serde(default = "default_finish_time")]
    #[validate(custom = "validate_clock")]
    pub finish_time: String,

    #[validate(range(min = 1))]
    pub max_capacity: u32,

    #[validate(range(min = 1))]
    pub num_vehicles: u32,

    /// Filas de la hoja de cálculo, ya convertidas a objetos JSON
    #[serde(default)]
    pub rows: Value,
}

impl UploadRequest {
    pub fn depot(&self) -> DepotLocation {
        DepotLocation {
            latitude: self.depot_latitude,
            longitude: self.depot_longitude,
        }
    }
}

fn validate_service_window(request: &UploadRequest) -> Result<(), ValidationError> {
    let start = parse_clock(&request.start_time)?;
    let finish = parse_clock(&request.finish_time)?;
    if start >= finish {
        let mut error = ValidationError::new("service_window");
        error.add_param("start_time".into(), &request.start_time);
        error.add_param("finish_time".into(), &request.finish_time);
        return Err(error);
    }
    Ok(())
}

/// Ubicación del depósito guardada en cache
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepotLocation {
    pub latitude: f64,
    pub longitude: f64,
}

// Response de la carga
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReport {
    pub rows_stored: usize,
    pub depot: DepotLocation,
    pub seed: SeedSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(overrides: Value) -> UploadRequest {
        let mut base = json!({
            "depotLatitude": 35.6892,
            "depotLongitude": 51.3890,
            "maxCapacity": 40,
            "numVehicles": 6,
            "rows": [{ "id": 1 }]
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn test_valid_form_uses_default_hours() {
        let form = request(json!({}));
        assert_eq!(form.start_time, "08:00");
        assert_eq!(form.finish_time, "20:00");
        assert!(form.validate().is_ok());
        assert_eq!(form.depot(), DepotLocation { latitude: 35.6892, longitude: 51.3890 });
    }

    #[test]
    fn test_out_of_range_depot_is_rejected() {
        assert!(request(json!({ "depotLatitude": 91.0 })).validate().is_err());
        assert!(request(json!({ "depotLongitude": -200.0 })).validate().is_err());
    }

    #[test]
    fn test_vehicle_constraints_must_be_positive() {
        assert!(request(json!({ "numVehicles": 0 })).validate().is_err());
        assert!(request(json!({ "maxCapacity": 0 })).validate().is_err());
    }

    #[test]
    fn test_service_window_must_be_ordered() {
        assert!(request(json!({ "startTime": "18:00", "finishTime": "09:00" })).validate().is_err());
        assert!(request(json!({ "startTime": "9am" })).validate().is_err());
    }
}
