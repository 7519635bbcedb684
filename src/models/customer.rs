//! Modelo de cliente
//!
//! Las filas del optimizador y de la hoja de cálculo llegan con nombres de
//! campo variables (`Latitude`, `lat`, `y`...). `CustomerRow::from_value` es
//! el único punto donde se normalizan; el resto del sistema sólo ve el tipo.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::route::DEPOT_ID;

const ID_KEYS: &[&str] = &["id", "ID", "Id", "customerId", "customer_id"];
const NAME_KEYS: &[&str] = &["CustomerName", "customer_name", "customerName"];
const ADDRESS_KEYS: &[&str] = &["Address", "address", "CustomerAddress"];
const LATITUDE_KEYS: &[&str] = &["y", "Latitude", "latitude", "Lat", "lat"];
const LONGITUDE_KEYS: &[&str] = &["x", "Longitude", "longitude", "Lon", "lon"];
const SERVICE_TIME_KEYS: &[&str] = &["ServiceTime", "service_time", "serviceTime"];
const TIME_WINDOW_KEYS: &[&str] = &["CustomerTimeWindow", "customer_time_window", "customerTimeWindow"];

/// Fila de cliente normalizada
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRow {
    pub id: i64,
    pub customer_name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Metadatos opacos, se reenvían sin modificar
    pub service_time: Option<Value>,
    pub customer_time_window: Option<Value>,
    // Tiempos del optimizador en minutos desde medianoche
    pub arrival_time: Option<f64>,
    pub start_service: Option<f64>,
    pub finish_service: Option<f64>,
    pub ready_time: Option<f64>,
    pub due_time: Option<f64>,
    pub cluster: Option<Value>,
}

impl CustomerRow {
    /// Normalizar una fila JSON cruda. Sin identificador numérico no hay fila.
    pub fn from_value(value: &Value) -> Option<Self> {
        let row = value.as_object()?;
        let id = first_present(row, ID_KEYS).and_then(customer_id)?;

        Some(Self {
            id,
            customer_name: first_text(row, NAME_KEYS),
            address: first_text(row, ADDRESS_KEYS),
            latitude: first_number(row, LATITUDE_KEYS),
            longitude: first_number(row, LONGITUDE_KEYS),
            service_time: first_present(row, SERVICE_TIME_KEYS).cloned(),
            customer_time_window: first_present(row, TIME_WINDOW_KEYS).cloned(),
            arrival_time: first_number(row, &["arrival_time"]),
            start_service: first_number(row, &["start_service"]),
            finish_service: first_number(row, &["finish_service"]),
            ready_time: first_number(row, &["ready_time"]),
            due_time: first_number(row, &["due_time"]),
            cluster: first_present(row, &["cluster"]).cloned(),
        })
    }

    /// Coordenadas `[lat, lon]` cuando ambas son válidas
    pub fn position(&self) -> Option<[f64; 2]> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some([lat, lon]),
            _ => None,
        }
    }

    pub fn is_depot(&self) -> bool {
        self.id == DEPOT_ID
    }
}

/// Convertir un valor JSON a número finito (acepta strings numéricos)
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Identificador de cliente: número entero, o string con un entero
pub fn customer_id(value: &Value) -> Option<i64> {
    numeric(value)
        .filter(|v| v.fract() == 0.0)
        .map(|v| v as i64)
}

fn first_present<'a>(row: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .find(|value| !value.is_null())
}

fn first_number(row: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|key| row.get(*key)).find_map(numeric)
}

fn first_text(row: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Tabla de clientes indexada por id
#[derive(Debug, Clone, Default)]
pub struct CustomerTable {
    rows: Vec<CustomerRow>,
    index: HashMap<i64, usize>,
}

impl CustomerTable {
    pub fn from_values(values: &[Value]) -> Self {
        let mut table = Self::default();
        let mut skipped = 0usize;

        for value in values {
            match CustomerRow::from_value(value) {
                // La primera fila con un id gana, igual que una búsqueda lineal
                Some(row) if !table.index.contains_key(&row.id) => {
                    table.index.insert(row.id, table.rows.len());
                    table.rows.push(row);
                }
                Some(row) => {
                    tracing::debug!("🔁 Fila duplicada para cliente {}, se ignora", row.id);
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!("⚠️ {} filas sin id de cliente válido fueron ignoradas", skipped);
        }

        table
    }

    pub fn get(&self, id: i64) -> Option<&CustomerRow> {
        self.index.get(&id).map(|&i| &self.rows[i])
    }

    pub fn rows(&self) -> &[CustomerRow] {
        &self.rows
    }

    /// Fila del depósito (id 0), si existe
    pub fn depot(&self) -> Option<&CustomerRow> {
        self.get(DEPOT_ID)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalizes_field_name_variants() {
        let row = CustomerRow::from_value(&json!({
            "id": 101,
            "customer_name": "Pharmacy Azadi",
            "CustomerAddress": "Valiasr St. 12",
            "Lat": "35.70",
            "longitude": 51.41,
            "serviceTime": 10,
            "CustomerTimeWindow": "08:00-12:00",
            "arrival_time": 486
        }))
        .unwrap();

        assert_eq!(row.id, 101);
        assert_eq!(row.customer_name, "Pharmacy Azadi");
        assert_eq!(row.address, "Valiasr St. 12");
        assert_eq!(row.position(), Some([35.70, 51.41]));
        assert_eq!(row.service_time, Some(json!(10)));
        assert_eq!(row.customer_time_window, Some(json!("08:00-12:00")));
        assert_eq!(row.arrival_time, Some(486.0));
    }

    #[test]
    fn test_optimizer_xy_take_precedence() {
        let row = CustomerRow::from_value(&json!({
            "id": "7", "x": 51.2, "y": 35.1, "Latitude": 1.0, "Longitude": 2.0
        }))
        .unwrap();
        assert_eq!(row.id, 7);
        assert_eq!(row.latitude, Some(35.1));
        assert_eq!(row.longitude, Some(51.2));
    }

    #[test]
    fn test_missing_fields_fall_back_to_neutral_defaults() {
        let row = CustomerRow::from_value(&json!({
            "id": 5, "Latitude": "not a number", "Address": null
        }))
        .unwrap();
        assert_eq!(row.customer_name, "");
        assert_eq!(row.address, "");
        assert_eq!(row.latitude, None);
        assert_eq!(row.position(), None);
        assert_eq!(row.service_time, None);
    }

    #[test]
    fn test_rows_without_id_are_skipped() {
        assert!(CustomerRow::from_value(&json!({ "CustomerName": "ghost" })).is_none());
        assert!(CustomerRow::from_value(&json!({ "id": 1.5 })).is_none());
        assert!(CustomerRow::from_value(&json!("row")).is_none());
    }

    #[test]
    fn test_table_keeps_first_duplicate_and_finds_depot() {
        let table = CustomerTable::from_values(&[
            json!({ "id": 0, "x": 51.0, "y": 35.0 }),
            json!({ "id": 3, "CustomerName": "first" }),
            json!({ "id": 3, "CustomerName": "second" }),
            json!({ "name": "no id" }),
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(3).unwrap().customer_name, "first");
        assert!(table.depot().unwrap().is_depot());
        assert!(table.get(99).is_none());
    }
}
