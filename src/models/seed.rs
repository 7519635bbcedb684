//! Datos semilla del optimizador
//!
//! Filas de clientes crudas más un arreglo de ids por vehículo. Las filas se
//! guardan tal cual para la cache y normalizadas en `CustomerTable`.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

use super::customer::{customer_id, CustomerTable};
use super::route::DEPOT_ID;
use crate::dto::seed_dto::SeedResponse;
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct SeedData {
    rows: Vec<Value>,
    customers: CustomerTable,
    vehicles: Vec<Vec<i64>>,
}

impl SeedData {
    pub fn new(rows: Vec<Value>, vehicles: Vec<Vec<i64>>) -> Self {
        let customers = CustomerTable::from_values(&rows);
        Self {
            rows,
            customers,
            vehicles,
        }
    }

    /// Validar la respuesta de `GET /api/map/seed`; `null` cuenta como vacío
    pub fn from_response(response: SeedResponse) -> AppResult<Self> {
        let rows = match response.df {
            Value::Null => Vec::new(),
            Value::Array(rows) => rows,
            other => {
                return Err(AppError::MalformedSeed(format!(
                    "df must be an array of rows, got {}",
                    json_kind(&other)
                )))
            }
        };
        let vehicles = parse_vehicles(&response.vehicles)?;
        Ok(Self::new(rows, vehicles))
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn customers(&self) -> &CustomerTable {
        &self.customers
    }

    pub fn vehicles(&self) -> &[Vec<i64>] {
        &self.vehicles
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.vehicles.is_empty()
    }

    pub fn summary(&self) -> SeedSummary {
        let assigned: HashSet<i64> = self
            .vehicles
            .iter()
            .flatten()
            .copied()
            .filter(|id| *id != DEPOT_ID)
            .collect();
        let unassigned = self
            .customers
            .rows()
            .iter()
            .filter(|row| !row.is_depot() && !assigned.contains(&row.id))
            .count();

        SeedSummary {
            customers: self.customers.len(),
            vehicles: self.vehicles.len(),
            assigned: assigned.len(),
            unassigned,
        }
    }
}

/// Resumen mostrado junto al estado de la semilla
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub customers: usize,
    pub vehicles: usize,
    pub assigned: usize,
    pub unassigned: usize,
}

/// Convertir `vehicles` a listas de ids; cualquier entrada no entera es un error
pub fn parse_vehicles(value: &Value) -> AppResult<Vec<Vec<i64>>> {
    let vehicles = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(vehicles) => vehicles,
        other => {
            return Err(AppError::MalformedSeed(format!(
                "vehicles must be an array of id arrays, got {}",
                json_kind(other)
            )))
        }
    };

    vehicles
        .iter()
        .enumerate()
        .map(|(index, vehicle)| {
            let ids = vehicle.as_array().ok_or_else(|| {
                AppError::MalformedSeed(format!("vehicle {} is not an array", index + 1))
            })?;
            ids.iter()
                .map(|id| {
                    customer_id(id).ok_or_else(|| {
                        AppError::MalformedSeed(format!(
                            "vehicle {} contains a non-integer id: {}",
                            index + 1,
                            id
                        ))
                    })
                })
                .collect()
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
