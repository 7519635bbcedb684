//! Vista del conductor
//!
//! Convierte filas de vehículo (`route` como arreglo o string JSON) y las
//! rutas guardadas del tablero en las tarjetas que ve cada conductor.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::customer::customer_id;
use crate::models::driver::{DriverRoute, DriverRouteRecord, DriverRouteStop};
use crate::models::{CustomerTable, Route, RouteStatus, DEPOT_ID};
use crate::utils::time::EMPTY_CLOCK;

/// Ids de una ruta guardada: arreglos tal cual, strings como JSON, lo demás vacío.
/// Se descartan ids no numéricos y el depósito.
pub fn normalize_route(value: &Value) -> Vec<i64> {
    let items = match value {
        Value::Array(items) => items.clone(),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => Vec::new(),
            Err(e) => {
                log::warn!("⚠️ Ruta de conductor ilegible: {}", e);
                Vec::new()
            }
        },
        _ => Vec::new(),
    };

    items
        .iter()
        .filter_map(customer_id)
        .filter(|id| *id != DEPOT_ID)
        .collect()
}

pub fn build_stops_from_ids(ids: &[i64], customers: &CustomerTable) -> Vec<DriverRouteStop> {
    ids.iter()
        .enumerate()
        .map(|(index, &id)| match customers.get(id) {
            Some(row) => DriverRouteStop {
                id,
                order: index + 1,
                customer_name: if row.customer_name.is_empty() {
                    format!("Customer {}", id)
                } else {
                    row.customer_name.clone()
                },
                address: row.address.clone(),
                latitude: row.latitude,
                longitude: row.longitude,
                service_time: row.service_time.clone(),
                customer_time_window: row.customer_time_window.clone(),
            },
            None => DriverRouteStop {
                id,
                order: index + 1,
                customer_name: format!("Customer {}", id),
                address: String::new(),
                latitude: None,
                longitude: None,
                service_time: None,
                customer_time_window: None,
            },
        })
        .collect()
}

/// Tarjetas a partir de filas de vehículo de la base externa
pub fn format_driver_routes(records: &[DriverRouteRecord], customers: &CustomerTable) -> Vec<DriverRoute> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let ids = normalize_route(&record.route);
            DriverRoute {
                id: if record.id.is_null() {
                    Value::from(index)
                } else {
                    record.id.clone()
                },
                name: record
                    .driver_email
                    .clone()
                    .unwrap_or_else(|| format!("Route {}", index + 1)),
                departure: EMPTY_CLOCK.to_string(),
                arrival: EMPTY_CLOCK.to_string(),
                status: RouteStatus::Pending.label().to_string(),
                stops: build_stops_from_ids(&ids, customers),
            }
        })
        .collect()
}

/// Tarjeta de una ruta del tablero, con los datos ya cargados en sus paradas
pub fn driver_route_from(index: usize, driver_name: &str, route: &Route) -> DriverRoute {
    DriverRoute {
        id: Value::from(index),
        name: driver_name.to_string(),
        departure: EMPTY_CLOCK.to_string(),
        arrival: EMPTY_CLOCK.to_string(),
        status: route.status_text().to_string(),
        stops: route
            .stops()
            .iter()
            .map(|stop| DriverRouteStop {
                id: stop.customer_id,
                order: stop.order,
                customer_name: if stop.customer_name.is_empty() {
                    format!("Customer {}", stop.customer_id)
                } else {
                    stop.customer_name.clone()
                },
                address: stop.address.clone(),
                latitude: stop.latitude,
                longitude: stop.longitude,
                service_time: stop.service_time.clone(),
                customer_time_window: stop.customer_time_window.clone(),
            })
            .collect(),
    }
}

/// Agrupar tarjetas por conductor (nombre en minúsculas)
pub fn group_by_driver(routes: Vec<DriverRoute>) -> BTreeMap<String, Vec<DriverRoute>> {
    let mut grouped: BTreeMap<String, Vec<DriverRoute>> = BTreeMap::new();
    for route in routes {
        grouped
            .entry(route.name.trim().to_lowercase())
            .or_default()
            .push(route);
    }
    grouped
}
