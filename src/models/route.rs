//! Modelo de Route
//!
//! Una ruta es la lista ordenada de paradas de un conductor. El orden de
//! las paradas siempre es 1..N sin huecos: toda mutación pasa por
//! `renumber`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::customer::CustomerRow;
use crate::utils::errors::AppError;
use crate::utils::time::{stop_clock, EMPTY_CLOCK};

/// Identificador reservado del depósito (inicio y fin de cada vehículo)
pub const DEPOT_ID: i64 = 0;

/// Hora de salida mostrada en todas las tarjetas
pub const DEFAULT_DEPARTURE: &str = "08:00";

/// Estado de la ruta
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteStatus {
    #[default]
    Pending,
    InTransit,
    Delivered,
}

impl RouteStatus {
    /// Etiqueta localizada para la tarjeta del conductor
    pub fn label(&self) -> &'static str {
        match self {
            RouteStatus::Pending => "منتظر",
            RouteStatus::InTransit => "در مسیر",
            RouteStatus::Delivered => "تحویل شده",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Pending => "pending",
            RouteStatus::InTransit => "in-transit",
            RouteStatus::Delivered => "delivered",
        }
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RouteStatus::Pending),
            "in-transit" | "in_transit" => Ok(RouteStatus::InTransit),
            "delivered" => Ok(RouteStatus::Delivered),
            other => Err(AppError::BadRequest(format!("Unknown route status '{}'", other))),
        }
    }
}

/// Una visita a un cliente dentro de una ruta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub order: usize,
    pub customer_id: i64,
    pub customer_name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub departure_time: String,
    pub arrival_time: String,
    pub service_time: Option<Value>,
    pub customer_time_window: Option<Value>,
}

impl Stop {
    /// Construir la parada de un cliente a partir de su fila
    pub fn for_customer(row: &CustomerRow) -> Self {
        Self {
            order: 0,
            customer_id: row.id,
            customer_name: row.customer_name.clone(),
            address: row.address.clone(),
            latitude: row.latitude,
            longitude: row.longitude,
            departure_time: stop_clock(row.start_service),
            arrival_time: stop_clock(row.finish_service),
            service_time: row.service_time.clone(),
            customer_time_window: row.customer_time_window.clone(),
        }
    }

    pub fn position(&self) -> Option<[f64; 2]> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some([lat, lon]),
            _ => None,
        }
    }
}

/// Ruta de un conductor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    driver_name: String,
    status: RouteStatus,
    status_text: String,
    departure_time: String,
    last_delivery_time: String,
    stops: Vec<Stop>,
}

impl Route {
    pub fn new(driver_name: String, status: RouteStatus, stops: Vec<Stop>) -> Self {
        let mut route = Self {
            driver_name,
            status,
            status_text: status.label().to_string(),
            departure_time: DEFAULT_DEPARTURE.to_string(),
            last_delivery_time: EMPTY_CLOCK.to_string(),
            stops,
        };
        route.renumber();
        route
    }

    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    pub fn status(&self) -> RouteStatus {
        self.status
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn last_delivery_time(&self) -> &str {
        &self.last_delivery_time
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn customer_ids(&self) -> Vec<i64> {
        self.stops.iter().map(|stop| stop.customer_id).collect()
    }

    pub fn rename(&mut self, driver_name: String) {
        self.driver_name = driver_name;
    }

    pub fn set_status(&mut self, status: RouteStatus) {
        self.status = status;
        self.status_text = status.label().to_string();
    }

    /// Quitar la parada en `index`; `None` si no existe
    pub fn remove_stop(&mut self, index: usize) -> Option<Stop> {
        if index >= self.stops.len() {
            return None;
        }
        let stop = self.stops.remove(index);
        self.renumber();
        Some(stop)
    }

    /// Insertar en `index`; más allá del final se agrega al final
    pub fn insert_stop(&mut self, index: usize, stop: Stop) {
        let at = index.min(self.stops.len());
        self.stops.insert(at, stop);
        self.renumber();
    }

    fn renumber(&mut self) {
        for (i, stop) in self.stops.iter_mut().enumerate() {
            stop.order = i + 1;
        }
        self.last_delivery_time = self
            .stops
            .last()
            .map(|stop| stop.arrival_time.clone())
            .unwrap_or_else(|| EMPTY_CLOCK.to_string());
    }
}
