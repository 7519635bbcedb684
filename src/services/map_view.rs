//! Vista de mapa
//!
//! Proyección de sólo lectura del conjunto de asignaciones: una capa por
//! conductor con su color, polilínea y marcadores numerados, más la capa de
//! clientes sin asignar.

use crate::dto::map_dto::{MapView, RouteLayer, StopMarker, StopPopup, UnassignedMarker};
use crate::dto::seed_dto::RouteGeometry;
use crate::models::{AssignmentSet, CustomerRow, CustomerTable};
use crate::utils::time::minutes_to_clock;

/// Paleta categórica de 20 colores
pub const TAB20: [&str; 20] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf", "#aec7e8", "#ffbb78", "#98df8a", "#ff9896", "#c5b0d5", "#c49c94",
    "#f7b6d2", "#c7c7c7", "#dbdb8d", "#9edae5",
];

/// Centro usado cuando no hay filas con coordenadas
pub const FALLBACK_CENTER: [f64; 2] = [12.70322432699803, 51.21798869467282];

pub fn route_color(driver_index: usize) -> &'static str {
    TAB20[driver_index % TAB20.len()]
}

/// Centro del mapa: el depósito, si no la primera fila, si no el centro fijo
pub fn map_center(customers: &CustomerTable) -> [f64; 2] {
    customers
        .depot()
        .or_else(|| customers.rows().first())
        .and_then(CustomerRow::position)
        .unwrap_or(FALLBACK_CENTER)
}

/// Armar la vista. `geometries[i]` corresponde a la ruta `i`; si falta, sin polilínea.
pub fn build_map_view(
    assignments: &AssignmentSet,
    customers: &CustomerTable,
    geometries: &[RouteGeometry],
) -> MapView {
    let mut layers = Vec::with_capacity(assignments.len());
    let mut distance_log = Vec::with_capacity(assignments.len());

    for (index, route) in assignments.routes().iter().enumerate() {
        let geometry = geometries.get(index).cloned().unwrap_or_default();
        let km = geometry.distance_m / 1000.0;

        let markers = route
            .stops()
            .iter()
            .filter_map(|stop| {
                let row = customers.get(stop.customer_id)?;
                let position = row.position()?;
                Some(StopMarker {
                    customer_id: stop.customer_id,
                    label: stop.order.to_string(),
                    position,
                    popup: popup_for(row),
                })
            })
            .collect();

        layers.push(RouteLayer {
            driver_index: index,
            driver_name: route.driver_name().to_string(),
            name: format!("Vehicle {} — {:.2} km", index + 1, km),
            color: route_color(index),
            polyline: if geometry.points.len() > 1 {
                geometry.points
            } else {
                Vec::new()
            },
            distance_m: geometry.distance_m,
            markers,
        });
        distance_log.push(format!("Vehicle {}: {:.2} km", index + 1, km));
    }

    let assigned = assignments.assigned_customer_ids();
    let unassigned = customers
        .rows()
        .iter()
        .filter(|row| !row.is_depot() && !assigned.contains(&row.id))
        .filter_map(|row| {
            Some(UnassignedMarker {
                customer_id: row.id,
                position: row.position()?,
            })
        })
        .collect();

    MapView {
        center: map_center(customers),
        layers,
        unassigned,
        distance_log,
    }
}

fn popup_for(row: &CustomerRow) -> StopPopup {
    StopPopup {
        arrival: minutes_to_clock(row.arrival_time),
        service_start: minutes_to_clock(row.start_service),
        finish: minutes_to_clock(row.finish_service),
        time_window: format!(
            "{} - {}",
            minutes_to_clock(row.ready_time),
            minutes_to_clock(row.due_time)
        ),
        cluster: row
            .cluster
            .clone()
            .filter(|value| !value.is_null())
            .unwrap_or_else(|| "N/A".into()),
    }
}
