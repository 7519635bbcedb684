//! Conjunto de asignaciones
//!
//! Todas las rutas del tablero, indexadas por posición de conductor. Aquí
//! vive la lógica del arrastre de paradas: siempre es un *movimiento*
//! (quitar y luego insertar), nunca un intercambio.
//!
//! Al reconstruir desde una semilla nueva, el nombre y el estado de cada
//! conductor se conservan **por posición**, no por identidad: la ruta del
//! vehículo `i` hereda lo editado en la ruta `i` anterior.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::customer::CustomerTable;
use super::route::{Route, RouteStatus, Stop, DEPOT_ID};
use crate::dto::assignment_dto::{
    CustomerDetailRecord, CustomerDetailsPayload, DriverAssignmentPayload, SavePlan,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Posición de una parada en el tablero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPosition {
    pub driver_index: usize,
    pub stop_index: usize,
}

impl DragPosition {
    pub fn new(driver_index: usize, stop_index: usize) -> Self {
        Self {
            driver_index,
            stop_index,
        }
    }
}

/// Qué hizo un arrastre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DragOutcome {
    Unchanged,
    #[serde(rename_all = "camelCase")]
    Reordered { driver_index: usize },
    #[serde(rename_all = "camelCase")]
    Moved { from_driver: usize, to_driver: usize },
}

pub fn default_driver_name(index: usize) -> String {
    format!("Driver {}", index + 1)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssignmentSet {
    routes: Vec<Route>,
}

impl AssignmentSet {
    /// Construir desde cero a partir de la semilla
    pub fn build(customers: &CustomerTable, vehicles: &[Vec<i64>]) -> Self {
        Self::default().rebuild(customers, vehicles)
    }

    /// Reconstruir desde una semilla nueva conservando nombre y estado por posición.
    ///
    /// El depósito y los ids sin fila de cliente se descartan, los vehículos
    /// que quedan vacíos no generan ruta, y un cliente repetido sólo se
    /// queda en el primer vehículo.
    pub fn rebuild(&self, customers: &CustomerTable, vehicles: &[Vec<i64>]) -> Self {
        let mut seen = HashSet::new();
        let mut routes = Vec::with_capacity(vehicles.len());

        for (vehicle_index, vehicle) in vehicles.iter().enumerate() {
            let stops: Vec<Stop> = vehicle
                .iter()
                .copied()
                .filter(|id| *id != DEPOT_ID)
                .filter(|id| {
                    let first = seen.insert(*id);
                    if !first {
                        tracing::warn!(
                            "⚠️ Cliente {} repetido en el vehículo {}, se ignora",
                            id,
                            vehicle_index + 1
                        );
                    }
                    first
                })
                .filter_map(|id| match customers.get(id) {
                    Some(row) => Some(Stop::for_customer(row)),
                    None => {
                        tracing::warn!(
                            "⚠️ Cliente {} del vehículo {} no está en la tabla de clientes, se descarta",
                            id,
                            vehicle_index + 1
                        );
                        None
                    }
                })
                .collect();

            if stops.is_empty() {
                continue;
            }

            let previous = self.routes.get(vehicle_index);
            let driver_name = previous
                .map(|route| route.driver_name().to_string())
                .unwrap_or_else(|| default_driver_name(vehicle_index));
            let status = previous.map(Route::status).unwrap_or_default();

            routes.push(Route::new(driver_name, status, stops));
        }

        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, driver_index: usize) -> Option<&Route> {
        self.routes.get(driver_index)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn total_stops(&self) -> usize {
        self.routes.iter().map(Route::len).sum()
    }

    pub fn stop(&self, position: DragPosition) -> Option<&Stop> {
        self.routes
            .get(position.driver_index)?
            .stops()
            .get(position.stop_index)
    }

    pub fn assigned_customer_ids(&self) -> HashSet<i64> {
        self.routes
            .iter()
            .flat_map(|route| route.stops().iter().map(|stop| stop.customer_id))
            .collect()
    }

    /// Soltar la parada de `source` en `destination`.
    ///
    /// Sin destino, soltando sobre sí misma o con índices fuera de rango no
    /// se toca nada. Soltar sobre la parada B deja la arrastrada en la
    /// posición de B y desplaza B y las siguientes una posición.
    pub fn move_stop(
        &mut self,
        source: DragPosition,
        destination: Option<DragPosition>,
    ) -> DragOutcome {
        let Some(destination) = destination else {
            return DragOutcome::Unchanged;
        };
        if source == destination
            || destination.driver_index >= self.routes.len()
            || self.stop(source).is_none()
        {
            return DragOutcome::Unchanged;
        }

        let Some(stop) = self.routes[source.driver_index].remove_stop(source.stop_index) else {
            return DragOutcome::Unchanged;
        };
        self.routes[destination.driver_index].insert_stop(destination.stop_index, stop);

        if source.driver_index == destination.driver_index {
            DragOutcome::Reordered {
                driver_index: source.driver_index,
            }
        } else {
            DragOutcome::Moved {
                from_driver: source.driver_index,
                to_driver: destination.driver_index,
            }
        }
    }

    pub fn rename_driver(&mut self, driver_index: usize, name: impl Into<String>) -> AppResult<()> {
        let route = self
            .routes
            .get_mut(driver_index)
            .ok_or_else(|| not_found_error("Driver route", &driver_index.to_string()))?;
        route.rename(name.into());
        Ok(())
    }

    pub fn set_status(&mut self, driver_index: usize, status: RouteStatus) -> AppResult<()> {
        let route = self
            .routes
            .get_mut(driver_index)
            .ok_or_else(|| not_found_error("Driver route", &driver_index.to_string()))?;
        route.set_status(status);
        Ok(())
    }

    /// Armar lo que se envía al backend. Las rutas vacías se omiten; si no
    /// queda ninguna es un aviso, no un envío vacío.
    pub fn save_plan(&self, company: &str) -> AppResult<SavePlan> {
        let mut assignments = Vec::new();
        let mut customers = Vec::new();

        for (index, route) in self.routes.iter().enumerate() {
            let records: Vec<CustomerDetailRecord> = route
                .stops()
                .iter()
                .filter(|stop| stop.customer_id != DEPOT_ID)
                .map(CustomerDetailRecord::from)
                .collect();

            if records.is_empty() {
                continue;
            }

            let driver_name = if route.driver_name().is_empty() {
                default_driver_name(index)
            } else {
                route.driver_name().to_string()
            };

            assignments.push(DriverAssignmentPayload {
                driver_name,
                route: records.iter().map(|record| record.customer_id).collect(),
                company: company.to_string(),
            });
            customers.extend(records);
        }

        if assignments.is_empty() {
            return Err(AppError::EmptyAssignment(
                "no driver route with stops to send to the server".to_string(),
            ));
        }

        Ok(SavePlan {
            assignments,
            customers: CustomerDetailsPayload {
                company: company.to_string(),
                customers,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn customers() -> CustomerTable {
        CustomerTable::from_values(&[
            json!({ "id": 0, "CustomerName": "Depot", "x": 51.38, "y": 35.68 }),
            json!({ "id": 101, "CustomerName": "A", "Latitude": 35.70, "Longitude": 51.40 }),
            json!({ "id": 102, "CustomerName": "B", "Address": "Enghelab Sq." }),
            json!({ "id": 103, "CustomerName": "C" }),
            json!({ "id": 201, "CustomerName": "D", "ServiceTime": 15 }),
            json!({ "id": 202, "CustomerName": "E" }),
        ])
    }

    fn ids(set: &AssignmentSet, driver: usize) -> Vec<i64> {
        set.route(driver).unwrap().customer_ids()
    }

    fn assert_contiguous(set: &AssignmentSet) {
        for route in set.routes() {
            let orders: Vec<usize> = route.stops().iter().map(|s| s.order).collect();
            let expected: Vec<usize> = (1..=route.len()).collect();
            assert_eq!(orders, expected, "route {} is not numbered 1..N", route.driver_name());
        }
    }

    fn board() -> AssignmentSet {
        AssignmentSet::build(&customers(), &[vec![0, 101, 102, 103, 0], vec![0, 201, 202, 0]])
    }

    #[test]
    fn test_build_strips_depot_and_numbers_stops() {
        let set = AssignmentSet::build(&customers(), &[vec![0, 101, 102, 0], vec![0, 201, 0]]);

        assert_eq!(set.len(), 2);
        assert_eq!(ids(&set, 0), vec![101, 102]);
        assert_eq!(ids(&set, 1), vec![201]);
        assert!(!set.assigned_customer_ids().contains(&DEPOT_ID));
        assert_contiguous(&set);
        assert_eq!(set.route(0).unwrap().driver_name(), "Driver 1");
        assert_eq!(set.route(1).unwrap().status(), RouteStatus::Pending);
        assert_eq!(set.stop(DragPosition::new(0, 1)).unwrap().address, "Enghelab Sq.");
    }

    #[test]
    fn test_build_skips_empty_vehicles_and_duplicates() {
        let set = AssignmentSet::build(&customers(), &[vec![0, 0], vec![0, 101, 0], vec![0, 101, 102, 0]]);

        assert_eq!(set.len(), 2);
        assert_eq!(ids(&set, 0), vec![101]);
        assert_eq!(ids(&set, 1), vec![102]);
        assert_eq!(set.route(0).unwrap().driver_name(), "Driver 2");
    }

    #[test]
    fn test_unknown_customer_is_dropped_from_board_and_save() {
        let set = AssignmentSet::build(&customers(), &[vec![0, 101, 999, 0], vec![0, 998, 0]]);

        assert_eq!(set.len(), 1);
        assert_eq!(ids(&set, 0), vec![101]);
        assert_contiguous(&set);

        let plan = set.save_plan("Acme").unwrap();
        assert_eq!(plan.assignments[0].route, vec![101]);
        assert_eq!(plan.customers.customers.len(), 1);
    }

    #[test]
    fn test_rebuild_merges_name_and_status_by_position() {
        let mut set = board();
        set.rename_driver(1, "reza@example.com").unwrap();
        set.set_status(1, RouteStatus::InTransit).unwrap();

        let rebuilt = set.rebuild(&customers(), &[vec![0, 103, 0], vec![0, 101, 0], vec![0, 202, 0]]);

        assert_eq!(rebuilt.route(0).unwrap().driver_name(), "Driver 1");
        assert_eq!(rebuilt.route(1).unwrap().driver_name(), "reza@example.com");
        assert_eq!(rebuilt.route(1).unwrap().status(), RouteStatus::InTransit);
        assert_eq!(ids(&rebuilt, 1), vec![101]);
        assert_eq!(rebuilt.route(2).unwrap().driver_name(), "Driver 3");
    }

    #[test]
    fn test_reorder_within_route_is_a_move_not_a_swap() {
        let mut set = board();
        let outcome = set.move_stop(DragPosition::new(0, 0), Some(DragPosition::new(0, 2)));

        assert_eq!(outcome, DragOutcome::Reordered { driver_index: 0 });
        assert_eq!(ids(&set, 0), vec![102, 103, 101]);
        assert_contiguous(&set);

        set.move_stop(DragPosition::new(0, 2), Some(DragPosition::new(0, 0)));
        assert_eq!(ids(&set, 0), vec![101, 102, 103]);
    }

    #[test]
    fn test_move_between_routes_shifts_destination_down() {
        let mut set = board();
        let outcome = set.move_stop(DragPosition::new(0, 0), Some(DragPosition::new(1, 1)));

        assert_eq!(outcome, DragOutcome::Moved { from_driver: 0, to_driver: 1 });
        assert_eq!(ids(&set, 0), vec![102, 103]);
        // 202 estaba en la posición 1: baja una posición, no se intercambia
        assert_eq!(ids(&set, 1), vec![201, 101, 202]);
        assert_contiguous(&set);
        assert_eq!(set.total_stops(), 5);
    }

    #[test]
    fn test_move_past_end_appends() {
        let mut set = board();
        set.move_stop(DragPosition::new(1, 0), Some(DragPosition::new(0, 10)));
        assert_eq!(ids(&set, 0), vec![101, 102, 103, 201]);
        assert_eq!(ids(&set, 1), vec![202]);
        assert_contiguous(&set);
    }

    #[test]
    fn test_drop_on_itself_or_nowhere_is_noop() {
        let mut set = board();
        let before = set.clone();

        assert_eq!(set.move_stop(DragPosition::new(0, 1), Some(DragPosition::new(0, 1))), DragOutcome::Unchanged);
        assert_eq!(set.move_stop(DragPosition::new(0, 1), None), DragOutcome::Unchanged);
        assert_eq!(set, before);
    }

    #[test]
    fn test_out_of_range_positions_are_noops() {
        let mut set = board();
        let before = set.clone();

        assert_eq!(set.move_stop(DragPosition::new(5, 0), Some(DragPosition::new(0, 0))), DragOutcome::Unchanged);
        assert_eq!(set.move_stop(DragPosition::new(0, 9), Some(DragPosition::new(1, 0))), DragOutcome::Unchanged);
        assert_eq!(set.move_stop(DragPosition::new(0, 0), Some(DragPosition::new(7, 0))), DragOutcome::Unchanged);
        assert_eq!(set, before);
    }

    #[test]
    fn test_orders_stay_contiguous_after_many_drags() {
        let mut set = board();
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = |bound: usize| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % bound as u64) as usize
        };

        for _ in 0..500 {
            let from = next(set.len());
            let len = set.route(from).unwrap().len().max(1);
            let source = DragPosition::new(from, next(len));
            let to = next(set.len());
            let destination = DragPosition::new(to, next(set.route(to).unwrap().len() + 1));
            set.move_stop(source, Some(destination));

            assert_contiguous(&set);
            assert_eq!(set.total_stops(), 5);
            assert_eq!(set.assigned_customer_ids().len(), 5);
        }
    }

    #[test]
    fn test_rename_only_touches_one_route() {
        let mut set = board();
        let before = set.clone();

        set.rename_driver(0, "sara").unwrap();

        assert_eq!(set.route(0).unwrap().driver_name(), "sara");
        assert_eq!(set.route(0).unwrap().stops(), before.route(0).unwrap().stops());
        assert_eq!(set.route(1), before.route(1));
        assert!(matches!(set.rename_driver(9, "x"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_save_plan_skips_empty_routes_and_flattens_customers() {
        let mut set = board();
        set.move_stop(DragPosition::new(1, 0), Some(DragPosition::new(0, 0)));
        set.move_stop(DragPosition::new(1, 0), Some(DragPosition::new(0, 0)));
        set.rename_driver(0, "").unwrap();

        let plan = set.save_plan("Acme").unwrap();

        assert_eq!(plan.assignments.len(), 1);
        assert_eq!(plan.assignments[0].driver_name, "Driver 1");
        assert_eq!(plan.assignments[0].route, vec![202, 201, 101, 102, 103]);
        assert_eq!(plan.assignments[0].company, "Acme");
        assert_eq!(plan.customers.company, "Acme");
        assert_eq!(plan.customers.customers.len(), 5);
        assert_eq!(plan.customers.customers[1].service_time, Some(json!(15)));
    }

    #[test]
    fn test_only_an_empty_driver_name_falls_back() {
        let mut set = board();
        set.rename_driver(1, "  ").unwrap();

        let plan = set.save_plan("Acme").unwrap();

        assert_eq!(plan.assignments[0].driver_name, "Driver 1");
        assert_eq!(plan.assignments[1].driver_name, "  ");
    }

    #[test]
    fn test_save_plan_with_no_stops_is_a_no_route_warning() {
        let empty = AssignmentSet::default();
        let err = empty.save_plan("Acme").unwrap_err();
        assert!(matches!(err, AppError::EmptyAssignment(_)));
        assert!(err.to_string().to_lowercase().contains("no route"));
    }

    #[test]
    fn test_save_payload_uses_backend_field_names() {
        let set = AssignmentSet::build(&customers(), &[vec![0, 101, 0]]);
        let plan = set.save_plan("Acme").unwrap();

        let assignment = serde_json::to_value(&plan.assignments).unwrap();
        assert_eq!(assignment, json!([{ "driverName": "Driver 1", "route": [101], "company": "Acme" }]));

        let details = serde_json::to_value(&plan.customers).unwrap();
        assert_eq!(details["customers"][0]["customerId"], json!(101));
        assert_eq!(details["customers"][0]["CustomerName"], json!("A"));
        assert_eq!(details["customers"][0]["Latitude"], json!(35.70));
        assert_eq!(details["customers"][0]["CustomerTimeWindow"], json!(null));
    }
}
