//! Modelos del sistema
//!
//! Clientes, paradas, rutas, el conjunto de asignaciones que edita el
//! operador y la vista del conductor.

pub mod assignment;
pub mod customer;
pub mod driver;
pub mod route;
pub mod seed;

pub use assignment::{AssignmentSet, DragOutcome, DragPosition};
pub use customer::{CustomerRow, CustomerTable};
pub use route::{Route, RouteStatus, Stop, DEPOT_ID};
pub use seed::SeedData;
