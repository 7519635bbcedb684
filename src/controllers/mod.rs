//! Controllers
//!
//! Cada controlador agrupa los servicios de un área del panel y arma la
//! respuesta `ApiResponse` de sus endpoints.

pub mod driver_controller;
pub mod editor_controller;
pub mod map_controller;
pub mod seed_controller;
