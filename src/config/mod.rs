//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno y la configuración
//! del sondeo de tareas del backend.

pub mod environment;

pub use environment::*;
