//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y formato de horas.

pub mod errors;
pub mod time;
pub mod validation;
