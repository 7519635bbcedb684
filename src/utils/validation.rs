//! Utilidades de validación
//!
//! Funciones helper usadas por `validator` en los formularios de carga.

use chrono::NaiveTime;
use validator::ValidationError;

/// Validar y convertir un reloj `HH:MM` a `NaiveTime`
pub fn parse_clock(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        let mut error = ValidationError::new("clock");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"HH:MM".to_string());
        error
    })
}

/// Validador `custom` para campos `HH:MM`
pub fn validate_clock(value: &str) -> Result<(), ValidationError> {
    parse_clock(value).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_accepts_hh_mm() {
        assert!(validate_clock("08:00").is_ok());
        assert!(validate_clock(" 20:30 ").is_ok());
        assert_eq!(parse_clock("07:05").unwrap(), NaiveTime::from_hms_opt(7, 5, 0).unwrap());
    }

    #[test]
    fn test_clock_rejects_garbage() {
        assert!(validate_clock("8am").is_err());
        assert!(validate_clock("25:00").is_err());
        assert!(validate_clock("").is_err());
    }
}
