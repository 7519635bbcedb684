//! Formato de horas para las paradas y los popups del mapa.
//!
//! El optimizador entrega los tiempos como minutos desde medianoche.

/// Texto mostrado cuando no hay hora disponible
pub const EMPTY_CLOCK: &str = "--:--";

/// Convertir minutos a `HH:MM`; valores ausentes o no finitos dan `--:--`
pub fn minutes_to_clock(value: Option<f64>) -> String {
    match value {
        Some(minutes) if minutes.is_finite() => {
            let hours = (minutes / 60.0).floor() as i64;
            let rest = (minutes % 60.0).floor() as i64;
            format!("{:02}:{:02}", hours, rest)
        }
        _ => EMPTY_CLOCK.to_string(),
    }
}

/// Variante usada en las tarjetas de ruta: un cero cuenta como "sin hora"
pub fn stop_clock(value: Option<f64>) -> String {
    match value {
        Some(minutes) if minutes != 0.0 => minutes_to_clock(Some(minutes)),
        _ => EMPTY_CLOCK.to_string(),
    }
}
