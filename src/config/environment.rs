//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: servidor, backend del
//! optimizador, cache y sondeo de tareas asíncronas.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

/// Empresa usada al guardar asignaciones cuando no se configura otra
pub const DEFAULT_COMPANY: &str = "Milanpars Pharmed";

/// Parámetros del sondeo de tareas del backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
    pub deadline: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            max_attempts: 30,
            deadline: Duration::from_secs(60),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub backend_base_url: String,
    pub backend_timeout: Duration,
    pub company: String,
    pub redis_url: Option<String>,
    pub cache_ttl: u64,
    /// Tiempo sin cambios tras el cual una sesión del editor se descarta
    pub session_ttl: Duration,
    pub poll: PollSettings,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
            backend_base_url: "http://localhost:3000".to_string(),
            backend_timeout: Duration::from_secs(60),
            company: DEFAULT_COMPANY.to_string(),
            redis_url: None,
            cache_ttl: 0,
            session_ttl: Duration::from_secs(8 * 3600),
            poll: PollSettings::default(),
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración del entorno; las variables ausentes toman el valor por defecto
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let poll = PollSettings {
            interval: Duration::from_millis(parse_var(
                "TASK_POLL_INTERVAL_MS",
                defaults.poll.interval.as_millis() as u64,
            )?),
            max_attempts: parse_var("TASK_POLL_MAX_ATTEMPTS", defaults.poll.max_attempts)?,
            deadline: Duration::from_secs(parse_var(
                "TASK_POLL_DEADLINE_SECS",
                defaults.poll.deadline.as_secs(),
            )?),
        };

        let config = Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            cors_origins,
            backend_base_url: env::var("BACKEND_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend_base_url),
            backend_timeout: Duration::from_secs(parse_var(
                "BACKEND_TIMEOUT_SECS",
                defaults.backend_timeout.as_secs(),
            )?),
            company: env::var("COMPANY_NAME").unwrap_or(defaults.company),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            cache_ttl: parse_var("CACHE_TTL_SECS", defaults.cache_ttl)?,
            session_ttl: Duration::from_secs(parse_var(
                "EDITOR_SESSION_TTL_SECS",
                defaults.session_ttl.as_secs(),
            )?),
            poll,
        };

        if config.poll.max_attempts == 0 {
            return Err(AppError::Config(
                "TASK_POLL_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} must be a valid number, got '{}'", name, raw))),
        Err(_) => Ok(default),
    }
}
