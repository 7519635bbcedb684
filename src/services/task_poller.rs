//! Sondeo de tareas asíncronas del backend
//!
//! Cuando `POST /api/route-geometry` responde `{ task_id }`, la geometría se
//! obtiene consultando `GET /api/task-status/:taskId` hasta que la tarea
//! termina. El sondeo es una máquina de estados acotada por intervalo,
//! número de intentos y plazo total: nunca espera para siempre.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::client::TaskStatusSource;
use crate::config::PollSettings;
use crate::dto::seed_dto::{RouteGeometry, TaskStatus};
use crate::utils::errors::{AppError, AppResult};

/// Bandera de cancelación compartida entre quien pide y quien sondea
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Estados del sondeo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Enqueued,
    Polling { attempt: u32 },
    Succeeded,
    Failed,
    TimedOut,
    Cancelled,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Enqueued | PollState::Polling { .. })
    }
}

pub struct TaskPoller {
    source: Arc<dyn TaskStatusSource>,
    settings: PollSettings,
}

impl TaskPoller {
    pub fn new(source: Arc<dyn TaskStatusSource>, settings: PollSettings) -> Self {
        Self { source, settings }
    }

    /// Sondear `task_id` hasta obtener la geometría.
    ///
    /// Errores de transporte o respuestas ilegibles cuentan como un intento
    /// más. Agotar intentos o plazo da `TaskTimeout`; la cancelación se
    /// revisa entre intentos y antes de entregar el resultado.
    pub async fn poll(&self, task_id: &str, cancel: &CancellationFlag) -> AppResult<RouteGeometry> {
        let started = Instant::now();
        let mut state = PollState::Enqueued;
        let mut attempts = 0u32;

        log::debug!("⏳ Tarea {} en estado {:?}", task_id, state);

        loop {
            if cancel.is_cancelled() {
                state = PollState::Cancelled;
                log::info!("🛑 Sondeo de la tarea {} cancelado ({:?})", task_id, state);
                return Err(AppError::TaskCancelled);
            }

            let elapsed = started.elapsed();
            if attempts >= self.settings.max_attempts || elapsed >= self.settings.deadline {
                state = PollState::TimedOut;
                log::warn!(
                    "⌛ Tarea {} sin terminar tras {} intentos ({:?})",
                    task_id,
                    attempts,
                    state
                );
                return Err(AppError::TaskTimeout {
                    attempts,
                    elapsed_ms: elapsed.as_millis(),
                });
            }

            attempts += 1;
            state = PollState::Polling { attempt: attempts };
            log::debug!(
                "⏳ Consultando tarea {} ({:?} de {})",
                task_id,
                state,
                self.settings.max_attempts
            );

            let remaining = self.settings.deadline.saturating_sub(elapsed);
            match tokio::time::timeout(remaining, self.source.task_status(task_id)).await {
                Err(_) => {
                    log::warn!("⌛ La consulta de la tarea {} no respondió a tiempo", task_id);
                }
                Ok(Err(e)) => {
                    log::warn!("⚠️ Error consultando la tarea {}: {}", task_id, e);
                }
                Ok(Ok(response)) => match response.status {
                    TaskStatus::Success => {
                        if cancel.is_cancelled() {
                            state = PollState::Cancelled;
                            log::info!("🛑 Resultado de la tarea {} descartado ({:?})", task_id, state);
                            return Err(AppError::TaskCancelled);
                        }
                        state = PollState::Succeeded;
                        log::info!("✅ Tarea {} terminada en {} intentos ({:?})", task_id, attempts, state);
                        return Ok(response.result.unwrap_or_default());
                    }
                    TaskStatus::Failure => {
                        state = PollState::Failed;
                        let reason = response
                            .error
                            .unwrap_or_else(|| "task reported failure".to_string());
                        log::error!("❌ Tarea {} falló: {} ({:?})", task_id, reason, state);
                        return Err(AppError::TaskFailed(reason));
                    }
                    TaskStatus::Pending | TaskStatus::Started | TaskStatus::Unknown => {}
                },
            }

            let remaining = self.settings.deadline.saturating_sub(started.elapsed());
            if !remaining.is_zero() && attempts < self.settings.max_attempts {
                tokio::time::sleep(self.settings.interval.min(remaining)).await;
            }
        }
    }
}
