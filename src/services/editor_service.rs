//! Sesiones del editor de asignaciones
//!
//! Cada operador trabaja sobre su propia sesión. Toda mutación toma el lock
//! de escritura mientras dura, así que dos arrastres sobre la misma sesión
//! nunca se mezclan. El guardado no mantiene el lock durante la red: toma
//! una foto del plan y la envía.
//!
//! Las sesiones se cierran explícitamente o se descartan al crear una nueva
//! cuando llevan más de `session_ttl` sin cambios. Cada sesión tiene su
//! bandera de cancelación: cerrarla o reconstruirla corta el sondeo de
//! geometrías que siga en curso para el tablero anterior.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::DashboardCache;
use crate::client::BackendClient;
use crate::dto::assignment_dto::SaveReport;
use crate::dto::editor_dto::{DragEndResponse, EditorSnapshot};
use crate::models::driver::DriverProfile;
use crate::models::{AssignmentSet, CustomerTable, DragOutcome, DragPosition, RouteStatus, SeedData, Stop};
use crate::services::driver_view::{driver_route_from, group_by_driver};
use crate::services::task_poller::CancellationFlag;
use crate::utils::errors::{not_found_error, AppResult};

pub struct EditorSession {
    assignments: AssignmentSet,
    customers: CustomerTable,
    active: Option<Stop>,
    cancel: CancellationFlag,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Lo necesario para dibujar el mapa de una sesión
pub struct SessionBoard {
    pub assignments: AssignmentSet,
    pub customers: CustomerTable,
    pub cancel: CancellationFlag,
}

impl EditorSession {
    fn new(seed: &SeedData) -> Self {
        let now = Utc::now();
        Self {
            assignments: AssignmentSet::build(seed.customers(), seed.vehicles()),
            customers: seed.customers().clone(),
            active: None,
            cancel: CancellationFlag::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn is_idle(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.updated_at)
            .to_std()
            .map(|idle| idle > ttl)
            .unwrap_or(false)
    }

    fn snapshot(&self, id: Uuid) -> EditorSnapshot {
        EditorSnapshot {
            session_id: id,
            routes: self.assignments.routes().to_vec(),
            active_stop: self.active.clone(),
            total_stops: self.assignments.total_stops(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct EditorService {
    sessions: Arc<RwLock<HashMap<Uuid, EditorSession>>>,
    backend: Arc<BackendClient>,
    cache: DashboardCache,
    company: String,
    session_ttl: Duration,
}

impl EditorService {
    pub fn new(
        backend: Arc<BackendClient>,
        cache: DashboardCache,
        company: String,
        session_ttl: Duration,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            backend,
            cache,
            company,
            session_ttl,
        }
    }

    pub async fn create(&self, seed: &SeedData) -> EditorSnapshot {
        let id = Uuid::new_v4();
        let session = EditorSession::new(seed);
        info!(
            "📋 Sesión {} creada: {} rutas, {} paradas",
            id,
            session.assignments.len(),
            session.assignments.total_stops()
        );
        let snapshot = session.snapshot(id);

        let mut sessions = self.sessions.write().await;
        self.evict_idle(&mut sessions);
        sessions.insert(id, session);
        snapshot
    }

    fn evict_idle(&self, sessions: &mut HashMap<Uuid, EditorSession>) {
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, session| {
            let idle = session.is_idle(now, self.session_ttl);
            if idle {
                session.cancel.cancel();
            }
            !idle
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("🧹 {} sesiones inactivas descartadas", evicted);
        }
    }

    /// Cerrar la sesión y cortar lo que siga en curso para ella
    pub async fn close(&self, id: Uuid) -> AppResult<()> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| not_found_error("Editor session", &id.to_string()))?;
        session.cancel.cancel();
        info!("🗑️ Sesión {} cerrada", id);
        Ok(())
    }

    pub async fn snapshot(&self, id: Uuid) -> AppResult<EditorSnapshot> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&id)
            .ok_or_else(|| not_found_error("Editor session", &id.to_string()))?;
        Ok(session.snapshot(id))
    }

    /// Rutas y clientes actuales de la sesión, para dibujar el mapa
    pub async fn board(&self, id: Uuid) -> AppResult<SessionBoard> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(&id)
            .ok_or_else(|| not_found_error("Editor session", &id.to_string()))?;
        Ok(SessionBoard {
            assignments: session.assignments.clone(),
            customers: session.customers.clone(),
            cancel: session.cancel.clone(),
        })
    }

    async fn mutate<T>(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut EditorSession) -> AppResult<T>,
    ) -> AppResult<(T, EditorSnapshot)> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Editor session", &id.to_string()))?;
        let value = apply(session)?;
        Ok((value, session.snapshot(id)))
    }

    /// Reconstruir con una semilla nueva; nombre y estado se conservan por posición
    pub async fn rebuild(&self, id: Uuid, seed: &SeedData) -> AppResult<EditorSnapshot> {
        let ((), snapshot) = self
            .mutate(id, |session| {
                session.assignments = session
                    .assignments
                    .rebuild(seed.customers(), seed.vehicles());
                session.customers = seed.customers().clone();
                session.active = None;
                session.cancel.cancel();
                session.cancel = CancellationFlag::new();
                session.touch();
                Ok(())
            })
            .await?;
        Ok(snapshot)
    }

    /// Marcar la parada arrastrada; no cambia ninguna ruta
    pub async fn begin_drag(&self, id: Uuid, position: DragPosition) -> AppResult<EditorSnapshot> {
        let ((), snapshot) = self
            .mutate(id, |session| {
                session.active = session.assignments.stop(position).cloned();
                Ok(())
            })
            .await?;
        Ok(snapshot)
    }

    pub async fn end_drag(
        &self,
        id: Uuid,
        source: DragPosition,
        destination: Option<DragPosition>,
    ) -> AppResult<DragEndResponse> {
        let (outcome, snapshot) = self
            .mutate(id, |session| {
                session.active = None;
                let outcome = session.assignments.move_stop(source, destination);
                if outcome != DragOutcome::Unchanged {
                    session.touch();
                }
                Ok(outcome)
            })
            .await?;
        Ok(DragEndResponse { outcome, snapshot })
    }

    pub async fn rename_driver(&self, id: Uuid, driver_index: usize, name: String) -> AppResult<EditorSnapshot> {
        let ((), snapshot) = self
            .mutate(id, |session| {
                session.assignments.rename_driver(driver_index, name)?;
                session.touch();
                Ok(())
            })
            .await?;
        Ok(snapshot)
    }

    pub async fn set_status(&self, id: Uuid, driver_index: usize, status: RouteStatus) -> AppResult<EditorSnapshot> {
        let ((), snapshot) = self
            .mutate(id, |session| {
                session.assignments.set_status(driver_index, status)?;
                session.touch();
                Ok(())
            })
            .await?;
        Ok(snapshot)
    }

    /// Enviar el tablero al backend: asignaciones y después detalle de clientes.
    ///
    /// Sin rutas con paradas no hay llamadas. Si el backend falla, la sesión
    /// queda igual y no se reintenta.
    pub async fn save(&self, id: Uuid) -> AppResult<SaveReport> {
        let (plan, driver_routes) = {
            let sessions = self.sessions.read().await;
            let session = sessions
                .get(&id)
                .ok_or_else(|| not_found_error("Editor session", &id.to_string()))?;
            let plan = session.assignments.save_plan(&self.company)?;

            let mut named = plan.assignments.iter();
            let driver_routes: Vec<_> = session
                .assignments
                .routes()
                .iter()
                .enumerate()
                .filter(|(_, route)| !route.is_empty())
                .filter_map(|(index, route)| {
                    named
                        .next()
                        .map(|assignment| driver_route_from(index, &assignment.driver_name, route))
                })
                .collect();
            (plan, driver_routes)
        };

        self.backend.post_driver_assignments(&plan.assignments).await?;
        if !plan.customers.customers.is_empty() {
            self.backend.post_customers(&plan.customers).await?;
        }

        for (driver, routes) in group_by_driver(driver_routes) {
            let profile = DriverProfile {
                email: driver.clone(),
                company: self.company.clone(),
            };
            if let Err(e) = self.cache.persist_driver_session(&driver, &profile, &routes).await {
                warn!("⚠️ No se pudo guardar la vista del conductor {}: {}", driver, e);
            }
        }

        let report = SaveReport {
            drivers_saved: plan.assignments.len(),
            customers_saved: plan.customers.customers.len(),
            saved_at: Utc::now(),
        };
        info!(
            "💾 Sesión {} guardada: {} conductores, {} clientes",
            id, report.drivers_saved, report.customers_saved
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::utils::errors::AppError;
    use serde_json::json;
    use std::time::Duration;

    fn service_with_ttl(session_ttl: Duration) -> EditorService {
        let backend = BackendClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        EditorService::new(
            Arc::new(backend),
            DashboardCache::new(Arc::new(MemoryStore::new())),
            "Acme".to_string(),
            session_ttl,
        )
    }

    fn service() -> EditorService {
        service_with_ttl(Duration::from_secs(3600))
    }

    fn seed() -> SeedData {
        SeedData::new(
            vec![json!({ "id": 0 }), json!({ "id": 101 }), json!({ "id": 102 }), json!({ "id": 201 })],
            vec![vec![0, 101, 102, 0], vec![0, 201, 0]],
        )
    }

    #[tokio::test]
    async fn test_drag_start_captures_without_mutating() {
        let editor = service();
        let created = editor.create(&seed()).await;

        let snapshot = editor
            .begin_drag(created.session_id, DragPosition::new(0, 1))
            .await
            .unwrap();

        assert_eq!(snapshot.active_stop.as_ref().unwrap().customer_id, 102);
        assert_eq!(snapshot.routes, created.routes);

        let missed = editor.begin_drag(created.session_id, DragPosition::new(9, 0)).await.unwrap();
        assert!(missed.active_stop.is_none());
    }

    #[tokio::test]
    async fn test_drag_end_clears_active_and_moves() {
        let editor = service();
        let id = editor.create(&seed()).await.session_id;
        editor.begin_drag(id, DragPosition::new(0, 0)).await.unwrap();

        let response = editor
            .end_drag(id, DragPosition::new(0, 0), Some(DragPosition::new(1, 0)))
            .await
            .unwrap();

        assert!(response.snapshot.active_stop.is_none());
        assert_eq!(response.snapshot.routes[0].customer_ids(), vec![102]);
        assert_eq!(response.snapshot.routes[1].customer_ids(), vec![101, 201]);
    }

    #[tokio::test]
    async fn test_save_of_empty_board_is_a_warning() {
        let editor = service();
        let id = editor.create(&SeedData::default()).await.session_id;

        // El backend de prueba no existe: un aviso prueba que no hubo llamadas
        assert!(matches!(editor.save(id).await, Err(AppError::EmptyAssignment(_))));
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let editor = service();
        assert!(matches!(editor.snapshot(Uuid::new_v4()).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rebuild_keeps_names_by_position() {
        let editor = service();
        let id = editor.create(&seed()).await.session_id;
        editor.rename_driver(id, 1, "reza@example.com".into()).await.unwrap();
        editor.set_status(id, 1, RouteStatus::Delivered).await.unwrap();

        let next = SeedData::new(seed().rows().to_vec(), vec![vec![0, 201, 0], vec![0, 101, 0]]);
        let snapshot = editor.rebuild(id, &next).await.unwrap();

        assert_eq!(snapshot.routes[1].driver_name(), "reza@example.com");
        assert_eq!(snapshot.routes[1].status(), RouteStatus::Delivered);
        assert_eq!(snapshot.routes[1].customer_ids(), vec![101]);
    }

    #[tokio::test]
    async fn test_close_removes_session_and_cancels_its_work() {
        let editor = service();
        let id = editor.create(&seed()).await.session_id;
        let board = editor.board(id).await.unwrap();

        editor.close(id).await.unwrap();

        assert!(board.cancel.is_cancelled());
        assert!(matches!(editor.snapshot(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(editor.close(id).await, Err(AppError::NotFound(_))));
        assert!(editor.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted_on_create() {
        let editor = service_with_ttl(Duration::from_millis(20));
        let stale = editor.create(&seed()).await.session_id;
        let stale_board = editor.board(stale).await.unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        let fresh = editor.create(&seed()).await.session_id;

        assert!(stale_board.cancel.is_cancelled());
        assert!(matches!(editor.snapshot(stale).await, Err(AppError::NotFound(_))));
        assert!(editor.snapshot(fresh).await.is_ok());
        assert_eq!(editor.sessions.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_active_sessions_survive_many_creates() {
        let editor = service();
        for _ in 0..5 {
            editor.create(&seed()).await;
        }
        assert_eq!(editor.sessions.read().await.len(), 5);
    }

    #[tokio::test]
    async fn test_rebuild_cancels_work_for_previous_board() {
        let editor = service();
        let id = editor.create(&seed()).await.session_id;
        let before = editor.board(id).await.unwrap();

        editor.rebuild(id, &seed()).await.unwrap();

        assert!(before.cancel.is_cancelled());
        assert!(!editor.board(id).await.unwrap().cancel.is_cancelled());
    }
}
