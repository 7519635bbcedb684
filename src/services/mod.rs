//! Services module
//!
//! Este módulo contiene la lógica de negocio del panel: semilla, editor de
//! asignaciones, geometría, mapa, carga de clientes y vista del conductor.

pub mod driver_view;
pub mod editor_service;
pub mod geometry_service;
pub mod map_view;
pub mod seed_loader;
pub mod task_poller;
pub mod upload_service;

pub use editor_service::{EditorService, SessionBoard};
pub use geometry_service::GeometryService;
pub use seed_loader::{SeedLoader, SeedState};
pub use task_poller::{CancellationFlag, TaskPoller};
pub use upload_service::UploadService;
