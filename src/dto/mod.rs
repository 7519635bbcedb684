//! DTOs
//!
//! Contratos con el backend del optimizador y con el cliente del panel.

pub mod api_response;
pub mod assignment_dto;
pub mod editor_dto;
pub mod map_dto;
pub mod seed_dto;
pub mod upload_dto;

pub use api_response::ApiResponse;
