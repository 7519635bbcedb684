//! Route Dispatch
//!
//! Servicio del panel de despacho: carga de clientes, editor de
//! asignaciones de conductores, capas de mapa y vista del conductor, sobre
//! el backend externo del optimizador.

pub mod cache;
pub mod client;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
