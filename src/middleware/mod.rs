//! Middleware

pub mod cors;
