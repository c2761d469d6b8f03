//! Axum handlers: image CRUD plus health probes.

pub mod health_handlers;
pub mod image_handlers;
