//! Web service for the gearbox simulator.
//!
//! The simulator has exactly one engine instance; [`SharedGearbox`] wraps it
//! in a mutex so the axum server's concurrent connections observe the same
//! read-modify-write ordering as a single-threaded host. The router in
//! [`web`] exposes the three-route HTTP surface and the [`api`] module holds
//! the fixed wire shape.
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_gearbox::services::{build_router, SharedGearbox, WebServerConfig};
//!
//! let gearbox = Arc::new(SharedGearbox::new());
//! let router = build_router(Arc::clone(&gearbox), &WebServerConfig::default());
//! ```

pub mod api;
pub mod shared;
pub mod web;

// Re-exports
pub use api::*;
pub use shared::*;
pub use web::*;
