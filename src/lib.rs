//! # rs-gearbox
//!
//! A simplified vehicle gearbox simulator with web and terminal control.
//!
//! ## Features
//!
//! - **Hysteresis shifting**: gears shift up at `window top - 3` and down at
//!   `window bottom + 3`, anticipating boundaries instead of chattering on them
//! - **Deterministic stepping**: one discrete update per call, request-paced
//!   over HTTP, tick-paced in the terminal
//! - **No failure modes in the core**: non-positive time deltas substitute a
//!   fallback, speed and gear are clamped on every mutation path
//!
//! ## Architecture
//!
//! The crate is structured so the engine can be tested and embedded without
//! any I/O stack:
//!
//! - `gearbox` - the simulation engine (speed integration + shift policy)
//! - `parsing` - truthy query-parameter parsing for the wire protocol
//! - `config` - adapter configuration
//! - `services` - axum HTTP adapter (`web` feature)
//! - `console` - interactive terminal speedometer (`console` feature)
//!
//! ## Example
//!
//! ```rust
//! use rs_gearbox::GearboxEngine;
//!
//! let mut engine = GearboxEngine::new();
//!
//! // Accelerate across the first shift point.
//! engine.step(true, false, 1.0);
//! engine.step(true, false, 1.0);
//! assert_eq!(engine.speed(), 50.0);
//! assert_eq!(engine.gear(), 2);
//!
//! engine.reset();
//! assert_eq!(engine.speed(), 0.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

/// Gearbox simulation engine: speed integration and shift hysteresis.
pub mod gearbox;

/// Query-string parsing helpers for the wire protocol.
pub mod parsing;

/// Shared configuration for the web and console adapters.
pub mod config;

/// Web service exposing the simulator over HTTP (feature-gated).
#[cfg(feature = "web")]
pub mod services;

/// Interactive terminal front end (feature-gated).
#[cfg(feature = "console")]
pub mod console;

// Re-exports for convenience
pub use gearbox::{
    GearWindow, GearboxEngine, GearboxState, ACCEL_RATE, ANTICIPATORY_MARGIN, BRAKE_RATE,
    COAST_DRAG, FALLBACK_DT, GEAR_WINDOWS, MAX_SPEED, NUM_GEARS,
};

// Config re-exports
pub use config::{Config, ConsoleConfig, WebConfig};
