//! Shared engine state for the web service.
//!
//! `SharedGearbox` wraps the single [`GearboxEngine`] in a mutex so that a
//! concurrent HTTP host observes the same semantics as the original
//! single-threaded simulator: every step, reset, and read is serialized
//! behind one mutual-exclusion boundary.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rs_gearbox::services::SharedGearbox;
//!
//! let shared = Arc::new(SharedGearbox::new());
//!
//! let state = shared.step(true, false, 0.06);
//! assert_eq!(state.speed, 1.5);
//!
//! let state = shared.reset();
//! assert_eq!(state.speed, 0.0);
//! assert_eq!(state.gear, 1);
//! ```

use std::sync::Mutex;

use crate::gearbox::{GearboxEngine, GearboxState};

/// Mutex-serialized wrapper around the process-wide gearbox engine.
///
/// Engine calls are short, synchronous, and non-blocking, so a plain
/// `Mutex` is sufficient; the closure-based accessor keeps the lock from
/// being held across await points in async handlers.
pub struct SharedGearbox {
    engine: Mutex<GearboxEngine>,
}

impl SharedGearbox {
    /// Create shared state around a fresh engine (speed 0, gear 1).
    pub fn new() -> Self {
        Self::with_engine(GearboxEngine::new())
    }

    /// Create shared state around an existing engine.
    pub fn with_engine(engine: GearboxEngine) -> Self {
        Self {
            engine: Mutex::new(engine),
        }
    }

    /// Access the engine under the lock.
    pub fn with_lock<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut GearboxEngine) -> R,
    {
        let mut guard = self.engine.lock().unwrap();
        f(&mut guard)
    }

    /// Step the simulation and return the resulting state, atomically.
    pub fn step(&self, accelerating: bool, braking: bool, dt_seconds: f64) -> GearboxState {
        self.with_lock(|engine| {
            engine.step(accelerating, braking, dt_seconds);
            engine.state()
        })
    }

    /// Reset the simulation and return the resulting state, atomically.
    pub fn reset(&self) -> GearboxState {
        self.with_lock(|engine| {
            engine.reset();
            engine.state()
        })
    }

    /// Read the current state without mutating speed.
    pub fn state(&self) -> GearboxState {
        self.with_lock(|engine| engine.state())
    }
}

impl Default for SharedGearbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn fresh_shared_state_is_at_rest() {
        let shared = SharedGearbox::new();
        let state = shared.state();
        assert_eq!(state.speed, 0.0);
        assert_eq!(state.gear, 1);
    }

    #[test]
    fn step_and_reset_round_trip() {
        let shared = SharedGearbox::new();

        let state = shared.step(true, false, 1.0);
        assert_eq!(state.speed, 25.0);
        assert_eq!(state.gear, 1);

        let state = shared.reset();
        assert_eq!(state.speed, 0.0);
        assert_eq!(state.gear, 1);
    }

    #[test]
    fn with_lock_gives_engine_access() {
        let shared = SharedGearbox::new();
        shared.with_lock(|engine| {
            engine.step(true, false, 2.0);
        });
        assert_eq!(shared.state().speed, 50.0);
    }

    #[test]
    fn concurrent_steps_preserve_invariants() {
        use std::thread;

        let shared = Arc::new(SharedGearbox::new());
        let mut handles = Vec::new();

        for i in 0..4 {
            let shared = Arc::clone(&shared);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    let state = shared.step(i % 2 == 0, i % 2 == 1, 0.06);
                    assert!(state.speed >= 0.0 && state.speed <= 160.0);
                    assert!(state.gear >= 1 && state.gear <= 5);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
