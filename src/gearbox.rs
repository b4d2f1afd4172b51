//! Gearbox simulation engine.
//!
//! This module provides [`GearboxEngine`], the core of the simulator: it
//! integrates speed from accelerate/brake stimuli and runs the hysteresis
//! shift policy after every update.
//!
//! # Overview
//!
//! Each gear owns a contiguous speed window. The engine shifts *before* a
//! window boundary is reached: up at `max_speed - margin`, down at
//! `min_speed + margin`. The margin turns exact boundary crossings into
//! anticipatory shifts and prevents chattering when speed hovers near a
//! boundary.
//!
//! The engine is pure state + arithmetic with no I/O and no failure modes:
//! every input combination is defined, either directly or by substitution
//! (non-positive time steps) and clamping (speed and gear bounds).
//!
//! # Example
//!
//! ```rust
//! use rs_gearbox::GearboxEngine;
//!
//! let mut engine = GearboxEngine::new();
//!
//! // Full throttle for one second: 25 km/h, still in first gear.
//! engine.step(true, false, 1.0);
//! assert_eq!(engine.speed(), 25.0);
//! assert_eq!(engine.gear(), 1);
//!
//! // Another second crosses the 29 km/h shift point (32 - 3 margin).
//! engine.step(true, false, 1.0);
//! assert_eq!(engine.speed(), 50.0);
//! assert_eq!(engine.gear(), 2);
//! ```

/// Number of gears.
pub const NUM_GEARS: u8 = 5;

/// Offset from a window boundary at which a shift triggers.
pub const ANTICIPATORY_MARGIN: f64 = 3.0;

/// Speed gained per second while accelerating.
pub const ACCEL_RATE: f64 = 25.0;

/// Speed lost per second while braking.
pub const BRAKE_RATE: f64 = 45.0;

/// Speed lost per second while not accelerating.
pub const COAST_DRAG: f64 = 4.0;

/// Hard speed ceiling.
pub const MAX_SPEED: f64 = 160.0;

/// Substituted when a step is asked for a non-positive time delta.
pub const FALLBACK_DT: f64 = 0.05;

/// Speed interval owned by one gear.
///
/// Windows are contiguous and ordered: each gear's `min_speed` equals the
/// previous gear's `max_speed`, covering `[0, MAX_SPEED]` overall.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GearWindow {
    /// Lower speed bound of this gear.
    pub min_speed: f64,
    /// Upper speed bound of this gear.
    pub max_speed: f64,
}

/// Fixed window table, indexed by `gear - 1`.
pub const GEAR_WINDOWS: [GearWindow; NUM_GEARS as usize] = [
    GearWindow { min_speed: 0.0, max_speed: 32.0 },
    GearWindow { min_speed: 32.0, max_speed: 64.0 },
    GearWindow { min_speed: 64.0, max_speed: 96.0 },
    GearWindow { min_speed: 96.0, max_speed: 128.0 },
    GearWindow { min_speed: 128.0, max_speed: 160.0 },
];

fn clamp_gear(gear: u8) -> u8 {
    gear.clamp(1, NUM_GEARS)
}

/// The gearbox simulation engine.
///
/// Owns the simulated speed and gear and mutates them through [`step`] and
/// [`reset`]. There is one engine per simulated vehicle; the services module
/// wraps it in a mutex when a concurrent host needs access.
///
/// [`step`]: GearboxEngine::step
/// [`reset`]: GearboxEngine::reset
#[derive(Clone, Debug)]
pub struct GearboxEngine {
    speed: f64,
    gear: u8,
}

impl GearboxEngine {
    /// Create an engine at rest: speed 0, gear 1.
    pub fn new() -> Self {
        Self { speed: 0.0, gear: 1 }
    }

    /// Return to the initial state: speed 0, gear 1.
    pub fn reset(&mut self) {
        self.speed = 0.0;
        self.gear = 1;
    }

    /// Advance the simulation by one discrete update.
    ///
    /// Effects, in order:
    ///
    /// 1. Integrate: `+ACCEL_RATE * dt` when accelerating, otherwise
    ///    `-COAST_DRAG * dt`; braking additionally subtracts
    ///    `BRAKE_RATE * dt` independent of which branch was taken.
    /// 2. Clamp speed to `[0, MAX_SPEED]`.
    /// 3. Run the shift decision on the post-clamp speed.
    ///
    /// A non-positive `dt_seconds` is replaced by [`FALLBACK_DT`]; this is
    /// defined behavior, not an error.
    pub fn step(&mut self, accelerating: bool, braking: bool, dt_seconds: f64) {
        let dt = if dt_seconds <= 0.0 { FALLBACK_DT } else { dt_seconds };

        let mut delta_v = 0.0;
        if accelerating {
            delta_v += ACCEL_RATE * dt;
        } else {
            delta_v -= COAST_DRAG * dt;
        }
        if braking {
            delta_v -= BRAKE_RATE * dt;
        }

        self.set_speed_clamped(self.speed + delta_v);
        self.apply_shift_logic();
    }

    /// Current speed, always within `[0, MAX_SPEED]`.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Current gear, re-clamped into `[1, NUM_GEARS]` before returning.
    ///
    /// The clamp is redundant with the step invariant but kept as a final
    /// safety check on the read path.
    pub fn gear(&mut self) -> u8 {
        self.gear = clamp_gear(self.gear);
        self.gear
    }

    /// The speed window of the current gear.
    pub fn window(&self) -> GearWindow {
        GEAR_WINDOWS[(clamp_gear(self.gear) - 1) as usize]
    }

    /// Snapshot of the current state for adapters and UIs.
    pub fn state(&mut self) -> GearboxState {
        GearboxState {
            speed: self.speed,
            gear: self.gear(),
        }
    }

    /// Single mutation path for speed; enforces the `[0, MAX_SPEED]` bound.
    fn set_speed_clamped(&mut self, speed: f64) {
        self.speed = speed.clamp(0.0, MAX_SPEED);
    }

    /// Hysteresis shift decision, run once per step after the speed update.
    ///
    /// Upshift is checked first and wins the (theoretical) tie: with
    /// non-overlapping windows both conditions cannot hold at once, but the
    /// ordering is the defined tie-break. At most one shift per call.
    fn apply_shift_logic(&mut self) {
        self.gear = clamp_gear(self.gear);
        let window = GEAR_WINDOWS[(self.gear - 1) as usize];

        if self.gear < NUM_GEARS && self.speed >= window.max_speed - ANTICIPATORY_MARGIN {
            self.gear = clamp_gear(self.gear + 1);
        } else if self.gear > 1 && self.speed <= window.min_speed + ANTICIPATORY_MARGIN {
            self.gear = clamp_gear(self.gear - 1);
        }
    }
}

impl Default for GearboxEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// State snapshot for UI/API.
///
/// # Example
///
/// ```rust
/// use rs_gearbox::GearboxEngine;
///
/// let mut engine = GearboxEngine::new();
/// let state = engine.state();
/// assert_eq!(state.speed, 0.0);
/// assert_eq!(state.gear, 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GearboxState {
    /// Current speed (0 to [`MAX_SPEED`]).
    pub speed: f64,
    /// Current gear (1 to [`NUM_GEARS`]).
    pub gear: u8,
}

impl Default for GearboxState {
    fn default() -> Self {
        Self { speed: 0.0, gear: 1 }
    }
}
