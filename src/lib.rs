//! Sky Hop - an endlessly ascending platformer simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, generation, ledger)
//! - `clock`: Frame driver turning wall-clock deltas into ticks
//! - `snapshot`: Read-only view handed to the renderer
//! - `metering`: Jump/settlement collaborator interface
//! - `tuning`: Data-driven game balance

pub mod clock;
pub mod metering;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use clock::SimulationClock;
pub use metering::{MeteringSink, RecordingMeter};
pub use snapshot::{Appearance, RenderSnapshot};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Baseline frame duration; a delta of exactly this length scales motion by 1.0
    pub const BASELINE_DT: f32 = 1.0 / 60.0;
    /// Largest delta scale accepted for a single tick (tab switches, stalls)
    pub const MAX_DT_SCALE: f32 = 3.0;

    /// World dimensions (pixels)
    pub const WORLD_WIDTH: f32 = 500.0;
    pub const WORLD_HEIGHT: f32 = 800.0;
    /// Entities further than this past any edge are neither updated nor drawn
    pub const OFFSCREEN_MARGIN: f32 = 100.0;
    /// The world scrolls while the protagonist is above this fraction of the height
    pub const SCROLL_BAND: f32 = 0.4;

    /// Protagonist defaults
    pub const PROTAGONIST_WIDTH: f32 = 60.0;
    pub const PROTAGONIST_HEIGHT: f32 = 60.0;
    /// Hitbox is this fraction of the visual bounds, centered
    pub const HITBOX_SCALE: f32 = 0.5;
    pub const MOVE_SPEED: f32 = 6.0;

    /// Gravity added to vy every tick (frame-based, not delta-scaled)
    pub const GRAVITY: f32 = 0.35;
    pub const JUMP_IMPULSE: f32 = -13.0;
    pub const SPRING_IMPULSE: f32 = -24.0;
    /// Downward velocity imposed when a breakable platform gives way
    pub const BREAK_FALL_SPEED: f32 = 2.0;
    /// Landing tolerance band around a platform top (pixels)
    pub const LANDING_TOLERANCE: f32 = 8.0;
    /// |vy| above which landing checks are sub-stepped
    pub const SUBSTEP_THRESHOLD: f32 = 10.0;
    /// |vy| above which the maximum sub-step count is used
    pub const SUBSTEP_FAST_THRESHOLD: f32 = 18.0;
    pub const SUBSTEPS_FAST: u32 = 3;
    pub const SUBSTEPS_SLOW: u32 = 2;
    /// Spring pressed visual duration (seconds)
    pub const SPRING_PRESS_SECS: f64 = 0.3;
    /// Landing checks suppressed after a spring jump (seconds)
    pub const SPRING_GRACE_SECS: f64 = 0.25;

    /// Platform defaults
    pub const PLATFORM_WIDTH: f32 = 90.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 64.0;
    pub const ENEMY_MIN_SPEED: f32 = 1.0;
    pub const ENEMY_MAX_SPEED: f32 = 2.5;

    /// Projectile defaults
    pub const PROJECTILE_SIZE: f32 = 12.0;
    pub const PROJECTILE_SPEED: f32 = -12.0;
    pub const MAX_PROJECTILES: usize = 6;
    pub const SHOT_INTERVAL_SECS: f64 = 0.3;
    pub const KILL_SCORE: u64 = 50;
    /// World scroll (pixels) per altitude point
    pub const ALTITUDE_PER_POINT: f32 = 10.0;

    /// Revive defaults
    pub const REVIVE_LIFT: f32 = 450.0;
    pub const REVIVE_BOOST: f32 = -10.0;
    pub const MAX_REVIVES: u32 = 1;

    /// Difficulty defaults: (initial, step, cap)
    pub const GAP_INITIAL: f32 = 90.0;
    pub const GAP_STEP: f32 = 2.0;
    pub const GAP_CAP: f32 = 190.0;
    pub const SPECIAL_CHANCE_INITIAL: f32 = 0.05;
    pub const SPECIAL_CHANCE_STEP: f32 = 0.01;
    pub const SPECIAL_CHANCE_CAP: f32 = 0.45;
    pub const LATERAL_SPEED_INITIAL: f32 = 1.0;
    pub const LATERAL_SPEED_STEP: f32 = 0.25;
    pub const LATERAL_SPEED_CAP: f32 = 4.0;
    pub const ENEMY_CHANCE_INITIAL: f32 = 0.05;
    pub const ENEMY_CHANCE_STEP: f32 = 0.03;
    pub const ENEMY_CHANCE_CAP: f32 = 0.35;
    /// Lateral speed and enemy chance rise every Nth level
    pub const SLOW_RAMP_EVERY: u32 = 3;

    /// Generator defaults
    pub const GAP_JITTER: f32 = 15.0;
    pub const MAX_BREAKABLES_PER_CYCLE: u32 = 5;
    pub const BREAKABLE_MARGIN: f32 = 10.0;
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 48;
}

/// Wrap an x coordinate so an entity of `width` that fully leaves one side
/// re-enters from the other.
#[inline]
pub fn wrap_horizontal(x: f32, width: f32, world_width: f32) -> f32 {
    if x + width < 0.0 {
        world_width
    } else if x > world_width {
        -width
    } else {
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_horizontal() {
        assert_eq!(wrap_horizontal(10.0, 60.0, 500.0), 10.0);
        assert_eq!(wrap_horizontal(-61.0, 60.0, 500.0), 500.0);
        assert_eq!(wrap_horizontal(501.0, 60.0, 500.0), -60.0);
    }
}
