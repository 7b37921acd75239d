//! Data-driven game balance
//!
//! Every heuristic constant the simulation uses lives here so hosts can
//! override it from JSON. Missing fields fall back to `crate::consts`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// World geometry and scrolling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    pub height: f32,
    /// Off-screen margin past which entities skip update and draw
    pub offscreen_margin: f32,
    /// Fraction of the height above which the world scrolls
    pub scroll_band: f32,
    pub altitude_per_point: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            offscreen_margin: OFFSCREEN_MARGIN,
            scroll_band: SCROLL_BAND,
            altitude_per_point: ALTITUDE_PER_POINT,
        }
    }
}

impl WorldTuning {
    /// Screen y of the scroll band edge
    pub fn scroll_line(&self) -> f32 {
        self.height * self.scroll_band
    }
}

/// Protagonist motion and landing resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Added to vy once per tick, independent of the delta scale
    pub gravity: f32,
    pub jump_impulse: f32,
    pub spring_impulse: f32,
    pub break_fall_speed: f32,
    pub move_speed: f32,
    pub landing_tolerance: f32,
    pub substep_threshold: f32,
    pub substep_fast_threshold: f32,
    pub substeps_slow: u32,
    pub substeps_fast: u32,
    pub spring_press_secs: f64,
    pub spring_grace_secs: f64,
    pub max_dt_scale: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            spring_impulse: SPRING_IMPULSE,
            break_fall_speed: BREAK_FALL_SPEED,
            move_speed: MOVE_SPEED,
            landing_tolerance: LANDING_TOLERANCE,
            substep_threshold: SUBSTEP_THRESHOLD,
            substep_fast_threshold: SUBSTEP_FAST_THRESHOLD,
            substeps_slow: SUBSTEPS_SLOW,
            substeps_fast: SUBSTEPS_FAST,
            spring_press_secs: SPRING_PRESS_SECS,
            spring_grace_secs: SPRING_GRACE_SECS,
            max_dt_scale: MAX_DT_SCALE,
        }
    }
}

/// One monotonic difficulty parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    pub initial: f32,
    pub step: f32,
    pub cap: f32,
}

impl Ramp {
    pub const fn new(initial: f32, step: f32, cap: f32) -> Self {
        Self { initial, step, cap }
    }

    /// Raise `value` by one step without passing the cap
    pub fn raise(&self, value: f32) -> f32 {
        (value + self.step).min(self.cap).max(value)
    }
}

/// Difficulty progression
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    pub gap: Ramp,
    pub special_chance: Ramp,
    pub lateral_speed: Ramp,
    pub enemy_chance: Ramp,
    /// Lateral speed and enemy chance rise only on every Nth level
    pub slow_ramp_every: u32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            gap: Ramp::new(GAP_INITIAL, GAP_STEP, GAP_CAP),
            special_chance: Ramp::new(
                SPECIAL_CHANCE_INITIAL,
                SPECIAL_CHANCE_STEP,
                SPECIAL_CHANCE_CAP,
            ),
            lateral_speed: Ramp::new(LATERAL_SPEED_INITIAL, LATERAL_SPEED_STEP, LATERAL_SPEED_CAP),
            enemy_chance: Ramp::new(ENEMY_CHANCE_INITIAL, ENEMY_CHANCE_STEP, ENEMY_CHANCE_CAP),
            slow_ramp_every: SLOW_RAMP_EVERY,
        }
    }
}

/// Procedural placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorTuning {
    pub platform_width: f32,
    pub gap_jitter: f32,
    pub max_breakables_per_cycle: u32,
    pub breakable_margin: f32,
    pub max_placement_attempts: u32,
}

impl Default for GeneratorTuning {
    fn default() -> Self {
        Self {
            platform_width: PLATFORM_WIDTH,
            gap_jitter: GAP_JITTER,
            max_breakables_per_cycle: MAX_BREAKABLES_PER_CYCLE,
            breakable_margin: BREAKABLE_MARGIN,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

/// Enemies and projectiles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub enemy_size: f32,
    pub enemy_min_speed: f32,
    pub enemy_max_speed: f32,
    pub projectile_speed: f32,
    pub max_projectiles: usize,
    pub shot_interval_secs: f64,
    pub kill_score: u64,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            enemy_size: ENEMY_SIZE,
            enemy_min_speed: ENEMY_MIN_SPEED,
            enemy_max_speed: ENEMY_MAX_SPEED,
            projectile_speed: PROJECTILE_SPEED,
            max_projectiles: MAX_PROJECTILES,
            shot_interval_secs: SHOT_INTERVAL_SECS,
            kill_score: KILL_SCORE,
        }
    }
}

/// Revive negotiation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviveTuning {
    /// Pause with a revive offer instead of ending the session on death
    pub offer_on_death: bool,
    pub max_revives: u32,
    /// Upward reposition applied on a granted revive (pixels)
    pub lift: f32,
    /// vy assigned on a granted revive
    pub boost: f32,
}

impl Default for ReviveTuning {
    fn default() -> Self {
        Self {
            offer_on_death: false,
            max_revives: MAX_REVIVES,
            lift: REVIVE_LIFT,
            boost: REVIVE_BOOST,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub physics: PhysicsTuning,
    pub difficulty: DifficultyTuning,
    pub generator: GeneratorTuning,
    pub combat: CombatTuning,
    pub revive: ReviveTuning,
}

impl Tuning {
    /// Parse tuning from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: world {}x{}, gravity {}",
            tuning.world.width,
            tuning.world.height,
            tuning.physics.gravity
        );
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.world.width <= self.generator.platform_width {
            return Err(invalid("world.width", "must exceed platform width"));
        }
        if self.world.height <= 0.0 {
            return Err(invalid("world.height", "must be positive"));
        }
        if !(0.0..1.0).contains(&self.world.scroll_band) {
            return Err(invalid("world.scroll_band", "must be in [0, 1)"));
        }
        if self.world.altitude_per_point <= 0.0 {
            return Err(invalid("world.altitude_per_point", "must be positive"));
        }
        if self.physics.jump_impulse >= 0.0 || self.physics.spring_impulse >= 0.0 {
            return Err(invalid("physics.jump_impulse", "impulses must point upward (negative)"));
        }
        if self.physics.substeps_slow == 0 || self.physics.substeps_fast == 0 {
            return Err(invalid("physics.substeps", "must be at least 1"));
        }
        if self.physics.max_dt_scale <= 0.0 {
            return Err(invalid("physics.max_dt_scale", "must be positive"));
        }
        let ramps = [
            ("difficulty.gap", self.difficulty.gap),
            ("difficulty.special_chance", self.difficulty.special_chance),
            ("difficulty.lateral_speed", self.difficulty.lateral_speed),
            ("difficulty.enemy_chance", self.difficulty.enemy_chance),
        ];
        for (field, ramp) in ramps {
            if ramp.step < 0.0 {
                return Err(invalid(field, "step must not be negative"));
            }
            if ramp.cap < ramp.initial {
                let reason = format!("cap {} below initial {}", ramp.cap, ramp.initial);
                return Err(invalid(field, reason));
            }
        }
        if self.generator.gap_jitter < 0.0 {
            return Err(invalid("generator.gap_jitter", "must not be negative"));
        }
        if self.difficulty.gap.initial <= self.generator.gap_jitter {
            return Err(invalid("difficulty.gap", "initial gap must exceed the jitter"));
        }
        if self.difficulty.special_chance.cap > 1.0 || self.difficulty.enemy_chance.cap > 1.0 {
            return Err(invalid("difficulty.chance", "probability caps must not exceed 1"));
        }
        if self.difficulty.slow_ramp_every == 0 {
            return Err(invalid("difficulty.slow_ramp_every", "must be at least 1"));
        }
        if self.generator.max_placement_attempts == 0 {
            return Err(invalid("generator.max_placement_attempts", "must be at least 1"));
        }
        if self.combat.enemy_size <= 0.0 || self.combat.enemy_size >= self.world.width {
            return Err(invalid("combat.enemy_size", "must be positive and below world width"));
        }
        if self.combat.enemy_min_speed <= 0.0
            || self.combat.enemy_max_speed < self.combat.enemy_min_speed
        {
            return Err(invalid("combat.enemy_speed", "need 0 < min <= max"));
        }
        Ok(())
    }
}
