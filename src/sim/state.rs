//! Game state and lifecycle types
//!
//! Everything one session needs lives in `GameState`; nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::entity::{Backdrop, Enemy, Platform, Protagonist};
use super::ledger::JumpLedger;
use crate::tuning::Tuning;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Assets still loading; nothing runs
    Loading,
    /// Waiting for the start input
    AwaitingStart,
    /// Active gameplay
    Running,
    /// Frozen while a revive offer is negotiated
    Paused,
    /// Session ended; terminal until reset
    GameOver,
}

/// Outcome of a revive negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviveOutcome {
    Granted,
    Denied,
}

/// What killed the protagonist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Fall,
    Enemy,
}

/// Emitted exactly once per transition into `GameOver`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub final_score: u64,
    pub total_jumps: u64,
    pub level: u32,
    pub duration_secs: f64,
    pub cause: Option<DeathCause>,
}

/// Outward-facing events for hosts (audio, HUD, settlement)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted { session: u32 },
    LevelUp { level: u32 },
    EnemyKilled { enemy_id: u32, points: u64 },
    PlatformConsumed { kind: super::entity::PlatformKind },
    SpringTriggered,
    ReviveOffered { cause: DeathCause },
    Revived,
    SessionEnded(SessionSummary),
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed; each session derives its own stream from it
    pub seed: u64,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Sessions started since construction
    pub session: u32,
    /// Simulation tick counter (Running ticks only)
    pub time_ticks: u64,
    /// Session time in seconds (sum of accepted frame deltas)
    pub session_secs: f64,
    pub protagonist: Protagonist,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub backdrop: Backdrop,
    pub difficulty: Difficulty,
    pub ledger: JumpLedger,
    /// Points from kills (altitude points are derived from the backdrop)
    pub bonus_score: u64,
    pub revives_used: u32,
    /// Screen y of the highest platform placed by the generator's runs
    pub last_spawn_y: f32,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) summary_emitted: bool,
    pub(crate) death_cause: Option<DeathCause>,
    next_id: u32,
}

impl GameState {
    /// Create a game in the `Loading` phase with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let difficulty = Difficulty::new(&tuning.difficulty);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Loading,
            session: 0,
            time_ticks: 0,
            session_secs: 0.0,
            protagonist: Protagonist::new(0, Vec2::ZERO),
            platforms: Vec::new(),
            enemies: Vec::new(),
            backdrop: Backdrop::default(),
            difficulty,
            ledger: JumpLedger::new(),
            bonus_score: 0,
            revives_used: 0,
            last_spawn_y: 0.0,
            events: Vec::new(),
            summary_emitted: false,
            death_cause: None,
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seed for the current session's RNG stream
    pub fn session_seed(&self) -> u64 {
        self.seed
            .wrapping_add((self.session as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Altitude points plus bonus points
    pub fn score(&self) -> u64 {
        let altitude = (self.backdrop.offset / self.tuning.world.altitude_per_point).max(0.0);
        altitude as u64 + self.bonus_score
    }

    pub fn total_jumps(&self) -> u64 {
        self.ledger.total_jumps()
    }

    pub fn level(&self) -> u32 {
        self.difficulty.level
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub(crate) fn summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.session_seed(),
            final_score: self.score(),
            total_jumps: self.total_jumps(),
            level: self.level(),
            duration_secs: self.session_secs,
            cause: self.death_cause,
        }
    }

    /// Discard every piece of per-session state and reseed the RNG.
    /// Runs before any tick of the next session can observe stale entities.
    pub(crate) fn clear_session(&mut self) {
        self.platforms.clear();
        self.enemies.clear();
        self.protagonist.reset(Vec2::ZERO);
        self.backdrop = Backdrop::default();
        self.difficulty = Difficulty::new(&self.tuning.difficulty);
        self.ledger.clear();
        self.bonus_score = 0;
        self.revives_used = 0;
        self.time_ticks = 0;
        self.session_secs = 0.0;
        self.last_spawn_y = 0.0;
        self.summary_emitted = false;
        self.death_cause = None;
        self.rng = Pcg32::seed_from_u64(self.session_seed());
    }
}
