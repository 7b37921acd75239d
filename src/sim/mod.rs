//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, one stream per session
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod generate;
pub mod ledger;
pub mod lifecycle;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Landing, landing_contact};
pub use difficulty::Difficulty;
pub use entity::{
    Backdrop, Enemy, LandingResponse, PLATFORM_TABLE, Platform, PlatformId, PlatformKind,
    PlatformProfile, Projectile, Protagonist,
};
pub use generate::{GenerationReport, generate_cycle, seed_session};
pub use ledger::{JumpEvent, JumpLedger};
pub use lifecycle::LifecycleError;
pub use state::{DeathCause, GameEvent, GamePhase, GameState, ReviveOutcome, SessionSummary};
pub use tick::{TickInput, normalize_delta, tick};
