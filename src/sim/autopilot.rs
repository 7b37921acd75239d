//! Demo autopilot
//!
//! Produces the input a reasonable player would give: start when waiting,
//! pick a landing spot at takeoff and steer under it, shoot enemies
//! overhead. The locked target is its only memory, so autopiloted runs stay
//! deterministic. Reach estimates assume baseline frames (delta scale 1).

use super::entity::{Platform, PlatformId, PlatformKind};
use super::state::{GamePhase, GameState};
use super::tick::TickInput;

/// Horizontal distance treated as "already lined up"
const DEAD_ZONE: f32 = 4.0;
/// Clearance a new target must keep below the predicted apex
const APEX_MARGIN: f32 = 24.0;
/// A takeoff target must sit at least this far above the hitbox bottom
const MIN_CLIMB: f32 = 20.0;
/// Center offset that still lands (hitbox and platform half widths overlap)
const LANDING_SLACK: f32 = 40.0;
/// Ticks lost to the landing band and the one-step lookahead
const ARRIVAL_TICKS: f32 = 2.0;

/// Steering with a target locked from takeoff until landing
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    target: Option<PlatformId>,
    rising: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform currently steered for
    pub fn target(&self) -> Option<PlatformId> {
        self.target
    }

    pub fn steer(&mut self, state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        match state.phase {
            GamePhase::AwaitingStart => {
                *self = Self::default();
                input.start = true;
                return input;
            }
            GamePhase::Running => {}
            _ => return input,
        }

        let jump = Trajectory::of(state);
        let rising = jump.vy < 0.0;
        if rising && !self.rising {
            // Takeoff: whatever we aimed for has been reached or missed
            self.target = None;
        }
        self.rising = rising;

        let locked = self
            .target
            .and_then(|id| live_platforms(state).find(|p| p.id == id))
            .filter(|p| jump.keeps(p));
        let target = match locked {
            Some(platform) => Some(platform),
            None if rising => jump.pick_above(state),
            None => jump.pick_below(state),
        };
        self.target = target.map(|p| p.id);

        if let Some(platform) = target {
            let dx = platform.hitbox().center().x - jump.center_x;
            if dx > DEAD_ZONE {
                input.move_right = true;
            } else if dx < -DEAD_ZONE {
                input.move_left = true;
            }
        }

        let hitbox = state.protagonist.hitbox();
        input.shoot = state.enemies.iter().any(|e| {
            let eb = e.hitbox();
            eb.bottom() < hitbox.top() && eb.min.x < hitbox.max.x && eb.max.x > hitbox.min.x
        });

        input
    }
}

/// Platforms worth aiming for. Breakables drop the protagonist instead.
fn live_platforms(state: &GameState) -> impl Iterator<Item = &Platform> {
    state
        .platforms
        .iter()
        .filter(|p| !p.marked_for_removal && p.kind != PlatformKind::Breakable)
}

/// Ballistic prediction for the protagonist's current jump
struct Trajectory {
    bottom: f32,
    center_x: f32,
    vy: f32,
    gravity: f32,
    move_speed: f32,
    tolerance: f32,
    /// Scroll queued for next tick; platforms are compared as if applied
    scroll: f32,
}

impl Trajectory {
    fn of(state: &GameState) -> Self {
        let hitbox = state.protagonist.hitbox();
        let physics = &state.tuning.physics;
        Self {
            bottom: hitbox.bottom(),
            center_x: hitbox.center().x,
            vy: state.protagonist.vel.y,
            gravity: physics.gravity.max(0.01),
            move_speed: physics.move_speed,
            tolerance: physics.landing_tolerance,
            scroll: state.backdrop.pending_scroll,
        }
    }

    fn top(&self, platform: &Platform) -> f32 {
        platform.top() + self.scroll
    }

    /// Hitbox bottom at the top of the arc
    fn apex_bottom(&self) -> f32 {
        if self.vy >= 0.0 {
            return self.bottom;
        }
        // Gravity lands before motion each tick, hence the half-step term
        let rise = self.vy * self.vy / (2.0 * self.gravity) + self.vy * 0.5;
        self.bottom - rise.max(0.0)
    }

    /// Ticks until the hitbox bottom comes back down to `top`
    fn ticks_to(&self, top: f32) -> Option<f32> {
        let apex = self.apex_bottom();
        if top < apex {
            return None;
        }
        let rise_ticks = (-self.vy).max(0.0) / self.gravity;
        let v0 = self.vy.max(0.0);
        let drop = top - apex;
        let fall_ticks = ((v0 * v0 + 2.0 * self.gravity * drop).sqrt() - v0) / self.gravity;
        Some(rise_ticks + fall_ticks)
    }

    fn travel(&self, platform: &Platform) -> f32 {
        let dx = platform.hitbox().center().x - self.center_x;
        (dx.abs() - LANDING_SLACK).max(0.0)
    }

    fn feasible(&self, platform: &Platform) -> bool {
        self.ticks_to(self.top(platform)).is_some_and(|ticks| {
            self.travel(platform) <= self.move_speed * (ticks - ARRIVAL_TICKS).max(0.0)
        })
    }

    /// A locked target stays while the arc can still come down onto it
    fn keeps(&self, platform: &Platform) -> bool {
        let top = self.top(platform);
        if self.vy < 0.0 {
            top >= self.apex_bottom()
        } else {
            top >= self.bottom - self.tolerance
        }
    }

    fn pick_above<'a>(&self, state: &'a GameState) -> Option<&'a Platform> {
        let floor = self.bottom - MIN_CLIMB;
        let ceiling = self.apex_bottom() + APEX_MARGIN;
        self.best(live_platforms(state).filter(|p| {
            let top = self.top(p);
            top < floor && top >= ceiling
        }))
    }

    fn pick_below<'a>(&self, state: &'a GameState) -> Option<&'a Platform> {
        let line = self.bottom - self.tolerance;
        self.best(live_platforms(state).filter(|p| self.top(p) >= line))
    }

    /// Highest platform the arc can reach in time, otherwise the one needing
    /// the least sideways travel
    fn best<'a>(&self, platforms: impl Iterator<Item = &'a Platform>) -> Option<&'a Platform> {
        let (feasible, rest): (Vec<_>, Vec<_>) = platforms.partition(|p| self.feasible(p));
        feasible
            .into_iter()
            .min_by(|a, b| self.top(a).total_cmp(&self.top(b)))
            .or_else(|| {
                rest.into_iter()
                    .min_by(|a, b| self.travel(a).total_cmp(&self.travel(b)))
            })
    }
}
