//! Per-frame simulation tick
//!
//! Order within a tick: timers, backdrop scroll (and generation on a
//! completed cycle), protagonist physics and landing, entity updates,
//! combat, removal of marked entities, difficulty, terminal check.
//! Removal happens only after the full update pass.

use glam::Vec2;

use super::collision::{Landing, landing_contact};
use super::entity::{LandingResponse, PlatformKind, Projectile};
use super::generate::generate_cycle;
use super::state::{DeathCause, GameEvent, GamePhase, GameState};
use crate::consts::BASELINE_DT;

/// Input intents for a single tick. Movement is level-triggered; `shoot` is
/// rate limited by the simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub shoot: bool,
    /// Start a session (only meaningful while awaiting start)
    pub start: bool,
}

impl TickInput {
    /// -1, 0 or 1
    pub fn direction(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Convert a wall-clock frame delta (seconds) into the motion scale, where
/// one baseline frame is 1.0. Returns `None` for unusable deltas.
pub fn normalize_delta(frame_delta: f32, max_scale: f32) -> Option<f32> {
    if !frame_delta.is_finite() || frame_delta < 0.0 {
        return None;
    }
    Some((frame_delta / BASELINE_DT).min(max_scale))
}

/// Advance the game by one frame of `frame_delta` seconds
pub fn tick(state: &mut GameState, input: &TickInput, frame_delta: f32) {
    if input.start && state.phase == GamePhase::AwaitingStart {
        if let Err(err) = state.start() {
            log::warn!("Start input ignored: {}", err);
        }
    }

    // Nothing progresses outside Running
    if state.phase != GamePhase::Running {
        return;
    }

    let Some(dt) = normalize_delta(frame_delta, state.tuning.physics.max_dt_scale) else {
        log::warn!("Skipping tick with unusable frame delta {}", frame_delta);
        return;
    };

    state.time_ticks += 1;
    state.session_secs += frame_delta as f64;
    let now = state.session_secs;

    for platform in &mut state.platforms {
        platform.expire_press(now);
    }

    let cycle_completed = advance_backdrop(state);
    if cycle_completed {
        generate_cycle(state);
    }

    steer_and_shoot(state, input, now);
    step_protagonist(state, dt, now);
    update_scroll(state);
    update_entities(state, dt);
    let fatal = resolve_combat(state);

    state.platforms.retain(|p| !p.marked_for_removal);
    state.enemies.retain(|e| !e.marked_for_removal);
    state
        .protagonist
        .projectiles
        .retain(|p| !p.marked_for_removal);

    if cycle_completed {
        state.difficulty.advance(&state.tuning.difficulty);
        let level = state.difficulty.level;
        log::info!("Level {} reached", level);
        state.push_event(GameEvent::LevelUp { level });
    }

    if fatal {
        state.handle_death(DeathCause::Enemy);
    } else if state.protagonist.pos.y > state.tuning.world.height {
        state.handle_death(DeathCause::Fall);
    }
}

/// Shift every world entity by the scroll queued last tick. Returns true
/// when the backdrop completed a scroll cycle.
fn advance_backdrop(state: &mut GameState) -> bool {
    let delta = state.backdrop.take_scroll();
    if delta <= 0.0 {
        return false;
    }
    for platform in &mut state.platforms {
        platform.pos.y += delta;
    }
    for enemy in &mut state.enemies {
        enemy.pos.y += delta;
    }
    for projectile in &mut state.protagonist.projectiles {
        projectile.pos.y += delta;
    }
    state.last_spawn_y += delta;
    state.backdrop.advance(delta, state.tuning.world.height)
}

/// Horizontal intent and rate-limited shooting
fn steer_and_shoot(state: &mut GameState, input: &TickInput, now: f64) {
    let combat = &state.tuning.combat;
    let p = &mut state.protagonist;
    p.vel.x = input.direction() * state.tuning.physics.move_speed;

    if !input.shoot || p.projectiles.len() >= combat.max_projectiles {
        return;
    }
    let ready = p
        .last_shot_at
        .is_none_or(|last| now - last >= combat.shot_interval_secs);
    if !ready {
        return;
    }
    let bounds = p.bounds();
    let spawn = Vec2::new(bounds.center().x - crate::consts::PROJECTILE_SIZE * 0.5, bounds.top());
    p.projectiles
        .push(Projectile::new(p.id, spawn, combat.projectile_speed));
    p.last_shot_at = Some(now);
}

/// Gravity, landing resolution and integration for the protagonist
fn step_protagonist(state: &mut GameState, dt: f32, now: f64) {
    // Frame-based: one gravity increment per tick whatever the delta
    state.protagonist.vel.y += state.tuning.physics.gravity;

    if now >= state.protagonist.landing_grace_until {
        resolve_landing(state, dt, now);
    }

    state.protagonist.update(dt, &state.tuning.world);
}

/// Find the first platform the protagonist lands on this frame and apply the
/// platform kind's landing response.
fn resolve_landing(state: &mut GameState, dt: f32, now: f64) {
    let hitbox = state.protagonist.hitbox();
    let vy = state.protagonist.vel.y;
    let physics = &state.tuning.physics;

    let mut contact: Option<(usize, Landing)> = None;
    for (index, platform) in state.platforms.iter().enumerate() {
        if platform.marked_for_removal {
            continue;
        }
        if let Some(landing) = landing_contact(&hitbox, vy, dt, &platform.hitbox(), physics) {
            // The highest surface is the one reached first on the way down
            let closer = contact.is_none_or(|(_, best)| landing.surface_top < best.surface_top);
            if closer {
                contact = Some((index, landing));
            }
        }
    }

    let Some((index, landing)) = contact else {
        return;
    };

    let physics = state.tuning.physics.clone();
    let level = state.difficulty.level;
    let platform = &mut state.platforms[index];
    let protagonist = &mut state.protagonist;

    match platform.kind.profile().landing {
        LandingResponse::Jump => {
            protagonist.snap_to_surface(landing.surface_top);
            protagonist.vel.y = physics.jump_impulse;
        }
        LandingResponse::JumpAndConsume => {
            protagonist.snap_to_surface(landing.surface_top);
            protagonist.vel.y = physics.jump_impulse;
            platform.marked_for_removal = true;
        }
        LandingResponse::FallThrough => {
            protagonist.vel.y = physics.break_fall_speed;
            platform.marked_for_removal = true;
        }
        LandingResponse::Spring => {
            protagonist.snap_to_surface(landing.surface_top);
            protagonist.vel.y = physics.spring_impulse;
            protagonist.landing_grace_until = now + physics.spring_grace_secs;
            platform.press(now, physics.spring_press_secs);
        }
    }

    state
        .ledger
        .record_landing(&mut protagonist.visited, platform, level, now);

    let kind = platform.kind;
    match kind {
        PlatformKind::Spring => state.push_event(GameEvent::SpringTriggered),
        PlatformKind::Breakable | PlatformKind::OneShot => {
            state.push_event(GameEvent::PlatformConsumed { kind })
        }
        _ => {}
    }
}

/// Pin the protagonist at the scroll line while it climbs above it. The
/// distance it overshot the line is queued as world scroll, so the world
/// moves exactly as far as the protagonist would have.
fn update_scroll(state: &mut GameState) {
    let line = state.tuning.world.scroll_line();
    let p = &mut state.protagonist;
    if p.pos.y < line && p.vel.y < 0.0 {
        state.backdrop.pending_scroll = line - p.pos.y;
        p.pos.y = line;
    } else {
        state.backdrop.pending_scroll = 0.0;
    }
}

fn update_entities(state: &mut GameState, dt: f32) {
    let world = &state.tuning.world;
    for platform in &mut state.platforms {
        platform.update(dt, world);
    }
    for enemy in &mut state.enemies {
        enemy.update(dt, world);
    }
    for projectile in &mut state.protagonist.projectiles {
        projectile.update(dt, world);
    }
}

/// Projectile vs enemy kills, then protagonist vs enemy. Returns true when
/// the protagonist was hit.
fn resolve_combat(state: &mut GameState) -> bool {
    let kill_score = state.tuning.combat.kill_score;
    let mut kills = Vec::new();

    for projectile in &mut state.protagonist.projectiles {
        if projectile.marked_for_removal {
            continue;
        }
        let shot = projectile.hitbox();
        if let Some(enemy) = state
            .enemies
            .iter_mut()
            .find(|e| !e.marked_for_removal && e.hitbox().overlaps(&shot))
        {
            projectile.marked_for_removal = true;
            enemy.marked_for_removal = true;
            kills.push(enemy.id);
        }
    }

    for enemy_id in kills {
        state.bonus_score += kill_score;
        state.push_event(GameEvent::EnemyKilled {
            enemy_id,
            points: kill_score,
        });
    }

    let body = state.protagonist.hitbox();
    match state
        .enemies
        .iter_mut()
        .find(|e| !e.marked_for_removal && e.hitbox().overlaps(&body))
    {
        Some(enemy) => {
            // Removed with the death so a revive does not re-collide
            enemy.marked_for_removal = true;
            true
        }
        None => false,
    }
}
