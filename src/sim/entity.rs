//! Entity model: protagonist, platforms, enemies, projectiles, backdrop
//!
//! Positions are the top-left corner in screen space (y grows downward).
//! Every entity exposes `update(dt)` and a hitbox; protagonist and enemy
//! hitboxes are shrunk around their center to keep contact forgiving.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, is_below_world, is_offscreen};
use crate::consts::*;
use crate::tuning::WorldTuning;
use crate::wrap_horizontal;

/// Stable platform identity, derived from where the platform spawned in
/// world space. Never reassigned while the platform lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformId {
    /// Spawn x, rounded to the pixel
    pub x: i32,
    /// Spawn altitude above the session origin, rounded to the pixel
    pub altitude: i32,
}

impl PlatformId {
    /// `scroll_offset` is the total world scroll at spawn time
    pub fn from_spawn(pos: Vec2, scroll_offset: f32) -> Self {
        Self {
            x: pos.x.round() as i32,
            altitude: (scroll_offset - pos.y).round() as i32,
        }
    }
}

/// Platform behavior tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlatformKind {
    #[default]
    Standard,
    LateralMover,
    Breakable,
    OneShot,
    Spring,
}

/// What a landing on a platform does to the protagonist and the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingResponse {
    /// Regular jump impulse
    Jump,
    /// Jump impulse, then the platform is consumed
    JumpAndConsume,
    /// No jump: small downward velocity, platform is consumed
    FallThrough,
    /// Amplified impulse, pressed state, landing grace window
    Spring,
}

/// Per-kind row of the platform dispatch table
#[derive(Debug, Clone, Copy)]
pub struct PlatformProfile {
    pub kind: PlatformKind,
    pub height: f32,
    pub landing: LandingResponse,
    /// Relative weight inside the special-platform draw (0 = never drawn there)
    pub special_weight: u32,
    pub sprite: &'static str,
    /// Solid color used when the sprite is unavailable (0xRRGGBB)
    pub placeholder_color: u32,
}

/// Platform dispatch table. Adding a kind is one row here plus the enum variant.
pub const PLATFORM_TABLE: [PlatformProfile; 5] = [
    PlatformProfile {
        kind: PlatformKind::Standard,
        height: 15.0,
        landing: LandingResponse::Jump,
        special_weight: 0,
        sprite: "platform_standard",
        placeholder_color: 0x4caf50,
    },
    PlatformProfile {
        kind: PlatformKind::LateralMover,
        height: 15.0,
        landing: LandingResponse::Jump,
        special_weight: 5,
        sprite: "platform_lateral",
        placeholder_color: 0x2196f3,
    },
    PlatformProfile {
        kind: PlatformKind::Breakable,
        height: 20.0,
        landing: LandingResponse::FallThrough,
        special_weight: 0,
        sprite: "platform_breakable",
        placeholder_color: 0x8d6e63,
    },
    PlatformProfile {
        kind: PlatformKind::OneShot,
        height: 15.0,
        landing: LandingResponse::JumpAndConsume,
        special_weight: 3,
        sprite: "platform_one_shot",
        placeholder_color: 0xeeeeee,
    },
    PlatformProfile {
        kind: PlatformKind::Spring,
        height: 25.0,
        landing: LandingResponse::Spring,
        special_weight: 2,
        sprite: "platform_spring",
        placeholder_color: 0xffc107,
    },
];

impl PlatformKind {
    pub fn profile(self) -> &'static PlatformProfile {
        let index = match self {
            PlatformKind::Standard => 0,
            PlatformKind::LateralMover => 1,
            PlatformKind::Breakable => 2,
            PlatformKind::OneShot => 3,
            PlatformKind::Spring => 4,
        };
        &PLATFORM_TABLE[index]
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.profile().height
    }
}

/// The player-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Protagonist {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Owned projectiles, bounded by `CombatTuning::max_projectiles`
    pub projectiles: Vec<Projectile>,
    /// Platforms already counted as jumps this session
    pub visited: HashSet<PlatformId>,
    /// Landing checks are skipped until this session time
    pub landing_grace_until: f64,
    /// Session time of the last projectile spawn
    pub last_shot_at: Option<f64>,
}

impl Protagonist {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            size: Vec2::new(PROTAGONIST_WIDTH, PROTAGONIST_HEIGHT),
            projectiles: Vec::new(),
            visited: HashSet::new(),
            landing_grace_until: 0.0,
            last_shot_at: None,
        }
    }

    /// Place the protagonist so its hitbox rests on a surface at `top`
    pub fn standing_on(id: u32, center_x: f32, top: f32) -> Self {
        let size = Vec2::new(PROTAGONIST_WIDTH, PROTAGONIST_HEIGHT);
        let hitbox_bottom_offset = size.y * (1.0 + HITBOX_SCALE) * 0.5;
        Self::new(id, Vec2::new(center_x - size.x * 0.5, top - hitbox_bottom_offset))
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn hitbox(&self) -> Aabb {
        self.bounds().scaled_centered(HITBOX_SCALE)
    }

    /// Move the protagonist vertically so its hitbox bottom sits at `top`
    pub fn snap_to_surface(&mut self, top: f32) {
        let delta = top - self.hitbox().bottom();
        self.pos.y += delta;
    }

    /// Horizontal and vertical integration for one tick.
    /// Gravity is applied separately, once per tick.
    pub fn update(&mut self, dt: f32, world: &WorldTuning) {
        self.pos.x = wrap_horizontal(self.pos.x + self.vel.x * dt, self.size.x, world.width);
        self.pos.y += self.vel.y * dt;
    }

    /// Drop velocity, projectiles, visited set and timers; keep identity
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.projectiles.clear();
        self.visited.clear();
        self.landing_grace_until = 0.0;
        self.last_shot_at = None;
    }
}

/// A landing surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub kind: PlatformKind,
    pub pos: Vec2,
    pub width: f32,
    /// Horizontal patrol speed (lateral movers only)
    pub vx: f32,
    pub marked_for_removal: bool,
    /// Spring pressed state expires at this session time
    pub pressed_until: Option<f64>,
}

impl Platform {
    pub fn new(kind: PlatformKind, pos: Vec2, width: f32, scroll_offset: f32) -> Self {
        Self {
            id: PlatformId::from_spawn(pos, scroll_offset),
            kind,
            pos,
            width,
            vx: 0.0,
            marked_for_removal: false,
            pressed_until: None,
        }
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.kind.height()
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    /// Platforms are solid surfaces: the hitbox is the full visual bounds
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, Vec2::new(self.width, self.height()))
    }

    #[inline]
    pub fn pressed(&self) -> bool {
        self.pressed_until.is_some()
    }

    pub fn press(&mut self, now: f64, duration: f64) {
        self.pressed_until = Some(now + duration);
    }

    /// Clear the pressed state once its expiry time has passed
    pub fn expire_press(&mut self, now: f64) {
        if self.pressed_until.is_some_and(|until| now >= until) {
            self.pressed_until = None;
        }
    }

    /// Patrol (lateral movers) and off-screen removal
    pub fn update(&mut self, dt: f32, world: &WorldTuning) {
        let bounds = self.hitbox();
        if is_below_world(&bounds, world) {
            self.marked_for_removal = true;
            return;
        }
        if is_offscreen(&bounds, world) {
            return;
        }
        if self.kind == PlatformKind::LateralMover && self.vx != 0.0 {
            self.pos.x += self.vx * dt;
            let max_x = world.width - self.width;
            if self.pos.x <= 0.0 {
                self.pos.x = 0.0;
                self.vx = self.vx.abs();
            } else if self.pos.x >= max_x {
                self.pos.x = max_x;
                self.vx = -self.vx.abs();
            }
        }
    }
}

/// A hostile entity oscillating horizontally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub vx: f32,
    pub marked_for_removal: bool,
}

impl Enemy {
    /// `vx` is pushed out to at least `min_speed` in magnitude
    pub fn new(id: u32, pos: Vec2, size: f32, vx: f32, min_speed: f32) -> Self {
        let vx = if vx.abs() < min_speed {
            if vx < 0.0 { -min_speed } else { min_speed }
        } else {
            vx
        };
        Self {
            id,
            pos,
            size: Vec2::splat(size),
            vx,
            marked_for_removal: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn hitbox(&self) -> Aabb {
        self.bounds().scaled_centered(HITBOX_SCALE)
    }

    pub fn update(&mut self, dt: f32, world: &WorldTuning) {
        let bounds = self.bounds();
        if is_below_world(&bounds, world) {
            self.marked_for_removal = true;
            return;
        }
        if is_offscreen(&bounds, world) {
            return;
        }
        self.pos.x += self.vx * dt;
        let max_x = world.width - self.size.x;
        if self.pos.x <= 0.0 {
            self.pos.x = 0.0;
            self.vx = self.vx.abs();
        } else if self.pos.x >= max_x {
            self.pos.x = max_x;
            self.vx = -self.vx.abs();
        }
    }
}

/// A shot fired upward by the protagonist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    pub vy: f32,
    /// Id of the protagonist that fired it (not an ownership link)
    pub owner: u32,
    pub marked_for_removal: bool,
}

impl Projectile {
    pub fn new(owner: u32, pos: Vec2, vy: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(PROJECTILE_SIZE),
            vy,
            owner,
            marked_for_removal: false,
        }
    }

    /// Projectiles are already small; the hitbox is the full bounds
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    pub fn update(&mut self, dt: f32, world: &WorldTuning) {
        self.pos.y += self.vy * dt;
        if is_offscreen(&self.hitbox(), world) {
            self.marked_for_removal = true;
        }
    }
}

/// Scrolling backdrop: owns the world scroll and counts scroll cycles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Backdrop {
    /// Total world scroll this session (pixels)
    pub offset: f32,
    /// Scroll accumulated toward the next cycle
    pub cycle_progress: f32,
    /// Scroll distance queued by the resolver, applied at the start of the
    /// next tick (pixels)
    pub pending_scroll: f32,
    /// Completed scroll cycles
    pub cycles: u32,
}

impl Backdrop {
    /// Take the queued scroll distance, leaving none behind
    #[inline]
    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.pending_scroll)
    }

    /// Advance by `delta` pixels. Returns true when a full cycle (one world
    /// height) completed; at most one cycle is reported per call.
    pub fn advance(&mut self, delta: f32, cycle_length: f32) -> bool {
        if delta <= 0.0 {
            return false;
        }
        self.offset += delta;
        self.cycle_progress += delta;
        if self.cycle_progress >= cycle_length {
            self.cycle_progress -= cycle_length;
            self.cycles += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_table_rows_match_kinds() {
        for row in &PLATFORM_TABLE {
            assert_eq!(row.kind.profile().kind, row.kind);
        }
    }

    #[test]
    fn test_platform_id_stable_under_scroll() {
        let spawn = Platform::new(PlatformKind::Standard, Vec2::new(40.0, -100.0), 90.0, 250.0);
        // Same platform observed after 300px more scroll
        let later = PlatformId::from_spawn(Vec2::new(40.0, 200.0), 550.0);
        assert_eq!(spawn.id, later);
    }

    #[test]
    fn test_spring_press_expires() {
        let mut p = Platform::new(PlatformKind::Spring, Vec2::new(0.0, 100.0), 90.0, 0.0);
        p.press(1.0, 0.3);
        assert!(p.pressed());
        p.expire_press(1.2);
        assert!(p.pressed());
        p.expire_press(1.3);
        assert!(!p.pressed());
    }

    #[test]
    fn test_lateral_mover_reflects() {
        let world = WorldTuning::default();
        let mut p = Platform::new(
            PlatformKind::LateralMover,
            Vec2::new(world.width - 92.0, 300.0),
            90.0,
            0.0,
        );
        p.vx = 3.0;
        p.update(1.0, &world);
        assert_eq!(p.pos.x, world.width - 90.0);
        assert!(p.vx < 0.0);
    }

    #[test]
    fn test_offscreen_platform_skips_update() {
        let world = WorldTuning::default();
        let mut p = Platform::new(PlatformKind::LateralMover, Vec2::new(100.0, -500.0), 90.0, 0.0);
        p.vx = 3.0;
        p.update(1.0, &world);
        assert_eq!(p.pos.x, 100.0);
        assert!(!p.marked_for_removal);
    }

    #[test]
    fn test_enemy_min_speed() {
        let e = Enemy::new(1, Vec2::ZERO, 64.0, 0.2, 1.0);
        assert_eq!(e.vx, 1.0);
        let e = Enemy::new(1, Vec2::ZERO, 64.0, -0.2, 1.0);
        assert_eq!(e.vx, -1.0);
    }

    #[test]
    fn test_enemy_reflects() {
        let world = WorldTuning::default();
        let mut e = Enemy::new(1, Vec2::new(world.width - 66.0, 300.0), 64.0, 3.0, 1.0);
        e.update(1.0, &world);
        assert_eq!(e.pos.x, world.width - 64.0);
        assert_eq!(e.vx, -3.0);

        let mut e = Enemy::new(2, Vec2::new(1.0, 300.0), 64.0, -2.0, 1.0);
        e.update(1.0, &world);
        assert_eq!(e.pos.x, 0.0);
        assert_eq!(e.vx, 2.0);
    }

    #[test]
    fn test_offscreen_enemy_skips_update() {
        let world = WorldTuning::default();
        let mut e = Enemy::new(1, Vec2::new(100.0, -400.0), 64.0, 2.0, 1.0);
        e.update(1.0, &world);
        assert_eq!(e.pos.x, 100.0);
        assert_eq!(e.vx, 2.0);
        assert!(!e.marked_for_removal);
    }

    #[test]
    fn test_enemy_below_world_marked() {
        let world = WorldTuning::default();
        let mut e = Enemy::new(1, Vec2::new(10.0, world.height + 200.0), 64.0, 1.0, 1.0);
        e.update(1.0, &world);
        assert!(e.marked_for_removal);
    }

    #[test]
    fn test_protagonist_wraps() {
        let world = WorldTuning::default();
        let mut p = Protagonist::new(1, Vec2::new(world.width - 1.0, 300.0));
        p.vel.x = 6.0;
        p.update(1.0, &world);
        assert_eq!(p.pos.x, -p.size.x);
    }

    #[test]
    fn test_standing_on_rests_hitbox_on_surface() {
        let p = Protagonist::standing_on(1, 250.0, 700.0);
        assert!((p.hitbox().bottom() - 700.0).abs() < 1e-4);
        assert!((p.hitbox().center().x - 250.0).abs() < 1e-4);
    }

    #[test]
    fn test_backdrop_scroll_is_taken_once() {
        let mut b = Backdrop {
            pending_scroll: 12.5,
            ..Default::default()
        };
        assert_eq!(b.take_scroll(), 12.5);
        assert_eq!(b.take_scroll(), 0.0);
    }

    #[test]
    fn test_backdrop_cycles() {
        let mut b = Backdrop::default();
        assert!(!b.advance(500.0, 800.0));
        assert!(b.advance(400.0, 800.0));
        assert_eq!(b.cycles, 1);
        assert!((b.cycle_progress - 100.0).abs() < 1e-4);
        assert!(!b.advance(-5.0, 800.0));
    }
}
