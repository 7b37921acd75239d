//! Read-only render snapshot
//!
//! Built once per frame for the renderer. Only entities inside the
//! off-screen margin are included; the renderer never gets write access to
//! the simulation.

use serde::Serialize;

use crate::sim::collision::{Aabb, is_offscreen};
use crate::sim::{GamePhase, GameState, PlatformKind};

/// Which sprite an entity wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpriteKey {
    Protagonist,
    Platform(PlatformKind),
    PlatformPressed,
    Enemy,
    Projectile,
}

impl SpriteKey {
    pub fn asset_name(&self) -> &'static str {
        match self {
            SpriteKey::Protagonist => "protagonist",
            SpriteKey::Platform(kind) => kind.profile().sprite,
            SpriteKey::PlatformPressed => "platform_spring_pressed",
            SpriteKey::Enemy => "enemy",
            SpriteKey::Projectile => "projectile",
        }
    }

    /// Solid fill used when the sprite is missing (0xRRGGBB)
    pub fn placeholder_color(&self) -> u32 {
        match self {
            SpriteKey::Protagonist => 0xff9800,
            SpriteKey::Platform(kind) => kind.profile().placeholder_color,
            SpriteKey::PlatformPressed => 0xffe082,
            SpriteKey::Enemy => 0xe53935,
            SpriteKey::Projectile => 0xffffff,
        }
    }
}

/// How the renderer should draw an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Appearance {
    Sprite(&'static str),
    Placeholder(u32),
}

impl Appearance {
    /// Use the sprite when the host has it, otherwise a solid placeholder
    pub fn resolve(key: SpriteKey, is_loaded: impl Fn(&str) -> bool) -> Self {
        let name = key.asset_name();
        if is_loaded(name) {
            Appearance::Sprite(name)
        } else {
            log::debug!("Sprite `{}` missing, drawing placeholder", name);
            Appearance::Placeholder(key.placeholder_color())
        }
    }
}

/// Position and size of one drawable
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityView {
    pub sprite: SpriteKey,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl EntityView {
    fn new(sprite: SpriteKey, bounds: Aabb) -> Self {
        Self {
            sprite,
            x: bounds.min.x,
            y: bounds.min.y,
            w: bounds.max.x - bounds.min.x,
            h: bounds.max.y - bounds.min.y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub jumps: u64,
    /// Backdrop scroll offset for parallax
    pub backdrop_offset: f32,
    pub protagonist: Option<EntityView>,
    pub platforms: Vec<EntityView>,
    pub enemies: Vec<EntityView>,
    pub projectiles: Vec<EntityView>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let world = &state.tuning.world;
        let visible = |bounds: &Aabb| !is_offscreen(bounds, world);
        let in_session = matches!(
            state.phase,
            GamePhase::Running | GamePhase::Paused | GamePhase::GameOver
        );

        let platforms = state
            .platforms
            .iter()
            .filter(|p| visible(&p.hitbox()))
            .map(|p| {
                let sprite = if p.pressed() {
                    SpriteKey::PlatformPressed
                } else {
                    SpriteKey::Platform(p.kind)
                };
                EntityView::new(sprite, p.hitbox())
            })
            .collect();

        let enemies = state
            .enemies
            .iter()
            .filter(|e| visible(&e.bounds()))
            .map(|e| EntityView::new(SpriteKey::Enemy, e.bounds()))
            .collect();

        let projectiles = state
            .protagonist
            .projectiles
            .iter()
            .filter(|p| visible(&p.hitbox()))
            .map(|p| EntityView::new(SpriteKey::Projectile, p.hitbox()))
            .collect();

        Self {
            phase: state.phase,
            score: state.score(),
            level: state.level(),
            jumps: state.total_jumps(),
            backdrop_offset: state.backdrop.offset,
            protagonist: in_session
                .then(|| EntityView::new(SpriteKey::Protagonist, state.protagonist.bounds())),
            platforms,
            enemies,
            projectiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_culls_offscreen_platforms() {
        let mut state = GameState::new(6);
        state.finish_loading().unwrap();
        state.start().unwrap();
        let snapshot = RenderSnapshot::capture(&state);
        // Runs are generated a full screen above the visible area
        assert!(snapshot.platforms.len() < state.platforms.len());
        assert!(snapshot.protagonist.is_some());
        assert_eq!(snapshot.phase, GamePhase::Running);
    }

    #[test]
    fn test_pressed_spring_uses_pressed_sprite() {
        let mut state = GameState::new(6);
        state.finish_loading().unwrap();
        state.start().unwrap();
        state.platforms[0].kind = PlatformKind::Spring;
        state.platforms[0].press(0.0, 1.0);
        let snapshot = RenderSnapshot::capture(&state);
        assert!(snapshot
            .platforms
            .iter()
            .any(|v| v.sprite == SpriteKey::PlatformPressed));
    }

    #[test]
    fn test_missing_sprite_falls_back_to_placeholder() {
        let key = SpriteKey::Platform(PlatformKind::Breakable);
        assert_eq!(
            Appearance::resolve(key, |_| true),
            Appearance::Sprite("platform_breakable")
        );
        assert_eq!(
            Appearance::resolve(key, |_| false),
            Appearance::Placeholder(key.placeholder_color())
        );
    }
}
