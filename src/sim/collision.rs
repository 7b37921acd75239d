//! Collision detection for axis-aligned entities
//!
//! Two jobs: plain box overlap (projectiles, enemies) and landing detection,
//! which has to catch a falling protagonist crossing a platform top even when
//! a single frame moves it further than the tolerance band.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::{PhysicsTuning, WorldTuning};

/// Axis-aligned box in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// A box `scale` times this one's size, sharing its center
    pub fn scaled_centered(&self, scale: f32) -> Self {
        let center = (self.min + self.max) * 0.5;
        let half = (self.max - self.min) * 0.5 * scale;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    #[inline]
    pub fn overlaps_horizontally(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
    }
}

/// True when the box lies entirely beyond the off-screen margin on any side
pub fn is_offscreen(bounds: &Aabb, world: &WorldTuning) -> bool {
    let m = world.offscreen_margin;
    bounds.max.y < -m
        || bounds.min.y > world.height + m
        || bounds.max.x < -m
        || bounds.min.x > world.width + m
}

/// True when the box has dropped past the bottom margin for good
pub fn is_below_world(bounds: &Aabb, world: &WorldTuning) -> bool {
    bounds.min.y > world.height + world.offscreen_margin
}

/// Number of landing probes for a frame at vertical speed `vy`
pub fn substep_count(vy: f32, physics: &PhysicsTuning) -> u32 {
    let speed = vy.abs();
    if speed > physics.substep_fast_threshold {
        physics.substeps_fast
    } else if speed > physics.substep_threshold {
        physics.substeps_slow
    } else {
        1
    }
}

/// A detected landing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    /// Platform top the hitbox bottom should rest on
    pub surface_top: f32,
    /// Probe index that found the contact (0 = current position)
    pub probe: u32,
}

/// Check whether a hitbox moving at `vy` (scaled by `dt`) lands on `surface` this frame.
///
/// Slow frames test the current and the predicted next bottom against the
/// tolerance band. Fast frames split the travel into sub-steps and also treat
/// a straddle of the band between two consecutive probes as a landing, so a
/// large step cannot skip over a thin platform.
pub fn landing_contact(
    hitbox: &Aabb,
    vy: f32,
    dt: f32,
    surface: &Aabb,
    physics: &PhysicsTuning,
) -> Option<Landing> {
    if vy < 0.0 || !hitbox.overlaps_horizontally(surface) {
        return None;
    }

    let top = surface.top();
    let tol = physics.landing_tolerance;
    let bottom = hitbox.bottom();
    let travel = vy * dt;
    let steps = substep_count(vy, physics);

    let mut prev = bottom;
    for probe in 0..=steps {
        let b = bottom + travel * probe as f32 / steps as f32;
        if (b - top).abs() <= tol {
            return Some(Landing {
                surface_top: top,
                probe,
            });
        }
        if steps > 1 && probe > 0 && prev < top - tol && b > top + tol {
            return Some(Landing {
                surface_top: top,
                probe,
            });
        }
        prev = b;
    }

    None
}
