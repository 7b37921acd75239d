//! Difficulty progression
//!
//! One level per scroll cycle. Every parameter only ever rises, each up to
//! its own cap.

use serde::{Deserialize, Serialize};

use crate::tuning::DifficultyTuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub level: u32,
    /// Vertical spacing between consecutive run platforms
    pub gap: f32,
    /// Probability that a run platform is a special kind
    pub special_chance: f32,
    /// Patrol speed given to new lateral movers
    pub lateral_speed: f32,
    /// Per-cycle enemy spawn probability
    pub enemy_chance: f32,
}

impl Difficulty {
    pub fn new(tuning: &DifficultyTuning) -> Self {
        Self {
            level: 0,
            gap: tuning.gap.initial,
            special_chance: tuning.special_chance.initial,
            lateral_speed: tuning.lateral_speed.initial,
            enemy_chance: tuning.enemy_chance.initial,
        }
    }

    /// Step to the next level
    pub fn advance(&mut self, tuning: &DifficultyTuning) {
        self.level += 1;
        self.gap = tuning.gap.raise(self.gap);
        self.special_chance = tuning.special_chance.raise(self.special_chance);
        if self.level.is_multiple_of(tuning.slow_ramp_every) {
            self.lateral_speed = tuning.lateral_speed.raise(self.lateral_speed);
            self.enemy_chance = tuning.enemy_chance.raise(self.enemy_chance);
        }
        log::debug!(
            "Level {}: gap={:.1} special={:.2} lateral={:.2} enemy={:.2}",
            self.level,
            self.gap,
            self.special_chance,
            self.lateral_speed,
            self.enemy_chance
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_ramp_only_every_nth_level() {
        let tuning = DifficultyTuning::default();
        let mut d = Difficulty::new(&tuning);
        for _ in 1..tuning.slow_ramp_every {
            d.advance(&tuning);
        }
        assert_eq!(d.lateral_speed, tuning.lateral_speed.initial);
        assert_eq!(d.enemy_chance, tuning.enemy_chance.initial);
        assert!(d.gap > tuning.gap.initial);

        d.advance(&tuning);
        assert!(d.lateral_speed > tuning.lateral_speed.initial);
        assert!(d.enemy_chance > tuning.enemy_chance.initial);
    }

    #[test]
    fn test_long_session_reaches_caps() {
        let tuning = DifficultyTuning::default();
        let mut d = Difficulty::new(&tuning);
        for _ in 0..1000 {
            d.advance(&tuning);
        }
        assert_eq!(d.level, 1000);
        assert_eq!(d.gap, tuning.gap.cap);
        assert_eq!(d.special_chance, tuning.special_chance.cap);
        assert_eq!(d.lateral_speed, tuning.lateral_speed.cap);
        assert_eq!(d.enemy_chance, tuning.enemy_chance.cap);
    }
}
