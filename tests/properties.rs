//! Property tests for the simulation invariants

use std::collections::HashSet;

use glam::Vec2;
use proptest::prelude::*;

use sky_hop::consts::BASELINE_DT;
use sky_hop::sim::generate::overlaps_existing;
use sky_hop::sim::{
    Difficulty, GameState, JumpLedger, Platform, PlatformKind, TickInput, generate_cycle, tick,
};
use sky_hop::tuning::{DifficultyTuning, Ramp};

fn mid_air(seed: u64) -> GameState {
    let mut state = GameState::new(seed);
    state.finish_loading().unwrap();
    state.start().unwrap();
    state.platforms.clear();
    state.enemies.clear();
    state.protagonist.pos = Vec2::new(200.0, 500.0);
    state.protagonist.vel = Vec2::ZERO;
    state
}

proptest! {
    #[test]
    fn motion_scales_with_delta_but_gravity_does_not(scale in 0.25f32..3.0) {
        let mut state = mid_air(1);
        let input = TickInput { move_right: true, ..Default::default() };
        let x0 = state.protagonist.pos.x;

        tick(&mut state, &input, BASELINE_DT * scale);

        let physics = &state.tuning.physics;
        let dx = state.protagonist.pos.x - x0;
        prop_assert!((dx - physics.move_speed * scale).abs() < 1e-3);
        prop_assert!((state.protagonist.vel.y - physics.gravity).abs() < 1e-6);
        let dy = state.protagonist.pos.y - 500.0;
        prop_assert!((dy - physics.gravity * scale).abs() < 1e-3);
    }

    #[test]
    fn jump_counted_once_per_platform(landings in prop::collection::vec(0usize..8, 1..200)) {
        let platforms: Vec<Platform> = (0..8)
            .map(|i| {
                let pos = Vec2::new(10.0 * i as f32, -90.0 * i as f32);
                Platform::new(PlatformKind::Standard, pos, 90.0, 0.0)
            })
            .collect();
        let mut ledger = JumpLedger::new();
        let mut visited = HashSet::new();
        for (t, &i) in landings.iter().enumerate() {
            ledger.record_landing(&mut visited, &platforms[i], 0, t as f64);
        }
        let distinct: HashSet<_> = landings.iter().collect();
        prop_assert_eq!(ledger.total_jumps(), distinct.len() as u64);
        let drained = ledger.drain();
        let ids: HashSet<_> = drained.iter().map(|e| e.platform).collect();
        prop_assert_eq!(ids.len(), drained.len());
    }

    #[test]
    fn breakables_clear_existing_platforms(seed in any::<u64>(), cycles in 1usize..12) {
        let mut state = GameState::new(seed);
        state.finish_loading().unwrap();
        state.start().unwrap();
        let margin = state.tuning.generator.breakable_margin;

        for _ in 0..cycles {
            let before = state.platforms.len();
            let report = generate_cycle(&mut state);
            if report.near_misses > 0 {
                continue;
            }
            for i in before..state.platforms.len() {
                let p = &state.platforms[i];
                if p.kind == PlatformKind::Breakable {
                    prop_assert!(!overlaps_existing(p.pos.y, &state.platforms[..i], margin));
                }
            }
            state.difficulty.advance(&state.tuning.difficulty);
        }
    }

    #[test]
    fn difficulty_monotonic_and_capped(
        levels in 1usize..2000,
        gap_step in 0.0f32..10.0,
        chance_step in 0.0f32..0.2,
        every in 1u32..6,
    ) {
        let tuning = DifficultyTuning {
            gap: Ramp::new(80.0, gap_step, 200.0),
            special_chance: Ramp::new(0.0, chance_step, 0.5),
            lateral_speed: Ramp::new(1.0, gap_step, 6.0),
            enemy_chance: Ramp::new(0.1, chance_step, 0.4),
            slow_ramp_every: every,
        };
        let mut d = Difficulty::new(&tuning);
        for _ in 0..levels {
            let prev = d.clone();
            d.advance(&tuning);
            let pairs = [
                (prev.gap, d.gap, tuning.gap.cap),
                (prev.special_chance, d.special_chance, tuning.special_chance.cap),
                (prev.lateral_speed, d.lateral_speed, tuning.lateral_speed.cap),
                (prev.enemy_chance, d.enemy_chance, tuning.enemy_chance.cap),
            ];
            for (before, after, cap) in pairs {
                prop_assert!(after >= before && after <= cap);
            }
        }
    }
}
