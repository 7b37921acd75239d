//! Simulation clock
//!
//! Owns the game state, turns wall-clock frame timestamps into tick deltas
//! and pumps queued events out to the metering collaborator.

use crate::consts::BASELINE_DT;
use crate::metering::MeteringSink;
use crate::sim::{GameEvent, GameState, TickInput, tick};

pub struct SimulationClock {
    state: GameState,
    /// Timestamp (seconds) of the previous frame
    last_frame: Option<f64>,
    frames: u64,
}

impl SimulationClock {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            last_frame: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one display frame at wall-clock `now` (seconds). The first frame
    /// uses the baseline delta. Returns the delta handed to the tick.
    pub fn frame(&mut self, now: f64, input: &TickInput) -> f32 {
        let delta = match self.last_frame {
            Some(last) => (now - last) as f32,
            None => BASELINE_DT,
        };
        self.last_frame = Some(now);
        self.frames += 1;
        tick(&mut self.state, input, delta);
        delta
    }

    /// Forget the previous timestamp so the next frame starts from the
    /// baseline delta (after a host-side stall, for example).
    pub fn rebase(&mut self) {
        self.last_frame = None;
    }

    /// Hand queued jumps and any terminal summary to `sink`. Returns every
    /// drained game event so the host can react to the rest.
    pub fn pump(&mut self, sink: &mut dyn MeteringSink) -> Vec<GameEvent> {
        for jump in self.state.ledger.drain() {
            sink.record_jump(&jump);
        }
        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::SessionEnded(summary) = event {
                sink.settle(summary);
            }
        }
        events
    }
}
