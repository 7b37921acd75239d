//! Lifecycle state machine
//!
//! Loading → AwaitingStart → Running ⇄ Paused → GameOver, with reset
//! returning to AwaitingStart. Invalid requests are rejected without touching
//! the state.

use thiserror::Error;

use super::generate::seed_session;
use super::state::{DeathCause, GameEvent, GamePhase, GameState, ReviveOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition {
        phase: GamePhase,
        action: &'static str,
    },
}

impl GameState {
    fn reject(&self, action: &'static str) -> LifecycleError {
        log::warn!("Rejected lifecycle request `{}` in phase {:?}", action, self.phase);
        LifecycleError::InvalidTransition {
            phase: self.phase,
            action,
        }
    }

    /// Loading → AwaitingStart
    pub fn finish_loading(&mut self) -> Result<(), LifecycleError> {
        if self.phase != GamePhase::Loading {
            return Err(self.reject("finish loading"));
        }
        self.phase = GamePhase::AwaitingStart;
        log::info!("Loading finished, awaiting start");
        Ok(())
    }

    /// AwaitingStart → Running with a freshly built world
    pub fn start(&mut self) -> Result<(), LifecycleError> {
        if self.phase != GamePhase::AwaitingStart {
            return Err(self.reject("start"));
        }
        self.clear_session();
        let report = seed_session(self);
        self.phase = GamePhase::Running;
        log::info!(
            "Session {} started (seed {}), {} platforms",
            self.session,
            self.session_seed(),
            report.platforms + report.breakables
        );
        self.push_event(GameEvent::SessionStarted {
            session: self.session,
        });
        Ok(())
    }

    /// Running → Paused (revive negotiation); freezes every tick
    pub fn pause(&mut self) -> Result<(), LifecycleError> {
        if self.phase != GamePhase::Running {
            return Err(self.reject("pause"));
        }
        self.phase = GamePhase::Paused;
        log::info!("Paused at tick {}", self.time_ticks);
        Ok(())
    }

    /// Paused → Running (granted, with a lift and upward boost) or
    /// Paused → GameOver (denied)
    pub fn resume(&mut self, outcome: ReviveOutcome) -> Result<(), LifecycleError> {
        if self.phase != GamePhase::Paused {
            return Err(self.reject("resume"));
        }
        match outcome {
            ReviveOutcome::Granted => {
                let revive = &self.tuning.revive;
                self.protagonist.pos.y -= revive.lift;
                self.protagonist.vel.y = revive.boost;
                self.revives_used += 1;
                self.death_cause = None;
                self.phase = GamePhase::Running;
                self.push_event(GameEvent::Revived);
                log::info!("Revive granted ({} used)", self.revives_used);
            }
            ReviveOutcome::Denied => {
                log::info!("Revive denied");
                self.enter_game_over();
            }
        }
        Ok(())
    }

    /// Abandon or finish the session and return to AwaitingStart. Clears all
    /// entities, counters and the ledger before the next tick can run.
    pub fn reset(&mut self) -> Result<(), LifecycleError> {
        match self.phase {
            GamePhase::Running | GamePhase::Paused | GamePhase::GameOver => {}
            _ => return Err(self.reject("reset")),
        }
        self.clear_session();
        self.session += 1;
        self.phase = GamePhase::AwaitingStart;
        log::info!("Reset, next session {}", self.session);
        Ok(())
    }

    /// Fatal event while running: offer a revive if allowed, else end the session
    pub(crate) fn handle_death(&mut self, cause: DeathCause) {
        self.death_cause = Some(cause);
        let revive = &self.tuning.revive;
        if revive.offer_on_death && self.revives_used < revive.max_revives {
            self.phase = GamePhase::Paused;
            self.push_event(GameEvent::ReviveOffered { cause });
            log::info!("Death by {:?}, revive offered", cause);
        } else {
            self.enter_game_over();
        }
    }

    /// Transition into GameOver, emitting the summary only the first time
    pub(crate) fn enter_game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        if self.summary_emitted {
            return;
        }
        self.summary_emitted = true;
        let summary = self.summary();
        log::info!(
            "Game over: score {}, jumps {}, level {}",
            summary.final_score,
            summary.total_jumps,
            summary.level
        );
        self.push_event(GameEvent::SessionEnded(summary));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> GameState {
        let mut state = GameState::new(21);
        state.finish_loading().unwrap();
        state.start().unwrap();
        state
    }

    #[test]
    fn test_happy_path() {
        let mut state = GameState::new(21);
        assert_eq!(state.phase, GamePhase::Loading);
        state.finish_loading().unwrap();
        assert_eq!(state.phase, GamePhase::AwaitingStart);
        state.start().unwrap();
        assert_eq!(state.phase, GamePhase::Running);
        assert!(!state.platforms.is_empty());
    }

    #[test]
    fn test_resume_without_pause_is_rejected() {
        let mut state = running();
        let before_y = state.protagonist.pos.y;
        let err = state.resume(ReviveOutcome::Granted).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                phase: GamePhase::Running,
                action: "resume"
            }
        );
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.protagonist.pos.y, before_y);
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut state = running();
        assert!(state.start().is_err());
    }

    #[test]
    fn test_denied_revive_ends_session() {
        let mut state = running();
        state.pause().unwrap();
        state.resume(ReviveOutcome::Denied).unwrap();
        assert_eq!(state.phase, GamePhase::GameOver);
        let ended = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::SessionEnded(_)))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_game_over_emits_once() {
        let mut state = running();
        state.enter_game_over();
        state.enter_game_over();
        let ended = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::SessionEnded(_)))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_reset_clears_session() {
        let mut state = running();
        state.bonus_score = 100;
        state.protagonist.visited.insert(state.platforms[0].id);
        state.enter_game_over();
        state.reset().unwrap();

        assert_eq!(state.phase, GamePhase::AwaitingStart);
        assert!(state.platforms.is_empty());
        assert!(state.enemies.is_empty());
        assert!(state.protagonist.visited.is_empty());
        assert_eq!(state.ledger.total_jumps(), 0);
        assert_eq!(state.score(), 0);

        state.start().unwrap();
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_revive_offer_limit() {
        let mut state = running();
        state.tuning.revive.offer_on_death = true;
        state.tuning.revive.max_revives = 1;

        state.handle_death(DeathCause::Fall);
        assert_eq!(state.phase, GamePhase::Paused);
        state.resume(ReviveOutcome::Granted).unwrap();
        assert_eq!(state.phase, GamePhase::Running);

        state.handle_death(DeathCause::Fall);
        assert_eq!(state.phase, GamePhase::GameOver);
    }
}
