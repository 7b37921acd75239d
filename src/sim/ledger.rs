//! Jump accounting
//!
//! Turns landings into de-duplicated jump events. A platform identity counts
//! once per session no matter how often it is landed on. Counted events wait
//! in a queue until the metering collaborator drains them; delivery beyond
//! that is the collaborator's business.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::entity::{Platform, PlatformId, PlatformKind};

/// One counted jump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpEvent {
    /// 1-based position in this session's jump sequence
    pub sequence: u64,
    pub platform: PlatformId,
    pub kind: PlatformKind,
    pub level: u32,
    /// Session time of the landing (seconds)
    pub at_secs: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JumpLedger {
    pending: VecDeque<JumpEvent>,
    total: u64,
}

impl JumpLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a landing. Returns the new event on a first landing, `None` on
    /// a repeat landing on an already visited platform.
    pub fn record_landing(
        &mut self,
        visited: &mut HashSet<PlatformId>,
        platform: &Platform,
        level: u32,
        at_secs: f64,
    ) -> Option<&JumpEvent> {
        if !visited.insert(platform.id) {
            log::trace!("Repeat landing on {:?}, not counted", platform.id);
            return None;
        }
        self.total += 1;
        self.pending.push_back(JumpEvent {
            sequence: self.total,
            platform: platform.id,
            kind: platform.kind,
            level,
            at_secs,
        });
        self.pending.back()
    }

    /// Jumps counted this session, drained or not
    #[inline]
    pub fn total_jumps(&self) -> u64 {
        self.total
    }

    /// Events not yet handed to the metering collaborator
    pub fn pending(&self) -> impl Iterator<Item = &JumpEvent> {
        self.pending.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Hand all pending events over, oldest first
    pub fn drain(&mut self) -> Vec<JumpEvent> {
        self.pending.drain(..).collect()
    }

    /// Session reset: forget everything, including the running total
    pub fn clear(&mut self) {
        self.pending.clear();
        self.total = 0;
    }
}
