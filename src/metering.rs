//! Metering/settlement collaborator interface
//!
//! The simulation only queues jump events and a terminal summary; whatever
//! sits behind this trait owns delivery, retries and settlement.

use crate::sim::{JumpEvent, SessionSummary};

pub trait MeteringSink {
    /// One counted jump, in sequence order
    fn record_jump(&mut self, event: &JumpEvent);
    /// Terminal summary, at most once per session
    fn settle(&mut self, summary: &SessionSummary);
}

/// In-memory sink that keeps everything it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingMeter {
    pub jumps: Vec<JumpEvent>,
    pub summaries: Vec<SessionSummary>,
}

impl MeteringSink for RecordingMeter {
    fn record_jump(&mut self, event: &JumpEvent) {
        self.jumps.push(event.clone());
    }

    fn settle(&mut self, summary: &SessionSummary) {
        log::info!(
            "Settling session: score {}, jumps {}",
            summary.final_score,
            summary.total_jumps
        );
        self.summaries.push(summary.clone());
    }
}
