//! Spin session — the lifetime of one spin, from debit to final reel stop

use serde::{Deserialize, Serialize};

use reel_core::Millis;

use crate::timing::{ScheduledStop, StopSchedule};

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpinPhase {
    Idle,
    /// Every reel spinning, no stop fired yet
    Spinning,
    /// At least one reel stopped
    Stopping,
}

/// State owned by the controller for one accepted spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinSession {
    pub spin_id: String,
    /// Debited amount, fixed for the session
    pub charged: u64,
    pub started_at: Millis,
    schedule: StopSchedule,
}

impl SpinSession {
    pub fn new(spin_id: String, charged: u64, started_at: Millis, schedule: StopSchedule) -> Self {
        Self {
            spin_id,
            charged,
            started_at,
            schedule,
        }
    }

    pub fn schedule(&self) -> &StopSchedule {
        &self.schedule
    }

    pub fn stopped_reels(&self) -> usize {
        self.schedule.fired()
    }

    pub fn phase(&self) -> SpinPhase {
        if self.schedule.fired() == 0 {
            SpinPhase::Spinning
        } else {
            SpinPhase::Stopping
        }
    }

    /// Release the next due stop, in reel order
    pub fn next_due(&mut self, now: Millis) -> Option<ScheduledStop> {
        self.schedule.pop_due(now)
    }

    /// All reels stopped
    pub fn is_finished(&self) -> bool {
        self.schedule.is_complete()
    }
}
