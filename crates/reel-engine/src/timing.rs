//! Timing profiles and the staggered stop schedule

use serde::{Deserialize, Serialize};

use reel_core::Millis;

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimingProfile {
    /// Normal gameplay timing
    Normal,
    /// Long, showy spins
    Relaxed,
    /// Fast/Turbo mode
    Turbo,
    /// Hand-tuned duration
    Custom,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::Normal
    }
}

/// Spin timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Dead period where every reel spins before the first stop (ms).
    /// The same duration is then spread across the stops: one reel every
    /// `spin_duration_ms / columns`.
    pub spin_duration_ms: f64,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            spin_duration_ms: 1000.0,
        }
    }

    /// Relaxed timing
    pub fn relaxed() -> Self {
        Self {
            profile: TimingProfile::Relaxed,
            spin_duration_ms: 3000.0,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            spin_duration_ms: 400.0,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Relaxed => Self::relaxed(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            profile: TimingProfile::Custom,
            spin_duration_ms: self.spin_duration_ms * factor,
        }
    }

    pub fn spin_duration(&self) -> Millis {
        Millis(self.spin_duration_ms)
    }

    /// Delay between consecutive reel stops
    pub fn stop_interval(&self, columns: usize) -> Millis {
        Millis(self.spin_duration_ms / columns.max(1) as f64)
    }

    /// Time from spin start until the last reel stops
    pub fn total_spin_duration(&self, columns: usize) -> Millis {
        self.spin_duration() + self.stop_interval(columns) * (columns.max(1) - 1) as f64
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// One planned reel stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledStop {
    pub reel_index: usize,
    pub fire_at: Millis,
}

/// Stop plan for one session, computed once when the spin starts
///
/// Entries fire strictly in reel order: entry `i + 1` is only released
/// after entry `i` has fired, even if both are due in the same poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopSchedule {
    entries: Vec<ScheduledStop>,
    cursor: usize,
}

impl StopSchedule {
    /// Plan stops for `columns` reels of a spin that started at `start`
    pub fn arm(start: Millis, columns: usize, timing: &TimingConfig) -> Self {
        let first = start + timing.spin_duration();
        let interval = timing.stop_interval(columns);
        let entries = (0..columns)
            .map(|reel_index| ScheduledStop {
                reel_index,
                fire_at: first + interval * reel_index as f64,
            })
            .collect();

        Self { entries, cursor: 0 }
    }

    pub fn entries(&self) -> &[ScheduledStop] {
        &self.entries
    }

    /// Number of stops already fired
    pub fn fired(&self) -> usize {
        self.cursor
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// Next stop that has not fired yet
    pub fn peek(&self) -> Option<&ScheduledStop> {
        self.entries.get(self.cursor)
    }

    /// Release the next stop if it is due at `now`
    pub fn pop_due(&mut self, now: Millis) -> Option<ScheduledStop> {
        let next = *self.entries.get(self.cursor)?;
        if next.fire_at <= now {
            self.cursor += 1;
            Some(next)
        } else {
            None
        }
    }

    /// When the final reel is planned to stop
    pub fn finishes_at(&self) -> Option<Millis> {
        self.entries.last().map(|e| e.fire_at)
    }
}
