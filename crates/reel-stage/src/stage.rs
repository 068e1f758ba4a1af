//! Stage — The enum defining every announced moment of play
//!
//! A Stage is NOT an animation frame.
//! A Stage is the SEMANTIC MEANING of a moment in the game flow.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A player-facing control that can be activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Spin,
    BetUp,
    BetDown,
    BetSelect,
    Columns,
    Rows,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Control::Spin => "spin",
            Control::BetUp => "bet_up",
            Control::BetDown => "bet_down",
            Control::BetSelect => "bet_select",
            Control::Columns => "columns",
            Control::Rows => "rows",
        };
        f.write_str(name)
    }
}

/// Announced game stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Stage {
    // ═══════════════════════════════════════════════════════════════════════
    // SPIN LIFECYCLE
    // ═══════════════════════════════════════════════════════════════════════
    /// Spin accepted and bet debited; all reels now spinning
    SpinStart {
        /// Amount charged for this session
        bet: u64,
        /// Balance after the debit
        balance: u64,
    },

    /// Reel was commanded to stop (its timer fired)
    ReelStop {
        /// Which reel stopped (0-indexed)
        reel_index: usize,
    },

    /// Last reel stopped, machine is idle again
    SpinEnd {
        /// Amount charged for the finished session
        charged: u64,
    },

    /// Spin request refused before anything moved
    SpinRejected {
        /// Machine-readable reason (error kind)
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // UI
    // ═══════════════════════════════════════════════════════════════════════
    /// A control was activated (fires whether or not the request succeeds)
    ButtonPress { control: Control },

    /// Bet denomination changed
    BetChange { bet: u64 },

    /// Reel grid reshaped
    GeometryChange { columns: usize, rows: usize },

    // ═══════════════════════════════════════════════════════════════════════
    // AMBIENCE
    // ═══════════════════════════════════════════════════════════════════════
    /// Looping background music should play from the start
    MusicStart,

    /// Background music should stop and rewind
    MusicStop,
}

/// Grouping used by observers to filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageCategory {
    SpinLifecycle,
    UI,
    Ambience,
}

impl Stage {
    /// Get the stage category for grouping
    pub fn category(&self) -> StageCategory {
        match self {
            Stage::SpinStart { .. }
            | Stage::ReelStop { .. }
            | Stage::SpinEnd { .. }
            | Stage::SpinRejected { .. } => StageCategory::SpinLifecycle,

            Stage::ButtonPress { .. } | Stage::BetChange { .. } | Stage::GeometryChange { .. } => {
                StageCategory::UI
            }

            Stage::MusicStart | Stage::MusicStop => StageCategory::Ambience,
        }
    }

    /// Get a simple string name for this stage type
    pub fn type_name(&self) -> &'static str {
        match self {
            Stage::SpinStart { .. } => "spin_start",
            Stage::ReelStop { .. } => "reel_stop",
            Stage::SpinEnd { .. } => "spin_end",
            Stage::SpinRejected { .. } => "spin_rejected",
            Stage::ButtonPress { .. } => "button_press",
            Stage::BetChange { .. } => "bet_change",
            Stage::GeometryChange { .. } => "geometry_change",
            Stage::MusicStart => "music_start",
            Stage::MusicStop => "music_stop",
        }
    }

    /// Reel index if this is a per-reel stage
    pub fn reel_index(&self) -> Option<usize> {
        match self {
            Stage::ReelStop { reel_index } => Some(*reel_index),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ReelStop { reel_index } => write!(f, "reel_stop[{}]", reel_index),
            Stage::ButtonPress { control } => write!(f, "button_press[{}]", control),
            other => f.write_str(other.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            Stage::ReelStop { reel_index: 2 }.category(),
            StageCategory::SpinLifecycle
        );
        assert_eq!(
            Stage::ButtonPress {
                control: Control::Spin
            }
            .category(),
            StageCategory::UI
        );
        assert_eq!(Stage::MusicStop.category(), StageCategory::Ambience);
    }

    #[test]
    fn test_display() {
        assert_eq!(Stage::ReelStop { reel_index: 3 }.to_string(), "reel_stop[3]");
        assert_eq!(
            Stage::ButtonPress {
                control: Control::BetDown
            }
            .to_string(),
            "button_press[bet_down]"
        );
        assert_eq!(Stage::SpinEnd { charged: 5 }.to_string(), "spin_end");
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&Stage::ReelStop { reel_index: 1 }).unwrap();
        assert_eq!(json, r#"{"type":"reel_stop","reel_index":1}"#);

        let back: Stage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.reel_index(), Some(1));

        let json = serde_json::to_string(&Stage::MusicStart).unwrap();
        assert_eq!(json, r#"{"type":"music_start"}"#);
    }
}
