//! Reel — one column's motion state

use serde::{Deserialize, Serialize};

/// Observable motion phase of a reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReelPhase {
    /// Scrolling
    Spinning,
    /// Told to stop, not yet snapped to the grid
    Settling,
    /// Snapped and at rest
    Stopped,
}

/// One reel's continuous scroll state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reel {
    /// Scroll offset in `[0, strip_length)`
    pub position: f64,
    pub spinning: bool,
    pub stopped: bool,
}

impl Reel {
    /// Fresh reel at rest at the top of the strip
    pub fn new() -> Self {
        Self::at(0.0)
    }

    pub fn at(position: f64) -> Self {
        Self {
            position,
            spinning: false,
            stopped: true,
        }
    }

    pub fn phase(&self) -> ReelPhase {
        match (self.spinning, self.stopped) {
            (true, _) => ReelPhase::Spinning,
            (false, false) => ReelPhase::Settling,
            (false, true) => ReelPhase::Stopped,
        }
    }

    pub fn start(&mut self) {
        self.spinning = true;
        self.stopped = false;
    }

    /// Timer fired: stop scrolling, leave the snap to the next frame
    pub fn command_stop(&mut self) {
        self.spinning = false;
    }

    /// Scroll upward by `distance`, wrapping within `strip_length`
    pub fn scroll(&mut self, distance: f64, strip_length: f64) {
        self.position = wrap(self.position - distance, strip_length);
    }

    /// Align to the nearest symbol boundary; idempotent
    pub fn snap(&mut self, symbol_height: f64, strip_length: f64) {
        let snapped = (self.position / symbol_height).round() * symbol_height;
        self.position = wrap(snapped, strip_length);
        self.stopped = true;
    }

    /// Per-frame update: scroll if spinning, otherwise snap
    pub fn update(&mut self, distance: f64, symbol_height: f64, strip_length: f64) {
        if self.spinning {
            self.scroll(distance, strip_length);
        } else {
            self.snap(symbol_height, strip_length);
        }
    }
}

impl Default for Reel {
    fn default() -> Self {
        Self::new()
    }
}

/// Euclidean wrap into `[0, length)`
#[inline]
fn wrap(value: f64, length: f64) -> f64 {
    let wrapped = value.rem_euclid(length);
    // rem_euclid can round up to `length` for tiny negative inputs
    if wrapped >= length { 0.0 } else { wrapped }
}
