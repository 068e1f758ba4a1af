//! Frame snapshots handed to the rendering surface

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::GridSpec;
use crate::symbols::SymbolSlot;

/// Drawable state of one reel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelView {
    pub index: usize,
    pub position: f64,
    pub spinning: bool,
    pub stopped: bool,
    /// Reels blur until they are snapped
    pub motion_blur: bool,
    pub slots: Vec<SymbolSlot>,
    /// Symbol indices in the visible rows, top to bottom
    pub visible: Vec<usize>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub timestamp_ms: f64,
    pub grid: GridSpec,
    pub reels: Vec<ReelView>,
    pub symbol_names: Arc<[String]>,
    pub symbol_height: f64,
    pub balance: u64,
    pub bet: u64,
    pub balance_text: String,
    pub bet_text: String,
    pub active: bool,
}

impl FrameSnapshot {
    pub fn symbol_name(&self, symbol: usize) -> &str {
        &self.symbol_names[symbol % self.symbol_names.len()]
    }

    /// Visible symbol names as rows × columns
    pub fn visible_rows(&self) -> Vec<Vec<&str>> {
        (0..self.grid.rows)
            .map(|row| {
                self.reels
                    .iter()
                    .map(|reel| {
                        reel.visible
                            .get(row)
                            .map(|&s| self.symbol_name(s))
                            .unwrap_or("")
                    })
                    .collect()
            })
            .collect()
    }
}

/// External drawing surface; called once per frame
pub trait RenderSurface {
    fn draw(&mut self, frame: &FrameSnapshot);
}

impl<F> RenderSurface for F
where
    F: FnMut(&FrameSnapshot),
{
    fn draw(&mut self, frame: &FrameSnapshot) {
        self(frame)
    }
}

pub fn balance_text(balance: u64) -> String {
    format!("BALANCE: {}", balance)
}

pub fn bet_text(bet: u64) -> String {
    format!("BET: {}", bet)
}
