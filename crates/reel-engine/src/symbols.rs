//! Symbol strip and the derived slot layout

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use reel_core::{ReelError, ReelResult};

use crate::config::StripConfig;

/// One laid-out symbol on a reel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbolSlot {
    /// Visual index `k`
    pub slot: usize,
    /// Vertical offset within the strip, in `[0, strip_length)`
    pub y: f64,
    /// Index into the strip's symbol list (`k mod N`)
    pub symbol: usize,
}

/// The repeating symbol sequence shown on every reel
#[derive(Debug, Clone)]
pub struct SymbolStrip {
    symbols: Arc<[String]>,
    symbol_height: f64,
    margin_rows: usize,
}

impl SymbolStrip {
    pub fn new(symbols: Vec<String>, symbol_height: f64) -> ReelResult<Self> {
        if symbols.is_empty() {
            return Err(ReelError::Config("symbol strip is empty".into()));
        }
        if !(symbol_height > 0.0) {
            return Err(ReelError::Config("symbol_height must be positive".into()));
        }
        let margin_rows = symbols.len();
        Ok(Self {
            symbols: symbols.into(),
            symbol_height,
            margin_rows,
        })
    }

    pub fn from_config(config: &StripConfig) -> ReelResult<Self> {
        let strip = Self::new(config.symbols.clone(), config.symbol_height)?;
        Ok(match config.margin_rows {
            Some(margin) => strip.with_margin_rows(margin),
            None => strip,
        })
    }

    /// Builder: set the number of slots laid out beyond the visible rows
    pub fn with_margin_rows(mut self, margin_rows: usize) -> Self {
        self.margin_rows = margin_rows;
        self
    }

    /// Number of symbols `N`
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol_height(&self) -> f64 {
        self.symbol_height
    }

    /// `N * symbol_height`
    pub fn strip_length(&self) -> f64 {
        self.symbols.len() as f64 * self.symbol_height
    }

    pub fn names(&self) -> Arc<[String]> {
        Arc::clone(&self.symbols)
    }

    /// Name of a symbol index (wraps around)
    pub fn name(&self, symbol: usize) -> &str {
        &self.symbols[symbol % self.symbols.len()]
    }

    /// Slots laid out for a reel showing `rows` visible rows
    pub fn slot_count(&self, rows: usize) -> usize {
        rows + self.margin_rows
    }

    /// Vertical offset of slot `k` for a reel at `position`
    ///
    /// Double modulo keeps the result in `[0, strip_length)` whatever the
    /// sign of the intermediate value.
    pub fn slot_y(&self, slot: usize, position: f64) -> f64 {
        let length = self.strip_length();
        let y = ((slot as f64 * self.symbol_height - position) % length + length) % length;
        if y >= length { 0.0 } else { y }
    }

    /// Full slot layout for one reel
    pub fn layout(&self, position: f64, rows: usize) -> Vec<SymbolSlot> {
        (0..self.slot_count(rows))
            .map(|slot| SymbolSlot {
                slot,
                y: self.slot_y(slot, position),
                symbol: slot % self.symbols.len(),
            })
            .collect()
    }

    /// Symbols occupying the visible rows, top to bottom, for a reel at rest
    pub fn visible_symbols(&self, position: f64, rows: usize) -> Vec<usize> {
        let offset = (position / self.symbol_height).round() as i64;
        let n = self.symbols.len() as i64;
        (0..rows as i64)
            .map(|row| (row + offset).rem_euclid(n) as usize)
            .collect()
    }
}
