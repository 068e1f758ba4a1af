//! Bet Selector — chosen denomination and reel geometry

use serde::{Deserialize, Serialize};

use reel_core::{Axis, ReelError, ReelResult};

use crate::config::{GeometryOptions, GridSpec};

/// Current bet denomination and grid shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetSelector {
    amounts: Vec<u64>,
    bet_index: usize,
    grid: GridSpec,
    options: GeometryOptions,
}

impl BetSelector {
    pub fn new(
        amounts: Vec<u64>,
        bet_index: usize,
        grid: GridSpec,
        options: GeometryOptions,
    ) -> ReelResult<Self> {
        if bet_index >= amounts.len() {
            return Err(ReelError::Config(format!(
                "bet index {} out of range for {} denominations",
                bet_index,
                amounts.len()
            )));
        }
        options.check(Axis::Columns, grid.columns)?;
        options.check(Axis::Rows, grid.rows)?;

        Ok(Self {
            amounts,
            bet_index,
            grid,
            options,
        })
    }

    pub fn current_bet(&self) -> u64 {
        self.amounts[self.bet_index]
    }

    pub fn bet_index(&self) -> usize {
        self.bet_index
    }

    /// Step up one denomination; stays put at the top
    pub fn increase_bet(&mut self) -> u64 {
        self.bet_index = (self.bet_index + 1).min(self.amounts.len() - 1);
        self.current_bet()
    }

    /// Step down one denomination; stays put at the bottom
    pub fn decrease_bet(&mut self) -> u64 {
        self.bet_index = self.bet_index.saturating_sub(1);
        self.current_bet()
    }

    /// Select an exact denomination
    pub fn set_bet(&mut self, amount: u64) -> ReelResult<u64> {
        let index = self
            .amounts
            .iter()
            .position(|&a| a == amount)
            .ok_or(ReelError::InvalidDenomination(amount))?;
        self.bet_index = index;
        Ok(amount)
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    pub fn columns(&self) -> usize {
        self.grid.columns
    }

    pub fn rows(&self) -> usize {
        self.grid.rows
    }

    pub fn options(&self) -> &GeometryOptions {
        &self.options
    }

    pub fn set_columns(&mut self, columns: usize) -> ReelResult<()> {
        self.options.check(Axis::Columns, columns)?;
        self.grid.columns = columns;
        Ok(())
    }

    pub fn set_rows(&mut self, rows: usize) -> ReelResult<()> {
        self.options.check(Axis::Rows, rows)?;
        self.grid.rows = rows;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> BetSelector {
        BetSelector::new(
            vec![5, 10, 25, 50, 100, 500, 1000],
            0,
            GridSpec::new(5, 5),
            GeometryOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_decrease_clamps_at_bottom() {
        let mut bets = selector();
        assert_eq!(bets.decrease_bet(), 5);
        assert_eq!(bets.bet_index(), 0);
    }

    #[test]
    fn test_increase_clamps_at_top() {
        let mut bets = selector();
        for _ in 0..20 {
            bets.increase_bet();
        }
        assert_eq!(bets.bet_index(), 6);
        assert_eq!(bets.current_bet(), 1000);

        assert_eq!(bets.decrease_bet(), 500);
    }

    #[test]
    fn test_set_bet() {
        let mut bets = selector();
        assert_eq!(bets.set_bet(100).unwrap(), 100);
        assert_eq!(bets.bet_index(), 4);

        assert!(matches!(
            bets.set_bet(42),
            Err(ReelError::InvalidDenomination(42))
        ));
        assert_eq!(bets.bet_index(), 4);
    }

    #[test]
    fn test_geometry_changes() {
        let mut bets = selector();
        bets.set_columns(3).unwrap();
        bets.set_rows(6).unwrap();
        assert_eq!(bets.grid(), GridSpec::new(3, 6));

        assert!(matches!(
            bets.set_columns(8),
            Err(ReelError::InvalidGeometry {
                axis: Axis::Columns,
                value: 8
            })
        ));
        assert!(bets.set_rows(2).is_err());
        assert_eq!(bets.grid(), GridSpec::new(3, 6));
    }

    #[test]
    fn test_new_rejects_bad_input() {
        let options = GeometryOptions::default();
        assert!(BetSelector::new(vec![5], 1, GridSpec::default(), options.clone()).is_err());
        assert!(BetSelector::new(vec![5], 0, GridSpec::new(2, 5), options).is_err());
    }
}
