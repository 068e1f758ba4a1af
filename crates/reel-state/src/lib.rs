//! reel-state: Persistence for the player's balance
//!
//! The balance is the only value that outlives a process. Everything else
//! (bet index, geometry, reel positions) is session state.

mod balance;

pub use balance::*;
