//! reel-core: Shared types for ReelSpin
//!
//! This crate provides the error type and time primitives used across all
//! ReelSpin crates.

mod error;
mod time;

pub use error::*;
pub use time::*;
