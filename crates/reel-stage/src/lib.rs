//! # reel-stage — ReelSpin Stage Events
//!
//! Defines the discrete moments of play that the engine announces to
//! fire-and-forget collaborators (audio, analytics, recorders).
//!
//! ## Philosophy
//!
//! Observers never read engine state directly; they react to STAGES:
//! - Button pressed → Spin starts → Reels stop one by one → Spin ends
//!
//! A sink cannot fail back into the engine: `StageSink::on_stage` returns
//! nothing, so a broken sound device never changes a balance or a reel.

pub mod bus;
pub mod event;
pub mod stage;
pub mod trace;

pub use bus::*;
pub use event::*;
pub use stage::*;
pub use trace::*;
