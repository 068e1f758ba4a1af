//! # reel-engine — Reel-Spin Engine
//!
//! Wallet, bet selection, reel motion and the staggered stop schedule of a
//! classic video slot. Outcome evaluation is not part of this crate: a spin
//! debits the bet and animates the reels, nothing more.
//!
//! ## Features
//!
//! - **Wallet**: Persisted balance, immediate debit, fixed denominations
//! - **Bet Selector**: Clamped bet index, runtime grid geometry
//! - **Reels**: Continuous scroll over a wrapping strip, snap on stop
//! - **Stop Schedule**: Reel `i` stops at `D + i * D / columns`
//! - **Stages**: Spin lifecycle events for audio and trace recording
//!
//! ## Architecture
//!
//! ```text
//! SlotMachine<S, C: Clock>
//!     │
//!     └── SpinController<S: BalanceStore>
//!             │
//!             ├── Wallet ──────────► BalanceStore (json / memory)
//!             ├── BetSelector (denominations, GridSpec)
//!             ├── SpinSession ─────► StopSchedule
//!             ├── AnimationDriver ─► Vec<Reel>
//!             └── StageBus ────────► StageSink (log, trace, audio)
//!                     │
//!                     v
//!             FrameSnapshot ─────► RenderSurface
//! ```

pub mod bet;
pub mod config;
pub mod controller;
pub mod driver;
pub mod frame;
pub mod machine;
pub mod reel;
pub mod session;
pub mod symbols;
pub mod timing;
pub mod wallet;

pub use bet::*;
pub use config::*;
pub use controller::*;
pub use driver::*;
pub use frame::*;
pub use machine::*;
pub use reel::*;
pub use session::*;
pub use symbols::*;
pub use timing::*;
pub use wallet::*;
