//! SlotMachine — controller bound to a clock
//!
//! Hosts call `frame()` once per display refresh and forward input through
//! the trigger methods. Time comes from the clock, never from the caller.

use reel_core::{Clock, Millis, ReelResult};
use reel_stage::StageSink;
use reel_state::BalanceStore;

use crate::config::MachineConfig;
use crate::controller::{SpinController, SpinOutcome};
use crate::frame::{FrameSnapshot, RenderSurface};

pub struct SlotMachine<S: BalanceStore, C: Clock> {
    controller: SpinController<S>,
    clock: C,
    last_frame: Option<Millis>,
}

impl<S: BalanceStore, C: Clock> SlotMachine<S, C> {
    pub fn new(config: &MachineConfig, store: S, clock: C) -> ReelResult<Self> {
        Ok(Self {
            controller: SpinController::new(config, store)?,
            clock,
            last_frame: None,
        })
    }

    pub fn controller(&self) -> &SpinController<S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SpinController<S> {
        &mut self.controller
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    pub fn attach_sink(&mut self, sink: impl StageSink + 'static) {
        self.controller.attach_sink(sink);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TRIGGERS
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn spin(&mut self) -> ReelResult<SpinOutcome> {
        let now = self.clock.now();
        self.controller.spin(now)
    }

    pub fn increase_bet(&mut self) -> ReelResult<u64> {
        let now = self.clock.now();
        self.controller.increase_bet(now)
    }

    pub fn decrease_bet(&mut self) -> ReelResult<u64> {
        let now = self.clock.now();
        self.controller.decrease_bet(now)
    }

    pub fn set_bet(&mut self, amount: u64) -> ReelResult<u64> {
        let now = self.clock.now();
        self.controller.set_bet(amount, now)
    }

    pub fn set_columns(&mut self, columns: usize) -> ReelResult<()> {
        let now = self.clock.now();
        self.controller.set_columns(columns, now)
    }

    pub fn set_rows(&mut self, rows: usize) -> ReelResult<()> {
        let now = self.clock.now();
        self.controller.set_rows(rows, now)
    }

    pub fn start_music(&mut self) -> bool {
        let now = self.clock.now();
        self.controller.start_music(now)
    }

    pub fn stop_music(&mut self) -> bool {
        let now = self.clock.now();
        self.controller.stop_music(now)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // FRAMES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Advance one frame to the clock's current time
    ///
    /// The first frame has no predecessor and moves nothing.
    pub fn frame(&mut self) -> FrameSnapshot {
        let now = self.clock.now();
        let dt = self
            .last_frame
            .map(|last| now.since(last))
            .unwrap_or(Millis::ZERO);
        self.last_frame = Some(now);

        self.controller.tick(now, dt);
        self.controller.snapshot(now)
    }

    /// `frame()` and hand the result to a surface
    pub fn render(&mut self, surface: &mut impl RenderSurface) -> FrameSnapshot {
        let snapshot = self.frame();
        surface.draw(&snapshot);
        snapshot
    }
}

impl<S: BalanceStore, C: Clock> std::fmt::Debug for SlotMachine<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotMachine")
            .field("controller", &self.controller)
            .field("last_frame", &self.last_frame)
            .finish()
    }
}
