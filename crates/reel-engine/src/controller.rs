//! Spin Controller — validates, debits, starts and stops one spin at a time
//!
//! All calls happen on one logical thread. Timer-driven stops (`poll`) and
//! frame-driven motion (`advance`) are separate steps; `tick` runs both in
//! that order, so a reel stopped by its timer is snapped in the same frame
//! or, if the host polls between frames, in the next one.

use serde::{Deserialize, Serialize};

use reel_core::{Millis, ReelError, ReelResult};
use reel_stage::{Control, Stage, StageBus, StageEvent, StagePayload, StageSink};
use reel_state::BalanceStore;

use crate::bet::BetSelector;
use crate::config::MachineConfig;
use crate::driver::AnimationDriver;
use crate::frame::{FrameSnapshot, ReelView, balance_text, bet_text};
use crate::reel::Reel;
use crate::session::{SpinPhase, SpinSession};
use crate::symbols::SymbolStrip;
use crate::timing::{StopSchedule, TimingConfig};
use crate::wallet::Wallet;

/// Result of a spin request that did not fail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpinOutcome {
    /// Bet debited, reels spinning
    Started(SpinReceipt),
    /// A session is already running; nothing was debited or touched
    AlreadySpinning,
}

impl SpinOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, SpinOutcome::Started(_))
    }
}

/// Details of an accepted spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinReceipt {
    pub spin_id: String,
    pub charged: u64,
    pub balance: u64,
    /// When the last reel is planned to stop
    pub finishes_at: Millis,
}

pub struct SpinController<S: BalanceStore> {
    wallet: Wallet<S>,
    bets: BetSelector,
    strip: SymbolStrip,
    driver: AnimationDriver,
    timing: TimingConfig,
    reels: Vec<Reel>,
    session: Option<SpinSession>,
    spin_count: u64,
    frame_count: u64,
    music_playing: bool,
    bus: StageBus,
}

impl<S: BalanceStore> SpinController<S> {
    pub fn new(config: &MachineConfig, store: S) -> ReelResult<Self> {
        config.validate()?;

        let strip = SymbolStrip::from_config(&config.strip)?;
        let driver = AnimationDriver::for_strip(&config.motion, &strip);
        let bets = BetSelector::new(
            config.wallet.denominations.clone(),
            config.wallet.default_bet_index,
            config.grid,
            config.geometry.clone(),
        )?;
        let wallet = Wallet::open(store, &config.wallet)?;

        log::info!(
            "Machine ready: {}x{} grid, {} symbols, balance {}",
            config.grid.columns,
            config.grid.rows,
            strip.len(),
            wallet.balance()
        );

        Ok(Self {
            wallet,
            bets,
            strip,
            driver,
            timing: config.timing.clone(),
            reels: vec![Reel::new(); config.grid.columns],
            session: None,
            spin_count: 0,
            frame_count: 0,
            music_playing: false,
            bus: StageBus::new(),
        })
    }

    /// Attach a stage sink (audio, recorder)
    pub fn attach_sink(&mut self, sink: impl StageSink + 'static) {
        self.bus.attach(sink);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn wallet(&self) -> &Wallet<S> {
        &self.wallet
    }

    pub fn bets(&self) -> &BetSelector {
        &self.bets
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn strip(&self) -> &SymbolStrip {
        &self.strip
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn session(&self) -> Option<&SpinSession> {
        self.session.as_ref()
    }

    /// Stop plan of the running session
    pub fn schedule(&self) -> Option<&StopSchedule> {
        self.session.as_ref().map(|s| s.schedule())
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn phase(&self) -> SpinPhase {
        self.session
            .as_ref()
            .map(|s| s.phase())
            .unwrap_or(SpinPhase::Idle)
    }

    pub fn spin_count(&self) -> u64 {
        self.spin_count
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Start a spin at `now`
    ///
    /// Debit happens immediately. On failure nothing changes: balance, bet
    /// and every reel are left exactly as they were.
    pub fn spin(&mut self, now: Millis) -> ReelResult<SpinOutcome> {
        self.press(Control::Spin, now);

        if self.session.is_some() {
            log::debug!("Spin ignored: session already running");
            return Ok(SpinOutcome::AlreadySpinning);
        }

        let bet = self.bets.current_bet();
        let balance = match self.wallet.charge_spin(bet) {
            Ok(balance) => balance,
            Err(e) => {
                log::warn!("Spin rejected: {}", e);
                let payload = StagePayload::new()
                    .balance(self.wallet.balance())
                    .bet_amount(bet);
                self.emit(
                    Stage::SpinRejected {
                        reason: e.kind().to_string(),
                    },
                    now,
                    payload,
                );
                return Err(e);
            }
        };

        self.spin_count += 1;
        let spin_id = format!("spin-{:06}", self.spin_count);
        let columns = self.reels.len();
        let schedule = StopSchedule::arm(now, columns, &self.timing);
        let finishes_at = schedule.finishes_at().unwrap_or(now);

        for reel in &mut self.reels {
            reel.start();
        }
        self.session = Some(SpinSession::new(spin_id.clone(), bet, now, schedule));

        log::info!(
            "{} started: bet {}, balance {}, {} reels stop by {:.0}ms",
            spin_id,
            bet,
            balance,
            columns,
            finishes_at.as_ms()
        );
        let payload = StagePayload::new()
            .balance(balance)
            .bet_amount(bet)
            .spin_id(spin_id.clone());
        self.emit(Stage::SpinStart { bet, balance }, now, payload);

        Ok(SpinOutcome::Started(SpinReceipt {
            spin_id,
            charged: bet,
            balance,
            finishes_at,
        }))
    }

    /// Fire every stop that is due at `now`, in reel order
    ///
    /// Returns the reels stopped by this call. Ends the session once the
    /// last reel has stopped.
    pub fn poll(&mut self, now: Millis) -> Vec<usize> {
        let mut stopped = Vec::new();
        let Some(session) = self.session.as_mut() else {
            return stopped;
        };

        while let Some(stop) = session.next_due(now) {
            if let Some(reel) = self.reels.get_mut(stop.reel_index) {
                reel.command_stop();
            }
            log::debug!(
                "{} reel {} stopped at {:.0}ms",
                session.spin_id,
                stop.reel_index,
                stop.fire_at.as_ms()
            );
            let payload = StagePayload::new().spin_id(session.spin_id.clone());
            self.bus.emit(StageEvent::with_payload(
                Stage::ReelStop {
                    reel_index: stop.reel_index,
                },
                stop.fire_at.as_ms(),
                payload,
            ));
            stopped.push(stop.reel_index);
        }

        if session.is_finished() {
            let ended_at = session
                .schedule()
                .finishes_at()
                .unwrap_or(now)
                .as_ms();
            if let Some(session) = self.session.take() {
                log::info!("{} finished", session.spin_id);
                let payload = StagePayload::new()
                    .balance(self.wallet.balance())
                    .spin_id(session.spin_id);
                self.bus.emit(StageEvent::with_payload(
                    Stage::SpinEnd {
                        charged: session.charged,
                    },
                    ended_at,
                    payload,
                ));
            }
        }

        stopped
    }

    /// Move every reel by one frame of `dt`
    pub fn advance(&mut self, dt: Millis) {
        self.driver.tick(&mut self.reels, dt);
        self.frame_count += 1;
    }

    /// One frame: fire due stops, then move reels
    pub fn tick(&mut self, now: Millis, dt: Millis) {
        self.poll(now);
        self.advance(dt);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BET & GEOMETRY
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn increase_bet(&mut self, now: Millis) -> ReelResult<u64> {
        self.press(Control::BetUp, now);
        self.ensure_idle()?;
        let before = self.bets.current_bet();
        let bet = self.bets.increase_bet();
        self.bet_changed(before, bet, now);
        Ok(bet)
    }

    pub fn decrease_bet(&mut self, now: Millis) -> ReelResult<u64> {
        self.press(Control::BetDown, now);
        self.ensure_idle()?;
        let before = self.bets.current_bet();
        let bet = self.bets.decrease_bet();
        self.bet_changed(before, bet, now);
        Ok(bet)
    }

    pub fn set_bet(&mut self, amount: u64, now: Millis) -> ReelResult<u64> {
        self.press(Control::BetSelect, now);
        self.ensure_idle()?;
        let before = self.bets.current_bet();
        let bet = self.bets.set_bet(amount)?;
        self.bet_changed(before, bet, now);
        Ok(bet)
    }

    /// Change the reel count; rebuilds the reel array
    pub fn set_columns(&mut self, columns: usize, now: Millis) -> ReelResult<()> {
        self.press(Control::Columns, now);
        self.ensure_idle()?;
        self.bets.set_columns(columns)?;

        if self.reels.len() != columns {
            log::info!("Rebuilding reels: {} -> {}", self.reels.len(), columns);
            self.reels = vec![Reel::new(); columns];
            self.geometry_changed(now);
        }
        Ok(())
    }

    pub fn set_rows(&mut self, rows: usize, now: Millis) -> ReelResult<()> {
        self.press(Control::Rows, now);
        self.ensure_idle()?;
        let before = self.bets.rows();
        self.bets.set_rows(rows)?;

        if before != rows {
            log::info!("Visible rows: {} -> {}", before, rows);
            self.geometry_changed(now);
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // AMBIENCE
    // ═══════════════════════════════════════════════════════════════════════════

    /// Cue the background loop; allowed during a spin. Returns false if
    /// it was already playing (no event is emitted).
    pub fn start_music(&mut self, now: Millis) -> bool {
        if self.music_playing {
            return false;
        }
        self.music_playing = true;
        self.bus.emit(StageEvent::new(Stage::MusicStart, now.as_ms()));
        true
    }

    /// Cue the background loop to stop; false if it was not playing
    pub fn stop_music(&mut self, now: Millis) -> bool {
        if !self.music_playing {
            return false;
        }
        self.music_playing = false;
        self.bus.emit(StageEvent::new(Stage::MusicStop, now.as_ms()));
        true
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // RENDERING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Drawable state of the machine
    pub fn snapshot(&self, now: Millis) -> FrameSnapshot {
        let rows = self.bets.rows();
        let reels = self
            .reels
            .iter()
            .enumerate()
            .map(|(index, reel)| ReelView {
                index,
                position: reel.position,
                spinning: reel.spinning,
                stopped: reel.stopped,
                motion_blur: !reel.stopped,
                slots: self.strip.layout(reel.position, rows),
                visible: self.strip.visible_symbols(reel.position, rows),
            })
            .collect();

        let balance = self.wallet.balance();
        let bet = self.bets.current_bet();
        FrameSnapshot {
            frame: self.frame_count,
            timestamp_ms: now.as_ms(),
            grid: self.bets.grid(),
            reels,
            symbol_names: self.strip.names(),
            symbol_height: self.strip.symbol_height(),
            balance,
            bet,
            balance_text: balance_text(balance),
            bet_text: bet_text(bet),
            active: self.is_active(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNAL
    // ═══════════════════════════════════════════════════════════════════════════

    fn ensure_idle(&self) -> ReelResult<()> {
        if self.session.is_some() {
            log::warn!("Request rejected: spin in progress");
            Err(ReelError::SessionBusy)
        } else {
            Ok(())
        }
    }

    fn press(&mut self, control: Control, now: Millis) {
        let stage = Stage::ButtonPress { control };
        self.bus.emit(StageEvent::new(stage, now.as_ms()));
    }

    fn bet_changed(&mut self, before: u64, bet: u64, now: Millis) {
        if before != bet {
            log::debug!("Bet {} -> {}", before, bet);
            self.emit(Stage::BetChange { bet }, now, StagePayload::new().bet_amount(bet));
        }
    }

    fn geometry_changed(&mut self, now: Millis) {
        let grid = self.bets.grid();
        self.emit(
            Stage::GeometryChange {
                columns: grid.columns,
                rows: grid.rows,
            },
            now,
            StagePayload::default(),
        );
    }

    fn emit(&mut self, stage: Stage, now: Millis, payload: StagePayload) {
        self.bus.emit(StageEvent::with_payload(stage, now.as_ms(), payload));
    }
}

impl<S: BalanceStore> std::fmt::Debug for SpinController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinController")
            .field("wallet", &self.wallet)
            .field("bets", &self.bets)
            .field("reels", &self.reels)
            .field("session", &self.session)
            .field("bus", &self.bus)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reel::ReelPhase;
    use reel_state::MemoryBalanceStore;

    fn controller(balance: u64) -> SpinController<MemoryBalanceStore> {
        SpinController::new(
            &MachineConfig::default(),
            MemoryBalanceStore::with_balance(balance),
        )
        .unwrap()
    }

    #[test]
    fn test_spin_debits_immediately() {
        let mut ctl = controller(50_000);
        ctl.set_bet(100, Millis::ZERO).unwrap();

        let outcome = ctl.spin(Millis::ZERO).unwrap();
        assert!(outcome.is_started());
        assert_eq!(ctl.wallet().balance(), 49_900);
        assert_eq!(ctl.wallet().store().stored(), Some(49_900));
        assert!(ctl.reels().iter().all(|r| r.phase() == ReelPhase::Spinning));
        assert_eq!(ctl.phase(), SpinPhase::Spinning);
    }

    #[test]
    fn test_insufficient_funds_touches_nothing() {
        let mut ctl = controller(50);
        ctl.set_bet(100, Millis::ZERO).unwrap();
        let before = ctl.reels().to_vec();

        let err = ctl.spin(Millis::ZERO).unwrap_err();
        assert!(matches!(
            err,
            ReelError::InsufficientFunds {
                requested: 100,
                balance: 50
            }
        ));
        assert_eq!(ctl.wallet().balance(), 50);
        assert_eq!(ctl.bets().current_bet(), 100);
        assert_eq!(ctl.reels(), before.as_slice());
        assert!(!ctl.is_active());
    }

    #[test]
    fn test_double_spin_debits_once() {
        let mut ctl = controller(1000);
        assert!(ctl.spin(Millis::ZERO).unwrap().is_started());
        assert_eq!(
            ctl.spin(Millis(10.0)).unwrap(),
            SpinOutcome::AlreadySpinning
        );
        assert_eq!(ctl.wallet().balance(), 995);
        assert_eq!(ctl.wallet().store().save_count(), 1);
    }

    #[test]
    fn test_busy_rejects_bet_and_geometry() {
        let mut ctl = controller(1000);
        ctl.spin(Millis::ZERO).unwrap();

        assert!(matches!(
            ctl.set_columns(3, Millis(1.0)),
            Err(ReelError::SessionBusy)
        ));
        assert!(matches!(
            ctl.set_rows(3, Millis(1.0)),
            Err(ReelError::SessionBusy)
        ));
        assert!(matches!(
            ctl.increase_bet(Millis(1.0)),
            Err(ReelError::SessionBusy)
        ));
        assert!(matches!(
            ctl.set_bet(10, Millis(1.0)),
            Err(ReelError::SessionBusy)
        ));
        assert_eq!(ctl.reels().len(), 5);
        assert_eq!(ctl.bets().current_bet(), 5);
    }

    #[test]
    fn test_poll_stops_in_order_and_ends_session() {
        let mut ctl = controller(1000);
        ctl.spin(Millis::ZERO).unwrap();

        assert!(ctl.poll(Millis(999.0)).is_empty());
        assert_eq!(ctl.poll(Millis(1000.0)), vec![0]);
        assert_eq!(ctl.phase(), SpinPhase::Stopping);
        assert_eq!(ctl.reels()[0].phase(), ReelPhase::Settling);
        assert_eq!(ctl.poll(Millis(1450.0)), vec![1, 2]);
        assert!(ctl.is_active());

        assert_eq!(ctl.poll(Millis(1800.0)), vec![3, 4]);
        assert!(!ctl.is_active());
        assert_eq!(ctl.phase(), SpinPhase::Idle);
    }

    #[test]
    fn test_set_columns_rebuilds_reels() {
        let mut ctl = controller(1000);
        ctl.set_columns(3, Millis::ZERO).unwrap();
        assert_eq!(ctl.reels().len(), 3);
        assert!(ctl.reels().iter().all(|r| r.phase() == ReelPhase::Stopped));

        assert!(matches!(
            ctl.set_columns(9, Millis::ZERO),
            Err(ReelError::InvalidGeometry { .. })
        ));
        assert_eq!(ctl.reels().len(), 3);
    }

    #[test]
    fn test_music_cues_are_idempotent() {
        let mut ctl = controller(1000);
        let trace = reel_stage::StageTrace::shared("music");
        ctl.attach_sink(trace.clone());

        assert!(ctl.start_music(Millis::ZERO));
        ctl.spin(Millis(1.0)).unwrap();
        assert!(!ctl.start_music(Millis(2.0)));
        assert!(ctl.is_music_playing());
        assert!(ctl.stop_music(Millis(3.0)));
        assert!(!ctl.stop_music(Millis(4.0)));

        let recorded = trace.snapshot();
        assert_eq!(recorded.events_by_type("music_start").len(), 1);
        assert_eq!(recorded.events_by_type("music_stop").len(), 1);
        assert_eq!(ctl.wallet().balance(), 995);
    }

    #[test]
    fn test_snapshot_strings() {
        let mut ctl = controller(50_000);
        ctl.set_bet(100, Millis::ZERO).unwrap();
        ctl.spin(Millis::ZERO).unwrap();

        let snap = ctl.snapshot(Millis(5.0));
        assert_eq!(snap.balance_text, "BALANCE: 49900");
        assert_eq!(snap.bet_text, "BET: 100");
        assert!(snap.active);
        assert_eq!(snap.reels.len(), 5);
        assert!(snap.reels.iter().all(|r| r.motion_blur));
        assert_eq!(snap.reels[0].slots.len(), 5 + 9);
    }
}
