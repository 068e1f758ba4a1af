//! End-to-End Spin Session Tests
//!
//! Drives a full machine on a manual clock:
//! - Debit and rejection
//! - Staggered stop order
//! - Busy guards
//! - Balance persistence

use approx::assert_relative_eq;

use reel_core::{ManualClock, Millis, ReelError};
use reel_engine::{MachineConfig, ReelPhase, SlotMachine, SpinOutcome, SpinPhase};
use reel_stage::{Control, Stage, StageTrace};
use reel_state::{JsonBalanceStore, MemoryBalanceStore};

const FRAME_MS: f64 = 1000.0 / 60.0;
const MAX_FRAMES: usize = 10_000;

fn machine(balance: u64) -> SlotMachine<MemoryBalanceStore, ManualClock> {
    SlotMachine::new(
        &MachineConfig::default(),
        MemoryBalanceStore::with_balance(balance),
        ManualClock::new(),
    )
    .unwrap()
}

/// Step frames at 60 Hz until the session ends; returns frames stepped
fn run_until_idle<S: reel_state::BalanceStore>(m: &mut SlotMachine<S, ManualClock>) -> usize {
    m.frame();
    for n in 1..MAX_FRAMES {
        m.clock_mut().advance(Millis(FRAME_MS));
        m.frame();
        if !m.controller().is_active() {
            return n;
        }
    }
    panic!("session never finished");
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEBIT
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_spin_debits_before_any_reel_stops() {
    let mut m = machine(50_000);
    m.set_bet(100).unwrap();

    let outcome = m.spin().unwrap();
    let SpinOutcome::Started(receipt) = outcome else {
        panic!("spin should start");
    };
    assert_eq!(receipt.charged, 100);
    assert_eq!(receipt.balance, 49_900);
    assert_eq!(m.controller().wallet().balance(), 49_900);
    assert!(
        m.controller()
            .reels()
            .iter()
            .all(|r| r.phase() == ReelPhase::Spinning)
    );
    assert_eq!(m.frame().balance_text, "BALANCE: 49900");
}

#[test]
fn test_insufficient_funds_leaves_reels_idle() {
    let mut m = machine(50);
    m.set_bet(100).unwrap();
    let trace = StageTrace::shared("rejected");
    m.attach_sink(trace.clone());

    let err = m.spin().unwrap_err();
    assert!(matches!(err, ReelError::InsufficientFunds { .. }));
    assert_eq!(m.controller().wallet().balance(), 50);
    assert_eq!(m.controller().bets().current_bet(), 100);
    assert!(!m.controller().is_active());
    assert!(
        m.controller()
            .reels()
            .iter()
            .all(|r| r.phase() == ReelPhase::Stopped && r.position == 0.0)
    );

    let recorded = trace.snapshot();
    assert_eq!(recorded.spin_count(), 0);
    assert!(recorded.has_stage("spin_rejected"));
    assert!(recorded.has_stage("button_press"));
}

#[test]
fn test_exact_balance_can_spin_to_zero() {
    let mut m = machine(100);
    m.set_bet(100).unwrap();
    assert!(m.spin().unwrap().is_started());
    assert_eq!(m.controller().wallet().balance(), 0);

    run_until_idle(&mut m);
    assert!(matches!(
        m.spin(),
        Err(ReelError::InsufficientFunds {
            requested: 100,
            balance: 0
        })
    ));
}

#[test]
fn test_second_spin_while_active_is_ignored() {
    let mut m = machine(1000);
    m.spin().unwrap();
    m.clock_mut().advance(Millis(300.0));

    assert_eq!(m.spin().unwrap(), SpinOutcome::AlreadySpinning);
    assert_eq!(m.controller().wallet().balance(), 995);
    assert_eq!(m.controller().spin_count(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════════
// STOP SCHEDULE
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_reels_stop_left_to_right_then_idle() {
    let mut m = machine(1000);
    let trace = StageTrace::shared("order");
    m.attach_sink(trace.clone());

    m.spin().unwrap();
    let frames = run_until_idle(&mut m);

    // Last stop at 1000 + 4 * 200 ms
    let elapsed = frames as f64 * FRAME_MS;
    assert!(elapsed >= 1800.0 - 1e-6);
    assert!(elapsed < 1800.0 + FRAME_MS + 1e-6);

    let recorded = trace.snapshot();
    assert_eq!(recorded.reel_stop_order(), vec![0, 1, 2, 3, 4]);
    let validation = recorded.validate();
    assert!(validation.is_valid(), "{:?}", validation.warnings());
    assert_eq!(validation.completed, 1);
    assert!(!validation.unfinished);

    let end = recorded.events_by_type("spin_end");
    assert_eq!(end.len(), 1);
    assert_eq!(end[0].stage, Stage::SpinEnd { charged: 5 });
}

#[test]
fn test_stop_timestamps_follow_schedule() {
    let mut m = machine(1000);
    m.set_columns(4).unwrap();
    let trace = StageTrace::shared("timestamps");
    m.attach_sink(trace.clone());

    m.spin().unwrap();
    run_until_idle(&mut m);

    let stops: Vec<f64> = trace
        .snapshot()
        .events_by_type("reel_stop")
        .iter()
        .map(|e| e.timestamp_ms)
        .collect();
    assert_eq!(stops.len(), 4);
    for (i, t) in stops.iter().enumerate() {
        assert_relative_eq!(*t, 1000.0 + i as f64 * 250.0, epsilon = 1e-9);
    }
}

#[test]
fn test_phase_moves_through_stopping() {
    let mut m = machine(1000);
    m.spin().unwrap();
    assert_eq!(m.controller().phase(), SpinPhase::Spinning);

    m.clock_mut().set(Millis(1100.0));
    m.frame();
    assert_eq!(m.controller().phase(), SpinPhase::Stopping);
    assert_eq!(
        m.controller().session().map(|s| s.stopped_reels()),
        Some(1)
    );

    m.clock_mut().set(Millis(1800.0));
    m.frame();
    assert_eq!(m.controller().phase(), SpinPhase::Idle);
}

#[test]
fn test_stopped_reels_snap_to_symbol_boundary() {
    let mut m = machine(1000);
    m.spin().unwrap();
    run_until_idle(&mut m);

    let snapshot = m.frame();
    for reel in &snapshot.reels {
        assert!(reel.stopped);
        assert!(!reel.motion_blur);
        let rows = reel.position / snapshot.symbol_height;
        assert_relative_eq!(rows, rows.round(), epsilon = 1e-9);
        assert!(reel.position >= 0.0 && reel.position < 900.0);
        assert_eq!(reel.visible.len(), snapshot.grid.rows);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BUSY GUARDS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_geometry_change_during_spin_is_rejected() {
    let mut m = machine(1000);
    m.spin().unwrap();
    m.clock_mut().advance(Millis(50.0));
    m.frame();
    let before = m.controller().reels().to_vec();

    assert!(matches!(m.set_columns(3), Err(ReelError::SessionBusy)));
    assert_eq!(m.controller().reels(), before.as_slice());
    assert_eq!(m.controller().bets().columns(), 5);

    run_until_idle(&mut m);
    m.set_columns(3).unwrap();
    assert_eq!(m.controller().reels().len(), 3);
}

#[test]
fn test_rejected_trigger_still_presses_button() {
    let mut m = machine(1000);
    let trace = StageTrace::shared("buttons");
    m.attach_sink(trace.clone());

    m.spin().unwrap();
    let _ = m.increase_bet();

    let recorded = trace.snapshot();
    let presses: Vec<_> = recorded
        .events_by_type("button_press")
        .iter()
        .map(|e| e.stage.clone())
        .collect();
    assert_eq!(
        presses,
        vec![
            Stage::ButtonPress {
                control: Control::Spin
            },
            Stage::ButtonPress {
                control: Control::BetUp
            },
        ]
    );
    assert!(!recorded.has_stage("bet_change"));
}

#[test]
fn test_bet_clamps_at_both_ends() {
    let mut m = machine(1000);
    assert_eq!(m.decrease_bet().unwrap(), 5);
    for _ in 0..20 {
        m.increase_bet().unwrap();
    }
    assert_eq!(m.controller().bets().current_bet(), 1000);
    assert_eq!(m.decrease_bet().unwrap(), 500);
}

// ═══════════════════════════════════════════════════════════════════════════════
// PERSISTENCE
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_balance_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("balance.json");
    let config = MachineConfig::default();

    {
        let mut m =
            SlotMachine::new(&config, JsonBalanceStore::new(&path), ManualClock::new()).unwrap();
        assert_eq!(m.controller().wallet().balance(), 50_000);
        m.set_bet(1000).unwrap();
        m.spin().unwrap();
        run_until_idle(&mut m);
    }

    let m = SlotMachine::new(&config, JsonBalanceStore::new(&path), ManualClock::new()).unwrap();
    assert_eq!(m.controller().wallet().balance(), 49_000);
}

#[test]
fn test_truncated_balance_file_does_not_reset_wallet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("balance.json");
    let config = MachineConfig::default();

    {
        let mut m =
            SlotMachine::new(&config, JsonBalanceStore::new(&path), ManualClock::new()).unwrap();
        m.set_bet(1000).unwrap();
        m.spin().unwrap();
    }

    let content = std::fs::read(&path).unwrap();
    std::fs::write(&path, &content[..content.len() / 2]).unwrap();

    let reopened = SlotMachine::new(&config, JsonBalanceStore::new(&path), ManualClock::new());
    assert!(matches!(reopened, Err(ReelError::Serialization(_))));
}

#[test]
fn test_failed_save_rejects_spin() {
    let mut m = SlotMachine::new(
        &MachineConfig::default(),
        MemoryBalanceStore::with_balance(1000).failing(),
        ManualClock::new(),
    )
    .unwrap();

    assert!(matches!(m.spin(), Err(ReelError::Io(_))));
    assert_eq!(m.controller().wallet().balance(), 1000);
    assert!(!m.controller().is_active());
}
