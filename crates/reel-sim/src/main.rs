//! reel-sim — headless reel-spin host
//!
//! Runs a number of spins against the engine and prints the landed grid
//! after each one.
//!
//! Usage:
//!   reel-sim --spins 10 --bet 100
//!   reel-sim --config machine.yaml --balance-file ./balance.json --realtime

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use reel_core::{Clock, ManualClock, Millis, SystemClock};
use reel_engine::{
    FrameSnapshot, MachineConfig, RenderSurface, SlotMachine, SpinOutcome, TimingConfig,
    TimingProfile,
};
use reel_stage::{LogSink, StageTrace};
use reel_state::{BalanceStore, JsonBalanceStore, MemoryBalanceStore};

#[derive(Parser, Debug)]
#[command(author, version, about = "Spin the reels without a window")]
struct Args {
    /// Machine config (.json, .yaml, .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Persist the balance to this file; in-memory when omitted
    #[arg(long)]
    balance_file: Option<PathBuf>,

    /// Persist the balance to the per-user default location
    #[arg(long, conflicts_with = "balance_file")]
    persist: bool,

    #[arg(long)]
    columns: Option<usize>,

    #[arg(long)]
    rows: Option<usize>,

    /// Bet amount; must be one of the configured denominations
    #[arg(short, long)]
    bet: Option<u64>,

    #[arg(short, long, default_value = "1")]
    spins: usize,

    #[arg(long, default_value = "60")]
    fps: f64,

    /// Follow the wall clock instead of stepping a simulated one
    #[arg(long)]
    realtime: bool,

    #[arg(long, value_enum)]
    profile: Option<ProfileArg>,

    /// Cue background music for the length of the run
    #[arg(long)]
    music: bool,

    /// Write the recorded stage trace as JSON
    #[arg(long)]
    trace: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileArg {
    Normal,
    Relaxed,
    Turbo,
}

impl From<ProfileArg> for TimingProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Normal => TimingProfile::Normal,
            ProfileArg::Relaxed => TimingProfile::Relaxed,
            ProfileArg::Turbo => TimingProfile::Turbo,
        }
    }
}

/// Prints the grid whenever the reels land
#[derive(Debug, Default)]
struct TextSurface {
    was_active: bool,
}

impl TextSurface {
    fn print(frame: &FrameSnapshot) {
        for row in frame.visible_rows() {
            let cells: Vec<String> = row.iter().map(|name| format!("{:<10}", name)).collect();
            println!("  {}", cells.join(" ").trim_end());
        }
        println!("  {}   {}", frame.balance_text, frame.bet_text);
        println!();
    }
}

impl RenderSurface for TextSurface {
    fn draw(&mut self, frame: &FrameSnapshot) {
        if self.was_active && !frame.active {
            Self::print(frame);
        }
        self.was_active = frame.active;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if !(args.fps > 0.0) {
        anyhow::bail!("--fps must be positive");
    }

    let config = load_config(&args)?;
    let store = open_store(&args);
    let frame = Millis(1000.0 / args.fps);

    if args.realtime {
        let machine = SlotMachine::new(&config, store, SystemClock::new())
            .context("Failed to build machine")?;
        let pause = Duration::from_secs_f64(frame.as_secs());
        run(machine, &args, |_| std::thread::sleep(pause))
    } else {
        let machine = SlotMachine::new(&config, store, ManualClock::new())
            .context("Failed to build machine")?;
        run(machine, &args, |clock| clock.advance(frame))
    }
}

fn load_config(args: &Args) -> Result<MachineConfig> {
    let mut config = match &args.config {
        Some(path) => MachineConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MachineConfig::default(),
    };
    if let Some(profile) = args.profile {
        config.timing = TimingConfig::from_profile(profile.into());
    }
    Ok(config)
}

fn open_store(args: &Args) -> Box<dyn BalanceStore> {
    match &args.balance_file {
        Some(path) => Box::new(JsonBalanceStore::new(path)),
        None if args.persist => Box::new(JsonBalanceStore::open_default()),
        None => Box::new(MemoryBalanceStore::new()),
    }
}

fn run<C: Clock>(
    mut machine: SlotMachine<Box<dyn BalanceStore>, C>,
    args: &Args,
    mut wait: impl FnMut(&mut C),
) -> Result<()> {
    let trace = StageTrace::shared("reel-sim");
    machine.attach_sink(LogSink);
    machine.attach_sink(trace.clone());

    if let Some(columns) = args.columns {
        machine.set_columns(columns).context("Invalid --columns")?;
    }
    if let Some(rows) = args.rows {
        machine.set_rows(rows).context("Invalid --rows")?;
    }
    if let Some(bet) = args.bet {
        machine.set_bet(bet).context("Invalid --bet")?;
    }

    let mut surface = TextSurface::default();
    machine.render(&mut surface);
    if args.music {
        machine.start_music();
    }

    let start_balance = machine.controller().wallet().balance();
    let mut completed = 0;

    for _ in 0..args.spins {
        match machine.spin() {
            Ok(SpinOutcome::Started(receipt)) => {
                log::debug!("{} charged {}", receipt.spin_id, receipt.charged);
            }
            Ok(SpinOutcome::AlreadySpinning) => continue,
            Err(e) if e.is_rejection() => {
                log::warn!("Stopping after {} spins: {}", completed, e);
                break;
            }
            Err(e) => return Err(e).context("Spin failed"),
        }

        while machine.controller().is_active() {
            wait(machine.clock_mut());
            machine.render(&mut surface);
        }
        completed += 1;
    }

    machine.stop_music();

    let end_balance = machine.controller().wallet().balance();
    log::info!(
        "{} spins, balance {} -> {} (spent {})",
        completed,
        start_balance,
        end_balance,
        start_balance.saturating_sub(end_balance)
    );

    let recorded = trace.snapshot();
    let validation = recorded.validate();
    for warning in validation.warnings() {
        log::warn!("Trace: {}", warning);
    }

    if let Some(path) = &args.trace {
        let json = serde_json::to_string_pretty(&recorded).context("Failed to encode trace")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write trace {}", path.display()))?;
        log::info!("Wrote {} events to {}", recorded.len(), path.display());
    }

    Ok(())
}
