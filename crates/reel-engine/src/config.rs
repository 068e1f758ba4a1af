//! Machine configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use reel_core::{Axis, ReelError, ReelResult};

use crate::timing::TimingConfig;

/// Grid specification (columns × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of reels
    pub columns: usize,
    /// Number of visible rows per reel
    pub rows: usize,
}

impl GridSpec {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    /// Total visible grid positions
    pub fn total_positions(&self) -> usize {
        self.columns * self.rows
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new(5, 5)
    }
}

/// Allowed values for each grid dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryOptions {
    pub columns: Vec<usize>,
    pub rows: Vec<usize>,
}

impl GeometryOptions {
    pub fn allows(&self, axis: Axis, value: usize) -> bool {
        self.options(axis).contains(&value)
    }

    pub fn options(&self, axis: Axis) -> &[usize] {
        match axis {
            Axis::Columns => &self.columns,
            Axis::Rows => &self.rows,
        }
    }

    /// Reject `value` unless it is one of the options for `axis`
    pub fn check(&self, axis: Axis, value: usize) -> ReelResult<()> {
        if self.allows(axis, value) {
            Ok(())
        } else {
            Err(ReelError::InvalidGeometry { axis, value })
        }
    }
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            columns: vec![3, 4, 5, 6],
            rows: vec![3, 4, 5, 6],
        }
    }
}

/// Symbol strip shared by every reel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// Symbol names in strip order
    pub symbols: Vec<String>,
    /// Height of one symbol cell, in position units
    pub symbol_height: f64,
    /// Extra slots laid out beyond the visible rows (`None` = strip length)
    pub margin_rows: Option<usize>,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            symbols: [
                "cherry",
                "lemon",
                "orange",
                "plum",
                "banana",
                "bars",
                "bigwin",
                "seven",
                "watermelon",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            symbol_height: 100.0,
            margin_rows: None,
        }
    }
}

/// Reel motion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Scroll speed in position units per second
    pub speed_per_second: f64,
}

impl MotionConfig {
    /// Speed expressed as a fixed increment per frame at `fps`
    pub fn per_frame(units_per_frame: f64, fps: f64) -> Self {
        Self {
            speed_per_second: units_per_frame * fps,
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        // 10 units per frame at 60 Hz
        Self::per_frame(10.0, 60.0)
    }
}

/// Wallet economy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Balance used when the store holds none
    pub starting_balance: u64,
    /// Allowed bet sizes, ascending
    pub denominations: Vec<u64>,
    /// Initial index into `denominations`
    pub default_bet_index: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            starting_balance: 50_000,
            denominations: vec![5, 10, 25, 50, 100, 500, 1000],
            default_bet_index: 0,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub grid: GridSpec,
    pub geometry: GeometryOptions,
    pub strip: StripConfig,
    pub motion: MotionConfig,
    pub timing: TimingConfig,
    pub wallet: WalletConfig,
}

impl MachineConfig {
    /// Builder: set grid
    pub fn with_grid(mut self, columns: usize, rows: usize) -> Self {
        self.grid = GridSpec::new(columns, rows);
        self
    }

    /// Builder: set timing
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Builder: set starting balance
    pub fn with_starting_balance(mut self, balance: u64) -> Self {
        self.wallet.starting_balance = balance;
        self
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load_from<P: AsRef<Path>>(path: P) -> ReelResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let config = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&content)?,
            Some("json") => Self::from_json(&content)?,
            _ => {
                return Err(ReelError::Config(format!(
                    "unsupported config format: {}",
                    path.display()
                )));
            }
        };

        log::info!("Loaded machine config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> ReelResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ReelError::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> ReelResult<Self> {
        let config: Self = serde_yml::from_str(yaml)
            .map_err(|e| ReelError::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ReelResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReelError::Serialization(e.to_string()))
    }

    /// Check internal consistency
    pub fn validate(&self) -> ReelResult<()> {
        let fail = |msg: &str| Err(ReelError::Config(msg.to_string()));

        if self.strip.symbols.is_empty() {
            return fail("symbol strip is empty");
        }
        if !positive_finite(self.strip.symbol_height) {
            return fail("symbol_height must be positive and finite");
        }
        if !positive_finite(self.motion.speed_per_second) {
            return fail("speed_per_second must be positive and finite");
        }
        if !positive_finite(self.timing.spin_duration_ms) {
            return fail("spin_duration_ms must be positive and finite");
        }

        let amounts = &self.wallet.denominations;
        if amounts.is_empty() {
            return fail("denominations are empty");
        }
        if amounts.contains(&0) {
            return fail("denominations must be positive");
        }
        if amounts.windows(2).any(|w| w[0] >= w[1]) {
            return fail("denominations must be strictly ascending");
        }
        if self.wallet.default_bet_index >= amounts.len() {
            return fail("default_bet_index is out of range");
        }

        for axis in [Axis::Columns, Axis::Rows] {
            if self.geometry.options(axis).contains(&0) {
                return Err(ReelError::Config(format!("{} options must be positive", axis)));
            }
        }
        self.geometry
            .check(Axis::Columns, self.grid.columns)
            .and_then(|_| self.geometry.check(Axis::Rows, self.grid.rows))
            .map_err(|e| ReelError::Config(e.to_string()))?;

        Ok(())
    }
}

fn positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
