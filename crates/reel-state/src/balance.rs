//! Balance Store
//!
//! Persistent player balance:
//! - Load once at startup (absent → caller's starting balance)
//! - A present but unreadable file is an error, never "absent"
//! - Save on every mutation, no batching; writes replace the file atomically
//! - File-backed JSON store and an in-memory store

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reel_core::{ReelError, ReelResult};

/// Storage for a single balance value
pub trait BalanceStore {
    /// Stored balance, or `None` if nothing has been saved yet
    fn load_balance(&self) -> ReelResult<Option<u64>>;

    /// Persist a new balance; must be durable when this returns `Ok`
    fn save_balance(&mut self, balance: u64) -> ReelResult<()>;
}

/// On-disk record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub balance: u64,
    pub updated_at: DateTime<Utc>,
}

impl BalanceRecord {
    pub fn now(balance: u64) -> Self {
        Self {
            balance,
            updated_at: Utc::now(),
        }
    }
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct JsonBalanceStore {
    path: PathBuf,
}

impl JsonBalanceStore {
    /// Store at the standard location
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get default balance file path
    pub fn default_path() -> PathBuf {
        let base = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .map(|h| h.join("Library/Application Support/ReelSpin"))
                .unwrap_or_else(|| PathBuf::from("."))
        } else if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .map(|d| d.join("ReelSpin"))
                .unwrap_or_else(|| PathBuf::from("."))
        } else {
            // Linux/other
            dirs::config_dir()
                .map(|d| d.join("reelspin"))
                .unwrap_or_else(|| PathBuf::from("."))
        };
        base.join("balance.json")
    }

    /// Read the full record; `None` only if no file exists
    pub fn load_record(&self) -> ReelResult<Option<BalanceRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str::<BalanceRecord>(&content)
            .map(Some)
            .map_err(|e| {
                log::error!("Corrupt balance file {}: {}", self.path.display(), e);
                ReelError::Serialization(format!("{}: {}", self.path.display(), e))
            })
    }

    /// Sibling file a save is staged in before it replaces the record
    fn staging_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl BalanceStore for JsonBalanceStore {
    fn load_balance(&self) -> ReelResult<Option<u64>> {
        Ok(self.load_record()?.map(|r| r.balance))
    }

    fn save_balance(&mut self, balance: u64) -> ReelResult<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&BalanceRecord::now(balance))
            .map_err(|e| ReelError::Serialization(e.to_string()))?;

        let staging = self.staging_path();
        let mut file = File::create(&staging)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&staging, &self.path)?;
        log::debug!("Saved balance {} to {}", balance, self.path.display());
        Ok(())
    }
}

/// In-memory store (tests, embedding)
#[derive(Debug, Clone, Default)]
pub struct MemoryBalanceStore {
    balance: Option<u64>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryBalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds a balance
    pub fn with_balance(balance: u64) -> Self {
        Self {
            balance: Some(balance),
            ..Self::default()
        }
    }

    /// Make every subsequent save fail with an IO error
    pub fn failing(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn stored(&self) -> Option<u64> {
        self.balance
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl BalanceStore for MemoryBalanceStore {
    fn load_balance(&self) -> ReelResult<Option<u64>> {
        Ok(self.balance)
    }

    fn save_balance(&mut self, balance: u64) -> ReelResult<()> {
        if self.fail_saves {
            return Err(std::io::Error::other("balance store is read-only").into());
        }
        self.balance = Some(balance);
        self.saves += 1;
        Ok(())
    }
}

impl<S: BalanceStore + ?Sized> BalanceStore for Box<S> {
    fn load_balance(&self) -> ReelResult<Option<u64>> {
        (**self).load_balance()
    }

    fn save_balance(&mut self, balance: u64) -> ReelResult<()> {
        (**self).save_balance(balance)
    }
}
