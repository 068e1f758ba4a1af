//! Time primitives for the frame loop and stop schedule

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// A point in time (or a span) in milliseconds since an arbitrary origin
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Millis(pub f64);

impl Millis {
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub fn from_secs(seconds: f64) -> Self {
        Self(seconds * 1000.0)
    }

    #[inline]
    pub fn as_secs(self) -> f64 {
        self.0 / 1000.0
    }

    #[inline]
    pub fn as_ms(self) -> f64 {
        self.0
    }

    /// Span from `earlier` to `self`, never negative
    #[inline]
    pub fn since(self, earlier: Millis) -> Millis {
        Millis((self.0 - earlier.0).max(0.0))
    }
}

impl std::ops::Add for Millis {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Millis {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::Mul<f64> for Millis {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

/// Source of the current time for the frame loop
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Wall clock, measured from construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        Millis::from_secs(self.origin.elapsed().as_secs_f64())
    }
}

/// Hand-driven clock for deterministic runs and tests
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Millis,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&mut self, by: Millis) {
        self.now += Millis(by.0.max(0.0));
    }

    pub fn set(&mut self, now: Millis) {
        self.now = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now
    }
}
