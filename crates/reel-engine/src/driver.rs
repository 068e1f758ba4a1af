//! Animation Driver — per-frame motion for every reel
//!
//! The driver is frame-rate independent: it converts the elapsed time of
//! a frame into a scroll distance using a speed in units per second.

use reel_core::Millis;

use crate::config::MotionConfig;
use crate::reel::Reel;
use crate::symbols::SymbolStrip;

/// Advances reels frame by frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationDriver {
    speed_per_second: f64,
    symbol_height: f64,
    strip_length: f64,
}

impl AnimationDriver {
    pub fn new(speed_per_second: f64, symbol_height: f64, strip_length: f64) -> Self {
        Self {
            speed_per_second,
            symbol_height,
            strip_length,
        }
    }

    pub fn for_strip(motion: &MotionConfig, strip: &SymbolStrip) -> Self {
        Self::new(
            motion.speed_per_second,
            strip.symbol_height(),
            strip.strip_length(),
        )
    }

    pub fn speed_per_second(&self) -> f64 {
        self.speed_per_second
    }

    pub fn strip_length(&self) -> f64 {
        self.strip_length
    }

    /// Scroll distance covered in `dt`
    pub fn distance(&self, dt: Millis) -> f64 {
        self.speed_per_second * dt.as_secs()
    }

    /// Pure frame step: returns the reels after `dt`
    pub fn advance(&self, reels: &[Reel], dt: Millis) -> Vec<Reel> {
        self.advance_by(reels, self.distance(dt))
    }

    /// Pure frame step by an explicit scroll distance
    pub fn advance_by(&self, reels: &[Reel], distance: f64) -> Vec<Reel> {
        let mut next = reels.to_vec();
        self.step(&mut next, distance);
        next
    }

    /// In-place frame step
    pub fn tick(&self, reels: &mut [Reel], dt: Millis) {
        self.step(reels, self.distance(dt));
    }

    fn step(&self, reels: &mut [Reel], distance: f64) {
        for reel in reels.iter_mut() {
            reel.update(distance, self.symbol_height, self.strip_length);
        }
        log::trace!(
            "frame: {:?}",
            reels.iter().map(|r| r.position).collect::<Vec<_>>()
        );
    }
}
