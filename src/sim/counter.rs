//! Repeating interval timer
//!
//! Drives wave cadence, per-ship spawn cadence and sprite animation.

use serde::{Deserialize, Serialize};

/// Accumulates elapsed time and fires once each time the period is exceeded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    elapsed: f32,
    period: f32,
    running: bool,
}

impl Counter {
    /// A running counter
    pub fn new(period: f32) -> Self {
        Self {
            elapsed: 0.0,
            period,
            running: true,
        }
    }

    /// A counter that ignores updates until restarted
    pub fn stopped(period: f32) -> Self {
        Self {
            elapsed: 0.0,
            period,
            running: false,
        }
    }

    /// Advance by `dt`. Returns true when the accumulated time exceeds the
    /// period; accumulation then restarts from zero.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed > self.period {
            self.elapsed = 0.0;
            return true;
        }
        false
    }

    /// Reset and start
    pub fn restart(&mut self) {
        self.running = true;
        self.elapsed = 0.0;
    }

    /// Suspend, keeping accumulated time
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Suspend and discard accumulated time
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn period(&self) -> f32 {
        self.period
    }
}
