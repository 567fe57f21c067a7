//! Frame pacing

use std::time::{Duration, Instant};

use crate::consts::SIM_DT;

/// Blocks until the next frame boundary
pub trait FrameClock {
    fn wait_frame(&mut self);
}

/// Real-time clock at a fixed frame rate. A late frame does not try to catch
/// up; the next deadline is taken from now.
#[derive(Debug, Clone)]
pub struct PacedClock {
    frame: Duration,
    next: Option<Instant>,
}

impl Default for PacedClock {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl PacedClock {
    pub fn new(frame_secs: f32) -> Self {
        Self {
            frame: Duration::from_secs_f32(frame_secs.max(0.0)),
            next: None,
        }
    }
}

impl FrameClock for PacedClock {
    fn wait_frame(&mut self) {
        let now = Instant::now();
        let deadline = self.next.unwrap_or(now + self.frame);
        if deadline > now {
            std::thread::sleep(deadline - now);
            self.next = Some(deadline + self.frame);
        } else {
            self.next = Some(now + self.frame);
        }
    }
}

/// Clock that never blocks and just counts frames (headless runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    pub frames: u64,
}

impl FrameClock for ManualClock {
    fn wait_frame(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_counts() {
        let mut clock = ManualClock::default();
        clock.wait_frame();
        clock.wait_frame();
        assert_eq!(clock.frames, 2);
    }

    #[test]
    fn paced_clock_waits_roughly_one_frame() {
        let mut clock = PacedClock::new(0.01);
        let start = Instant::now();
        clock.wait_frame();
        clock.wait_frame();
        assert!(start.elapsed() >= Duration::from_millis(19));
    }
}
