//! Platform abstraction layer
//!
//! Handles the outside world for:
//! - Input events and per-frame key state
//! - Frame pacing

pub mod input;
pub mod time;

pub use input::{InputEvent, InputSource, ScriptedInput};
pub use time::{FrameClock, ManualClock, PacedClock};
