//! Input events and key state

use std::collections::VecDeque;

use crate::sim::{GameState, TickInput};

/// Discrete events polled once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed
    Quit,
    /// `M` key
    ToggleMute,
    /// `Enter` key
    Confirm,
}

/// Source of player input.
///
/// `keys` receives the game state so computer-driven sources can read it;
/// a keyboard source ignores it.
pub trait InputSource {
    fn poll_events(&mut self) -> Vec<InputEvent>;
    fn keys(&mut self, state: &GameState) -> TickInput;
}

/// Replays a fixed script, one entry per polled frame; quits once exhausted
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<(Vec<InputEvent>, TickInput)>,
    /// Keys of the frame last polled
    current: TickInput,
    polled: u64,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one frame
    pub fn push(&mut self, events: Vec<InputEvent>, keys: TickInput) -> &mut Self {
        self.frames.push_back((events, keys));
        self
    }

    /// Queue `count` frames holding the same keys
    pub fn hold(&mut self, keys: TickInput, count: usize) -> &mut Self {
        for _ in 0..count {
            self.frames.push_back((Vec::new(), keys));
        }
        self
    }

    /// Queue a frame with just this event
    pub fn event(&mut self, event: InputEvent) -> &mut Self {
        self.push(vec![event], TickInput::default())
    }

    /// Frames left in the script
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Number of frames polled so far
    pub fn polled(&self) -> u64 {
        self.polled
    }
}

impl InputSource for ScriptedInput {
    /// Polling starts the next scripted frame
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.polled += 1;
        match self.frames.pop_front() {
            Some((events, keys)) => {
                self.current = keys;
                events
            }
            None => {
                self.current = TickInput::default();
                vec![InputEvent::Quit]
            }
        }
    }

    fn keys(&mut self, _state: &GameState) -> TickInput {
        self.current
    }
}
