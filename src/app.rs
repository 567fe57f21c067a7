//! Screen flow and music
//!
//! Opening screen, then play. Each session ends on a victory or game-over
//! screen; confirming from there resets the game and plays again. Quit ends
//! everything from any screen.

use glam::IVec2;

use crate::assets::ImageId;
use crate::audio::{AudioSink, LOOP_FOREVER, Track};
use crate::platform::{FrameClock, InputEvent, InputSource};
use crate::renderer::{BLACK, Canvas};
use crate::sim::{GameState, Outcome, SessionEnd, forward_events, run_session};

/// Music volume per screen
const OPENING_VOLUME: f32 = 0.5;
const THEME_VOLUME: f32 = 0.3;

/// Screen currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Opening,
    Playing,
    Victory,
    GameOver,
}

/// Why the controller returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerEnd {
    Quit,
    /// The configured number of sessions has been played
    RoundLimit,
}

/// Borrowed collaborators for one run
pub struct Devices<'a> {
    pub input: &'a mut dyn InputSource,
    pub canvas: &'a mut dyn Canvas,
    pub audio: &'a mut dyn AudioSink,
    pub clock: &'a mut dyn FrameClock,
}

pub struct GameController {
    pub state: GameState,
    screen: Screen,
    round_limit: Option<u32>,
    outcomes: Vec<Outcome>,
}

impl GameController {
    pub fn new(state: GameState, round_limit: Option<u32>) -> Self {
        Self {
            state,
            screen: Screen::Opening,
            round_limit,
            outcomes: Vec::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Result of every finished session, oldest first
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn run(&mut self, dev: &mut Devices<'_>) -> ControllerEnd {
        self.screen = Screen::Opening;
        dev.audio
            .play_music(Track::Opening, LOOP_FOREVER, OPENING_VOLUME);
        let opening = self.state.sprites().opening;
        if !wait_for_confirm(opening, dev) {
            return ControllerEnd::Quit;
        }

        loop {
            self.screen = Screen::Playing;
            dev.audio
                .play_music(Track::MainTheme, LOOP_FOREVER, THEME_VOLUME);

            let end = run_session(
                &mut self.state,
                &mut *dev.input,
                &mut *dev.canvas,
                &mut *dev.audio,
                &mut *dev.clock,
            );
            let outcome = match end {
                SessionEnd::Quit => return ControllerEnd::Quit,
                SessionEnd::Finished(outcome) => outcome,
            };
            self.outcomes.push(outcome);

            dev.audio.stop_all();
            dev.audio.resume();
            let image = match outcome {
                Outcome::Win => {
                    log::info!("Victory!");
                    self.screen = Screen::Victory;
                    dev.audio.play_music(Track::Win, LOOP_FOREVER, THEME_VOLUME);
                    self.state.sprites().victory
                }
                Outcome::Loss => {
                    log::info!("Game over");
                    self.screen = Screen::GameOver;
                    dev.audio.play_music(Track::GameOver, 1, THEME_VOLUME);
                    self.state.sprites().game_over
                }
            };

            if let Some(limit) = self.round_limit
                && self.outcomes.len() as u32 >= limit
            {
                log::info!("Played {limit} round(s), stopping");
                return ControllerEnd::RoundLimit;
            }

            if !wait_for_confirm(image, dev) {
                return ControllerEnd::Quit;
            }

            self.state.reset();
            forward_events(&mut self.state, &mut *dev.audio);
        }
    }
}

/// Show a full-screen image until confirmed. Returns false on quit.
fn wait_for_confirm(image: ImageId, dev: &mut Devices<'_>) -> bool {
    loop {
        for event in dev.input.poll_events() {
            match event {
                InputEvent::Quit => return false,
                InputEvent::ToggleMute => dev.audio.toggle_mute(),
                InputEvent::Confirm => return true,
            }
        }
        dev.canvas.clear(BLACK);
        dev.canvas.blit(image, IVec2::ZERO);
        dev.canvas.present();
        dev.clock.wait_frame();
    }
}
