//! Session loop: input, tick, audio, draw, pace, until someone wins or quits

use glam::IVec2;

use super::entity::Role;
use super::state::{EntityKind, GameEvent, GameState, HudItem};
use super::tick::{Outcome, tick};
use crate::audio::{AudioSink, LOOP_FOREVER, Sound};
use crate::consts::*;
use crate::platform::{FrameClock, InputEvent, InputSource};
use crate::renderer::{BLACK, Canvas, RED, WHITE};

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Finished(Outcome),
    Quit,
}

/// Run frames until the game is won or lost, or the player quits
pub fn run_session(
    state: &mut GameState,
    input: &mut dyn InputSource,
    canvas: &mut dyn Canvas,
    audio: &mut dyn AudioSink,
    clock: &mut dyn FrameClock,
) -> SessionEnd {
    log::info!("Session started (seed {})", state.seed);
    let start_tick = state.time_ticks;

    loop {
        for event in input.poll_events() {
            match event {
                InputEvent::Quit => {
                    log::info!("Quit during session");
                    forward_events(state, audio);
                    return SessionEnd::Quit;
                }
                InputEvent::ToggleMute => audio.toggle_mute(),
                InputEvent::Confirm => {}
            }
        }

        let keys = input.keys(state);
        let outcome = tick(state, &keys, SIM_DT);
        forward_events(state, audio);
        draw(state, canvas);
        clock.wait_frame();

        if let Some(outcome) = outcome {
            log::info!(
                "Session over: {:?} after {} frames",
                outcome,
                state.time_ticks - start_tick
            );
            return SessionEnd::Finished(outcome);
        }
    }
}

/// Turn pending game events into sound
pub fn forward_events(state: &mut GameState, audio: &mut dyn AudioSink) {
    for event in state.drain_events() {
        match event {
            GameEvent::LaserFired { .. } => audio.play(Sound::Laser, 0),
            GameEvent::EnemySpawned {
                role: Role::EnergyBall,
                ..
            } => {
                audio.set_volume(Sound::EnergyBall, ENERGY_BALL_VOLUME);
                audio.play(Sound::EnergyBall, LOOP_FOREVER);
            }
            GameEvent::EnemyDestroyed {
                role: Role::EnergyBall,
                ..
            } => audio.stop(Sound::EnergyBall),
            _ => {}
        }
    }
}

/// Background, then every layer back to front, then the boss health bar
pub fn draw(state: &GameState, canvas: &mut dyn Canvas) {
    canvas.clear(BLACK);
    canvas.blit(state.sprites().background, IVec2::ZERO);

    let level = state.player().map_or(1, |p| p.level);
    for id in state.layers.draw_order() {
        let Some(entity) = state.entity(id) else {
            continue;
        };
        let pos = entity.body.rect().pos;
        match &entity.kind {
            EntityKind::Hud(HudItem::Label(text)) => canvas.text(text, pos, WHITE),
            EntityKind::Hud(HudItem::LevelIcon(i)) => {
                if *i < level {
                    canvas.blit(entity.body.image(), pos);
                }
            }
            _ => canvas.blit(entity.body.image(), pos),
        }
    }

    if state.mother_ship_alive()
        && let Some(bar) = state.mother_ship().and_then(|m| m.health_bar)
    {
        canvas.outline_rect(bar.outer, WHITE);
        canvas.fill_rect(bar.inner, RED);
    }

    canvas.present();
}
