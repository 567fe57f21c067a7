//! Demo pilot: plays the game by reading the simulation state
//!
//! Priorities, highest first:
//! - line up with the closest incoming enemy and shoot it
//! - while the shield is up, line up with the weakest generator
//! - otherwise line up with the mother ship
//!
//! The shoot key is toggled every frame, so a shot goes out every other
//! frame. Waiting screens are confirmed after a short pause.

use crate::consts::*;
use crate::platform::{InputEvent, InputSource};
use crate::sim::{GameState, LayerId, TickInput};

/// Vertical slack before the pilot bothers to move
const DEAD_ZONE: i32 = 4;
/// Frames between automatic confirms (two seconds)
const CONFIRM_EVERY: u64 = 2 * FPS as u64;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    shoot: bool,
    polls: u64,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Height the pilot wants its ship's centre at
    pub fn target_y(state: &GameState) -> i32 {
        let me = state.player_rect();

        // Closest enemy still in front of the ship
        let incoming = state
            .layer_entities(LayerId::Enemy)
            .filter(|e| e.body.alive && e.body.rect().right() > me.left())
            .min_by_key(|e| e.body.rect().left() - me.right())
            .map(|e| e.body.rect().center().y);
        if let Some(y) = incoming {
            return y;
        }

        if state.shield_up() {
            let weakest = state
                .layer_entities(LayerId::MainEnemy)
                .filter(|e| e.body.alive && e.id != state.mother_ship_id())
                .filter_map(|e| e.as_enemy().map(|enemy| (enemy.life, e.body.rect())))
                .min_by_key(|(life, _)| *life);
            if let Some((_, rect)) = weakest {
                // Generators sit partly off screen; aim at the visible part
                return rect.center().y.clamp(me.height() / 2, HEIGHT - me.height() / 2);
            }
        }

        state.mother_ship_rect().center().y
    }
}

impl InputSource for Autopilot {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        self.polls += 1;
        if self.polls % CONFIRM_EVERY == 0 {
            vec![InputEvent::Confirm]
        } else {
            Vec::new()
        }
    }

    fn keys(&mut self, state: &GameState) -> TickInput {
        self.shoot = !self.shoot;

        let me = state.player_rect();
        let dy = Self::target_y(state) - me.center().y;
        TickInput {
            up: dy < -DEAD_ZONE,
            down: dy > DEAD_ZONE,
            left: me.left() > PLAYER_START_X,
            right: me.left() < PLAYER_START_X,
            shoot: self.shoot,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;
    use crate::assets::Sprites;
    use crate::sim::{DirectorTiming, ShipClass, SpawnDirector, tick};

    fn quiet_state() -> GameState {
        let timing = DirectorTiming {
            wave_period: 1.0e6,
            new_ship_period: 1.0e6,
            energy_period: 1.0e6,
            ships_per_wave: 5,
        };
        GameState::with_director(1, Sprites::builtin().unwrap(), SpawnDirector::new(timing))
    }

    #[test]
    fn aims_at_incoming_enemy_first() {
        let mut state = quiet_state();
        let ship = state.spawn_ship(ShipClass::Level2);
        if let Some(e) = state.entity_mut(ship) {
            e.body.set_position(IVec2::new(700, 100));
        }
        let mut pilot = Autopilot::new();
        let keys = pilot.keys(&state);
        assert!(keys.up && !keys.down);
        assert!(keys.shoot);
        assert!(!pilot.keys(&state).shoot);
    }

    #[test]
    fn aims_at_mother_ship_once_shield_is_down() {
        let mut state = quiet_state();
        state.kill(state.shield_id());
        assert_eq!(
            Autopilot::target_y(&state),
            state.mother_ship_rect().center().y
        );
    }

    #[test]
    fn confirms_periodically() {
        let mut pilot = Autopilot::new();
        let confirms = (0..CONFIRM_EVERY * 3)
            .filter(|_| pilot.poll_events().contains(&InputEvent::Confirm))
            .count();
        assert_eq!(confirms, 3);
    }

    #[test]
    fn pilot_destroys_a_generator() {
        let mut state = quiet_state();
        let mut pilot = Autopilot::new();
        for _ in 0..(30 * FPS) {
            let keys = pilot.keys(&state);
            tick(&mut state, &keys, SIM_DT);
            if state.combat.generators_destroyed() > 0 {
                break;
            }
        }
        assert!(state.combat.generators_destroyed() > 0);
    }
}
