//! Fixed timestep simulation tick
//!
//! One frame of play: spawn, update each layer in order, clean up, report.

use serde::{Deserialize, Serialize};

use super::entity::Role;
use super::layers::LayerId;
use super::player;
use super::state::{Entity, EntityId, EntityKind, GameState};
use crate::consts::*;

/// Layers updated each frame, in this order
pub const UPDATE_ORDER: [LayerId; 3] = [LayerId::MainEnemy, LayerId::Enemy, LayerId::Player];

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Shoot key held
    pub shoot: bool,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Mother ship destroyed
    Win,
    /// Player destroyed
    Loss,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Option<Outcome> {
    state.time_ticks += 1;

    state.advance_director(dt);

    // Snapshot so entities can kill themselves or others mid-update
    for id in state.layers.snapshot(&UPDATE_ORDER) {
        let Some(entity) = state.entity(id) else {
            continue;
        };
        if !entity.body.alive || !entity.body.in_any_layer() {
            continue;
        }
        match entity.role() {
            Role::Player => update_player(state, id, input, dt),
            Role::Laser => update_laser(state, id, dt),
            Role::Shield | Role::Hud => {}
            _ => update_enemy(state, id, dt),
        }
    }

    state.purge();

    outcome(state)
}

/// Loss takes precedence when both happen on the same frame
pub fn outcome(state: &GameState) -> Option<Outcome> {
    if !state.player_alive() {
        Some(Outcome::Loss)
    } else if !state.mother_ship_alive() {
        Some(Outcome::Win)
    } else {
        None
    }
}

fn update_player(state: &mut GameState, id: EntityId, input: &TickInput, dt: f32) {
    // Shooting is resolved before the ship moves
    let fire = match state.entity_mut(id) {
        Some(Entity {
            kind: EntityKind::Player(p),
            ..
        }) => p.trigger(input.shoot),
        _ => return,
    };
    if fire {
        let origin = state.player_rect().center();
        state.spawn_laser(origin, 1);
    }

    let shield_left = state.shield_up().then(|| state.shield_rect().left());
    if let Some(entity) = state.entity_mut(id) {
        let body = &mut entity.body;
        body.set_velocity(player::velocity_from_input(input, body.max_velocity()));
        body.integrate(dt);
        player::clamp_to_playfield(body);
        if let Some(x) = shield_left {
            player::clamp_to_shield(body, x);
        }
    }

    // Contact with ships and energy balls
    let rect = state.player_rect();
    for other in state.layers.snapshot(&[LayerId::Enemy]) {
        let damage = state.entity(other).and_then(|e| match &e.kind {
            EntityKind::Enemy(enemy) if e.body.rect().intersects(&rect) => Some(enemy.damage),
            _ => None,
        });
        let Some(damage) = damage else {
            continue;
        };
        state.kill(other);
        let dead = match state.entity_mut(id) {
            Some(Entity {
                kind: EntityKind::Player(p),
                ..
            }) => p.take_damage(damage),
            _ => false,
        };
        if dead {
            state.mark_player_dead();
        }
    }

    // Touching the mother ship is fatal whatever the remaining life
    let mother = state.mother_ship_id();
    if state.layers.contains(LayerId::MainEnemy, mother)
        && state.mother_ship_rect().intersects(&rect)
    {
        state.mark_player_dead();
    }
}

fn update_laser(state: &mut GameState, id: EntityId, dt: f32) {
    let Some(entity) = state.entity_mut(id) else {
        return;
    };
    let EntityKind::Laser(laser) = &entity.kind else {
        return;
    };
    let level = laser.level;
    entity.body.integrate(dt);
    let rect = entity.body.rect();

    // Every overlapping enemy takes the hit
    for other in state.layers.snapshot(&[LayerId::Enemy, LayerId::MainEnemy]) {
        let Some(role) = state
            .entity(other)
            .filter(|e| e.body.alive && e.body.rect().intersects(&rect))
            .map(|e| e.role())
        else {
            continue;
        };
        state.kill(id);
        if state.hit_enemy(other, level as i32)
            && role == Role::Generator
            && state.combat.record_generator_destroyed()
        {
            let shield = state.shield_id();
            state.kill(shield);
        }
    }

    if state.shield_up() && rect.intersects(&state.shield_rect()) {
        state.kill(id);
    }

    if rect.left() > WIDTH {
        state.kill(id);
    }
}

fn update_enemy(state: &mut GameState, id: EntityId, dt: f32) {
    let player = state.player_rect();
    let left_playfield = match state.entity_and_sprites(id) {
        Some((
            Entity {
                body,
                kind: EntityKind::Enemy(enemy),
                ..
            },
            sprites,
        )) => enemy.update(body, player, dt, sprites),
        _ => false,
    };
    if left_playfield {
        log::debug!("Enemy #{id} left the playfield");
        state.kill(id);
    }
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;
    use crate::assets::Sprites;
    use crate::sim::director::{DirectorTiming, ShipClass, SpawnDirector};
    use crate::sim::state::GameEvent;

    /// State whose director never spawns during a test
    fn quiet_state() -> GameState {
        let timing = DirectorTiming {
            wave_period: 1.0e6,
            new_ship_period: 1.0e6,
            energy_period: 1.0e6,
            ships_per_wave: 5,
        };
        GameState::with_director(1, Sprites::builtin().unwrap(), SpawnDirector::new(timing))
    }

    fn place(state: &mut GameState, id: EntityId, pos: IVec2) {
        let body = &mut state.entity_mut(id).unwrap().body;
        body.set_position(pos);
        body.halt();
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn quiet_frame_has_no_outcome() {
        let mut s = quiet_state();
        assert_eq!(tick(&mut s, &idle(), SIM_DT), None);
        assert_eq!(s.time_ticks, 1);
    }

    #[test]
    fn player_moves_and_is_clamped() {
        let mut s = quiet_state();
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut s, &right, SIM_DT);
        assert_eq!(s.player_rect().left(), PLAYER_START_X + 10);

        let up = TickInput {
            up: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut s, &up, SIM_DT);
        }
        assert_eq!(s.player_rect().top(), 0);

        for _ in 0..200 {
            tick(&mut s, &right, SIM_DT);
        }
        assert_eq!(s.player_rect().right(), s.shield_rect().left());
    }

    #[test]
    fn holding_shoot_fires_once() {
        let mut s = quiet_state();
        let shoot = TickInput {
            shoot: true,
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut s, &shoot, SIM_DT);
        }
        tick(&mut s, &idle(), SIM_DT);
        tick(&mut s, &shoot, SIM_DT);
        let fired = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LaserFired { .. }))
            .count();
        assert_eq!(fired, 2);
    }

    #[test]
    fn laser_starts_at_player_centre() {
        let mut s = quiet_state();
        let centre = s.player_rect().center();
        let shoot = TickInput {
            shoot: true,
            down: true,
            ..Default::default()
        };
        tick(&mut s, &shoot, SIM_DT);
        let laser = s
            .layer_entities(LayerId::Player)
            .find(|e| e.role() == Role::Laser)
            .unwrap();
        // Spawned before the player moved; it first flies on the next frame
        assert_eq!(laser.body.rect().pos, centre);
        assert_ne!(s.player_rect().center(), centre);
    }

    #[test]
    fn contact_kills_enemy_and_costs_life() {
        let mut s = quiet_state();
        s.set_player_level(1);
        if let Some(Entity {
            kind: EntityKind::Player(p),
            ..
        }) = s.entity_mut(s.player_id())
        {
            p.life = 5;
        }
        let ship = s.spawn_ship(ShipClass::Level3);
        let pos = s.player_rect().pos;
        place(&mut s, ship, pos);

        assert_eq!(tick(&mut s, &idle(), SIM_DT), None);
        assert!(s.entity(ship).is_none());
        assert_eq!(s.player().unwrap().life, 2);
    }

    #[test]
    fn lethal_contact_is_a_loss() {
        let mut s = quiet_state();
        let ship = s.spawn_ship(ShipClass::Level1);
        let pos = s.player_rect().pos;
        place(&mut s, ship, pos);

        assert_eq!(tick(&mut s, &idle(), SIM_DT), Some(Outcome::Loss));
        assert!(s.drain_events().contains(&GameEvent::PlayerDestroyed));
    }

    #[test]
    fn touching_mother_ship_is_fatal() {
        let mut s = quiet_state();
        s.kill(s.shield_id());
        if let Some(Entity {
            kind: EntityKind::Player(p),
            ..
        }) = s.entity_mut(s.player_id())
        {
            p.life = 100;
        }
        let pos = s.mother_ship_rect().center();
        let player = s.player_id();
        place(&mut s, player, pos);
        assert_eq!(tick(&mut s, &idle(), SIM_DT), Some(Outcome::Loss));
    }

    #[test]
    fn two_generators_bring_the_shield_down() {
        let mut s = quiet_state();
        let [g0, g1] = s.generator_ids();

        for (i, g) in [g0, g1].into_iter().enumerate() {
            if let Some(Entity {
                kind: EntityKind::Enemy(e),
                ..
            }) = s.entity_mut(g)
            {
                e.life = 1;
            }
            let target = s.entity(g).unwrap().body.rect().center();
            s.spawn_laser(target - IVec2::new(30, 0), 1);
            tick(&mut s, &idle(), SIM_DT);
            assert!(!s.is_alive(g));
            assert_eq!(s.shield_up(), i == 0, "after generator {i}");
        }
        assert!(s.drain_events().contains(&GameEvent::ShieldDown));
    }

    #[test]
    fn shield_absorbs_lasers() {
        let mut s = quiet_state();
        let x = s.shield_rect().left() - 20;
        let id = s.spawn_laser(IVec2::new(x, 300), 1);
        tick(&mut s, &idle(), SIM_DT);
        assert!(s.entity(id).is_none());
    }

    #[test]
    fn lasers_past_the_edge_are_culled() {
        let mut s = quiet_state();
        s.kill(s.shield_id());
        // Clear of the mother ship and both generators
        let id = s.spawn_laser(IVec2::new(WIDTH - 10, 200), 1);
        tick(&mut s, &idle(), SIM_DT);
        assert!(s.entity(id).is_none());
    }

    #[test]
    fn enemies_leaving_left_edge_despawn() {
        let mut s = quiet_state();
        let ship = s.spawn_ship(ShipClass::Level1);
        place(&mut s, ship, IVec2::new(3, 650));
        if let Some(e) = s.entity_mut(ship) {
            e.body.set_vx(-LEVEL1_SPEED);
        }
        tick(&mut s, &idle(), SIM_DT);
        assert!(s.entity(ship).is_none());
    }

    #[test]
    fn two_hundred_hits_win() {
        let mut s = quiet_state();
        s.kill(s.shield_id());
        let ship = s.mother_ship_rect();
        let origin = IVec2::new(ship.left() + 40, ship.center().y);

        for _ in 0..(MOTHER_SHIP_LIFE - 1) {
            s.spawn_laser(origin, 1);
        }
        assert_eq!(tick(&mut s, &idle(), SIM_DT), None);
        assert_eq!(s.mother_ship().unwrap().life, 1);

        s.spawn_laser(origin, 1);
        assert_eq!(tick(&mut s, &idle(), SIM_DT), Some(Outcome::Win));
    }

    #[test]
    fn same_seed_same_game() {
        let run = || {
            let mut s = GameState::new(77, Sprites::builtin().unwrap());
            let input = TickInput {
                up: true,
                ..Default::default()
            };
            for _ in 0..600 {
                if tick(&mut s, &input, SIM_DT).is_some() {
                    break;
                }
            }
            s.entities()
                .map(|e| (e.id, e.body.rect()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
