//! Game state: the entity arena, layer registry and session bookkeeping
//!
//! Entities live in a map keyed by a monotonically increasing id, so
//! iteration order is stable. Layers hold ids, not entities. A killed
//! entity leaves every layer at once; unless it is one of the persistent
//! objects restored by [`GameState::reset`], it is dropped from the arena at
//! the end of the frame.

use std::collections::BTreeMap;

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::director::{ShipClass, Spawn, SpawnDirector};
use super::enemy::{self, Enemy};
use super::entity::{Body, Rect, Role};
use super::laser::{self, CombatState, Laser};
use super::layers::{LayerId, LayerRegistry, LayerSet};
use super::player::{self, Player};
use crate::assets::Sprites;
use crate::consts::*;

/// Stable entity handle
pub type EntityId = u32;

/// Top-left of the HUD level label
pub const HUD_ORIGIN: IVec2 = IVec2::new(10, 10);
/// Horizontal offset of the first level icon from the label
const HUD_ICON_OFFSET: i32 = 70;
const HUD_ICON_SPACING: i32 = 24;

/// Info-layer items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HudItem {
    Label(String),
    /// Shown while the player's level is above this index
    LevelIcon(u8),
}

/// Per-role data
#[derive(Debug, Clone)]
pub enum EntityKind {
    Player(Player),
    Laser(Laser),
    Enemy(Enemy),
    Shield,
    Hud(HudItem),
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub body: Body,
    pub kind: EntityKind,
    /// Survives death so a reset can bring it back
    pub persistent: bool,
}

impl Entity {
    pub fn role(&self) -> Role {
        self.body.role
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match &self.kind {
            EntityKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }
}

/// Things that happened during a tick, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    WaveStarted,
    EnemySpawned { id: EntityId, role: Role },
    EnemyDestroyed { id: EntityId, role: Role },
    LaserFired { id: EntityId },
    ShieldDown,
    PlayerDestroyed,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub layers: LayerRegistry,
    pub director: SpawnDirector,
    pub combat: CombatState,
    sprites: Sprites,
    rng: Pcg32,
    entities: BTreeMap<EntityId, Entity>,
    events: Vec<GameEvent>,
    player: EntityId,
    shield: EntityId,
    mother_ship: EntityId,
    generators: [EntityId; 2],
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with the given seed
    pub fn new(seed: u64, sprites: Sprites) -> Self {
        Self::with_director(seed, sprites, SpawnDirector::default())
    }

    /// Create a new game with custom spawn timing
    pub fn with_director(seed: u64, sprites: Sprites, director: SpawnDirector) -> Self {
        let mut layers = LayerRegistry::new();
        for layer in [
            LayerId::Shield,
            LayerId::MainEnemy,
            LayerId::Enemy,
            LayerId::Player,
            LayerId::Info,
        ] {
            layers.add(layer);
        }
        layers.move_to_top(LayerId::Info);

        let mut state = Self {
            seed,
            time_ticks: 0,
            layers,
            director,
            combat: CombatState::default(),
            sprites,
            rng: Pcg32::seed_from_u64(seed),
            entities: BTreeMap::new(),
            events: Vec::new(),
            player: 0,
            shield: 0,
            mother_ship: 0,
            generators: [0; 2],
            next_id: 1,
        };

        let image = state.sprites.shield;
        let size = state.sprites.size(image);
        let shield = Body::new(
            Role::Shield,
            IVec2::new(WIDTH - size.x, 0),
            image,
            size,
            Vec2::ZERO,
        );
        let shield_rect = shield.rect();
        state.shield = state.insert(shield, EntityKind::Shield, &[LayerId::Shield], true);

        let (body, p) = player::spawn(&state.sprites);
        state.player = state.insert(body, EntityKind::Player(p), &[LayerId::Player], true);

        for slot in 0..2u8 {
            let (body, e) = enemy::generator(slot, shield_rect, &state.sprites);
            state.generators[slot as usize] =
                state.insert(body, EntityKind::Enemy(e), &[LayerId::MainEnemy], true);
        }

        let (body, e) = enemy::mother_ship(&state.sprites);
        state.mother_ship = state.insert(body, EntityKind::Enemy(e), &[LayerId::MainEnemy], true);

        state.spawn_hud();
        state
    }

    /// Get next entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn_hud(&mut self) {
        let icon = self.sprites.level_icon;
        let icon_size = self.sprites.size(icon);

        let label = Body::new(Role::Hud, HUD_ORIGIN, icon, IVec2::ZERO, Vec2::ZERO);
        self.insert(
            label,
            EntityKind::Hud(HudItem::Label("Level:".to_string())),
            &[LayerId::Info],
            true,
        );

        for i in 0..PLAYER_MAX_LEVEL {
            let pos = HUD_ORIGIN + IVec2::new(HUD_ICON_OFFSET + i as i32 * HUD_ICON_SPACING, 0);
            let body = Body::new(Role::Hud, pos, icon, icon_size, Vec2::ZERO);
            self.insert(
                body,
                EntityKind::Hud(HudItem::LevelIcon(i)),
                &[LayerId::Info],
                true,
            );
        }
    }

    /// Add an entity to the arena and to the given layers
    pub fn insert(
        &mut self,
        mut body: Body,
        kind: EntityKind,
        layers: &[LayerId],
        persistent: bool,
    ) -> EntityId {
        let id = self.next_entity_id();
        body.layers = LayerSet::EMPTY;
        for &layer in layers {
            if self.layers.insert(layer, id) {
                body.layers.insert(layer);
            }
        }
        self.entities.insert(
            id,
            Entity {
                id,
                body,
                kind,
                persistent,
            },
        );
        id
    }

    /// Put an existing entity back into a layer
    pub fn attach(&mut self, id: EntityId, layer: LayerId) {
        if let Some(entity) = self.entities.get_mut(&id)
            && self.layers.insert(layer, id)
        {
            entity.body.layers.insert(layer);
        }
    }

    /// Unregister a layer; its members lose that membership
    pub fn remove_layer(&mut self, layer: LayerId) {
        let entities = &mut self.entities;
        self.layers.remove(layer, &mut |id, layer| {
            if let Some(entity) = entities.get_mut(&id) {
                entity.body.layers.remove(layer);
            }
        });
        log::debug!("layer '{}' removed", layer.name());
    }

    // === Spawning ===

    /// Advance the spawn director and create whatever it asks for
    pub fn advance_director(&mut self, dt: f32) {
        let spawns = self.director.update(dt, &mut self.rng);
        for spawn in spawns {
            match spawn {
                Spawn::WaveStarted => {
                    log::info!("Wave started (tick {})", self.time_ticks);
                    self.events.push(GameEvent::WaveStarted);
                }
                Spawn::Ship(class) => {
                    self.spawn_ship(class);
                }
                Spawn::EnergyBall => {
                    self.spawn_energy_ball();
                }
            }
        }
    }

    pub fn spawn_ship(&mut self, class: ShipClass) -> EntityId {
        let (body, e) = match class {
            ShipClass::Level1 => {
                let y = self.player_rect().top();
                enemy::basic(&self.sprites, y, &mut self.rng)
            }
            ShipClass::Level2 => enemy::chaser(2, &self.sprites, &mut self.rng),
            ShipClass::Level3 => enemy::chaser(3, &self.sprites, &mut self.rng),
        };
        self.spawn_enemy(body, e)
    }

    pub fn spawn_energy_ball(&mut self) -> EntityId {
        let (body, e) = enemy::energy_ball(&self.sprites, &mut self.rng);
        self.spawn_enemy(body, e)
    }

    fn spawn_enemy(&mut self, body: Body, enemy: Enemy) -> EntityId {
        let role = body.role;
        let pos = body.rect().pos;
        let id = self.insert(body, EntityKind::Enemy(enemy), &[LayerId::Enemy], false);
        log::debug!("Spawned {role} #{id} at ({}, {})", pos.x, pos.y);
        self.events.push(GameEvent::EnemySpawned { id, role });
        id
    }

    /// Fire a laser with its top-left at `origin`
    pub fn spawn_laser(&mut self, origin: IVec2, level: u8) -> EntityId {
        let (body, l) = laser::spawn(origin, level, &self.sprites);
        let id = self.insert(body, EntityKind::Laser(l), &[LayerId::Player], false);
        self.events.push(GameEvent::LaserFired { id });
        id
    }

    // === Death ===

    /// Remove an entity from every layer and mark it dead.
    ///
    /// Safe to call repeatedly; death events only fire the first time.
    pub fn kill(&mut self, id: EntityId) {
        let Some(entity) = self.entities.get_mut(&id) else {
            return;
        };
        for layer in entity.body.layers.iter() {
            self.layers.detach(layer, id);
        }
        entity.body.layers = LayerSet::EMPTY;
        if !entity.body.alive {
            return;
        }
        entity.body.alive = false;

        let role = entity.body.role;
        match role {
            Role::Shield => {
                log::info!("Shield down");
                self.events.push(GameEvent::ShieldDown);
            }
            Role::Level1Ship
            | Role::Level2Ship
            | Role::Level3Ship
            | Role::EnergyBall
            | Role::Generator
            | Role::MotherShip => {
                log::debug!("{role} #{id} destroyed");
                self.events.push(GameEvent::EnemyDestroyed { id, role });
            }
            Role::Player | Role::Laser | Role::Hud => {}
        }
    }

    /// Damage an enemy. Returns true if this hit killed it.
    pub fn hit_enemy(&mut self, id: EntityId, damage: i32) -> bool {
        let Some(Entity {
            body,
            kind: EntityKind::Enemy(enemy),
            ..
        }) = self.entities.get_mut(&id)
        else {
            return false;
        };
        if !body.alive {
            return false;
        }
        if enemy.take_damage(damage) {
            self.kill(id);
            return true;
        }
        false
    }

    /// Player dies but stays on screen until the session ends
    pub fn mark_player_dead(&mut self) {
        if let Some(entity) = self.entities.get_mut(&self.player)
            && entity.body.alive
        {
            entity.body.alive = false;
            log::info!("Player destroyed");
            self.events.push(GameEvent::PlayerDestroyed);
        }
    }

    /// Kill every member of a layer
    pub fn clear_layer(&mut self, layer: LayerId) {
        for id in self.layers.snapshot(&[layer]) {
            self.kill(id);
        }
    }

    /// Drop dead transient entities from the arena
    pub fn purge(&mut self) {
        self.entities
            .retain(|_, e| e.persistent || e.body.in_any_layer());
    }

    /// Back to the opening position: no ships or lasers, full-health boss and
    /// generators, shield up, fresh spawn timers
    pub fn reset(&mut self) {
        self.clear_layer(LayerId::Enemy);
        self.clear_layer(LayerId::Player);

        let main_enemies = [self.generators[0], self.generators[1], self.mother_ship];
        for id in main_enemies {
            if let Some(Entity {
                body,
                kind: EntityKind::Enemy(enemy),
                ..
            }) = self.entities.get_mut(&id)
            {
                enemy.restore();
                body.alive = true;
            }
            self.attach(id, LayerId::MainEnemy);
        }

        if let Some(Entity {
            body,
            kind: EntityKind::Player(p),
            ..
        }) = self.entities.get_mut(&self.player)
        {
            player::reset(body, p, &self.sprites);
        }
        self.attach(self.player, LayerId::Player);

        self.director.restart();
        self.combat.reset();

        if let Some(entity) = self.entities.get_mut(&self.shield) {
            entity.body.alive = true;
        }
        self.attach(self.shield, LayerId::Shield);

        self.purge();
        log::info!("Game reset");
    }

    /// Change the player's level (1..=4)
    pub fn set_player_level(&mut self, level: u8) {
        if let Some(Entity {
            body,
            kind: EntityKind::Player(p),
            ..
        }) = self.entities.get_mut(&self.player)
        {
            player::set_level(body, p, level, &self.sprites);
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Queries ===

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Mutable entity plus the sprite table, for updates that swap images
    pub fn entity_and_sprites(&mut self, id: EntityId) -> Option<(&mut Entity, &Sprites)> {
        let entity = self.entities.get_mut(&id)?;
        Some((entity, &self.sprites))
    }

    /// All entities, in id order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Live members of a layer
    pub fn layer_entities(&self, layer: LayerId) -> impl Iterator<Item = &Entity> {
        self.layers
            .members(layer)
            .iter()
            .filter_map(|id| self.entities.get(id))
    }

    pub fn sprites(&self) -> &Sprites {
        &self.sprites
    }

    pub fn player_id(&self) -> EntityId {
        self.player
    }

    pub fn shield_id(&self) -> EntityId {
        self.shield
    }

    pub fn mother_ship_id(&self) -> EntityId {
        self.mother_ship
    }

    pub fn generator_ids(&self) -> [EntityId; 2] {
        self.generators
    }

    pub fn player(&self) -> Option<&Player> {
        match &self.entities.get(&self.player)?.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn player_rect(&self) -> Rect {
        self.rect_of(self.player)
    }

    pub fn player_alive(&self) -> bool {
        self.is_alive(self.player)
    }

    pub fn shield_rect(&self) -> Rect {
        self.rect_of(self.shield)
    }

    /// Shield is alive and blocking
    pub fn shield_up(&self) -> bool {
        self.layers.contains(LayerId::Shield, self.shield) && self.is_alive(self.shield)
    }

    pub fn mother_ship(&self) -> Option<&Enemy> {
        self.entities.get(&self.mother_ship)?.as_enemy()
    }

    pub fn mother_ship_rect(&self) -> Rect {
        self.rect_of(self.mother_ship)
    }

    pub fn mother_ship_alive(&self) -> bool {
        self.is_alive(self.mother_ship)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.get(&id).is_some_and(|e| e.body.alive)
    }

    fn rect_of(&self, id: EntityId) -> Rect {
        self.entities
            .get(&id)
            .map(|e| e.body.rect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::director::DirectorTiming;
    use crate::sim::tick::{TickInput, tick};

    fn new_state() -> GameState {
        GameState::new(1, Sprites::builtin().unwrap())
    }

    #[test]
    fn initial_layout() {
        let s = new_state();
        assert_eq!(
            s.layers.order(),
            vec![
                LayerId::Player,
                LayerId::Enemy,
                LayerId::MainEnemy,
                LayerId::Shield,
                LayerId::Info
            ]
        );
        assert_eq!(s.layers.count(LayerId::MainEnemy), 3);
        assert_eq!(s.layers.count(LayerId::Player), 1);
        assert_eq!(s.layers.count(LayerId::Info), 1 + PLAYER_MAX_LEVEL as usize);
        assert!(s.shield_up());
        assert_eq!(s.shield_rect().right(), WIDTH);
        assert_eq!(
            s.player_rect().pos,
            IVec2::new(PLAYER_START_X, PLAYER_START_Y)
        );
        for id in s.generator_ids() {
            assert_eq!(s.entity(id).unwrap().body.rect().left(), s.shield_rect().left());
        }
    }

    #[test]
    fn kill_is_idempotent_and_fires_once() {
        let mut s = new_state();
        let id = s.spawn_energy_ball();
        s.drain_events();

        s.kill(id);
        s.kill(id);
        let events = s.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::EnemyDestroyed {
                id,
                role: Role::EnergyBall
            }]
        );
        assert!(!s.layers.contains(LayerId::Enemy, id));
    }

    #[test]
    fn purge_drops_only_transient_dead() {
        let mut s = new_state();
        let ship = s.spawn_ship(ShipClass::Level2);
        let before = s.entity_count();
        s.kill(ship);
        s.kill(s.generator_ids()[0]);
        s.purge();
        assert_eq!(s.entity_count(), before - 1);
        assert!(s.entity(ship).is_none());
        assert!(s.entity(s.generator_ids()[0]).is_some());
    }

    #[test]
    fn removed_layer_releases_its_members() {
        let mut s = new_state();
        let ship = s.spawn_ship(ShipClass::Level2);
        let player = s.player_id();
        s.remove_layer(LayerId::Enemy);

        assert!(!s.layers.order().contains(&LayerId::Enemy));
        assert!(!s.entity(ship).unwrap().body.layers.contains(LayerId::Enemy));
        s.purge();
        assert!(s.entity(ship).is_none());
        // Other layers keep their members
        assert!(s.entity(player).unwrap().body.layers.contains(LayerId::Player));

        for _ in 0..10 {
            tick(&mut s, &TickInput::default(), SIM_DT);
        }
        assert!(s.entity(ship).is_none());
        assert_eq!(s.layers.count(LayerId::Enemy), 0);
    }

    #[test]
    fn hit_enemy_reports_the_killing_blow() {
        let mut s = new_state();
        let id = s.spawn_ship(ShipClass::Level3);
        assert!(!s.hit_enemy(id, 1));
        assert!(!s.hit_enemy(id, 1));
        assert!(s.hit_enemy(id, 1));
        assert!(!s.hit_enemy(id, 1));
        assert!(!s.is_alive(id));
    }

    #[test]
    fn level1_ship_spawns_at_player_height() {
        let mut s = new_state();
        let id = s.spawn_ship(ShipClass::Level1);
        assert_eq!(s.entity(id).unwrap().body.rect().top(), PLAYER_START_Y);
    }

    #[test]
    fn reset_restores_everything() {
        let timing = DirectorTiming {
            wave_period: 0.01,
            ..Default::default()
        };
        let mut s = GameState::with_director(3, Sprites::builtin().unwrap(), SpawnDirector::new(timing));
        s.spawn_ship(ShipClass::Level2);
        s.spawn_energy_ball();
        s.spawn_laser(IVec2::new(10, 10), 1);
        s.hit_enemy(s.mother_ship_id(), 50);
        for id in s.generator_ids() {
            s.hit_enemy(id, GENERATOR_LIFE);
            s.combat.record_generator_destroyed();
        }
        s.kill(s.shield_id());
        s.set_player_level(3);
        s.mark_player_dead();
        s.advance_director(1.0);
        s.drain_events();

        s.reset();

        assert_eq!(s.layers.count(LayerId::Enemy), 0);
        assert_eq!(s.layers.count(LayerId::Player), 1);
        assert_eq!(s.layers.count(LayerId::MainEnemy), 3);
        assert!(s.shield_up());
        assert!(s.player_alive());
        assert_eq!(s.player().unwrap().level, 1);
        assert_eq!(s.player().unwrap().life, PLAYER_LIFE);
        assert_eq!(s.mother_ship().unwrap().life, MOTHER_SHIP_LIFE);
        assert_eq!(s.combat.generators_destroyed(), 0);
        assert!(!s.director.is_adding());
        // Energy ball hum must be stopped by the reset
        assert!(s.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::EnemyDestroyed {
                role: Role::EnergyBall,
                ..
            }
        )));
        // Only persistent entities remain
        assert!(s.entities().all(|e| e.persistent));
    }
}
