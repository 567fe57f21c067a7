//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (layer order, then insertion order)
//! - No rendering or platform dependencies outside `session`

pub mod counter;
pub mod director;
pub mod enemy;
pub mod entity;
pub mod laser;
pub mod layers;
pub mod player;
pub mod session;
pub mod state;
pub mod tick;

pub use counter::Counter;
pub use director::{DirectorTiming, ShipClass, Spawn, SpawnDirector};
pub use enemy::{Enemy, EnemyKind, HealthBar, chase_player};
pub use entity::{Body, Rect, Role, integrate_axis};
pub use laser::{CombatState, Laser};
pub use layers::{LayerId, LayerRegistry, LayerSet};
pub use player::Player;
pub use session::{SessionEnd, draw, forward_events, run_session};
pub use state::{Entity, EntityId, EntityKind, GameEvent, GameState, HudItem};
pub use tick::{Outcome, TickInput, UPDATE_ORDER, tick};
