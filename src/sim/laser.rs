//! Player lasers and the shield bookkeeping they drive

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::entity::{Body, Role};
use crate::assets::Sprites;
use crate::consts::*;

/// Laser-only state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Laser {
    /// Damage dealt per hit
    pub level: u8,
}

/// Laser flying right from `origin` (its top-left corner)
pub fn spawn(origin: IVec2, level: u8, sprites: &Sprites) -> (Body, Laser) {
    let level = level.clamp(1, PLAYER_MAX_LEVEL);
    let image = sprites.laser[level as usize - 1];
    let mut body = Body::new(
        Role::Laser,
        origin,
        image,
        sprites.size(image),
        Vec2::new(LASER_SPEED, 0.0),
    );
    body.set_vx(LASER_SPEED);
    (body, Laser { level })
}

/// Destroyed-generator tally for the current session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    generators_destroyed: u32,
}

impl CombatState {
    /// Count a generator kill. Returns true on the kill that brings the
    /// shield down; later kills never trigger again.
    pub fn record_generator_destroyed(&mut self) -> bool {
        self.generators_destroyed += 1;
        self.generators_destroyed == GENERATORS_FOR_SHIELD
    }

    pub fn generators_destroyed(&self) -> u32 {
        self.generators_destroyed
    }

    pub fn reset(&mut self) {
        self.generators_destroyed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_falls_on_second_generator_only() {
        let mut combat = CombatState::default();
        assert!(!combat.record_generator_destroyed());
        assert!(combat.record_generator_destroyed());
        assert!(!combat.record_generator_destroyed());
        assert_eq!(combat.generators_destroyed(), 3);

        combat.reset();
        assert!(!combat.record_generator_destroyed());
        assert!(combat.record_generator_destroyed());
    }

    #[test]
    fn laser_flies_right() {
        let sprites = Sprites::builtin().unwrap();
        let (mut body, laser) = spawn(IVec2::new(100, 200), 1, &sprites);
        assert_eq!(laser.level, 1);
        assert_eq!(body.image(), sprites.laser[0]);
        body.integrate(SIM_DT);
        assert_eq!(body.rect().pos, IVec2::new(130, 200));
    }
}
