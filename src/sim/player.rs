//! The player's ship

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::entity::{Body, Role};
use super::tick::TickInput;
use crate::assets::Sprites;
use crate::consts::*;

/// Player-only state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub life: i32,
    /// 1..=4, selects the ship image and the number of HUD icons
    pub level: u8,
    /// Shoot key state on the previous frame
    last_shoot: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            life: PLAYER_LIFE,
            level: 1,
            last_shoot: false,
        }
    }
}

impl Player {
    /// Shoot edge detector. Returns true only on the press transition.
    pub fn trigger(&mut self, pressed: bool) -> bool {
        let fire = pressed && !self.last_shoot;
        self.last_shoot = pressed;
        fire
    }

    /// Subtract contact damage. Returns true when the player dies.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.life -= damage;
        self.life <= 0
    }
}

/// Player body at the start position
pub fn spawn(sprites: &Sprites) -> (Body, Player) {
    let image = sprites.player[0];
    let body = Body::new(
        Role::Player,
        IVec2::new(PLAYER_START_X, PLAYER_START_Y),
        image,
        sprites.size(image),
        Vec2::splat(PLAYER_MAX_SPEED),
    );
    (body, Player::default())
}

/// Back to level 1, full life, at the start position
pub fn reset(body: &mut Body, player: &mut Player, sprites: &Sprites) {
    *player = Player::default();
    set_level(body, player, 1, sprites);
    body.halt();
    body.set_position(IVec2::new(PLAYER_START_X, PLAYER_START_Y));
    body.alive = true;
}

/// Change the ship level (clamped to 1..=4); the rect follows the new image
pub fn set_level(body: &mut Body, player: &mut Player, level: u8, sprites: &Sprites) {
    player.level = level.clamp(1, PLAYER_MAX_LEVEL);
    let image = sprites.player[player.level as usize - 1];
    body.set_image(image, sprites.size(image));
}

/// Velocity for the pressed direction keys. Opposite keys cancel out.
pub fn velocity_from_input(input: &TickInput, max: Vec2) -> Vec2 {
    let mut velocity = Vec2::ZERO;
    if input.up {
        velocity.y -= max.y;
    }
    if input.down {
        velocity.y += max.y;
    }
    if input.left {
        velocity.x -= max.x;
    }
    if input.right {
        velocity.x += max.x;
    }
    velocity
}

/// Keep the ship inside the playfield
pub fn clamp_to_playfield(body: &mut Body) {
    let rect = body.rect();
    let mut pos = rect.pos;
    if rect.left() < 0 {
        pos.x = 0;
    } else if rect.right() > WIDTH {
        pos.x = WIDTH - rect.width();
    }
    if rect.top() < 0 {
        pos.y = 0;
    } else if rect.bottom() > HEIGHT {
        pos.y = HEIGHT - rect.height();
    }
    body.set_position(pos);
}

/// Keep the ship left of the shield
pub fn clamp_to_shield(body: &mut Body, shield_left: i32) {
    if body.rect().right() > shield_left {
        body.set_right(shield_left);
    }
}
