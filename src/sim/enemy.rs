//! Enemies: drifting ships, chasers, the energy ball, shield generators and
//! the mother ship
//!
//! Every enemy shares one record; [`EnemyKind`] picks the per-frame behaviour.

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::counter::Counter;
use super::entity::{Body, Rect, Role};
use crate::assets::{ImageId, Sprites};
use crate::consts::*;

/// Enemy behaviour variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Level 1 ship: straight horizontal drift
    Basic,
    /// Level 2/3 ship: drift plus vertical chase
    Chaser { level: u8 },
    /// Homing ball that hums while alive
    EnergyBall,
    /// Stationary shield generator; slot 0 bottom, slot 1 top
    Generator { slot: u8 },
    /// Stationary boss
    MotherShip,
}

impl EnemyKind {
    pub fn role(&self) -> Role {
        match self {
            EnemyKind::Basic => Role::Level1Ship,
            EnemyKind::Chaser { level: 2 } => Role::Level2Ship,
            EnemyKind::Chaser { .. } => Role::Level3Ship,
            EnemyKind::EnergyBall => Role::EnergyBall,
            EnemyKind::Generator { .. } => Role::Generator,
            EnemyKind::MotherShip => Role::MotherShip,
        }
    }
}

/// Cycles a sprite through its frames on a fixed cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    frames: Vec<ImageId>,
    index: usize,
    counter: Counter,
}

impl Animation {
    pub fn new(frames: Vec<ImageId>, period: f32) -> Self {
        Self {
            frames,
            index: 0,
            counter: Counter::new(period),
        }
    }

    /// Advance the clock; returns the new frame when it changes
    pub fn advance(&mut self, dt: f32) -> Option<ImageId> {
        if self.frames.is_empty() || !self.counter.update(dt) {
            return None;
        }
        self.index = (self.index + 1) % self.frames.len();
        Some(self.frames[self.index])
    }

    #[cfg(test)]
    pub fn frame(&self) -> usize {
        self.index
    }
}

/// Boss health bar: a border rect above the ship and a fill inside it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthBar {
    pub outer: Rect,
    pub inner: Rect,
    full_width: i32,
}

impl HealthBar {
    pub fn above(ship: Rect) -> Self {
        let outer = Rect::new(ship.left(), ship.top() - 10, ship.width(), 5);
        let inner = Rect::new(ship.left() + 1, ship.top() - 9, ship.width() - 2, 3);
        Self {
            outer,
            inner,
            full_width: inner.width(),
        }
    }

    /// Resize the fill to `life / max_life` of the full width
    pub fn set_fraction(&mut self, life: i32, max_life: i32) {
        let fraction = if max_life > 0 {
            (life.max(0) as f32 / max_life as f32).min(1.0)
        } else {
            0.0
        };
        self.inner.size.x = (self.full_width as f32 * fraction).round() as i32;
    }
}

/// Combat record of an enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub life: i32,
    pub max_life: i32,
    /// Life the player loses on contact
    pub damage: i32,
    animation: Option<Animation>,
    pub health_bar: Option<HealthBar>,
}

impl Enemy {
    fn new(kind: EnemyKind, life: i32) -> Self {
        Self {
            kind,
            life,
            max_life: life,
            damage: life.min(ENEMY_MAX_DAMAGE),
            animation: None,
            health_bar: None,
        }
    }

    /// Subtract life. Returns true when the enemy should die.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        self.life -= damage;
        if let Some(bar) = &mut self.health_bar {
            bar.set_fraction(self.life, self.max_life);
        }
        self.life <= 0
    }

    /// Back to full life
    pub fn restore(&mut self) {
        self.life = self.max_life;
        if let Some(bar) = &mut self.health_bar {
            bar.set_fraction(self.life, self.max_life);
        }
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Per-frame behaviour. Returns true when the enemy has left the
    /// playfield on the left and should be despawned.
    pub fn update(&mut self, body: &mut Body, player: Rect, dt: f32, sprites: &Sprites) -> bool {
        match self.kind {
            EnemyKind::Basic | EnemyKind::MotherShip => {}
            EnemyKind::Chaser { .. } => chase_player(body, player, dt),
            EnemyKind::EnergyBall => {
                chase_player(body, player, dt);
                home_horizontally(body, player, dt);
            }
            EnemyKind::Generator { .. } => {
                self.animate(body, dt, sprites);
                return false;
            }
        }

        body.integrate(dt);
        self.animate(body, dt, sprites);
        body.rect().left() < 0
    }

    fn animate(&mut self, body: &mut Body, dt: f32, sprites: &Sprites) {
        if let Some(image) = self.animation.as_mut().and_then(|a| a.advance(dt)) {
            body.set_image(image, sprites.size(image));
        }
    }
}

/// Aim vertical velocity at the player's top edge.
///
/// Chasing only happens while the enemy's right edge is more than one enemy
/// width right of the player's left edge; past that point it flies level.
/// The speed would close the gap in one tick, capped at the enemy's maximum.
pub fn chase_player(body: &mut Body, player: Rect, dt: f32) {
    let rect = body.rect();
    let dx = player.left() - rect.right();
    let dy = player.top() - rect.top();

    let mut vy = 0.0;
    if dy != 0 && dx < -rect.width() {
        let speed = (dy.abs() as f32 / dt).min(body.max_velocity().y);
        vy = speed * dy.signum() as f32;
    }
    body.set_vy(vy);
}

/// Aim horizontal velocity at the player's centre (energy ball)
pub fn home_horizontally(body: &mut Body, player: Rect, dt: f32) {
    let dx = player.center().x - body.rect().center().x;
    let max = body.max_velocity().x;
    let vx = if dx == 0 {
        0.0
    } else {
        (dx as f32 / dt).clamp(-max, max)
    };
    body.set_vx(vx);
}

/// Enemy entering from the right spawn band, drifting left
fn drifting(
    kind: EnemyKind,
    image: ImageId,
    y: i32,
    speed: f32,
    life: i32,
    sprites: &Sprites,
    rng: &mut impl Rng,
) -> (Body, Enemy) {
    let x = rng.random_range(ENEMY_SPAWN_X_MIN..=ENEMY_SPAWN_X_MAX);
    let max_velocity = match kind {
        EnemyKind::Basic => Vec2::new(speed, 0.0),
        _ => Vec2::splat(speed),
    };
    let mut body = Body::new(
        kind.role(),
        IVec2::new(x, y),
        image,
        sprites.size(image),
        max_velocity,
    );
    body.set_vx(-speed);
    (body, Enemy::new(kind, life))
}

fn random_y(rng: &mut impl Rng) -> i32 {
    rng.random_range(ENEMY_SPAWN_Y_MIN..=ENEMY_SPAWN_Y_MAX)
}

/// Level 1 ship at the player's current height
pub fn basic(sprites: &Sprites, player_y: i32, rng: &mut impl Rng) -> (Body, Enemy) {
    drifting(
        EnemyKind::Basic,
        sprites.enemy[0],
        player_y,
        LEVEL1_SPEED,
        1,
        sprites,
        rng,
    )
}

/// Level 2 or 3 chaser at a random height
pub fn chaser(level: u8, sprites: &Sprites, rng: &mut impl Rng) -> (Body, Enemy) {
    let level = level.clamp(2, 3);
    let (image, speed) = if level == 2 {
        (sprites.enemy[1], LEVEL2_SPEED)
    } else {
        (sprites.enemy[2], LEVEL3_SPEED)
    };
    let y = random_y(rng);
    drifting(
        EnemyKind::Chaser { level },
        image,
        y,
        speed,
        level as i32,
        sprites,
        rng,
    )
}

/// Energy ball at a random height
pub fn energy_ball(sprites: &Sprites, rng: &mut impl Rng) -> (Body, Enemy) {
    let y = random_y(rng);
    let (body, mut enemy) = drifting(
        EnemyKind::EnergyBall,
        sprites.energy_ball[0],
        y,
        ENERGY_BALL_SPEED,
        ENERGY_BALL_LIFE,
        sprites,
        rng,
    );
    enemy.animation = Some(Animation::new(
        sprites.energy_ball.clone(),
        ANIMATION_PERIOD_TICKS * SIM_DT,
    ));
    (body, enemy)
}

/// Generator anchored at the shield's left edge
pub fn generator(slot: u8, shield: Rect, sprites: &Sprites) -> (Body, Enemy) {
    let y = if slot == 0 {
        GENERATOR_BOTTOM_Y
    } else {
        GENERATOR_TOP_Y
    };
    let image = sprites.generator[0];
    let body = Body::new(
        Role::Generator,
        IVec2::new(shield.left(), y),
        image,
        sprites.size(image),
        Vec2::ZERO,
    );
    let mut enemy = Enemy::new(EnemyKind::Generator { slot }, GENERATOR_LIFE);
    enemy.damage = 0;
    enemy.animation = Some(Animation::new(
        sprites.generator.clone(),
        ANIMATION_PERIOD_TICKS * SIM_DT,
    ));
    (body, enemy)
}

/// Mother ship, near the right edge and vertically centred
pub fn mother_ship(sprites: &Sprites) -> (Body, Enemy) {
    let image = sprites.mother_ship;
    let size = sprites.size(image);
    let x = (WIDTH as f32 - 1.05 * size.x as f32) as i32;
    let y = (HEIGHT - size.y) / 2;
    let body = Body::new(Role::MotherShip, IVec2::new(x, y), image, size, Vec2::ZERO);
    let mut enemy = Enemy::new(EnemyKind::MotherShip, MOTHER_SHIP_LIFE);
    enemy.health_bar = Some(HealthBar::above(body.rect()));
    (body, enemy)
}
