//! Entity bodies: position, image-derived bounds and sub-pixel motion
//!
//! Positions are whole pixels. Velocities are floats, so each axis keeps a
//! fractional remainder that is folded back in one pixel at a time. Slow
//! movers still travel the right average distance with no long-run drift.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::layers::LayerSet;
use crate::assets::ImageId;

/// Axis-aligned integer rectangle (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            pos: IVec2::new(x, y),
            size: IVec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.pos.y
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.size.y
    }

    pub fn center(&self) -> IVec2 {
        self.pos + self.size / 2
    }

    /// Strict overlap test. Touching edges and empty rects never collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.size.x > 0
            && self.size.y > 0
            && other.size.x > 0
            && other.size.y > 0
            && self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// What an entity is, used where rules single out specific roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Player,
    Laser,
    Level1Ship,
    Level2Ship,
    Level3Ship,
    EnergyBall,
    Generator,
    MotherShip,
    Shield,
    Hud,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "Yamato",
            Role::Laser => "Laser",
            Role::Level1Ship => "Level 1 Ship",
            Role::Level2Ship => "Level 2 Ship",
            Role::Level3Ship => "Level 3 Ship",
            Role::EnergyBall => "Energy Ball",
            Role::Generator => "Generator",
            Role::MotherShip => "Mother Ship",
            Role::Shield => "Shield",
            Role::Hud => "Hud",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared data of every game object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub role: Role,
    pub alive: bool,
    rect: Rect,
    image: ImageId,
    velocity: Vec2,
    max_velocity: Vec2,
    /// Sub-pixel movement not yet applied to `rect`
    remainder: Vec2,
    /// Layers currently holding this body
    pub(crate) layers: LayerSet,
}

impl Body {
    pub fn new(role: Role, pos: IVec2, image: ImageId, size: IVec2, max_velocity: Vec2) -> Self {
        Self {
            role,
            alive: true,
            rect: Rect { pos, size },
            image,
            velocity: Vec2::ZERO,
            max_velocity: max_velocity.abs(),
            remainder: Vec2::ZERO,
            layers: LayerSet::EMPTY,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn image(&self) -> ImageId {
        self.image
    }

    /// Swap the image; the rect takes the new image's size
    pub fn set_image(&mut self, image: ImageId, size: IVec2) {
        self.image = image;
        self.rect.size = size;
    }

    pub fn set_position(&mut self, pos: IVec2) {
        self.rect.pos = pos;
    }

    /// Move the right edge to `x`, keeping the width
    pub fn set_right(&mut self, x: i32) {
        self.rect.pos.x = x - self.rect.size.x;
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn max_velocity(&self) -> Vec2 {
        self.max_velocity
    }

    #[inline]
    pub fn remainder(&self) -> Vec2 {
        self.remainder
    }

    /// Set velocity, clamped per axis to the body's maximum speed
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity.clamp(-self.max_velocity, self.max_velocity);
    }

    pub fn set_vx(&mut self, vx: f32) {
        self.set_velocity(Vec2::new(vx, self.velocity.y));
    }

    pub fn set_vy(&mut self, vy: f32) {
        self.set_velocity(Vec2::new(self.velocity.x, vy));
    }

    /// Integrate velocity over `dt` into whole-pixel movement
    pub fn integrate(&mut self, dt: f32) {
        let step_x = integrate_axis(self.velocity.x, dt, &mut self.remainder.x);
        let step_y = integrate_axis(self.velocity.y, dt, &mut self.remainder.y);
        self.rect.pos += IVec2::new(step_x, step_y);
    }

    /// Zero velocity and sub-pixel state (used when an entity is reset)
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.remainder = Vec2::ZERO;
    }

    pub fn in_any_layer(&self) -> bool {
        !self.layers.is_empty()
    }

    pub fn layers(&self) -> LayerSet {
        self.layers
    }
}

/// Whole-pixel step for one axis.
///
/// The displacement is truncated toward zero and the cut-off fraction goes
/// into `remainder`. Once the remainder reaches one pixel in either
/// direction, that pixel joins this step.
pub fn integrate_axis(velocity: f32, dt: f32, remainder: &mut f32) -> i32 {
    let desired = velocity * dt;
    let whole = desired.trunc();
    *remainder += desired - whole;

    let mut step = whole as i32;
    if remainder.abs() >= 1.0 {
        let unit = remainder.signum();
        step += unit as i32;
        *remainder -= unit;
    }
    step
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body(max: f32) -> Body {
        Body::new(
            Role::Level1Ship,
            IVec2::new(100, 100),
            ImageId(0),
            IVec2::new(10, 10),
            Vec2::splat(max),
        )
    }

    #[test]
    fn whole_pixel_velocity_moves_exactly() {
        let mut b = body(1000.0);
        b.set_velocity(Vec2::new(30.0, -60.0));
        b.integrate(1.0);
        assert_eq!(b.rect().pos, IVec2::new(130, 40));
        assert_eq!(b.remainder(), Vec2::ZERO);
    }

    #[test]
    fn sub_pixel_velocity_accumulates() {
        // 0.25 px per step: one pixel every fourth step
        let mut b = body(1000.0);
        b.set_velocity(Vec2::new(0.25, -0.25));
        let mut xs = Vec::new();
        for _ in 0..8 {
            b.integrate(1.0);
            xs.push(b.rect().pos.x);
        }
        assert_eq!(xs, vec![100, 100, 100, 101, 101, 101, 101, 102]);
        assert_eq!(b.rect().pos.y, 98);
    }

    #[test]
    fn remainder_of_exactly_one_folds() {
        let mut rem = 0.5;
        let step = integrate_axis(0.5, 1.0, &mut rem);
        assert_eq!(step, 1);
        assert_eq!(rem, 0.0);

        let mut rem = -0.5;
        let step = integrate_axis(-0.5, 1.0, &mut rem);
        assert_eq!(step, -1);
        assert_eq!(rem, 0.0);
    }

    #[test]
    fn velocity_is_clamped_per_axis() {
        let mut b = body(300.0);
        b.set_velocity(Vec2::new(-900.0, 120.0));
        assert_eq!(b.velocity(), Vec2::new(-300.0, 120.0));
        b.set_vy(1e6);
        assert_eq!(b.velocity().y, 300.0);
    }

    #[test]
    fn rect_intersection_is_strict() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(&Rect::new(5, 5, 10, 10)));
        // Touching edges
        assert!(!a.intersects(&Rect::new(10, 0, 10, 10)));
        assert!(!a.intersects(&Rect::new(0, 10, 10, 10)));
        // Empty rect
        assert!(!a.intersects(&Rect::new(2, 2, 0, 5)));
    }

    #[test]
    fn set_image_resizes_rect() {
        let mut b = body(1.0);
        b.set_image(ImageId(3), IVec2::new(64, 40));
        assert_eq!(b.image(), ImageId(3));
        assert_eq!(b.rect().size, IVec2::new(64, 40));
        assert_eq!(b.rect().pos, IVec2::new(100, 100));
    }

    proptest! {
        #[test]
        fn integration_has_no_long_run_drift(
            v in -1000.0f32..1000.0,
            dts in proptest::collection::vec(0.001f32..0.1, 1..120),
        ) {
            let mut rem = 0.0f32;
            let mut moved: i64 = 0;
            let mut exact = 0.0f64;
            for dt in &dts {
                moved += integrate_axis(v, *dt, &mut rem) as i64;
                exact += (v * *dt) as f64;
                prop_assert!(rem.abs() < 1.0);
            }
            prop_assert!((moved as f64 - exact).abs() <= 1.0 + 1e-2);
            prop_assert!((moved as f64 - exact.round()).abs() <= 1.0);
        }
    }
}
