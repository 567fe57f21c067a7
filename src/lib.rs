//! Alien Raid - A side-scrolling space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, layers, combat, spawning, game loop)
//! - `app`: Screen flow around the simulation (opening, victory, game over)
//! - `renderer`: Draw-call abstraction and an in-memory draw list
//! - `audio`: Named sound effects, music tracks and the in-memory mixer
//! - `platform`: Input sources and frame pacing
//! - `assets`: Image manifest and sprite handles

pub mod app;
pub mod assets;
pub mod audio;
pub mod autopilot;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const WIDTH: i32 = 1280;
    pub const HEIGHT: i32 = 720;

    /// Frames per second of the fixed loop
    pub const FPS: u32 = 30;
    /// Fixed simulation timestep (one frame)
    pub const SIM_DT: f32 = 1.0 / FPS as f32;

    /// Player defaults
    pub const PLAYER_START_X: i32 = 200;
    pub const PLAYER_START_Y: i32 = 350;
    pub const PLAYER_MAX_SPEED: f32 = 300.0;
    pub const PLAYER_LIFE: i32 = 1;
    pub const PLAYER_MAX_LEVEL: u8 = 4;

    /// Laser speed (rightward only)
    pub const LASER_SPEED: f32 = 900.0;

    /// Enemy spawn band, right side of the playfield
    pub const ENEMY_SPAWN_X_MIN: i32 = 800;
    pub const ENEMY_SPAWN_X_MAX: i32 = 1050;
    /// Random spawn height band for chasers and energy balls
    pub const ENEMY_SPAWN_Y_MIN: i32 = 20;
    pub const ENEMY_SPAWN_Y_MAX: i32 = 651;
    /// Contact damage never exceeds this, whatever the life total
    pub const ENEMY_MAX_DAMAGE: i32 = 3;

    pub const LEVEL1_SPEED: f32 = 500.0;
    pub const LEVEL2_SPEED: f32 = 240.0;
    pub const LEVEL3_SPEED: f32 = 280.0;

    pub const ENERGY_BALL_SPEED: f32 = 300.0;
    pub const ENERGY_BALL_LIFE: i32 = 10;
    pub const ENERGY_BALL_VOLUME: f32 = 0.7;

    pub const GENERATOR_LIFE: i32 = 50;
    /// Generator y for the bottom (slot 0) and top (slot 1) anchors
    pub const GENERATOR_BOTTOM_Y: i32 = 593;
    pub const GENERATOR_TOP_Y: i32 = -64;

    pub const MOTHER_SHIP_LIFE: i32 = 200;

    /// Animated sprites cycle this many frames, one step every N ticks
    pub const ANIMATION_FRAMES: usize = 4;
    pub const ANIMATION_PERIOD_TICKS: f32 = 2.0;

    /// Spawn cadence (seconds unless noted)
    pub const WAVE_PERIOD: f32 = 5.0;
    pub const NEW_SHIP_PERIOD_TICKS: f32 = 9.0;
    pub const ENERGY_BALL_PERIOD: f32 = 10.0;
    pub const SHIPS_PER_WAVE: u32 = 5;

    /// Generators that must fall before the shield drops
    pub const GENERATORS_FOR_SHIELD: u32 = 2;
}
