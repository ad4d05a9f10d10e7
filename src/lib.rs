//! Void Skies - a two-player cooperative arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, progression, waves, game modes)
//!
//! Rendering, input polling and audio are host concerns: the host feeds a
//! [`sim::TickInput`] per frame and draws the [`sim::FrameSnapshot`] it gets back.

pub mod sim;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game balance constants
pub mod consts {
    /// Play-field dimensions
    pub const FIELD_WIDTH: f32 = 960.0;
    pub const FIELD_HEIGHT: f32 = 540.0;

    /// Fixed step used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta the simulation accepts (stall protection)
    pub const MAX_FRAME_DT: f32 = 0.033;
    /// Menu falls through to a new session after this long
    pub const AUTO_START_DELAY: f32 = 0.9;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_MARGIN: f32 = 20.0;
    pub const PLAYER_BASE_HP: i32 = 100;
    pub const PLAYER_BASE_SPEED: f32 = 180.0;
    pub const PLAYER_FIRE_COOLDOWN: f32 = 0.22;
    pub const PLAYER_BULLET_DAMAGE: i32 = 10;
    pub const PLAYER_SPECIAL_COOLDOWN: f32 = 10.0;
    pub const PLAYER_SPECIAL_DURATION: f32 = 3.0;
    /// Distance under which a pointer-controlled ship stops chasing the pointer
    pub const POINTER_DEADZONE: f32 = 1.0;
    pub const PLAYER_BULLET_SPEED: f32 = 360.0;
    /// Horizontal offset of the twin guns
    pub const GUN_OFFSET_X: f32 = 6.0;
    pub const GUN_OFFSET_Y: f32 = 12.0;

    /// Drone attachment
    pub const DRONE_BULLET_SPEED: f32 = 340.0;
    pub const DRONE_OFFSET_Y: f32 = 24.0;
    /// One shot per this many equally likely outcomes each tick
    pub const DRONE_FIRE_ODDS: u32 = 26;

    /// Enemies
    pub const ENEMY_RADIUS: f32 = 14.0;
    pub const ENEMY_SPAWN_Y: f32 = -30.0;
    pub const ENEMY_SPAWN_MARGIN: f32 = 40.0;
    pub const ENEMY_ESCAPE_MARGIN: f32 = 30.0;
    pub const ENEMY_WEAVE_FREQUENCY: f32 = 3.0;
    pub const ENEMY_FIRE_CHANCE: f64 = 0.005;
    pub const ENEMY_BULLET_SPEED: f32 = 180.0;
    pub const ENEMY_MUZZLE_OFFSET: f32 = 10.0;
    pub const HEAVY_ENEMY_CHANCE: f64 = 0.35;

    /// Bullets
    pub const BULLET_RADIUS: f32 = 3.0;
    pub const BULLET_BOUNDS_MARGIN: f32 = 10.0;
    /// Damage carried by bullets not fired from a player's guns
    pub const FIXED_BULLET_DAMAGE: i32 = 6;

    /// Contact damage
    pub const ENEMY_BULLET_HIT_DAMAGE: i32 = 12;
    pub const ENEMY_RAM_DAMAGE: i32 = 18;

    /// Particles
    pub const PARTICLE_LIFETIME: f32 = 0.6;
    pub const PARTICLE_GRAVITY: f32 = 60.0;
    pub const POP_PARTICLES: usize = 12;
    pub const HIT_PARTICLES: usize = 8;

    /// Progression
    pub const BASE_XP_TO_NEXT: u32 = 60;
    pub const XP_GROWTH: f32 = 1.35;
    pub const LEVEL_CHOICE_COUNT: usize = 3;
    pub const LEVEL_CHOICE_SEED_BASE: u64 = 42;

    /// Waves
    pub const WAVE_BASE_SIZE: u32 = 8;
    pub const WAVE_SIZE_PER_WAVE: u32 = 2;
    pub const WAVE_CLEAR_XP: f32 = 20.0;
    pub const WAVE_CLEAR_PARTS: f32 = 10.0;

    /// Session always runs with exactly this many ships
    pub const PLAYER_COUNT: usize = 2;
}

/// 8-bit RGB color handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const PLAYER_ONE: Rgb = Rgb(96, 165, 250);
    pub const PLAYER_TWO: Rgb = Rgb(244, 114, 182);
    pub const GOLD: Rgb = Rgb(253, 224, 71);
    pub const RED: Rgb = Rgb(248, 113, 113);
    pub const DRONE: Rgb = Rgb(167, 243, 208);
}

/// Strict circle-circle overlap: touching circles do not collide
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}
