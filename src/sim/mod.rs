//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given a seed and the same inputs, a session
//! replays identically:
//! - One seeded RNG for gameplay, a separate per-level one for upgrade offers
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entities;
pub mod progression;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{CollisionReport, resolve};
pub use entities::{
    Bullet, BulletOwner, Burst, ControlMode, Drone, Enemy, EnemyKind, Particle, Player, PlayerStats,
};
pub use progression::{Earnings, LevelUpOffer, Skill, level_up_choices};
pub use snapshot::{FrameSnapshot, LevelUpView, SkillChoice};
pub use state::{GameMode, SessionEvent, SessionState};
pub use tick::{PlayerInput, TickInput, choose_skill, clamp_frame_dt, tick};
pub use wave::{check_wave_clear, spawn_wave, wave_size};
