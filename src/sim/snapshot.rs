//! Render-facing view of a session
//!
//! A [`FrameSnapshot`] owns all of its data, so a renderer on another thread
//! can hold the previous frame while the simulation writes the next one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::EnemyKind;
use super::progression::Skill;
use super::state::{GameMode, SessionState};
use crate::Rgb;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
    pub hp: i32,
    pub max_hp: i32,
    pub hp_fraction: f32,
    pub special_active: bool,
    pub level: u32,
    pub xp_fraction: f32,
    pub skill_points: u32,
    pub drone: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: EnemyKind,
    pub hp: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
    /// Fired by an enemy
    pub hostile: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub color: Rgb,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillChoice {
    /// Key that selects it (1-based)
    pub slot: u8,
    pub skill: Skill,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUpView {
    /// HUD id of the ship choosing
    pub player_id: u32,
    pub level: u32,
    pub choices: Vec<SkillChoice>,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub mode: GameMode,
    pub wave: u32,
    pub currency: u32,
    pub elapsed: f32,
    pub players: Vec<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub particles: Vec<ParticleView>,
    pub level_up: Option<LevelUpView>,
}

impl FrameSnapshot {
    pub fn capture(state: &SessionState) -> Self {
        let players = state
            .players
            .iter()
            .map(|p| PlayerView {
                id: p.id,
                pos: p.pos,
                radius: p.radius,
                color: p.color,
                hp: p.hp,
                max_hp: p.stats.max_hp,
                hp_fraction: p.hp_fraction(),
                special_active: p.special_is_active(),
                level: p.level,
                xp_fraction: p.xp_fraction(),
                skill_points: p.skill_points,
                drone: p.drone.is_some(),
            })
            .collect();

        let enemies = state
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| EnemyView {
                pos: e.pos,
                radius: e.radius,
                kind: e.kind,
                hp: e.hp,
            })
            .collect();

        let bullets = state
            .bullets
            .iter()
            .filter(|b| b.is_alive())
            .map(|b| BulletView {
                pos: b.pos,
                radius: b.radius,
                color: b.color,
                hostile: !b.is_friendly(),
            })
            .collect();

        let particles = state
            .particles
            .iter()
            .filter(|p| p.is_alive())
            .map(|p| ParticleView {
                pos: p.pos,
                color: p.color,
                alpha: p.alpha(),
            })
            .collect();

        let level_up = match state.mode {
            GameMode::LevelUp => state.pending_level_up().and_then(|offer| {
                let player = state.players.get(offer.player)?;
                let choices = offer
                    .choices()
                    .iter()
                    .zip(1u8..)
                    .map(|(&skill, slot)| SkillChoice {
                        slot,
                        skill,
                        name: skill.display_name().to_string(),
                    })
                    .collect();
                Some(LevelUpView {
                    player_id: player.id,
                    level: offer.level,
                    choices,
                })
            }),
            _ => None,
        };

        Self {
            mode: state.mode,
            wave: state.wave,
            currency: state.currency,
            elapsed: state.elapsed,
            players,
            enemies,
            bullets,
            particles,
            level_up,
        }
    }

    /// Hostile bullets on screen
    pub fn hostile_bullets(&self) -> impl Iterator<Item = &BulletView> {
        self.bullets.iter().filter(|b| b.hostile)
    }

    /// HUD center line, e.g. "Wave 3   Parts: 120"
    pub fn wave_banner(&self) -> String {
        format!("Wave {}   Parts: {}", self.wave, self.currency)
    }
}
