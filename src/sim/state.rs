//! Session state and core simulation types
//!
//! Everything a play session owns lives in [`SessionState`]; subsystems get it
//! passed by reference instead of reaching for globals.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Bullet, Enemy, Particle, Player};
use super::progression::{LevelUpOffer, Skill};
use crate::consts::*;

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Title screen, waiting for start (or the auto-start delay)
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen until the pause key is pressed again
    Paused,
    /// A ship is choosing an upgrade; simulation keeps running
    LevelUp,
    /// A ship was destroyed
    GameOver,
    /// Host should shut down
    Quit,
}

impl GameMode {
    /// Modes that advance the simulation each tick
    pub fn simulates(self) -> bool {
        matches!(self, GameMode::Playing | GameMode::LevelUp)
    }
}

/// Things that happened during a tick, for HUD/audio hosts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    SessionStarted { seed: u64 },
    WaveSpawned { wave: u32, enemies: u32 },
    EnemyDestroyed { id: u32, pos: Vec2, value: u32 },
    /// Enemy rammed a ship and died without paying out
    EnemyRammed { id: u32, player: usize },
    EnemyEscaped { id: u32 },
    PlayerHit { player: usize, damage: i32, hp: i32 },
    LevelUpQueued { player: usize, level: u32 },
    SkillApplied { player: usize, skill: Skill },
    WaveCleared { wave: u32 },
    GameOver { wave: u32 },
    Quit,
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Seed of the current session's RNG
    pub seed: u64,
    /// Gameplay RNG (spawns, enemy fire, drone, particles)
    pub rng: Pcg32,
    pub mode: GameMode,
    /// Seconds since the host launched (menu auto-start uses this)
    pub elapsed: f32,
    /// Set once the menu has fallen through to a session on its own
    pub auto_started: bool,
    /// 1-based wave number
    pub wave: u32,
    /// Shared parts pool
    pub currency: u32,
    pub players: Vec<Player>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    /// Pending level-up decisions, front is the one on screen
    pub level_ups: VecDeque<LevelUpOffer>,
    /// Events produced since the host last drained them
    pub events: Vec<SessionEvent>,
    next_id: u32,
}

impl SessionState {
    /// Fresh state sitting in the menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            mode: GameMode::Menu,
            elapsed: 0.0,
            auto_started: false,
            wave: 1,
            currency: 0,
            players: Vec::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            level_ups: VecDeque::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset everything session-scoped and start playing wave 1
    pub fn start_session(&mut self) {
        self.players = Player::starting_pair().into();
        self.enemies.clear();
        self.bullets.clear();
        self.particles.clear();
        self.level_ups.clear();
        self.wave = 1;
        self.currency = 0;
        self.next_id = 1;
        self.mode = GameMode::Playing;
        debug_assert_eq!(self.players.len(), PLAYER_COUNT);

        log::info!("Session started (seed {})", self.seed);
        self.events.push(SessionEvent::SessionStarted { seed: self.seed });
        super::wave::spawn_wave(self);
    }

    /// Offer currently waiting for a selection
    pub fn pending_level_up(&self) -> Option<&LevelUpOffer> {
        self.level_ups.front()
    }

    /// Credit one ship: parts go to the shared pool, level-ups are queued
    pub fn reward(&mut self, player: usize, xp: f32, parts: f32) {
        let Some(ship) = self.players.get_mut(player) else {
            log::debug!("Reward for unknown player slot {} ignored", player);
            return;
        };
        let earned = ship.earn(xp, parts);
        let level = ship.level;
        self.currency += earned.currency;

        // One offer per crossed level, oldest level first
        for reached in (level + 1 - earned.levels_gained)..=level {
            self.queue_level_up(LevelUpOffer {
                player,
                level: reached,
            });
        }
    }

    fn queue_level_up(&mut self, offer: LevelUpOffer) {
        if matches!(self.mode, GameMode::GameOver | GameMode::Quit) {
            return;
        }
        log::info!("Player slot {} reached level {}", offer.player, offer.level);
        self.level_ups.push_back(offer);
        self.events.push(SessionEvent::LevelUpQueued {
            player: offer.player,
            level: offer.level,
        });
        if self.mode == GameMode::Playing {
            self.mode = GameMode::LevelUp;
        }
    }

    /// Damage a ship; a fatal hit ends the session
    pub fn damage_player(&mut self, player: usize, damage: i32) {
        let Some(ship) = self.players.get_mut(player) else {
            return;
        };
        let fatal = ship.hit(damage);
        let hp = ship.hp;
        debug_assert!((0..=ship.stats.max_hp).contains(&hp));
        self.events.push(SessionEvent::PlayerHit {
            player,
            damage,
            hp,
        });
        if fatal {
            self.game_over();
        }
    }

    pub fn game_over(&mut self) {
        if matches!(self.mode, GameMode::GameOver | GameMode::Quit) {
            return;
        }
        log::info!("Game over on wave {} with {} parts", self.wave, self.currency);
        self.mode = GameMode::GameOver;
        self.level_ups.clear();
        self.events.push(SessionEvent::GameOver { wave: self.wave });
    }

    /// Drop dead bullets, enemies and particles
    pub fn cleanup(&mut self) {
        self.bullets.retain(Bullet::is_alive);
        self.enemies.retain(Enemy::is_alive);
        self.particles.retain(Particle::is_alive);
    }

    /// Hand the accumulated events to the host
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
