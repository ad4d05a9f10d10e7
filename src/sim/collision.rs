//! Circle-circle collision passes between entity populations
//!
//! Pass order is fixed for deterministic outcomes:
//! 1. player bullets vs enemies
//! 2. enemy bullets vs players
//! 3. enemies ramming players

use glam::Vec2;

use super::entities::{Burst, Particle};
use super::state::{SessionEvent, SessionState};
use crate::circles_overlap;
use crate::consts::*;

/// What a collision pass did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Enemies shot down (rewarded)
    pub kills: u32,
    /// Enemy bullets that struck a ship
    pub player_hits: u32,
    /// Enemy-ship contacts (not rewarded)
    pub rams: u32,
}

struct Kill {
    id: u32,
    pos: Vec2,
    value: u32,
}

/// Run all three passes in order
pub fn resolve(state: &mut SessionState) -> CollisionReport {
    let kills = player_bullets_vs_enemies(state);
    let player_hits = enemy_bullets_vs_players(state);
    let rams = enemies_vs_players(state);
    CollisionReport {
        kills,
        player_hits,
        rams,
    }
}

/// Each bullet lands on at most one enemy; an enemy can soak several
/// bullets in the same tick.
fn player_bullets_vs_enemies(state: &mut SessionState) -> u32 {
    let mut kills = Vec::new();

    for bullet in state.bullets.iter_mut() {
        if !bullet.is_alive() || !bullet.is_friendly() {
            continue;
        }
        for enemy in state.enemies.iter_mut() {
            if !enemy.is_alive() {
                continue;
            }
            if circles_overlap(bullet.pos, bullet.radius, enemy.pos, enemy.radius) {
                enemy.hp -= bullet.damage;
                bullet.destroy();
                if enemy.hp <= 0 {
                    enemy.destroy();
                    kills.push(Kill {
                        id: enemy.id,
                        pos: enemy.pos,
                        value: enemy.value,
                    });
                }
                break;
            }
        }
    }

    let count = kills.len() as u32;
    for kill in kills {
        Particle::burst(&mut state.rng, kill.pos, Burst::Pop, &mut state.particles);
        state.events.push(SessionEvent::EnemyDestroyed {
            id: kill.id,
            pos: kill.pos,
            value: kill.value,
        });
        split_reward(state, kill.value);
    }
    count
}

/// Share a kill between every ship: full value as xp, half (truncated) as parts
fn split_reward(state: &mut SessionState, value: u32) {
    let ships = state.players.len();
    debug_assert!(ships > 0, "session has no players");
    if ships == 0 {
        return;
    }
    let xp = value as f32 / ships as f32;
    let parts = (value / 2) as f32 / ships as f32;
    for player in 0..ships {
        state.reward(player, xp, parts);
    }
}

fn enemy_bullets_vs_players(state: &mut SessionState) -> u32 {
    let mut hits = 0;
    for b in 0..state.bullets.len() {
        let bullet = &state.bullets[b];
        if !bullet.is_alive() || bullet.is_friendly() {
            continue;
        }
        let (pos, radius) = (bullet.pos, bullet.radius);

        let target = state
            .players
            .iter()
            .position(|p| circles_overlap(pos, radius, p.pos, p.radius));
        if let Some(player) = target {
            state.bullets[b].destroy();
            state.damage_player(player, ENEMY_BULLET_HIT_DAMAGE);
            let ship = &state.players[player];
            let (at, color) = (ship.pos, ship.color);
            Particle::burst(&mut state.rng, at, Burst::Hit(color), &mut state.particles);
            hits += 1;
        }
    }
    hits
}

/// An enemy crashes into every ship it touches this tick, then is gone.
/// Returns the number of ship contacts.
fn enemies_vs_players(state: &mut SessionState) -> u32 {
    let mut rams = 0;
    for e in 0..state.enemies.len() {
        let enemy = &state.enemies[e];
        if !enemy.is_alive() {
            continue;
        }
        let (id, pos, radius) = (enemy.id, enemy.pos, enemy.radius);

        let targets: Vec<usize> = state
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| circles_overlap(pos, radius, p.pos, p.radius))
            .map(|(i, _)| i)
            .collect();
        if targets.is_empty() {
            continue;
        }

        state.enemies[e].destroy();
        for player in targets {
            state.damage_player(player, ENEMY_RAM_DAMAGE);
            Particle::burst(&mut state.rng, pos, Burst::Pop, &mut state.particles);
            state.events.push(SessionEvent::EnemyRammed { id, player });
            rams += 1;
        }
    }
    rams
}
