//! Wave scheduling
//!
//! Each wave drops its whole population at once along the top edge; clearing
//! it pays every ship a flat bonus and the next wave follows immediately.

use glam::Vec2;
use rand::Rng;

use super::entities::{Enemy, EnemyKind};
use super::state::{GameMode, SessionEvent, SessionState};
use crate::consts::*;

/// Enemies in a given wave
#[inline]
pub fn wave_size(wave: u32) -> u32 {
    WAVE_BASE_SIZE + wave * WAVE_SIZE_PER_WAVE
}

/// Spawn the current wave's enemies just above the visible field
pub fn spawn_wave(state: &mut SessionState) {
    let count = wave_size(state.wave);
    for _ in 0..count {
        let x = state
            .rng
            .random_range(ENEMY_SPAWN_MARGIN..FIELD_WIDTH - ENEMY_SPAWN_MARGIN);
        let kind = if state.rng.random_bool(HEAVY_ENEMY_CHANCE) {
            EnemyKind::Heavy
        } else {
            EnemyKind::Basic
        };
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::new(id, Vec2::new(x, ENEMY_SPAWN_Y), kind));
    }

    log::info!("Wave {} spawned with {} enemies", state.wave, count);
    state.events.push(SessionEvent::WaveSpawned {
        wave: state.wave,
        enemies: count,
    });
}

/// Advance to the next wave once the field is empty. Only fires while
/// playing; a pending level-up choice holds the next wave back.
pub fn check_wave_clear(state: &mut SessionState) -> bool {
    if state.mode != GameMode::Playing || !state.enemies.is_empty() {
        return false;
    }

    let cleared = state.wave;
    state.events.push(SessionEvent::WaveCleared { wave: cleared });
    state.wave += 1;
    log::debug!("Wave {} cleared, bonus to {} ships", cleared, state.players.len());
    for player in 0..state.players.len() {
        state.reward(player, WAVE_CLEAR_XP, WAVE_CLEAR_PARTS);
    }
    spawn_wave(state);
    true
}
