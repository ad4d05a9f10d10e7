//! Per-frame simulation tick
//!
//! Interprets the frame's input according to the current [`GameMode`], then
//! advances the world if the mode calls for it.

use glam::Vec2;

use super::collision;
use super::state::{GameMode, SessionEvent, SessionState};
use super::wave;
use crate::consts::*;

/// Held controls for one ship
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub fire: bool,
    pub special: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Input snapshot for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in play-field coordinates
    pub pointer: Vec2,
    /// Held controls, indexed by session slot
    pub players: [PlayerInput; PLAYER_COUNT],
    /// Start button activated
    pub start: bool,
    /// Confirm key (starts from the menu, restarts after game over)
    pub confirm: bool,
    /// Pause toggle
    pub pause: bool,
    pub quit: bool,
    /// Level-up choice key (1, 2 or 3)
    pub select: Option<u8>,
}

/// Clamp a raw frame delta into the range the simulation accepts
#[inline]
pub fn clamp_frame_dt(dt: f32) -> f32 {
    // NaN collapses to 0 through max()
    dt.max(0.0).min(MAX_FRAME_DT)
}

/// Advance the session by one frame
pub fn tick(state: &mut SessionState, input: &TickInput, dt: f32) {
    let dt = clamp_frame_dt(dt);
    state.elapsed += dt;

    if state.mode == GameMode::Quit {
        return;
    }
    if input.quit {
        log::info!("Quit requested from {:?}", state.mode);
        state.mode = GameMode::Quit;
        state.events.push(SessionEvent::Quit);
        return;
    }

    apply_mode_input(state, input);

    // Fallback for hosts that can't deliver the start action
    if state.mode == GameMode::Menu && !state.auto_started && state.elapsed > AUTO_START_DELAY {
        log::info!("Auto-starting after {:.2}s in menu", state.elapsed);
        state.auto_started = true;
        state.start_session();
    }

    for (player, controls) in state.players.iter_mut().zip(input.players.iter()) {
        player.want_fire = controls.fire;
    }

    if state.mode.simulates() {
        simulate(state, input, dt);
    }
}

/// Mode transitions driven by discrete input events. Anything a mode does
/// not accept is dropped.
fn apply_mode_input(state: &mut SessionState, input: &TickInput) {
    match state.mode {
        GameMode::Menu => {
            if input.start || input.confirm {
                state.start_session();
            } else if input.pause || input.select.is_some() {
                log::debug!("Ignoring input in menu");
            }
        }
        GameMode::Playing => {
            if input.pause {
                state.mode = GameMode::Paused;
            }
        }
        GameMode::Paused => {
            if input.pause {
                state.mode = GameMode::Playing;
            }
        }
        GameMode::LevelUp => {
            if let Some(selection) = input.select {
                choose_skill(state, selection);
            }
        }
        GameMode::GameOver => {
            if input.confirm {
                state.start_session();
            }
        }
        GameMode::Quit => {}
    }
}

/// Apply the `selection`-th (1-based) choice of the front level-up offer.
/// Returns false, changing nothing, if there is no offer or the key is out
/// of range.
pub fn choose_skill(state: &mut SessionState, selection: u8) -> bool {
    let Some(offer) = state.pending_level_up().copied() else {
        log::debug!("Choice {} with no pending level-up ignored", selection);
        return false;
    };
    let Some(skill) = offer.select(selection) else {
        log::debug!("Choice {} out of range ignored", selection);
        return false;
    };
    let Some(player) = state.players.get_mut(offer.player) else {
        return false;
    };

    skill.apply(player);
    log::info!(
        "Player {} took {} at level {}",
        player.id,
        skill.display_name(),
        offer.level
    );
    state.events.push(SessionEvent::SkillApplied {
        player: offer.player,
        skill,
    });

    state.level_ups.pop_front();
    if state.level_ups.is_empty() && state.mode == GameMode::LevelUp {
        state.mode = GameMode::Playing;
    }
    true
}

/// One step of the world: ships, bullets, enemies, collisions, particles,
/// cleanup, then the wave-clear check.
fn simulate(state: &mut SessionState, input: &TickInput, dt: f32) {
    let pointer = input.pointer;
    for (index, player) in state.players.iter_mut().enumerate() {
        let controls = input.players.get(index).copied().unwrap_or_default();
        player.advance(
            index,
            dt,
            pointer,
            &controls,
            &mut state.rng,
            &mut state.bullets,
        );
    }

    for bullet in state.bullets.iter_mut() {
        bullet.advance(dt);
    }

    for enemy in state.enemies.iter_mut() {
        let was_alive = enemy.is_alive();
        if let Some(shot) = enemy.advance(dt, &mut state.rng) {
            state.bullets.push(shot);
        }
        if was_alive && enemy.escaped() {
            state.events.push(SessionEvent::EnemyEscaped { id: enemy.id });
        }
    }

    let report = collision::resolve(state);
    if report != collision::CollisionReport::default() {
        log::debug!("Wave {} collisions: {:?}", state.wave, report);
    }

    for particle in state.particles.iter_mut() {
        particle.advance(dt);
    }
    state.cleanup();

    debug_assert!(state.players.iter().all(|p| p.hp >= 0));
    wave::check_wave_clear(state);
}
