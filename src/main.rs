//! Void Skies headless runner
//!
//! Drives a session at a fixed 60 Hz with a built-in autopilot and prints the
//! final frame as JSON. Pass a seed as the first argument for a repeatable run,
//! and optionally a skill key (e.g. `drone`) the autopilot should favour.

use glam::Vec2;

use void_skies::consts::*;
use void_skies::sim::{
    FrameSnapshot, GameMode, SessionEvent, SessionState, Skill, TickInput, tick,
};

/// Two simulated minutes
const MAX_FRAMES: u32 = 60 * 120;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or_else(clock_seed);
    let favourite = args.next().and_then(|key| {
        let skill = Skill::from_key(&key);
        if skill.is_none() {
            log::warn!("Unknown skill key {:?}, taking first offers", key);
        }
        skill
    });
    log::info!("Void Skies (headless) starting with seed {}", seed);

    let mut state = SessionState::new(seed);
    let mut frames = 0;
    while frames < MAX_FRAMES {
        let input = autopilot(&state, favourite);
        tick(&mut state, &input, FRAME_DT);
        frames += 1;

        for event in state.drain_events() {
            report(&event);
        }
        if matches!(state.mode, GameMode::GameOver | GameMode::Quit) {
            break;
        }
    }

    let snapshot = FrameSnapshot::capture(&state);
    log::info!(
        "Stopped after {} frames in {:?}: {} ({} hostile shots in flight)",
        frames,
        snapshot.mode,
        snapshot.wave_banner(),
        snapshot.hostile_bullets().count()
    );
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode final frame: {}", e),
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Demo input: start immediately, both ships shadow the lowest enemy and keep
/// firing, and the favourite upgrade is taken when offered (else the first).
fn autopilot(state: &SessionState, favourite: Option<Skill>) -> TickInput {
    let mut input = TickInput::default();
    match state.mode {
        GameMode::Menu => {
            input.start = true;
            return input;
        }
        GameMode::LevelUp => {
            let slot = state
                .pending_level_up()
                .zip(favourite)
                .and_then(|(offer, skill)| offer.choices().iter().position(|&s| s == skill))
                .map_or(1, |i| i as u8 + 1);
            input.select = Some(slot);
        }
        _ => {}
    }

    let target = state
        .enemies
        .iter()
        .filter(|e| e.is_alive())
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|e| e.pos.x);

    // Pointer ship hovers near the bottom under its target
    let lane_y = FIELD_HEIGHT - 80.0;
    input.pointer = Vec2::new(target.unwrap_or(FIELD_WIDTH * 0.3), lane_y);

    for (slot, controls) in input.players.iter_mut().enumerate() {
        controls.fire = true;
        // Special whenever it is off cooldown
        controls.special = true;
        let Some(ship) = state.players.get(slot) else {
            continue;
        };
        if let Some(x) = target {
            controls.left = x < ship.pos.x - 4.0;
            controls.right = x > ship.pos.x + 4.0;
        }
        controls.down = ship.pos.y < lane_y;
    }
    input
}

fn report(event: &SessionEvent) {
    match event {
        SessionEvent::EnemyDestroyed { .. }
        | SessionEvent::EnemyEscaped { .. }
        | SessionEvent::PlayerHit { .. } => log::debug!("{:?}", event),
        SessionEvent::WaveCleared { wave } => log::info!("Wave {} cleared", wave),
        other => log::info!("{:?}", other),
    }
}
