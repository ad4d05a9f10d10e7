//! Experience, levelling and skill upgrades

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Drone, Player};
use crate::consts::*;

/// Every upgrade a level-up can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Skill {
    Gunnery1,
    Gunnery2,
    Shields1,
    Shields2,
    Engine1,
    Reactor,
    Focus,
    Drone,
    Salvage,
}

impl Skill {
    /// Draw pool for level-up choices (order matters for seeded draws)
    pub const ALL: [Skill; 9] = [
        Skill::Gunnery1,
        Skill::Gunnery2,
        Skill::Shields1,
        Skill::Shields2,
        Skill::Engine1,
        Skill::Reactor,
        Skill::Focus,
        Skill::Drone,
        Skill::Salvage,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Skill::Gunnery1 => "gunnery1",
            Skill::Gunnery2 => "gunnery2",
            Skill::Shields1 => "shields1",
            Skill::Shields2 => "shields2",
            Skill::Engine1 => "engine1",
            Skill::Reactor => "reactor",
            Skill::Focus => "focus",
            Skill::Drone => "drone",
            Skill::Salvage => "salvage",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Skill::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Skill::Gunnery1 => "Gunnery I",
            Skill::Gunnery2 => "Gunnery II",
            Skill::Shields1 => "Shield Plating I",
            Skill::Shields2 => "Shield Plating II",
            Skill::Engine1 => "Engine Tuning",
            Skill::Reactor => "Reactor Overdrive",
            Skill::Focus => "Targeting Focus",
            Skill::Drone => "Auto-Drone",
            Skill::Salvage => "Salvage Ops",
        }
    }

    /// Apply this upgrade to a ship. Each skill touches exactly one stat
    /// (or attaches the drone).
    pub fn apply(self, player: &mut Player) {
        let stats = &mut player.stats;
        match self {
            Skill::Gunnery1 => stats.bullet_damage = scale_floor(stats.bullet_damage, 1.2),
            Skill::Gunnery2 => stats.bullet_damage = scale_floor(stats.bullet_damage, 1.25),
            Skill::Shields1 => {
                stats.max_hp = scale_floor(stats.max_hp, 1.25);
                player.hp = stats.max_hp;
            }
            Skill::Shields2 => {
                stats.max_hp = scale_floor(stats.max_hp, 1.35);
                player.hp = stats.max_hp;
            }
            Skill::Engine1 => stats.speed *= 1.15,
            Skill::Reactor => stats.special_duration *= 2.0,
            Skill::Focus => stats.fire_cooldown *= 0.8,
            Skill::Drone => {
                if player.drone.is_none() {
                    player.drone = Some(Drone::default());
                }
            }
            Skill::Salvage => stats.parts_bonus = stats.parts_bonus.max(1.25),
        }
        player.skills.insert(self);
    }
}

#[inline]
fn scale_floor(value: i32, factor: f32) -> i32 {
    (value as f32 * factor).floor() as i32
}

/// The three skills offered when a ship reaches `level`.
///
/// Seeded from the level alone so a given level always offers the same
/// set; uses its own generator and never advances the session RNG.
pub fn level_up_choices(level: u32) -> [Skill; LEVEL_CHOICE_COUNT] {
    let mut rng = Pcg32::seed_from_u64(LEVEL_CHOICE_SEED_BASE + level as u64);
    let picks = rand::seq::index::sample(&mut rng, Skill::ALL.len(), LEVEL_CHOICE_COUNT);
    let mut choices = [Skill::Gunnery1; LEVEL_CHOICE_COUNT];
    for (slot, idx) in choices.iter_mut().zip(picks.iter()) {
        *slot = Skill::ALL[idx];
    }
    choices
}

/// What one `earn` call produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Earnings {
    /// Parts to add to the shared pool (after this ship's bonus)
    pub currency: u32,
    /// Levels crossed by this call
    pub levels_gained: u32,
}

impl Player {
    /// Credit experience and parts. Parts are scaled by `parts_bonus` and
    /// truncated; the caller owns the shared pool and the level-up queue.
    pub fn earn(&mut self, xp: f32, parts: f32) -> Earnings {
        self.xp += xp;
        let currency = (parts * self.stats.parts_bonus).max(0.0) as u32;

        let mut levels_gained = 0;
        while self.xp >= self.xp_to_next as f32 {
            self.level += 1;
            self.skill_points += 1;
            self.xp -= self.xp_to_next as f32;
            self.xp_to_next = (self.xp_to_next as f32 * XP_GROWTH).floor() as u32;
            levels_gained += 1;
        }

        Earnings {
            currency,
            levels_gained,
        }
    }

    /// Progress toward the next level in [0, 1]
    pub fn xp_fraction(&self) -> f32 {
        if self.xp_to_next == 0 {
            return 0.0;
        }
        (self.xp / self.xp_to_next as f32).clamp(0.0, 1.0)
    }
}

/// A pending level-up decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpOffer {
    /// Session slot of the ship that is choosing
    pub player: usize,
    /// Level the ship reached; fixes the offered choices
    pub level: u32,
}

impl LevelUpOffer {
    pub fn choices(&self) -> [Skill; LEVEL_CHOICE_COUNT] {
        level_up_choices(self.level)
    }

    /// Skill behind a 1-based selection key, if any
    pub fn select(&self, selection: u8) -> Option<Skill> {
        let idx = usize::from(selection).checked_sub(1)?;
        self.choices().get(idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rgb;
    use crate::sim::entities::ControlMode;
    use glam::Vec2;

    fn ship() -> Player {
        Player::new(1, Vec2::new(100.0, 100.0), Rgb::PLAYER_ONE, ControlMode::Pointer)
    }

    #[test]
    fn test_exact_threshold_levels_once() {
        let mut p = ship();
        let earned = p.earn(60.0, 0.0);
        assert_eq!(earned.levels_gained, 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.xp_to_next, 81);
        assert_eq!(p.xp, 0.0);
        assert_eq!(p.skill_points, 1);
    }

    #[test]
    fn test_overflow_keeps_remainder() {
        let mut p = ship();
        let earned = p.earn(100.0, 0.0);
        assert_eq!(earned.levels_gained, 1);
        assert_eq!(p.xp, 40.0);
        assert_eq!(p.xp_to_next, 81);
        assert_eq!(p.skill_points, 1);
    }

    #[test]
    fn test_large_award_crosses_several_levels() {
        let mut p = ship();
        // 60 + 81 + 109 = 250
        let earned = p.earn(250.0, 0.0);
        assert_eq!(earned.levels_gained, 3);
        assert_eq!(p.level, 4);
        assert_eq!(p.xp_to_next, 147);
        assert_eq!(p.xp, 0.0);
    }

    #[test]
    fn test_parts_bonus_truncates() {
        let mut p = ship();
        assert_eq!(p.earn(0.0, 4.5).currency, 4);
        p.stats.parts_bonus = 1.25;
        assert_eq!(p.earn(0.0, 4.5).currency, 5);
        assert_eq!(p.earn(0.0, 3.0).currency, 3);
    }

    #[test]
    fn test_skill_effects() {
        let mut p = ship();
        Skill::Gunnery1.apply(&mut p);
        assert_eq!(p.stats.bullet_damage, 12);
        Skill::Gunnery2.apply(&mut p);
        assert_eq!(p.stats.bullet_damage, 15);

        p.hp = 10;
        Skill::Shields1.apply(&mut p);
        assert_eq!(p.stats.max_hp, 125);
        assert_eq!(p.hp, 125);
        Skill::Shields2.apply(&mut p);
        assert_eq!(p.stats.max_hp, 168);
        assert_eq!(p.hp, 168);

        Skill::Engine1.apply(&mut p);
        assert!((p.stats.speed - 207.0).abs() < 1e-3);
        Skill::Reactor.apply(&mut p);
        assert_eq!(p.stats.special_duration, 6.0);
        Skill::Focus.apply(&mut p);
        assert!((p.stats.fire_cooldown - 0.176).abs() < 1e-6);
        Skill::Salvage.apply(&mut p);
        assert_eq!(p.stats.parts_bonus, 1.25);

        assert!(p.drone.is_none());
        Skill::Drone.apply(&mut p);
        assert!(p.drone.is_some());
        assert_eq!(p.skills.len(), 9);
    }

    #[test]
    fn test_skills_never_lower_stats() {
        let mut p = ship();
        for skill in Skill::ALL {
            let before = p.stats.clone();
            skill.apply(&mut p);
            assert!(p.stats.max_hp >= before.max_hp);
            assert!(p.stats.bullet_damage >= before.bullet_damage);
            assert!(p.stats.speed >= before.speed);
            assert!(p.stats.special_duration >= before.special_duration);
            assert!(p.stats.parts_bonus >= before.parts_bonus);
            // Shorter cooldown is the improvement
            assert!(p.stats.fire_cooldown <= before.fire_cooldown);
        }
    }

    #[test]
    fn test_choices_are_stable_and_distinct() {
        for level in 2..40 {
            let first = level_up_choices(level);
            assert_eq!(first, level_up_choices(level));
            assert_ne!(first[0], first[1]);
            assert_ne!(first[0], first[2]);
            assert_ne!(first[1], first[2]);
        }
    }

    #[test]
    fn test_offer_selection_keys() {
        let offer = LevelUpOffer {
            player: 0,
            level: 2,
        };
        let choices = offer.choices();
        assert_eq!(offer.select(1), Some(choices[0]));
        assert_eq!(offer.select(3), Some(choices[2]));
        assert_eq!(offer.select(0), None);
        assert_eq!(offer.select(4), None);
    }

    #[test]
    fn test_skill_keys_round_trip() {
        for skill in Skill::ALL {
            assert_eq!(Skill::from_key(skill.key()), Some(skill));
        }
        assert_eq!(Skill::from_key("warp"), None);
    }
}
