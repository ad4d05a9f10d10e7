//! Entity records and their per-tick update rules
//!
//! Players persist for a whole session; enemies, bullets and particles are
//! short-lived and get filtered out of their collections once `alive` drops.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::progression::Skill;
use super::tick::PlayerInput;
use crate::Rgb;
use crate::consts::*;

/// How a ship is steered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// Chases the shared pointer position
    Pointer,
    /// Up/down/left/right flags
    Keys,
}

/// Upgradeable ship stats. Only skill application touches these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_hp: i32,
    pub speed: f32,
    pub fire_cooldown: f32,
    pub bullet_damage: i32,
    pub special_cooldown: f32,
    pub special_duration: f32,
    pub parts_bonus: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            max_hp: PLAYER_BASE_HP,
            speed: PLAYER_BASE_SPEED,
            fire_cooldown: PLAYER_FIRE_COOLDOWN,
            bullet_damage: PLAYER_BULLET_DAMAGE,
            special_cooldown: PLAYER_SPECIAL_COOLDOWN,
            special_duration: PLAYER_SPECIAL_DURATION,
            parts_bonus: 1.0,
        }
    }
}

/// Auto-firing helper granted by the drone skill
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Drone {
    /// Seconds since the drone was attached
    pub timer: f32,
}

/// A player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// 1-based id shown in the HUD
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
    pub control: ControlMode,
    pub stats: PlayerStats,
    pub hp: i32,
    pub fire_timer: f32,
    /// Cooldown until the special can be triggered again
    pub special_timer: f32,
    /// Remaining seconds of an active special (0 = inactive)
    pub special_active: f32,
    pub level: u32,
    pub xp: f32,
    pub xp_to_next: u32,
    pub skill_points: u32,
    pub skills: BTreeSet<Skill>,
    pub drone: Option<Drone>,
    /// Set from input every frame
    pub want_fire: bool,
}

impl Player {
    pub fn new(id: u32, pos: Vec2, color: Rgb, control: ControlMode) -> Self {
        let stats = PlayerStats::default();
        Self {
            id,
            pos,
            radius: PLAYER_RADIUS,
            color,
            control,
            hp: stats.max_hp,
            stats,
            fire_timer: 0.0,
            special_timer: 0.0,
            special_active: 0.0,
            level: 1,
            xp: 0.0,
            xp_to_next: BASE_XP_TO_NEXT,
            skill_points: 0,
            skills: BTreeSet::new(),
            drone: None,
            want_fire: false,
        }
    }

    /// The two ships every session starts with
    pub fn starting_pair() -> [Player; PLAYER_COUNT] {
        let y = FIELD_HEIGHT - 60.0;
        [
            Player::new(
                1,
                Vec2::new(FIELD_WIDTH * 0.3, y),
                Rgb::PLAYER_ONE,
                ControlMode::Pointer,
            ),
            Player::new(
                2,
                Vec2::new(FIELD_WIDTH * 0.7, y),
                Rgb::PLAYER_TWO,
                ControlMode::Keys,
            ),
        ]
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    #[inline]
    pub fn special_is_active(&self) -> bool {
        self.special_active > 0.0
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.stats.max_hp <= 0 {
            return 0.0;
        }
        (self.hp as f32 / self.stats.max_hp as f32).clamp(0.0, 1.0)
    }

    /// Unit direction the ship wants to move in this tick (zero when idle)
    pub fn steering(&self, pointer: Vec2, input: &PlayerInput) -> Vec2 {
        match self.control {
            ControlMode::Pointer => {
                let to_pointer = pointer - self.pos;
                if to_pointer.length() > POINTER_DEADZONE {
                    to_pointer.normalize()
                } else {
                    Vec2::ZERO
                }
            }
            ControlMode::Keys => {
                let mut dir = Vec2::ZERO;
                if input.up {
                    dir.y -= 1.0;
                }
                if input.down {
                    dir.y += 1.0;
                }
                if input.left {
                    dir.x -= 1.0;
                }
                if input.right {
                    dir.x += 1.0;
                }
                dir.normalize_or_zero()
            }
        }
    }

    /// Advance movement, guns, special and drone by `dt`.
    ///
    /// `index` is this ship's slot in the session, stamped on every bullet it
    /// emits so hits can be classified as friendly.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        dt: f32,
        pointer: Vec2,
        input: &PlayerInput,
        rng: &mut R,
        bullets: &mut Vec<Bullet>,
    ) {
        let dir = self.steering(pointer, input);
        self.pos += dir * self.stats.speed * dt;
        self.pos.x = self
            .pos
            .x
            .clamp(PLAYER_MARGIN, FIELD_WIDTH - PLAYER_MARGIN);
        self.pos.y = self
            .pos
            .y
            .clamp(PLAYER_MARGIN, FIELD_HEIGHT - PLAYER_MARGIN);

        self.fire_timer -= dt;
        if self.want_fire && self.fire_timer <= 0.0 {
            self.shoot(index, bullets);
            let rate = if self.special_is_active() { 0.5 } else { 1.0 };
            self.fire_timer = self.stats.fire_cooldown * rate;
        }

        self.special_timer -= dt;
        if input.special && self.special_timer <= 0.0 {
            self.special_active = self.stats.special_duration;
            self.special_timer = self.stats.special_cooldown;
        }
        if self.special_active > 0.0 {
            self.special_active = (self.special_active - dt).max(0.0);
        }

        if let Some(drone) = self.drone.as_mut() {
            drone.timer += dt;
            if rng.random_range(0..DRONE_FIRE_ODDS) == 0 {
                bullets.push(Bullet::new(
                    self.pos - Vec2::new(0.0, DRONE_OFFSET_Y),
                    Vec2::new(0.0, -DRONE_BULLET_SPEED),
                    BulletOwner::Player(index),
                    Rgb::DRONE,
                    FIXED_BULLET_DAMAGE,
                ));
            }
        }
    }

    /// Twin shot straight up
    pub fn shoot(&self, index: usize, bullets: &mut Vec<Bullet>) {
        for side in [-1.0, 1.0] {
            bullets.push(Bullet::new(
                self.pos + Vec2::new(side * GUN_OFFSET_X, -GUN_OFFSET_Y),
                Vec2::new(0.0, -PLAYER_BULLET_SPEED),
                BulletOwner::Player(index),
                self.color,
                self.stats.bullet_damage,
            ));
        }
    }

    /// Apply damage, clamping at zero. Returns true if this hit was fatal.
    pub fn hit(&mut self, damage: i32) -> bool {
        let was_alive = !self.is_dead();
        self.hp = (self.hp - damage).clamp(0, self.stats.max_hp);
        was_alive && self.is_dead()
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Basic,
    Heavy,
}

impl EnemyKind {
    pub fn max_hp(self) -> i32 {
        match self {
            EnemyKind::Basic => 18,
            EnemyKind::Heavy => 28,
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            EnemyKind::Basic => 65.0,
            EnemyKind::Heavy => 55.0,
        }
    }

    /// XP value; half of it (rounded down) is paid out as parts
    pub fn value(self) -> u32 {
        match self {
            EnemyKind::Basic => 12,
            EnemyKind::Heavy => 18,
        }
    }

    pub fn weave_amplitude(self) -> f32 {
        match self {
            EnemyKind::Basic => 40.0,
            EnemyKind::Heavy => 60.0,
        }
    }
}

/// A descending enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: i32,
    pub speed: f32,
    pub kind: EnemyKind,
    /// Seconds alive, drives the weave
    pub age: f32,
    pub value: u32,
    alive: bool,
    escaped: bool,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, kind: EnemyKind) -> Self {
        Self {
            id,
            pos,
            radius: ENEMY_RADIUS,
            hp: kind.max_hp(),
            speed: kind.speed(),
            kind,
            age: 0.0,
            value: kind.value(),
            alive: true,
            escaped: false,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// True once the enemy has left through the bottom edge
    #[inline]
    pub fn escaped(&self) -> bool {
        self.escaped
    }

    pub fn destroy(&mut self) {
        self.alive = false;
    }

    /// Drift down and weave; may fire one bullet straight down.
    pub fn advance<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> Option<Bullet> {
        if !self.alive {
            return None;
        }
        self.age += dt;
        self.pos.y += self.speed * dt;
        self.pos.x +=
            (self.age * ENEMY_WEAVE_FREQUENCY).sin() * self.kind.weave_amplitude() * dt;

        if self.pos.y > FIELD_HEIGHT + ENEMY_ESCAPE_MARGIN {
            self.escaped = true;
            self.destroy();
            return None;
        }

        if rng.random_bool(ENEMY_FIRE_CHANCE) {
            return Some(Bullet::new(
                self.pos + Vec2::new(0.0, ENEMY_MUZZLE_OFFSET),
                Vec2::new(0.0, ENEMY_BULLET_SPEED),
                BulletOwner::Enemy(self.id),
                Rgb::RED,
                FIXED_BULLET_DAMAGE,
            ));
        }
        None
    }
}

/// Who fired a bullet. Only used to tell friend from foe; never dereferenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    /// Session slot of the firing ship (guns and drone)
    Player(usize),
    /// Id of the firing enemy, which may no longer exist
    Enemy(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub owner: BulletOwner,
    pub color: Rgb,
    pub damage: i32,
    alive: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2, owner: BulletOwner, color: Rgb, damage: i32) -> Self {
        Self {
            pos,
            vel,
            radius: BULLET_RADIUS,
            owner,
            color,
            damage,
            alive: true,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn destroy(&mut self) {
        self.alive = false;
    }

    #[inline]
    pub fn is_friendly(&self) -> bool {
        matches!(self.owner, BulletOwner::Player(_))
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.alive {
            return;
        }
        self.pos += self.vel * dt;
        let m = BULLET_BOUNDS_MARGIN;
        if self.pos.y < -m
            || self.pos.y > FIELD_HEIGHT + m
            || self.pos.x < -m
            || self.pos.x > FIELD_WIDTH + m
        {
            self.alive = false;
        }
    }
}

/// Particle burst styles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Burst {
    /// Gold shower from a destroyed enemy
    Pop,
    /// Sparks in the ship's color when a player is shot
    Hit(Rgb),
}

impl Burst {
    fn count(self) -> usize {
        match self {
            Burst::Pop => POP_PARTICLES,
            Burst::Hit(_) => HIT_PARTICLES,
        }
    }

    fn color(self) -> Rgb {
        match self {
            Burst::Pop => Rgb::GOLD,
            Burst::Hit(color) => color,
        }
    }

    /// (x range, y range) of the initial velocity
    fn spread(self) -> ((f32, f32), (f32, f32)) {
        match self {
            Burst::Pop => ((-140.0, 140.0), (-80.0, 40.0)),
            Burst::Hit(_) => ((-120.0, 120.0), (-60.0, 20.0)),
        }
    }
}

/// Cosmetic particle (no gameplay effect)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    pub color: Rgb,
    alive: bool,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, color: Rgb) -> Self {
        Self {
            pos,
            vel,
            life: PARTICLE_LIFETIME,
            color,
            alive: true,
        }
    }

    /// Spawn a burst of particles at `at`
    pub fn burst<R: Rng + ?Sized>(
        rng: &mut R,
        at: Vec2,
        burst: Burst,
        particles: &mut Vec<Particle>,
    ) {
        let ((x_lo, x_hi), (y_lo, y_hi)) = burst.spread();
        let color = burst.color();
        particles.extend((0..burst.count()).map(|_| {
            let vel = Vec2::new(rng.random_range(x_lo..=x_hi), rng.random_range(y_lo..=y_hi));
            Particle::new(at, vel, color)
        }));
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Linear fade for the renderer
    pub fn alpha(&self) -> f32 {
        (self.life / PARTICLE_LIFETIME).clamp(0.0, 1.0)
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.alive {
            return;
        }
        self.life -= dt;
        if self.life <= 0.0 {
            self.alive = false;
        }
        self.pos += self.vel * dt;
        self.vel.y += PARTICLE_GRAVITY * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn idle() -> PlayerInput {
        PlayerInput::default()
    }

    #[test]
    fn test_pointer_ship_moves_toward_pointer() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut bullets = Vec::new();
        let mut p = Player::new(1, Vec2::new(100.0, 100.0), Rgb::PLAYER_ONE, ControlMode::Pointer);
        p.advance(0, 0.1, Vec2::new(200.0, 100.0), &idle(), &mut rng, &mut bullets);
        assert!((p.pos.x - 118.0).abs() < 1e-3);
        assert!((p.pos.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_pointer_deadzone_keeps_ship_still() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut bullets = Vec::new();
        let start = Vec2::new(300.0, 300.0);
        let mut p = Player::new(1, start, Rgb::PLAYER_ONE, ControlMode::Pointer);
        p.advance(0, 0.1, start + Vec2::new(0.5, 0.5), &idle(), &mut rng, &mut bullets);
        assert_eq!(p.pos, start);
    }

    #[test]
    fn test_key_ship_diagonal_is_normalized() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut bullets = Vec::new();
        let start = Vec2::new(300.0, 300.0);
        let mut p = Player::new(2, start, Rgb::PLAYER_TWO, ControlMode::Keys);
        let input = PlayerInput {
            up: true,
            right: true,
            ..Default::default()
        };
        p.advance(1, 0.1, Vec2::ZERO, &input, &mut rng, &mut bullets);
        let moved = p.pos - start;
        assert!((moved.length() - 18.0).abs() < 1e-3);
        assert!(moved.x > 0.0 && moved.y < 0.0);
    }

    #[test]
    fn test_ship_clamped_to_field() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut bullets = Vec::new();
        let mut p = Player::new(2, Vec2::new(25.0, 25.0), Rgb::PLAYER_TWO, ControlMode::Keys);
        let input = PlayerInput {
            up: true,
            left: true,
            ..Default::default()
        };
        p.advance(1, 1.0, Vec2::ZERO, &input, &mut rng, &mut bullets);
        assert_eq!(p.pos, Vec2::new(PLAYER_MARGIN, PLAYER_MARGIN));
    }

    #[test]
    fn test_firing_respects_cooldown_and_special() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut bullets = Vec::new();
        let mut p = Player::new(1, Vec2::new(300.0, 300.0), Rgb::PLAYER_ONE, ControlMode::Keys);
        p.want_fire = true;

        p.advance(0, 0.01, Vec2::ZERO, &idle(), &mut rng, &mut bullets);
        assert_eq!(bullets.len(), 2);
        assert!(bullets.iter().all(|b| b.damage == PLAYER_BULLET_DAMAGE));
        assert!((p.fire_timer - PLAYER_FIRE_COOLDOWN).abs() < 1e-6);

        p.advance(0, 0.01, Vec2::ZERO, &idle(), &mut rng, &mut bullets);
        assert_eq!(bullets.len(), 2);

        let special = PlayerInput {
            special: true,
            ..Default::default()
        };
        p.fire_timer = 0.0;
        p.advance(0, 0.01, Vec2::ZERO, &special, &mut rng, &mut bullets);
        assert!(p.special_is_active());
        assert!((p.special_timer - PLAYER_SPECIAL_COOLDOWN).abs() < 1e-6);

        // Special halves the reload
        p.fire_timer = 0.0;
        let before = bullets.len();
        p.advance(0, 0.01, Vec2::ZERO, &idle(), &mut rng, &mut bullets);
        assert_eq!(bullets.len(), before + 2);
        assert!((p.fire_timer - PLAYER_FIRE_COOLDOWN * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_drone_fires_upward_at_fixed_damage() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut bullets = Vec::new();
        let mut p = Player::new(1, Vec2::new(300.0, 300.0), Rgb::PLAYER_ONE, ControlMode::Keys);
        p.drone = Some(Drone::default());

        let ticks = 2600;
        for _ in 0..ticks {
            p.advance(1, FRAME_DT, Vec2::ZERO, &idle(), &mut rng, &mut bullets);
        }

        // 1 in 26 per tick, so about 100 shots
        assert!((50..=150).contains(&bullets.len()), "{} drone shots", bullets.len());
        for b in &bullets {
            assert_eq!(b.vel, Vec2::new(0.0, -DRONE_BULLET_SPEED));
            assert_eq!(b.owner, BulletOwner::Player(1));
            assert_eq!(b.damage, FIXED_BULLET_DAMAGE);
            assert_eq!(b.color, Rgb::DRONE);
            assert_eq!(b.pos, p.pos - Vec2::new(0.0, DRONE_OFFSET_Y));
        }
        assert!(p.drone.as_ref().is_some_and(|d| d.timer > 40.0));
    }

    #[test]
    fn test_hit_clamps_and_reports_death_once() {
        let mut p = Player::new(1, Vec2::ZERO, Rgb::PLAYER_ONE, ControlMode::Pointer);
        assert!(!p.hit(40));
        assert_eq!(p.hp, 60);
        assert!(p.hit(500));
        assert_eq!(p.hp, 0);
        assert!(!p.hit(10));
        assert_eq!(p.hp, 0);
    }

    #[test]
    fn test_enemy_escapes_bottom_edge() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut e = Enemy::new(1, Vec2::new(400.0, FIELD_HEIGHT + 29.0), EnemyKind::Basic);
        e.advance(0.1, &mut rng);
        assert!(!e.is_alive());
        assert!(e.escaped());
        assert!(e.advance(0.1, &mut rng).is_none());
        assert!(!e.is_alive());
    }

    #[test]
    fn test_enemy_variants() {
        let basic = Enemy::new(1, Vec2::ZERO, EnemyKind::Basic);
        let heavy = Enemy::new(2, Vec2::ZERO, EnemyKind::Heavy);
        assert_eq!((basic.hp, basic.value), (18, 12));
        assert_eq!((heavy.hp, heavy.value), (28, 18));
        assert!(heavy.speed < basic.speed);
    }

    #[test]
    fn test_enemy_fire_goes_down() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut e = Enemy::new(7, Vec2::new(400.0, 0.0), EnemyKind::Basic);
        let shot = (0..5000).find_map(|_| e.advance(0.0, &mut rng));
        let shot = shot.expect("enemy should eventually fire");
        assert_eq!(shot.vel, Vec2::new(0.0, ENEMY_BULLET_SPEED));
        assert_eq!(shot.owner, BulletOwner::Enemy(7));
        assert!(!shot.is_friendly());
    }

    #[test]
    fn test_bullet_leaves_field() {
        let mut b = Bullet::new(
            Vec2::new(100.0, -5.0),
            Vec2::new(0.0, -360.0),
            BulletOwner::Player(0),
            Rgb::PLAYER_ONE,
            10,
        );
        b.advance(0.01);
        assert!(b.is_alive());
        b.advance(0.02);
        assert!(!b.is_alive());
    }

    #[test]
    fn test_particle_falls_and_expires() {
        let mut prt = Particle::new(Vec2::ZERO, Vec2::ZERO, Rgb::GOLD);
        prt.advance(0.5);
        assert!(prt.is_alive());
        assert!(prt.vel.y > 0.0);
        assert!(prt.alpha() < 0.2);
        prt.advance(0.2);
        assert!(!prt.is_alive());
        prt.advance(0.2);
        assert!(!prt.is_alive());
    }

    #[test]
    fn test_burst_counts_and_spread() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut particles = Vec::new();
        Particle::burst(&mut rng, Vec2::ZERO, Burst::Pop, &mut particles);
        assert_eq!(particles.len(), POP_PARTICLES);
        assert!(particles.iter().all(|p| p.color == Rgb::GOLD
            && (-140.0..=140.0).contains(&p.vel.x)
            && (-80.0..=40.0).contains(&p.vel.y)));

        particles.clear();
        Particle::burst(&mut rng, Vec2::ZERO, Burst::Hit(Rgb::PLAYER_TWO), &mut particles);
        assert_eq!(particles.len(), HIT_PARTICLES);
        assert!(particles.iter().all(|p| p.color == Rgb::PLAYER_TWO));
    }
}
