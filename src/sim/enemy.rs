//! Boar enemies and their minions
//!
//! Each enemy runs one behavioral mode at a time:
//! - `Normal`: random walk with a lateral dodge against nearby projectiles
//! - `Mother`: Normal movement while minions orbit around her
//! - `Enraged`: loops charge/rest forever once every minion is gone
//!
//! Minions reference their mother by id only and are looked up each tick,
//! so either side can be destroyed independently.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::projectile::Projectile;
use super::shape::Rect;
use super::state::EntityId;
use crate::consts::*;
use crate::settings::Settings;
use crate::{angle_to, fraction, normalize_angle, polar_to_cartesian};

/// Tick-based cadences derived from the session tick rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub shot: u32,
    pub enraged_shot: u32,
    pub minion_shot: u32,
    pub charge: u32,
    pub rest: u32,
}

impl Cadence {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            shot: settings.ticks(ENEMY_SHOT_SECS),
            enraged_shot: settings.ticks(ENRAGED_SHOT_SECS),
            minion_shot: settings.ticks(MINION_SHOT_SECS),
            charge: settings.ticks(CHARGE_SECS),
            rest: settings.ticks(REST_SECS),
        }
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Sub-phase of the enraged loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RagePhase {
    /// Rushing straight at the player
    Charging { ticks_left: u32 },
    /// Random walk between charges
    Resting { ticks_left: u32 },
}

/// Behavioral mode of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyMode {
    Normal,
    Mother {
        /// Minions spawned with her
        brood: u32,
        /// One-shot guard for the last-minion reaction
        last_stand: bool,
    },
    /// Terminal mode, only reachable from `Mother`
    Enraged { phase: RagePhase },
}

/// Horizontal facing, derived from the sign of the last x movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Turn toward the sign of `dx`, keeping the current facing at zero
    pub fn follow(self, dx: f32) -> Self {
        if dx < 0.0 {
            Facing::Left
        } else if dx > 0.0 {
            Facing::Right
        } else {
            self
        }
    }
}

/// Result of a mother re-evaluating her brood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroodChange {
    Unchanged,
    /// Down to one minion: it flees and her health is floored
    LastStand,
    /// Every minion is gone
    Enraged,
}

/// Three-way volley aimed at the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volley {
    pub origin: Vec2,
    pub angles: [f32; 3],
    /// Enraged shooters fire heavy rounds
    pub boosted: bool,
}

/// Read-only view of the world an enemy reacts to
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext<'a> {
    pub player_center: Vec2,
    /// Player projectiles before this tick's motion
    pub projectiles: &'a [Projectile],
    pub world: Vec2,
    pub cadence: Cadence,
}

/// A Boar enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub health: u32,
    pub max_health: u32,
    pub mode: EnemyMode,
    /// Random-walk heading and ticks until it is re-rolled
    pub walk_angle: f32,
    pub walk_timer: u32,
    pub dodge_cooldown: u32,
    pub last_shot_tick: u64,
    pub facing: Facing,
}

impl Enemy {
    pub fn new(id: EntityId, pos: Vec2, walk_angle: f32, now: u64) -> Self {
        Self {
            id,
            pos,
            size: ENEMY_SIZE,
            health: ENEMY_HEALTH,
            max_health: ENEMY_HEALTH,
            mode: EnemyMode::Normal,
            walk_angle,
            walk_timer: 0,
            dodge_cooldown: 0,
            last_shot_tick: now,
            facing: Facing::default(),
        }
    }

    /// A mother expecting `brood` minions, with elevated health
    pub fn new_mother(id: EntityId, pos: Vec2, walk_angle: f32, brood: u32, now: u64) -> Self {
        Self {
            health: MOTHER_HEALTH,
            max_health: MOTHER_HEALTH,
            mode: EnemyMode::Mother {
                brood,
                last_stand: false,
            },
            ..Self::new(id, pos, walk_angle, now)
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    #[inline]
    pub fn is_enraged(&self) -> bool {
        matches!(self.mode, EnemyMode::Enraged { .. })
    }

    /// Enraged enemies fire boosted bullets
    #[inline]
    pub fn damage_boost(&self) -> bool {
        self.is_enraged()
    }

    pub fn health_fraction(&self) -> f32 {
        fraction(self.health, self.max_health)
    }

    /// Apply damage; true when the hit is fatal
    pub fn take_hit(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    /// React to the number of minions still alive (mothers only)
    pub fn update_brood(&mut self, alive: u32, cadence: &Cadence) -> BroodChange {
        let EnemyMode::Mother { brood, last_stand } = self.mode else {
            return BroodChange::Unchanged;
        };
        if brood == 0 {
            return BroodChange::Unchanged;
        }

        if alive == 0 {
            self.enrage(cadence);
            BroodChange::Enraged
        } else if alive == 1 && brood > 1 && !last_stand {
            self.mode = EnemyMode::Mother {
                brood,
                last_stand: true,
            };
            self.health = self.health.max(LAST_STAND_HEALTH);
            BroodChange::LastStand
        } else {
            BroodChange::Unchanged
        }
    }

    /// Mother -> Enraged. Any other mode is left untouched.
    pub fn enrage(&mut self, cadence: &Cadence) -> bool {
        if !matches!(self.mode, EnemyMode::Mother { .. }) {
            return false;
        }
        self.mode = EnemyMode::Enraged {
            phase: RagePhase::Charging {
                ticks_left: cadence.charge,
            },
        };
        self.health = ENRAGED_HEALTH;
        self.max_health = ENRAGED_HEALTH;
        true
    }

    /// Movement/AI for one tick
    pub fn step<R: Rng>(&mut self, ctx: &EnemyContext, rng: &mut R) {
        match self.mode {
            EnemyMode::Normal | EnemyMode::Mother { .. } => self.wander(ctx, rng),
            EnemyMode::Enraged { phase } => {
                let phase = match phase {
                    RagePhase::Charging { ticks_left } => self.charge(ctx, ticks_left),
                    RagePhase::Resting { ticks_left } => {
                        self.wander(ctx, rng);
                        match ticks_left.saturating_sub(1) {
                            0 => RagePhase::Charging {
                                ticks_left: ctx.cadence.charge,
                            },
                            left => RagePhase::Resting { ticks_left: left },
                        }
                    }
                };
                self.mode = EnemyMode::Enraged { phase };
            }
        }
    }

    /// Random walk plus a one-shot lateral dodge
    fn wander<R: Rng>(&mut self, ctx: &EnemyContext, rng: &mut R) {
        self.walk_timer = self.walk_timer.saturating_sub(1);
        if self.walk_timer == 0 {
            self.walk_angle = rng.random_range(0.0..TAU);
            self.walk_timer = rng.random_range(WALK_TICKS_MIN..=WALK_TICKS_MAX);
        }

        let center = self.center();
        let mut dodge = Vec2::ZERO;
        if self.dodge_cooldown == 0 {
            // First threat in iteration order, not the nearest
            if let Some(threat) = ctx
                .projectiles
                .iter()
                .find(|p| p.pos.distance(center) < DODGE_RADIUS)
            {
                let away = angle_to(threat.pos, center);
                dodge = Vec2::from_angle(away + FRAC_PI_2) * DODGE_SPEED;
                self.dodge_cooldown = DODGE_COOLDOWN_TICKS;
            }
        }
        self.dodge_cooldown = self.dodge_cooldown.saturating_sub(1);

        let delta = Vec2::from_angle(self.walk_angle) * ENEMY_SPEED + dodge;
        self.pos += delta;
        self.facing = self.facing.follow(delta.x);
        self.clamp_to(ctx.world);
    }

    /// Rush at the player; clamped only when the charge ends
    fn charge(&mut self, ctx: &EnemyContext, ticks_left: u32) -> RagePhase {
        let to_player = ctx.player_center - self.center();
        let dist = to_player.length();
        if dist > CHARGE_ARRIVE_DIST {
            let delta = to_player / dist * CHARGE_SPEED;
            self.pos += delta;
            self.facing = self.facing.follow(delta.x);
        }

        let left = ticks_left.saturating_sub(1);
        let arrived = ctx.player_center.distance(self.center()) <= CHARGE_ARRIVE_DIST;
        if arrived || left == 0 {
            self.clamp_to(ctx.world);
            RagePhase::Resting {
                ticks_left: ctx.cadence.rest,
            }
        } else {
            RagePhase::Charging { ticks_left: left }
        }
    }

    pub fn clamp_to(&mut self, world: Vec2) {
        let max = (world - Vec2::splat(self.size)).max(Vec2::ZERO);
        self.pos = self.pos.clamp(Vec2::ZERO, max);
    }

    /// Ticks between volleys in the current mode
    pub fn shot_interval(&self, cadence: &Cadence) -> u32 {
        if self.is_enraged() {
            cadence.enraged_shot
        } else {
            cadence.shot
        }
    }

    /// Fire a 3-way spread at `target` once the cooldown has elapsed
    pub fn shoot(&mut self, target: Vec2, now: u64, cadence: &Cadence) -> Option<Volley> {
        if now.saturating_sub(self.last_shot_tick) < self.shot_interval(cadence) as u64 {
            return None;
        }
        self.last_shot_tick = now;
        let origin = self.center();
        let angle = angle_to(origin, target);
        Some(Volley {
            origin,
            angles: [angle, angle + SPREAD_STEP, angle - SPREAD_STEP],
            boosted: self.damage_boost(),
        })
    }
}

/// A BabyBoar orbiting its mother
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Minion {
    pub id: EntityId,
    /// Mother's id (looked up each tick, may no longer exist)
    pub mother: EntityId,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub health: u32,
    pub orbit_angle: f32,
    pub orbit_radius: f32,
    pub fleeing: bool,
    pub last_shot_tick: u64,
    pub facing: Facing,
}

impl Minion {
    pub fn new(id: EntityId, mother: EntityId, mother_center: Vec2, orbit_angle: f32, now: u64) -> Self {
        let mut minion = Self {
            id,
            mother,
            pos: Vec2::ZERO,
            size: MINION_SIZE,
            health: MINION_HEALTH,
            orbit_angle,
            orbit_radius: ORBIT_RADIUS,
            fleeing: false,
            last_shot_tick: now,
            facing: Facing::default(),
        };
        minion.pos = minion.orbit_position(mother_center);
        minion
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    pub fn health_fraction(&self) -> f32 {
        fraction(self.health, MINION_HEALTH)
    }

    pub fn take_hit(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    fn orbit_position(&self, mother_center: Vec2) -> Vec2 {
        mother_center + polar_to_cartesian(self.orbit_radius, self.orbit_angle)
            - Vec2::splat(self.size / 2.0)
    }

    /// Advance around the mother
    pub fn orbit(&mut self, mother_center: Vec2, world: Vec2) {
        self.orbit_angle = normalize_angle(self.orbit_angle + ORBIT_SPEED);
        let next = self.orbit_position(mother_center);
        self.facing = self.facing.follow(next.x - self.pos.x);
        self.pos = next;
        self.clamp_to(world);
    }

    /// Run directly away from the player; clamped at the end of the step
    pub fn flee(&mut self, player_center: Vec2, world: Vec2) {
        let away = (self.center() - player_center).normalize_or_zero();
        let delta = away * FLEE_SPEED;
        self.pos += delta;
        self.facing = self.facing.follow(delta.x);
        self.clamp_to(world);
    }

    pub fn clamp_to(&mut self, world: Vec2) {
        let max = (world - Vec2::splat(self.size)).max(Vec2::ZERO);
        self.pos = self.pos.clamp(Vec2::ZERO, max);
    }

    /// Heading of a single slow shot at `target`, if one is due
    pub fn shoot(&mut self, target: Vec2, now: u64, cadence: &Cadence) -> Option<f32> {
        if self.fleeing || now.saturating_sub(self.last_shot_tick) < cadence.minion_shot as u64 {
            return None;
        }
        self.last_shot_tick = now;
        Some(angle_to(self.center(), target))
    }
}

/// Kill drop roll: a pickup at `center` with 90% probability
pub fn roll_drop<R: Rng>(center: Vec2, rng: &mut R) -> Option<Vec2> {
    rng.random_bool(DROP_CHANCE).then_some(center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::projectile::ShotSpec;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const WORLD: Vec2 = Vec2::new(1600.0, 1200.0);

    fn ctx(projectiles: &[Projectile]) -> EnemyContext<'_> {
        EnemyContext {
            player_center: Vec2::new(800.0, 1100.0),
            projectiles,
            world: WORLD,
            cadence: Cadence::default(),
        }
    }

    fn mother(brood: u32) -> Enemy {
        Enemy::new_mother(1, Vec2::new(500.0, 500.0), 0.0, brood, 0)
    }

    #[test]
    fn test_cadence_at_sixty_hz() {
        let c = Cadence::default();
        assert_eq!(c.shot, 60);
        assert_eq!(c.enraged_shot, 12);
        assert_eq!(c.minion_shot, 60);
        assert_eq!(c.charge, 60);
        assert_eq!(c.rest, 120);
    }

    #[test]
    fn test_enrage_once_all_minions_gone() {
        let cadence = Cadence::default();
        let mut e = mother(2);
        assert_eq!(e.update_brood(2, &cadence), BroodChange::Unchanged);
        assert_eq!(e.update_brood(0, &cadence), BroodChange::Enraged);
        assert!(e.is_enraged());
        assert_eq!(e.health, 30);
        assert!(e.damage_boost());

        // Idempotent: no second reset
        e.health = 12;
        assert_eq!(e.update_brood(0, &cadence), BroodChange::Unchanged);
        assert!(!e.enrage(&cadence));
        assert_eq!(e.health, 12);
    }

    #[test]
    fn test_normal_and_broodless_never_enrage() {
        let cadence = Cadence::default();
        let mut normal = Enemy::new(1, Vec2::ZERO, 0.0, 0);
        assert_eq!(normal.update_brood(0, &cadence), BroodChange::Unchanged);
        assert!(!normal.enrage(&cadence));

        let mut empty = mother(0);
        assert_eq!(empty.update_brood(0, &cadence), BroodChange::Unchanged);
        assert!(!empty.is_enraged());
    }

    #[test]
    fn test_last_stand_floors_health_once() {
        let cadence = Cadence::default();
        let mut e = mother(3);
        e.health = 4;
        assert_eq!(e.update_brood(1, &cadence), BroodChange::LastStand);
        assert_eq!(e.health, 10);

        e.health = 2;
        assert_eq!(e.update_brood(1, &cadence), BroodChange::Unchanged);
        assert_eq!(e.health, 2);
    }

    #[test]
    fn test_single_minion_mother_has_no_last_stand() {
        let cadence = Cadence::default();
        let mut e = mother(1);
        assert_eq!(e.update_brood(1, &cadence), BroodChange::Unchanged);
        assert_eq!(e.update_brood(0, &cadence), BroodChange::Enraged);
    }

    #[test]
    fn test_shoot_cadence_by_mode() {
        let cadence = Cadence::default();
        let target = Vec2::new(1000.0, 520.0);
        let mut e = mother(1);
        assert!(e.shoot(target, 59, &cadence).is_none());
        let volley = e.shoot(target, 60, &cadence).unwrap();
        assert!(!volley.boosted);
        assert!(volley.angles[0].abs() < 0.0001);
        assert!((volley.angles[1] - 0.2).abs() < 0.0001);
        assert!((volley.angles[2] + 0.2).abs() < 0.0001);

        e.enrage(&cadence);
        assert!(e.shoot(target, 71, &cadence).is_none());
        assert!(e.shoot(target, 72, &cadence).unwrap().boosted);
    }

    #[test]
    fn test_dodge_first_threat_then_cooldown() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = Enemy::new(1, Vec2::new(500.0, 500.0), 0.0, 0);
        // Projectile just left of the enemy center
        let p = Projectile::from_shot(7, &ShotSpec::basic(Vec2::new(470.0, 520.0), 0.0));
        let projectiles = vec![p];
        e.step(&ctx(&projectiles), &mut rng);
        assert_eq!(e.dodge_cooldown, DODGE_COOLDOWN_TICKS - 1);

        // No further dodge while cooling down
        let before = e.dodge_cooldown;
        e.step(&ctx(&projectiles), &mut rng);
        assert_eq!(e.dodge_cooldown, before - 1);
    }

    #[test]
    fn test_dodge_is_perpendicular_to_threat() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = Enemy::new(1, Vec2::new(500.0, 500.0), 0.0, 0);
        // Pin the walk so only the dodge varies
        e.walk_timer = 100;
        e.walk_angle = 0.0;
        let p = Projectile::from_shot(7, &ShotSpec::basic(Vec2::new(470.0, 520.0), 0.0));
        e.step(&ctx(&[p]), &mut rng);
        // Threat due west: dodge is straight down (+y)
        assert!((e.pos.x - 501.5).abs() < 0.001);
        assert!((e.pos.y - 502.5).abs() < 0.001);
    }

    #[test]
    fn test_enraged_charge_then_rest() {
        let mut rng = Pcg32::seed_from_u64(3);
        let cadence = Cadence::default();
        let mut e = mother(1);
        e.enrage(&cadence);

        let projectiles: [Projectile; 0] = [];
        let c = ctx(&projectiles);
        let start = e.center();
        e.step(&c, &mut rng);
        let moved = e.center().distance(start);
        assert!((moved - CHARGE_SPEED).abs() < 0.001);

        for _ in 0..cadence.charge {
            e.step(&c, &mut rng);
            if matches!(e.mode, EnemyMode::Enraged { phase: RagePhase::Resting { .. } }) {
                break;
            }
        }
        assert!(matches!(
            e.mode,
            EnemyMode::Enraged { phase: RagePhase::Resting { .. } }
        ));

        for _ in 0..cadence.rest {
            e.step(&c, &mut rng);
        }
        assert!(matches!(
            e.mode,
            EnemyMode::Enraged { phase: RagePhase::Charging { .. } }
        ));
    }

    #[test]
    fn test_charge_at_world_edge_ends_clamped() {
        let mut rng = Pcg32::seed_from_u64(5);
        let cadence = Cadence::default();
        let mut e = Enemy::new_mother(1, Vec2::new(1500.0, 580.0), 0.0, 1, 0);
        e.enrage(&cadence);
        let mut c = ctx(&[]);
        // Player hugging the right edge: the box overshoots while charging
        c.player_center = Vec2::new(1595.0, 600.0);

        let mut overshot = false;
        for _ in 0..cadence.charge {
            e.step(&c, &mut rng);
            if matches!(e.mode, EnemyMode::Enraged { phase: RagePhase::Resting { .. } }) {
                break;
            }
            overshot |= e.pos.x > WORLD.x - e.size;
        }
        assert!(overshot);
        assert!(matches!(
            e.mode,
            EnemyMode::Enraged { phase: RagePhase::Resting { .. } }
        ));
        assert_eq!(e.pos.x, WORLD.x - e.size);
        assert!(e.pos.y >= 0.0 && e.pos.y <= WORLD.y - e.size);
    }

    #[test]
    fn test_charge_stops_near_player() {
        let mut rng = Pcg32::seed_from_u64(3);
        let cadence = Cadence::default();
        let mut e = mother(1);
        e.enrage(&cadence);
        let mut c = ctx(&[]);
        c.player_center = e.center() + Vec2::new(5.0, 0.0);
        e.step(&c, &mut rng);
        assert!(matches!(
            e.mode,
            EnemyMode::Enraged { phase: RagePhase::Resting { .. } }
        ));
    }

    #[test]
    fn test_minion_orbit_radius() {
        let center = Vec2::new(500.0, 500.0);
        let mut m = Minion::new(2, 1, center, 0.0, 0);
        assert!((m.center().distance(center) - ORBIT_RADIUS).abs() < 0.001);
        m.orbit(center, WORLD);
        assert!((m.orbit_angle - ORBIT_SPEED).abs() < 0.0001);
        assert!((m.center().distance(center) - ORBIT_RADIUS).abs() < 0.001);
    }

    #[test]
    fn test_fleeing_minion_runs_and_holds_fire() {
        let cadence = Cadence::default();
        let mut m = Minion::new(2, 1, Vec2::new(500.0, 500.0), 0.0, 0);
        let player = Vec2::new(500.0, 500.0);
        assert!(m.shoot(player, 60, &cadence).is_some());

        m.fleeing = true;
        let before = m.center().distance(player);
        m.flee(player, WORLD);
        assert!(m.center().distance(player) > before);
        assert!(m.shoot(player, 500, &cadence).is_none());
    }

    #[test]
    fn test_drop_roll_is_mostly_hits() {
        let mut rng = Pcg32::seed_from_u64(42);
        let hits = (0..1000)
            .filter(|_| roll_drop(Vec2::ZERO, &mut rng).is_some())
            .count();
        assert!(hits > 850 && hits < 950, "hits = {hits}");
    }
}
