//! Projectile populations and their motion models
//!
//! Three independent populations share the world:
//! - player projectiles (straight or sinusoidal)
//! - enemy bullets (straight, switching to homing once reflected)
//! - minion bullets (slow and straight)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::EntityId;
use crate::consts::*;

/// Visual/behavioral class of a player projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Tier 1 single shot (and fire-click shots)
    Basic,
    /// Tier 2 three-way spread, faster than basic
    Spread,
    /// Tier 3+ fan that weaves along its heading
    Oscillating,
}

impl ProjectileKind {
    /// Base speed before any per-tier bonus
    pub fn base_speed(self) -> f32 {
        match self {
            ProjectileKind::Basic => PROJECTILE_SPEED,
            ProjectileKind::Spread => PROJECTILE_SPEED + SPREAD_SPEED_BONUS,
            ProjectileKind::Oscillating => PROJECTILE_SPEED + OSCILLATING_SPEED_BONUS,
        }
    }
}

/// Descriptor for a projectile about to be spawned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotSpec {
    pub origin: Vec2,
    pub angle: f32,
    pub kind: ProjectileKind,
    /// Oscillation phase (oscillating only)
    pub phase: f32,
    pub speed: f32,
}

impl ShotSpec {
    pub fn basic(origin: Vec2, angle: f32) -> Self {
        Self {
            origin,
            angle,
            kind: ProjectileKind::Basic,
            phase: 0.0,
            speed: ProjectileKind::Basic.base_speed(),
        }
    }
}

/// A player-fired projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    /// Heading the projectile was fired along
    pub angle: f32,
    pub speed: f32,
    pub kind: ProjectileKind,
    pub phase: f32,
    /// Oscillation clock
    pub time: f32,
}

impl Projectile {
    pub fn from_shot(id: EntityId, shot: &ShotSpec) -> Self {
        Self {
            id,
            pos: shot.origin,
            angle: shot.angle,
            speed: shot.speed,
            kind: shot.kind,
            phase: shot.phase,
            time: 0.0,
        }
    }

    /// Current travel direction (oscillating shots weave around `angle`)
    pub fn heading(&self) -> f32 {
        match self.kind {
            ProjectileKind::Oscillating => {
                // Amplitude scales with speed
                self.angle + (self.time + self.phase).sin() * (self.speed / 20.0)
            }
            ProjectileKind::Basic | ProjectileKind::Spread => self.angle,
        }
    }

    /// Move one tick
    pub fn advance(&mut self) {
        if self.kind == ProjectileKind::Oscillating {
            self.time += OSCILLATION_STEP;
        }
        self.pos += Vec2::from_angle(self.heading()) * self.speed;
    }
}

/// Enemy bullet appearance (enraged shooters fire heavier rounds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyBulletKind {
    Normal,
    Enraged,
}

/// Enemy bullet motion model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletMotion {
    /// Straight line along `angle`
    Straight,
    /// Flying back to the spawn point after a shield deflection (terminal)
    Homing,
}

/// A bullet fired by an enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub id: EntityId,
    pub shooter: EntityId,
    pub pos: Vec2,
    /// Spawn point, target of the homing phase
    pub origin: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub damage: u32,
    pub kind: EnemyBulletKind,
    pub motion: BulletMotion,
}

impl EnemyBullet {
    pub fn new(id: EntityId, shooter: EntityId, origin: Vec2, angle: f32, boosted: bool) -> Self {
        let (damage, kind) = if boosted {
            (ENRAGED_BULLET_DAMAGE, EnemyBulletKind::Enraged)
        } else {
            (ENEMY_BULLET_DAMAGE, EnemyBulletKind::Normal)
        };
        Self {
            id,
            shooter,
            pos: origin,
            origin,
            angle,
            speed: ENEMY_BULLET_SPEED,
            damage,
            kind,
            motion: BulletMotion::Straight,
        }
    }

    #[inline]
    pub fn is_reflected(&self) -> bool {
        self.motion == BulletMotion::Homing
    }

    /// Switch to homing on first shield contact. Returns false if the
    /// bullet was already reflected.
    pub fn reflect(&mut self) -> bool {
        if self.is_reflected() {
            return false;
        }
        self.motion = BulletMotion::Homing;
        self.speed *= REFLECT_SPEED_FACTOR;
        true
    }

    /// Reflected bullet has arrived back at its spawn point
    pub fn has_returned(&self) -> bool {
        self.is_reflected() && self.pos == self.origin
    }

    /// Move one tick
    pub fn advance(&mut self) {
        match self.motion {
            BulletMotion::Straight => {
                self.pos += Vec2::from_angle(self.angle) * self.speed;
            }
            BulletMotion::Homing => {
                let to_origin = self.origin - self.pos;
                if to_origin.length() <= self.speed {
                    self.pos = self.origin;
                } else {
                    self.angle = to_origin.y.atan2(to_origin.x);
                    self.pos += to_origin.normalize() * self.speed;
                }
            }
        }
    }
}

/// A slow bullet fired by a minion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinionBullet {
    pub id: EntityId,
    /// Minion that fired this bullet
    pub shooter: EntityId,
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub damage: u32,
}

impl MinionBullet {
    pub fn new(id: EntityId, shooter: EntityId, origin: Vec2, angle: f32) -> Self {
        Self {
            id,
            shooter,
            pos: origin,
            angle,
            speed: MINION_BULLET_SPEED,
            damage: MINION_BULLET_DAMAGE,
        }
    }

    pub fn advance(&mut self) {
        self.pos += Vec2::from_angle(self.angle) * self.speed;
    }
}

/// Inclusive world-bounds test used to prune projectiles
#[inline]
pub fn in_world(pos: Vec2, world: Vec2) -> bool {
    pos.x >= 0.0 && pos.x <= world.x && pos.y >= 0.0 && pos.y <= world.y
}
