//! Boar Hell - A top-down bullet hell arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, AI, collisions, game state)
//! - `settings`: Session configuration injected at session start

pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default fixed simulation rate
    pub const TICK_RATE: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 1600.0;
    pub const WORLD_HEIGHT: f32 = 1200.0;
    /// Viewport dimensions (camera window into the world)
    pub const SCREEN_WIDTH: f32 = 1440.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_START_HEALTH: u32 = 50;
    /// Sprint bonus per weapon tier above 1
    pub const SPRINT_BONUS_PER_TIER: f32 = 0.3;
    /// Auto-fire cadence while fire is held
    pub const FIRE_COOLDOWN_TICKS: u32 = 5;
    /// Angular gap between spread shots (radians)
    pub const SPREAD_STEP: f32 = 0.2;

    /// Shield zone: distance behind the player, and box dimensions
    pub const SHIELD_RADIUS: f32 = 30.0;
    pub const SHIELD_LENGTH: f32 = 60.0;
    pub const SHIELD_THICKNESS: f32 = 12.0;

    /// Player projectile speeds per class
    pub const PROJECTILE_SPEED: f32 = 7.0;
    pub const SPREAD_SPEED_BONUS: f32 = 2.0;
    pub const OSCILLATING_SPEED_BONUS: f32 = 5.0;
    /// Extra speed per tier above 3 for oscillating shots
    pub const OSCILLATING_SPEED_PER_TIER: f32 = 2.0;
    /// Oscillation clock advance per tick
    pub const OSCILLATION_STEP: f32 = 0.1;
    pub const PROJECTILE_RADIUS: f32 = 5.0;

    /// Enemy ("Boar") archetype
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const ENEMY_HEALTH: u32 = 3;
    pub const MOTHER_HEALTH: u32 = 10;
    pub const ENRAGED_HEALTH: u32 = 30;
    /// Mother health floor once only one minion remains
    pub const LAST_STAND_HEALTH: u32 = 10;
    pub const ENEMY_SPEED: f32 = 1.5;
    pub const DODGE_SPEED: f32 = 2.5;
    pub const DODGE_RADIUS: f32 = 100.0;
    pub const DODGE_COOLDOWN_TICKS: u32 = 30;
    pub const WALK_TICKS_MIN: u32 = 60;
    pub const WALK_TICKS_MAX: u32 = 120;
    pub const ENEMY_SHOT_SECS: f32 = 1.0;
    pub const ENRAGED_SHOT_SECS: f32 = 0.2;
    pub const CHARGE_SPEED: f32 = 8.0;
    pub const CHARGE_SECS: f32 = 1.0;
    pub const CHARGE_ARRIVE_DIST: f32 = 10.0;
    pub const REST_SECS: f32 = 2.0;
    /// Spawn margin from world edges
    pub const SPAWN_MARGIN: f32 = 50.0;
    pub const MAX_MINIONS: u32 = 3;

    /// Enemy bullets
    pub const ENEMY_BULLET_SPEED: f32 = 4.0;
    pub const ENEMY_BULLET_DAMAGE: u32 = 1;
    pub const ENRAGED_BULLET_DAMAGE: u32 = 3;
    /// Speed multiplier once a bullet is reflected by the shield
    pub const REFLECT_SPEED_FACTOR: f32 = 1.3;

    /// Minion ("BabyBoar") archetype
    pub const MINION_SIZE: f32 = 20.0;
    pub const MINION_HEALTH: u32 = 2;
    pub const ORBIT_RADIUS: f32 = 100.0;
    pub const ORBIT_SPEED: f32 = 0.02;
    pub const FLEE_SPEED: f32 = 3.0;
    pub const MINION_SHOT_SECS: f32 = 1.0;
    pub const MINION_BULLET_SPEED: f32 = 2.0;
    pub const MINION_BULLET_DAMAGE: u32 = 1;

    /// Rewards
    pub const KILL_EXP: u64 = 100;
    pub const DROP_CHANCE: f64 = 0.9;
    pub const DROP_SIZE: f32 = 20.0;

    /// Floating text lifetime and upward drift per tick
    pub const FLOATING_TEXT_TICKS: u32 = 60;
    pub const FLOATING_TEXT_DRIFT: f32 = 1.0;
    /// HUD message lifetime (2 seconds at 60 Hz)
    pub const HUD_MESSAGE_TICKS: u32 = 120;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Heading (radians) of the vector from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Ratio of `value` to `max`, 0.0 when `max` is zero
#[inline]
pub fn fraction(value: u32, max: u32) -> f32 {
    if max == 0 {
        0.0
    } else {
        value as f32 / max as f32
    }
}
