//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (cooldowns are tick counts)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod enemy;
pub mod player;
pub mod projectile;
pub mod shape;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{CollisionReport, Target, find_target, resolve_collisions};
pub use enemy::{BroodChange, Cadence, Enemy, EnemyMode, Facing, Minion, RagePhase, Volley};
pub use player::Player;
pub use projectile::{
    BulletMotion, EnemyBullet, EnemyBulletKind, MinionBullet, Projectile, ProjectileKind, ShotSpec,
};
pub use shape::{OrientedRect, Rect};
pub use snapshot::{HudSnapshot, RenderSnapshot, SpriteKind, SpriteSnapshot};
pub use state::{
    EntityId, FloatingText, GameEvent, GamePhase, GameState, HealthTarget, HudMessage, Pickup,
};
pub use tick::{TickInput, tick};
