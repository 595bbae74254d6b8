//! Read-only view of a session for the rendering collaborator
//!
//! Captured once per frame after the tick; the core does no drawing.
//! Entity positions are top-left corners, projectile and pickup positions
//! are centers.

use glam::Vec2;
use serde::Serialize;

use super::enemy::{EnemyMode, Facing};
use super::projectile::{EnemyBulletKind, ProjectileKind};
use super::shape::OrientedRect;
use super::state::{FloatingText, GamePhase, GameState};
use crate::consts::*;

/// What to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteKind {
    Player,
    Boar,
    MotherBoar,
    BabyBoar,
    Projectile(ProjectileKind),
    EnemyBullet(EnemyBulletKind),
    /// Enemy bullet flying home after a shield deflection
    ReflectedBullet,
    MinionBullet,
    Pickup,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteSnapshot {
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub size: f32,
    /// Health bar fill, None for things without health
    pub health_fraction: Option<f32>,
    /// Share of a mother's brood still alive (mothers only)
    pub brood_fraction: Option<f32>,
    pub enraged: bool,
    pub facing: Facing,
}

impl SpriteSnapshot {
    fn plain(kind: SpriteKind, pos: Vec2, size: f32) -> Self {
        Self {
            kind,
            pos,
            size,
            health_fraction: None,
            brood_fraction: None,
            enraged: false,
            facing: Facing::default(),
        }
    }
}

/// HUD numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub health: u32,
    pub exp: u64,
    pub weapon_tier: u32,
    pub bullets_shot: u64,
    pub enemies_left: usize,
    pub phase: GamePhase,
    /// Tier-up banner, if one is showing
    pub message: Option<String>,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    /// World position of the screen's top-left corner
    pub camera_offset: Vec2,
    /// Drawn in order: pickups, enemies, minions, player, projectiles
    pub sprites: Vec<SpriteSnapshot>,
    pub shield: Option<OrientedRect>,
    pub floating_texts: Vec<FloatingText>,
    pub hud: HudSnapshot,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let bullet_size = PROJECTILE_RADIUS * 2.0;
        let mut sprites = Vec::with_capacity(
            1 + state.enemies.len()
                + state.minions.len()
                + state.projectiles.len()
                + state.enemy_bullets.len()
                + state.minion_bullets.len()
                + state.pickups.len(),
        );

        sprites.extend(
            state
                .pickups
                .iter()
                .map(|p| SpriteSnapshot::plain(SpriteKind::Pickup, p.pos, p.size)),
        );

        sprites.extend(state.enemies.iter().map(|e| {
            let (kind, brood_fraction) = match e.mode {
                EnemyMode::Mother { .. } => (SpriteKind::MotherBoar, Some(state.brood_fraction(e))),
                EnemyMode::Normal | EnemyMode::Enraged { .. } => (SpriteKind::Boar, None),
            };
            SpriteSnapshot {
                kind,
                pos: e.pos,
                size: e.size,
                health_fraction: Some(e.health_fraction()),
                brood_fraction,
                enraged: e.is_enraged(),
                facing: e.facing,
            }
        }));

        sprites.extend(state.minions.iter().map(|m| SpriteSnapshot {
            kind: SpriteKind::BabyBoar,
            pos: m.pos,
            size: m.size,
            health_fraction: Some(m.health_fraction()),
            brood_fraction: None,
            enraged: false,
            facing: m.facing,
        }));

        let player = &state.player;
        sprites.push(SpriteSnapshot {
            kind: SpriteKind::Player,
            pos: player.pos,
            size: player.size,
            health_fraction: None,
            brood_fraction: None,
            enraged: false,
            facing: player.facing,
        });

        sprites.extend(
            state
                .projectiles
                .iter()
                .map(|p| SpriteSnapshot::plain(SpriteKind::Projectile(p.kind), p.pos, bullet_size)),
        );
        sprites.extend(state.enemy_bullets.iter().map(|b| {
            let kind = if b.is_reflected() {
                SpriteKind::ReflectedBullet
            } else {
                SpriteKind::EnemyBullet(b.kind)
            };
            SpriteSnapshot::plain(kind, b.pos, bullet_size)
        }));
        sprites.extend(
            state
                .minion_bullets
                .iter()
                .map(|b| SpriteSnapshot::plain(SpriteKind::MinionBullet, b.pos, bullet_size)),
        );

        Self {
            tick: state.time_ticks,
            camera_offset: state.camera.offset,
            sprites,
            shield: player.shield_zone(state.aim),
            floating_texts: state.floating_texts.clone(),
            hud: HudSnapshot {
                health: player.health,
                exp: state.exp,
                weapon_tier: player.weapon_tier,
                bullets_shot: state.bullets_shot,
                enemies_left: state.enemies.len(),
                phase: state.phase,
                message: state.hud_message.as_ref().map(|m| m.text.clone()),
            },
        }
    }

    /// Sprites of one kind
    pub fn sprites_of(&self, kind: SpriteKind) -> impl Iterator<Item = &SpriteSnapshot> {
        self.sprites.iter().filter(move |s| s.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn state() -> GameState {
        let settings = Settings {
            enemy_count: 0,
            ..Settings::default()
        };
        GameState::new(&settings, 3)
    }

    #[test]
    fn test_capture_counts() {
        let mut state = state();
        state.spawn_enemy(Vec2::new(100.0, 100.0));
        state.spawn_mother(Vec2::new(500.0, 500.0), 3);
        state.spawn_pickup(Vec2::new(50.0, 50.0));

        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.sprites_of(SpriteKind::Player).count(), 1);
        assert_eq!(snap.sprites_of(SpriteKind::Boar).count(), 1);
        assert_eq!(snap.sprites_of(SpriteKind::MotherBoar).count(), 1);
        assert_eq!(snap.sprites_of(SpriteKind::BabyBoar).count(), 3);
        assert_eq!(snap.sprites_of(SpriteKind::Pickup).count(), 1);
        assert_eq!(snap.hud.enemies_left, 2);
        assert_eq!(snap.hud.phase, GamePhase::Playing);
        assert!(snap.shield.is_none());
    }

    #[test]
    fn test_mother_bars_track_health_and_brood() {
        let mut state = state();
        state.spawn_mother(Vec2::new(500.0, 500.0), 2);
        state.minions.pop();
        state.enemies[0].health = 8;

        let snap = RenderSnapshot::capture(&state);
        let mother = snap.sprites_of(SpriteKind::MotherBoar).next().unwrap();
        assert_eq!(mother.health_fraction, Some(0.8));
        assert_eq!(mother.brood_fraction, Some(0.5));
        assert!(!mother.enraged);

        let baby = snap.sprites_of(SpriteKind::BabyBoar).next().unwrap();
        assert_eq!(baby.brood_fraction, None);
    }

    #[test]
    fn test_player_facing_follows_movement_and_shield_shows() {
        let mut state = state();
        // Aiming right while walking left: movement decides the facing
        state.aim = state.player.center() + Vec2::new(100.0, 0.0);
        let world = state.world;
        state.player.apply_intent(Vec2::new(-1.0, 0.0), false, world);
        state.player.shield_active = true;

        let snap = RenderSnapshot::capture(&state);
        let player = snap.sprites_of(SpriteKind::Player).next().unwrap();
        assert_eq!(player.facing, Facing::Left);
        assert!(snap.shield.is_some());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = state();
        state.spawn_enemy(Vec2::new(100.0, 100.0));
        state.collect_pickup();
        let json = serde_json::to_string(&RenderSnapshot::capture(&state)).unwrap();
        assert!(json.contains("Stellanator level 2 unlocked"));
        assert!(json.contains("\"Boar\""));
    }
}
