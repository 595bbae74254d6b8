//! The player entity
//!
//! Owns movement, weapon-tier fire patterns and the directional shield.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Facing;
use super::projectile::{ProjectileKind, ShotSpec};
use super::shape::{OrientedRect, Rect};
use crate::angle_to;
use crate::consts::*;

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub base_speed: f32,
    pub health: u32,
    /// Weapon tier (>= 1, never decreases)
    pub weapon_tier: u32,
    pub shield_active: bool,
    /// Ticks until auto-fire may trigger again
    pub fire_cooldown: u32,
    pub facing: Facing,
}

impl Player {
    pub fn new(pos: Vec2, health: u32) -> Self {
        Self {
            pos,
            size: PLAYER_SIZE,
            base_speed: PLAYER_SPEED,
            health,
            weapon_tier: 1,
            shield_active: false,
            fire_cooldown: 0,
            facing: Facing::default(),
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

    /// Per-axis speed for this tick (+30% per tier above 1 while sprinting)
    pub fn move_speed(&self, sprint: bool) -> f32 {
        if sprint {
            self.base_speed * (1.0 + SPRINT_BONUS_PER_TIER * (self.weapon_tier - 1) as f32)
        } else {
            self.base_speed
        }
    }

    /// Move by an axis vector (components in -1..=1), clamped to the world.
    ///
    /// Axes are scaled independently, so diagonal movement is faster than
    /// axial movement.
    pub fn apply_intent(&mut self, movement: Vec2, sprint: bool, world: Vec2) {
        let speed = self.move_speed(sprint);
        let max = (world - Vec2::splat(self.size)).max(Vec2::ZERO);
        self.pos = (self.pos + movement * speed).clamp(Vec2::ZERO, max);
        self.facing = self.facing.follow(movement.x);
    }

    /// Tick the auto-fire cooldown; true when a volley should be fired
    pub fn ready_to_fire(&mut self, fire_held: bool) -> bool {
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        if fire_held && self.fire_cooldown == 0 {
            self.fire_cooldown = FIRE_COOLDOWN_TICKS;
            true
        } else {
            false
        }
    }

    /// Volley for the current weapon tier, aimed at `aim` (world space)
    ///
    /// - tier 1: one basic shot
    /// - tier 2: three spread shots at 0, +0.2, -0.2 rad
    /// - tier N >= 3: N oscillating shots, phase `i/N`, offset
    ///   `(i - (N-1)/2) * 0.2`, +2 speed per tier above 3
    pub fn fire_pattern(&self, aim: Vec2) -> impl Iterator<Item = ShotSpec> + use<> {
        let origin = self.center();
        let base = angle_to(origin, aim);
        let tier = self.weapon_tier.max(1);
        let count = match tier {
            1 => 1,
            2 => 3,
            n => n,
        };

        (0..count).map(move |i| match tier {
            1 => ShotSpec::basic(origin, base),
            2 => {
                let offset = [0.0, SPREAD_STEP, -SPREAD_STEP][i as usize];
                ShotSpec {
                    origin,
                    angle: base + offset,
                    kind: ProjectileKind::Spread,
                    phase: 0.0,
                    speed: ProjectileKind::Spread.base_speed(),
                }
            }
            n => {
                let phase = i as f32 / n as f32;
                let offset = (i as f32 - (n - 1) as f32 / 2.0) * SPREAD_STEP;
                ShotSpec {
                    origin,
                    angle: base + offset,
                    kind: ProjectileKind::Oscillating,
                    phase,
                    speed: ProjectileKind::Oscillating.base_speed()
                        + (n - 3) as f32 * OSCILLATING_SPEED_PER_TIER,
                }
            }
        })
    }

    /// Shield box behind the player, facing away from `aim`; None when lowered
    pub fn shield_zone(&self, aim: Vec2) -> Option<OrientedRect> {
        if !self.shield_active {
            return None;
        }
        let center = self.center();
        let away = angle_to(aim, center);
        let shield_center = center + Vec2::from_angle(away) * SHIELD_RADIUS;
        Some(OrientedRect::new(
            shield_center,
            Vec2::new(SHIELD_THICKNESS, SHIELD_LENGTH),
            away,
        ))
    }

    /// Apply damage; true when the hit is fatal
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount);
    }

    /// Raise the weapon tier by one, returning the new tier
    pub fn upgrade_weapon(&mut self) -> u32 {
        self.weapon_tier = self.weapon_tier.saturating_add(1);
        self.weapon_tier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WORLD: Vec2 = Vec2::new(1600.0, 1200.0);

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y), 5)
    }

    #[test]
    fn test_tier_one_single_shot() {
        let p = player_at(90.0, 90.0);
        let shots: Vec<_> = p.fire_pattern(Vec2::new(200.0, 100.0)).collect();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].kind, ProjectileKind::Basic);
        assert!(shots[0].angle.abs() < 0.0001);
        assert_eq!(shots[0].origin, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_tier_two_spread() {
        let mut p = player_at(90.0, 90.0);
        p.weapon_tier = 2;
        let shots: Vec<_> = p.fire_pattern(Vec2::new(200.0, 100.0)).collect();
        assert_eq!(shots.len(), 3);
        let angles: Vec<f32> = shots.iter().map(|s| s.angle).collect();
        assert!(angles[0].abs() < 0.0001);
        assert!((angles[1] - 0.2).abs() < 0.0001);
        assert!((angles[2] + 0.2).abs() < 0.0001);
        assert!(shots.iter().all(|s| s.kind == ProjectileKind::Spread && s.speed == 9.0));
    }

    #[test]
    fn test_tier_five_fan() {
        let mut p = player_at(90.0, 90.0);
        p.weapon_tier = 5;
        let shots: Vec<_> = p.fire_pattern(Vec2::new(200.0, 100.0)).collect();
        assert_eq!(shots.len(), 5);
        assert!((shots[0].angle + 0.4).abs() < 0.0001);
        assert!(shots[2].angle.abs() < 0.0001);
        assert!((shots[4].angle - 0.4).abs() < 0.0001);
        assert!((shots[3].phase - 0.6).abs() < 0.0001);
        // 12 base + 2 per tier above 3
        assert!(shots.iter().all(|s| s.speed == 16.0));
    }

    #[test]
    fn test_fire_cooldown_cadence() {
        let mut p = player_at(0.0, 0.0);
        let fired: Vec<bool> = (0..11).map(|_| p.ready_to_fire(true)).collect();
        let fire_ticks: Vec<usize> = fired
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(fire_ticks, vec![0, 5, 10]);

        // Releasing fire lets the cooldown drain
        let mut p = player_at(0.0, 0.0);
        assert!(p.ready_to_fire(true));
        for _ in 0..10 {
            assert!(!p.ready_to_fire(false));
        }
        assert!(p.ready_to_fire(true));
    }

    #[test]
    fn test_sprint_scales_with_tier() {
        let mut p = player_at(100.0, 100.0);
        p.weapon_tier = 3;
        assert_eq!(p.move_speed(false), 5.0);
        assert!((p.move_speed(true) - 8.0).abs() < 0.0001);

        p.apply_intent(Vec2::new(1.0, 0.0), true, WORLD);
        assert!((p.pos.x - 108.0).abs() < 0.0001);
    }

    #[test]
    fn test_diagonal_is_not_normalized() {
        let mut p = player_at(100.0, 100.0);
        p.apply_intent(Vec2::new(1.0, -1.0), false, WORLD);
        assert_eq!(p.pos, Vec2::new(105.0, 95.0));
    }

    #[test]
    fn test_facing_follows_horizontal_movement() {
        let mut p = player_at(100.0, 100.0);
        assert_eq!(p.facing, Facing::Right);
        p.apply_intent(Vec2::new(-1.0, 0.0), false, WORLD);
        assert_eq!(p.facing, Facing::Left);
        // Vertical-only movement keeps the last facing
        p.apply_intent(Vec2::new(0.0, 1.0), false, WORLD);
        assert_eq!(p.facing, Facing::Left);
        p.apply_intent(Vec2::new(1.0, 1.0), false, WORLD);
        assert_eq!(p.facing, Facing::Right);
    }

    #[test]
    fn test_movement_clamped() {
        let mut p = player_at(2.0, 1178.0);
        p.apply_intent(Vec2::new(-1.0, 1.0), false, WORLD);
        assert_eq!(p.pos, Vec2::new(0.0, 1180.0));
    }

    #[test]
    fn test_shield_sits_behind_player() {
        let mut p = player_at(90.0, 90.0);
        let aim = Vec2::new(200.0, 100.0);
        assert!(p.shield_zone(aim).is_none());

        p.shield_active = true;
        let zone = p.shield_zone(aim).unwrap();
        assert!((zone.center - Vec2::new(70.0, 100.0)).length() < 0.001);
        assert!(zone.contains_point(Vec2::new(70.0, 120.0)));
        assert!(!zone.contains_point(Vec2::new(130.0, 100.0)));
    }

    #[test]
    fn test_take_damage_saturates() {
        let mut p = player_at(0.0, 0.0);
        assert!(!p.take_damage(1));
        assert!(p.take_damage(10));
        assert_eq!(p.health, 0);
    }

    proptest! {
        #[test]
        fn prop_fire_pattern_shape(tier in 1u32..12, ax in -500.0f32..500.0, ay in -500.0f32..500.0) {
            let mut p = player_at(400.0, 400.0);
            p.weapon_tier = tier;
            let aim = Vec2::new(410.0 + ax, 410.0 + ay);
            let base = angle_to(p.center(), aim);
            let shots: Vec<_> = p.fire_pattern(aim).collect();

            let expected = match tier { 1 => 1, 2 => 3, n => n as usize };
            prop_assert_eq!(shots.len(), expected);
            if tier >= 3 {
                for (i, s) in shots.iter().enumerate() {
                    let phase = i as f32 / tier as f32;
                    let offset = (i as f32 - (tier - 1) as f32 / 2.0) * 0.2;
                    prop_assert!((s.phase - phase).abs() < 1e-5);
                    prop_assert!((s.angle - (base + offset)).abs() < 1e-4);
                }
            }
        }

        #[test]
        fn prop_movement_stays_in_world(
            x in 0.0f32..1580.0,
            y in 0.0f32..1180.0,
            dx in -1i32..=1,
            dy in -1i32..=1,
            tier in 1u32..20,
            sprint: bool,
        ) {
            let mut p = player_at(x, y);
            p.weapon_tier = tier;
            for _ in 0..50 {
                p.apply_intent(Vec2::new(dx as f32, dy as f32), sprint, WORLD);
                prop_assert!(p.pos.x >= 0.0 && p.pos.x <= 1580.0);
                prop_assert!(p.pos.y >= 0.0 && p.pos.y <= 1180.0);
            }
        }
    }
}
