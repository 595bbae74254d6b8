//! Collision detection and resolution across entity populations
//!
//! Every test is a point (projectile position) against a box. Tests run in
//! a fixed precedence and each projectile resolves at most one collision
//! per tick:
//!
//! 1. player projectiles vs enemies, then vs minions
//! 2. enemy bullets vs shield, then vs player body (reflected bullets test
//!    enemies, then minions instead)
//! 3. minion bullets vs shield, then vs player body
//! 4. pickups vs player
//!
//! Dead entities are skipped for the rest of the pass and removed once the
//! pass is complete. There is no swept collision, so a fast projectile can
//! step over a thin target between ticks.

use glam::Vec2;

use super::enemy::{Enemy, Minion, roll_drop};
use super::state::{EntityId, GameEvent, GameState, HealthTarget};
use crate::consts::*;

/// What a projectile hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Enemy(usize),
    Minion(usize),
}

/// Summary of one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub kills: u32,
    pub reflected: u32,
    pub pickups_collected: u32,
    pub player_killed: bool,
}

/// First live enemy, then first live minion, containing `pos`
pub fn find_target(enemies: &[Enemy], minions: &[Minion], pos: Vec2) -> Option<Target> {
    enemies
        .iter()
        .position(|e| e.health > 0 && e.rect().contains_point(pos))
        .map(Target::Enemy)
        .or_else(|| {
            minions
                .iter()
                .position(|m| m.health > 0 && m.rect().contains_point(pos))
                .map(Target::Minion)
        })
}

/// Run the full collision pass for this tick
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();

    resolve_player_projectiles(state, &mut report);
    resolve_enemy_bullets(state, &mut report);
    resolve_minion_bullets(state, &mut report);

    // Removals only after every population has been tested
    state.enemies.retain(|e| e.health > 0);
    state.minions.retain(|m| m.health > 0);

    if !report.player_killed {
        resolve_pickups(state, &mut report);
    }

    report
}

fn resolve_player_projectiles(state: &mut GameState, report: &mut CollisionReport) {
    let mut consumed = vec![false; state.projectiles.len()];
    for (i, hit) in consumed.iter_mut().enumerate() {
        let pos = state.projectiles[i].pos;
        if let Some(target) = find_target(&state.enemies, &state.minions, pos) {
            apply_hit(state, target, 1, report);
            *hit = true;
        }
    }
    retain_unconsumed(&mut state.projectiles, &consumed);
}

fn resolve_enemy_bullets(state: &mut GameState, report: &mut CollisionReport) {
    let shield = state.player.shield_zone(state.aim);
    let body = state.player.rect();
    let mut consumed = vec![false; state.enemy_bullets.len()];

    for (i, hit) in consumed.iter_mut().enumerate() {
        let bullet = &state.enemy_bullets[i];
        let (pos, damage) = (bullet.pos, bullet.damage);

        if bullet.is_reflected() {
            // Flying home: harmless to the player, hurts whatever it meets
            if let Some(target) = find_target(&state.enemies, &state.minions, pos) {
                apply_hit(state, target, damage, report);
                *hit = true;
            }
            continue;
        }

        if shield.is_some_and(|zone| zone.contains_point(pos)) {
            let bullet = &mut state.enemy_bullets[i];
            if bullet.reflect() {
                let id = bullet.id;
                state.events.push(GameEvent::BulletReflected { id });
                report.reflected += 1;
                log::debug!("Bullet {} reflected", id);
            }
            continue;
        }

        if body.contains_point(pos) {
            *hit = true;
            if !report.player_killed && state.damage_player(damage) {
                report.player_killed = true;
            }
        }
    }
    retain_unconsumed(&mut state.enemy_bullets, &consumed);
}

fn resolve_minion_bullets(state: &mut GameState, report: &mut CollisionReport) {
    let shield = state.player.shield_zone(state.aim);
    let body = state.player.rect();
    let mut consumed = vec![false; state.minion_bullets.len()];

    for (i, hit) in consumed.iter_mut().enumerate() {
        let bullet = &state.minion_bullets[i];
        let (pos, damage) = (bullet.pos, bullet.damage);

        // The shield absorbs minion bullets
        if shield.is_some_and(|zone| zone.contains_point(pos)) {
            *hit = true;
            continue;
        }

        if body.contains_point(pos) {
            *hit = true;
            if !report.player_killed && state.damage_player(damage) {
                report.player_killed = true;
            }
        }
    }
    retain_unconsumed(&mut state.minion_bullets, &consumed);
}

fn resolve_pickups(state: &mut GameState, report: &mut CollisionReport) {
    let body = state.player.rect();
    let (touched, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.pickups)
        .into_iter()
        .partition(|p| body.overlaps(&p.rect()));
    state.pickups = kept;

    for _ in &touched {
        state.collect_pickup();
        report.pickups_collected += 1;
    }
}

/// Damage a target, record the change, and reward the player on a kill
fn apply_hit(state: &mut GameState, target: Target, damage: u32, report: &mut CollisionReport) {
    let (id, center, before, after, fatal, minion) = match target {
        Target::Enemy(i) => {
            let e = &mut state.enemies[i];
            let before = e.health;
            let fatal = e.take_hit(damage);
            (e.id, e.center(), before, e.health, fatal, false)
        }
        Target::Minion(i) => {
            let m = &mut state.minions[i];
            let before = m.health;
            let fatal = m.take_hit(damage);
            (m.id, m.center(), before, m.health, fatal, true)
        }
    };

    let health_target = if minion {
        HealthTarget::Minion(id)
    } else {
        HealthTarget::Enemy(id)
    };
    state.record_health_change(health_target, center, after as i32 - before as i32, after);

    if fatal {
        reward_kill(state, id, center, minion);
        report.kills += 1;
    }
}

/// Kill reward: experience, +1 player health, and a drop roll
fn reward_kill(state: &mut GameState, id: EntityId, center: Vec2, minion: bool) {
    state.exp += KILL_EXP;
    state.events.push(GameEvent::EnemyKilled {
        id,
        pos: center,
        minion,
    });
    state.heal_player(1);
    if let Some(pos) = roll_drop(center, &mut state.rng) {
        state.spawn_pickup(pos);
    }
    log::debug!("{} {} killed at {:?}", if minion { "Minion" } else { "Enemy" }, id, center);
}

fn retain_unconsumed<T>(items: &mut Vec<T>, consumed: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !consumed[index];
        index += 1;
        keep
    });
}
