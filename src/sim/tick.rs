//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically, one pass per
//! tick in a fixed order:
//!
//! intent -> player -> camera -> enemy AI -> fire -> projectile motion
//! -> collisions -> pruning -> win/loss

use glam::Vec2;

use super::collision::resolve_collisions;
use super::enemy::{BroodChange, Enemy, EnemyContext};
use super::projectile::{ShotSpec, in_world};
use super::state::{EntityId, GameEvent, GamePhase, GameState, HealthTarget};
use crate::angle_to;

/// Autopilot raises the shield against bullets closer than this
const AUTOPILOT_SHIELD_RANGE: f32 = 120.0;
/// Autopilot tries to hold this distance to its target
const AUTOPILOT_STANDOFF: f32 = 250.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub sprint: bool,
    /// Auto-fire while held (5-tick cooldown)
    pub fire_held: bool,
    pub shield_held: bool,
    /// Cursor position in world space
    pub cursor_world: Vec2,
    /// One-shot: single basic shot toward the cursor
    pub fire_click: bool,
    /// One-shot: start a fresh session once the current one is over
    pub restart: bool,
    /// One-shot: handled by the frame driver, ignored by the core
    pub quit: bool,
    /// Idle/demo mode - AI plays the game
    pub autopilot: bool,
}

impl TickInput {
    /// Axis vector from the four direction flags (not normalized)
    pub fn movement(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| pos as i8 as f32 - neg as i8 as f32;
        Vec2::new(
            axis(self.move_left, self.move_right),
            axis(self.move_up, self.move_down),
        )
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    if state.is_over() {
        // Terminal until an explicit restart
        if input.restart {
            state.restart();
        }
        return;
    }

    state.time_ticks += 1;

    let input = if input.autopilot {
        autopilot(state, input)
    } else {
        input.clone()
    };

    update_player(state, &input);
    state.camera.update(state.player.center());

    update_broods(state);
    update_enemies(state);
    update_minions(state);
    fire_enemy_weapons(state);

    for p in &mut state.projectiles {
        p.advance();
    }
    for b in &mut state.enemy_bullets {
        b.advance();
    }
    for b in &mut state.minion_bullets {
        b.advance();
    }

    let report = resolve_collisions(state);

    let world = state.world;
    state.projectiles.retain(|p| in_world(p.pos, world));
    state
        .enemy_bullets
        .retain(|b| in_world(b.pos, world) && !b.has_returned());
    state.minion_bullets.retain(|b| in_world(b.pos, world));

    // Minions only die in the collision pass
    update_broods(state);
    state.update_cosmetics();

    if report.player_killed || state.player.health == 0 {
        state.phase = GamePhase::Lost;
        state.events.push(GameEvent::Lost);
        log::info!(
            "Player destroyed at tick {} (exp {}, {} enemies left)",
            state.time_ticks,
            state.exp,
            state.enemies.len()
        );
    } else if state.enemies.is_empty() {
        state.phase = GamePhase::Won;
        state.events.push(GameEvent::Won);
        log::info!(
            "All enemies destroyed at tick {} (exp {})",
            state.time_ticks,
            state.exp
        );
    }
}

fn update_player(state: &mut GameState, input: &TickInput) {
    state.aim = input.cursor_world;
    state
        .player
        .apply_intent(input.movement(), input.sprint, state.world);
    state.player.shield_active = input.shield_held;

    if state.player.ready_to_fire(input.fire_held) {
        for shot in state.player.fire_pattern(state.aim) {
            state.fire_shot(&shot);
        }
    }
    if input.fire_click {
        let origin = state.player.center();
        state.fire_shot(&ShotSpec::basic(origin, angle_to(origin, state.aim)));
    }
}

/// Let every mother react to the size of her brood
fn update_broods(state: &mut GameState) {
    let cadence = state.cadence;
    for i in 0..state.enemies.len() {
        let (id, before) = (state.enemies[i].id, state.enemies[i].health);
        let alive = state.brood_alive(id);
        let change = state.enemies[i].update_brood(alive, &cadence);

        // Last stand and enrage both rewrite health
        let (center, after) = (state.enemies[i].center(), state.enemies[i].health);
        state.record_health_change(
            HealthTarget::Enemy(id),
            center,
            after as i32 - before as i32,
            after,
        );

        match change {
            BroodChange::LastStand => {
                for m in state.minions.iter_mut().filter(|m| m.mother == id) {
                    m.fleeing = true;
                }
                log::debug!("Mother {} down to her last minion", id);
            }
            BroodChange::Enraged => {
                state.events.push(GameEvent::Enraged { id });
                log::info!("Mother {} enraged", id);
            }
            BroodChange::Unchanged => {}
        }
    }
}

fn update_enemies(state: &mut GameState) {
    // Dodges react to where projectiles are before they move this tick
    let ctx = EnemyContext {
        player_center: state.player.center(),
        projectiles: &state.projectiles,
        world: state.world,
        cadence: state.cadence,
    };
    for enemy in &mut state.enemies {
        enemy.step(&ctx, &mut state.rng);
    }
}

fn update_minions(state: &mut GameState) {
    let player_center = state.player.center();
    let world = state.world;
    for minion in &mut state.minions {
        let mother = state
            .enemies
            .iter()
            .find(|e| e.id == minion.mother)
            .map(Enemy::center);
        match mother {
            Some(center) if !minion.fleeing => minion.orbit(center, world),
            _ => {
                // Orphans flee too
                minion.fleeing = true;
                minion.flee(player_center, world);
            }
        }
    }
}

fn fire_enemy_weapons(state: &mut GameState) {
    let now = state.time_ticks;
    let target = state.player.center();
    let cadence = state.cadence;

    let volleys: Vec<_> = state
        .enemies
        .iter_mut()
        .filter_map(|e| e.shoot(target, now, &cadence).map(|v| (e.id, v)))
        .collect();
    for (shooter, volley) in &volleys {
        state.fire_volley(*shooter, volley);
    }

    let shots: Vec<(EntityId, Vec2, f32)> = state
        .minions
        .iter_mut()
        .filter_map(|m| m.shoot(target, now, &cadence).map(|a| (m.id, m.center(), a)))
        .collect();
    for (shooter, origin, angle) in shots {
        state.fire_minion_bullet(shooter, origin, angle);
    }
}

/// Demo AI: aim at the nearest enemy, keep a standoff distance, and turn
/// the shield toward the closest incoming bullet
fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let center = state.player.center();
    let mut out = TickInput {
        cursor_world: input.cursor_world,
        restart: input.restart,
        quit: input.quit,
        autopilot: true,
        ..TickInput::default()
    };
    let mut movement = Vec2::ZERO;

    if let Some(target) = nearest(center, state.enemies.iter().map(Enemy::center)) {
        out.cursor_world = target;
        out.fire_held = true;
        let dist = target.distance(center);
        if dist > AUTOPILOT_STANDOFF * 1.2 {
            movement = target - center;
        } else if dist < AUTOPILOT_STANDOFF * 0.8 {
            movement = center - target;
        }
    }

    let threat = nearest(
        center,
        state
            .enemy_bullets
            .iter()
            .filter(|b| !b.is_reflected())
            .map(|b| b.pos)
            .chain(state.minion_bullets.iter().map(|b| b.pos))
            .filter(|p| p.distance(center) < AUTOPILOT_SHIELD_RANGE),
    );
    if let Some(bullet) = threat {
        // The shield sits on the side facing away from the cursor
        out.shield_held = true;
        out.cursor_world = center - (bullet - center);
        movement = (center - bullet).perp();
    }

    let dir = movement.normalize_or_zero();
    out.move_left = dir.x < -0.3;
    out.move_right = dir.x > 0.3;
    out.move_up = dir.y < -0.3;
    out.move_down = dir.y > 0.3;
    out
}

fn nearest(center: Vec2, points: impl Iterator<Item = Vec2>) -> Option<Vec2> {
    points.min_by(|a, b| a.distance(center).total_cmp(&b.distance(center)))
}
