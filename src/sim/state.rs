//! Game state and core simulation types
//!
//! The session owns every entity collection; nothing outside `tick` mutates
//! them during play.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::enemy::{Cadence, Enemy, EnemyMode, Minion, Volley};
use super::player::Player;
use super::projectile::{EnemyBullet, MinionBullet, Projectile, ShotSpec};
use super::shape::Rect;
use crate::consts::*;
use crate::settings::Settings;

/// Entity identifier, unique within one session
pub type EntityId = u32;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every enemy destroyed (terminal until restart)
    Won,
    /// Player destroyed (terminal until restart)
    Lost,
}

/// Whose health changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthTarget {
    Player,
    Enemy(EntityId),
    Minion(EntityId),
}

/// Discrete events for the HUD/audio collaborators, drained every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    HealthChanged {
        target: HealthTarget,
        delta: i32,
        health: u32,
    },
    WeaponTierUp {
        tier: u32,
    },
    EnemyKilled {
        id: EntityId,
        pos: Vec2,
        minion: bool,
    },
    Enraged {
        id: EntityId,
    },
    BulletReflected {
        id: EntityId,
    },
    PickupSpawned {
        pos: Vec2,
    },
    Won,
    Lost,
    Restarted {
        seed: u64,
    },
}

/// Drifting damage/heal number (purely cosmetic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    /// 0xRRGGBB
    pub color: u32,
    pub ttl: u32,
}

pub const DAMAGE_TEXT_COLOR: u32 = 0xFF0000;
pub const HEAL_TEXT_COLOR: u32 = 0x00FF00;

/// Centered HUD banner with a countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HudMessage {
    pub text: String,
    pub ticks_left: u32,
}

/// A weapon upgrade dropped on a kill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: EntityId,
    /// Center point
    pub pos: Vec2,
    pub size: f32,
}

impl Pickup {
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub cadence: Cadence,
    pub world: Vec2,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub camera: Camera,
    /// Last cursor world position
    pub aim: Vec2,
    /// Enemies in spawn order (collision precedence follows this order)
    pub enemies: Vec<Enemy>,
    pub minions: Vec<Minion>,
    pub projectiles: Vec<Projectile>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub minion_bullets: Vec<MinionBullet>,
    pub pickups: Vec<Pickup>,
    /// Visual only
    pub floating_texts: Vec<FloatingText>,
    pub hud_message: Option<HudMessage>,
    /// Events raised during the last tick
    pub events: Vec<GameEvent>,
    /// Experience (score)
    pub exp: u64,
    pub bullets_shot: u64,
    /// Next entity ID
    next_id: EntityId,
}

impl GameState {
    /// Create a new session and spawn its enemy population
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let world = Vec2::new(settings.world_width, settings.world_height);
        let player_pos = Vec2::new(
            (world.x / 2.0).floor(),
            (world.y - 100.0).max(0.0),
        );
        let player = Player::new(player_pos, settings.player_health);
        let camera = Camera::new(
            Vec2::new(settings.screen_width, settings.screen_height),
            world,
            player.center(),
        );

        let mut state = Self {
            settings: settings.clone(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            cadence: Cadence::from_settings(settings),
            world,
            time_ticks: 0,
            phase: GamePhase::Playing,
            aim: player.center(),
            player,
            camera,
            enemies: Vec::new(),
            minions: Vec::new(),
            projectiles: Vec::new(),
            enemy_bullets: Vec::new(),
            minion_bullets: Vec::new(),
            pickups: Vec::new(),
            floating_texts: Vec::new(),
            hud_message: None,
            events: Vec::new(),
            exp: 0,
            bullets_shot: 0,
            next_id: 1,
        };

        state.spawn_enemies(settings.enemy_count);
        log::info!(
            "Session started: seed={}, world={}x{}, enemies={}, minions={}",
            seed,
            world.x,
            world.y,
            state.enemies.len(),
            state.minions.len()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Re-initialize from scratch with a fresh seed drawn from this run
    pub fn restart(&mut self) {
        let seed: u64 = self.rng.random();
        *self = Self::new(&self.settings, seed);
        self.events.push(GameEvent::Restarted { seed });
        log::info!("Session restarted with seed {}", seed);
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase != GamePhase::Playing
    }

    /// Spawn `count` enemies uniformly inside the world margin; some are mothers
    pub fn spawn_enemies(&mut self, count: u32) {
        for _ in 0..count {
            let x = self.random_coord(self.world.x);
            let y = self.random_coord(self.world.y);
            let pos = Vec2::new(x, y);
            if self.rng.random_bool(self.settings.mother_chance.clamp(0.0, 1.0)) {
                let brood = self.rng.random_range(1..=MAX_MINIONS);
                self.spawn_mother(pos, brood);
            } else {
                self.spawn_enemy(pos);
            }
        }
    }

    fn random_coord(&mut self, extent: f32) -> f32 {
        let (lo, hi) = (SPAWN_MARGIN, extent - SPAWN_MARGIN);
        if lo < hi {
            self.rng.random_range(lo..=hi).floor()
        } else {
            (extent / 2.0).max(0.0)
        }
    }

    pub fn spawn_enemy(&mut self, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let walk_angle = self.rng.random_range(0.0..TAU);
        self.enemies
            .push(Enemy::new(id, pos, walk_angle, self.time_ticks));
        id
    }

    /// Spawn a mother together with her evenly spaced minions
    pub fn spawn_mother(&mut self, pos: Vec2, brood: u32) -> EntityId {
        let id = self.next_entity_id();
        let walk_angle = self.rng.random_range(0.0..TAU);
        let mother = Enemy::new_mother(id, pos, walk_angle, brood, self.time_ticks);
        let center = mother.center();
        self.enemies.push(mother);

        for i in 0..brood {
            let minion_id = self.next_entity_id();
            let angle = TAU * i as f32 / brood as f32;
            self.minions
                .push(Minion::new(minion_id, id, center, angle, self.time_ticks));
        }
        id
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Live minions belonging to `mother`
    pub fn brood_alive(&self, mother: EntityId) -> u32 {
        self.minions.iter().filter(|m| m.mother == mother).count() as u32
    }

    /// Fraction of a mother's brood still alive (0.0 when she had none)
    pub fn brood_fraction(&self, mother: &Enemy) -> f32 {
        match mother.mode {
            EnemyMode::Mother { brood, .. } => {
                crate::fraction(self.brood_alive(mother.id), brood)
            }
            _ => 0.0,
        }
    }

    /// Spawn a player projectile from a shot descriptor
    pub fn fire_shot(&mut self, shot: &ShotSpec) {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile::from_shot(id, shot));
        self.bullets_shot += 1;
    }

    pub fn fire_volley(&mut self, shooter: EntityId, volley: &Volley) {
        for angle in volley.angles {
            let id = self.next_entity_id();
            self.enemy_bullets.push(EnemyBullet::new(
                id,
                shooter,
                volley.origin,
                angle,
                volley.boosted,
            ));
        }
    }

    pub fn fire_minion_bullet(&mut self, shooter: EntityId, origin: Vec2, angle: f32) {
        let id = self.next_entity_id();
        self.minion_bullets
            .push(MinionBullet::new(id, shooter, origin, angle));
    }

    pub fn spawn_pickup(&mut self, pos: Vec2) {
        let id = self.next_entity_id();
        self.pickups.push(Pickup {
            id,
            pos,
            size: DROP_SIZE,
        });
        self.events.push(GameEvent::PickupSpawned { pos });
    }

    /// Record a health change: HUD event plus a floating number at `pos`
    pub fn record_health_change(&mut self, target: HealthTarget, pos: Vec2, delta: i32, health: u32) {
        if delta == 0 {
            return;
        }
        self.events.push(GameEvent::HealthChanged {
            target,
            delta,
            health,
        });
        let (text, color) = if delta < 0 {
            (delta.to_string(), DAMAGE_TEXT_COLOR)
        } else {
            (format!("+{delta}"), HEAL_TEXT_COLOR)
        };
        self.floating_texts.push(FloatingText {
            pos,
            text,
            color,
            ttl: FLOATING_TEXT_TICKS,
        });
    }

    /// Heal the player and record it
    pub fn heal_player(&mut self, amount: u32) {
        self.player.heal(amount);
        let (center, health) = (self.player.center(), self.player.health);
        self.record_health_change(HealthTarget::Player, center, amount as i32, health);
    }

    /// Damage the player and record it; true when fatal
    pub fn damage_player(&mut self, amount: u32) -> bool {
        let before = self.player.health;
        let fatal = self.player.take_damage(amount);
        let (center, health) = (self.player.center(), self.player.health);
        self.record_health_change(
            HealthTarget::Player,
            center,
            health as i32 - before as i32,
            health,
        );
        fatal
    }

    /// Apply a collected pickup: +1 weapon tier, +1 health
    pub fn collect_pickup(&mut self) {
        let tier = self.player.upgrade_weapon();
        self.heal_player(1);
        self.events.push(GameEvent::WeaponTierUp { tier });
        self.hud_message = Some(HudMessage {
            text: format!("Stellanator level {tier} unlocked"),
            ticks_left: HUD_MESSAGE_TICKS,
        });
        log::debug!("Weapon tier up: {}", tier);
    }

    /// Advance cosmetic timers (floating texts drift up and expire)
    pub fn update_cosmetics(&mut self) {
        for text in &mut self.floating_texts {
            text.pos.y -= FLOATING_TEXT_DRIFT;
            text.ttl = text.ttl.saturating_sub(1);
        }
        self.floating_texts.retain(|t| t.ttl > 0);

        if let Some(msg) = &mut self.hud_message {
            msg.ticks_left = msg.ticks_left.saturating_sub(1);
            if msg.ticks_left == 0 {
                self.hud_message = None;
            }
        }
    }
}
