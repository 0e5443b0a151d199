//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`; nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::store::{Entity, EntityStore};
use crate::config::{ConfigError, GameConfig};
use crate::consts::*;
use crate::heading;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    /// The countdown reached zero
    TimeUp,
    /// An enemy reached the archer
    Caught,
}

impl EndCause {
    /// Overlay text shown when the run ends
    pub fn message(&self) -> &'static str {
        match self {
            EndCause::TimeUp => "Time's up! Tap or press SPACE to restart",
            EndCause::Caught => "Caught! Tap or press SPACE to restart",
        }
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Built but never started
    Idle,
    /// Ticking
    Running,
    /// Run over, waiting for a reset
    Ended(EndCause),
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Standard,
    Reinforced,
}

impl EnemyKind {
    pub fn max_hp(&self) -> u8 {
        match self {
            EnemyKind::Standard => STANDARD_HP,
            EnemyKind::Reinforced => REINFORCED_HP,
        }
    }
}

/// A flying arrow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrow {
    pub id: u32,
    /// Tail position
    pub pos: Vec2,
    /// Heading (radians, screen space)
    pub angle: f32,
    pub speed: f32,
    pub alive: bool,
}

impl Arrow {
    /// Leading point; the arrow's only collision geometry
    pub fn tip(&self) -> Vec2 {
        super::collision::arrow_tip(self.pos, self.angle)
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += heading(self.angle) * self.speed * dt;
    }
}

impl Entity for Arrow {
    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// A walking enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Box centre
    pub pos: Vec2,
    /// Box width/height
    pub size: Vec2,
    /// Signed horizontal speed (negative = leftward)
    pub speed: f32,
    pub hp: u8,
    pub max_hp: u8,
    pub alive: bool,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
            speed,
            hp: kind.max_hp(),
            max_hp: kind.max_hp(),
            alive: true,
        }
    }

    pub fn left_edge(&self) -> f32 {
        self.pos.x - self.size.x / 2.0
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }

    /// Take one hit. Returns true when this hit was the killing blow.
    pub fn take_hit(&mut self) -> bool {
        self.hp = self.hp.saturating_sub(1);
        if self.hp == 0 && self.alive {
            self.alive = false;
            return true;
        }
        false
    }
}

impl Entity for Enemy {
    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Archer {
    /// Feet position
    pub pos: Vec2,
    /// Aim (radians, screen space)
    pub aim: f32,
    pub body_color: [f32; 4],
    pub bow_color: [f32; 4],
}

impl Archer {
    pub fn new(playfield_height: f32) -> Self {
        Self {
            pos: Vec2::new(ARCHER_X, Self::home_y(playfield_height)),
            aim: 0.0,
            body_color: [0.0, 1.0, 0.8, 1.0],
            bow_color: [0.53, 0.81, 0.01, 1.0],
        }
    }

    /// Resting height for a given playfield
    pub fn home_y(playfield_height: f32) -> f32 {
        playfield_height - ARCHER_GROUND_OFFSET
    }

    /// Where new arrows leave the bow
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + MUZZLE_OFFSET_X, self.pos.y - MUZZLE_OFFSET_Y)
    }

    /// Point aim angles are measured from
    pub fn aim_pivot(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - AIM_PIVOT_Y)
    }

    /// Keep the archer on screen after a playfield resize
    pub fn clamp_to(&mut self, playfield_height: f32) {
        let max_y = (playfield_height - ARCHER_BOTTOM_MARGIN).max(ARCHER_MIN_Y);
        self.pos.y = self.pos.y.clamp(ARCHER_MIN_Y, max_y);
    }
}

/// Kinds of short-lived visual acknowledgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashKind {
    Kill,
    TimeBonus,
}

/// A short-lived visual acknowledgment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub pos: Vec2,
    /// Seconds left
    pub ttl: f32,
    /// Full lifetime (for fade)
    pub duration: f32,
}

impl Flash {
    pub fn new(kind: FlashKind, pos: Vec2) -> Self {
        let duration = match kind {
            FlashKind::Kill => KILL_FLASH_SECS,
            FlashKind::TimeBonus => BONUS_FLASH_SECS,
        };
        Self {
            kind,
            pos,
            ttl: duration,
            duration,
        }
    }

    /// 1.0 when fresh, 0.0 when expired
    pub fn remaining(&self) -> f32 {
        (self.ttl / self.duration).clamp(0.0, 1.0)
    }
}

/// Something that happened during the last tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { arrow: u32 },
    Spawned { enemy: u32, kind: EnemyKind },
    Hit { enemy: u32, hp_left: u8 },
    Killed { enemy: u32, pos: Vec2 },
    Escaped { enemy: u32 },
    TimeBonus { seconds: f32, time_remaining: f32 },
    Ended { cause: EndCause },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    pub kills_since_bonus: u32,
    /// Countdown (seconds, never negative)
    pub time_remaining: f32,
    /// Seconds accumulated toward the next timed spawn
    pub spawn_timer: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub archer: Archer,
    pub arrows: EntityStore<Arrow>,
    pub enemies: EntityStore<Enemy>,
    /// Visual acknowledgments (not gameplay-affecting)
    pub flashes: Vec<Flash>,
    /// Events from the most recent tick or reset; the next tick clears them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Build an idle state; call `reset` to begin a run
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            archer: Archer::new(config.height),
            time_remaining: config.initial_time,
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            score: 0,
            kills_since_bonus: 0,
            spawn_timer: 0.0,
            time_ticks: 0,
            arrows: EntityStore::new(),
            enemies: EntityStore::new(),
            flashes: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, GamePhase::Ended(_))
    }

    pub fn end_cause(&self) -> Option<EndCause> {
        match self.phase {
            GamePhase::Ended(cause) => Some(cause),
            _ => None,
        }
    }

    /// Start a fresh run: clear everything, refill the countdown and seed
    /// the floor population
    pub fn reset(&mut self) {
        self.arrows.clear();
        self.enemies.clear();
        self.flashes.clear();
        self.events.clear();
        self.score = 0;
        self.kills_since_bonus = 0;
        self.time_remaining = self.config.initial_time;
        self.spawn_timer = 0.0;
        self.time_ticks = 0;
        self.archer.pos.y = Archer::home_y(self.config.height);
        self.phase = GamePhase::Running;

        super::spawner::seed_floor(self);
        log::info!(
            "Run started: {} enemies, {:.0}s on the clock",
            self.enemies.len(),
            self.time_remaining
        );
    }

    /// Transition to ended (first cause wins)
    pub fn end(&mut self, cause: EndCause) {
        if self.is_ended() {
            return;
        }
        self.phase = GamePhase::Ended(cause);
        self.events.push(GameEvent::Ended { cause });
        log::info!(
            "Run ended ({:?}) with score {} and {:.1}s left",
            cause,
            self.score,
            self.time_remaining
        );
    }

    /// Loose an arrow from the muzzle along the current aim
    pub fn fire(&mut self) {
        let angle = self.archer.aim;
        let pos = self.archer.muzzle() + heading(angle) * MUZZLE_LEAD;
        let id = self.next_entity_id();
        self.arrows.push(Arrow {
            id,
            pos,
            angle,
            speed: self.config.arrow_speed,
            alive: true,
        });
        self.events.push(GameEvent::Fired { arrow: id });
    }

    /// Track a new playfield size
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.archer.clamp_to(height);
    }
}
