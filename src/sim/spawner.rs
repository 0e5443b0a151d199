//! Enemy spawning
//!
//! Two independent triggers: a fixed-interval timer and a floor on the live
//! enemy count. All randomness is drawn from the state's seeded RNG, in a
//! fixed order (height, speed, kind), so runs replay exactly.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind, GameEvent, GameState};
use crate::consts::{SPAWN_BAND_MARGIN, SPAWN_X_OFFSET};

/// Spawn one enemy just beyond the right edge. Returns its ID.
pub fn spawn_enemy(state: &mut GameState) -> u32 {
    let width = state.config.width;
    let height = state.config.height;
    let (speed_min, speed_max) = (state.config.enemy_speed_min, state.config.enemy_speed_max);
    let reinforced_chance = state.config.reinforced_chance;

    let band = height - 2.0 * SPAWN_BAND_MARGIN;
    let y = if band > 0.0 {
        SPAWN_BAND_MARGIN + state.rng.random::<f32>() * band
    } else {
        // Playfield too short for a safe band
        height / 2.0
    };
    let speed = -(speed_min + state.rng.random::<f32>() * (speed_max - speed_min));
    let kind = if state.rng.random_bool(reinforced_chance) {
        EnemyKind::Reinforced
    } else {
        EnemyKind::Standard
    };

    let id = state.next_entity_id();
    state
        .enemies
        .push(Enemy::new(id, kind, Vec2::new(width + SPAWN_X_OFFSET, y), speed));
    state.events.push(GameEvent::Spawned { enemy: id, kind });
    log::debug!("Spawned {:?} enemy {} at y={:.0} speed={:.1}", kind, id, y, speed);
    id
}

/// Advance the spawn timer, spawning once when the interval elapses
pub fn update(state: &mut GameState, dt: f32) {
    state.spawn_timer += dt;
    if state.spawn_timer >= state.config.spawn_interval {
        state.spawn_timer = 0.0;
        spawn_enemy(state);
    }
}

/// Spawn one enemy if the live count is under the floor
pub fn maintain_floor(state: &mut GameState) -> bool {
    if state.enemies.live_count() < state.config.enemy_floor {
        spawn_enemy(state);
        true
    } else {
        false
    }
}

/// Fill up to the floor population (used on reset)
pub fn seed_floor(state: &mut GameState) {
    while state.enemies.live_count() < state.config.enemy_floor {
        spawn_enemy(state);
    }
}
