//! Simulation step
//!
//! Advances the world by one variable delta. Order within a tick:
//! input, timers/spawns, countdown, arrows, enemies (movement, contact, hits),
//! floor top-up. Termination stops the tick where it happens.

use glam::Vec2;

use super::collision::{arrow_hits_enemy, outside_bounds};
use super::spawner;
use super::state::{EndCause, Flash, FlashKind, GameEvent, GameState};
use crate::consts::{ARROW_BOUNDS_MARGIN, CATCH_BUFFER, ESCAPE_X};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest aim angle (radians, screen space)
    pub aim: Option<f32>,
    /// Loose one arrow this tick
    pub fire: bool,
}

/// Sanitize a wall-clock delta: negatives and NaN become 0, large stalls are
/// capped at `max`
pub fn clamp_dt(dt: f32, max: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(max)
    } else {
        0.0
    }
}

/// Advance the game state by `dt` seconds. No-op unless running.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if !state.is_running() {
        return;
    }
    let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

    state.events.clear();
    state.time_ticks += 1;

    if let Some(aim) = input.aim.filter(|a| a.is_finite()) {
        state.archer.aim = aim;
    }
    if input.fire {
        state.fire();
    }

    // Timers
    spawner::update(state, dt);
    for flash in state.flashes.iter_mut() {
        flash.ttl -= dt;
    }
    state.flashes.retain(|f| f.ttl > 0.0);

    // Countdown
    state.time_remaining -= dt;
    if state.time_remaining <= 0.0 {
        state.time_remaining = 0.0;
        state.end(EndCause::TimeUp);
        return;
    }

    move_arrows(state, dt);

    if !resolve_enemies(state, dt) {
        return;
    }

    spawner::maintain_floor(state);
}

fn move_arrows(state: &mut GameState, dt: f32) {
    let (width, height) = (state.config.width, state.config.height);
    for arrow in state.arrows.iter_mut() {
        arrow.advance(dt);
        if outside_bounds(arrow.pos, width, height, ARROW_BOUNDS_MARGIN) {
            arrow.alive = false;
        }
    }
    state.arrows.retain_live();
}

/// Move enemies and settle contact/hits. Returns false if the archer was caught.
fn resolve_enemies(state: &mut GameState, dt: f32) -> bool {
    let catch_x = state.archer.pos.x + CATCH_BUFFER;

    let mut i = 0;
    while i < state.enemies.len() {
        let caught = match state.enemies.get_mut(i) {
            Some(enemy) => {
                enemy.pos.x += enemy.speed * dt;
                enemy.left_edge() <= catch_x
            }
            None => break,
        };
        if caught {
            state.end(EndCause::Caught);
            return false;
        }

        // At most one hit per enemy per tick: the first arrow in store order
        let hit_arrow = state.enemies.get(i).and_then(|enemy| {
            state
                .arrows
                .position(|arrow| arrow.alive && arrow_hits_enemy(arrow, enemy))
        });
        if let Some(arrow_index) = hit_arrow {
            state.arrows.remove(arrow_index);
            register_hit(state, i);
        }

        let remove = state
            .enemies
            .get(i)
            .is_some_and(|e| !e.alive || e.pos.x < ESCAPE_X);
        if remove {
            let enemy = state.enemies.remove(i);
            if enemy.alive {
                log::debug!("Enemy {} escaped", enemy.id);
                state.events.push(GameEvent::Escaped { enemy: enemy.id });
            }
        } else {
            i += 1;
        }
    }

    true
}

fn register_hit(state: &mut GameState, index: usize) {
    let Some(enemy) = state.enemies.get_mut(index) else {
        return;
    };
    let killed = enemy.take_hit();
    let (id, pos, hp_left) = (enemy.id, enemy.pos, enemy.hp);

    state.events.push(GameEvent::Hit {
        enemy: id,
        hp_left,
    });
    if !killed {
        return;
    }

    state.score += 1;
    state.kills_since_bonus += 1;
    state.flashes.push(Flash::new(FlashKind::Kill, pos));
    state.events.push(GameEvent::Killed { enemy: id, pos });
    log::debug!("Enemy {} killed, score {}", id, state.score);

    if state.kills_since_bonus >= state.config.kills_per_bonus {
        let seconds = state.config.bonus_seconds;
        state.time_remaining += seconds;
        state.kills_since_bonus = 0;

        let banner = state.archer.pos - Vec2::new(0.0, 130.0);
        state.flashes.push(Flash::new(FlashKind::TimeBonus, banner));
        state.events.push(GameEvent::TimeBonus {
            seconds,
            time_remaining: state.time_remaining,
        });
        log::debug!("Time bonus +{}s, {:.1}s left", seconds, state.time_remaining);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::{Arrow, Enemy, EnemyKind, GamePhase};
    use std::f32::consts::PI;

    /// Running state with no enemies and no floor top-up
    fn bare_state() -> GameState {
        let config = GameConfig {
            enemy_floor: 0,
            ..Default::default()
        };
        let mut state = GameState::new(config, 12345).unwrap();
        state.reset();
        state
    }

    fn add_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, kind, pos, -40.0));
        id
    }

    /// Arrow whose tip sits exactly on `target`
    fn add_arrow_tipped_at(state: &mut GameState, target: Vec2, angle: f32) -> u32 {
        let id = state.next_entity_id();
        let pos = target - crate::heading(angle) * crate::consts::ARROW_LENGTH;
        state.arrows.push(Arrow {
            id,
            pos,
            angle,
            speed: 1200.0,
            alive: true,
        });
        id
    }

    #[test]
    fn test_tick_is_noop_unless_running() {
        let mut state = GameState::new(GameConfig::default(), 1).unwrap();
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.016);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.arrows.is_empty());
        assert_eq!(state.time_remaining, 100.0);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(0.016, 0.04), 0.016);
        assert_eq!(clamp_dt(2.5, 0.04), 0.04);
        assert_eq!(clamp_dt(-1.0, 0.04), 0.0);
        assert_eq!(clamp_dt(f32::NAN, 0.04), 0.0);
    }

    #[test]
    fn test_single_hit_kills_standard_enemy() {
        let mut state = bare_state();
        let enemy = add_enemy(&mut state, EnemyKind::Standard, Vec2::new(400.0, 300.0));
        // Arrow in flight toward the enemy; after 16ms the tip is inside the box
        state.arrows.push(Arrow {
            id: 99,
            pos: Vec2::new(340.0, 300.0),
            angle: 0.0,
            speed: 1200.0,
            alive: true,
        });

        tick(&mut state, &TickInput::default(), 0.016);

        assert_eq!(state.score, 1);
        assert!(state.enemies.is_empty());
        assert!(state.arrows.is_empty());
        assert_eq!(state.kills_since_bonus, 1);
        assert!(state.events.iter().any(
            |e| matches!(e, GameEvent::Killed { enemy: id, .. } if *id == enemy)
        ));
        assert_eq!(state.flashes.len(), 1);
        assert_eq!(state.flashes[0].kind, FlashKind::Kill);
    }

    #[test]
    fn test_reinforced_enemy_needs_three_hits_one_per_tick() {
        let mut state = bare_state();
        let target = Vec2::new(400.0, 300.0);
        add_enemy(&mut state, EnemyKind::Reinforced, target);
        for _ in 0..3 {
            add_arrow_tipped_at(&mut state, target, 0.0);
        }

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.enemies.get(0).unwrap().hp, 2);
        assert_eq!(state.arrows.len(), 2);
        assert_eq!(state.score, 0);

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.enemies.get(0).unwrap().hp, 1);
        assert_eq!(state.score, 0);

        tick(&mut state, &TickInput::default(), 0.0);
        assert!(state.enemies.is_empty());
        assert!(state.arrows.is_empty());
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_first_arrow_in_order_is_consumed() {
        let mut state = bare_state();
        let target = Vec2::new(400.0, 300.0);
        add_enemy(&mut state, EnemyKind::Reinforced, target);
        let first = add_arrow_tipped_at(&mut state, target, 0.0);
        let second = add_arrow_tipped_at(&mut state, target, 0.0);

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.arrows.len(), 1);
        assert_eq!(state.arrows.get(0).unwrap().id, second);
        assert!(state.arrows.position(|a| a.id == first).is_none());
    }

    #[test]
    fn test_two_kills_grant_time_bonus() {
        let mut state = bare_state();
        let a = Vec2::new(400.0, 200.0);
        let b = Vec2::new(600.0, 400.0);
        add_enemy(&mut state, EnemyKind::Standard, a);
        add_enemy(&mut state, EnemyKind::Standard, b);
        add_arrow_tipped_at(&mut state, a, 0.0);
        add_arrow_tipped_at(&mut state, b, 0.0);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.score, 2);
        assert_eq!(state.kills_since_bonus, 0);
        assert_eq!(state.time_remaining, 110.0);
        assert!(state.events.contains(&GameEvent::TimeBonus {
            seconds: 10.0,
            time_remaining: 110.0
        }));
        assert!(state.flashes.iter().any(|f| f.kind == FlashKind::TimeBonus));
    }

    #[test]
    fn test_hit_without_kill_does_not_count_toward_bonus() {
        let mut state = bare_state();
        let target = Vec2::new(400.0, 300.0);
        add_enemy(&mut state, EnemyKind::Reinforced, target);
        add_arrow_tipped_at(&mut state, target, 0.0);

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.kills_since_bonus, 0);
        assert!(state.events.contains(&GameEvent::Hit {
            enemy: state.enemies.get(0).unwrap().id,
            hp_left: 2
        }));
    }

    #[test]
    fn test_time_up_clamps_and_halts() {
        let mut state = bare_state();
        state.time_remaining = 0.05;
        state.arrows.push(Arrow {
            id: 50,
            pos: Vec2::new(200.0, 200.0),
            angle: 0.0,
            speed: 1200.0,
            alive: true,
        });

        tick(&mut state, &TickInput::default(), 0.1);

        assert_eq!(state.phase, GamePhase::Ended(EndCause::TimeUp));
        assert_eq!(state.time_remaining, 0.0);
        // Arrows were not advanced after the countdown expired
        assert_eq!(state.arrows.get(0).unwrap().pos, Vec2::new(200.0, 200.0));
        assert!(state.events.contains(&GameEvent::Ended {
            cause: EndCause::TimeUp
        }));

        // Further ticks do nothing
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.time_remaining, 0.0);
    }

    #[test]
    fn test_enemy_reaching_archer_ends_run() {
        let mut state = bare_state();
        // Left edge at 118 <= 110 + 12 after any leftward move
        add_enemy(&mut state, EnemyKind::Standard, Vec2::new(141.0, 300.0));
        let behind = add_enemy(&mut state, EnemyKind::Standard, Vec2::new(700.0, 300.0));

        tick(&mut state, &TickInput::default(), 0.04);

        assert_eq!(state.phase, GamePhase::Ended(EndCause::Caught));
        assert!(state.time_remaining > 99.0);
        // Enemies after the catching one were not processed
        let later = state.enemies.iter().find(|e| e.id == behind).unwrap();
        assert_eq!(later.pos.x, 700.0);
    }

    #[test]
    fn test_caught_takes_precedence_over_pending_hit() {
        let mut state = bare_state();
        let target = Vec2::new(130.0, 300.0);
        add_enemy(&mut state, EnemyKind::Standard, target);
        add_arrow_tipped_at(&mut state, target, 0.0);

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.end_cause(), Some(EndCause::Caught));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_arrow_leaving_bounds_is_removed_and_never_hits() {
        let mut state = bare_state();
        state.arrows.push(Arrow {
            id: 77,
            pos: Vec2::new(1005.0, 100.0),
            angle: 0.0,
            speed: 1200.0,
            alive: true,
        });

        tick(&mut state, &TickInput::default(), 0.04);
        assert!(state.arrows.is_empty());

        // An enemy placed where the tip would have been registers nothing
        add_enemy(&mut state, EnemyKind::Standard, Vec2::new(1087.0, 100.0));
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.enemies.get(0).unwrap().hp, 1);
    }

    #[test]
    fn test_escaped_enemy_removed_without_score() {
        let mut state = bare_state();
        // Move the archer out of the way so the enemy can walk off the edge
        state.archer.pos.x = -1000.0;
        let id = add_enemy(&mut state, EnemyKind::Standard, Vec2::new(-99.0, 300.0));

        tick(&mut state, &TickInput::default(), 0.04);

        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 0);
        assert!(state.events.contains(&GameEvent::Escaped { enemy: id }));
        assert!(state.is_running());
    }

    #[test]
    fn test_fire_and_aim_input() {
        let mut state = bare_state();
        let input = TickInput {
            aim: Some(-PI / 4.0),
            fire: true,
        };
        tick(&mut state, &input, 0.016);

        assert_eq!(state.archer.aim, -PI / 4.0);
        assert_eq!(state.arrows.len(), 1);
        let arrow = state.arrows.get(0).unwrap();
        assert_eq!(arrow.angle, -PI / 4.0);
        // Moved up and to the right
        let muzzle = state.archer.muzzle();
        assert!(arrow.pos.x > muzzle.x && arrow.pos.y < muzzle.y);
    }

    #[test]
    fn test_non_finite_aim_is_ignored() {
        let mut state = bare_state();
        state.archer.aim = 0.3;
        let input = TickInput {
            aim: Some(f32::NAN),
            fire: false,
        };
        tick(&mut state, &input, 0.016);
        assert_eq!(state.archer.aim, 0.3);
    }

    #[test]
    fn test_floor_top_up_after_kill() {
        let config = GameConfig::default();
        let mut state = GameState::new(config, 9).unwrap();
        state.reset();
        assert_eq!(state.enemies.len(), 5);

        let target = state.enemies.get(0).unwrap().pos;
        let victim = state.enemies.get(0).unwrap().id;
        // Make sure it dies in one hit
        if let Some(e) = state.enemies.get_mut(0) {
            e.hp = 1;
            e.max_hp = 1;
        }
        add_arrow_tipped_at(&mut state, target, 0.0);

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.score, 1);
        assert_eq!(state.enemies.len(), 5);
        assert!(state.enemies.position(|e| e.id == victim).is_none());
    }

    #[test]
    fn test_two_kills_in_one_tick_top_up_only_once() {
        let mut state = GameState::new(GameConfig::default(), 9).unwrap();
        state.reset();
        assert_eq!(state.enemies.len(), 5);

        let targets: Vec<Vec2> = (0..2)
            .map(|i| {
                let enemy = state.enemies.get_mut(i).unwrap();
                enemy.hp = 1;
                enemy.max_hp = 1;
                enemy.pos
            })
            .collect();
        for &target in &targets {
            add_arrow_tipped_at(&mut state, target, 0.0);
        }

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.score, 2);
        assert_eq!(state.time_remaining, 110.0);
        // Three survivors plus a single floor spawn
        assert_eq!(state.enemies.len(), 4);
        let spawned = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 1);

        // The next tick closes the gap
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.enemies.len(), 5);
    }

    #[test]
    fn test_zero_delta_is_idempotent() {
        let mut state = GameState::new(GameConfig::default(), 4242).unwrap();
        state.reset();
        tick(&mut state, &TickInput::default(), 0.016);

        let before: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();
        let time = state.time_remaining;
        let spawn_timer = state.spawn_timer;

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 0.0);
        }

        let after: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();
        assert_eq!(before, after);
        assert_eq!(state.time_remaining, time);
        assert_eq!(state.spawn_timer, spawn_timer);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_flashes_expire() {
        let mut state = bare_state();
        state.flashes.push(Flash::new(FlashKind::Kill, Vec2::ZERO));
        tick(&mut state, &TickInput::default(), 0.04);
        assert_eq!(state.flashes.len(), 1);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), 0.04);
        }
        assert!(state.flashes.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(GameConfig::default(), 99999).unwrap();
        let mut state2 = GameState::new(GameConfig::default(), 99999).unwrap();
        state1.reset();
        state2.reset();

        let inputs = [
            TickInput {
                aim: Some(-0.2),
                ..Default::default()
            },
            TickInput {
                fire: true,
                ..Default::default()
            },
            TickInput {
                aim: Some(0.1),
                fire: true,
            },
            TickInput::default(),
        ];

        for _ in 0..100 {
            for input in &inputs {
                tick(&mut state1, input, 0.033);
                tick(&mut state2, input, 0.033);
            }
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.enemies.len(), state2.enemies.len());
        for (a, b) in state1.enemies.iter().zip(state2.enemies.iter()) {
            assert_eq!(a.pos, b.pos);
            assert_eq!(a.hp, b.hp);
        }
        assert_eq!(state1.time_remaining, state2.time_remaining);
    }
}
