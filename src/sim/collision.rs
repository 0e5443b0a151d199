//! Hit geometry
//!
//! Arrows collide as a single point: the tip, `ARROW_LENGTH` along the
//! heading from the tail. Enemies are axis-aligned boxes. A shaft crossing a
//! box without the tip inside it is a miss.

use glam::Vec2;

use super::state::{Arrow, Enemy};
use crate::consts::ARROW_LENGTH;
use crate::heading;

/// Leading point of an arrow with tail at `pos`
#[inline]
pub fn arrow_tip(pos: Vec2, angle: f32) -> Vec2 {
    pos + heading(angle) * ARROW_LENGTH
}

/// Inclusive point-in-box test for a box given by centre and size
#[inline]
pub fn point_in_box(point: Vec2, center: Vec2, size: Vec2) -> bool {
    let min = center - size / 2.0;
    let max = min + size;
    point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
}

/// Whether the arrow's tip lies inside the enemy's box
pub fn arrow_hits_enemy(arrow: &Arrow, enemy: &Enemy) -> bool {
    point_in_box(arrow.tip(), enemy.pos, enemy.size)
}

/// Whether `pos` lies outside the playfield grown by `margin` on every side
#[inline]
pub fn outside_bounds(pos: Vec2, width: f32, height: f32, margin: f32) -> bool {
    pos.x < -margin || pos.x > width + margin || pos.y < -margin || pos.y > height + margin
}
