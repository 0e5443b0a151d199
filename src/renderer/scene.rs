//! Scene tessellation
//!
//! Turns a `RenderFrame` into one triangle list in playfield pixels. Draw
//! order is back to front: sky, ground, arrows, enemies, archer, flashes.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::heading;
use crate::sim::{ArcherView, ArrowView, EnemyKind, EnemyView, Flash, FlashKind, RenderFrame};

const STROKE: f32 = 3.0;
const HEAD_SPREAD: f32 = 0.28;
const HP_BAR_WIDTH: f32 = 36.0;
const HP_BAR_HEIGHT: f32 = 6.0;
const HP_BAR_GAP: f32 = 12.0;
/// Fraction of the sky above the horizon color stop
const SKY_STOP: f32 = 0.7;

pub fn build(frame: &RenderFrame) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(
        24 + frame.arrows.len() * 9 + frame.enemies.len() * 24 + 256 + frame.flashes.len() * 192,
    );

    background(&mut vertices, frame.width, frame.height);
    for arrow in &frame.arrows {
        vertices.extend(arrow_shape(arrow));
    }
    for enemy in &frame.enemies {
        vertices.extend(enemy_shape(enemy));
    }
    vertices.extend(archer_shape(&frame.archer));
    for flash in &frame.flashes {
        vertices.extend(flash_shape(flash));
    }

    vertices
}

fn background(out: &mut Vec<Vertex>, width: f32, height: f32) {
    let stop = height * SKY_STOP;
    out.extend(shapes::gradient_rect(
        Vec2::ZERO,
        Vec2::new(width, stop),
        colors::SKY_TOP,
        colors::SKY_MID,
    ));
    out.extend(shapes::gradient_rect(
        Vec2::new(0.0, stop),
        Vec2::new(width, height - stop),
        colors::SKY_MID,
        colors::SKY_BOTTOM,
    ));
    out.extend(shapes::rect(
        Vec2::new(0.0, height - GROUND_HEIGHT),
        Vec2::new(width, GROUND_HEIGHT),
        colors::GROUND,
    ));
}

pub fn arrow_shape(arrow: &ArrowView) -> Vec<Vertex> {
    let tip = arrow.pos + heading(arrow.angle) * ARROW_LENGTH;
    let barb = ARROW_LENGTH - ARROW_HEAD;

    let mut v = shapes::line(arrow.pos, tip, STROKE, colors::ARROW_SHAFT);
    v.extend(shapes::triangle(
        tip,
        arrow.pos + heading(arrow.angle + HEAD_SPREAD) * barb,
        arrow.pos + heading(arrow.angle - HEAD_SPREAD) * barb,
        colors::ARROW_HEAD,
    ));
    v
}

pub fn enemy_shape(enemy: &EnemyView) -> Vec<Vertex> {
    let body = match enemy.kind {
        EnemyKind::Standard => colors::ENEMY,
        EnemyKind::Reinforced => colors::ENEMY_REINFORCED,
    };
    let top_left = enemy.pos - enemy.size / 2.0;

    let mut v = shapes::rect(top_left, enemy.size, body);

    // Eye
    v.extend(shapes::rect(
        enemy.pos + Vec2::new(-10.0, -30.0),
        Vec2::splat(6.0),
        colors::EYE_WHITE,
    ));
    v.extend(shapes::rect(
        enemy.pos + Vec2::new(-8.0, -28.0),
        Vec2::splat(2.0),
        colors::EYE_PUPIL,
    ));

    // Health bar
    let bar = Vec2::new(enemy.pos.x - HP_BAR_WIDTH / 2.0, top_left.y - HP_BAR_GAP);
    v.extend(shapes::rect(
        bar,
        Vec2::new(HP_BAR_WIDTH, HP_BAR_HEIGHT),
        colors::HP_BACK,
    ));
    let fill = HP_BAR_WIDTH * enemy.hp_ratio.clamp(0.0, 1.0);
    if fill > 0.0 {
        v.extend(shapes::rect(
            bar,
            Vec2::new(fill, HP_BAR_HEIGHT),
            colors::HP_FILL,
        ));
    }
    v
}

/// Stick figure with the bow rotated toward the aim
pub fn archer_shape(archer: &ArcherView) -> Vec<Vertex> {
    let p = archer.pos;
    let body = archer.body_color;

    let mut v = shapes::ring(
        p - Vec2::new(0.0, 90.0),
        12.0 - STROKE / 2.0,
        12.0 + STROKE / 2.0,
        body,
        24,
    );
    v.extend(shapes::line(
        p - Vec2::new(0.0, 78.0),
        p - Vec2::new(0.0, 40.0),
        STROKE,
        body,
    ));
    v.extend(shapes::line(
        p + Vec2::new(-18.0, -66.0),
        p + Vec2::new(18.0, -66.0),
        STROKE,
        body,
    ));
    for side in [-14.0, 14.0] {
        v.extend(shapes::line(
            p - Vec2::new(0.0, 40.0),
            p + Vec2::new(side, -8.0),
            STROKE,
            body,
        ));
    }

    let grip = p + Vec2::new(8.0, -64.0);
    v.extend(shapes::rotated_rect(
        grip,
        archer.aim,
        Vec2::new(0.0, -6.0),
        Vec2::new(44.0, 12.0),
        archer.bow_color,
    ));
    v.extend(shapes::rotated_rect(
        grip,
        archer.aim,
        Vec2::new(34.0, -3.0),
        Vec2::new(10.0, 6.0),
        colors::BOW_GRIP,
    ));
    v
}

/// Expanding ring that fades out over the flash lifetime
pub fn flash_shape(flash: &Flash) -> Vec<Vertex> {
    let remaining = flash.remaining();
    if remaining <= 0.0 {
        return Vec::new();
    }
    let (mut color, base) = match flash.kind {
        FlashKind::Kill => (colors::KILL_FLASH, 14.0),
        FlashKind::TimeBonus => (colors::BONUS_FLASH, 24.0),
    };
    color[3] *= remaining;
    let radius = base + (1.0 - remaining) * base * 1.5;
    shapes::ring(flash.pos, radius - 2.0, radius + 2.0, color, 32)
}
