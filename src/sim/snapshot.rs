//! Read-only frame snapshot handed to the renderer

use glam::Vec2;
use serde::Serialize;

use super::state::{EnemyKind, Flash, GamePhase, GameState};

#[derive(Debug, Clone, Serialize)]
pub struct ArrowView {
    pub pos: Vec2,
    pub angle: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub size: Vec2,
    pub hp_ratio: f32,
    pub kind: EnemyKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArcherView {
    pub pos: Vec2,
    pub aim: f32,
    pub body_color: [f32; 4],
    pub bow_color: [f32; 4],
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub width: f32,
    pub height: f32,
    pub arrows: Vec<ArrowView>,
    pub enemies: Vec<EnemyView>,
    pub archer: ArcherView,
    pub score: u32,
    pub time_remaining: f32,
    pub flashes: Vec<Flash>,
    pub phase: GamePhase,
}

impl RenderFrame {
    pub fn capture(state: &GameState) -> Self {
        Self {
            width: state.config.width,
            height: state.config.height,
            arrows: state
                .arrows
                .iter_live()
                .map(|a| ArrowView {
                    pos: a.pos,
                    angle: a.angle,
                })
                .collect(),
            enemies: state
                .enemies
                .iter_live()
                .map(|e| EnemyView {
                    pos: e.pos,
                    size: e.size,
                    hp_ratio: e.hp_ratio(),
                    kind: e.kind,
                })
                .collect(),
            archer: ArcherView {
                pos: state.archer.pos,
                aim: state.archer.aim,
                body_color: state.archer.body_color,
                bow_color: state.archer.bow_color,
            },
            score: state.score,
            time_remaining: state.time_remaining,
            flashes: state.flashes.clone(),
            phase: state.phase,
        }
    }

    /// Whole seconds shown on the HUD
    pub fn hud_seconds(&self) -> u32 {
        self.time_remaining.max(0.0).ceil() as u32
    }
}
