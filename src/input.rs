//! Input normalization
//!
//! Turns raw pointer/touch/keyboard events (already in game coordinates) into
//! the two signals the simulation understands: an aim angle and an activate
//! trigger. Anything malformed normalizes to nothing.

use glam::Vec2;

use crate::angle_between;
use crate::sim::Archer;

/// A device event in game-space coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    PointerMove { x: f32, y: f32 },
    PointerDown { x: f32, y: f32 },
    /// First touch point, if the event carried one
    TouchStart(Option<(f32, f32)>),
    TouchMove(Option<(f32, f32)>),
    /// `KeyboardEvent.code`
    KeyDown(String),
}

/// What a raw event means to the game
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizedInput {
    pub aim: Option<f32>,
    pub activate: bool,
}

impl NormalizedInput {
    pub fn is_empty(&self) -> bool {
        self.aim.is_none() && !self.activate
    }
}

/// Aim angle from the archer's pivot toward a point
pub fn aim_at(archer: &Archer, x: f32, y: f32) -> Option<f32> {
    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    Some(angle_between(archer.aim_pivot(), Vec2::new(x, y)))
}

pub fn normalize(event: &RawInput, archer: &Archer) -> NormalizedInput {
    match event {
        RawInput::PointerMove { x, y } | RawInput::TouchMove(Some((x, y))) => NormalizedInput {
            aim: aim_at(archer, *x, *y),
            activate: false,
        },
        RawInput::PointerDown { x, y } | RawInput::TouchStart(Some((x, y))) => {
            match aim_at(archer, *x, *y) {
                Some(aim) => NormalizedInput {
                    aim: Some(aim),
                    activate: true,
                },
                None => NormalizedInput::default(),
            }
        }
        RawInput::KeyDown(code) if code == "Space" => NormalizedInput {
            aim: None,
            activate: true,
        },
        _ => NormalizedInput::default(),
    }
}
