//! Last Archer - hold the line against the horde before the clock runs out
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, kinematics, hits, scoring)
//! - `session`: Run/ended/reset lifecycle and per-frame driving
//! - `input`: Raw pointer/touch/keyboard events to aim + activate
//! - `config`: Validated game tuning
//! - `renderer`: WebGPU triangle renderer fed by `RenderFrame` snapshots

pub mod config;
pub mod input;
pub mod renderer;
pub mod session;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use input::{NormalizedInput, RawInput};
pub use session::{Activation, FrameOutcome, Renderer, Session};

/// Fixed game geometry (playfield units are CSS pixels)
pub mod consts {
    /// Largest delta a single tick will integrate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.040;

    /// Arrow shaft length; the tip sits this far along the heading
    pub const ARROW_LENGTH: f32 = 34.0;
    /// Arrow head length (cosmetic)
    pub const ARROW_HEAD: f32 = 8.0;
    /// Arrows are discarded once this far outside the playfield
    pub const ARROW_BOUNDS_MARGIN: f32 = 50.0;

    /// Enemy bounding box
    pub const ENEMY_WIDTH: f32 = 44.0;
    pub const ENEMY_HEIGHT: f32 = 70.0;
    pub const STANDARD_HP: u8 = 1;
    pub const REINFORCED_HP: u8 = 3;
    /// Enemies spawn this far past the right edge
    pub const SPAWN_X_OFFSET: f32 = 40.0;
    /// Top/bottom band kept free of spawns (HUD and ground)
    pub const SPAWN_BAND_MARGIN: f32 = 110.0;
    /// Enemies past this x have escaped
    pub const ESCAPE_X: f32 = -100.0;

    /// Archer anchor (feet position)
    pub const ARCHER_X: f32 = 110.0;
    pub const ARCHER_GROUND_OFFSET: f32 = 110.0;
    pub const ARCHER_MIN_Y: f32 = 60.0;
    pub const ARCHER_BOTTOM_MARGIN: f32 = 40.0;
    /// An enemy whose left edge reaches archer.x + this has caught the archer
    pub const CATCH_BUFFER: f32 = 12.0;

    /// Muzzle offset from the archer's feet
    pub const MUZZLE_OFFSET_X: f32 = 28.0;
    pub const MUZZLE_OFFSET_Y: f32 = 40.0;
    /// Arrows start this far along the aim from the muzzle
    pub const MUZZLE_LEAD: f32 = 10.0;
    /// Aim is measured from this height above the feet
    pub const AIM_PIVOT_Y: f32 = 40.0;

    /// Transient acknowledgment lifetimes (seconds)
    pub const KILL_FLASH_SECS: f32 = 0.6;
    pub const BONUS_FLASH_SECS: f32 = 1.5;

    /// Ground strip height (cosmetic)
    pub const GROUND_HEIGHT: f32 = 80.0;
}

/// Angle from `from` toward `to` in screen space (y grows downward)
#[inline]
pub fn angle_between(from: glam::Vec2, to: glam::Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for a heading angle
#[inline]
pub fn heading(angle: f32) -> glam::Vec2 {
    glam::Vec2::new(angle.cos(), angle.sin())
}
