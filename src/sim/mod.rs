//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Variable timestep supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod store;
pub mod tick;

pub use collision::{arrow_hits_enemy, arrow_tip, outside_bounds, point_in_box};
pub use snapshot::{ArcherView, ArrowView, EnemyView, RenderFrame};
pub use state::{
    Archer, Arrow, EndCause, Enemy, EnemyKind, Flash, FlashKind, GameEvent, GamePhase, GameState,
};
pub use store::{Entity, EntityStore};
pub use tick::{TickInput, clamp_dt, tick};
