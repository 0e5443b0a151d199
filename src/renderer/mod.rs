//! WebGPU rendering module
//!
//! `scene` tessellates a `RenderFrame` into colored triangles in playfield
//! pixels; `pipeline` maps them to NDC and draws them in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use vertex::Vertex;
