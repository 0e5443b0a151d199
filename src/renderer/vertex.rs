//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.027, 0.078, 0.157, 1.0];
    pub const SKY_MID: [f32; 4] = [0.031, 0.071, 0.094, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.016, 0.063, 0.071, 1.0];
    pub const GROUND: [f32; 4] = [0.043, 0.169, 0.071, 1.0];
    pub const ARROW_SHAFT: [f32; 4] = [1.0, 0.82, 0.4, 1.0];
    pub const ARROW_HEAD: [f32; 4] = [1.0, 0.718, 0.012, 1.0];
    pub const ENEMY: [f32; 4] = [0.42, 0.75, 0.29, 1.0];
    pub const ENEMY_REINFORCED: [f32; 4] = [0.3, 0.55, 0.22, 1.0];
    pub const EYE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const EYE_PUPIL: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const HP_BACK: [f32; 4] = [0.133, 0.133, 0.133, 1.0];
    pub const HP_FILL: [f32; 4] = [1.0, 0.22, 0.36, 1.0];
    pub const BOW_GRIP: [f32; 4] = [0.0, 0.2, 0.0, 1.0];
    pub const KILL_FLASH: [f32; 4] = [1.0, 0.87, 0.53, 1.0];
    pub const BONUS_FLASH: [f32; 4] = [0.0, 1.0, 0.8, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.016, 0.063, 0.071, 1.0];
}
