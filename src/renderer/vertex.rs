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
    pub const BACKGROUND_DARK: [f32; 4] = [0.07, 0.08, 0.1, 1.0];
    pub const BACKGROUND_LIGHT: [f32; 4] = [0.93, 0.94, 0.96, 1.0];
    pub const ARENA_DARK: [f32; 4] = [0.16, 0.17, 0.2, 1.0];
    pub const ARENA_LIGHT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    pub const PLAYER1: [f32; 4] = [0.9, 0.2, 0.2, 1.0];
    pub const PLAYER2: [f32; 4] = [0.2, 0.4, 0.95, 1.0];
    pub const BARREL: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
    pub const SHELL: [f32; 4] = [0.15, 0.15, 0.15, 1.0];
    pub const WALL: [f32; 4] = [0.45, 0.45, 0.5, 1.0];

    pub const GRASS: [f32; 4] = [0.3, 0.6, 0.3, 1.0];
    pub const ASPHALT: [f32; 4] = [0.33, 0.33, 0.36, 1.0];
    pub const FINISH: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    pub const GRID: [f32; 4] = [0.5, 0.5, 0.55, 0.25];
    pub const SIGNAL_RED: [f32; 4] = [0.95, 0.15, 0.15, 1.0];
    pub const SIGNAL_GREEN: [f32; 4] = [0.15, 0.85, 0.3, 1.0];
    pub const FINISH_ROW: [f32; 4] = [0.95, 0.85, 0.3, 0.6];

    pub const LAWN_LIGHT: [f32; 4] = [0.45, 0.75, 0.3, 1.0];
    pub const LAWN_DARK: [f32; 4] = [0.38, 0.66, 0.25, 1.0];
    pub const HOUSE: [f32; 4] = [0.6, 0.45, 0.35, 1.0];
    pub const STREET: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
    pub const PEASHOOTER: [f32; 4] = [0.2, 0.8, 0.2, 1.0];
    pub const SUNFLOWER: [f32; 4] = [1.0, 0.85, 0.1, 1.0];
    pub const WALLNUT: [f32; 4] = [0.6, 0.4, 0.2, 1.0];
    pub const CHERRY: [f32; 4] = [0.85, 0.05, 0.15, 1.0];
    pub const ZOMBIE: [f32; 4] = [0.45, 0.55, 0.45, 1.0];
    pub const PEA: [f32; 4] = [0.4, 0.95, 0.3, 1.0];
    pub const SUN: [f32; 4] = [1.0, 0.9, 0.2, 0.95];
    pub const MOWER: [f32; 4] = [0.8, 0.1, 0.1, 1.0];

    pub const SKY: [f32; 4] = [0.53, 0.81, 0.98, 1.0];
    pub const GROUND: [f32; 4] = [0.35, 0.7, 0.25, 1.0];
    pub const CRATE: [f32; 4] = [0.65, 0.45, 0.2, 1.0];
    pub const ENEMY: [f32; 4] = [0.13, 0.13, 0.13, 1.0];
    pub const FLAG: [f32; 4] = [1.0, 0.8, 0.0, 1.0];
    pub const BALL: [f32; 4] = [0.9, 0.1, 0.1, 1.0];

    pub const APPLE: [f32; 4] = [0.1, 0.7, 0.1, 1.0];
    pub const BOARD_LINE: [f32; 4] = [0.55, 0.55, 0.6, 1.0];
}
