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
    /// Opaque color from 0xRRGGBB
    pub const fn rgb(hex: u32) -> [f32; 4] {
        [
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
            1.0,
        ]
    }

    pub const BACKGROUND: [f32; 4] = rgb(0xffffff);
    pub const TEXT: [f32; 4] = rgb(0x000000);
    pub const TEXT_MUTED: [f32; 4] = rgb(0xaaaaaa);
    pub const TEXT_ON_BUTTON: [f32; 4] = rgb(0xffffff);

    pub const PLAYER: [f32; 4] = rgb(0x2196f3);
    pub const PLAYER_STROKE: [f32; 4] = rgb(0x1976d2);

    /// Green - must collect
    pub const GOOD: [f32; 4] = rgb(0x4caf50);
    pub const GOOD_STROKE: [f32; 4] = rgb(0x388e3c);
    /// Red - must avoid
    pub const BAD: [f32; 4] = rgb(0xf44336);
    pub const BAD_STROKE: [f32; 4] = rgb(0xc62828);
    pub const BAD_DARK: [f32; 4] = rgb(0xb71c1c);

    pub const START_BUTTON: [f32; 4] = GOOD;
    pub const START_BUTTON_STROKE: [f32; 4] = GOOD_STROKE;
    pub const RESTART_BUTTON: [f32; 4] = PLAYER;
    pub const RESTART_BUTTON_STROKE: [f32; 4] = PLAYER_STROKE;
}
