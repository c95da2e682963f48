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

/// Colors for scene decorations not described by the layout
pub mod colors {
    pub const GAUGE_SAFE: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const GAUGE_WARNING: [f32; 4] = [0.95, 0.75, 0.2, 1.0];
    pub const GAUGE_CRITICAL: [f32; 4] = [0.9, 0.15, 0.1, 1.0];
    pub const GAUGE_FACE: [f32; 4] = [0.08, 0.08, 0.1, 1.0];
    pub const KNOB_MARK: [f32; 4] = [0.15, 0.15, 0.18, 1.0];
    pub const SURGE_GLOW: [f32; 4] = [1.0, 0.45, 0.1, 1.0];
    pub const LEAK_GLOW: [f32; 4] = [0.2, 0.9, 1.0, 1.0];
}
