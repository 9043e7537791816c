use wgpu::util::DeviceExt;

use crate::world::Chunk;

/// GPU-resident copy of one chunk's vertices
///
/// Holds the render-space chunk center so culling never has to look back at
/// the CPU chunk.
#[derive(Debug)]
pub struct GpuMesh {
    buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
    center: [f32; 2],
}

impl GpuMesh {
    /// Upload a chunk's vertices; empty chunks get no buffer
    pub fn create(device: &wgpu::Device, chunk: &Chunk, center: [f32; 2]) -> Self {
        let (origin_x, origin_z) = chunk.origin();
        let buffer = if chunk.is_empty() {
            None
        } else {
            Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("Chunk ({}, {}) Vertices", origin_x, origin_z)),
                contents: bytemuck::cast_slice(chunk.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            }))
        };

        Self {
            buffer,
            vertex_count: chunk.vertex_count() as u32,
            center,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn center(&self) -> [f32; 2] {
        self.center
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_none()
    }

    /// Record a draw; assumes the pipeline and camera bind group are set
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if let Some(buffer) = &self.buffer {
            render_pass.set_vertex_buffer(0, buffer.slice(..));
            render_pass.draw(0..self.vertex_count, 0..1);
        }
    }

    /// Release the GPU buffer now instead of waiting for drop
    pub fn destroy(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            buffer.destroy();
        }
        self.vertex_count = 0;
    }
}

impl Drop for GpuMesh {
    fn drop(&mut self) {
        self.destroy();
    }
}
