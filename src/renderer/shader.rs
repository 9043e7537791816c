//! Terrain shader loading and pipeline creation
//!
//! Shader problems never abort the viewer: a missing file or a module that
//! fails validation is logged and the pipeline is left out, so draws become
//! no-ops while the rest of the frame loop keeps running.

use std::borrow::Cow;
use std::path::Path;

use crate::renderer::error::{gpu_operation_error, RendererErrorContext, RendererResult};
use crate::renderer::vertex::Vertex;

/// Built-in terrain shader
pub const TERRAIN_SHADER: &str = include_str!("shaders/terrain.wgsl");

/// WGSL source from `path`, or the built-in shader when no path is set
pub fn load_shader_source(path: Option<&Path>) -> RendererResult<Cow<'static, str>> {
    match path {
        None => Ok(Cow::Borrowed(TERRAIN_SHADER)),
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .renderer_context(&format!("Failed to read shader {}", path.display()))?;
            log::info!(
                "[load_shader_source] Loaded {} bytes from {}",
                source.len(),
                path.display()
            );
            Ok(Cow::Owned(source))
        }
    }
}

/// Build the terrain pipeline, or `None` if the shader cannot be used
pub fn create_terrain_pipeline(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    shader_path: Option<&Path>,
) -> Option<wgpu::RenderPipeline> {
    let source = match load_shader_source(shader_path) {
        Ok(source) => source,
        Err(e) => {
            log::error!("[create_terrain_pipeline] {}; terrain will not be drawn", e);
            return None;
        }
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Terrain Shader"),
        source: wgpu::ShaderSource::Wgsl(source),
    });

    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Terrain Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout],
        push_constant_ranges: &[],
    });

    let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Terrain Pipeline"),
        layout: Some(&render_pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            buffers: &[Vertex::desc()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    });

    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        let error = gpu_operation_error("terrain shader compile", error);
        log::error!("[create_terrain_pipeline] {}; terrain will not be drawn", error);
        return None;
    }

    log::info!("[create_terrain_pipeline] Terrain pipeline ready");
    Some(render_pipeline)
}
