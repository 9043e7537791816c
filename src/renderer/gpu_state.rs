use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use wgpu::util::DeviceExt;
use winit::{
    dpi::LogicalSize,
    event::{DeviceEvent, ElementState, Event, WindowEvent},
    event_loop::EventLoop,
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowBuilder},
};

use crate::camera::{build_camera_uniform, camera_from_entity, CameraUniform, RenderContext};
use crate::config::{CameraConfig, MeshConfig, ViewerConfig};
use crate::error::{EngineError, EngineResult};
use crate::input::InputState;
use crate::physics::Entity;
use crate::renderer::frame_stats::{format_title, FrameStats};
use crate::renderer::mesh::GpuMesh;
use crate::renderer::shader::create_terrain_pipeline;
use crate::simulation::Simulation;
use crate::world::{is_chunk_visible, Chunk, ChunkCoord, TerrainGenerator, WorldGrid};

pub struct GpuState {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    context: RenderContext,
    /// Absent when the terrain shader failed; draws are skipped
    render_pipeline: Option<wgpu::RenderPipeline>,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,
    meshes: Vec<GpuMesh>,
    camera_config: CameraConfig,
    clear_color: wgpu::Color,
    visible_vertices: usize,
}

impl GpuState {
    async fn new(window: Arc<Window>, viewer: &ViewerConfig, chunks: &[Chunk]) -> EngineResult<Self> {
        log::info!("[GpuState::new] Starting GPU initialization");
        let init_start = Instant::now();

        let size = window.inner_size();
        let context = RenderContext::new(size.width.max(1), size.height.max(1));
        log::debug!("[GpuState::new] Window size: {}x{}", size.width, size.height);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).map_err(|e| {
            log::error!("[GpuState::new] Failed to create surface: {}", e);
            EngineError::SurfaceCreation(e.to_string())
        })?;

        let adapter = request_adapter(&instance, &surface).await?;
        let info = adapter.get_info();
        log::info!(
            "[GpuState::new] Adapter: {} ({:?}, {:?})",
            info.name,
            info.device_type,
            info.backend
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Terrain Viewer Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults()
                        .using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .map_err(|e| {
                log::error!("[GpuState::new] Failed to create GPU device: {}", e);
                EngineError::DeviceRequest(e.to_string())
            })?;

        device.on_uncaptured_error(Box::new(|error| {
            log::error!("[GPU] Uncaptured device error: {}", error);
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| EngineError::SurfaceCreation("no supported surface formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        log::info!("[GpuState::new] Surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: context.width,
            height: context.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let camera_uniform: CameraUniform = bytemuck::Zeroable::zeroed();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let render_pipeline = create_terrain_pipeline(
            &device,
            surface_format,
            &camera_bind_group_layout,
            viewer.render.shader_path.as_deref(),
        );

        let meshes = upload_chunks(&device, chunks, &viewer.mesh);

        let [r, g, b] = viewer.render.clear_color;
        log::info!(
            "[GpuState::new] GPU state initialization complete in {:?}",
            init_start.elapsed()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            context,
            render_pipeline,
            camera_buffer,
            camera_bind_group,
            depth_texture,
            meshes,
            camera_config: viewer.camera,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
            visible_vertices: 0,
        })
    }

    pub fn context(&self) -> RenderContext {
        self.context
    }

    /// Vertices submitted by the last frame
    pub fn visible_vertices(&self) -> usize {
        self.visible_vertices
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        let max_dimension = self.device.limits().max_texture_dimension_2d;
        let width = new_size.width.min(max_dimension);
        let height = new_size.height.min(max_dimension);

        if !self.context.resize(width, height) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = create_depth_texture(&self.device, &self.config);
        log::debug!("[GpuState::resize] Surface resized to {}x{}", width, height);
    }

    fn set_cursor_grabbed(&self, grabbed: bool) {
        if grabbed {
            if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::Locked) {
                log::warn!("[GpuState] Cursor lock failed: {:?}, trying confined mode", e);
                if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::Confined) {
                    log::warn!("[GpuState] Cursor confine failed: {:?}", e);
                }
            }
        } else if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("[GpuState] Cursor release failed: {:?}", e);
        }
        self.window.set_cursor_visible(!grabbed);
    }

    fn render(&mut self, entity: &Entity, view_distance: f32) -> Result<(), wgpu::SurfaceError> {
        let camera = camera_from_entity(entity, &self.camera_config);
        let camera_uniform = build_camera_uniform(&camera, &self.context, view_distance);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera_uniform]));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let mut visible_vertices = 0;
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Terrain Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = &self.render_pipeline {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

                for mesh in &self.meshes {
                    if mesh.is_empty()
                        || !is_chunk_visible(
                            mesh.center(),
                            camera.position,
                            camera.yaw_degrees,
                            camera.fovy_degrees,
                            view_distance,
                        )
                    {
                        continue;
                    }
                    mesh.draw(&mut render_pass);
                    visible_vertices += mesh.vertex_count() as usize;
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.visible_vertices = visible_vertices;
        Ok(())
    }
}

async fn request_adapter(
    instance: &wgpu::Instance,
    surface: &wgpu::Surface<'static>,
) -> EngineResult<wgpu::Adapter> {
    let mut adapter_options = wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: Some(surface),
        force_fallback_adapter: false,
    };

    if let Some(adapter) = instance.request_adapter(&adapter_options).await {
        return Ok(adapter);
    }

    log::warn!("[request_adapter] No high-performance adapter found, trying low power...");
    adapter_options.power_preference = wgpu::PowerPreference::LowPower;
    if let Some(adapter) = instance.request_adapter(&adapter_options).await {
        return Ok(adapter);
    }

    log::warn!("[request_adapter] No low-power adapter found, trying fallback...");
    adapter_options.force_fallback_adapter = true;
    match instance.request_adapter(&adapter_options).await {
        Some(adapter) => Ok(adapter),
        None => {
            log::error!("[request_adapter] No suitable GPU adapter found");
            Err(EngineError::NoAdapter)
        }
    }
}

fn upload_chunks(device: &wgpu::Device, chunks: &[Chunk], mesh_config: &MeshConfig) -> Vec<GpuMesh> {
    let start = Instant::now();
    let meshes: Vec<GpuMesh> = chunks
        .iter()
        .map(|chunk| GpuMesh::create(device, chunk, chunk.render_center(mesh_config)))
        .collect();
    log::info!(
        "[upload_chunks] Uploaded {} chunk meshes in {:.2?}",
        meshes.len(),
        start.elapsed()
    );
    meshes
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: config.width.max(1),
        height: config.height.max(1),
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

pub async fn run_app(event_loop: EventLoop<()>, viewer: ViewerConfig) -> Result<()> {
    log::info!("[gpu_state::run_app] Creating window...");
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&viewer.window.title)
            .with_inner_size(LogicalSize::new(viewer.window.width, viewer.window.height))
            .build(&event_loop)
            .map_err(|e| {
                log::error!("[gpu_state::run_app] Window creation failed: {}", e);
                EngineError::WindowCreation(e.to_string())
            })?,
    );

    let terrain = TerrainGenerator::from_config(&viewer);
    let grid = WorldGrid::build(
        &terrain,
        viewer.mesh,
        viewer.world.world_size,
        ChunkCoord::default(),
        viewer.world.parallel_build,
    );

    let mut gpu_state = GpuState::new(window, &viewer, grid.chunks()).await?;
    // CPU copies are no longer needed once uploaded
    drop(grid);

    let mut simulation = Simulation::new(&viewer, &terrain);
    let mut input_state = InputState::new();
    let mut frame_stats = FrameStats::new(Instant::now());
    let mut last_frame = Instant::now();

    input_state.set_cursor_locked(true);
    gpu_state.set_cursor_grabbed(true);
    gpu_state.window.request_redraw();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            ref event,
            window_id,
        } if window_id == gpu_state.window.id() => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(physical_size) => gpu_state.resize(*physical_size),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    input_state.process_key(keycode, event.state);
                }
            }
            WindowEvent::MouseInput { state, .. } => {
                // Clicking back into the window re-grabs the cursor unless paused
                if *state == ElementState::Pressed
                    && !input_state.is_cursor_locked()
                    && !simulation.is_paused()
                {
                    input_state.set_cursor_locked(true);
                    input_state.reset_mouse_tracking();
                    gpu_state.set_cursor_grabbed(true);
                }
            }
            WindowEvent::Focused(focused) => {
                if !*focused {
                    input_state.release_all();
                    if input_state.is_cursor_locked() {
                        input_state.set_cursor_locked(false);
                        gpu_state.set_cursor_grabbed(false);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = (now - last_frame).as_secs_f32();
                last_frame = now;

                let update = simulation.advance(delta_time, &mut input_state, &terrain);
                if update.pause_changed {
                    let grab = !update.paused;
                    input_state.set_cursor_locked(grab);
                    input_state.reset_mouse_tracking();
                    gpu_state.set_cursor_grabbed(grab);
                }

                match gpu_state.render(simulation.entity(), simulation.view_distance()) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let context = gpu_state.context();
                        gpu_state.resize(winit::dpi::PhysicalSize::new(
                            context.width,
                            context.height,
                        ));
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("[gpu_state::run_app] GPU out of memory, exiting");
                        elwt.exit();
                    }
                    Err(e) => log::warn!("[gpu_state::run_app] Render error: {:?}", e),
                }

                if frame_stats.record_frame(now) {
                    log::debug!(
                        "[gpu_state::run_app] {} fps, {} frames total",
                        frame_stats.fps(),
                        frame_stats.total_frames()
                    );
                }
                gpu_state.window.set_title(&format_title(
                    frame_stats.fps(),
                    gpu_state.visible_vertices(),
                    simulation.entity(),
                    simulation.view_distance(),
                ));
            }
            _ => {}
        },
        Event::DeviceEvent {
            event: DeviceEvent::MouseMotion { delta },
            ..
        } => {
            if input_state.is_cursor_locked() {
                input_state.process_mouse_motion(delta);
            }
        }
        Event::AboutToWait => {
            gpu_state.window.request_redraw();
        }
        _ => {}
    })?;

    Ok(())
}
