//! WGPU-based rendering engine for the bone viewer
//!
//! Draws every visible mesh node of a [`Scene`] into the canvas rectangle,
//! then hands the frame to a UI callback.

use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use wgpu::{Device, TextureFormat};

use crate::gfx::{
    camera::camera_utils::CameraUniform,
    picking::CanvasRect,
    resources::{
        global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightRig},
        texture_resource::TextureResource,
    },
    scene::{NodeId, Scene},
};

use super::{
    gpu_mesh::{object_bind_group_layout, GpuMesh, ObjectUniform},
    pipeline_manager::{PipelineConfig, PipelineManager},
};
use crate::wgpu_utils::BindGroupLayoutWithDesc;

const BONE_PIPELINE: &str = "Bone";

/// Canvas clear colour, 0x3a3a3a
pub const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 58.0 / 255.0,
    g: 58.0 / 255.0,
    b: 58.0 / 255.0,
    a: 1.0,
};

/// Core rendering engine managing GPU resources and draw calls
///
/// GPU buffers for mesh nodes are created the first time a node is drawn,
/// so models that finish loading between frames need no explicit upload.
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: BindGroupLayoutWithDesc,
    meshes: HashMap<NodeId, GpuMesh>,
    lights: LightRig,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to request adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .context("Surface reports no supported formats")?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface configured: {}x{} {:?} on {}",
            config.width,
            config.height,
            format,
            adapter.get_info().name
        );

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let object_layout = object_bind_group_layout(&device);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("bone", include_str!("bone.wgsl"));
        // Imported meshes are not consistently wound, so both faces are drawn
        pipeline_manager.register_pipeline(
            BONE_PIPELINE,
            PipelineConfig::default_with_shader("bone")
                .with_label("BONE")
                .with_cull_mode(None)
                .with_depth_stencil(TextureResource::DEPTH_FORMAT)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout.layout.clone(),
                ])
                .with_color_targets(vec![Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })]),
        );
        pipeline_manager.create_all_pipelines()?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_layout,
            meshes: HashMap::new(),
            lights: LightRig::default(),
        })
    }

    /// Uploads buffers for newly seen mesh nodes and refreshes the uniforms of
    /// every visible one.
    fn prepare(&mut self, scene: &Scene) {
        for visible in scene.visible_meshes() {
            let gpu = self.meshes.entry(visible.id).or_insert_with(|| {
                log::debug!("Uploading mesh for {:?}", visible.id);
                GpuMesh::new(
                    &self.device,
                    &self.object_layout,
                    &format!("{:?}", visible.id),
                    visible.mesh,
                )
            });
            gpu.update(&self.queue, ObjectUniform::new(visible.world, visible.material));
        }
    }

    /// Renders one frame: visible bones inside `canvas`, then the UI.
    ///
    /// The whole surface is cleared to the background colour; the 3D viewport
    /// is restricted to `canvas`, clamped to the surface.
    pub fn render_frame<F>(
        &mut self,
        scene: &Scene,
        canvas: CanvasRect,
        ui_callback: F,
    ) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        self.prepare(scene);

        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let viewport = clamp_viewport(canvas, self.config.width, self.config.height);
            if let (Some(viewport), Some(pipeline)) =
                (viewport, self.pipeline_manager.get_pipeline(BONE_PIPELINE))
            {
                render_pass.set_viewport(
                    viewport.left,
                    viewport.top,
                    viewport.width,
                    viewport.height,
                    0.0,
                    1.0,
                );
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

                for visible in scene.visible_meshes() {
                    if let Some(gpu) = self.meshes.get(&visible.id) {
                        gpu.draw(&mut render_pass);
                    }
                }
            }
        }

        ui_callback(
            &self.device,
            &self.queue,
            &mut encoder,
            &surface_texture_view,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Updates the camera and light uniform buffer
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform, &self.lights);
    }

    /// Resizes the surface and recreates the depth buffer. Zero sizes
    /// (minimised window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Reconfigures the surface at its current size, after it was lost.
    pub fn reconfigure(&mut self) {
        self.resize(self.config.width, self.config.height);
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// Intersects `canvas` with the surface. `None` when nothing is left to draw.
fn clamp_viewport(canvas: CanvasRect, width: u32, height: u32) -> Option<CanvasRect> {
    let (width, height) = (width as f32, height as f32);
    let left = canvas.left.clamp(0.0, width);
    let top = canvas.top.clamp(0.0, height);
    let right = (canvas.left + canvas.width).clamp(left, width);
    let bottom = (canvas.top + canvas.height).clamp(top, height);

    let clamped = CanvasRect::new(left, top, right - left, bottom - top);
    (clamped.width >= 1.0 && clamped.height >= 1.0).then_some(clamped)
}
