//! Global uniform bindings for camera and scene lighting
//!
//! One uniform buffer shared by every draw: camera matrices plus the fixed
//! light rig (one ambient term, two directional lights).

use cgmath::{InnerSpace, Vector3};

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `bone.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    /// rgb = colour * intensity
    ambient: [f32; 4],
    /// xyz = unit vector pointing towards the light
    light_directions: [[f32; 4]; 2],
    /// rgb = colour * intensity
    light_colors: [[f32; 4]; 2],
}
// 16 + 64 + 16 + 32 + 32 = 160 bytes

/// A directional light shining from `position` towards the origin
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
}

impl DirectionalLight {
    fn direction(&self) -> [f32; 4] {
        let v = Vector3::from(self.position);
        let v = if v.magnitude2() > 0.0 {
            v.normalize()
        } else {
            Vector3::unit_y()
        };
        [v.x, v.y, v.z, 0.0]
    }

    fn radiance(&self) -> [f32; 4] {
        scaled(self.color, self.intensity)
    }
}

/// Fixed lighting: ambient fill, a key light above and a fill light below.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightRig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub lights: [DirectionalLight; 2],
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.7,
            lights: [
                DirectionalLight {
                    position: [8.0, 10.0, 8.0],
                    color: [1.0, 1.0, 1.0],
                    intensity: 0.5,
                },
                DirectionalLight {
                    position: [0.0, -8.0, 0.0],
                    color: [1.0, 1.0, 1.0],
                    intensity: 0.5,
                },
            ],
        }
    }
}

fn scaled(color: [f32; 3], intensity: f32) -> [f32; 4] {
    [color[0] * intensity, color[1] * intensity, color[2] * intensity, 1.0]
}

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, lights: &LightRig) -> Self {
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient: scaled(lights.ambient_color, lights.ambient_intensity),
            light_directions: [lights.lights[0].direction(), lights.lights[1].direction()],
            light_colors: [lights.lights[0].radiance(), lights.lights[1].radiance()],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Writes camera and light data for this frame.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lights: &LightRig,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, lights));
}

/// Bind group layout and bind group for the global uniforms, slot 0 in every
/// pipeline.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform()) // camera + lights
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    /// Used when creating render pipelines that need access to global uniforms.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
