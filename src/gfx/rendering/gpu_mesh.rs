//! GPU copies of scene meshes and their per-node uniforms

use cgmath::{Matrix, Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::{
    gfx::{
        camera::camera_utils::convert_matrix4_to_array,
        resources::material::{Material, MaterialUniform},
        scene::Mesh,
    },
    wgpu_utils::{
        binding_types, BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc,
        UniformBuffer,
    },
};

/// Per-node shader data, `Object` in `bone.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub material: MaterialUniform,
}

impl ObjectUniform {
    pub fn new(world: Matrix4<f32>, material: &Material) -> Self {
        // Inverse transpose keeps normals perpendicular under non-uniform scale
        let normal = world
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or(world);
        Self {
            model: convert_matrix4_to_array(world),
            normal_matrix: convert_matrix4_to_array(normal),
            material: material.uniform(),
        }
    }
}

/// Layout of bind group 1: the per-node uniform.
pub fn object_bind_group_layout(device: &wgpu::Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_rendering(binding_types::uniform())
        .create(device, "Object Bind Group Layout")
}

/// Vertex and index buffers for one mesh node plus its uniform.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform: UniformBuffer<ObjectUniform>,
    bind_group: wgpu::BindGroup,
}

impl GpuMesh {
    pub fn new(
        device: &wgpu::Device,
        layout: &BindGroupLayoutWithDesc,
        label: &str,
        mesh: &Mesh,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(mesh.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform = UniformBuffer::new(device);
        let bind_group = BindGroupBuilder::new(layout)
            .resource(uniform.binding_resource())
            .create(device, &format!("{label} Bind Group"));

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
            uniform,
            bind_group,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, content: ObjectUniform) {
        self.uniform.update_content(queue, content);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_object_uniform() {
        let world = Matrix4::from_nonuniform_scale(2.0, 1.0, 1.0)
            * Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0));
        let uniform = ObjectUniform::new(world, &Material::bone());

        assert_eq!(uniform.model[3][0], 2.0);
        assert_eq!(uniform.normal_matrix[0][0], 0.5);
        assert_eq!(uniform.material.surface[..2], [0.1, 0.7]);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 176);
    }
}
