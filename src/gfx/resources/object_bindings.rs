//! Per-object uniforms, bound at group 1.

use crate::{gfx::scene::object::DrawObject, wgpu_utils::uniform_buffer::UniformBuffer};

/// Must match `Object` in `shader.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub world: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl From<&DrawObject> for ObjectUniform {
    fn from(object: &DrawObject) -> Self {
        Self {
            world: object.world.into(),
            normal_matrix: object.normal_matrix().into(),
            color: [object.color[0], object.color[1], object.color[2], 1.0],
        }
    }
}

pub fn object_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Object Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Uniform buffer and bind group owned by one draw object
pub struct ObjectBindings {
    ubo: UniformBuffer<ObjectUniform>,
    bind_group: wgpu::BindGroup,
}

impl ObjectBindings {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, object: &DrawObject) -> Self {
        let ubo = UniformBuffer::new_with_data(device, &ObjectUniform::from(object));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Object Bind Group: {}", object.name)),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self { ubo, bind_group }
    }

    /// Uploads the object's current state; unchanged objects cost nothing.
    pub fn update(&mut self, queue: &wgpu::Queue, object: &DrawObject) {
        self.ubo.update_content(queue, ObjectUniform::from(object));
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
