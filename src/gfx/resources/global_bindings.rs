//! Per-frame uniforms shared by every draw: camera and the two point lights.
//!
//! Bound at group 0 in the scene pipelines. The layout of [`GlobalUniform`]
//! must match `Globals` in `shader.wgsl`.

use crate::{
    gfx::{camera::camera_utils::CameraUniform, scene::lights::PointLight},
    wgpu_utils::uniform_buffer::UniformBuffer,
};

const AMBIENT: f32 = 0.15;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// xyz position, w unused
    pub light_positions: [[f32; 4]; 2],
    /// rgb colour, w unused
    pub light_colors: [[f32; 4]; 2],
    /// x ambient term, y 1.0 when lighting is enabled
    pub lighting: [f32; 4],
}

impl GlobalUniform {
    pub fn new(camera: &CameraUniform, lights: &[PointLight; 2], lighting_enabled: bool) -> Self {
        let position = |light: &PointLight| {
            [light.position.x, light.position.y, light.position.z, 1.0]
        };
        let color = |light: &PointLight| [light.color[0], light.color[1], light.color[2], 1.0];

        Self {
            view_proj: camera.view_proj,
            camera_position: camera.view_position,
            light_positions: [position(&lights[0]), position(&lights[1])],
            light_colors: [color(&lights[0]), color(&lights[1])],
            lighting: [AMBIENT, if lighting_enabled { 1.0 } else { 0.0 }, 0.0, 0.0],
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Layout and bind group for the global uniform buffer
pub struct GlobalBindings {
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
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
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self { layout, bind_group }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::lights::orbiting_lights;

    #[test]
    fn test_layout_matches_shader_struct() {
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 160);
    }

    #[test]
    fn test_lights_are_packed_in_order() {
        let camera = CameraUniform {
            view_position: [0.0, 5.0, 20.0, 1.0],
            ..Default::default()
        };
        let lights = orbiting_lights(0.0);
        let globals = GlobalUniform::new(&camera, &lights, true);

        assert_eq!(globals.camera_position, [0.0, 5.0, 20.0, 1.0]);
        assert_eq!(globals.light_positions[0], [20.0, 0.0, 0.0, 1.0]);
        assert_eq!(globals.light_colors[0], [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(globals.light_colors[1], [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(globals.lighting[1], 1.0);
    }

    #[test]
    fn test_disabled_lighting_clears_flag() {
        let globals = GlobalUniform::new(&CameraUniform::default(), &orbiting_lights(0.0), false);
        assert_eq!(globals.lighting[1], 0.0);
        assert!(globals.lighting[0] > 0.0);
    }
}
