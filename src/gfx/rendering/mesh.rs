use wgpu::util::DeviceExt;

use crate::gfx::{geometry::GeometryData, scene::vertex::Vertex3D};

use super::error::RenderError;

/// Vertex and index buffers for one uploaded [`GeometryData`]
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

/// Byte sizes of the vertex and index buffers for a mesh of this size.
pub fn mesh_buffer_sizes(vertex_count: usize, index_count: usize) -> (u64, u64) {
    let vertex_bytes = (vertex_count as u64).saturating_mul(std::mem::size_of::<Vertex3D>() as u64);
    let index_bytes = (index_count as u64).saturating_mul(std::mem::size_of::<u32>() as u64);
    (vertex_bytes, index_bytes)
}

fn check_buffer_size(label: String, size: u64, max: u64) -> Result<(), RenderError> {
    if size > max {
        return Err(RenderError::BufferTooLarge { label, size, max });
    }
    Ok(())
}

impl GpuMesh {
    /// Uploads `geometry`, refusing buffers larger than the device allows.
    pub fn upload(
        device: &wgpu::Device,
        geometry: &GeometryData,
        label: &str,
    ) -> Result<Self, RenderError> {
        let max = device.limits().max_buffer_size;
        let (vertex_bytes, index_bytes) =
            mesh_buffer_sizes(geometry.vertex_count(), geometry.indices.len());
        check_buffer_size(format!("{} Vertex Buffer", label), vertex_bytes, max)?;
        check_buffer_size(format!("{} Index Buffer", label), index_bytes, max)?;

        let (vertices, indices) = geometry.to_vertex_format();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice::<Vertex3D, u8>(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice::<u32, u8>(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded mesh '{}': {} vertices, {} triangles",
            label,
            vertices.len(),
            indices.len() / 3
        );

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        })
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a GpuMesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b GpuMesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::{generate_sphere, sphere_counts};

    #[test]
    fn test_buffer_sizes_match_geometry() {
        let sphere = generate_sphere(7.5, 8).unwrap();
        let (vertex_bytes, index_bytes) =
            mesh_buffer_sizes(sphere.vertex_count(), sphere.indices.len());
        assert_eq!(vertex_bytes, 114 * 32);
        assert_eq!(index_bytes, 672 * 4);
        let max = wgpu::Limits::downlevel_defaults().max_buffer_size;
        assert!(check_buffer_size("sphere".into(), vertex_bytes, max).is_ok());
    }

    #[test]
    fn test_dense_sphere_exceeds_downlevel_buffer_limit() {
        // Index count still fits a u32, but the vertex buffer does not fit the device
        let (vertices, indices) = sphere_counts(2100).unwrap();
        let (vertex_bytes, index_bytes) = mesh_buffer_sizes(vertices, indices);
        assert_eq!(vertex_bytes, 282_105_664);
        assert_eq!(index_bytes, 211_579_200);

        let max = wgpu::Limits::downlevel_defaults().max_buffer_size;
        let err = check_buffer_size("sphere Vertex Buffer".into(), vertex_bytes, max).unwrap_err();
        assert!(matches!(
            err,
            RenderError::BufferTooLarge { size: 282_105_664, max: 268_435_456, .. }
        ));
        assert!(check_buffer_size("sphere Index Buffer".into(), index_bytes, max).is_ok());
    }
}
