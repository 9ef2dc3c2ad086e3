use std::marker::PhantomData;

/// Last bytes written to a GPU buffer, used to skip redundant uploads.
#[derive(Debug, Default)]
struct ShadowCopy {
    bytes: Vec<u8>,
}

impl ShadowCopy {
    fn with_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Stores `bytes` and reports whether they differ from the last upload.
    fn replace(&mut self, bytes: &[u8]) -> bool {
        if self.bytes == bytes {
            return false;
        }
        self.bytes.clear();
        self.bytes.extend_from_slice(bytes);
        true
    }
}

/// Typed uniform buffer holding exactly one `Content`
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    previous_content: ShadowCopy,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Content>();
        match type_name.rfind(':') {
            Some(pos) => &type_name[(pos + 1)..],
            None => type_name,
        }
    }

    fn descriptor(label: &str, mapped_at_creation: bool) -> wgpu::BufferDescriptor<'_> {
        wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation,
        }
    }

    pub fn new(device: &wgpu::Device) -> Self {
        let label = format!("UniformBuffer: {}", Self::name());
        let buffer = device.create_buffer(&Self::descriptor(&label, false));

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: ShadowCopy::default(),
        }
    }

    /// Create buffer with initial data
    pub fn new_with_data(device: &wgpu::Device, initial_content: &Content) -> Self {
        let label = format!("UniformBuffer: {}", Self::name());
        let buffer = device.create_buffer(&Self::descriptor(&label, true));

        let bytes = bytemuck::bytes_of(initial_content);
        buffer
            .slice(..)
            .get_mapped_range_mut()
            .copy_from_slice(bytes);
        buffer.unmap();

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: ShadowCopy::with_bytes(bytes),
        }
    }

    /// Writes `content` unless it matches what was last uploaded.
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) {
        let bytes = bytemuck::bytes_of(&content);
        if self.previous_content.replace(bytes) {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}
