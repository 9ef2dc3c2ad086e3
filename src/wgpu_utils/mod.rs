//! Small wrappers over wgpu buffer plumbing.

pub mod uniform_buffer;

pub use uniform_buffer::UniformBuffer;
