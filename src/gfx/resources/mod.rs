//! GPU resources: render attachments and uniform bind groups.

pub mod global_bindings;
pub mod object_bindings;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUBO, GlobalUniform};
pub use object_bindings::{object_bind_group_layout, ObjectBindings, ObjectUniform};
pub use texture_resource::{DepthTexture, TextureResource};
