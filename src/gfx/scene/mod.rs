//! # Scene
//!
//! Draw objects, the two orbiting point lights and the camera that together
//! make up one frame's worth of world state.
//!
//! - [`Scene`] holds the draw list and advances the lights
//! - [`DrawObject`] pairs a shared mesh with a world matrix, colour and technique
//! - [`Vertex3D`] is the interleaved vertex layout every mesh is uploaded in

pub mod lights;
pub mod object;
pub mod scene;
pub mod vertex;

pub use lights::{orbiting_lights, PointLight};
pub use object::{DrawObject, MeshKind, Technique};
pub use scene::Scene;
pub use vertex::Vertex3D;
