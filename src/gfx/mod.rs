//! # Graphics Module
//!
//! - **Camera** ([`camera`]) - free-flying camera, input controller and pointer locking
//! - **Geometry** ([`geometry`]) - procedural sphere, cube and floor quad
//! - **Scene** ([`scene`]) - draw objects and orbiting point lights
//! - **Rendering** ([`rendering`]) - pipelines, mesh upload and the two-pass frame
//! - **Resources** ([`resources`]) - render targets and uniform bind groups

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::FreeCamera;
pub use rendering::render_engine::RenderEngine;
