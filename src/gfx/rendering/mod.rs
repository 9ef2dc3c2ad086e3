//! Core rendering functionality
//!
//! Handles render pipelines, mesh upload, and the two-pass frame.

pub mod error;
pub mod mesh;
pub mod pipeline_manager;
pub mod render_engine;

pub use error::{RenderError, SurfaceAction};
pub use mesh::{DrawMesh, GpuMesh};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
