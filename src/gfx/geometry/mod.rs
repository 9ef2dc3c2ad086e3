//! # Procedural Geometry Generation
//!
//! This module generates the primitive shapes drawn by the demo, so no model
//! files are needed for the scene.
//!
//! ## Supported Primitives
//!
//! - **Cube**: 8-corner cube spanning -1..1, used as a light marker
//! - **Quad**: 4-vertex floor quad in the XZ plane
//! - **Sphere**: latitude/longitude sphere with pole fans
//!
//! ## Usage
//!
//! ```rust
//! use vantage::gfx::geometry::{generate_cube, generate_quad, generate_sphere};
//!
//! let cube = generate_cube();
//! let floor = generate_quad();
//!
//! // Radius 7.5, 8 latitude subdivisions (16 longitude steps)
//! let sphere = generate_sphere(7.5, 8).expect("valid tessellation");
//! assert_eq!(sphere.vertex_count(), 7 * 16 + 2);
//! ```

pub mod primitives;

pub use primitives::*;

use thiserror::Error;

/// Errors raised while generating procedural geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("sphere tessellation must be at least {min}, got {got}")]
    InvalidTessellation { got: u32, min: u32 },

    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("sphere tessellation {0} produces more vertices than a u32 index can address")]
    TooLarge(u32),
}

/// Vertex traversal direction of front-facing triangles, seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle list indices
    pub indices: Vec<u32>,
    /// Winding of the front faces in `indices`
    pub winding: Winding,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new(winding: Winding) -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            winding,
        }
    }

    /// Create an empty structure with room for the given counts
    pub fn with_capacity(winding: Winding, vertex_count: usize, index_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            tex_coords: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(index_count),
            winding,
        }
    }

    /// Appends one vertex and returns its index
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(tex_coord);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates over triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Convert to the interleaved vertex format used by the renderer
    pub fn to_vertex_format(&self) -> (Vec<crate::gfx::scene::vertex::Vertex3D>, Vec<u32>) {
        use crate::gfx::scene::vertex::Vertex3D;

        let vertices: Vec<Vertex3D> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }
}
