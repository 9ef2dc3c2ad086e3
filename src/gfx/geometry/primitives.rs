//! # Primitive Shape Generation
//!
//! Cube, floor quad and latitude/longitude sphere. Vertex layouts and index
//! orders are fixed so that each shape's `winding` matches the pipeline that
//! draws it.

use super::{GeometryData, GeometryError, Winding};
use cgmath::{InnerSpace, Vector3};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Smallest tessellation that still closes the sphere.
pub const MIN_SPHERE_TESSELLATION: u32 = 3;

/// Generate the light-marker cube centered at the origin
///
/// Eight shared corners spanning -1..1 on every axis. Normals point along the
/// corner diagonals, so lighting on this shape is smooth rather than faceted;
/// the demo draws it unlit anyway. Triangles are counter-clockwise from outside.
pub fn generate_cube() -> GeometryData {
    #[rustfmt::skip]
    let corners: [[f32; 3]; 8] = [
        [-1.0, -1.0,  1.0],
        [ 1.0, -1.0,  1.0],
        [-1.0,  1.0,  1.0],
        [ 1.0,  1.0,  1.0],
        [-1.0,  1.0, -1.0],
        [ 1.0,  1.0, -1.0],
        [-1.0, -1.0, -1.0],
        [ 1.0, -1.0, -1.0],
    ];

    let mut data = GeometryData::with_capacity(Winding::CounterClockwise, 8, 36);
    for corner in corners {
        let normal = Vector3::from(corner).normalize();
        data.push_vertex(corner, normal.into(), [0.0, 0.0]);
    }

    #[rustfmt::skip]
    let indices: [u32; 36] = [
        // Bottom (-Y)
        7, 1, 0,    0, 6, 7,
        // Left (-X)
        6, 0, 2,    2, 4, 6,
        // Top (+Y)
        4, 2, 3,    3, 5, 4,
        // Right (+X)
        5, 3, 1,    1, 7, 5,
        // Front (+Z)
        3, 2, 0,    0, 1, 3,
        // Back (-Z)
        7, 6, 4,    4, 5, 7,
    ];
    data.indices.extend_from_slice(&indices);

    data
}

/// Generate the floor quad
///
/// Lies in the XZ plane at y = 0, spans -1..1 on X and Z and faces +Y.
/// Both triangles are clockwise when viewed from above.
pub fn generate_quad() -> GeometryData {
    let mut data = GeometryData::with_capacity(Winding::Clockwise, 4, 6);
    let up = [0.0, 1.0, 0.0];

    data.push_vertex([-1.0, 0.0, -1.0], up, [0.0, 1.0]);
    data.push_vertex([-1.0, 0.0, 1.0], up, [0.0, 0.0]);
    data.push_vertex([1.0, 0.0, -1.0], up, [1.0, 1.0]);
    data.push_vertex([1.0, 0.0, 1.0], up, [1.0, 0.0]);

    data.push_triangle(1, 0, 3);
    data.push_triangle(3, 0, 2);

    data
}

/// Generate a latitude/longitude sphere centered at the origin
///
/// # Arguments
/// * `radius` - Sphere radius, must be positive and finite
/// * `tessellation` - Number of latitude bands; the sphere gets twice as many
///   longitude steps
///
/// The mesh is a south pole vertex, `tessellation - 1` rings of
/// `2 * tessellation` vertices, and a north pole vertex. Poles are closed
/// with triangle fans and every triangle is clockwise seen from outside.
///
/// # Errors
/// [`GeometryError::InvalidTessellation`] when `tessellation < 3`,
/// [`GeometryError::InvalidRadius`] for a non-positive or non-finite radius,
/// [`GeometryError::TooLarge`] when indices would not fit a `u32`.
pub fn generate_sphere(radius: f32, tessellation: u32) -> Result<GeometryData, GeometryError> {
    if tessellation < MIN_SPHERE_TESSELLATION {
        return Err(GeometryError::InvalidTessellation {
            got: tessellation,
            min: MIN_SPHERE_TESSELLATION,
        });
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(GeometryError::InvalidRadius(radius));
    }

    let (vertex_count, index_count) =
        sphere_counts(tessellation).ok_or(GeometryError::TooLarge(tessellation))?;

    let vertical = tessellation;
    let horizontal = tessellation * 2;

    let mut data = GeometryData::with_capacity(Winding::Clockwise, vertex_count, index_count);

    push_sphere_vertex(&mut data, -Vector3::unit_y(), radius);

    for i in 0..vertical - 1 {
        let latitude = (i + 1) as f32 * PI / vertical as f32 - FRAC_PI_2;
        let dy = latitude.sin();
        let dxz = latitude.cos();

        for j in 0..horizontal {
            // Half-radian offset keeps the first column off the texture seam.
            let longitude = j as f32 * TAU / horizontal as f32 + 0.5;
            let direction =
                Vector3::new(longitude.cos() * dxz, dy, longitude.sin() * dxz).normalize();
            push_sphere_vertex(&mut data, direction, radius);
        }
    }

    push_sphere_vertex(&mut data, Vector3::unit_y(), radius);

    // South fan
    for i in 0..horizontal {
        data.push_triangle(0, 1 + (i + 1) % horizontal, 1 + i);
    }

    // Body, two triangles per cell between adjacent rings
    for i in 0..vertical - 2 {
        for j in 0..horizontal {
            let next_i = i + 1;
            let next_j = (j + 1) % horizontal;

            data.push_triangle(
                1 + i * horizontal + j,
                1 + i * horizontal + next_j,
                1 + next_i * horizontal + j,
            );
            data.push_triangle(
                1 + i * horizontal + next_j,
                1 + next_i * horizontal + next_j,
                1 + next_i * horizontal + j,
            );
        }
    }

    // North fan
    let last = vertex_count as u32 - 1;
    for i in 0..horizontal {
        data.push_triangle(last, last - 1 - (i + 1) % horizontal, last - 1 - i);
    }

    debug_assert_eq!(data.vertex_count(), vertex_count);
    debug_assert_eq!(data.indices.len(), index_count);

    Ok(data)
}

/// Generate a sphere from its diameter, see [`generate_sphere`]
pub fn generate_sphere_from_diameter(
    diameter: f32,
    tessellation: u32,
) -> Result<GeometryData, GeometryError> {
    generate_sphere(diameter / 2.0, tessellation)
}

/// Vertex and index counts for a sphere of the given tessellation.
///
/// Returns `None` when the vertex indices or the index count do not fit a `u32`.
pub fn sphere_counts(tessellation: u32) -> Option<(usize, usize)> {
    let vertical = u64::from(tessellation);
    let horizontal = vertical.checked_mul(2)?;
    let rings = vertical.checked_sub(1)?;

    let vertex_count = rings.checked_mul(horizontal)?.checked_add(2)?;
    let index_count = rings.checked_mul(horizontal)?.checked_mul(6)?;

    if vertex_count > u64::from(u32::MAX) || index_count > u64::from(u32::MAX) {
        return None;
    }

    Some((
        usize::try_from(vertex_count).ok()?,
        usize::try_from(index_count).ok()?,
    ))
}

fn push_sphere_vertex(data: &mut GeometryData, direction: Vector3<f32>, radius: f32) {
    // Azimuthal-style mapping; clamped because normalization can overshoot 1.
    let tex_coord = [
        direction.x.clamp(-1.0, 1.0).asin() / PI + 0.5,
        direction.y.clamp(-1.0, 1.0).asin() / PI + 0.5,
    ];
    data.push_vertex((direction * radius).into(), direction.into(), tex_coord);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(data: &GeometryData, index: u32) -> Vector3<f32> {
        Vector3::from(data.vertices[index as usize])
    }

    /// Face normal by the right-hand rule over (a, b, c)
    fn face_normal(data: &GeometryData, [a, b, c]: [u32; 3]) -> Vector3<f32> {
        let (pa, pb, pc) = (position(data, a), position(data, b), position(data, c));
        (pb - pa).cross(pc - pa)
    }

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.winding, Winding::CounterClockwise);
        assert!(cube.indices.iter().all(|&i| i < 8));
    }

    #[test]
    fn test_cube_faces_wind_counter_clockwise_from_outside() {
        let cube = generate_cube();
        for triangle in cube.triangles() {
            let normal = face_normal(&cube, triangle);
            assert!(
                normal.dot(position(&cube, triangle[0])) > 0.0,
                "triangle {:?} faces inward",
                triangle
            );
        }
    }

    #[test]
    fn test_quad_generation() {
        let quad = generate_quad();
        assert_eq!(quad.vertex_count(), 4);
        assert_eq!(quad.indices, vec![1, 0, 3, 3, 0, 2]);
        assert!(quad.normals.iter().all(|n| *n == [0.0, 1.0, 0.0]));
        assert!(quad.vertices.iter().all(|p| p[1] == 0.0));
    }

    #[test]
    fn test_quad_is_clockwise_from_above() {
        let quad = generate_quad();
        for triangle in quad.triangles() {
            // Right-hand normal pointing down means clockwise seen from +Y
            assert!(face_normal(&quad, triangle).y < 0.0);
        }
    }

    #[test]
    fn test_sphere_counts_follow_ring_layout() {
        for v in 3..20u32 {
            let h = 2 * v;
            let sphere = generate_sphere(1.0, v).unwrap();
            let expected_vertices = ((v - 1) * h + 2) as usize;
            let expected_indices = (6 * (h + (v - 2) * h)) as usize;

            assert_eq!(sphere.vertex_count(), expected_vertices, "tessellation {}", v);
            assert_eq!(sphere.indices.len(), expected_indices, "tessellation {}", v);
            assert_eq!(sphere.normals.len(), expected_vertices);
            assert_eq!(sphere.tex_coords.len(), expected_vertices);
            assert!(sphere
                .indices
                .iter()
                .all(|&i| (i as usize) < expected_vertices));
        }
    }

    #[test]
    fn test_smallest_sphere() {
        let sphere = generate_sphere(1.0, 3).unwrap();
        // Two poles plus two rings of six
        assert_eq!(sphere.vertex_count(), 14);
        assert_eq!(sphere.triangle_count(), 24);
        assert!(sphere.indices.iter().all(|&i| i < 14));
    }

    #[test]
    fn test_tessellation_below_three_is_rejected() {
        assert_eq!(
            generate_sphere(1.0, 2).unwrap_err(),
            GeometryError::InvalidTessellation { got: 2, min: 3 }
        );
        assert!(generate_sphere(1.0, 0).is_err());
    }

    #[test]
    fn test_bad_radius_is_rejected() {
        assert!(matches!(
            generate_sphere(0.0, 8),
            Err(GeometryError::InvalidRadius(_))
        ));
        assert!(matches!(
            generate_sphere(-2.0, 8),
            Err(GeometryError::InvalidRadius(_))
        ));
        assert!(matches!(
            generate_sphere(f32::NAN, 8),
            Err(GeometryError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_oversized_tessellation_is_rejected() {
        assert_eq!(
            generate_sphere(1.0, u32::MAX).unwrap_err(),
            GeometryError::TooLarge(u32::MAX)
        );
        assert_eq!(sphere_counts(u32::MAX), None);
    }

    #[test]
    fn test_sphere_vertices_lie_on_radius() {
        let radius = 7.5;
        let sphere = generate_sphere(radius, 8).unwrap();
        for (p, n) in sphere.vertices.iter().zip(&sphere.normals) {
            let p = Vector3::from(*p);
            let n = Vector3::from(*n);
            assert!((p.magnitude() - radius).abs() < 1e-4);
            assert!((n.magnitude() - 1.0).abs() < 1e-5);
            assert!((p / radius - n).magnitude() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_poles() {
        let sphere = generate_sphere(2.0, 6).unwrap();
        let last = sphere.vertex_count() - 1;
        assert_eq!(sphere.vertices[0], [0.0, -2.0, 0.0]);
        assert_eq!(sphere.vertices[last], [0.0, 2.0, 0.0]);
        let [su, sv] = sphere.tex_coords[0];
        let [nu, nv] = sphere.tex_coords[last];
        assert!((su - 0.5).abs() < 1e-6 && sv.abs() < 1e-6);
        assert!((nu - 0.5).abs() < 1e-6 && (nv - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_first_ring_starts_at_half_radian_longitude() {
        let sphere = generate_sphere(1.0, 4).unwrap();
        let first = Vector3::from(sphere.normals[1]);
        let latitude = PI / 4.0 - FRAC_PI_2;
        assert!((first.y - latitude.sin()).abs() < 1e-5);
        assert!((first.z.atan2(first.x) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_triangles_wind_clockwise_from_outside() {
        for v in [3, 4, 8, 15] {
            let sphere = generate_sphere(3.0, v).unwrap();
            for triangle in sphere.triangles() {
                let normal = face_normal(&sphere, triangle);
                assert!(
                    normal.dot(position(&sphere, triangle[0])) < 0.0,
                    "tessellation {}: triangle {:?} is not clockwise from outside",
                    v,
                    triangle
                );
            }
        }
    }

    #[test]
    fn test_sphere_fans_touch_poles() {
        let v = 5;
        let h = 2 * v;
        let sphere = generate_sphere(1.0, v).unwrap();
        let last = sphere.vertex_count() as u32 - 1;
        let triangles: Vec<[u32; 3]> = sphere.triangles().collect();

        let south = &triangles[..h as usize];
        let north = &triangles[triangles.len() - h as usize..];
        assert!(south.iter().all(|t| t[0] == 0));
        assert!(north.iter().all(|t| t[0] == last));
        assert_eq!(triangles.iter().filter(|t| t.contains(&0)).count(), h as usize);
    }

    #[test]
    fn test_sphere_uvs_in_unit_range() {
        let sphere = generate_sphere(1.0, 32).unwrap();
        for uv in &sphere.tex_coords {
            assert!(uv[0].is_finite() && uv[1].is_finite());
            assert!((0.0..=1.0).contains(&uv[0]), "u out of range: {:?}", uv);
            assert!((0.0..=1.0).contains(&uv[1]), "v out of range: {:?}", uv);
        }
    }

    #[test]
    fn test_diameter_constructor_halves() {
        let sphere = generate_sphere_from_diameter(15.0, 8).unwrap();
        assert_eq!(sphere.vertices[0], [0.0, -7.5, 0.0]);
    }
}
