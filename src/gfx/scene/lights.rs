//! Point lights circling the scene origin.

use cgmath::Vector3;

pub const LIGHT_ORBIT_RADIUS: f32 = 20.0;
pub const LIGHT_ONE_COLOR: [f32; 3] = [1.0, 0.0, 0.0];
pub const LIGHT_TWO_COLOR: [f32; 3] = [0.0, 0.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub color: [f32; 3],
}

/// Positions of the two demo lights after `total_seconds` of run time.
///
/// Both orbit the origin in the y = 0 plane, a quarter turn apart.
pub fn orbiting_lights(total_seconds: f32) -> [PointLight; 2] {
    let (sin, cos) = total_seconds.sin_cos();
    [
        PointLight {
            position: Vector3::new(cos, 0.0, sin) * LIGHT_ORBIT_RADIUS,
            color: LIGHT_ONE_COLOR,
        },
        PointLight {
            position: Vector3::new(-sin, 0.0, cos) * LIGHT_ORBIT_RADIUS,
            color: LIGHT_TWO_COLOR,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn test_lights_start_on_axes() {
        let [one, two] = orbiting_lights(0.0);
        assert_eq!(one.position, Vector3::new(20.0, 0.0, 0.0));
        assert_eq!(two.position, Vector3::new(-0.0, 0.0, 20.0));
        assert_eq!(one.color, LIGHT_ONE_COLOR);
        assert_eq!(two.color, LIGHT_TWO_COLOR);
    }

    #[test]
    fn test_lights_stay_on_orbit_a_quarter_turn_apart() {
        for step in 0..100 {
            let t = step as f32 * 0.37;
            let [one, two] = orbiting_lights(t);
            assert!((one.position.magnitude() - LIGHT_ORBIT_RADIUS).abs() < 1e-3);
            assert!((two.position.magnitude() - LIGHT_ORBIT_RADIUS).abs() < 1e-3);
            assert!(one.position.dot(two.position).abs() < 1e-2);
            assert_eq!(one.position.y, 0.0);
        }
    }
}
