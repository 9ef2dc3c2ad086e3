//! Free-flying first person camera.
//!
//! Orientation is kept as yaw/pitch in degrees and the view basis is derived
//! from it on demand, so the basis never drifts. Poses are plain values:
//! [`CameraPose::advanced`] computes the next pose from one frame of input and
//! returns `None` when nothing moved, leaving the caller to decide whether
//! downstream matrices need refreshing.

use cgmath::{perspective, Deg, InnerSpace, Matrix4, Point3, Rad, Vector2, Vector3};

use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform, OPENGL_TO_WGPU_MATRIX};

/// Pitch is held strictly inside the poles so `front` never lines up with world up.
pub const PITCH_LIMIT_DEGREES: f32 = 89.0;

/// Yaw of a freshly created camera: looking down -Z.
pub const DEFAULT_YAW_DEGREES: f32 = -90.0;

pub const FIELD_OF_VIEW_DEGREES: f32 = 60.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;

pub fn world_up() -> Vector3<f32> {
    Vector3::unit_y()
}

/// Clamps a pitch angle (degrees) into `[-89, 89]`.
pub fn clamp_pitch(pitch: f32) -> f32 {
    pitch.clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES)
}

/// Yaw/pitch pair in degrees. Pitch is always within the clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    yaw: f32,
    pitch: f32,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::new(DEFAULT_YAW_DEGREES, 0.0)
    }
}

impl Orientation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch: clamp_pitch(pitch),
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Applies a rotation delta in degrees: `yaw -= delta.x`, `pitch += delta.y`.
    ///
    /// Non-finite deltas are ignored.
    pub fn rotated(self, delta: Vector2<f32>) -> Self {
        if !(delta.x.is_finite() && delta.y.is_finite()) {
            return self;
        }
        Self::new(self.yaw - delta.x, self.pitch + delta.y)
    }

    /// Unit view direction for this yaw/pitch.
    pub fn front(&self) -> Vector3<f32> {
        let yaw = Rad::from(Deg(self.yaw)).0;
        let pitch = Rad::from(Deg(self.pitch)).0;
        Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    pub fn basis(&self) -> Basis {
        Basis::from_front(self.front())
    }
}

/// Orthonormal camera basis. `right × up == -front` (right-handed, looking down -Z locally).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub front: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Basis {
    /// Derives right and up from a view direction and the world up axis.
    ///
    /// `front` must not be parallel to world up; the pitch clamp guarantees this.
    pub fn from_front(front: Vector3<f32>) -> Self {
        let right = front.cross(world_up()).normalize();
        let up = right.cross(front).normalize();
        Self { front, right, up }
    }
}

/// Movement tuning for the free camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementSettings {
    /// World units per second
    pub movement_speed: f32,
    /// Degrees of rotation per pixel of mouse motion, per second of frame time
    pub mouse_sensitivity: f32,
    /// Speed factor applied while sprint is held
    pub sprint_multiplier: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            movement_speed: 100.0,
            mouse_sensitivity: 2.5,
            sprint_multiplier: 5.0,
        }
    }
}

/// One frame of camera input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    /// Rotation is only applied while this is set
    pub rotating: bool,
    /// Accumulated pointer motion in pixels, +x right, +y down
    pub mouse_delta: Vector2<f32>,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            forward: false,
            backward: false,
            left: false,
            right: false,
            sprint: false,
            rotating: false,
            mouse_delta: Vector2::new(0.0, 0.0),
        }
    }
}

impl FrameInput {
    pub fn is_moving(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Camera position plus orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f32>,
    pub orientation: Orientation,
}

impl CameraPose {
    pub fn new(position: Point3<f32>, orientation: Orientation) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn basis(&self) -> Basis {
        self.orientation.basis()
    }

    /// Right-handed look-at from `position` toward `position + front`.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let basis = self.basis();
        Matrix4::look_at_rh(self.position, self.position + basis.front, basis.up)
    }

    /// Computes the pose after one frame of input.
    ///
    /// Translation uses the basis from before this frame's rotation. Both
    /// translation and rotation scale with `elapsed_seconds`, so a zero,
    /// negative or non-finite frame time never moves the camera.
    ///
    /// Returns `None` when the pose did not change.
    pub fn advanced(
        &self,
        input: &FrameInput,
        elapsed_seconds: f32,
        settings: &MovementSettings,
    ) -> Option<CameraPose> {
        if !(elapsed_seconds.is_finite() && elapsed_seconds > 0.0) {
            return None;
        }

        let mut next = *self;

        if input.is_moving() {
            let basis = self.basis();
            let mut speed = settings.movement_speed;
            if input.sprint {
                speed *= settings.sprint_multiplier;
            }
            let step = speed * elapsed_seconds;

            let mut direction = Vector3::new(0.0, 0.0, 0.0);
            if input.left {
                direction -= basis.right;
            }
            if input.right {
                direction += basis.right;
            }
            if input.forward {
                direction += basis.front;
            }
            if input.backward {
                direction -= basis.front;
            }

            let offset = direction * step;
            if offset.x.is_finite() && offset.y.is_finite() && offset.z.is_finite() {
                next.position += offset;
            }
        }

        if input.rotating {
            let delta = input.mouse_delta * (settings.mouse_sensitivity * elapsed_seconds);
            next.orientation = self.orientation.rotated(delta);
        }

        (next != *self).then_some(next)
    }
}

/// Free-flying camera with a fixed perspective projection.
#[derive(Debug, Clone, Copy)]
pub struct FreeCamera {
    pose: CameraPose,
    pub settings: MovementSettings,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for FreeCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

impl FreeCamera {
    pub fn new(aspect: f32, position: Point3<f32>) -> Self {
        let mut camera = Self {
            pose: CameraPose::new(position, Orientation::default()),
            settings: MovementSettings::default(),
            aspect,
            fovy: Rad::from(Deg(FIELD_OF_VIEW_DEGREES)),
            znear: Z_NEAR,
            zfar: Z_FAR,
            uniform: CameraUniform::default(),
        };
        camera.update_view_proj();
        camera
    }

    pub fn with_settings(mut self, settings: MovementSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn position(&self) -> Point3<f32> {
        self.pose.position
    }

    pub fn orientation(&self) -> Orientation {
        self.pose.orientation
    }

    pub fn set_pose(&mut self, pose: CameraPose) {
        self.pose = pose;
    }

    pub fn basis(&self) -> Basis {
        self.pose.basis()
    }

    /// Advances the camera by one frame. Returns true when the pose changed.
    ///
    /// The uniform is not touched; call [`FreeCamera::update_view_proj`] when
    /// this returns true.
    pub fn update(&mut self, input: &FrameInput, elapsed_seconds: f32) -> bool {
        match self.pose.advanced(input, elapsed_seconds, &self.settings) {
            Some(pose) => {
                self.pose = pose;
                true
            }
            None => false,
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.pose.view_matrix()
    }

    /// Perspective projection in wgpu clip space (depth 0..1).
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        let eye = self.pose.position;
        self.uniform.view_position = [eye.x, eye.y, eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const EPSILON: f32 = 1e-5;

    fn assert_vec_close(a: Vector3<f32>, b: Vector3<f32>, tolerance: f32) {
        assert!(
            (a - b).magnitude() < tolerance,
            "{:?} != {:?} (tolerance {})",
            a,
            b,
            tolerance
        );
    }

    fn forward_input() -> FrameInput {
        FrameInput {
            forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_orientation_looks_down_negative_z() {
        let basis = Orientation::default().basis();
        assert_vec_close(basis.front, Vector3::new(0.0, 0.0, -1.0), EPSILON);
        assert_vec_close(basis.right, Vector3::new(1.0, 0.0, 0.0), EPSILON);
        assert_vec_close(basis.up, Vector3::new(0.0, 1.0, 0.0), EPSILON);
    }

    #[test]
    fn test_pitch_is_clamped() {
        assert_eq!(Orientation::new(0.0, 120.0).pitch(), 89.0);
        assert_eq!(Orientation::new(0.0, -90.0).pitch(), -89.0);

        let mut orientation = Orientation::default();
        for _ in 0..50 {
            orientation = orientation.rotated(Vector2::new(0.0, 10.0));
        }
        assert_eq!(orientation.pitch(), 89.0);
    }

    #[test]
    fn test_random_rotations_keep_pitch_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut orientation = Orientation::default();
        for _ in 0..1000 {
            let delta = Vector2::new(rng.random_range(-200.0..200.0), rng.random_range(-200.0..200.0));
            orientation = orientation.rotated(delta);
            assert!((-89.0..=89.0).contains(&orientation.pitch()));
        }
    }

    #[test]
    fn test_rotation_signs() {
        let rotated = Orientation::new(10.0, 5.0).rotated(Vector2::new(4.0, 3.0));
        assert_eq!(rotated.yaw(), 6.0);
        assert_eq!(rotated.pitch(), 8.0);
    }

    #[test]
    fn test_non_finite_rotation_is_ignored() {
        let orientation = Orientation::new(30.0, 10.0);
        assert_eq!(orientation.rotated(Vector2::new(f32::NAN, 1.0)), orientation);
        assert_eq!(orientation.rotated(Vector2::new(0.0, f32::INFINITY)), orientation);
    }

    #[test]
    fn test_basis_is_orthonormal_for_any_angles() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2000 {
            let orientation = Orientation::new(
                rng.random_range(-720.0..720.0),
                rng.random_range(-180.0..180.0),
            );
            let Basis { front, right, up } = orientation.basis();

            assert!((front.magnitude() - 1.0).abs() < 1e-4);
            assert!((right.magnitude() - 1.0).abs() < 1e-4);
            assert!((up.magnitude() - 1.0).abs() < 1e-4);

            assert!(front.dot(right).abs() < 1e-4);
            assert!(front.dot(up).abs() < 1e-4);
            assert!(right.dot(up).abs() < 1e-4);

            // Right-handed: right x up points backwards
            assert_vec_close(right.cross(up), -front, 1e-3);
        }
    }

    #[test]
    fn test_basis_at_pitch_limit_is_finite() {
        for pitch in [89.0, -89.0] {
            let basis = Orientation::new(45.0, pitch).basis();
            assert!(basis.right.magnitude().is_finite());
            assert!((basis.right.magnitude() - 1.0).abs() < 1e-3);
            assert!(basis.up.y > 0.0);
        }
    }

    #[test]
    fn test_zero_elapsed_time_is_noop() {
        let mut camera = FreeCamera::new(16.0 / 9.0, Point3::new(0.0, 5.0, 20.0));
        let position = camera.position();
        let view = camera.view_matrix();

        let input = FrameInput {
            forward: true,
            rotating: true,
            mouse_delta: Vector2::new(30.0, -12.0),
            ..Default::default()
        };
        assert!(!camera.update(&input, 0.0));
        assert!(!camera.update(&input, -0.5));
        assert!(!camera.update(&input, f32::NAN));
        assert!(!camera.update(&FrameInput::default(), 0.0));

        assert_eq!(camera.position(), position);
        assert_eq!(camera.view_matrix(), view);
    }

    #[test]
    fn test_no_input_reports_no_change() {
        let mut camera = FreeCamera::new(1.0, Point3::new(1.0, 2.0, 3.0));
        let view = camera.view_matrix();
        assert!(!camera.update(&FrameInput::default(), 0.016));
        assert_eq!(camera.view_matrix(), view);
    }

    #[test]
    fn test_forward_displacement_follows_initial_front() {
        let start = Point3::new(0.0, 5.0, 20.0);
        let mut camera = FreeCamera::new(1.5, start);
        let front = camera.basis().front;
        let speed = camera.settings.movement_speed;

        let mut elapsed = 0.0;
        for _ in 0..10 {
            assert!(camera.update(&forward_input(), 0.05));
            elapsed += 0.05;
        }

        let expected = start + front * speed * elapsed;
        assert_vec_close(
            camera.position() - Point3::new(0.0, 0.0, 0.0),
            expected - Point3::new(0.0, 0.0, 0.0),
            1e-3,
        );
    }

    #[test]
    fn test_sprint_multiplies_speed() {
        let pose = CameraPose::new(Point3::new(0.0, 0.0, 0.0), Orientation::default());
        let settings = MovementSettings::default();

        let walk = pose.advanced(&forward_input(), 0.1, &settings).unwrap();
        let sprint_input = FrameInput {
            sprint: true,
            ..forward_input()
        };
        let sprint = pose.advanced(&sprint_input, 0.1, &settings).unwrap();

        let walked = (walk.position - pose.position).magnitude();
        let sprinted = (sprint.position - pose.position).magnitude();
        assert!((walked - 10.0).abs() < 1e-3);
        assert!((sprinted - walked * settings.sprint_multiplier).abs() < 1e-3);
    }

    #[test]
    fn test_strafe_moves_along_right_and_keeps_height() {
        let pose = CameraPose::new(Point3::new(0.0, 3.0, 0.0), Orientation::new(-90.0, 40.0));
        let settings = MovementSettings::default();
        let input = FrameInput {
            right: true,
            ..Default::default()
        };
        let next = pose.advanced(&input, 0.5, &settings).unwrap();
        assert_vec_close(next.position - pose.position, pose.basis().right * 50.0, 1e-3);
        assert!((next.position.y - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let pose = CameraPose::new(Point3::new(0.0, 0.0, 0.0), Orientation::default());
        let input = FrameInput {
            forward: true,
            backward: true,
            ..Default::default()
        };
        assert_eq!(pose.advanced(&input, 0.1, &MovementSettings::default()), None);
    }

    #[test]
    fn test_mouse_delta_ignored_without_rotate_button() {
        let pose = CameraPose::new(Point3::new(0.0, 0.0, 0.0), Orientation::default());
        let input = FrameInput {
            mouse_delta: Vector2::new(50.0, 50.0),
            ..Default::default()
        };
        assert_eq!(pose.advanced(&input, 0.1, &MovementSettings::default()), None);
    }

    #[test]
    fn test_rotation_scales_with_sensitivity_and_time() {
        let pose = CameraPose::new(Point3::new(0.0, 0.0, 0.0), Orientation::new(0.0, 0.0));
        let settings = MovementSettings::default();
        let input = FrameInput {
            rotating: true,
            mouse_delta: Vector2::new(8.0, -4.0),
            ..Default::default()
        };
        let next = pose.advanced(&input, 0.5, &settings).unwrap();
        // 2.5 * 0.5 = 1.25 degrees per pixel
        assert!((next.orientation.yaw() - -10.0).abs() < EPSILON);
        assert!((next.orientation.pitch() - -5.0).abs() < EPSILON);
        assert_eq!(next.position, pose.position);
    }

    #[test]
    fn test_view_matrix_is_idempotent() {
        let camera = FreeCamera::new(1.0, Point3::new(4.0, -2.0, 9.0));
        assert_eq!(camera.view_matrix(), camera.view_matrix());
        assert_eq!(
            camera.build_view_projection_matrix(),
            camera.build_view_projection_matrix()
        );
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = FreeCamera::new(1.0, Point3::new(0.0, 5.0, 20.0));
        let eye = camera.view_matrix() * cgmath::Vector4::new(0.0, 5.0, 20.0, 1.0);
        assert!(eye.truncate().magnitude() < 1e-4);

        // A point straight ahead lands on the -Z axis in view space
        let ahead = camera.view_matrix() * cgmath::Vector4::new(0.0, 5.0, 10.0, 1.0);
        assert!((ahead.z - -10.0).abs() < 1e-4);
    }

    #[test]
    fn test_uniform_tracks_pose_only_when_refreshed() {
        let mut camera = FreeCamera::new(1.0, Point3::new(0.0, 0.0, 0.0));
        let before = camera.uniform;
        assert!(camera.update(&forward_input(), 0.1));
        assert_eq!(camera.uniform.view_position, before.view_position);

        camera.update_view_proj();
        assert!((camera.uniform.view_position[2] - -10.0).abs() < 1e-3);
        assert_eq!(camera.uniform.view_position[3], 1.0);
    }

    #[test]
    fn test_resize_ignores_zero_height() {
        let mut camera = FreeCamera::new(1.0, Point3::new(0.0, 0.0, 0.0));
        camera.resize_projection(800, 0);
        assert_eq!(camera.aspect, 1.0);
        camera.resize_projection(1600, 900);
        assert!((camera.aspect - 16.0 / 9.0).abs() < EPSILON);
    }
}
