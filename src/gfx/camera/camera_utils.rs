use cgmath::{Matrix4, Point3, SquareMatrix};
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton},
};

use super::{
    camera_controller::{CameraController, CursorStyle, PointerControl},
    free_camera::FreeCamera,
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Couples the free camera with its input controller and pointer locking.
pub struct CameraManager {
    pub camera: FreeCamera,
    pub controller: CameraController,
    /// Screen centre the pointer is warped back to while rotating; `None` leaves the pointer free
    lock_center: Option<PhysicalPosition<f64>>,
}

impl CameraManager {
    pub fn new(camera: FreeCamera, controller: CameraController) -> Self {
        Self {
            camera,
            controller,
            lock_center: None,
        }
    }

    /// Builds a manager whose camera starts at `position`.
    pub fn at_position(aspect: f32, position: Point3<f32>) -> Self {
        Self::new(FreeCamera::new(aspect, position), CameraController::new())
    }

    /// Enables locked-mouse mode around the centre of a `width` x `height` window.
    pub fn lock_pointer(&mut self, width: u32, height: u32) {
        self.lock_center = Some(screen_center(width, height));
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize_projection(width, height);
        self.camera.update_view_proj();
        if self.lock_center.is_some() {
            self.lock_pointer(width, height);
        }
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        self.controller.process_device_event(event);
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        self.controller.process_keyboard_event(event);
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.controller.process_mouse_button(button, state);
    }

    /// Runs one frame of camera input. Returns true when the pose changed, in
    /// which case the camera uniform has been refreshed.
    ///
    /// While rotating, the pointer is warped back to the lock centre (if any)
    /// and the cursor switches to a crosshair; otherwise the arrow is shown.
    pub fn update(&mut self, elapsed_seconds: f32, pointer: &dyn PointerControl) -> bool {
        let input = self.controller.take_frame_input();
        let changed = self.camera.update(&input, elapsed_seconds);

        if input.rotating {
            match self.lock_center {
                Some(center) => {
                    pointer.warp_pointer(center);
                    pointer.set_cursor_style(CursorStyle::Crosshair);
                }
                None => pointer.set_cursor_style(CursorStyle::Arrow),
            }
        }

        if changed {
            self.camera.update_view_proj();
        }
        changed
    }
}

pub fn screen_center(width: u32, height: u32) -> PhysicalPosition<f64> {
    PhysicalPosition::new(f64::from(width / 2), f64::from(height / 2))
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    /// Creates a default [CameraUniform].
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}
