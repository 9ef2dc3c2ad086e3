pub mod camera_controller;
pub mod camera_utils;
pub mod free_camera;

// Re-export main types
pub use camera_controller::{CameraController, CursorStyle, PointerControl};
pub use camera_utils::{CameraManager, CameraUniform};
pub use free_camera::{Basis, CameraPose, FrameInput, FreeCamera, MovementSettings, Orientation};
