use std::collections::HashSet;

use cgmath::Vector2;
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorIcon, Window},
};

use super::free_camera::FrameInput;

const FORWARD_KEYS: [KeyCode; 2] = [KeyCode::KeyW, KeyCode::ArrowUp];
const BACKWARD_KEYS: [KeyCode; 2] = [KeyCode::KeyS, KeyCode::ArrowDown];
const LEFT_KEYS: [KeyCode; 2] = [KeyCode::KeyA, KeyCode::ArrowLeft];
const RIGHT_KEYS: [KeyCode; 2] = [KeyCode::KeyD, KeyCode::ArrowRight];
const SPRINT_KEY: KeyCode = KeyCode::ShiftLeft;
const ROTATE_BUTTON: MouseButton = MouseButton::Right;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    Crosshair,
    Arrow,
}

/// Platform pointer side effects used by locked-mouse mode.
pub trait PointerControl {
    fn warp_pointer(&self, position: PhysicalPosition<f64>);
    fn set_cursor_style(&self, style: CursorStyle);
}

impl PointerControl for Window {
    fn warp_pointer(&self, position: PhysicalPosition<f64>) {
        if let Err(err) = self.set_cursor_position(position) {
            log::debug!("Pointer warp not available: {}", err);
        }
    }

    fn set_cursor_style(&self, style: CursorStyle) {
        let icon = match style {
            CursorStyle::Crosshair => CursorIcon::Crosshair,
            CursorStyle::Arrow => CursorIcon::Default,
        };
        self.set_cursor(icon);
    }
}

/// Collects keyboard and mouse state between frames.
#[derive(Debug)]
pub struct CameraController {
    pressed_keys: HashSet<KeyCode>,
    is_rotate_held: bool,
    mouse_delta: Vector2<f32>,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            is_rotate_held: false,
            mouse_delta: Vector2::new(0.0, 0.0),
        }
    }
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(code) = event.physical_key {
            self.set_key(code, event.state == ElementState::Pressed);
        }
    }

    /// Records a key as held or released.
    pub fn set_key(&mut self, code: KeyCode, pressed: bool) {
        if pressed {
            self.pressed_keys.insert(code);
        } else {
            self.pressed_keys.remove(&code);
        }
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button != ROTATE_BUTTON {
            return;
        }
        self.is_rotate_held = state == ElementState::Pressed;
        if !self.is_rotate_held {
            self.mouse_delta = Vector2::new(0.0, 0.0);
        }
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.add_mouse_motion(delta.0 as f32, delta.1 as f32);
        }
    }

    /// Accumulates raw pointer motion; discarded unless the rotate button is held.
    pub fn add_mouse_motion(&mut self, dx: f32, dy: f32) {
        if self.is_rotate_held {
            self.mouse_delta += Vector2::new(dx, dy);
        }
    }

    /// Forgets every held key and button, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.pressed_keys.clear();
        self.is_rotate_held = false;
        self.mouse_delta = Vector2::new(0.0, 0.0);
    }

    /// Returns true if the rotate button is currently held
    pub fn is_rotating(&self) -> bool {
        self.is_rotate_held
    }

    /// Snapshot of this frame's input. Resets the accumulated mouse motion.
    pub fn take_frame_input(&mut self) -> FrameInput {
        let input = FrameInput {
            forward: self.any_held(&FORWARD_KEYS),
            backward: self.any_held(&BACKWARD_KEYS),
            left: self.any_held(&LEFT_KEYS),
            right: self.any_held(&RIGHT_KEYS),
            sprint: self.pressed_keys.contains(&SPRINT_KEY),
            rotating: self.is_rotate_held,
            mouse_delta: self.mouse_delta,
        };
        self.mouse_delta = Vector2::new(0.0, 0.0);
        input
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|key| self.pressed_keys.contains(key))
    }
}
