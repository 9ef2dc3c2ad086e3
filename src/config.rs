//! Application configuration.
//!
//! Defaults reproduce the demo scene; a handful of `VANTAGE_*` environment
//! variables can override them at startup.

use std::str::FromStr;

use cgmath::Point3;

use crate::gfx::camera::MovementSettings;

pub const ENV_TESSELLATION: &str = "VANTAGE_TESSELLATION";
pub const ENV_LIGHTING: &str = "VANTAGE_LIGHTING";
pub const ENV_VSYNC: &str = "VANTAGE_VSYNC";
pub const ENV_MOVE_SPEED: &str = "VANTAGE_MOVE_SPEED";

#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    pub movement: MovementSettings,
    pub start_position: Point3<f32>,
    /// Warp the pointer back to the window centre while rotating
    pub lock_mouse: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            movement: MovementSettings::default(),
            start_position: Point3::new(0.0, 5.0, 20.0),
            lock_mouse: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSettings {
    pub diameter: f32,
    pub tessellation: u32,
}

impl Default for SphereSettings {
    fn default() -> Self {
        Self {
            diameter: 15.0,
            tessellation: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub camera: CameraSettings,
    pub sphere: SphereSettings,
    pub lighting_enabled: bool,
    pub vsync: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Vantage".to_string(),
            width: 1280,
            height: 720,
            camera: CameraSettings::default(),
            sphere: SphereSettings::default(),
            lighting_enabled: true,
            vsync: true,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_camera(mut self, camera: CameraSettings) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_sphere(mut self, sphere: SphereSettings) -> Self {
        self.sphere = sphere;
        self
    }

    pub fn with_lighting(mut self, enabled: bool) -> Self {
        self.lighting_enabled = enabled;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Defaults overlaid with any `VANTAGE_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Values that fail to parse are logged and skipped.
    pub fn overlay<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(tessellation) = parse_var::<u32>(&lookup, ENV_TESSELLATION) {
            self.sphere.tessellation = tessellation;
        }
        if let Some(lighting) = lookup(ENV_LIGHTING).and_then(|v| parse_flag(ENV_LIGHTING, &v)) {
            self.lighting_enabled = lighting;
        }
        if let Some(vsync) = lookup(ENV_VSYNC).and_then(|v| parse_flag(ENV_VSYNC, &v)) {
            self.vsync = vsync;
        }
        if let Some(speed) = parse_var::<f32>(&lookup, ENV_MOVE_SPEED) {
            if speed.is_finite() && speed > 0.0 {
                self.camera.movement.movement_speed = speed;
            } else {
                log::warn!("{} must be a positive number, got {}", ENV_MOVE_SPEED, speed);
            }
        }
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}: cannot parse '{}'", key, raw);
            None
        }
    }
}

fn parse_flag(key: &str, raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => {
            log::warn!("Ignoring {}: expected a boolean, got '{}'", key, raw);
            None
        }
    }
}
