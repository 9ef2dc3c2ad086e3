//! Vantage
//!
//! A small real-time 3D scene built on wgpu and winit: procedurally
//! tessellated spheres on a floor, two orbiting point lights, and a
//! free-flying camera driven by keyboard and mouse.

pub mod app;
pub mod config;
pub mod gfx;
pub mod logging;
pub mod performance;
pub mod wgpu_utils;

pub use app::{AppError, VantageApp};
pub use config::AppConfig;
