use thiserror::Error;

use crate::gfx::geometry::GeometryError;

/// Failures while setting up or driving the GPU renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    UnsupportedSurface,

    #[error("shader '{name}' failed to compile: {message}")]
    Shader { name: String, message: String },

    #[error("pipeline '{name}' references unknown shader '{shader}'")]
    MissingShader { name: String, shader: String },

    #[error("pipeline '{name}' could not be created: {message}")]
    Pipeline { name: String, message: String },

    #[error("{label} needs {size} bytes but the device allows at most {max}")]
    BufferTooLarge { label: String, size: u64, max: u64 },

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("surface error: {0}")]
    Surface(wgpu::SurfaceError),
}

/// What the frame loop does with a failed `get_current_texture`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceAction {
    /// Reconfigure the surface and drop this frame
    Reconfigure,
    /// Drop this frame and try again next time
    Skip,
    /// Unrecoverable; stop rendering
    Fatal,
}

impl SurfaceAction {
    pub fn for_error(error: &wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceAction::Reconfigure,
            wgpu::SurfaceError::OutOfMemory => SurfaceAction::Fatal,
            _ => SurfaceAction::Skip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_error_actions() {
        assert_eq!(
            SurfaceAction::for_error(&wgpu::SurfaceError::Lost),
            SurfaceAction::Reconfigure
        );
        assert_eq!(
            SurfaceAction::for_error(&wgpu::SurfaceError::Outdated),
            SurfaceAction::Reconfigure
        );
        assert_eq!(
            SurfaceAction::for_error(&wgpu::SurfaceError::Timeout),
            SurfaceAction::Skip
        );
        assert_eq!(
            SurfaceAction::for_error(&wgpu::SurfaceError::OutOfMemory),
            SurfaceAction::Fatal
        );
    }

    #[test]
    fn test_geometry_errors_convert() {
        let err: RenderError = GeometryError::InvalidTessellation { got: 2, min: 3 }.into();
        assert_eq!(err.to_string(), "sphere tessellation must be at least 3, got 2");
    }
}
