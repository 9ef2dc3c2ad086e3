use std::sync::Arc;

use thiserror::Error;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    error::{EventLoopError, OsError},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::AppConfig,
    gfx::{
        camera::{camera_utils::CameraManager, CameraController, FreeCamera},
        geometry::{generate_sphere_from_diameter, GeometryData, GeometryError},
        rendering::{RenderEngine, RenderError},
        scene::Scene,
    },
    performance::FrameClock,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] EventLoopError),

    #[error("could not create window: {0}")]
    Window(#[from] OsError),

    #[error("invalid scene geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub struct VantageApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    sphere: GeometryData,
    clock: FrameClock,
    error: Option<AppError>,
}

impl VantageApp {
    /// Builds the demo scene from `config`. Geometry is validated here, before
    /// any window is opened.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let sphere =
            generate_sphere_from_diameter(config.sphere.diameter, config.sphere.tessellation)?;
        log::info!(
            "Sphere tessellation {}: {} vertices, {} triangles",
            config.sphere.tessellation,
            sphere.vertex_count(),
            sphere.triangle_count()
        );

        let event_loop = EventLoop::new()?;

        let aspect = config.width as f32 / config.height.max(1) as f32;
        let camera = FreeCamera::new(aspect, config.camera.start_position)
            .with_settings(config.camera.movement);
        let camera_manager = CameraManager::new(camera, CameraController::new());
        let scene = Scene::demo(camera_manager, config.lighting_enabled);

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                scene,
                sphere,
                clock: FrameClock::new(),
                error: None,
            },
        })
    }

    /// Runs until the window closes or Escape is pressed.
    pub fn run(mut self) -> Result<(), AppError> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.as_str())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let PhysicalSize { width, height } = window.inner_size();
        let mut renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.vsync,
        ))?;
        renderer.upload_meshes(&self.sphere)?;

        let camera_manager = &mut self.scene.camera_manager;
        camera_manager.resize(width, height);
        if self.config.camera.lock_mouse {
            camera_manager.lock_pointer(width, height);
        }

        self.window = Some(window);
        self.render_engine = Some(renderer);
        self.clock.reset();
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
            && event.state == ElementState::Pressed
        {
            event_loop.exit();
            return;
        }
        self.scene.camera_manager.process_keyboard_event(event);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render_engine)) =
            (self.window.as_ref(), self.render_engine.as_mut())
        else {
            return;
        };

        let frame = self.clock.tick();
        self.scene
            .camera_manager
            .update(frame.elapsed_seconds, &**window);
        self.scene.update(frame.total_seconds);

        render_engine.update(&self.scene);
        if let Err(error) = render_engine.render_frame(&self.scene) {
            self.fail(event_loop, error.into());
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            self.clock.reset();
            return;
        }

        if let Err(error) = self.create_window(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::MouseInput { state, button, .. } => {
                self.scene
                    .camera_manager
                    .process_mouse_button(button, state);
            }
            WindowEvent::Focused(false) => {
                self.scene.camera_manager.controller.release_all();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if width == 0 || height == 0 {
                    return;
                }
                self.scene.camera_manager.resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        self.scene.camera_manager.process_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
