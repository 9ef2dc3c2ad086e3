//! wgpu renderer for the demo scene
//!
//! Each frame renders the scene into an offscreen colour target, then runs a
//! full-screen post-processing pass from that target onto the swapchain.

use std::{collections::HashMap, sync::Arc};

use wgpu::TextureFormat;

use crate::gfx::{
    geometry::{generate_cube, generate_quad, GeometryData},
    resources::{
        global_bindings::{GlobalBindings, GlobalUBO, GlobalUniform},
        object_bindings::{object_bind_group_layout, ObjectBindings},
        texture_resource::{DepthTexture, TextureResource},
    },
    scene::{
        object::{MeshKind, Technique},
        scene::Scene,
    },
};

use super::{
    error::{RenderError, SurfaceAction},
    mesh::{DrawMesh, GpuMesh},
    pipeline_manager::{PipelineConfig, PipelineManager},
};

pub const POST_PROCESSING_PIPELINE: &str = "PostProcessing";

const SCENE_SHADER: &str = "scene";
const POST_SHADER: &str = "post_process";

const SCENE_CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 100.0 / 255.0,
    g: 149.0 / 255.0,
    b: 237.0 / 255.0,
    a: 1.0,
};

/// Picks a non-sRGB surface format, mirroring the shaders' linear output.
pub fn choose_surface_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied())
}

/// Fifo when vsync is requested or Immediate is unsupported.
pub fn choose_present_mode(vsync: bool, supported: &[wgpu::PresentMode]) -> wgpu::PresentMode {
    if !vsync && supported.contains(&wgpu::PresentMode::Immediate) {
        wgpu::PresentMode::Immediate
    } else {
        wgpu::PresentMode::Fifo
    }
}

/// Largest surface size not exceeding `max_dimension` on either axis.
///
/// Oversized requests are scaled down uniformly so the aspect ratio holds.
pub fn clamp_surface_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let max_dimension = max_dimension.max(1);
    let (width, height) = (width.max(1), height.max(1));
    let largest = width.max(height);
    if largest <= max_dimension {
        return (width, height);
    }

    let scale = |side: u32| {
        let scaled = u64::from(side) * u64::from(max_dimension) / u64::from(largest);
        (scaled as u32).clamp(1, max_dimension)
    };
    (scale(width), scale(height))
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: DepthTexture,
    scene_target: TextureResource,
    post_layout: wgpu::BindGroupLayout,
    post_bind_group: wgpu::BindGroup,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: wgpu::BindGroupLayout,
    object_bindings: Vec<ObjectBindings>,
    meshes: HashMap<MeshKind, GpuMesh>,
}

impl RenderEngine {
    /// Creates a render engine for `window` and builds every technique pipeline.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&surface_capabilities.formats)
            .ok_or(RenderError::UnsupportedSurface)?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let (width, height) =
            clamp_surface_size(width, height, device.limits().max_texture_dimension_2d);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: choose_present_mode(vsync, &surface_capabilities.present_modes),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface configured: {}x{} {:?} {:?}",
            config.width,
            config.height,
            format,
            config.present_mode
        );

        let depth_texture = DepthTexture::new(&device, config.width, config.height, "depth_texture");
        let scene_target = TextureResource::create_render_target(
            &device,
            config.width,
            config.height,
            format,
            "scene_target",
        );

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let object_layout = object_bind_group_layout(&device);

        let post_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Post Processing Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let post_bind_group = Self::create_post_bind_group(&device, &post_layout, &scene_target);

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader(SCENE_SHADER, include_str!("shader.wgsl"))?;
        pipeline_manager.load_shader(POST_SHADER, include_str!("post_process.wgsl"))?;

        let scene_layouts = vec![global_bindings.layout().clone(), object_layout.clone()];

        // Sphere and floor are wound clockwise seen from their visible side
        pipeline_manager.register_pipeline(
            Technique::Basic.pipeline_name(),
            PipelineConfig::default()
                .with_label("BasicShader")
                .with_shader(SCENE_SHADER)
                .with_entry_points("vs_main", "fs_basic")
                .with_bind_group_layouts(scene_layouts.clone())
                .with_front_face(wgpu::FrontFace::Cw)
                .with_cull_mode(Some(wgpu::Face::Back))
                .with_depth_format(DepthTexture::FORMAT)
                .with_color_format(format),
        );

        pipeline_manager.register_pipeline(
            Technique::Unlit.pipeline_name(),
            PipelineConfig::default()
                .with_label("Unlit")
                .with_shader(SCENE_SHADER)
                .with_entry_points("vs_main", "fs_unlit")
                .with_bind_group_layouts(scene_layouts)
                .with_cull_mode(None)
                .with_depth_format(DepthTexture::FORMAT)
                .with_color_format(format),
        );

        pipeline_manager.register_pipeline(
            POST_PROCESSING_PIPELINE,
            PipelineConfig::default()
                .with_label("PostProcessing")
                .with_shader(POST_SHADER)
                .with_entry_points("vs_post", "fs_post")
                .with_bind_group_layouts(vec![post_layout.clone()])
                .with_cull_mode(None)
                .with_color_format(format)
                .with_no_vertex_buffers(),
        );

        pipeline_manager.create_all_pipelines()?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            format,
            depth_texture,
            scene_target,
            post_layout,
            post_bind_group,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_layout,
            object_bindings: Vec::new(),
            meshes: HashMap::new(),
        })
    }

    fn create_post_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        target: &TextureResource,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Post Processing Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&target.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&target.sampler),
                },
            ],
        })
    }

    /// Uploads the shared sphere mesh plus the built-in floor quad and cube.
    pub fn upload_meshes(&mut self, sphere: &GeometryData) -> Result<(), RenderError> {
        let meshes = [
            (MeshKind::Sphere, GpuMesh::upload(&self.device, sphere, "sphere")?),
            (MeshKind::Floor, GpuMesh::upload(&self.device, &generate_quad(), "floor")?),
            (MeshKind::Cube, GpuMesh::upload(&self.device, &generate_cube(), "cube")?),
        ];
        self.meshes.extend(meshes);
        Ok(())
    }

    /// Pushes this frame's globals and per-object state to the GPU.
    ///
    /// `scene.camera_manager.camera.uniform` is read as-is; it only changes
    /// when the camera pose does.
    pub fn update(&mut self, scene: &Scene) {
        let globals = GlobalUniform::new(
            &scene.camera_manager.camera.uniform,
            &scene.lights,
            scene.lighting_enabled(),
        );
        self.global_ubo.update_content(&self.queue, globals);

        if self.object_bindings.len() != scene.objects.len() {
            self.object_bindings = scene
                .objects
                .iter()
                .map(|object| ObjectBindings::new(&self.device, &self.object_layout, object))
                .collect();
            return;
        }

        for (bindings, object) in self.object_bindings.iter_mut().zip(&scene.objects) {
            bindings.update(&self.queue, object);
        }
    }

    /// Renders one frame. Lost or outdated surfaces are reconfigured and the
    /// frame skipped; only out-of-memory is returned as an error.
    pub fn render_frame(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(error) => {
                return match SurfaceAction::for_error(&error) {
                    SurfaceAction::Reconfigure => {
                        log::debug!("Surface {:?}, reconfiguring", error);
                        self.surface.configure(&self.device, &self.config);
                        Ok(())
                    }
                    SurfaceAction::Skip => {
                        log::warn!("Dropping frame: {}", error);
                        Ok(())
                    }
                    SurfaceAction::Fatal => Err(RenderError::Surface(error)),
                };
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: scene into the offscreen target
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.scene_target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(SCENE_CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for (object, bindings) in scene.objects.iter().zip(&self.object_bindings) {
                if !object.visible {
                    continue;
                }
                let Some(mesh) = self.meshes.get(&object.mesh) else {
                    log::warn!("Skipping '{}': mesh {:?} not uploaded", object.name, object.mesh);
                    continue;
                };
                let Some(pipeline) = self
                    .pipeline_manager
                    .get_pipeline(object.technique.pipeline_name())
                else {
                    continue;
                };

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, bindings.bind_group(), &[]);
                render_pass.draw_mesh(mesh);
            }
        }

        // PASS 2: post-processing onto the swapchain
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Post Processing Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(POST_PROCESSING_PIPELINE) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.post_bind_group, &[]);
                render_pass.draw(0..3, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Reconfigures the surface and recreates the size-dependent targets.
    /// Zero-sized requests (minimized windows) are ignored; sizes beyond the
    /// device's texture limit are scaled down to fit.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let (width, height) =
            clamp_surface_size(width, height, self.device.limits().max_texture_dimension_2d);
        if (width, height) != (self.config.width, self.config.height) {
            log::debug!("Surface resized to {}x{}", width, height);
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_texture = DepthTexture::new(&self.device, width, height, "depth_texture");
        self.scene_target = TextureResource::create_render_target(
            &self.device,
            width,
            height,
            self.format,
            "scene_target",
        );
        self.post_bind_group =
            Self::create_post_bind_group(&self.device, &self.post_layout, &self.scene_target);
    }
}
