//! Named render pipelines built from shared shader modules.
//!
//! Pipelines are registered as [`PipelineConfig`]s and compiled together by
//! [`PipelineManager::create_all_pipelines`]; the frame loop then looks them
//! up by technique name.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    sync::Arc,
};
use wgpu::*;

use crate::gfx::scene::vertex::Vertex3D;

use super::error::RenderError;

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: String,
    pub vertex_entry: String,
    pub fragment_entry: String,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub primitive_topology: PrimitiveTopology,
    pub front_face: FrontFace,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub color_targets: Vec<Option<ColorTargetState>>,
    /// Full-screen passes generate their vertices from `vertex_index`
    pub no_vertex_buffers: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "Default Pipeline".to_string(),
            shader: "shader.wgsl".to_string(),
            vertex_entry: "vs_main".to_string(),
            fragment_entry: "fs_main".to_string(),
            bind_group_layouts: Vec::new(),
            primitive_topology: PrimitiveTopology::TriangleList,
            front_face: FrontFace::Ccw,
            cull_mode: Some(Face::Back),
            depth_format: None,
            color_targets: vec![Some(ColorTargetState {
                format: TextureFormat::Bgra8Unorm,
                blend: Some(BlendState::REPLACE),
                write_mask: ColorWrites::ALL,
            })],
            no_vertex_buffers: false,
        }
    }
}

impl PipelineConfig {
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_owned();
        self
    }

    pub fn with_shader(mut self, shader: &str) -> Self {
        self.shader = shader.to_string();
        self
    }

    /// Sets the vertex and fragment entry points (builder pattern)
    pub fn with_entry_points(mut self, vertex: &str, fragment: &str) -> Self {
        self.vertex_entry = vertex.to_string();
        self.fragment_entry = fragment.to_string();
        self
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn with_front_face(mut self, front_face: FrontFace) -> Self {
        self.front_face = front_face;
        self
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Enables depth testing against a buffer of `format`
    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    /// Single opaque colour target of `format`
    pub fn with_color_format(mut self, format: TextureFormat) -> Self {
        self.color_targets = vec![Some(ColorTargetState {
            format,
            blend: Some(BlendState::REPLACE),
            write_mask: ColorWrites::ALL,
        })];
        self
    }

    pub fn with_no_vertex_buffers(mut self) -> Self {
        self.no_vertex_buffers = true;
        self
    }
}

/// Names of missing pipelines that have already been logged
#[derive(Debug, Default)]
struct MissingPipelines(RefCell<HashSet<String>>);

impl MissingPipelines {
    /// True the first time `name` is seen.
    fn first_report(&self, name: &str) -> bool {
        let mut reported = self.0.borrow_mut();
        if reported.contains(name) {
            return false;
        }
        reported.insert(name.to_string())
    }
}

/// Owns shader modules and the pipelines compiled from them
pub struct PipelineManager {
    device: Arc<Device>,
    pipelines: HashMap<String, RenderPipeline>,
    pipeline_configs: HashMap<String, PipelineConfig>,
    shader_modules: HashMap<String, ShaderModule>,
    missing: MissingPipelines,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>) -> Self {
        Self {
            device,
            pipelines: HashMap::new(),
            pipeline_configs: HashMap::new(),
            shader_modules: HashMap::new(),
            missing: MissingPipelines::default(),
        }
    }

    /// Compiles a WGSL module, surfacing validation errors instead of panicking.
    pub fn load_shader(&mut self, name: &str, source: &str) -> Result<(), RenderError> {
        self.device.push_error_scope(ErrorFilter::Validation);
        let shader_module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(name),
            source: ShaderSource::Wgsl(source.into()),
        });
        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(RenderError::Shader {
                name: name.to_string(),
                message: error.to_string(),
            });
        }

        log::debug!("Loaded shader '{}'", name);
        self.shader_modules.insert(name.to_string(), shader_module);
        Ok(())
    }

    /// Registers a pipeline configuration without creating it
    pub fn register_pipeline(&mut self, name: &str, config: PipelineConfig) {
        if self.pipeline_configs.insert(name.to_string(), config).is_some() {
            // Stale pipeline must be rebuilt from the new config
            self.pipelines.remove(name);
        }
    }

    /// Builds every registered pipeline that has not been built yet.
    pub fn create_all_pipelines(&mut self) -> Result<(), RenderError> {
        let mut pending: Vec<&String> = self
            .pipeline_configs
            .keys()
            .filter(|name| !self.pipelines.contains_key(*name))
            .collect();
        pending.sort();

        let mut created = Vec::with_capacity(pending.len());
        for name in pending {
            let config = &self.pipeline_configs[name];
            created.push((name.clone(), self.create_pipeline_from_config(name, config)?));
        }

        for (name, pipeline) in created {
            log::debug!("Created pipeline '{}'", name);
            self.pipelines.insert(name, pipeline);
        }
        Ok(())
    }

    /// Returns a built pipeline. A missing pipeline is logged once per name
    /// and skipped by the caller.
    pub fn get_pipeline(&self, name: &str) -> Option<&RenderPipeline> {
        let pipeline = self.pipelines.get(name);
        if pipeline.is_none() && self.missing.first_report(name) {
            log::warn!("Pipeline '{}' is not available", name);
        }
        pipeline
    }

    fn create_pipeline_from_config(
        &self,
        name: &str,
        config: &PipelineConfig,
    ) -> Result<RenderPipeline, RenderError> {
        let shader =
            self.shader_modules
                .get(&config.shader)
                .ok_or_else(|| RenderError::MissingShader {
                    name: name.to_string(),
                    shader: config.shader.clone(),
                })?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();

        self.device.push_error_scope(ErrorFilter::Validation);

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", name)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let vertex_buffers: &[VertexBufferLayout] = if config.no_vertex_buffers {
            &[]
        } else {
            &[Vertex3D::desc()]
        };

        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some(config.vertex_entry.as_str()),
                    buffers: vertex_buffers,
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: shader,
                    entry_point: Some(config.fragment_entry.as_str()),
                    targets: &config.color_targets,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: PrimitiveState {
                    topology: config.primitive_topology,
                    strip_index_format: None,
                    front_face: config.front_face,
                    cull_mode: config.cull_mode,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        match pollster::block_on(self.device.pop_error_scope()) {
            Some(error) => Err(RenderError::Pipeline {
                name: name.to_string(),
                message: error.to_string(),
            }),
            None => Ok(pipeline),
        }
    }
}
