//! Shader program lifecycle: compile, link, and the fetch fallback.
//!
//! Stage sources are parsed with naga's GLSL front-end so compile failures
//! carry a driver-independent diagnostic, then run through the naga validator
//! (the link step). If the initial pair fails for any reason, both strings
//! are reinterpreted as resource locators, fetched as plain text, and the
//! build retried exactly once; a second failure is fatal. Only after the
//! sources validate are the wgpu modules, bind group layouts, and render
//! pipeline created, which gates every buffer upload and draw behind program
//! readiness.

use std::borrow::Cow;

use shadersource::SourceError;
use tracing::{info, warn};
use wgpu::naga;
use wgpu::naga::ShaderStage;

use crate::geometry::Vertex;
use crate::types::GeometryKind;

/// Failures raised while building the shader program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: &'static str, log: String },
    #[error("{stage} shader failed to link: {log}")]
    Link { stage: &'static str, log: String },
    #[error("shader source fallback fetch failed: {0}")]
    Fallback(#[from] SourceError),
}

/// A vertex/fragment source pair that has passed compile and link checks.
#[derive(Debug, Clone)]
pub(crate) struct ProgramSources {
    pub vertex: String,
    pub fragment: String,
}

fn stage_name(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex => "vertex",
        ShaderStage::Fragment => "fragment",
        _ => "shader",
    }
}

/// Parses one GLSL stage, surfacing the front-end diagnostic on failure.
fn compile_stage(source: &str, stage: ShaderStage) -> Result<naga::Module, ShaderError> {
    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options::from(stage);
    frontend
        .parse(&options, source)
        .map_err(|errors| ShaderError::Compile {
            stage: stage_name(stage),
            log: errors.emit_to_string(source),
        })
}

/// Runs the validator over a parsed stage, surfacing the link log on failure.
fn link_stage(module: &naga::Module, source: &str, stage: ShaderStage) -> Result<(), ShaderError> {
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(module)
        .map(|_| ())
        .map_err(|error| ShaderError::Link {
            stage: stage_name(stage),
            log: error.emit_to_string(source),
        })
}

/// Compiles and links both stages without touching the GPU.
pub(crate) fn validate_program(vertex: &str, fragment: &str) -> Result<(), ShaderError> {
    let vertex_module = compile_stage(vertex, ShaderStage::Vertex)?;
    link_stage(&vertex_module, vertex, ShaderStage::Vertex)?;
    let fragment_module = compile_stage(fragment, ShaderStage::Fragment)?;
    link_stage(&fragment_module, fragment, ShaderStage::Fragment)?;
    Ok(())
}

/// Validates the supplied pair, falling back to locator resolution once.
///
/// `fetch` resolves a locator to text; it is invoked at most once per source
/// and only after the initial pair has failed to build.
pub(crate) fn resolve_program<F>(
    vertex: &str,
    fragment: &str,
    mut fetch: F,
) -> Result<ProgramSources, ShaderError>
where
    F: FnMut(&str) -> Result<String, SourceError>,
{
    match validate_program(vertex, fragment) {
        Ok(()) => {
            return Ok(ProgramSources {
                vertex: vertex.to_string(),
                fragment: fragment.to_string(),
            })
        }
        Err(initial) => {
            warn!(error = %initial, "shader build failed; treating sources as locators");
        }
    }

    let fetched_vertex = fetch(vertex)?;
    let fetched_fragment = fetch(fragment)?;
    validate_program(&fetched_vertex, &fetched_fragment)?;
    info!("shader program recovered via fetched sources");
    Ok(ProgramSources {
        vertex: fetched_vertex,
        fragment: fetched_fragment,
    })
}

/// The linked program plus the layouts per-image resources bind against.
pub(crate) struct QuadPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
}

impl QuadPipeline {
    /// Builds the render pipeline for validated sources.
    pub(crate) fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        sources: &ProgramSources,
        geometry: GeometryKind,
    ) -> Self {
        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("photowall vertex"),
            source: wgpu::ShaderSource::Glsl {
                shader: Cow::Owned(sources.vertex.clone()),
                stage: ShaderStage::Vertex,
                defines: &[],
            },
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("photowall fragment"),
            source: wgpu::ShaderSource::Glsl {
                shader: Cow::Owned(sources.fragment.clone()),
                stage: ShaderStage::Fragment,
                defines: &[],
            },
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quad uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quad texture layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: crate::geometry::topology(geometry),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Flat 2-D overlay; strips flip winding per triangle, so
                // culling is off entirely.
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            uniform_layout,
            texture_layout,
        }
    }
}
