//! Frame assembly: owns every GPU resource and records one pass per frame.

use std::time::{Duration, Instant};

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::PhysicalSize;

use shadersource::SourceFetcher;

use crate::clock::{SystemTimeSource, TimeSource};
use crate::geometry::GeometryBuffer;
use crate::gpu::context::GpuContext;
use crate::gpu::pipeline::{resolve_program, QuadPipeline, ShaderError};
use crate::gpu::textures::TextureLoader;
use crate::gpu::uniforms::{self, QuadUniforms};
use crate::host::ImageHost;
use crate::types::{DistortionMode, RendererConfig, RendererError};

const FRAME_LOG_INTERVAL: Duration = Duration::from_secs(1);

pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: QuadPipeline,
    geometry: GeometryBuffer,
    textures: TextureLoader,
    clock: Box<dyn TimeSource>,
    distortion: DistortionMode,
    last_frame_log: Instant,
}

impl GpuState {
    /// Builds every GPU resource in readiness order: surface and device
    /// first, then the shader program (with its locator fallback), and only
    /// once the program has linked the pipeline, vertex buffer, and texture
    /// slots.
    pub(crate) fn new<T>(
        target: &T,
        config: &RendererConfig,
        image_count: usize,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let (width, height) = config.surface_size;
        let context = GpuContext::new(target, PhysicalSize::new(width, height))?;

        let fetcher = SourceFetcher::new()
            .map_err(|err| RendererError::Shader(ShaderError::Fallback(err)))?;
        let sources = resolve_program(&config.vertex_source, &config.fragment_source, |locator| {
            fetcher.resolve(locator)
        })
        .map_err(RendererError::Shader)?;

        let pipeline = QuadPipeline::new(
            &context.device,
            context.surface_format,
            &sources,
            config.geometry,
        );
        let geometry = GeometryBuffer::upload(&context.device, config.geometry);
        let textures = TextureLoader::new(&context.device, image_count);

        tracing::info!(
            images = image_count,
            geometry = ?config.geometry,
            distortion = ?config.distortion,
            "renderer ready"
        );

        Ok(Self {
            context,
            pipeline,
            geometry,
            textures,
            clock: Box::new(SystemTimeSource::new()),
            distortion: config.distortion,
            last_frame_log: Instant::now(),
        })
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Number of images promoted to textures so far.
    pub(crate) fn resolved_count(&self) -> usize {
        self.textures.resolved_count()
    }

    /// Drains the host's load completions, promoting each to a texture.
    /// Returns how many images were newly promoted by this call.
    pub(crate) fn pump(&mut self, host: &mut dyn ImageHost) -> usize {
        let mut promoted = 0;
        for loaded in host.poll_loaded() {
            if self.textures.resolve(
                &self.context.device,
                &self.context.queue,
                &self.pipeline,
                loaded,
            ) {
                promoted += 1;
            }
        }
        promoted
    }

    /// Renders one frame: refresh each resolved image's uniforms from the
    /// current surface size, host layout, clock, and pointer, then draw them
    /// all in discovery order within a single pass.
    pub(crate) fn render_frame(
        &mut self,
        host: &dyn ImageHost,
        mouse: [f32; 2],
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let sample = self.clock.sample();
        let width = self.context.size.width;
        let height = self.context.size.height;
        let perspective = uniforms::distortion_matrix(self.distortion, mouse, width, height);

        let mut drawn = 0usize;
        let mut draw_set = Vec::new();
        for (index, record) in self.textures.resolved() {
            let Some(rect) = host.display_rect(record.image, width, height) else {
                continue;
            };
            let block = QuadUniforms {
                matrix: uniforms::placement_matrix(width, height, &rect),
                perspective,
                time: sample.staggered(index),
                _padding: 0.0,
                mouse,
            };
            self.context
                .queue
                .write_buffer(&record.uniform_buffer, 0, bytemuck::bytes_of(&block));
            draw_set.push(record);
        }

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("photowall frame"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("photowall pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_vertex_buffer(0, self.geometry.buffer.slice(..));
            for record in draw_set {
                pass.set_bind_group(0, &record.uniform_bind_group, &[]);
                pass.set_bind_group(1, &record.texture_bind_group, &[]);
                pass.draw(0..self.geometry.vertex_count, 0..1);
                drawn += 1;
            }
        }

        self.context.queue.submit(Some(encoder.finish()));
        frame.present();

        if self.last_frame_log.elapsed() >= FRAME_LOG_INTERVAL {
            self.last_frame_log = Instant::now();
            tracing::debug!(
                frame = sample.frame_index,
                seconds = sample.seconds,
                drawn,
                resolved = self.textures.resolved_count(),
                total = host.image_count(),
                "frame presented"
            );
        }

        Ok(())
    }
}
