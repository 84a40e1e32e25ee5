use std::time::{Duration, Instant};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::debug;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::particle::ParticleField;
use crate::types::RendererConfig;

use super::avatar::{self, AvatarError};
use super::context::GpuContext;
use super::pipeline::ParticlePipeline;

/// GPU-side particle resources, or the recorded reason they are absent.
///
/// The sum type keeps the per-frame no-op path an explicit, exhaustively
/// matched state instead of a sprinkle of `Option`s.
pub(crate) enum ParticleResources {
    Ready(ReadyResources),
    Unavailable(AvatarError),
}

pub(crate) struct ReadyResources {
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    field: ParticleField,
}

/// The frame driver: owns pipeline, avatar resources, particle field, and
/// the RNG feeding velocity/color sampling.
///
/// The single per-frame entry point is [`render_frame`], invoked
/// synchronously from the host redraw callback. All mutation happens there;
/// the simulate → upload → draw sequence completes before the callback
/// returns.
///
/// [`render_frame`]: ParticleRenderer::render_frame
pub(crate) struct ParticleRenderer {
    pipeline: ParticlePipeline,
    resources: ParticleResources,
    rng: StdRng,
}

impl ParticleRenderer {
    /// Builds the pipeline (fatal on failure) and loads the avatar.
    ///
    /// A missing or degenerate avatar is not an `Err`: the reason is logged
    /// once and recorded, and every subsequent frame is a silent no-op. The
    /// host decides whether that is fatal for the session.
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        config: &RendererConfig,
    ) -> Result<Self> {
        let pipeline = ParticlePipeline::new(device, surface_format)?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let resources = match avatar::load_avatar(device, queue, &config.avatar) {
            Ok(avatar) => {
                let field = ParticleField::from_avatar(avatar.width, avatar.height, &mut rng);
                let vertex_buffer =
                    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("particle vertex buffer"),
                        contents: bytemuck::cast_slice(field.particles()),
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    });
                let bind_group = pipeline.bind_avatar(device, &avatar);
                tracing::info!(
                    width = avatar.width,
                    height = avatar.height,
                    particles = field.len(),
                    "avatar particle field initialised"
                );
                ParticleResources::Ready(ReadyResources {
                    bind_group,
                    vertex_buffer,
                    field,
                })
            }
            Err(reason) => {
                tracing::error!(error = %reason, "avatar unavailable; frames will be skipped");
                ParticleResources::Unavailable(reason)
            }
        };

        Ok(Self {
            pipeline,
            resources,
            rng,
        })
    }

    /// The recorded avatar failure, if initialisation left the renderer
    /// without resources.
    pub(crate) fn unavailable_reason(&self) -> Option<&AvatarError> {
        match &self.resources {
            ParticleResources::Ready(_) => None,
            ParticleResources::Unavailable(reason) => Some(reason),
        }
    }

    pub(crate) fn particle_count(&self) -> usize {
        match &self.resources {
            ParticleResources::Ready(resources) => resources.field.len(),
            ParticleResources::Unavailable(_) => 0,
        }
    }

    /// Renders one frame into `target`: advance the simulation, re-upload
    /// the particle buffer, encode a single point-list draw.
    ///
    /// With resources unavailable this is a no-op: no pass, no draw, no
    /// fresh error. The reason was logged at construction; repeating it
    /// every frame would only flood the log.
    pub(crate) fn render_frame(
        &mut self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        let resources = match &mut self.resources {
            ParticleResources::Ready(resources) => resources,
            ParticleResources::Unavailable(_) => return,
        };

        resources.field.step(&mut self.rng);
        queue.write_buffer(
            &resources.vertex_buffer,
            0,
            bytemuck::cast_slice(resources.field.particles()),
        );

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("particle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                depth_slice: None,
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
        render_pass.set_pipeline(&self.pipeline.pipeline);
        render_pass.set_bind_group(0, &resources.bind_group, &[]);
        render_pass.set_vertex_buffer(0, resources.vertex_buffer.slice(..));
        render_pass.draw(0..resources.field.len() as u32, 0..1);
    }
}

/// Glues context and renderer together for the windowed host: acquires the
/// swapchain frame, drives the frame driver, presents, and keeps per-second
/// render statistics.
pub(crate) struct GpuState {
    context: GpuContext,
    renderer: ParticleRenderer,
    last_stats: Instant,
    frames_since_stats: u32,
}

impl GpuState {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        config: &RendererConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size, config.gpu_power)?;
        let renderer = ParticleRenderer::new(
            &context.device,
            &context.queue,
            context.surface_format,
            config,
        )?;

        Ok(Self {
            context,
            renderer,
            last_stats: Instant::now(),
            frames_since_stats: 0,
        })
    }

    pub(crate) fn unavailable_reason(&self) -> Option<&AvatarError> {
        self.renderer.unavailable_reason()
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    pub(crate) fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        self.renderer
            .render_frame(&self.context.queue, &mut encoder, &view);

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        self.frames_since_stats += 1;
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_stats);
        if elapsed >= Duration::from_secs(1) {
            debug!(
                fps = (self.frames_since_stats as f32 / elapsed.as_secs_f32()).round(),
                particles = self.renderer.particle_count(),
                "render stats"
            );
            self.frames_since_stats = 0;
            self.last_stats = now;
        }

        Ok(())
    }
}
