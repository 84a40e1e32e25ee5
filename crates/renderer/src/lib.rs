//! Renderer crate for the particle avatar preview.
//!
//! Every pixel of an avatar image becomes one GPU point particle; each frame
//! the particles drift along a fixed random velocity and roughly half of
//! them reroll their color, producing the intended glitchy flicker over the
//! sampled avatar. The overall flow is:
//!
//! ```text
//!   CLI / avatarview
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ window event loop ──▶ GpuState::render()
//!                                               │
//!                                               └─▶ ParticleRenderer::render_frame()
//!                                                     (step field ─▶ upload ─▶ draw points)
//! ```
//!
//! `GpuState` owns all GPU resources (surface, device, pipeline, particle
//! buffer, avatar texture), while [`Renderer`] is the thin entry point that
//! opens the preview window. The whole subsystem is single-threaded: the
//! host display loop invokes the frame driver synchronously once per redraw,
//! and all particle mutation happens inside that callback.

mod gpu;
mod particle;
mod types;
mod window;

use anyhow::Result;

pub use gpu::AvatarError;
pub use particle::{Particle, ParticleField, GLITCH_PROBABILITY, VELOCITY_RANGE};
pub use types::{GpuPowerPreference, RendererConfig};

/// High-level entry point that owns the chosen configuration.
///
/// The heavy lifting lives inside the window/GPU modules; `Renderer` simply
/// forwards the request.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the preview window and renders until it is closed.
    ///
    /// Returns an error when initialisation cannot proceed: no suitable GPU
    /// adapter or device, pipeline compilation failure, an unusable avatar
    /// asset, or a window system failure. These are configuration/environment
    /// errors surfaced before the first frame; the per-frame path has no
    /// error conditions of its own.
    pub fn run(&mut self) -> Result<()> {
        window::run(&self.config)
    }
}
