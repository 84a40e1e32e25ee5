//! GPU orchestration for the particle avatar renderer.
//!
//! - `context` owns wgpu instance/device/surface wiring and knows how to
//!   rebuild swapchain state when the window resizes.
//! - `avatar` decodes the avatar image and materialises the texture/sampler
//!   pair the fragment stage samples.
//! - `pipeline` compiles the WGSL point shader into a render pipeline with a
//!   single bind group layout.
//! - `state` glues everything together: `ParticleRenderer` is the per-frame
//!   driver (simulate, upload, draw), `GpuState` wraps it with surface
//!   acquisition and present for the windowed host.

mod avatar;
mod context;
mod pipeline;
mod state;

pub use avatar::AvatarError;
pub(crate) use state::GpuState;
