use std::path::PathBuf;

/// Which GPU adapter the renderer should ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuPowerPreference {
    /// Prefer the battery-friendly adapter (integrated GPU where present).
    Low,
    /// Prefer the fastest adapter. Default: the preview is a foreground app.
    #[default]
    High,
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors CLI flags and tells the renderer which avatar
/// image to particleise, how large the preview window should be, and how
/// fast to pace redraws.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Path to the avatar image; its pixel dimensions set the particle count.
    pub avatar: PathBuf,
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Optional FPS cap; `None` renders every refresh the host grants.
    pub target_fps: Option<f32>,
    /// GPU adapter selection policy.
    pub gpu_power: GpuPowerPreference,
    /// Optional RNG seed for reproducible velocity/color sequences.
    pub seed: Option<u64>,
    /// Title of the preview window.
    pub window_title: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            avatar: PathBuf::new(),
            surface_size: (512, 512),
            target_fps: None,
            gpu_power: GpuPowerPreference::default(),
            seed: None,
            window_title: "Avatar Preview".to_string(),
        }
    }
}
