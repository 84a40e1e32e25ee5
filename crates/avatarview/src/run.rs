use anyhow::Result;
use renderer::{Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = RendererConfig {
        avatar: cli.avatar,
        ..RendererConfig::default()
    };
    if let Some(size) = cli.size {
        config.surface_size = size;
    }
    if let Some(title) = cli.title {
        config.window_title = title;
    }
    config.target_fps = cli.fps;
    config.seed = cli.seed;
    config.gpu_power = cli.gpu_power;

    tracing::info!(
        avatar = %config.avatar.display(),
        width = config.surface_size.0,
        height = config.surface_size.1,
        fps_cap = ?config.target_fps,
        "starting avatar preview"
    );

    let mut renderer = Renderer::new(config);
    renderer.run()
}
