use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use tracing::{error, warn};

use crate::gpu::GpuState;
use crate::types::RendererConfig;

/// Paces redraws to an optional FPS cap.
///
/// Without a cap every `AboutToWait` turn requests a redraw and the surface's
/// Fifo present mode governs the rate. With a cap the pacer holds the next
/// redraw until the frame interval has elapsed.
struct FramePacer {
    interval: Option<Duration>,
    next_deadline: Option<Instant>,
}

impl FramePacer {
    fn new(target_fps: Option<f32>) -> Self {
        let interval = target_fps.and_then(|fps| {
            if fps > 0.0 {
                Some(Duration::from_secs_f32(1.0 / fps))
            } else {
                None
            }
        });
        Self {
            interval,
            next_deadline: None,
        }
    }

    fn ready_for_frame(&self, now: Instant) -> bool {
        match self.next_deadline {
            Some(deadline) => now >= deadline,
            None => true,
        }
    }

    fn mark_rendered(&mut self, now: Instant) {
        if let Some(interval) = self.interval {
            self.next_deadline = Some(now + interval);
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.next_deadline
    }
}

/// Opens the preview window and drives the `winit` event loop.
///
/// The display system invokes the frame driver synchronously on this thread,
/// once per redraw; there is no background rendering. Construction failures
/// (no GPU, shader rejected, unusable avatar) surface here, before the first
/// frame.
pub(crate) fn run(config: &RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let window_size =
        winit::dpi::PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(&config.window_title)
        .with_inner_size(window_size)
        .build(&event_loop)
        .context("failed to create preview window")?;
    let window = Arc::new(window);

    let mut gpu = GpuState::new(window.as_ref(), window.inner_size(), config)?;

    // An unusable avatar leaves the renderer in its silent no-op state; for
    // an interactive session that means a permanently black window, so treat
    // it as a fatal configuration error before entering the loop.
    if let Some(reason) = gpu.unavailable_reason() {
        return Err(anyhow!("avatar asset is unusable: {reason}"));
    }

    let mut pacer = FramePacer::new(config.target_fps);
    window.request_redraw();

    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                elwt.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
            }
            WindowEvent::ScaleFactorChanged {
                mut inner_size_writer,
                ..
            } => {
                let _ = inner_size_writer.request_inner_size(gpu.size());
            }
            WindowEvent::RedrawRequested => match gpu.render() {
                Ok(()) => {
                    pacer.mark_rendered(Instant::now());
                }
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    gpu.resize(gpu.size());
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("surface out of memory; exiting preview");
                    elwt.exit();
                }
                Err(err) => {
                    warn!(error = ?err, "surface error; retrying next frame");
                }
            },
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            if pacer.ready_for_frame(now) {
                window.request_redraw();
                elwt.set_control_flow(ControlFlow::Wait);
            } else if let Some(deadline) = pacer.next_deadline() {
                elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
            } else {
                elwt.set_control_flow(ControlFlow::Wait);
            }
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_pacer_is_always_ready() {
        let pacer = FramePacer::new(None);
        assert!(pacer.ready_for_frame(Instant::now()));
        assert!(pacer.next_deadline().is_none());
    }

    #[test]
    fn capped_pacer_waits_out_the_frame_interval() {
        // 8 FPS keeps the interval exactly representable (125ms).
        let mut pacer = FramePacer::new(Some(8.0));
        let start = Instant::now();
        assert!(pacer.ready_for_frame(start));

        pacer.mark_rendered(start);
        assert!(!pacer.ready_for_frame(start + Duration::from_millis(50)));
        assert!(pacer.ready_for_frame(start + Duration::from_millis(125)));
        assert_eq!(pacer.next_deadline(), Some(start + Duration::from_millis(125)));
    }

    #[test]
    fn nonpositive_fps_disables_the_cap() {
        let mut pacer = FramePacer::new(Some(0.0));
        let now = Instant::now();
        pacer.mark_rendered(now);
        assert!(pacer.ready_for_frame(now));
    }
}
