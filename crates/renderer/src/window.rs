//! Windowed event loop: input tracking, redraw scheduling, and the surface
//! error ladder.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::gpu::GpuState;
use crate::host::ImageHost;
use crate::types::{RenderPolicy, RendererConfig};

/// How often the reactive loop wakes to poll for load completions while
/// images are still outstanding.
const LOAD_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Last observed pointer position, in physical surface pixels.
///
/// Until the pointer first enters the surface the uniform reports the
/// surface center, which both distortion modes treat as "no distortion".
#[derive(Debug, Default, Clone, Copy)]
struct MouseState {
    position: Option<PhysicalPosition<f64>>,
}

impl MouseState {
    fn as_uniform(&self, size: PhysicalSize<u32>) -> [f32; 2] {
        match self.position {
            Some(position) => [position.x as f32, position.y as f32],
            None => [size.width as f32 * 0.5, size.height as f32 * 0.5],
        }
    }
}

/// Runs the renderer inside a desktop window until it is closed.
pub(crate) fn run_windowed(config: RendererConfig, mut host: Box<dyn ImageHost>) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let (width, height) = config.surface_size;
    let window = WindowBuilder::new()
        .with_title("photowall")
        .with_inner_size(PhysicalSize::new(width.max(1), height.max(1)))
        .build(&event_loop)
        .context("failed to create window")?;

    let mut state = GpuState::new(&window, &config, host.image_count())?;
    let policy = config.policy;
    let mut mouse = MouseState::default();

    event_loop
        .run(move |event, elwt| {
            // Load completions arrive on a channel with no waker of its own,
            // so the reactive loop keeps a coarse timer alive until every
            // image has resolved, then sleeps for input like continuous mode.
            let outstanding = state.resolved_count() < host.image_count();
            elwt.set_control_flow(
                if policy == RenderPolicy::Reactive && outstanding {
                    ControlFlow::WaitUntil(Instant::now() + LOAD_POLL_INTERVAL)
                } else {
                    ControlFlow::Wait
                },
            );
            match event {
                Event::WindowEvent { event, window_id } if window_id == window.id() => {
                    match event {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                            tracing::info!("window closed; shutting down");
                            elwt.exit();
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            mouse.position = Some(position);
                            if policy == RenderPolicy::Reactive {
                                window.request_redraw();
                            }
                        }
                        WindowEvent::Resized(new_size) => {
                            state.resize(new_size);
                            if policy == RenderPolicy::Reactive {
                                window.request_redraw();
                            }
                        }
                        WindowEvent::ScaleFactorChanged { .. } => {
                            // The compositor follows up with a Resized carrying
                            // the new physical size; nothing to do here.
                        }
                        WindowEvent::RedrawRequested => {
                            state.pump(host.as_mut());
                            let pointer = mouse.as_uniform(state.size());
                            match state.render_frame(host.as_ref(), pointer) {
                                Ok(()) => {}
                                Err(
                                    wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                                ) => {
                                    let size = state.size();
                                    state.resize(size);
                                }
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    tracing::error!("GPU out of memory; exiting");
                                    elwt.exit();
                                }
                                Err(err) => {
                                    tracing::warn!(error = %err, "frame skipped");
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    match policy {
                        // Continuous mode re-arms exactly one successor tick
                        // per presented frame.
                        RenderPolicy::Continuous => window.request_redraw(),
                        // Reactive mode waits for invalidation, but a load
                        // completion is itself an invalidation: a freshly
                        // promoted image must reach the screen without
                        // pointer or resize stimulus.
                        RenderPolicy::Reactive => {
                            if state.pump(host.as_mut()) > 0 {
                                window.request_redraw();
                            }
                        }
                    }
                }
                _ => {}
            }
        })
        .context("event loop terminated abnormally")?;

    Ok(())
}
