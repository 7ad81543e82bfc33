//! Opens a window and logs the tracked input state whenever it changes.
//!
//! The tracked surface is a canvas centred in the window, half its size, so
//! positions left of or above it come out negative. Escape quits, losing
//! focus releases stuck pointer buttons.

use std::rc::Rc;

use color_eyre::Result;
use input_state::input::{EventHub, InputCollector, InputSnapshot, InputState, Rect, RectSurface};
use input_state::InputConfig;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

struct Demo {
    window: Option<Window>,
    canvas: Rc<RectSurface>,
    collector: InputCollector,
    input: InputState,
    last_snapshot: InputSnapshot,
}

impl Demo {
    fn new(config: &InputConfig) -> Result<Self> {
        let hub = EventHub::new();
        let canvas = Rc::new(RectSurface::default());
        let surface = hub.add_surface(canvas.clone());
        let input = InputState::from_config(&hub, surface, config)?;

        Ok(Self {
            window: None,
            canvas,
            collector: InputCollector::new(&hub, surface),
            last_snapshot: input.snapshot(),
            input,
        })
    }

    /// Centre the canvas in the window's logical client area
    fn layout_canvas(&self, size: PhysicalSize<u32>, scale_factor: f64) {
        let size: LogicalSize<f64> = size.to_logical(scale_factor);
        let rect = Rect::new(
            size.width / 4.0,
            size.height / 4.0,
            size.width / 2.0,
            size.height / 2.0,
        );
        self.canvas.set_rect(rect);
        info!(?rect, "canvas laid out");
    }

    fn log_changes(&mut self) {
        let snapshot = self.input.snapshot();
        if snapshot != self.last_snapshot {
            info!(
                keys = ?snapshot.keys,
                buttons = ?snapshot.button_codes,
                x = snapshot.position.x,
                y = snapshot.position.y,
                "input changed"
            );
            self.last_snapshot = snapshot;
        }
    }
}

impl ApplicationHandler for Demo {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("Input State Demo")
            .with_inner_size(LogicalSize::new(800.0, 600.0));

        match event_loop.create_window(window_attributes) {
            Ok(window) => {
                let scale_factor = window.scale_factor();
                self.collector.set_scale_factor(scale_factor);
                self.layout_canvas(window.inner_size(), scale_factor);
                self.window = Some(window);
            }
            Err(e) => {
                error!(error = %e, "Failed to create window");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        self.collector.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting");
                self.input.destroy();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.layout_canvas(size, self.collector.scale_factor());
            }
            WindowEvent::Focused(false) => {
                self.input.reset();
            }
            _ => {}
        }

        if self.input.is_key_pressed("Escape") {
            info!("Escape pressed, exiting");
            self.input.destroy();
            event_loop.exit();
        }

        self.log_changes();
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = InputConfig::load_from_env().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using default configuration");
        InputConfig::default()
    });
    info!(profile = %config.profile, policy = ?config.button_policy, "Starting input demo");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut demo = Demo::new(&config)?;
    event_loop.run_app(&mut demo)?;

    Ok(())
}
