use std::sync::Arc;
use std::time::Instant;

use winit::{
    event::*,
    event_loop::EventLoop,
    window::Window,
};

// Import from the library crate
use mockup::{
    logging, utils,
    controller::{self, FrameLoop, InputEvent},
    view::{GpuContext, MockupRenderer},
    MockupError, ViewerConfig,
};

use controller::input::native::mouse_button_to_input;

struct App {
    window: Arc<Window>,
    frame_loop: FrameLoop<MockupRenderer>,
    started: Instant,
    cursor: (f32, f32),
}

impl App {
    async fn new(window: Arc<Window>, config: &ViewerConfig) -> mockup::Result<Self> {
        let size = window.inner_size();
        let gpu = GpuContext::new_native(window.clone()).await?;

        let [w, h, d] = utils::PHONE_SIZE;
        let mesh = utils::create_phone_mesh(w, h, d);
        let renderer = MockupRenderer::new(gpu, &mesh);

        let viewport_width = size.to_logical::<u32>(window.scale_factor()).width;
        let mut frame_loop =
            FrameLoop::new(config, renderer, size.width, size.height).with_display(viewport_width, 1.0);
        match mesh.bounds() {
            Some(bounds) => frame_loop.model_ready(bounds),
            None => tracing::warn!("model has no geometry, camera motion stays idle"),
        }

        Ok(Self {
            window,
            frame_loop,
            started: Instant::now(),
            cursor: (0.0, 0.0),
        })
    }

    /// Translate a window event into viewer input. Returns false for events
    /// the viewer does not consume.
    fn input(&mut self, event: &WindowEvent) -> bool {
        let input = match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = mouse_button_to_input(*button) else { return false };
                match state {
                    ElementState::Pressed => InputEvent::PointerDown { button, x: self.cursor.0, y: self.cursor.1 },
                    ElementState::Released => InputEvent::PointerUp { button },
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                InputEvent::PointerMove { x: self.cursor.0, y: self.cursor.1 }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                InputEvent::MouseWheel { delta_y }
            }
            WindowEvent::Focused(false) => InputEvent::FocusLost,
            // winit reports cursor and surface in physical pixels, so the canvas
            // stays 1:1; only the model fit compares against logical width
            WindowEvent::Resized(size) => InputEvent::Resized {
                width: size.width,
                height: size.height,
                viewport_width: size.to_logical::<u32>(self.window.scale_factor()).width,
                pixel_ratio: 1.0,
            },
            _ => return false,
        };
        self.frame_loop.handle_input(&input);
        true
    }

    fn redraw(&mut self) -> mockup::Result<()> {
        let time = self.started.elapsed().as_secs_f64();
        self.frame_loop.tick(time)
    }
}

fn main() {
    logging::init();

    let config = match ViewerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("failed to load config: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(profile = ?config.motion.profile, "starting mockup viewer");

    let event_loop = EventLoop::new().unwrap();
    let window_attributes = Window::default_attributes()
        .with_title("Mockup")
        .with_transparent(true)
        .with_inner_size(winit::dpi::LogicalSize::new(960, 720));
    let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

    let mut app = match pollster::block_on(App::new(window.clone(), &config)) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("failed to start viewer: {e}");
            std::process::exit(1);
        }
    };

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::RedrawRequested => match app.redraw() {
                            Ok(()) => {}
                            Err(MockupError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                                tracing::error!("GPU out of memory, exiting");
                                elwt.exit();
                            }
                            Err(e) => tracing::error!("frame failed: {e}"),
                        },
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        }
    }).unwrap();
}
