use crate::config::ViewerConfig;
use crate::controller::input::InputEvent;
use crate::controller::{MotionController, OrbitControls};
use crate::error::Result;
use crate::model::{Camera, ModelBounds, ModelPlacement};

/// The drawing side of the viewer. The frame loop hands it the camera after
/// motion has been advanced for the tick.
pub trait SceneRenderer {
    fn render_frame(&mut self, camera: &Camera) -> Result<()>;

    /// New drawing buffer size in physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// The model was (re)placed in the scene.
    fn place_model(&mut self, _placement: &ModelPlacement) {}
}

/// Per-tick driver: input routing, motion update, then render.
pub struct FrameLoop<R: SceneRenderer> {
    pub camera: Camera,
    pub motion: MotionController,
    pub controls: OrbitControls,
    pub renderer: R,
    placement: Option<ModelPlacement>,
    viewport_width: u32,
    pixel_ratio: f32,
}

impl<R: SceneRenderer> FrameLoop<R> {
    /// `width` and `height` are the canvas size in logical pixels. The window
    /// is assumed to be the canvas until `with_display` says otherwise.
    pub fn new(config: &ViewerConfig, renderer: R, width: u32, height: u32) -> Self {
        Self {
            camera: Camera::new(width, height, &config.camera),
            motion: MotionController::new(config.motion.clone()),
            controls: OrbitControls::new(config.motion.rotate_speed, height),
            renderer,
            placement: None,
            viewport_width: width,
            pixel_ratio: 1.0,
        }
    }

    /// Window width for the model fit, and the logical-to-buffer pixel ratio
    /// the renderer was created with.
    pub fn with_display(mut self, viewport_width: u32, pixel_ratio: f32) -> Self {
        self.viewport_width = viewport_width;
        self.pixel_ratio = sanitize_ratio(pixel_ratio);
        self
    }

    pub fn viewport_width(&self) -> u32 { self.viewport_width }

    pub fn pixel_ratio(&self) -> f32 { self.pixel_ratio }

    pub fn placement(&self) -> Option<&ModelPlacement> { self.placement.as_ref() }

    /// Called once the model asset is available: place it, aim the camera at
    /// its centre and capture the rest pose.
    pub fn model_ready(&mut self, bounds: ModelBounds) {
        let placement = ModelPlacement::new(bounds, self.viewport_width);
        let target = placement.orbit_target();
        self.renderer.place_model(&placement);
        self.camera.look_at(target);
        self.motion.on_model_ready(target, self.camera.offset());
        self.placement = Some(placement);
    }

    pub fn handle_input(&mut self, event: &InputEvent) {
        if let InputEvent::Resized { width, height, viewport_width, pixel_ratio } = event {
            self.resize(*width, *height, *viewport_width, *pixel_ratio);
        }
        if let Some(interaction) = self.controls.process_event(event, &mut self.camera) {
            self.motion.handle(interaction);
        }
    }

    fn resize(&mut self, width: u32, height: u32, viewport_width: u32, pixel_ratio: f32) {
        if width == 0 || height == 0 {
            return;
        }
        self.pixel_ratio = sanitize_ratio(pixel_ratio);
        self.camera.set_aspect(width, height);
        let (buffer_w, buffer_h) = (self.to_buffer_px(width), self.to_buffer_px(height));
        self.renderer.resize(buffer_w, buffer_h);

        if viewport_width > 0 && viewport_width != self.viewport_width {
            self.viewport_width = viewport_width;
            if let Some(placement) = self.placement.as_mut() {
                placement.refit(viewport_width);
                self.renderer.place_model(placement);
            }
        }
    }

    fn to_buffer_px(&self, logical: u32) -> u32 {
        ((logical as f32 * self.pixel_ratio).round() as u32).max(1)
    }

    /// One animation tick; `time` is elapsed seconds.
    pub fn tick(&mut self, time: f64) -> Result<()> {
        self.motion.update(time, &mut self.camera);
        self.renderer.render_frame(&self.camera)
    }
}

fn sanitize_ratio(ratio: f32) -> f32 {
    if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 }
}
