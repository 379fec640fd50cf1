use glam::Vec3;

use mockup::controller::{FrameLoop, InputEvent, MouseButton, SceneRenderer};
use mockup::model::{Camera, ModelBounds, ModelPlacement};
use mockup::{Mode, MotionProfile, Result, ViewerConfig};

#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<Camera>,
    sizes: Vec<(u32, u32)>,
    placements: Vec<f32>,
}

impl SceneRenderer for RecordingRenderer {
    fn render_frame(&mut self, camera: &Camera) -> Result<()> {
        self.frames.push(camera.clone());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.sizes.push((width, height));
    }

    fn place_model(&mut self, placement: &ModelPlacement) {
        self.placements.push(placement.scale);
    }
}

fn phone_bounds() -> ModelBounds {
    ModelBounds::new(Vec3::new(-0.4, -0.8, -0.05), Vec3::new(0.4, 0.8, 0.05))
}

fn new_loop(profile: MotionProfile) -> FrameLoop<RecordingRenderer> {
    let mut config = ViewerConfig::default();
    config.motion.profile = profile;
    FrameLoop::new(&config, RecordingRenderer::default(), 1280, 720)
}

fn drag(frame_loop: &mut FrameLoop<RecordingRenderer>, dx: f32) {
    frame_loop.handle_input(&InputEvent::PointerDown { button: MouseButton::Left, x: 100.0, y: 100.0 });
    frame_loop.handle_input(&InputEvent::PointerMove { x: 100.0 + dx, y: 100.0 });
    frame_loop.handle_input(&InputEvent::PointerUp { button: MouseButton::Left });
}

#[test]
fn test_renders_every_tick_even_before_model_ready() {
    let mut frame_loop = new_loop(MotionProfile::ReturnToRest);
    let start = frame_loop.camera.clone();

    for frame in 0..5 {
        frame_loop.tick(frame as f64 / 60.0).unwrap();
    }

    let frames = &frame_loop.renderer.frames;
    assert_eq!(frames.len(), 5);
    assert!(frames.iter().all(|cam| *cam == start));
}

#[test]
fn test_model_ready_aims_at_model_centre() {
    let mut frame_loop = new_loop(MotionProfile::ReturnToRest);
    frame_loop.model_ready(phone_bounds());

    assert_eq!(frame_loop.camera.target, Vec3::ZERO);
    assert!(frame_loop.motion.is_ready());
    let rest = frame_loop.motion.initial_orbit().unwrap();
    assert!((rest.radius - (0.5f32 * 0.5 + 12.0 * 12.0).sqrt()).abs() < 1e-4);

    // Desktop fit: 1.6 tall model scaled to 5 units
    assert_eq!(frame_loop.renderer.placements.len(), 1);
    assert!((frame_loop.renderer.placements[0] - 5.0 / 1.6).abs() < 1e-5);
}

#[test]
fn test_update_runs_before_render() {
    let mut frame_loop = new_loop(MotionProfile::ReturnToRest);
    frame_loop.model_ready(phone_bounds());

    let t = std::f64::consts::FRAC_PI_2;
    frame_loop.tick(t).unwrap();

    // The rendered camera already carries the full +30 degree swing
    let rendered = frame_loop.renderer.frames.last().unwrap();
    let rest = frame_loop.motion.initial_orbit().unwrap();
    let swing = rendered.orbit().azimuth - rest.azimuth;
    assert!((swing - 30f32.to_radians()).abs() < 1e-4);
}

#[test]
fn test_drag_then_return_to_rest() {
    let mut frame_loop = new_loop(MotionProfile::ReturnToRest);
    frame_loop.model_ready(phone_bounds());
    frame_loop.tick(0.0).unwrap();

    drag(&mut frame_loop, 120.0);
    assert_eq!(frame_loop.motion.mode(), Mode::Returning);
    let dragged = frame_loop.camera.orbit().azimuth;
    assert!(dragged < -0.5);

    let mut frame = 1;
    while frame_loop.motion.mode() == Mode::Returning {
        frame_loop.tick(frame as f64 / 60.0).unwrap();
        frame += 1;
        assert!(frame < 600, "camera never came back to rest");
    }

    let rest = frame_loop.motion.initial_orbit().unwrap();
    assert!(frame_loop.camera.orbit().angular_distance(&rest) < 0.011);
    assert_eq!(frame_loop.camera.target, Vec3::ZERO);
    assert_eq!(frame_loop.motion.mode(), Mode::AutoRotating);
}

#[test]
fn test_press_during_return_freezes_camera() {
    let mut frame_loop = new_loop(MotionProfile::ReturnToRest);
    frame_loop.model_ready(phone_bounds());
    drag(&mut frame_loop, 200.0);

    for frame in 0..5 {
        frame_loop.tick(frame as f64 / 60.0).unwrap();
    }
    frame_loop.handle_input(&InputEvent::PointerDown { button: MouseButton::Left, x: 0.0, y: 0.0 });
    assert_eq!(frame_loop.motion.mode(), Mode::UserDragging);

    let held = frame_loop.camera.clone();
    for frame in 5..30 {
        frame_loop.tick(frame as f64 / 60.0).unwrap();
    }
    assert_eq!(frame_loop.camera, held);
}

#[test]
fn test_continuous_spin_resumes_from_drag_position() {
    let mut frame_loop = new_loop(MotionProfile::ContinuousSpin);
    frame_loop.model_ready(phone_bounds());
    frame_loop.tick(0.0).unwrap();

    drag(&mut frame_loop, 120.0);
    assert_eq!(frame_loop.motion.mode(), Mode::AutoRotating);
    let dragged = frame_loop.camera.orbit().azimuth;

    frame_loop.tick(0.016).unwrap();
    let spun = frame_loop.camera.orbit().azimuth;
    let expected = frame_loop.motion.config().spin_speed * 0.016;
    assert!((spun - dragged - expected).abs() < 1e-4);
}

fn resized(width: u32, height: u32, viewport_width: u32, pixel_ratio: f32) -> InputEvent {
    InputEvent::Resized { width, height, viewport_width, pixel_ratio }
}

#[test]
fn test_resize_refits_model_and_renderer() {
    let mut frame_loop = new_loop(MotionProfile::ReturnToRest);
    frame_loop.model_ready(phone_bounds());

    frame_loop.handle_input(&resized(600, 900, 600, 1.0));
    assert_eq!(frame_loop.renderer.sizes, vec![(600, 900)]);
    assert!((frame_loop.camera.aspect - 600.0 / 900.0).abs() < 1e-6);

    // Mobile fit below the breakpoint
    let scale = *frame_loop.renderer.placements.last().unwrap();
    assert!((scale - 3.8 / 1.6).abs() < 1e-5);
    assert_eq!(frame_loop.placement().unwrap().scale, scale);

    // Zero-sized resizes are ignored
    frame_loop.handle_input(&resized(0, 0, 0, 1.0));
    assert_eq!(frame_loop.renderer.sizes.len(), 1);
}

#[test]
fn test_model_fit_follows_window_not_canvas() {
    // A narrow mockup column on a wide desktop page
    let mut frame_loop = FrameLoop::new(&ViewerConfig::default(), RecordingRenderer::default(), 500, 700)
        .with_display(1440, 1.0);
    frame_loop.model_ready(phone_bounds());
    assert!((frame_loop.placement().unwrap().scale - 5.0 / 1.6).abs() < 1e-5);

    // The column shrinks further but the window stays wide
    frame_loop.handle_input(&resized(400, 700, 1440, 1.0));
    assert!((frame_loop.placement().unwrap().scale - 5.0 / 1.6).abs() < 1e-5);
    assert_eq!(frame_loop.renderer.placements.len(), 1);

    // The window itself crosses the breakpoint
    frame_loop.handle_input(&resized(400, 700, 768, 1.0));
    assert_eq!(frame_loop.viewport_width(), 768);
    assert!((frame_loop.placement().unwrap().scale - 3.8 / 1.6).abs() < 1e-5);
    assert_eq!(frame_loop.renderer.placements.len(), 2);
}

#[test]
fn test_pixel_ratio_scales_buffer_not_rotation() {
    let mut frame_loop = new_loop(MotionProfile::ReturnToRest);
    frame_loop.model_ready(phone_bounds());

    frame_loop.handle_input(&resized(400, 800, 400, 2.0));
    assert_eq!(frame_loop.renderer.sizes, vec![(800, 1600)]);
    assert_eq!(frame_loop.pixel_ratio(), 2.0);
    assert!((frame_loop.camera.aspect - 0.5).abs() < 1e-6);

    // Rotation stays in CSS pixels: a quarter of the height is a quarter turn
    let before = frame_loop.camera.orbit().azimuth;
    frame_loop.handle_input(&InputEvent::PointerDown { button: MouseButton::Left, x: 0.0, y: 0.0 });
    frame_loop.handle_input(&InputEvent::PointerMove { x: 200.0, y: 0.0 });
    let turned = mockup::model::wrap_angle(frame_loop.camera.orbit().azimuth - before);
    assert!((turned + std::f32::consts::FRAC_PI_2).abs() < 1e-3);

    // Bogus ratios fall back to 1:1
    frame_loop.handle_input(&resized(400, 800, 400, f32::NAN));
    assert_eq!(frame_loop.renderer.sizes.last(), Some(&(400, 800)));
}

#[test]
fn test_cancelled_touch_drag_still_returns() {
    let mut frame_loop = new_loop(MotionProfile::ReturnToRest);
    frame_loop.model_ready(phone_bounds());

    frame_loop.handle_input(&InputEvent::PointerDown { button: MouseButton::Left, x: 50.0, y: 50.0 });
    frame_loop.handle_input(&InputEvent::PointerMove { x: 120.0, y: 50.0 });
    assert_eq!(frame_loop.motion.mode(), Mode::UserDragging);

    // A cancelled pointer is delivered as focus loss
    frame_loop.handle_input(&InputEvent::FocusLost);
    assert_eq!(frame_loop.motion.mode(), Mode::Returning);
    assert!(!frame_loop.controls.is_dragging());
}
