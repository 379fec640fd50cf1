use std::f32::consts::TAU;

use crate::controller::input::{InputEvent, MouseButton};
use crate::controller::motion::InteractionEvent;
use crate::model::{Camera, OrbitState};

/// Drag-to-orbit controls. Left-button drags rotate the camera around its
/// target; zoom and pan are disabled.
pub struct OrbitControls {
    pub rotate_speed: f32,
    viewport_height: f32,
    dragging: bool,
    last_pointer: Option<(f32, f32)>,
}

impl OrbitControls {
    pub fn new(rotate_speed: f32, viewport_height: u32) -> Self {
        Self {
            rotate_speed,
            viewport_height: viewport_height.max(1) as f32,
            dragging: false,
            last_pointer: None,
        }
    }

    pub fn is_dragging(&self) -> bool { self.dragging }

    /// Apply an input event. Returns a start/end notification when a drag
    /// begins or finishes.
    pub fn process_event(&mut self, event: &InputEvent, camera: &mut Camera) -> Option<InteractionEvent> {
        match event {
            InputEvent::PointerDown { button: MouseButton::Left, x, y } => {
                self.last_pointer = Some((*x, *y));
                if self.dragging {
                    return None;
                }
                self.dragging = true;
                Some(InteractionEvent::Start)
            }
            InputEvent::PointerMove { x, y } => {
                if self.dragging {
                    if let Some((lx, ly)) = self.last_pointer {
                        self.apply_rotate(camera, x - lx, y - ly);
                    }
                    self.last_pointer = Some((*x, *y));
                }
                None
            }
            InputEvent::PointerUp { button: MouseButton::Left } | InputEvent::FocusLost => self.end_drag(),
            InputEvent::Resized { height, .. } => {
                self.viewport_height = (*height).max(1) as f32;
                None
            }
            InputEvent::MouseWheel { .. } => {
                tracing::trace!("zoom disabled, wheel ignored");
                None
            }
            _ => None,
        }
    }

    fn end_drag(&mut self) -> Option<InteractionEvent> {
        self.last_pointer = None;
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        Some(InteractionEvent::End)
    }

    /// Rotate around the target by a pointer delta in pixels. A drag across
    /// the full viewport height is one full turn.
    pub fn apply_rotate(&self, camera: &mut Camera, dx: f32, dy: f32) {
        let k = TAU * self.rotate_speed / self.viewport_height;
        let orbit = camera.orbit();
        let rotated = OrbitState {
            azimuth: orbit.azimuth - dx * k,
            polar: orbit.polar - dy * k,
            ..orbit
        }
        .make_safe();
        camera.place_on_orbit(camera.target, &rotated);
    }
}
