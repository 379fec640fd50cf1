/// Platform-agnostic input events for the mockup canvas
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    // Pointer events, positions in CSS/logical pixels
    PointerDown { button: MouseButton, x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { button: MouseButton },
    MouseWheel { delta_y: f32 },

    // Window events
    FocusLost,
    /// Canvas size in logical pixels. `viewport_width` is the width of the
    /// whole window and decides the model fit; `pixel_ratio` maps logical
    /// pixels to the drawing buffer.
    Resized { width: u32, height: u32, viewport_width: u32, pixel_ratio: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// DOM `button` code. Back/forward and other extra buttons map to None.
    pub fn from_web_button(button: i16) -> Option<Self> {
        match button {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::*;
    use web_sys::PointerEvent;

    // Pointer events cover mouse, pen and touch; touch and pen report button 0
    pub fn pointer_down_to_input(e: &PointerEvent) -> Option<InputEvent> {
        Some(InputEvent::PointerDown {
            button: MouseButton::from_web_button(e.button())?,
            x: e.client_x() as f32,
            y: e.client_y() as f32,
        })
    }

    pub fn pointer_move_to_input(e: &PointerEvent) -> InputEvent {
        InputEvent::PointerMove { x: e.client_x() as f32, y: e.client_y() as f32 }
    }

    pub fn pointer_up_to_input(e: &PointerEvent) -> Option<InputEvent> {
        Some(InputEvent::PointerUp { button: MouseButton::from_web_button(e.button())? })
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod native {
    use super::*;

    pub fn mouse_button_to_input(button: winit::event::MouseButton) -> Option<MouseButton> {
        match button {
            winit::event::MouseButton::Left => Some(MouseButton::Left),
            winit::event::MouseButton::Right => Some(MouseButton::Right),
            winit::event::MouseButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }
}
