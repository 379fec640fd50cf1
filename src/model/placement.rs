use glam::{Mat4, Quat, Vec3};
use std::f32::consts::PI;

/// Viewports at or below this width get the smaller model scale.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;
const MOBILE_FIT_SIZE: f32 = 3.8;
const DESKTOP_FIT_SIZE: f32 = 5.0;

/// Axis-aligned bounds of the loaded model in its own space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl ModelBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self { Self { min, max } }

    pub fn center(&self) -> Vec3 { (self.min + self.max) * 0.5 }

    pub fn size(&self) -> Vec3 { self.max - self.min }

    pub fn max_dim(&self) -> f32 { self.size().max_element() }
}

/// How the model sits in the scene: centred on the origin, scaled so its
/// largest side fits the viewport class, turned to face the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPlacement {
    pub bounds: ModelBounds,
    pub scale: f32,
    pub yaw: f32,
}

impl ModelPlacement {
    pub fn new(bounds: ModelBounds, viewport_width: u32) -> Self {
        Self {
            bounds,
            scale: fit_scale(viewport_width, bounds.max_dim()),
            yaw: PI,
        }
    }

    /// Re-fit after a viewport resize
    pub fn refit(&mut self, viewport_width: u32) {
        self.scale = fit_scale(viewport_width, self.bounds.max_dim());
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.yaw),
            Vec3::ZERO,
        ) * Mat4::from_translation(-self.bounds.center())
    }

    /// World-space point the camera orbits: the centre of the placed model.
    pub fn orbit_target(&self) -> Vec3 {
        self.model_matrix().transform_point3(self.bounds.center())
    }
}

pub fn fit_scale(viewport_width: u32, max_dim: f32) -> f32 {
    let fit = if viewport_width <= MOBILE_BREAKPOINT_PX { MOBILE_FIT_SIZE } else { DESKTOP_FIT_SIZE };
    if max_dim > 0.0 { fit / max_dim } else { fit }
}
