use glam::{Mat4, Vec3};

use crate::config::CameraConfig;
use crate::model::OrbitState;

/// Perspective camera that always looks at an orbit target.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32, config: &CameraConfig) -> Self {
        Self {
            eye: Vec3::from_array(config.eye),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: config.fov_y_deg.to_radians(),
            aspect: aspect_ratio(width, height),
            z_near: config.z_near,
            z_far: config.z_far,
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) { self.aspect = aspect_ratio(width, height); }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * view
    }

    pub fn look_at(&mut self, target: Vec3) { self.target = target; }

    pub fn offset(&self) -> Vec3 { self.eye - self.target }

    /// Spherical offset of the eye around the current target
    pub fn orbit(&self) -> OrbitState { OrbitState::from_offset(self.offset()) }

    /// Place the eye on `orbit` around `center` and look at `center`.
    pub fn place_on_orbit(&mut self, center: Vec3, orbit: &OrbitState) {
        self.eye = center + orbit.to_offset();
        self.look_at(center);
    }
}

// Zero-sized surfaces show up while a window is minimised
fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_on_orbit_round_trips() {
        let mut cam = Camera::new(800, 600, &CameraConfig::default());
        let center = Vec3::new(1.0, -2.0, 0.5);
        let orbit = OrbitState::new(12.0, 1.5, 0.4);
        cam.place_on_orbit(center, &orbit);

        assert_eq!(cam.target, center);
        let back = cam.orbit();
        assert!((back.radius - 12.0).abs() < 1e-4);
        assert!((back.polar - 1.5).abs() < 1e-4);
        assert!((back.azimuth - 0.4).abs() < 1e-4);
    }

    #[test]
    fn test_zero_height_does_not_divide_by_zero() {
        let mut cam = Camera::new(800, 0, &CameraConfig::default());
        assert!(cam.aspect.is_finite());
        cam.set_aspect(0, 0);
        assert_eq!(cam.aspect, 1.0);
    }
}
