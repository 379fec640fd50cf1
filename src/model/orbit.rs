use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Smallest polar angle we allow; keeps the camera off the up axis.
pub const POLAR_EPS: f32 = 1e-6;

/// Spherical offset of the camera from its orbit target.
///
/// `polar` is measured from +Y, `azimuth` is `atan2(x, z)` so the rest pose
/// of a camera sitting on +Z has azimuth 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub radius: f32,
    pub polar: f32,
    pub azimuth: f32,
}

impl OrbitState {
    pub fn new(radius: f32, polar: f32, azimuth: f32) -> Self {
        Self { radius, polar, azimuth }
    }

    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self {
            radius,
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            azimuth: offset.x.atan2(offset.z),
        }
    }

    pub fn to_offset(&self) -> Vec3 {
        let sin_polar_r = self.polar.sin() * self.radius;
        Vec3::new(
            sin_polar_r * self.azimuth.sin(),
            self.polar.cos() * self.radius,
            sin_polar_r * self.azimuth.cos(),
        )
    }

    /// Clamp the polar angle away from the poles.
    pub fn make_safe(mut self) -> Self {
        self.polar = self.polar.clamp(POLAR_EPS, PI - POLAR_EPS);
        self
    }

    pub fn with_azimuth_offset(mut self, delta: f32) -> Self {
        self.azimuth += delta;
        self
    }

    /// Move both angles a fraction of the way toward `rest`. The azimuth
    /// follows the shorter way around the circle; the radius is untouched.
    pub fn lerp_angles(&self, rest: &OrbitState, factor: f32) -> Self {
        Self {
            radius: self.radius,
            polar: self.polar + (rest.polar - self.polar) * factor,
            azimuth: self.azimuth + wrap_angle(rest.azimuth - self.azimuth) * factor,
        }
    }

    /// |dazimuth| + |dpolar|, azimuth difference taken on the circle.
    pub fn angular_distance(&self, other: &OrbitState) -> f32 {
        wrap_angle(self.azimuth - other.azimuth).abs() + (self.polar - other.polar).abs()
    }
}

/// Map an angle into (-PI, PI].
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}
