use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MockupError, Result};

/// Which flavour of the motion state machine drives the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionProfile {
    /// Sinusoidal swing around the rest pose, eased return after a drag.
    #[default]
    ReturnToRest,
    /// Constant-speed orbit spin that resumes wherever the drag left off.
    ContinuousSpin,
}

/// Tuning for the camera motion controller and the drag controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub profile: MotionProfile,
    /// Peak auto-rotate swing either side of the rest azimuth, in degrees.
    pub max_swing_deg: f32,
    /// Auto-rotate angular frequency in rad/s.
    pub angular_frequency: f32,
    /// Fraction of the remaining distance covered per returning frame.
    pub lerp_factor: f32,
    /// Convergence threshold on |dtheta| + |dphi|, radians.
    pub angle_epsilon: f32,
    /// Convergence threshold on target distance, world units.
    pub distance_epsilon: f32,
    /// Azimuth speed of the continuous spin, rad/s.
    pub spin_speed: f32,
    /// Drag sensitivity multiplier.
    pub rotate_speed: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            profile: MotionProfile::ReturnToRest,
            max_swing_deg: 30.0,
            angular_frequency: 1.0,
            lerp_factor: 0.05,
            angle_epsilon: 0.01,
            distance_epsilon: 0.01,
            // One full orbit every 30 seconds
            spin_speed: std::f32::consts::TAU / 30.0,
            rotate_speed: 1.0,
        }
    }
}

impl MotionConfig {
    pub fn max_swing(&self) -> f32 {
        self.max_swing_deg.to_radians()
    }

    pub fn validate(&self) -> Result<()> {
        // NaN slips past every sign check below, so finiteness comes first
        let fields = [
            ("max_swing_deg", self.max_swing_deg),
            ("angular_frequency", self.angular_frequency),
            ("lerp_factor", self.lerp_factor),
            ("angle_epsilon", self.angle_epsilon),
            ("distance_epsilon", self.distance_epsilon),
            ("spin_speed", self.spin_speed),
            ("rotate_speed", self.rotate_speed),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(MockupError::InvalidConfig(format!("{name} must be finite, got {value}")));
        }

        if !(self.lerp_factor > 0.0 && self.lerp_factor <= 1.0) {
            return Err(MockupError::InvalidConfig(format!(
                "lerp_factor must be in (0, 1], got {}",
                self.lerp_factor
            )));
        }
        if self.angle_epsilon <= 0.0 || self.distance_epsilon <= 0.0 {
            return Err(MockupError::InvalidConfig(
                "convergence epsilons must be positive".to_string(),
            ));
        }
        if self.max_swing_deg < 0.0 {
            return Err(MockupError::InvalidConfig(format!(
                "max_swing_deg must not be negative, got {}",
                self.max_swing_deg
            )));
        }
        Ok(())
    }
}

/// Perspective camera defaults for the mockup scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub eye: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 35.0,
            z_near: 0.1,
            z_far: 100.0,
            eye: [0.0, 0.5, 12.0],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub motion: MotionConfig,
    pub camera: CameraConfig,
}

impl ViewerConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: Self = toml::from_str(src)?;
        config.motion.validate()?;
        Ok(config)
    }

    pub fn from_json_str(src: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(src)?;
        config.motion.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }

    /// Native lookup: `MOCKUP_CONFIG` names a TOML file, otherwise defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        match std::env::var("MOCKUP_CONFIG") {
            Ok(path) => {
                tracing::info!(%path, "loading viewer config");
                Self::load(path)
            }
            Err(_) => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_behaviour() {
        let config = ViewerConfig::default();
        assert_eq!(config.motion.profile, MotionProfile::ReturnToRest);
        assert!((config.motion.max_swing() - 30f32.to_radians()).abs() < 1e-6);
        assert_eq!(config.motion.lerp_factor, 0.05);
        assert_eq!(config.camera.eye, [0.0, 0.5, 12.0]);
        assert!(config.motion.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ViewerConfig::from_toml_str(
            r#"
            [motion]
            profile = "continuous_spin"
            spin_speed = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.motion.profile, MotionProfile::ContinuousSpin);
        assert_eq!(config.motion.spin_speed, 0.5);
        assert_eq!(config.motion.lerp_factor, 0.05);
        assert_eq!(config.camera.fov_y_deg, 35.0);
    }

    #[test]
    fn test_json_config() {
        let config =
            ViewerConfig::from_json_str(r#"{"motion": {"max_swing_deg": 15.0}}"#).unwrap();
        assert_eq!(config.motion.max_swing_deg, 15.0);
        assert_eq!(config.motion.profile, MotionProfile::ReturnToRest);
    }

    #[test]
    fn test_rejects_bad_lerp_factor() {
        let err = ViewerConfig::from_toml_str("[motion]\nlerp_factor = 0.0\n").unwrap_err();
        assert!(matches!(err, MockupError::InvalidConfig(_)));

        let err = ViewerConfig::from_toml_str("[motion]\nlerp_factor = 1.5\n").unwrap_err();
        assert!(matches!(err, MockupError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_non_finite() {
        for src in [
            "[motion]\nangle_epsilon = nan\n",
            "[motion]\ndistance_epsilon = nan\n",
            "[motion]\nmax_swing_deg = nan\n",
            "[motion]\nangular_frequency = inf\n",
            "[motion]\nspin_speed = -inf\n",
        ] {
            let err = ViewerConfig::from_toml_str(src).unwrap_err();
            assert!(matches!(err, MockupError::InvalidConfig(_)), "accepted {src:?}");
        }
    }

    #[test]
    fn test_rejects_unknown_profile() {
        let err = ViewerConfig::from_toml_str("[motion]\nprofile = \"bounce\"\n").unwrap_err();
        assert!(matches!(err, MockupError::ConfigToml(_)));
    }
}
