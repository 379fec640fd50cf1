use glam::Vec3;

use crate::config::{MotionConfig, MotionProfile};
use crate::model::{Camera, OrbitState};

/// Largest time step the spin profile will integrate in one frame, seconds.
pub const MAX_FRAME_DT: f64 = 0.1;

/// Who owns the camera this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    AutoRotating,
    UserDragging,
    Returning,
}

/// Inputs to the mode machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    DragStart,
    DragEnd,
    Converged,
}

/// Drag notifications coming from the orbit controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    Start,
    End,
}

impl From<InteractionEvent> for MotionEvent {
    fn from(event: InteractionEvent) -> Self {
        match event {
            InteractionEvent::Start => MotionEvent::DragStart,
            InteractionEvent::End => MotionEvent::DragEnd,
        }
    }
}

impl Mode {
    /// Transition function. Pairs without an edge keep the current mode.
    pub fn next(self, event: MotionEvent, profile: MotionProfile) -> Mode {
        match (self, event) {
            (Mode::AutoRotating | Mode::Returning, MotionEvent::DragStart) => Mode::UserDragging,
            (Mode::UserDragging, MotionEvent::DragEnd) => match profile {
                MotionProfile::ReturnToRest => Mode::Returning,
                MotionProfile::ContinuousSpin => Mode::AutoRotating,
            },
            (Mode::Returning, MotionEvent::Converged) => Mode::AutoRotating,
            (mode, _) => mode,
        }
    }
}

/// Rest pose captured when the model becomes ready.
#[derive(Debug, Clone, Copy)]
struct RestPose {
    initial_orbit: OrbitState,
    initial_target: Vec3,
    current_orbit: OrbitState,
}

/// Drives the camera between auto-rotation, user drags and the eased
/// return to the rest pose.
///
/// The camera's `target` is the live orbit target shared with the orbit
/// controls; the controller only writes the camera while it owns it
/// (auto-rotating or returning). Until [`MotionController::on_model_ready`]
/// has been called every update is a no-op.
pub struct MotionController {
    config: MotionConfig,
    mode: Mode,
    rest: Option<RestPose>,
    last_time: Option<f64>,
}

impl MotionController {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            mode: Mode::AutoRotating,
            rest: None,
            last_time: None,
        }
    }

    pub fn mode(&self) -> Mode { self.mode }

    pub fn config(&self) -> &MotionConfig { &self.config }

    pub fn is_ready(&self) -> bool { self.rest.is_some() }

    pub fn initial_orbit(&self) -> Option<OrbitState> { self.rest.map(|r| r.initial_orbit) }

    pub fn initial_target(&self) -> Option<Vec3> { self.rest.map(|r| r.initial_target) }

    pub fn current_orbit(&self) -> Option<OrbitState> { self.rest.map(|r| r.current_orbit) }

    /// Seed the rest pose. Only the first call counts.
    pub fn on_model_ready(&mut self, target: Vec3, camera_offset: Vec3) {
        if self.rest.is_some() {
            tracing::warn!("model ready signalled twice, keeping the first rest pose");
            return;
        }
        let initial_orbit = OrbitState::from_offset(camera_offset).make_safe();
        self.rest = Some(RestPose {
            initial_orbit,
            initial_target: target,
            current_orbit: initial_orbit,
        });
        if self.mode != Mode::UserDragging {
            self.mode = Mode::AutoRotating;
        }
        tracing::info!(
            radius = initial_orbit.radius,
            polar = initial_orbit.polar,
            azimuth = initial_orbit.azimuth,
            ?target,
            "rest pose captured"
        );
    }

    pub fn handle(&mut self, event: InteractionEvent) {
        self.transition(event.into());
    }

    fn transition(&mut self, event: MotionEvent) {
        let next = self.mode.next(event, self.config.profile);
        if next == self.mode {
            tracing::trace!(?event, mode = ?self.mode, "event ignored");
            return;
        }
        tracing::debug!(?event, from = ?self.mode, to = ?next, "motion mode change");
        self.mode = next;
    }

    /// Advance one frame. `time` is elapsed seconds from the render loop.
    pub fn update(&mut self, time: f64, camera: &mut Camera) {
        let dt = self
            .last_time
            .map(|last| (time - last).clamp(0.0, MAX_FRAME_DT))
            .unwrap_or(0.0) as f32;
        self.last_time = Some(time);

        let Some(rest) = self.rest.as_mut() else { return };

        match (self.mode, self.config.profile) {
            (Mode::AutoRotating, MotionProfile::ReturnToRest) => {
                let orbit = rest.initial_orbit.with_azimuth_offset(swing_offset(&self.config, time));
                camera.place_on_orbit(rest.initial_target, &orbit);
            }
            (Mode::AutoRotating, MotionProfile::ContinuousSpin) => {
                let orbit = camera.orbit().with_azimuth_offset(self.config.spin_speed * dt).make_safe();
                camera.place_on_orbit(camera.target, &orbit);
            }
            (Mode::UserDragging, _) => {}
            (Mode::Returning, _) => {
                if step_return(rest, &self.config, camera) {
                    tracing::info!("camera back at rest pose");
                    self.transition(MotionEvent::Converged);
                }
            }
        }
    }
}

/// Auto-rotate azimuth offset at `time` seconds: `A * sin(w * t)`.
pub fn swing_offset(config: &MotionConfig, time: f64) -> f32 {
    let phase = config.angular_frequency as f64 * time;
    (config.max_swing() as f64 * phase.sin()) as f32
}

/// One eased step back toward the rest pose. Returns true once converged,
/// with the target snapped exactly onto the rest target.
fn step_return(rest: &mut RestPose, config: &MotionConfig, camera: &mut Camera) -> bool {
    let factor = config.lerp_factor;
    let target = camera.target;

    rest.current_orbit = camera.orbit().lerp_angles(&rest.initial_orbit, factor).make_safe();
    camera.place_on_orbit(target, &rest.current_orbit);
    camera.look_at(target.lerp(rest.initial_target, factor));

    let converged = rest.current_orbit.angular_distance(&rest.initial_orbit) < config.angle_epsilon
        && camera.target.distance(rest.initial_target) < config.distance_epsilon;
    if converged {
        camera.look_at(rest.initial_target);
    }
    converged
}
