//! flying / running / diving
//!
//! Pure per‑step logic: given the agent's sampled body state, the control
//! input and one downward proximity reading, work out the next mode and the
//! orientation / forces / drag the physics body should get.  Nothing here
//! talks to the physics engine; `player.rs` applies the [`MotionIntent`].

use bevy::prelude::*;

use crate::components::{AnimationFlags, ControlInput};
use crate::config::{ConfigError, GameConfig};
use crate::constants::*;

/* ===========================================================
   modes
   =========================================================== */
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocomotionMode {
    #[default]
    Flying,
    Running,
    /// `started_at` is the clock reading (s) when the agent left the surface
    Diving { started_at: f32 },
}

impl LocomotionMode {
    /// One step of the transition table.
    ///
    /// Being near a surface always means running.  Leaving it from a run
    /// always dives first; a dive lasts `dive_duration` and then flies.
    pub fn next(self, near_surface: bool, now: f32, dive_duration: f32) -> Self {
        if near_surface {
            return LocomotionMode::Running;
        }
        match self {
            LocomotionMode::Running => LocomotionMode::Diving { started_at: now },
            LocomotionMode::Diving { started_at } if now - started_at < dive_duration => self,
            LocomotionMode::Diving { .. } | LocomotionMode::Flying => LocomotionMode::Flying,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LocomotionMode::Flying => "flying",
            LocomotionMode::Running => "running",
            LocomotionMode::Diving { .. } => "diving",
        }
    }

    pub fn is_diving(self) -> bool {
        matches!(self, LocomotionMode::Diving { .. })
    }
}

/* ===========================================================
   angle helpers
   =========================================================== */
/// Fold any angle into (−180°, 180°].
///
/// `%` keeps the sign of the dividend, so negative inputs go through
/// `rem_euclid` first.
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// nose up is positive
pub fn pitch_degrees(orientation: Quat) -> f32 {
    let (_, pitch, _) = orientation.to_euler(EulerRot::YXZ);
    normalize_degrees(pitch.to_degrees())
}

pub fn yaw_radians(orientation: Quat) -> f32 {
    orientation.to_euler(EulerRot::YXZ).0
}

/// keep the heading, replace pitch, drop roll
pub fn with_pitch(orientation: Quat, pitch_deg: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, yaw_radians(orientation), pitch_deg.to_radians(), 0.0)
}

/// Yaw about world up, pitch about the body's own x axis.
pub fn steer(
    orientation: Quat,
    yaw_axis: f32,
    pitch_axis: f32,
    yaw_speed: f32,
    pitch_speed: f32,
    dt: f32,
) -> Quat {
    let yaw = (yaw_axis * yaw_speed * dt).to_radians();
    let pitch = (pitch_axis * pitch_speed * dt).to_radians();
    (Quat::from_rotation_y(-yaw) * orientation * Quat::from_rotation_x(pitch)).normalize()
}

/// Open‑loop dive ramp: linear in the elapsed fraction of the dive.
pub fn dive_pitch(elapsed: f32, dive_duration: f32) -> f32 {
    let t = (elapsed / dive_duration).clamp(0.0, 1.0);
    DIVE_START_PITCH + (DIVE_END_PITCH - DIVE_START_PITCH) * t
}

/* ===========================================================
   forces
   =========================================================== */
/// Thrust along ±`forward`.  Cut off once the speed along the thrust
/// direction reaches `max_speed`; thrusting against the motion always works.
pub fn thrust_force(
    forward: Vec3,
    velocity: Vec3,
    thrust_axis: f32,
    magnitude: f32,
    max_speed: f32,
) -> Vec3 {
    if thrust_axis == 0.0 {
        return Vec3::ZERO;
    }
    let direction = forward * thrust_axis.signum();
    if velocity.dot(direction) >= max_speed {
        return Vec3::ZERO;
    }
    direction * magnitude * thrust_axis.abs().min(1.0)
}

/// Friction against whatever part of the velocity is not along `forward`.
pub fn anti_slide_force(velocity: Vec3, forward: Vec3, coefficient: f32) -> Vec3 {
    let along = velocity.project_onto(forward);
    -(velocity - along) * coefficient
}

/* ===========================================================
   state machine
   =========================================================== */
/// body state read once per step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSample {
    pub velocity: Vec3,
    pub orientation: Quat,
}

/// what the physics body should do this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionIntent {
    pub orientation: Quat,
    pub thrust: Vec3,
    pub anti_slide: Vec3,
    pub linear_drag: f32,
    pub gravity_enabled: bool,
    pub animation: AnimationFlags,
}

impl MotionIntent {
    pub fn force(&self) -> Vec3 {
        self.thrust + self.anti_slide
    }
}

#[derive(Component, Debug, Clone)]
pub struct LocomotionStateMachine {
    mode: LocomotionMode,
    dive_duration: f32,
    max_speed: f32,
    thrust_magnitude: f32,
    brake_drag: f32,
    anti_slide_coefficient: f32,
    yaw_speed: f32,
    pitch_speed: f32,
}

impl LocomotionStateMachine {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            mode: LocomotionMode::Flying,
            dive_duration: config.dive_duration,
            max_speed: config.max_speed,
            thrust_magnitude: config.thrust_magnitude,
            brake_drag: config.brake_drag,
            anti_slide_coefficient: config.anti_slide_coefficient,
            yaw_speed: config.yaw_speed,
            pitch_speed: config.pitch_speed,
        })
    }

    pub fn mode(&self) -> LocomotionMode {
        self.mode
    }

    pub fn dive_duration(&self) -> f32 {
        self.dive_duration
    }

    /// Advance the mode only.
    pub fn tick(&mut self, near_surface: bool, now: f32) -> LocomotionMode {
        let next = self.mode.next(near_surface, now, self.dive_duration);
        if std::mem::discriminant(&next) != std::mem::discriminant(&self.mode) {
            info!("locomotion: {} -> {}", self.mode.name(), next.name());
        }
        self.mode = next;
        next
    }

    /// Advance the mode and work out this step's motion.
    pub fn step(
        &mut self,
        sample: &AgentSample,
        input: &ControlInput,
        near_surface: bool,
        now: f32,
        dt: f32,
    ) -> MotionIntent {
        let mode = self.tick(near_surface, now);
        let q = sample.orientation;

        let (orientation, thrust_axis) = match mode {
            LocomotionMode::Flying => (
                steer(q, input.yaw, input.pitch, self.yaw_speed, self.pitch_speed, dt),
                input.thrust,
            ),
            LocomotionMode::Running => {
                let steered = steer(q, input.yaw, input.pitch, self.yaw_speed, self.pitch_speed, dt);
                (with_pitch(steered, RUNNING_PITCH), input.thrust.max(0.0))
            }
            LocomotionMode::Diving { started_at } => (
                with_pitch(q, dive_pitch(now - started_at, self.dive_duration)),
                1.0,
            ),
        };

        let forward = orientation * Vec3::NEG_Z;
        let velocity = sample.velocity;
        let horizontal_speed = Vec3::new(velocity.x, 0.0, velocity.z).length();

        MotionIntent {
            orientation,
            thrust: thrust_force(
                forward,
                velocity,
                thrust_axis,
                self.thrust_magnitude,
                self.max_speed,
            ),
            anti_slide: anti_slide_force(velocity, forward, self.anti_slide_coefficient),
            linear_drag: if input.brake { self.brake_drag } else { DEFAULT_DRAG },
            gravity_enabled: !input.brake,
            animation: AnimationFlags {
                is_running: mode == LocomotionMode::Running,
                is_standing: mode == LocomotionMode::Running && horizontal_speed < STANDING_SPEED,
                is_diving: mode.is_diving(),
            },
        }
    }
}
