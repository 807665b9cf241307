use bevy::prelude::*;

use crate::components::{ModelTilt, Player, PlayerCamera};
use crate::config::{ConfigError, GameConfig};
use crate::constants::*;
use crate::locomotion::{pitch_degrees, yaw_radians, LocomotionMode, LocomotionStateMachine};

/* ===========================================================
   easing
   =========================================================== */
/// Bounded linear ease of one scalar.
///
/// Retargeting fixes the increment to `|target − value| / steps`, so the
/// target is reached in exactly `steps` ticks, monotonically and without
/// overshoot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Easer {
    value: f32,
    target: f32,
    step: f32,
    steps: u32,
    remaining: u32,
}

impl Easer {
    pub fn new(value: f32, steps: u32) -> Self {
        Self {
            value,
            target: value,
            step: 0.0,
            steps: steps.max(1),
            remaining: 0,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn retarget(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.target = target;
        self.step = (target - self.value).abs() / self.steps as f32;
        self.remaining = self.steps;
    }

    pub fn tick(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        self.value = if self.remaining == 0 {
            self.target
        } else if self.value < self.target {
            (self.value + self.step).min(self.target)
        } else {
            (self.value - self.step).max(self.target)
        };
        self.value
    }

    pub fn ease_toward(&mut self, target: f32) -> f32 {
        self.retarget(target);
        self.tick()
    }
}

/* ===========================================================
   blender
   =========================================================== */
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraPlacement {
    /// offset in the agent's own frame; optionally re‑aimed at the agent
    Local { offset: Vec3, aim_at_agent: bool },
    /// world offset in a yaw‑only frame around the agent, always aimed at it
    Heading { offset: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOutput {
    pub placement: CameraPlacement,
    /// model pitch (deg) relative to the body
    pub tilt: f32,
}

/// local camera offset for a zoom value; zoom 0 is first person
pub fn zoom_offset(zoom: f32) -> Vec3 {
    Vec3::new(0.0, zoom * CAMERA_RISE, zoom)
}

#[derive(Component, Debug, Clone)]
pub struct CameraBlender {
    zoom: Easer,
    tilt: Easer,
}

impl CameraBlender {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            zoom: Easer::new(FIRST_PERSON_ZOOM, config.zoom_steps),
            tilt: Easer::new(FLYING_TILT, config.tilt_steps),
        })
    }

    pub fn zoom(&self) -> f32 {
        self.zoom.value()
    }

    pub fn tilt(&self) -> f32 {
        self.tilt.value()
    }

    pub fn zoom_target(mode: LocomotionMode) -> f32 {
        match mode {
            LocomotionMode::Flying => FIRST_PERSON_ZOOM,
            _ => THIRD_PERSON_ZOOM,
        }
    }

    pub fn tilt_target(mode: LocomotionMode) -> f32 {
        match mode {
            LocomotionMode::Flying => FLYING_TILT,
            _ => UPRIGHT_TILT,
        }
    }

    pub fn tick(&mut self, mode: LocomotionMode, orientation: Quat) -> CameraOutput {
        let tilt = self.tilt.ease_toward(Self::tilt_target(mode));

        let placement = match mode {
            LocomotionMode::Flying => CameraPlacement::Local {
                offset: zoom_offset(self.zoom.ease_toward(FIRST_PERSON_ZOOM)),
                aim_at_agent: false,
            },
            LocomotionMode::Running => CameraPlacement::Local {
                offset: zoom_offset(self.zoom.ease_toward(THIRD_PERSON_ZOOM)),
                aim_at_agent: true,
            },
            // no easing while diving: hold the running framing until the nose
            // drops past the running latch, then jump to the heading frame
            LocomotionMode::Diving { .. } => {
                if pitch_degrees(orientation) >= RUNNING_PITCH {
                    CameraPlacement::Local {
                        offset: zoom_offset(self.zoom.value()),
                        aim_at_agent: true,
                    }
                } else {
                    CameraPlacement::Heading {
                        offset: Quat::from_rotation_y(yaw_radians(orientation))
                            * DIVE_FRAMING_OFFSET,
                    }
                }
            }
        };

        CameraOutput { placement, tilt }
    }
}

/* ===========================================================
   camera_follow_system
   =========================================================== */
/// Runs in **PostUpdate**, after locomotion has written the body rotation.
pub fn camera_follow_system(
    mut cam_q:    Query<(&mut Transform, &mut CameraBlender), (With<PlayerCamera>, Without<Player>)>,
    mut player_q: Query<(&Transform, &LocomotionStateMachine, &mut ModelTilt), With<Player>>,
) {
    let Ok((mut cam_tf, mut blender))                = cam_q.get_single_mut()    else { return };
    let Ok((player_tf, locomotion, mut model_tilt))  = player_q.get_single_mut() else { return };

    let output = blender.tick(locomotion.mode(), player_tf.rotation);
    model_tilt.0 = output.tilt;

    let target = player_tf.translation;
    match output.placement {
        CameraPlacement::Local { offset, aim_at_agent } => {
            cam_tf.translation = target + player_tf.rotation * offset;
            cam_tf.rotation = player_tf.rotation;
            if aim_at_agent && offset.length_squared() > 1e-4 {
                cam_tf.look_at(target, Vec3::Y);
            }
        }
        CameraPlacement::Heading { offset } => {
            cam_tf.translation = target + offset;
            cam_tf.look_at(target, Vec3::Y);
        }
    }
}
