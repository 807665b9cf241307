//! run‑time tunables injected at construction
//!
//! Everything the core needs that a level designer might want to tweak is
//! collected here; structural dimensions stay in `constants.rs`.

use crate::constants::*;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("cell size must be positive, got {0}")]
    CellSize(f32),
    #[error("neighborhood radius must be within 0..={max}, got {0}", max = MAX_NEIGHBORHOOD_RADIUS)]
    NeighborhoodRadius(i32),
    #[error("dive duration must be positive, got {0}s")]
    DiveDuration(f32),
    #[error("max speed must be positive, got {0}")]
    MaxSpeed(f32),
    #[error("{0} steps must be at least 1")]
    ZeroSteps(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// edge length of one castle cell (world units)
    pub cell_size: f32,
    /// cells scanned on each side of the agent per sweep
    pub neighborhood_radius: i32,
    /// seconds
    pub dive_duration: f32,
    pub max_speed: f32,
    pub thrust_magnitude: f32,
    pub brake_drag: f32,
    pub anti_slide_coefficient: f32,
    /// deg / s at full axis deflection
    pub yaw_speed: f32,
    pub pitch_speed: f32,
    pub zoom_steps: u32,
    pub tilt_steps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: CELL_SIZE,
            neighborhood_radius: NUM_CELLS_FROM_PLAYER,
            dive_duration: DIVE_DURATION,
            max_speed: MAX_SPEED,
            thrust_magnitude: THRUST_MAGNITUDE,
            brake_drag: BRAKE_DRAG,
            anti_slide_coefficient: ANTI_SLIDE_COEFFICIENT,
            yaw_speed: YAW_SPEED,
            pitch_speed: PITCH_SPEED,
            zoom_steps: ZOOM_STEPS,
            tilt_steps: TILT_STEPS,
        }
    }
}

impl GameConfig {
    /// Reject configurations the simulation cannot run with.
    ///
    /// Comparisons are written so that NaN fails them too.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        if !(0..=MAX_NEIGHBORHOOD_RADIUS).contains(&self.neighborhood_radius) {
            return Err(ConfigError::NeighborhoodRadius(self.neighborhood_radius));
        }
        if !(self.dive_duration > 0.0) {
            return Err(ConfigError::DiveDuration(self.dive_duration));
        }
        if !(self.max_speed > 0.0) {
            return Err(ConfigError::MaxSpeed(self.max_speed));
        }
        if self.zoom_steps == 0 {
            return Err(ConfigError::ZeroSteps("zoom"));
        }
        if self.tilt_steps == 0 {
            return Err(ConfigError::ZeroSteps("tilt"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::default;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn degenerate_values_are_rejected() {
        let cfg = GameConfig { cell_size: 0.0, ..default() };
        assert_eq!(cfg.validate(), Err(ConfigError::CellSize(0.0)));

        let cfg = GameConfig { neighborhood_radius: -1, ..default() };
        assert_eq!(cfg.validate(), Err(ConfigError::NeighborhoodRadius(-1)));

        let cfg = GameConfig { dive_duration: -0.5, ..default() };
        assert_eq!(cfg.validate(), Err(ConfigError::DiveDuration(-0.5)));

        let cfg = GameConfig { tilt_steps: 0, ..default() };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroSteps("tilt")));
    }

    #[test]
    fn nan_cell_size_is_rejected() {
        let cfg = GameConfig { cell_size: f32::NAN, ..default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::CellSize(_))));
    }

    #[test]
    fn huge_radius_is_rejected() {
        let cfg = GameConfig { neighborhood_radius: MAX_NEIGHBORHOOD_RADIUS, ..default() };
        assert!(cfg.validate().is_ok());
        for radius in [MAX_NEIGHBORHOOD_RADIUS + 1, 23_170, i32::MAX] {
            let cfg = GameConfig { neighborhood_radius: radius, ..default() };
            assert_eq!(cfg.validate(), Err(ConfigError::NeighborhoodRadius(radius)));
        }
    }

    #[test]
    fn zero_radius_is_allowed() {
        let cfg = GameConfig { neighborhood_radius: 0, ..default() };
        assert!(cfg.validate().is_ok());
    }
}
