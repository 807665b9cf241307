//! castle glider – fly, run and dive over a castle that builds itself
//! around you.
//!
//! The simulation core (`grid`, `castle`, `castle_stream`'s generator,
//! `locomotion`, the blender in `camera`) is plain Rust over `Vec3`/`Quat`;
//! the rest is the Bevy / rapier glue that feeds it and applies its output.

pub mod camera;
pub mod castle;
pub mod castle_stream;
pub mod clouds;
pub mod components;
pub mod config;
pub mod constants;
pub mod grid;
pub mod locomotion;
pub mod player;

use bevy::prelude::*;

use camera::{camera_follow_system, CameraBlender};
use castle_stream::{setup_castle_assets, stream_castle_system, CastleStream, ChunkGenerator};
use clouds::{cloud_follow_system, spawn_clouds};
use locomotion::LocomotionStateMachine;
use player::{
    locomotion_system, model_tilt_system, player_input_system, spawn_player, PlayerRig,
};

pub use config::{ConfigError, GameConfig};

/// Everything the game needs on top of `DefaultPlugins` and the rapier
/// plugin.  Built from a validated [`GameConfig`], so a bad configuration
/// is refused before the app starts.
pub struct CastleGliderPlugin {
    castle: CastleStream,
    rig: PlayerRig,
}

impl CastleGliderPlugin {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            castle: CastleStream(ChunkGenerator::new(&config)?),
            rig: PlayerRig {
                locomotion: LocomotionStateMachine::new(&config)?,
                camera: CameraBlender::new(&config)?,
            },
        })
    }
}

impl Plugin for CastleGliderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.castle.clone())
            .insert_resource(self.rig.clone())
            /* startup ----------------------------------------------------- */
            .add_systems(Startup, (setup_castle_assets, spawn_player, spawn_clouds))
            /* frame update ------------------------------------------------ */
            .add_systems(
                Update,
                (
                    (
                        player_input_system, // keys → ControlInput
                        locomotion_system,   // probe, mode, forces
                    )
                        .chain(),
                    stream_castle_system, // sweep on new player cell
                    cloud_follow_system,
                ),
            );
        add_camera_systems(app);
    }
}

/// Camera blend, then the body tilt it just eased, in the same frame.
fn add_camera_systems(app: &mut App) {
    app.add_systems(PostUpdate, (camera_follow_system, model_tilt_system).chain());
}
