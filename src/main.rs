//! bootstrap for the castle glider prototype
//!
//! Controls: A/D yaw, W/S pitch, Z thrust, C reverse, X brake.
//! Works with **Bevy 0.15** and **bevy_rapier3d 0.29**.

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin,
    LogDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::window::WindowMode;
use bevy_rapier3d::prelude::*;

use castle_glider::{CastleGliderPlugin, ConfigError, GameConfig};

/* ------------------------------------------------------------------------ */
/* light                                                                    */
/* ------------------------------------------------------------------------ */
fn setup_light(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(300.0, 600.0, 200.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/* ------------------------------------------------------------------------ */
/* main                                                                     */
/* ------------------------------------------------------------------------ */
fn main() -> Result<(), ConfigError> {
    let game = CastleGliderPlugin::new(GameConfig::default())?;

    App::new()
        /* diagnostics ----------------------------------------------------- */
        .add_plugins((
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin::default(),
            EntityCountDiagnosticsPlugin::default(),
        ))

        /* bevy core ------------------------------------------------------- */
        .insert_resource(ClearColor(Color::srgb(0.55, 0.78, 0.95)))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 300.0,
        })
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Castle Glider".into(),
                resolution: (1280., 720.).into(),
                mode: WindowMode::Windowed,
                ..default()
            }),
            ..default()
        }))

        /* physics & game -------------------------------------------------- */
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(game)
        .add_systems(Startup, setup_light)
        .run();

    Ok(())
}
