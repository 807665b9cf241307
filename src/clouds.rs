//! cloud layer & cloud puffs that ride along in front of the player

use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;

use crate::components::{CloudFollower, CloudLayer, Player};
use crate::constants::*;

/// Square grid of `(2n+1)²` puffs at a fixed altitude, centred on the origin.
pub fn cloud_layer_positions(half_extent: i32, spacing: f32, altitude: f32) -> Vec<Vec3> {
    (-half_extent..=half_extent)
        .flat_map(|x| {
            (-half_extent..=half_extent)
                .map(move |z| Vec3::new(x as f32 * spacing, altitude, z as f32 * spacing))
        })
        .collect()
}

/// Follower position: ahead of the player in its own frame, pushed further
/// along the velocity.
pub fn follow_position(
    player_position: Vec3,
    player_rotation: Quat,
    player_velocity: Vec3,
    relative_position: Vec3,
) -> Vec3 {
    player_position + player_rotation * relative_position + player_velocity * CLOUD_ANTICIPATION_GAIN
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterChange {
    Play,
    Stop,
}

/// Particle toggle for one follower; emits below the cloud plane.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct CloudEmitter {
    playing: bool,
}

impl CloudEmitter {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// `Some` only on the frame the state flips.
    pub fn update(&mut self, altitude: f32, cloud_altitude: f32) -> Option<EmitterChange> {
        let wanted = altitude <= cloud_altitude;
        if wanted == self.playing {
            return None;
        }
        self.playing = wanted;
        Some(if wanted { EmitterChange::Play } else { EmitterChange::Stop })
    }
}

/* ===========================================================
   startup
   =========================================================== */
pub fn spawn_clouds(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let puff = meshes.add(Sphere::new(6.0));
    let white = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.85),
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    commands
        .spawn((
            CloudLayer,
            Name::new("clouds"),
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|layer| {
            for pos in cloud_layer_positions(CLOUD_HALF_EXTENT, CLOUD_SPACING, CLOUD_LAYER_Y) {
                layer.spawn((
                    Mesh3d(puff.clone()),
                    MeshMaterial3d(white.clone()),
                    Transform::from_translation(pos),
                ));
            }
        });

    for relative_position in CLOUD_FOLLOWER_OFFSETS {
        commands.spawn((
            CloudFollower { relative_position },
            CloudEmitter::default(),
            Mesh3d(puff.clone()),
            MeshMaterial3d(white.clone()),
            Transform::from_scale(Vec3::splat(0.4)),
            Visibility::Hidden,
        ));
    }
}

/* ===========================================================
   cloud_follow_system
   =========================================================== */
pub fn cloud_follow_system(
    player_q:    Query<(&Transform, &Velocity), With<Player>>,
    mut cloud_q: Query<
        (&mut Transform, &mut Visibility, &mut CloudEmitter, &CloudFollower),
        Without<Player>,
    >,
) {
    let Ok((player_tf, vel)) = player_q.get_single() else { return };

    for (mut tf, mut visibility, mut emitter, follower) in &mut cloud_q {
        tf.translation = follow_position(
            player_tf.translation,
            player_tf.rotation,
            vel.linvel,
            follower.relative_position,
        );

        match emitter.update(tf.translation.y, CLOUD_LAYER_Y) {
            Some(EmitterChange::Play) => {
                debug!("cloud emitter on at y = {:.1}", tf.translation.y);
                *visibility = Visibility::Visible;
            }
            Some(EmitterChange::Stop) => {
                debug!("cloud emitter off at y = {:.1}", tf.translation.y);
                *visibility = Visibility::Hidden;
            }
            None => {}
        }
    }
}
