//! all player‑related systems (spawn, input, ground probe, locomotion, model)

use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::camera::CameraBlender;
use crate::components::*;
use crate::constants::*;
use crate::locomotion::{AgentSample, LocomotionStateMachine};

/// validated prototypes the startup system clones onto the entities
#[derive(Resource, Clone)]
pub struct PlayerRig {
    pub locomotion: LocomotionStateMachine,
    pub camera: CameraBlender,
}

/* ===========================================================
   startup
   =========================================================== */
pub fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    rig: Res<PlayerRig>,
) {
    let body = meshes.add(Capsule3d::new(PLAYER_RADIUS, PLAYER_HALF_HEIGHT * 2.0));
    let feathers = materials.add(Color::srgb(0.92, 0.42, 0.18));

    commands
        .spawn((
            Player,
            Name::new("player"),
            Transform::from_translation(PLAYER_SPAWN),
            Visibility::default(),
            /* physics ---------------------------------------------------- */
            (
                RigidBody::Dynamic,
                Collider::capsule_y(PLAYER_HALF_HEIGHT, PLAYER_RADIUS),
                ColliderMassProperties::Mass(1.0),
                CollisionGroups::new(Group::GROUP_2, Group::ALL),
                LockedAxes::ROTATION_LOCKED,
                Velocity::zero(),
                ExternalForce::default(),
                Damping { linear_damping: DEFAULT_DRAG, angular_damping: 0.0 },
                GravityScale(1.0),
            ),
            /* locomotion ------------------------------------------------- */
            (
                rig.locomotion.clone(),
                ControlInput::default(),
                AnimationFlags::default(),
                ModelTilt(FLYING_TILT),
            ),
        ))
        .with_children(|parent| {
            parent.spawn((
                PlayerModel,
                Mesh3d(body),
                MeshMaterial3d(feathers),
                Transform::from_rotation(Quat::from_rotation_x(FLYING_TILT.to_radians())),
            ));
        });

    commands.spawn((
        PlayerCamera,
        Camera3d::default(),
        Transform::from_translation(PLAYER_SPAWN),
        rig.camera.clone(),
    ));
}

/* ===========================================================
   input (A/D yaw, W/S pitch, Z/C thrust, X brake)
   =========================================================== */
#[inline]
fn axis(keys: &ButtonInput<KeyCode>, negative: &[KeyCode], positive: &[KeyCode]) -> f32 {
    let neg = keys.any_pressed(negative.iter().copied());
    let pos = keys.any_pressed(positive.iter().copied());
    match (neg, pos) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

pub fn player_input_system(
    keys:  Res<ButtonInput<KeyCode>>,
    mut q: Query<&mut ControlInput, With<Player>>,
) {
    let Ok(mut input) = q.get_single_mut() else { return };
    *input = ControlInput {
        yaw: axis(&keys, &[KeyCode::KeyA, KeyCode::ArrowLeft], &[KeyCode::KeyD, KeyCode::ArrowRight]),
        pitch: axis(&keys, &[KeyCode::KeyS, KeyCode::ArrowDown], &[KeyCode::KeyW, KeyCode::ArrowUp]),
        thrust: axis(&keys, &[KeyCode::KeyC], &[KeyCode::KeyZ]),
        brake: keys.pressed(KeyCode::KeyX),
    };
}

/* ===========================================================
   ground probe + locomotion step + physics write‑back
   =========================================================== */
pub fn locomotion_system(
    time: Res<Time>,
    rapier: ReadRapierContext,
    mut q: Query<
        (
            Entity,
            &mut Transform,
            &Velocity,
            &ControlInput,
            &mut LocomotionStateMachine,
            &mut ExternalForce,
            &mut Damping,
            &mut GravityScale,
            &mut AnimationFlags,
        ),
        With<Player>,
    >,
) {
    let Ok((entity, mut tf, vel, input, mut locomotion, mut force, mut damping, mut gravity, mut flags)) =
        q.get_single_mut()
    else {
        return;
    };

    /* ---- proximity: straight down, groundable surfaces only ---- */
    let context = rapier.single();
    let filter = QueryFilter::new()
        .groups(CollisionGroups::new(Group::ALL, GROUNDABLE))
        .exclude_rigid_body(entity);
    let reach = PLAYER_HALF_HEIGHT + PLAYER_RADIUS + GROUND_PROBE_DISTANCE;
    let near_surface = context
        .cast_ray(tf.translation, Vec3::NEG_Y, reach, true, filter)
        .is_some();

    /* ---- step ---- */
    let sample = AgentSample {
        velocity: vel.linvel,
        orientation: tf.rotation,
    };
    let intent = locomotion.step(
        &sample,
        input,
        near_surface,
        time.elapsed_secs(),
        time.delta_secs(),
    );

    /* ---- write back ---- */
    tf.rotation = intent.orientation;
    force.force = intent.force();
    force.torque = Vec3::ZERO;
    damping.linear_damping = intent.linear_drag;
    gravity.0 = if intent.gravity_enabled { 1.0 } else { 0.0 };
    if *flags != intent.animation {
        *flags = intent.animation;
    }
}

/* ===========================================================
   model tilt (eased value comes from the camera blend)
   =========================================================== */
pub fn model_tilt_system(
    player_q:    Query<&ModelTilt, With<Player>>,
    mut model_q: Query<&mut Transform, With<PlayerModel>>,
) {
    let Ok(tilt) = player_q.get_single() else { return };
    for mut tf in &mut model_q {
        tf.rotation = Quat::from_rotation_x(tilt.0.to_radians());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_keys_cancel() {
        let mut keys = ButtonInput::<KeyCode>::default();
        let (left, right) = ([KeyCode::KeyA, KeyCode::ArrowLeft], [KeyCode::KeyD, KeyCode::ArrowRight]);
        assert_eq!(axis(&keys, &left, &right), 0.0);
        keys.press(KeyCode::KeyA);
        assert_eq!(axis(&keys, &left, &right), -1.0);
        keys.press(KeyCode::ArrowRight);
        assert_eq!(axis(&keys, &left, &right), 0.0);
    }

    #[test]
    fn input_system_samples_keys() {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.add_systems(Update, player_input_system);
        let player = app.world_mut().spawn((Player, ControlInput::default())).id();

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.press(KeyCode::KeyZ);
            keys.press(KeyCode::KeyX);
            keys.press(KeyCode::ArrowUp);
        }
        app.update();

        let input = *app.world().get::<ControlInput>(player).unwrap();
        assert_eq!(input, ControlInput { yaw: 0.0, pitch: 1.0, thrust: 1.0, brake: true });
    }

    #[test]
    fn model_follows_tilt() {
        let mut app = App::new();
        app.add_systems(Update, model_tilt_system);
        app.world_mut().spawn((Player, ModelTilt(-60.0)));
        let model = app.world_mut().spawn((PlayerModel, Transform::default())).id();
        app.update();

        let tf = app.world().get::<Transform>(model).unwrap();
        let (_, pitch, _) = tf.rotation.to_euler(EulerRot::YXZ);
        assert!((pitch.to_degrees() + 60.0).abs() < 1e-3);
    }
}
