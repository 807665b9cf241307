use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;

use crate::castle::PieceKind;
use crate::grid::GridCell;

/// collision group of everything the agent can land and run on
pub const GROUNDABLE: Group = Group::GROUP_1;

/* ===========================================================
   player
   =========================================================== */
#[derive(Component)]
pub struct Player;

/// child entity carrying the visible body; tilted independently of
/// the physics body
#[derive(Component)]
pub struct PlayerModel;

/// per‑frame control sample, written by input, read by locomotion
#[derive(Component, Default, Clone, Copy, Debug, PartialEq)]
pub struct ControlInput {
    /// −1 (left) … 1 (right)
    pub yaw: f32,
    /// −1 (nose down) … 1 (nose up)
    pub pitch: f32,
    /// −1 (reverse) … 1 (forward)
    pub thrust: f32,
    pub brake: bool,
}

/// animation parameter sink; written once per step, read by whoever drives
/// the visuals
#[derive(Component, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationFlags {
    pub is_running: bool,
    pub is_standing: bool,
    pub is_diving: bool,
}

/// current eased model tilt (deg), handed from the camera blend to the model
#[derive(Component, Default, Clone, Copy, Debug)]
pub struct ModelTilt(pub f32);

/* ===========================================================
   camera
   =========================================================== */
#[derive(Component)]
pub struct PlayerCamera;

/* ===========================================================
   castle
   =========================================================== */
/// grouping root for every piece generated in one cell
#[derive(Component, Debug)]
pub struct CastleCell {
    pub cell: GridCell,
}

#[derive(Component, Debug)]
pub struct CastlePiece {
    pub kind: PieceKind,
}

/* ===========================================================
   clouds
   =========================================================== */
#[derive(Component)]
pub struct CloudLayer;

/// puff travelling with the player, slightly ahead
#[derive(Component)]
pub struct CloudFollower {
    /// offset in the player's local frame
    pub relative_position: Vec3,
}
