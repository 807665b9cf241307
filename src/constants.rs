use bevy::prelude::*;
use std::ops::Range;

/// -------- castle grid --------
pub const CELL_SIZE: f32             = 200.0;
pub const NUM_CELLS_FROM_PLAYER: i32 =  20;
pub const MAX_NEIGHBORHOOD_RADIUS: i32 = 1_000;

/// -------- towers --------
pub const TOWER_WIDTH: f32            =  24.0;
pub const TOWER_HEIGHT: f32           = 160.0;
pub const TOWER_EDGE_ALTITUDE: f32    =  -5.0;      // perimeter silhouette stays level
pub const TOWER_ALTITUDE: Range<f32>  = -120.0..60.0;
pub const TOWER_ROOF_CHANCE: f64      =   0.2;

/// -------- flats --------
pub const FLAT_CHANCE: f64           = 0.8;
pub const FLAT_THICKNESS: f32        = 4.0;
pub const FLAT_ALTITUDE: Range<f32>  = -60.0..-20.0;

/// -------- walls --------
pub const WALL_THICKNESS: f32 =  6.0;
pub const WALL_HEIGHT: f32    = 90.0;
pub const WALL_ALTITUDE: f32  =  0.0;

/// -------- corner marker --------
pub const MARKER_RADIUS: f32      = 0.4;
pub const MARKER_LENGTH: f32      = 1.0;
pub const MARKER_HALF_HEIGHT: f32 = MARKER_RADIUS + MARKER_LENGTH * 0.5;
/// capsule centre, feet one unit above the wall top
pub const MARKER_ALTITUDE: f32    = WALL_ALTITUDE + WALL_HEIGHT + 1.0 + MARKER_HALF_HEIGHT;

/// -------- player phys --------
pub const GRAVITY: f32                = 9.81;
pub const THRUST_MAGNITUDE: f32       = GRAVITY * 4.0;
pub const MAX_SPEED: f32              = 60.0;
pub const BRAKE_DRAG: f32             = 10.0;
pub const DEFAULT_DRAG: f32           =  0.0;
pub const ANTI_SLIDE_COEFFICIENT: f32 = 10.0;
pub const YAW_SPEED: f32              = 100.0;      // deg / s
pub const PITCH_SPEED: f32            = 200.0;      // deg / s
pub const PLAYER_RADIUS: f32          = 0.5;
pub const PLAYER_HALF_HEIGHT: f32     = 0.5;
pub const PLAYER_SPAWN: Vec3          = Vec3::new(50.0, 120.0, 50.0);
pub const STANDING_SPEED: f32         = 1.0;

/// -------- locomotion --------
pub const DIVE_DURATION: f32         =   1.2;       // length of the dive clip
pub const GROUND_PROBE_DISTANCE: f32 =   1.5;
pub const RUNNING_PITCH: f32         =   0.0;       // deg, latch while running
pub const DIVE_START_PITCH: f32      =  20.0;
pub const DIVE_END_PITCH: f32        = -45.0;

/// -------- camera & model blend --------
pub const ZOOM_STEPS: u32           = 30;
pub const TILT_STEPS: u32           = 30;
pub const FIRST_PERSON_ZOOM: f32    =  0.0;
pub const THIRD_PERSON_ZOOM: f32    = 12.0;
pub const CAMERA_RISE: f32          =  0.35;        // up per unit of zoom
pub const DIVE_FRAMING_OFFSET: Vec3 = Vec3::new(0.0, 6.0, 14.0);
pub const FLYING_TILT: f32          = -80.0;        // deg, prone
pub const UPRIGHT_TILT: f32         =   0.0;

/// -------- clouds --------
pub const CLOUD_SPACING: f32           =  50.0;
pub const CLOUD_LAYER_Y: f32           = 100.0;
pub const CLOUD_HALF_EXTENT: i32       =   3;
pub const CLOUD_ANTICIPATION_GAIN: f32 =   0.1;
pub const CLOUD_FOLLOWER_OFFSETS: [Vec3; 3] = [
    Vec3::new(0.0, -2.0, -20.0),
    Vec3::new(-8.0, -3.0, -28.0),
    Vec3::new(8.0, -3.0, -28.0),
];
