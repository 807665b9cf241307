//! castle grid coordinates (the ground plane, `y` ignored)

use bevy::prelude::*;

/// Integer key of one square castle cell on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub x: i32,
    pub z: i32,
}

impl GridCell {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Canonical cell containing `pos`; flooring keeps negative
    /// coordinates in the right cell (-0.1 → -1, not 0).
    pub fn from_world(pos: Vec3, cell_size: f32) -> Self {
        Self {
            x: (pos.x / cell_size).floor() as i32,
            z: (pos.z / cell_size).floor() as i32,
        }
    }

    /// world‑space min corner (west / south)
    pub fn origin(self, cell_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * cell_size, 0.0, self.z as f32 * cell_size)
    }

    pub fn center(self, cell_size: f32) -> Vec3 {
        Vec3::new(
            (self.x as f32 + 0.5) * cell_size,
            0.0,
            (self.z as f32 + 0.5) * cell_size,
        )
    }

    /// The castle only ever occupies the quadrant x ≥ 0, z ≥ 0.
    pub fn in_structure_zone(self) -> bool {
        self.x >= 0 && self.z >= 0
    }

    /// Either coordinate on the castle perimeter.
    pub fn on_edge(self) -> bool {
        self.x == 0 || self.z == 0
    }

    pub fn is_corner(self) -> bool {
        self.x == 0 && self.z == 0
    }

    /// Square block of `(2r+1)²` cells centred on `self`, x‑major.
    pub fn neighborhood(self, radius: i32) -> impl Iterator<Item = GridCell> {
        let r = radius.max(0);
        (self.x - r..=self.x + r)
            .flat_map(move |x| (self.z - r..=self.z + r).map(move |z| GridCell::new(x, z)))
    }
}
