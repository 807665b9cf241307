//! castle composition – which pieces go into one grid cell
//!
//! Geometry is a fixed function of the cell coordinates, decoration is
//! drawn from the composer's rng.  Actually creating the pieces is left to
//! a [`PieceSpawner`], so nothing in here touches the scene.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::{ConfigError, GameConfig};
use crate::constants::*;
use crate::grid::GridCell;

/* ===========================================================
   pieces
   =========================================================== */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallAxis {
    /// runs along z, sits on the cell's west edge
    NorthSouth,
    /// runs along x, sits on the cell's south edge
    EastWest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Tower,
    RoofedTower,
    Wall(WallAxis),
    Flat,
    /// the one character standing on the castle corner
    Marker,
}

impl PieceKind {
    /// Where the anchor sits inside the unit box, in scaled local space.
    ///
    /// Towers and walls stand on their anchor; a flat hangs down and back
    /// from its far corner. The marker capsule is centred.
    pub fn pivot(self) -> Vec3 {
        match self {
            PieceKind::Flat => Vec3::new(-0.5, -0.5, -0.5),
            PieceKind::Marker => Vec3::ZERO,
            _ => Vec3::new(0.0, 0.5, 0.0),
        }
    }

    pub fn is_tower(self) -> bool {
        matches!(self, PieceKind::Tower | PieceKind::RoofedTower)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: Quat,
    /// non‑uniform, applied to a unit box
    pub scale: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    pub kind: PieceKind,
    pub placement: Placement,
}

/* ===========================================================
   spawn collaborator
   =========================================================== */
/// Scene side of generation.  Handles are owned by the scene; the castle
/// only keeps copies for bookkeeping and never frees them.
pub trait PieceSpawner {
    type Handle: Copy;

    /// grouping root for everything placed in `cell`
    fn container(&mut self, cell: GridCell) -> Self::Handle;
    fn instantiate(&mut self, kind: PieceKind, placement: &Placement) -> Self::Handle;
    fn set_parent(&mut self, piece: Self::Handle, container: Self::Handle);
}

/// What one generated cell left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRecord<H> {
    pub container: H,
    pub pieces: Vec<H>,
}

/* ===========================================================
   composer
   =========================================================== */
#[derive(Clone)]
pub struct CellComposer<R = StdRng> {
    cell_size: f32,
    rng: R,
    marker_placed: bool,
}

impl<R: Rng> CellComposer<R> {
    pub fn new(config: &GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            cell_size: config.cell_size,
            rng,
            marker_placed: false,
        })
    }

    pub fn marker_placed(&self) -> bool {
        self.marker_placed
    }

    /// Decide the pieces for `cell`.  Every random decision is its own draw.
    pub fn compose(&mut self, cell: GridCell) -> Vec<Piece> {
        let size = self.cell_size;
        let origin = cell.origin(size);
        let center = cell.center(size);
        let mut pieces = Vec::with_capacity(5);

        /* tower ------------------------------------------------------------ */
        let altitude = if cell.on_edge() {
            TOWER_EDGE_ALTITUDE
        } else {
            self.rng.gen_range(TOWER_ALTITUDE)
        };
        let kind = if self.rng.gen_bool(TOWER_ROOF_CHANCE) {
            PieceKind::RoofedTower
        } else {
            PieceKind::Tower
        };
        pieces.push(Piece {
            kind,
            placement: Placement {
                position: Vec3::new(center.x, altitude, center.z),
                rotation: Quat::IDENTITY,
                scale: Vec3::new(TOWER_WIDTH, TOWER_HEIGHT, TOWER_WIDTH),
            },
        });

        /* flat at the far (east / north) corner ---------------------------- */
        if self.rng.gen_bool(FLAT_CHANCE) {
            let y = self.rng.gen_range(FLAT_ALTITUDE);
            pieces.push(Piece {
                kind: PieceKind::Flat,
                placement: Placement {
                    position: Vec3::new(origin.x + size, y, origin.z + size),
                    rotation: Quat::IDENTITY,
                    scale: Vec3::new(size, FLAT_THICKNESS, size),
                },
            });
        }

        /* perimeter walls -------------------------------------------------- */
        let wall_scale = Vec3::new(WALL_THICKNESS, WALL_HEIGHT, size);
        if cell.x == 0 {
            pieces.push(Piece {
                kind: PieceKind::Wall(WallAxis::NorthSouth),
                placement: Placement {
                    position: Vec3::new(origin.x, WALL_ALTITUDE, center.z),
                    rotation: Quat::IDENTITY,
                    scale: wall_scale,
                },
            });
        }
        if cell.z == 0 {
            pieces.push(Piece {
                kind: PieceKind::Wall(WallAxis::EastWest),
                placement: Placement {
                    position: Vec3::new(center.x, WALL_ALTITUDE, origin.z),
                    rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
                    scale: wall_scale,
                },
            });
        }

        /* corner marker, once per composer --------------------------------- */
        if cell.is_corner() && !self.marker_placed {
            self.marker_placed = true;
            info!("corner marker anchored at {:?}", origin);
            pieces.push(Piece {
                kind: PieceKind::Marker,
                placement: Placement {
                    position: Vec3::new(origin.x, MARKER_ALTITUDE, origin.z),
                    rotation: Quat::IDENTITY,
                    scale: Vec3::ONE,
                },
            });
        }

        pieces
    }

    /// Compose `cell` and hand every piece to `spawner`, grouped under one
    /// container.
    pub fn generate<S: PieceSpawner>(
        &mut self,
        cell: GridCell,
        spawner: &mut S,
    ) -> CellRecord<S::Handle> {
        let container = spawner.container(cell);
        let pieces = self
            .compose(cell)
            .iter()
            .map(|piece| {
                let handle = spawner.instantiate(piece.kind, &piece.placement);
                spawner.set_parent(handle, container);
                handle
            })
            .collect();
        CellRecord { container, pieces }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn composer(seed: u64) -> CellComposer {
        CellComposer::new(&GameConfig::default(), StdRng::seed_from_u64(seed)).unwrap()
    }

    fn count(pieces: &[Piece], kind: PieceKind) -> usize {
        pieces.iter().filter(|p| p.kind == kind).count()
    }

    /// world‑space min / max of a piece's unit box
    fn extent(piece: &Piece) -> (Vec3, Vec3) {
        let p = piece.placement;
        let pivot = piece.kind.pivot();
        let mut lo = Vec3::splat(f32::INFINITY);
        let mut hi = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { -0.5 } else { 0.5 },
                if i & 2 == 0 { -0.5 } else { 0.5 },
                if i & 4 == 0 { -0.5 } else { 0.5 },
            );
            let world = p.position + p.rotation * ((pivot + corner) * p.scale);
            lo = lo.min(world);
            hi = hi.max(world);
        }
        (lo, hi)
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    fn wall(pieces: &[Piece], axis: WallAxis) -> Piece {
        *pieces.iter().find(|p| p.kind == PieceKind::Wall(axis)).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        next: u32,
        parents: Vec<(u32, u32)>,
    }

    impl PieceSpawner for Recorder {
        type Handle = u32;

        fn container(&mut self, _cell: GridCell) -> u32 {
            self.next += 1;
            self.next
        }

        fn instantiate(&mut self, _kind: PieceKind, _placement: &Placement) -> u32 {
            self.next += 1;
            self.next
        }

        fn set_parent(&mut self, piece: u32, container: u32) {
            self.parents.push((piece, container));
        }
    }

    #[test]
    fn every_cell_gets_one_centered_tower() {
        let mut c = composer(1);
        for x in 0..6 {
            for z in 0..6 {
                let cell = GridCell::new(x, z);
                let pieces = c.compose(cell);
                let towers: Vec<_> = pieces.iter().filter(|p| p.kind.is_tower()).collect();
                assert_eq!(towers.len(), 1);
                let pos = towers[0].placement.position;
                let center = cell.center(CELL_SIZE);
                assert_eq!((pos.x, pos.z), (center.x, center.z));
            }
        }
    }

    #[test]
    fn edge_towers_are_level() {
        let mut c = composer(7);
        for i in 0..40 {
            for cell in [GridCell::new(0, i), GridCell::new(i, 0)] {
                let tower = c.compose(cell).into_iter().find(|p| p.kind.is_tower()).unwrap();
                assert_eq!(tower.placement.position.y, TOWER_EDGE_ALTITUDE);
            }
        }
    }

    #[test]
    fn interior_towers_stay_in_band_and_vary() {
        let mut c = composer(11);
        let heights: Vec<f32> = (1..60)
            .map(|i| {
                let tower = c.compose(GridCell::new(i, i)).into_iter().next().unwrap();
                tower.placement.position.y
            })
            .collect();
        assert!(heights.iter().all(|y| TOWER_ALTITUDE.contains(y)));
        assert!(heights.iter().any(|y| *y != heights[0]));
    }

    #[test]
    fn walls_follow_the_perimeter() {
        let mut c = composer(3);
        let ns = PieceKind::Wall(WallAxis::NorthSouth);
        let ew = PieceKind::Wall(WallAxis::EastWest);

        let west = c.compose(GridCell::new(0, 4));
        assert_eq!((count(&west, ns), count(&west, ew)), (1, 0));

        let south = c.compose(GridCell::new(4, 0));
        assert_eq!((count(&south, ns), count(&south, ew)), (0, 1));

        let inner = c.compose(GridCell::new(4, 4));
        assert_eq!((count(&inner, ns), count(&inner, ew)), (0, 0));

        for wall in west.iter().chain(&south).filter(|p| matches!(p.kind, PieceKind::Wall(_))) {
            assert_eq!(wall.placement.scale.z, CELL_SIZE);
        }
    }

    #[test]
    fn west_wall_runs_along_z_on_the_cell_edge() {
        let mut c = composer(3);
        let (lo, hi) = extent(&wall(&c.compose(GridCell::new(0, 4)), WallAxis::NorthSouth));
        let half = WALL_THICKNESS * 0.5;
        assert!(close(lo, Vec3::new(-half, WALL_ALTITUDE, 800.0)), "{lo:?}");
        assert!(close(hi, Vec3::new(half, WALL_ALTITUDE + WALL_HEIGHT, 1000.0)), "{hi:?}");
    }

    #[test]
    fn south_wall_is_turned_to_run_along_x() {
        let mut c = composer(3);
        let (lo, hi) = extent(&wall(&c.compose(GridCell::new(4, 0)), WallAxis::EastWest));
        let half = WALL_THICKNESS * 0.5;
        assert!(close(lo, Vec3::new(800.0, WALL_ALTITUDE, -half)), "{lo:?}");
        assert!(close(hi, Vec3::new(1000.0, WALL_ALTITUDE + WALL_HEIGHT, half)), "{hi:?}");
    }

    #[test]
    fn marker_stands_on_the_corner_above_both_walls() {
        let mut c = composer(5);
        let pieces = c.compose(GridCell::new(0, 0));
        let marker = pieces.iter().find(|p| p.kind == PieceKind::Marker).unwrap().placement;
        assert_eq!((marker.position.x, marker.position.z), (0.0, 0.0));

        let feet = marker.position.y - MARKER_HALF_HEIGHT;
        for axis in [WallAxis::NorthSouth, WallAxis::EastWest] {
            let (lo, hi) = extent(&wall(&pieces, axis));
            // the corner column is inside the wall footprint
            assert!(lo.x <= 0.0 && hi.x >= 0.0 && lo.z <= 0.0 && hi.z >= 0.0);
            assert!(feet > hi.y, "marker feet {feet} inside wall top {}", hi.y);
            assert!((feet - (hi.y + 1.0)).abs() < 1e-3);
        }
    }

    #[test]
    fn marker_is_placed_once() {
        let mut c = composer(5);
        let first = c.compose(GridCell::new(0, 0));
        assert_eq!(count(&first, PieceKind::Marker), 1);
        assert!(c.marker_placed());

        let again = c.compose(GridCell::new(0, 0));
        assert_eq!(count(&again, PieceKind::Marker), 0);
        // both walls still go in
        assert_eq!(count(&again, PieceKind::Wall(WallAxis::NorthSouth)), 1);
        assert_eq!(count(&again, PieceKind::Wall(WallAxis::EastWest)), 1);
    }

    #[test]
    fn flats_span_the_cell_from_the_far_corner() {
        let mut c = composer(9);
        let cell = GridCell::new(2, 3);
        let mut seen = 0;
        for _ in 0..50 {
            for flat in c.compose(cell).into_iter().filter(|p| p.kind == PieceKind::Flat) {
                seen += 1;
                let p = flat.placement;
                assert_eq!((p.position.x, p.position.z), (600.0, 800.0));
                assert_eq!((p.scale.x, p.scale.z), (CELL_SIZE, CELL_SIZE));
                assert!(FLAT_ALTITUDE.contains(&p.position.y));
            }
        }
        // 80 % chance over 50 draws
        assert!(seen > 20 && seen < 50);
    }

    #[test]
    fn roof_and_flat_draws_are_independent() {
        let mut c = composer(21);
        let mut combos = [[0u32; 2]; 2];
        for i in 0..400 {
            let pieces = c.compose(GridCell::new(1 + i % 20, 1 + i / 20));
            let roofed = pieces.iter().any(|p| p.kind == PieceKind::RoofedTower) as usize;
            let flat = pieces.iter().any(|p| p.kind == PieceKind::Flat) as usize;
            combos[roofed][flat] += 1;
        }
        // every combination shows up
        assert!(combos.iter().flatten().all(|n| *n > 0), "{combos:?}");
    }

    #[test]
    fn generate_parents_every_piece_to_the_container() {
        let mut c = composer(2);
        let mut spawner = Recorder::default();
        let record = c.generate(GridCell::new(0, 0), &mut spawner);

        assert!(record.pieces.len() >= 4); // tower, two walls, marker
        assert_eq!(spawner.parents.len(), record.pieces.len());
        assert!(spawner.parents.iter().all(|(_, parent)| *parent == record.container));
    }
}
