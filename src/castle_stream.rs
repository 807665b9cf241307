//! run‑time castle streaming
//!
//! The memo / sweep logic in [`ChunkGenerator`] is engine‑agnostic; the
//! bottom half of the file wires it to Bevy: a `Commands`‑backed spawner,
//! the shared meshes and the per‑frame streaming system.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::castle::{CellComposer, CellRecord, PieceKind, PieceSpawner, Placement};
use crate::components::{CastleCell, CastlePiece, Player, GROUNDABLE};
use crate::config::{ConfigError, GameConfig};
use crate::constants::{MARKER_LENGTH, MARKER_RADIUS};
use crate::grid::GridCell;

/* ===========================================================
   generator
   =========================================================== */
/// Generates castle cells around the agent, each at most once.
///
/// A sweep over the `(2r+1)²` neighborhood only happens the first time the
/// agent enters a cell; after that the agent's cell is in `visited` and
/// [`tick`](Self::tick) returns immediately.  Neither memo is ever pruned.
#[derive(Clone)]
pub struct ChunkGenerator<H, R = StdRng> {
    cell_size: f32,
    radius: i32,
    visited: HashSet<GridCell>,
    generated: HashMap<GridCell, CellRecord<H>>,
    composer: CellComposer<R>,
}

impl<H: Copy> ChunkGenerator<H, StdRng> {
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<H: Copy, R: Rng> ChunkGenerator<H, R> {
    pub fn with_rng(config: &GameConfig, rng: R) -> Result<Self, ConfigError> {
        let composer = CellComposer::new(config, rng)?;
        Ok(Self {
            cell_size: config.cell_size,
            radius: config.neighborhood_radius,
            visited: HashSet::new(),
            generated: HashMap::new(),
            composer,
        })
    }

    /// Run one step for an agent at `position`; returns the cells generated
    /// by this call in scan order.
    pub fn tick<S>(&mut self, position: Vec3, spawner: &mut S) -> Vec<GridCell>
    where
        S: PieceSpawner<Handle = H>,
    {
        let agent_cell = GridCell::from_world(position, self.cell_size);
        if self.visited.contains(&agent_cell) {
            return Vec::new();
        }

        debug!(
            "castle sweep around {:?} ({} cells)",
            agent_cell,
            sweep_cells(self.radius)
        );

        let mut fresh = Vec::new();
        for cell in agent_cell.neighborhood(self.radius) {
            if !cell.in_structure_zone() || self.generated.contains_key(&cell) {
                continue;
            }
            let record = self.composer.generate(cell, spawner);
            trace!("generated {:?}: {} pieces", cell, record.pieces.len());
            self.generated.insert(cell, record);
            fresh.push(cell);
        }

        self.visited.insert(agent_cell);
        fresh
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn is_visited(&self, cell: GridCell) -> bool {
        self.visited.contains(&cell)
    }

    pub fn is_generated(&self, cell: GridCell) -> bool {
        self.generated.contains_key(&cell)
    }

    pub fn record(&self, cell: GridCell) -> Option<&CellRecord<H>> {
        self.generated.get(&cell)
    }

    pub fn generated_count(&self) -> usize {
        self.generated.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn composer(&self) -> &CellComposer<R> {
        &self.composer
    }
}

/// `(2r+1)²`, in `u64` so no `i32` radius can overflow it.
fn sweep_cells(radius: i32) -> u64 {
    let side = 2 * u64::from(radius.unsigned_abs()) + 1;
    side * side
}

/* ===========================================================
   Bevy side
   =========================================================== */
#[derive(Resource, Deref, DerefMut, Clone)]
pub struct CastleStream(pub ChunkGenerator<Entity>);

/// meshes & materials shared by every piece
#[derive(Resource)]
pub struct CastleAssets {
    tower: Handle<Mesh>,
    roof: Handle<Mesh>,
    flat: Handle<Mesh>,
    marker: Handle<Mesh>,
    stone: Handle<StandardMaterial>,
    roof_tiles: Handle<StandardMaterial>,
    slab: Handle<StandardMaterial>,
    banner: Handle<StandardMaterial>,
}

pub fn setup_castle_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let unit = Cuboid::from_size(Vec3::ONE);
    commands.insert_resource(CastleAssets {
        tower: meshes.add(Mesh::from(unit).translated_by(PieceKind::Tower.pivot())),
        roof: meshes.add(Cone { radius: 0.75, height: 0.3 }),
        flat: meshes.add(Mesh::from(unit).translated_by(PieceKind::Flat.pivot())),
        marker: meshes.add(Capsule3d::new(MARKER_RADIUS, MARKER_LENGTH)),
        stone: materials.add(Color::srgb(0.62, 0.60, 0.55)),
        roof_tiles: materials.add(Color::srgb(0.55, 0.16, 0.12)),
        slab: materials.add(Color::srgb(0.45, 0.47, 0.42)),
        banner: materials.add(Color::srgb(0.95, 0.80, 0.15)),
    });
}

/// Spawns pieces as fixed rapier bodies under one container per cell.
struct SceneSpawner<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    assets: &'a CastleAssets,
}

impl PieceSpawner for SceneSpawner<'_, '_, '_> {
    type Handle = Entity;

    fn container(&mut self, cell: GridCell) -> Entity {
        self.commands
            .spawn((
                CastleCell { cell },
                Name::new(format!("castle cell {},{}", cell.x, cell.z)),
                Transform::default(),
                Visibility::default(),
            ))
            .id()
    }

    fn instantiate(&mut self, kind: PieceKind, placement: &Placement) -> Entity {
        let transform = Transform {
            translation: placement.position,
            rotation: placement.rotation,
            scale: placement.scale,
        };

        if kind == PieceKind::Marker {
            return self
                .commands
                .spawn((
                    CastlePiece { kind },
                    Mesh3d(self.assets.marker.clone()),
                    MeshMaterial3d(self.assets.banner.clone()),
                    transform,
                ))
                .id();
        }

        let (mesh, material) = match kind {
            PieceKind::Flat => (self.assets.flat.clone(), self.assets.slab.clone()),
            _ => (self.assets.tower.clone(), self.assets.stone.clone()),
        };
        let collider = Collider::compound(vec![(
            kind.pivot(),
            Quat::IDENTITY,
            Collider::cuboid(0.5, 0.5, 0.5),
        )]);

        let mut piece = self.commands.spawn((
            CastlePiece { kind },
            Mesh3d(mesh),
            MeshMaterial3d(material),
            transform,
            RigidBody::Fixed,
            collider,
            CollisionGroups::new(GROUNDABLE, Group::ALL),
        ));
        if kind == PieceKind::RoofedTower {
            let (roof, tiles) = (self.assets.roof.clone(), self.assets.roof_tiles.clone());
            piece.with_children(|parent| {
                parent.spawn((
                    Mesh3d(roof),
                    MeshMaterial3d(tiles),
                    Transform::from_xyz(0.0, 1.15, 0.0),
                ));
            });
        }
        piece.id()
    }

    fn set_parent(&mut self, piece: Entity, container: Entity) {
        self.commands.entity(container).add_child(piece);
    }
}

/* ===========================================================
   stream_castle_system – sweep when the player enters a new cell
   =========================================================== */
pub fn stream_castle_system(
    mut commands: Commands,
    assets:       Res<CastleAssets>,
    mut stream:   ResMut<CastleStream>,
    player_q:     Query<&Transform, With<Player>>,
) {
    let Ok(player_tf) = player_q.get_single() else { return };

    let mut spawner = SceneSpawner {
        commands: &mut commands,
        assets: &assets,
    };
    let fresh = stream.tick(player_tf.translation, &mut spawner);
    if !fresh.is_empty() {
        debug!(
            "castle: {} new cells, {} total",
            fresh.len(),
            stream.generated_count()
        );
    }
}
