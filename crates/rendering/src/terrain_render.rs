//! Terrain chunk meshes.
//!
//! One entity per streamed chunk, driven entirely by the sim's
//! [`ChunkSpawned`] / [`ChunkEvicted`] events. The mesh is the chunk's
//! vertex grid verbatim: same elevations, same cell diagonal, so what the
//! player sees is exactly the surface the collision probe tests. Despawning
//! a chunk entity drops the only strong handle to its mesh, which releases
//! the asset.

use std::collections::HashSet;

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use simulation::chunk::{ChunkCoord, TerrainChunk, VERTS_X, VERTS_Y};
use simulation::chunk_grid::{ChunkEvicted, ChunkGrid, ChunkSpawned};
use simulation::config::{CELL_HEIGHT, CELL_WIDTH, CHUNK_CELLS_X, CHUNK_CELLS_Y, MAX_ELEVATION};
use simulation::noise_field::NoiseField;

/// Marks a chunk's mesh entity with the coordinate it was built for.
#[derive(Component)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
}

/// The material every chunk shares. Lighting comes from vertex colors, so
/// one white, rough surface covers all of them.
#[derive(Resource)]
pub struct TerrainAssets {
    pub material: Handle<StandardMaterial>,
}

pub fn setup_terrain_assets(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(TerrainAssets {
        material: materials.add(StandardMaterial {
            base_color: Color::WHITE,
            perceptual_roughness: 0.9,
            ..default()
        }),
    });
}

// ---------------------------------------------------------------------------
// Mesh construction
// ---------------------------------------------------------------------------

/// Elevation tint stops, keyed by elevation as a fraction of
/// `MAX_ELEVATION`: grass in the valleys up through rock to snow caps.
const ELEVATION_RAMP: [(f32, [f32; 4]); 5] = [
    (0.00, [0.23, 0.43, 0.19, 1.0]),
    (0.35, [0.39, 0.53, 0.23, 1.0]),
    (0.55, [0.47, 0.40, 0.27, 1.0]),
    (0.75, [0.52, 0.51, 0.49, 1.0]),
    (1.00, [0.93, 0.94, 0.96, 1.0]),
];

/// Vertex color for an elevation fraction in [0, 1].
pub fn elevation_color(t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    let mut lower = ELEVATION_RAMP[0];
    for stop in ELEVATION_RAMP.iter().skip(1) {
        if t <= stop.0 {
            let f = (t - lower.0) / (stop.0 - lower.0);
            return [
                lower.1[0] + (stop.1[0] - lower.1[0]) * f,
                lower.1[1] + (stop.1[1] - lower.1[1]) * f,
                lower.1[2] + (stop.1[2] - lower.1[2]) * f,
                1.0,
            ];
        }
        lower = *stop;
    }
    ELEVATION_RAMP[ELEVATION_RAMP.len() - 1].1
}

/// Vertex elevation by grid index, reading past the chunk edge from the
/// noise field. The neighbor chunk stores the very same samples, so normals
/// and shading are continuous across seams.
fn grid_elevation(chunk: &TerrainChunk, noise: &NoiseField, i: i32, j: i32) -> f32 {
    chunk.try_vertex_elevation(i, j).unwrap_or_else(|| {
        let origin = chunk.origin();
        noise.elevation(
            origin.x + i as f32 * CELL_WIDTH,
            origin.y + j as f32 * CELL_HEIGHT,
        )
    })
}

/// Smooth per-vertex normal from central differences of the heightfield.
fn vertex_normal(chunk: &TerrainChunk, noise: &NoiseField, i: i32, j: i32) -> [f32; 3] {
    let left = grid_elevation(chunk, noise, i - 1, j);
    let right = grid_elevation(chunk, noise, i + 1, j);
    let near = grid_elevation(chunk, noise, i, j - 1);
    let far = grid_elevation(chunk, noise, i, j + 1);
    let slope_x = (right - left) / (2.0 * CELL_WIDTH);
    let slope_y = (far - near) / (2.0 * CELL_HEIGHT);
    Vec3::new(-slope_x, 1.0, -slope_y).normalize().to_array()
}

/// Build the render mesh for one chunk, in chunk-local render space (the
/// chunk origin is the entity's translation).
///
/// Sim ground x/y lands on render x/z, which mirrors the plane, so cells
/// are wound (v00, v11, v10) / (v00, v01, v11) to keep faces up. Both
/// triangles share the v00 -> v11 diagonal, the same split
/// [`simulation::collision::ground_height`] walks.
pub fn build_chunk_mesh(chunk: &TerrainChunk, noise: &NoiseField) -> Mesh {
    let mut positions = Vec::with_capacity(VERTS_X * VERTS_Y);
    let mut normals = Vec::with_capacity(VERTS_X * VERTS_Y);
    let mut colors = Vec::with_capacity(VERTS_X * VERTS_Y);
    let mut uvs = Vec::with_capacity(VERTS_X * VERTS_Y);

    for j in 0..VERTS_Y {
        for i in 0..VERTS_X {
            let elevation = chunk.vertex_elevation(i, j);
            positions.push([i as f32 * CELL_WIDTH, elevation, j as f32 * CELL_HEIGHT]);
            normals.push(vertex_normal(chunk, noise, i as i32, j as i32));
            colors.push(elevation_color(elevation / MAX_ELEVATION));
            uvs.push([
                i as f32 / CHUNK_CELLS_X as f32,
                j as f32 / CHUNK_CELLS_Y as f32,
            ]);
        }
    }

    let mut indices = Vec::with_capacity(CHUNK_CELLS_X * CHUNK_CELLS_Y * 6);
    for j in 0..CHUNK_CELLS_Y as u32 {
        for i in 0..CHUNK_CELLS_X as u32 {
            let v00 = j * VERTS_X as u32 + i;
            let v10 = v00 + 1;
            let v01 = v00 + VERTS_X as u32;
            let v11 = v01 + 1;
            indices.extend_from_slice(&[v00, v11, v10, v00, v01, v11]);
        }
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Build and place a mesh entity for every chunk the sim spawned this frame.
pub fn spawn_chunk_meshes(
    mut commands: Commands,
    mut spawned: EventReader<ChunkSpawned>,
    grid: Res<ChunkGrid>,
    noise: Res<NoiseField>,
    assets: Res<TerrainAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for ChunkSpawned(coord) in spawned.read() {
        let Some(chunk) = grid.chunk(*coord) else {
            // Already evicted again; the matching evict event is pending.
            continue;
        };
        let origin = coord.origin();
        commands.spawn((
            Mesh3d(meshes.add(build_chunk_mesh(chunk, &noise))),
            MeshMaterial3d(assets.material.clone()),
            Transform::from_xyz(origin.x, 0.0, origin.y),
            ChunkMesh { coord: *coord },
        ));
    }
}

/// Drop the mesh entities of every chunk the sim evicted this frame.
pub fn despawn_chunk_meshes(
    mut commands: Commands,
    mut evicted: EventReader<ChunkEvicted>,
    chunk_meshes: Query<(Entity, &ChunkMesh)>,
) {
    let doomed: HashSet<ChunkCoord> = evicted.read().map(|event| event.0).collect();
    if doomed.is_empty() {
        return;
    }
    for (entity, marker) in &chunk_meshes {
        if doomed.contains(&marker.coord) {
            commands.entity(entity).despawn();
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
