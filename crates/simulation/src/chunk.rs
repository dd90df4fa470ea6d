//! Terrain chunks: square heightfield tiles addressed by integer coordinate.
//!
//! The world is an unbounded plane tiled by chunks of `CHUNK_CELLS_X` x
//! `CHUNK_CELLS_Y` cells. A [`ChunkCoord`] names a tile; a [`TerrainChunk`]
//! holds that tile's vertex elevations, sampled once from the shared
//! [`NoiseField`](crate::noise_field::NoiseField) at construction and never
//! mutated afterwards. Neighboring chunks sample the same world positions
//! along their shared edge, so the surface is seamless by construction.

use bevy::prelude::*;

use crate::config::{
    CELL_HEIGHT, CELL_WIDTH, CHUNK_CELLS_X, CHUNK_CELLS_Y, CHUNK_HEIGHT, CHUNK_WIDTH,
};
use crate::noise_field::NoiseField;

/// Vertices along a chunk's X axis (one more than cells).
pub const VERTS_X: usize = CHUNK_CELLS_X + 1;
/// Vertices along a chunk's Y axis.
pub const VERTS_Y: usize = CHUNK_CELLS_Y + 1;

// ---------------------------------------------------------------------------
// ChunkCoord
// ---------------------------------------------------------------------------

/// Integer coordinate of a chunk on the unbounded plane.
///
/// Chunk (0, 0) spans world `[0, CHUNK_WIDTH) x [0, CHUNK_HEIGHT)`; negative
/// coordinates tile the plane in the negative directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing a world position. Uses floor division so positions
    /// just below zero land in chunk -1, not chunk 0.
    pub fn from_world(x: f32, y: f32) -> Self {
        Self {
            x: (x / CHUNK_WIDTH).floor() as i32,
            y: (y / CHUNK_HEIGHT).floor() as i32,
        }
    }

    /// World position of this chunk's bottom-left corner (its lowest-x,
    /// lowest-y vertex).
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x as f32 * CHUNK_WIDTH, self.y as f32 * CHUNK_HEIGHT)
    }

    /// Chebyshev distance to another chunk, the metric the stream windows
    /// are defined in.
    pub fn ring_distance(&self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

// ---------------------------------------------------------------------------
// TerrainChunk
// ---------------------------------------------------------------------------

/// One streamed heightfield tile.
///
/// Vertex elevations are stored row-major: index `j * VERTS_X + i` holds the
/// vertex at local offset `(i * CELL_WIDTH, j * CELL_HEIGHT)` from the chunk
/// origin.
pub struct TerrainChunk {
    coord: ChunkCoord,
    elevations: Vec<f32>,
    disposed: bool,
}

impl TerrainChunk {
    /// Sample the chunk's vertex grid from the noise field. Content depends
    /// only on `coord` and the field's seed.
    pub fn generate(coord: ChunkCoord, noise: &NoiseField) -> Self {
        let origin = coord.origin();
        let mut elevations = vec![0.0_f32; VERTS_X * VERTS_Y];
        for j in 0..VERTS_Y {
            for i in 0..VERTS_X {
                let wx = origin.x + i as f32 * CELL_WIDTH;
                let wy = origin.y + j as f32 * CELL_HEIGHT;
                elevations[j * VERTS_X + i] = noise.elevation(wx, wy);
            }
        }
        Self {
            coord,
            elevations,
            disposed: false,
        }
    }

    /// Build a chunk from explicit vertex elevations (row-major,
    /// `VERTS_X * VERTS_Y` values). Used by tests and tooling that need
    /// exact heights instead of noise.
    pub fn from_elevations(coord: ChunkCoord, elevations: Vec<f32>) -> Self {
        debug_assert_eq!(elevations.len(), VERTS_X * VERTS_Y);
        Self {
            coord,
            elevations,
            disposed: false,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn origin(&self) -> Vec2 {
        self.coord.origin()
    }

    /// Elevation of vertex `(i, j)`. Callers iterate `0..VERTS_X/Y`.
    pub fn vertex_elevation(&self, i: usize, j: usize) -> f32 {
        self.elevations[j * VERTS_X + i]
    }

    /// Bounds-checked vertex lookup for collision probes, which can ask for
    /// an out-of-grid neighbor when a position sits exactly on the far edge.
    pub fn try_vertex_elevation(&self, i: i32, j: i32) -> Option<f32> {
        if i < 0 || j < 0 || i as usize >= VERTS_X || j as usize >= VERTS_Y {
            return None;
        }
        Some(self.elevations[j as usize * VERTS_X + i as usize])
    }

    /// Mark the chunk released. Must be called exactly once, when the grid
    /// evicts it.
    pub fn dispose(&mut self) {
        debug_assert!(
            !self.disposed,
            "chunk ({}, {}) disposed twice",
            self.coord.x, self.coord.y
        );
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
