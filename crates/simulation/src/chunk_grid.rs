//! The streamed window of terrain chunks around the aircraft.
//!
//! [`ChunkGrid`] owns every loaded [`TerrainChunk`] and its paired
//! [`SkyChunk`], keyed by [`ChunkCoord`]. Each frame [`stream_chunks`]
//! recenters the grid on the aircraft: every coordinate within
//! `KEEP_RADIUS` is created if missing, then everything beyond
//! `EVICT_RADIUS` is disposed and dropped. Creation runs before eviction so
//! coverage under the aircraft never dips, and the gap between the two radii
//! keeps border crossings from thrashing chunks.

use std::collections::HashMap;

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::aircraft::Aircraft;
use crate::chunk::{ChunkCoord, TerrainChunk};
use crate::config::{EVICT_RADIUS, KEEP_RADIUS};
use crate::noise_field::NoiseField;
use crate::sim_rng::SimRng;
use crate::sky::SkyChunk;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A chunk entered the keep window and now has terrain and items. Rendering
/// reacts by building its mesh and item visuals.
#[derive(Event, Debug, Clone, Copy)]
pub struct ChunkSpawned(pub ChunkCoord);

/// A chunk left the evict window (or the world was reset) and its data is
/// gone. Rendering reacts by releasing its entities and mesh.
#[derive(Event, Debug, Clone, Copy)]
pub struct ChunkEvicted(pub ChunkCoord);

// ---------------------------------------------------------------------------
// ChunkGrid
// ---------------------------------------------------------------------------

/// What one [`ChunkGrid::resync`] call changed.
#[derive(Debug, Default)]
pub struct StreamReport {
    pub spawned: Vec<ChunkCoord>,
    pub evicted: Vec<ChunkCoord>,
}

impl StreamReport {
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.evicted.is_empty()
    }
}

/// All currently loaded chunks, terrain and sky in lockstep.
#[derive(Resource, Default)]
pub struct ChunkGrid {
    chunks: HashMap<ChunkCoord, TerrainChunk>,
    sky: HashMap<ChunkCoord, SkyChunk>,
}

impl ChunkGrid {
    /// Recenter the stream on `center`.
    ///
    /// Pass one creates every missing chunk with Chebyshev distance
    /// `<= KEEP_RADIUS`; pass two evicts every chunk with distance
    /// `> EVICT_RADIUS`. A chunk in the band between the radii is left
    /// as-is, whichever state it is in.
    pub fn resync(
        &mut self,
        center: ChunkCoord,
        noise: &NoiseField,
        rng: &mut ChaCha8Rng,
    ) -> StreamReport {
        let mut report = StreamReport::default();

        for dy in -KEEP_RADIUS..=KEEP_RADIUS {
            for dx in -KEEP_RADIUS..=KEEP_RADIUS {
                let coord = ChunkCoord::new(center.x + dx, center.y + dy);
                if self.chunks.contains_key(&coord) {
                    continue;
                }
                self.chunks.insert(coord, TerrainChunk::generate(coord, noise));
                self.sky.insert(coord, SkyChunk::populate(coord, rng));
                report.spawned.push(coord);
            }
        }

        let doomed: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .copied()
            .filter(|coord| coord.ring_distance(center) > EVICT_RADIUS)
            .collect();
        for coord in doomed {
            self.evict(coord);
            report.evicted.push(coord);
        }

        debug_assert_eq!(self.chunks.len(), self.sky.len());
        report
    }

    /// Dispose and drop every loaded chunk, returning the coordinates that
    /// were released so callers can forward [`ChunkEvicted`] events.
    pub fn reset(&mut self) -> Vec<ChunkCoord> {
        let coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        for coord in &coords {
            self.evict(*coord);
        }
        coords
    }

    fn evict(&mut self, coord: ChunkCoord) {
        if let Some(mut chunk) = self.chunks.remove(&coord) {
            chunk.dispose();
        }
        if let Some(mut sky) = self.sky.remove(&coord) {
            sky.dispose();
        }
    }

    /// Insert a prebuilt chunk pair at the chunk's coordinate, replacing any
    /// existing entry. Used by tests and tooling that need exact terrain.
    pub fn insert(&mut self, chunk: TerrainChunk, sky: SkyChunk) {
        let coord = chunk.coord();
        if let Some(mut old) = self.chunks.remove(&coord) {
            old.dispose();
        }
        if let Some(mut old) = self.sky.remove(&coord) {
            old.dispose();
        }
        self.chunks.insert(coord, chunk);
        self.sky.insert(coord, sky);
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&TerrainChunk> {
        self.chunks.get(&coord)
    }

    pub fn sky(&self, coord: ChunkCoord) -> Option<&SkyChunk> {
        self.sky.get(&coord)
    }

    pub fn sky_mut(&mut self, coord: ChunkCoord) -> Option<&mut SkyChunk> {
        self.sky.get_mut(&coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Recenter the grid on the aircraft every frame and forward what changed as
/// events.
pub fn stream_chunks(
    aircraft: Res<Aircraft>,
    noise: Res<NoiseField>,
    mut rng: ResMut<SimRng>,
    mut grid: ResMut<ChunkGrid>,
    mut spawned: EventWriter<ChunkSpawned>,
    mut evicted: EventWriter<ChunkEvicted>,
) {
    let center = ChunkCoord::from_world(aircraft.position.x, aircraft.position.y);
    let report = grid.resync(center, &noise, &mut rng.0);
    for coord in report.spawned {
        spawned.send(ChunkSpawned(coord));
    }
    for coord in report.evicted {
        evicted.send(ChunkEvicted(coord));
    }
}

/// Clear the previous run's chunks when a new run starts. The next
/// [`stream_chunks`] pass rebuilds the window at the spawn point.
pub fn reset_grid(mut grid: ResMut<ChunkGrid>, mut evicted: EventWriter<ChunkEvicted>) {
    for coord in grid.reset() {
        evicted.send(ChunkEvicted(coord));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn world() -> (ChunkGrid, NoiseField, ChaCha8Rng) {
        (
            ChunkGrid::default(),
            NoiseField::from_seed(42),
            ChaCha8Rng::seed_from_u64(42),
        )
    }

    fn keep_window(center: ChunkCoord) -> Vec<ChunkCoord> {
        let mut coords = Vec::new();
        for dy in -KEEP_RADIUS..=KEEP_RADIUS {
            for dx in -KEEP_RADIUS..=KEEP_RADIUS {
                coords.push(ChunkCoord::new(center.x + dx, center.y + dy));
            }
        }
        coords
    }

    #[test]
    fn test_resync_fills_keep_window() {
        let (mut grid, noise, mut rng) = world();
        let center = ChunkCoord::new(0, 0);
        let report = grid.resync(center, &noise, &mut rng);

        let side = (2 * KEEP_RADIUS + 1) as usize;
        assert_eq!(report.spawned.len(), side * side);
        assert!(report.evicted.is_empty());
        for coord in keep_window(center) {
            assert!(grid.contains(coord), "missing {coord:?}");
            assert!(grid.sky(coord).is_some(), "missing sky for {coord:?}");
        }
    }

    #[test]
    fn test_resync_is_idempotent_when_stationary() {
        let (mut grid, noise, mut rng) = world();
        let center = ChunkCoord::new(3, -2);
        grid.resync(center, &noise, &mut rng);
        let second = grid.resync(center, &noise, &mut rng);
        assert!(second.is_empty());
    }

    #[test]
    fn test_coverage_holds_along_a_flight_path() {
        let (mut grid, noise, mut rng) = world();
        // Wander across chunk borders, including into negative coordinates.
        let path = [
            (0, 0),
            (1, 0),
            (1, 1),
            (0, 1),
            (-1, 1),
            (-2, 0),
            (-2, -1),
            (-1, -2),
            (0, -2),
            (4, -2),
        ];
        for (x, y) in path {
            let center = ChunkCoord::new(x, y);
            grid.resync(center, &noise, &mut rng);
            for coord in keep_window(center) {
                assert!(grid.contains(coord), "gap at {coord:?} centered {center:?}");
            }
            // Nothing outside the evict window survives.
            for coord in grid.coords() {
                assert!(coord.ring_distance(center) <= EVICT_RADIUS);
            }
        }
    }

    #[test]
    fn test_eviction_waits_for_the_larger_radius() {
        let (mut grid, noise, mut rng) = world();
        grid.resync(ChunkCoord::new(0, 0), &noise, &mut rng);
        let trailing = ChunkCoord::new(-KEEP_RADIUS, 0);
        assert!(grid.contains(trailing));

        // One chunk forward: trailing chunk is outside the keep window but
        // still inside the evict window, so it stays loaded.
        let report = grid.resync(ChunkCoord::new(1, 0), &noise, &mut rng);
        assert!(grid.contains(trailing));
        assert!(!report.evicted.contains(&trailing));

        // Another chunk forward pushes it past EVICT_RADIUS.
        let report = grid.resync(ChunkCoord::new(2, 0), &noise, &mut rng);
        assert!(!grid.contains(trailing));
        assert!(report.evicted.contains(&trailing));
        assert!(grid.sky(trailing).is_none());
    }

    #[test]
    fn test_eviction_clears_both_maps() {
        let (mut grid, noise, mut rng) = world();
        grid.resync(ChunkCoord::new(0, 0), &noise, &mut rng);
        // Jump far enough that the entire old window is evicted.
        let report = grid.resync(ChunkCoord::new(100, 100), &noise, &mut rng);
        for coord in report.evicted {
            assert!(grid.chunk(coord).is_none());
            assert!(grid.sky(coord).is_none());
        }
        let side = (2 * KEEP_RADIUS + 1) as usize;
        assert_eq!(grid.len(), side * side);
    }

    #[test]
    fn test_reset_releases_everything() {
        let (mut grid, noise, mut rng) = world();
        grid.resync(ChunkCoord::new(5, 5), &noise, &mut rng);
        let loaded: Vec<ChunkCoord> = grid.coords().collect();
        assert!(!loaded.is_empty());

        let released = grid.reset();
        assert!(grid.is_empty());
        assert_eq!(released.len(), loaded.len());
        for coord in loaded {
            assert!(released.contains(&coord));
        }
    }

    #[test]
    fn test_chunk_content_is_deterministic_across_grids() {
        // Two grids with the same seed walking the same path hold identical
        // terrain, whatever order chunks were created in.
        let (mut a, noise_a, mut rng_a) = world();
        let (mut b, noise_b, mut rng_b) = world();
        a.resync(ChunkCoord::new(0, 0), &noise_a, &mut rng_a);
        a.resync(ChunkCoord::new(1, 0), &noise_a, &mut rng_a);
        b.resync(ChunkCoord::new(0, 0), &noise_b, &mut rng_b);
        b.resync(ChunkCoord::new(1, 0), &noise_b, &mut rng_b);

        for coord in a.coords() {
            let (ca, cb) = (a.chunk(coord).unwrap(), b.chunk(coord).unwrap());
            for j in 0..crate::chunk::VERTS_Y {
                for i in 0..crate::chunk::VERTS_X {
                    assert_eq!(ca.vertex_elevation(i, j), cb.vertex_elevation(i, j));
                }
            }
        }
    }
}
