//! Collectible items floating above the terrain.
//!
//! Every chunk owns a [`SkyChunk`]: a batch of items scattered in a band
//! above the terrain ceiling when the chunk is created, and released with it
//! when the chunk is evicted. Item placement draws from [`SimRng`], so a
//! seed reproduces the same skies.
//!
//! [`SimRng`]: crate::sim_rng::SimRng

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::chunk::ChunkCoord;
use crate::config::{CHUNK_HEIGHT, CHUNK_WIDTH, SKY_BAND, SKY_FLOOR};

// ---------------------------------------------------------------------------
// Item kinds
// ---------------------------------------------------------------------------

/// The collectible kinds, each with its own spawn density, pickup radius,
/// and score effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Tops up the tank. Large pickup radius so runs aren't lost to a
    /// near-miss on the one thing that extends them.
    Fuel,
    Water,
    Donut,
    /// Doubles the current score.
    Burger,
}

/// What colliding with an item does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PickupEffect {
    /// Add fuel, clamped to the tank cap.
    Refuel(f32),
    /// Add points.
    Points(u64),
    /// Double the current points.
    DoublePoints,
}

/// Static tuning for one item kind.
#[derive(Debug, Clone, Copy)]
pub struct ItemStats {
    /// Fewest of this kind spawned per chunk.
    pub min_count: u32,
    /// Most of this kind spawned per chunk.
    pub max_count: u32,
    /// Collection distance from the aircraft, in world units.
    pub radius: f32,
    pub effect: PickupEffect,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Fuel,
        ItemKind::Water,
        ItemKind::Donut,
        ItemKind::Burger,
    ];

    pub const fn stats(self) -> ItemStats {
        match self {
            ItemKind::Fuel => ItemStats {
                min_count: 3,
                max_count: 6,
                radius: 4000.0,
                effect: PickupEffect::Refuel(10.0),
            },
            ItemKind::Water => ItemStats {
                min_count: 5,
                max_count: 10,
                radius: 2000.0,
                effect: PickupEffect::Points(100),
            },
            ItemKind::Donut => ItemStats {
                min_count: 2,
                max_count: 5,
                radius: 2000.0,
                effect: PickupEffect::Points(500),
            },
            ItemKind::Burger => ItemStats {
                min_count: 1,
                max_count: 3,
                radius: 2000.0,
                effect: PickupEffect::DoublePoints,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// SkyChunk
// ---------------------------------------------------------------------------

/// One live collectible.
#[derive(Debug, Clone)]
pub struct SkyItem {
    pub kind: ItemKind,
    /// World position; `z` is altitude.
    pub position: Vec3,
    /// Set on pickup. A collected item never collides or renders again.
    pub collected: bool,
}

/// The items spawned over one chunk. Created and evicted in lockstep with
/// the chunk's [`TerrainChunk`](crate::chunk::TerrainChunk).
pub struct SkyChunk {
    items: Vec<SkyItem>,
    disposed: bool,
}

impl SkyChunk {
    /// Scatter a fresh batch of items over `coord`, between `SKY_FLOOR` and
    /// `SKY_FLOOR + SKY_BAND` in altitude.
    pub fn populate(coord: ChunkCoord, rng: &mut ChaCha8Rng) -> Self {
        let origin = coord.origin();
        let mut items = Vec::new();
        for kind in ItemKind::ALL {
            let stats = kind.stats();
            let count = rng.gen_range(stats.min_count..=stats.max_count);
            for _ in 0..count {
                let position = Vec3::new(
                    origin.x + rng.gen_range(0.0..CHUNK_WIDTH),
                    origin.y + rng.gen_range(0.0..CHUNK_HEIGHT),
                    SKY_FLOOR + rng.gen_range(0.0..SKY_BAND),
                );
                items.push(SkyItem {
                    kind,
                    position,
                    collected: false,
                });
            }
        }
        Self {
            items,
            disposed: false,
        }
    }

    /// Build a batch from explicit items. Used by tests and tooling that
    /// need items at exact positions.
    pub fn from_items(items: Vec<SkyItem>) -> Self {
        Self {
            items,
            disposed: false,
        }
    }

    /// Add one item to the batch.
    pub fn push(&mut self, item: SkyItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[SkyItem] {
        &self.items
    }

    /// Uncollected items with their slot index, the key rendering uses to
    /// pair visuals with sim items.
    pub fn live_items(&self) -> impl Iterator<Item = (usize, &SkyItem)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.collected)
    }

    /// Collect every live item within its kind's pickup radius of `position`.
    /// Each item can be collected once; later sweeps skip it.
    pub fn collect_at(&mut self, position: Vec3) -> Vec<ItemKind> {
        let mut picked = Vec::new();
        for item in &mut self.items {
            if item.collected {
                continue;
            }
            let radius = item.kind.stats().radius;
            if item.position.distance_squared(position) <= radius * radius {
                item.collected = true;
                picked.push(item.kind);
            }
        }
        picked
    }

    /// Mark the batch released. Must be called exactly once, when the grid
    /// evicts the owning chunk.
    pub fn dispose(&mut self) {
        debug_assert!(!self.disposed, "sky chunk disposed twice");
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_stats_counts_are_ordered() {
        for kind in ItemKind::ALL {
            let stats = kind.stats();
            assert!(stats.min_count <= stats.max_count, "{kind:?}");
            assert!(stats.radius > 0.0, "{kind:?}");
        }
    }

    #[test]
    fn test_populate_spawns_within_count_ranges() {
        let sky = SkyChunk::populate(ChunkCoord::new(2, -1), &mut rng(9));
        for kind in ItemKind::ALL {
            let stats = kind.stats();
            let count = sky.items().iter().filter(|i| i.kind == kind).count() as u32;
            assert!(
                (stats.min_count..=stats.max_count).contains(&count),
                "{kind:?} spawned {count}, expected {}..={}",
                stats.min_count,
                stats.max_count
            );
        }
    }

    #[test]
    fn test_populate_stays_inside_chunk_and_band() {
        let coord = ChunkCoord::new(-3, 4);
        let origin = coord.origin();
        let sky = SkyChunk::populate(coord, &mut rng(11));
        for item in sky.items() {
            assert!(item.position.x >= origin.x && item.position.x < origin.x + CHUNK_WIDTH);
            assert!(item.position.y >= origin.y && item.position.y < origin.y + CHUNK_HEIGHT);
            assert!(item.position.z >= SKY_FLOOR && item.position.z < SKY_FLOOR + SKY_BAND);
        }
    }

    #[test]
    fn test_populate_is_deterministic_per_rng_state() {
        let a = SkyChunk::populate(ChunkCoord::new(0, 0), &mut rng(5));
        let b = SkyChunk::populate(ChunkCoord::new(0, 0), &mut rng(5));
        assert_eq!(a.items().len(), b.items().len());
        for (x, y) in a.items().iter().zip(b.items()) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn test_collect_at_is_single_use() {
        let mut sky = SkyChunk::populate(ChunkCoord::new(0, 0), &mut rng(3));
        let target = sky.items()[0].position;
        let first = sky.collect_at(target);
        assert!(!first.is_empty());
        // Same spot again: everything in range is already collected.
        let second = sky.collect_at(target);
        assert!(second.is_empty());
    }

    #[test]
    fn test_collect_at_respects_radius() {
        let mut sky = SkyChunk::populate(ChunkCoord::new(0, 0), &mut rng(3));
        // Probe from far outside the chunk's airspace: nothing in range.
        let far = Vec3::new(-1_000_000.0, -1_000_000.0, 0.0);
        assert!(sky.collect_at(far).is_empty());
        // Live items unchanged.
        assert_eq!(sky.live_items().count(), sky.items().len());
    }

    #[test]
    fn test_live_items_excludes_collected() {
        let mut sky = SkyChunk::populate(ChunkCoord::new(0, 0), &mut rng(8));
        let total = sky.items().len();
        let target = sky.items()[0].position;
        let picked = sky.collect_at(target).len();
        assert!(picked >= 1);
        assert_eq!(sky.live_items().count(), total - picked);
    }

    #[test]
    fn test_dispose_marks_the_batch_released() {
        let mut sky = SkyChunk::populate(ChunkCoord::new(0, 0), &mut rng(1));
        assert!(!sky.is_disposed());
        sky.dispose();
        assert!(sky.is_disposed());
    }

    #[test]
    #[should_panic(expected = "disposed twice")]
    fn test_double_dispose_panics_in_debug() {
        let mut sky = SkyChunk::populate(ChunkCoord::new(0, 0), &mut rng(1));
        sky.dispose();
        sky.dispose();
    }
}
