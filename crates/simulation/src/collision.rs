//! Point-vs-world collision: the terrain surface and the item sweep.
//!
//! The ground test finds the heightfield triangle under the aircraft and
//! interpolates its surface height with barycentric weights; the aircraft
//! has hit the ground when that height reaches its altitude. The item sweep
//! asks the owning chunk's [`SkyChunk`] for everything within pickup range.
//! Both run once per frame in [`detect_collisions`], which routes the
//! results as [`CollisionEvent`]s.
//!
//! Probes outside loaded terrain can only happen transiently (the stream
//! recenters every frame before collision runs); they log a warning and
//! report no collision rather than panicking.

use bevy::prelude::*;

use crate::aircraft::Aircraft;
use crate::chunk::{ChunkCoord, TerrainChunk};
use crate::chunk_grid::ChunkGrid;
use crate::config::{CELL_HEIGHT, CELL_WIDTH};
use crate::sky::ItemKind;

/// One collision found this frame.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum CollisionEvent {
    /// The aircraft met the terrain surface. Ends the run.
    Ground,
    /// The aircraft swept up an item.
    Item(ItemKind),
}

// ---------------------------------------------------------------------------
// Ground test
// ---------------------------------------------------------------------------

/// Terrain surface height under a world position, or `None` when the
/// position is outside loaded terrain (or a lookup degenerates at a chunk's
/// far edge).
pub fn ground_height(grid: &ChunkGrid, x: f32, y: f32) -> Option<f32> {
    let coord = ChunkCoord::from_world(x, y);
    let Some(chunk) = grid.chunk(coord) else {
        warn!("ground probe at ({x:.0}, {y:.0}) is outside loaded terrain");
        return None;
    };

    let origin = chunk.origin();
    let fx = (x - origin.x) / CELL_WIDTH;
    let fy = (y - origin.y) / CELL_HEIGHT;
    let (cell_i, cell_j) = (fx.floor(), fy.floor());
    let (frac_x, frac_y) = (fx - cell_i, fy - cell_j);
    let (ci, cj) = (cell_i as i32, cell_j as i32);

    // The cell's diagonal runs corner (ci, cj) -> (ci+1, cj+1); the
    // fractional offsets pick a side. The mesh builder splits cells along
    // the same diagonal, so probes agree with the rendered surface.
    let (va, vb, vc) = if frac_x > frac_y {
        ((ci, cj), (ci + 1, cj), (ci + 1, cj + 1))
    } else {
        ((ci, cj), (ci + 1, cj + 1), (ci, cj + 1))
    };

    let (Some(a), Some(b), Some(c)) = (
        corner(chunk, origin, va),
        corner(chunk, origin, vb),
        corner(chunk, origin, vc),
    ) else {
        warn!("ground probe at ({x:.0}, {y:.0}) landed on a degenerate cell");
        return None;
    };

    barycentric_height(Vec2::new(x, y), a, b, c)
}

/// True when the terrain surface under `position` reaches its altitude.
pub fn ground_hit(grid: &ChunkGrid, position: Vec3) -> bool {
    ground_height(grid, position.x, position.y).is_some_and(|h| h >= position.z)
}

fn corner(chunk: &TerrainChunk, origin: Vec2, v: (i32, i32)) -> Option<(Vec2, f32)> {
    let z = chunk.try_vertex_elevation(v.0, v.1)?;
    let pos = origin + Vec2::new(v.0 as f32 * CELL_WIDTH, v.1 as f32 * CELL_HEIGHT);
    Some((pos, z))
}

/// Height of the triangle's surface under `p`, by barycentric interpolation
/// of the corner heights. `None` when `p` is outside the triangle or the
/// triangle has no area.
///
/// Corners may arrive in either winding; a clockwise triangle is rewound by
/// swapping its last two corners so the edge-function signs agree.
pub fn barycentric_height(p: Vec2, a: (Vec2, f32), b: (Vec2, f32), c: (Vec2, f32)) -> Option<f32> {
    let (pa, za) = a;
    let (mut pb, mut zb) = b;
    let (mut pc, mut zc) = c;
    if edge(pa, pb, pc) < 0.0 {
        std::mem::swap(&mut pb, &mut pc);
        std::mem::swap(&mut zb, &mut zc);
    }

    // Each corner's weight is the edge function of the opposite edge.
    let wa = edge(pb, pc, p);
    let wb = edge(pc, pa, p);
    let wc = edge(pa, pb, p);
    if wa < 0.0 || wb < 0.0 || wc < 0.0 {
        return None;
    }
    let sum = wa + wb + wc;
    if sum <= 0.0 {
        return None;
    }
    Some((za * wa + zb * wb + zc * wc) / sum)
}

/// Edge function: twice the signed area of (v0, v1, p), positive when `p`
/// lies on the counter-clockwise side of v0 -> v1.
fn edge(v0: Vec2, v1: Vec2, p: Vec2) -> f32 {
    (v0.y - v1.y) * p.x + (v1.x - v0.x) * p.y + (v0.x * v1.y - v0.y * v1.x)
}

// ---------------------------------------------------------------------------
// Item sweep
// ---------------------------------------------------------------------------

/// Collect every live item in range of `position`, marking each collected.
/// Only the chunk containing the position is swept; pickup radii are well
/// under the chunk extent.
pub fn collect_items(grid: &mut ChunkGrid, position: Vec3) -> Vec<ItemKind> {
    let coord = ChunkCoord::from_world(position.x, position.y);
    match grid.sky_mut(coord) {
        Some(sky) => sky.collect_at(position),
        None => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Probe the world at the aircraft's position and route the results.
/// A frame that both crashes and collects resolves as a crash: the ground
/// test runs first and suppresses the sweep.
pub fn detect_collisions(
    aircraft: Res<Aircraft>,
    mut grid: ResMut<ChunkGrid>,
    mut events: EventWriter<CollisionEvent>,
) {
    let position = aircraft.position;
    if ground_hit(&grid, position) {
        events.send(CollisionEvent::Ground);
        return;
    }
    for kind in collect_items(&mut grid, position) {
        events.send(CollisionEvent::Item(kind));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{VERTS_X, VERTS_Y};
    use crate::sky::{SkyChunk, SkyItem};

    /// Chunk (0,0) with every vertex at `height`.
    fn flat_chunk(height: f32) -> TerrainChunk {
        TerrainChunk::from_elevations(
            ChunkCoord::new(0, 0),
            vec![height; VERTS_X * VERTS_Y],
        )
    }

    /// Chunk (0,0) where vertex (i, j) has elevation `f(i, j)`.
    fn shaped_chunk(f: impl Fn(usize, usize) -> f32) -> TerrainChunk {
        let mut elevations = vec![0.0; VERTS_X * VERTS_Y];
        for j in 0..VERTS_Y {
            for i in 0..VERTS_X {
                elevations[j * VERTS_X + i] = f(i, j);
            }
        }
        TerrainChunk::from_elevations(ChunkCoord::new(0, 0), elevations)
    }

    fn grid_with(chunk: TerrainChunk) -> ChunkGrid {
        let mut grid = ChunkGrid::default();
        grid.insert(chunk, SkyChunk::from_items(Vec::new()));
        grid
    }

    // -- barycentric_height --------------------------------------------------

    #[test]
    fn test_barycentric_recovers_linear_surface() {
        // A plane z = 2x + 3y + 10 should be reproduced exactly.
        let z = |x: f32, y: f32| 2.0 * x + 3.0 * y + 10.0;
        let a = (Vec2::new(0.0, 0.0), z(0.0, 0.0));
        let b = (Vec2::new(4.0, 0.0), z(4.0, 0.0));
        let c = (Vec2::new(0.0, 4.0), z(0.0, 4.0));
        let h = barycentric_height(Vec2::new(1.0, 1.0), a, b, c).unwrap();
        assert!((h - z(1.0, 1.0)).abs() < 1e-4);
    }

    #[test]
    fn test_barycentric_weights_normalize() {
        // Constant corner heights interpolate to that constant anywhere
        // inside, which only holds if the weights sum to one.
        let a = (Vec2::new(-3.0, 1.0), 7.5);
        let b = (Vec2::new(5.0, 2.0), 7.5);
        let c = (Vec2::new(1.0, 9.0), 7.5);
        for p in [
            Vec2::new(1.0, 4.0),
            Vec2::new(0.0, 3.0),
            Vec2::new(2.0, 5.0),
        ] {
            let h = barycentric_height(p, a, b, c).unwrap();
            assert!((h - 7.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_barycentric_at_corner_returns_corner_height() {
        let a = (Vec2::new(0.0, 0.0), 11.0);
        let b = (Vec2::new(6.0, 0.0), 22.0);
        let c = (Vec2::new(0.0, 6.0), 33.0);
        let h = barycentric_height(a.0, a, b, c).unwrap();
        assert!((h - 11.0).abs() < 1e-4);
    }

    #[test]
    fn test_barycentric_rejects_outside_points() {
        let a = (Vec2::new(0.0, 0.0), 1.0);
        let b = (Vec2::new(4.0, 0.0), 1.0);
        let c = (Vec2::new(0.0, 4.0), 1.0);
        assert!(barycentric_height(Vec2::new(5.0, 5.0), a, b, c).is_none());
        assert!(barycentric_height(Vec2::new(-0.5, 1.0), a, b, c).is_none());
    }

    #[test]
    fn test_barycentric_accepts_clockwise_winding() {
        let a = (Vec2::new(0.0, 0.0), 0.0);
        let b = (Vec2::new(4.0, 0.0), 4.0);
        let c = (Vec2::new(0.0, 4.0), 8.0);
        let p = Vec2::new(1.0, 1.0);
        let ccw = barycentric_height(p, a, b, c).unwrap();
        // Same triangle listed clockwise.
        let cw = barycentric_height(p, a, c, b).unwrap();
        assert!((ccw - cw).abs() < 1e-4);
    }

    #[test]
    fn test_barycentric_rejects_degenerate_triangle() {
        let a = (Vec2::new(0.0, 0.0), 1.0);
        let b = (Vec2::new(1.0, 1.0), 2.0);
        let c = (Vec2::new(2.0, 2.0), 3.0);
        assert!(barycentric_height(Vec2::new(1.0, 1.0), a, b, c).is_none());
    }

    // -- ground_height / ground_hit ------------------------------------------

    #[test]
    fn test_flat_chunk_reports_its_height_everywhere() {
        let grid = grid_with(flat_chunk(100.0));
        for (x, y) in [
            (10.0, 10.0),
            (CELL_WIDTH * 0.75, CELL_HEIGHT * 0.25),
            (CELL_WIDTH * 3.2, CELL_HEIGHT * 7.9),
        ] {
            let h = ground_height(&grid, x, y).unwrap();
            assert!((h - 100.0).abs() < 1e-3, "height {h} at ({x}, {y})");
        }
    }

    #[test]
    fn test_ground_hit_compares_height_to_altitude() {
        let grid = grid_with(flat_chunk(100.0));
        let over = Vec3::new(50.0, 50.0, 101.0);
        let under = Vec3::new(50.0, 50.0, 99.0);
        let grazing = Vec3::new(50.0, 50.0, 100.0);
        assert!(!ground_hit(&grid, over));
        assert!(ground_hit(&grid, under));
        // Exactly touching counts as a hit.
        assert!(ground_hit(&grid, grazing));
    }

    #[test]
    fn test_sea_level_chunk_catches_zero_altitude() {
        // All-zero terrain: flying at z = 0 anywhere over the footprint is a
        // hit, any positive altitude is clear.
        let grid = grid_with(flat_chunk(0.0));
        let x = CELL_WIDTH * 4.5;
        let y = CELL_HEIGHT * 2.25;
        assert!(ground_hit(&grid, Vec3::new(x, y, 0.0)));
        assert!(!ground_hit(&grid, Vec3::new(x, y, 1.0)));
    }

    #[test]
    fn test_lower_right_triangle_interpolation() {
        // Cell (0,0) with corners z(0,0)=0, z(1,0)=100, z(1,1)=200: the
        // lower-right triangle's surface is z = 100*(x/w) + 100*(y/h).
        let chunk = shaped_chunk(|i, j| match (i, j) {
            (1, 0) => 100.0,
            (1, 1) => 200.0,
            _ => 0.0,
        });
        let grid = grid_with(chunk);
        // frac_x = 0.5 > frac_y = 0.25 picks the lower-right side.
        let h = ground_height(&grid, CELL_WIDTH * 0.5, CELL_HEIGHT * 0.25).unwrap();
        assert!((h - 75.0).abs() < 1e-2, "got {h}");
    }

    #[test]
    fn test_upper_left_triangle_interpolation() {
        // Corners z(0,0)=0, z(1,1)=200, z(0,1)=40: the upper-left
        // triangle's surface is z = 160*(x/w) + 40*(y/h), so the probe at
        // (0.25w, 0.5h) should read 40 + 20 = 60.
        let chunk = shaped_chunk(|i, j| match (i, j) {
            (1, 1) => 200.0,
            (0, 1) => 40.0,
            _ => 0.0,
        });
        let grid = grid_with(chunk);
        // frac_x = 0.25 < frac_y = 0.5 picks the upper-left side.
        let h = ground_height(&grid, CELL_WIDTH * 0.25, CELL_HEIGHT * 0.5).unwrap();
        assert!((h - 60.0).abs() < 1e-2, "got {h}");
    }

    #[test]
    fn test_probe_outside_loaded_terrain_is_no_collision() {
        let grid = ChunkGrid::default();
        assert!(ground_height(&grid, 123.0, 456.0).is_none());
        assert!(!ground_hit(&grid, Vec3::new(123.0, 456.0, -1000.0)));
    }

    #[test]
    fn test_probe_next_to_missing_neighbor_is_no_collision() {
        // Only chunk (0,0) is loaded; a probe just past its far edge maps to
        // chunk (1,0) and must recover as no-collision.
        let grid = grid_with(flat_chunk(100.0));
        let x = crate::config::CHUNK_WIDTH;
        assert!(ground_height(&grid, x, 50.0).is_none());
        assert!(!ground_hit(&grid, Vec3::new(x, 50.0, 0.0)));
    }

    #[test]
    fn test_probe_in_far_cell_of_chunk() {
        // The last cell before the far corner still interpolates from real
        // vertices (the +1 lookups stay inside the vertex grid).
        let grid = grid_with(flat_chunk(42.0));
        let x = crate::config::CHUNK_WIDTH - CELL_WIDTH * 0.5;
        let y = crate::config::CHUNK_HEIGHT - CELL_HEIGHT * 0.25;
        let h = ground_height(&grid, x, y).unwrap();
        assert!((h - 42.0).abs() < 1e-3);
    }

    // -- collect_items --------------------------------------------------------

    #[test]
    fn test_collect_items_sweeps_owning_chunk_once() {
        let mut grid = ChunkGrid::default();
        let position = Vec3::new(600.0, 700.0, 4000.0);
        grid.insert(
            flat_chunk(0.0),
            SkyChunk::from_items(vec![SkyItem {
                kind: ItemKind::Donut,
                position,
                collected: false,
            }]),
        );
        assert_eq!(collect_items(&mut grid, position), vec![ItemKind::Donut]);
        assert!(collect_items(&mut grid, position).is_empty());
    }

    #[test]
    fn test_collect_items_without_sky_chunk_is_empty() {
        let mut grid = ChunkGrid::default();
        assert!(collect_items(&mut grid, Vec3::new(0.0, 0.0, 4000.0)).is_empty());
    }
}
