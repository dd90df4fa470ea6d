//! Visuals for the floating collectibles.
//!
//! Each live [`SkyItem`] gets a root entity tagged [`ItemVisual`] with the
//! item's chunk coordinate and slot, and mesh children underneath. The sim
//! owns the item state; [`sync_item_visuals`] replays it into the scene
//! every frame, so a collected or evicted item disappears without the sim
//! knowing entities exist.

use std::collections::HashSet;

use bevy::prelude::*;

use simulation::chunk::ChunkCoord;
use simulation::chunk_grid::{ChunkEvicted, ChunkGrid, ChunkSpawned};
use simulation::sky::{ItemKind, SkyItem};

use crate::to_render;

/// Spin rate of an item about its vertical axis, radians per second.
const ITEM_SPIN_RATE: f32 = 6.0;

/// Root entity of one item's visual; `slot` indexes into the owning
/// [`SkyChunk`](simulation::sky::SkyChunk)'s item list.
#[derive(Component)]
pub struct ItemVisual {
    pub coord: ChunkCoord,
    pub slot: usize,
}

/// Shared meshes and materials for every item kind, built once at startup.
#[derive(Resource)]
pub struct ItemAssets {
    pub fuel_mesh: Handle<Mesh>,
    pub fuel_material: Handle<StandardMaterial>,
    pub water_mesh: Handle<Mesh>,
    pub water_material: Handle<StandardMaterial>,
    pub donut_mesh: Handle<Mesh>,
    pub donut_material: Handle<StandardMaterial>,
    pub bun_mesh: Handle<Mesh>,
    pub bun_material: Handle<StandardMaterial>,
    pub patty_mesh: Handle<Mesh>,
    pub patty_material: Handle<StandardMaterial>,
}

pub fn setup_item_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(ItemAssets {
        // Fuel: a red jerry can.
        fuel_mesh: meshes.add(Cuboid::new(140.0, 200.0, 140.0)),
        fuel_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.82, 0.16, 0.12),
            perceptual_roughness: 0.5,
            ..default()
        }),
        // Water: a blue capsule droplet.
        water_mesh: meshes.add(Capsule3d::new(90.0, 160.0)),
        water_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.25, 0.55, 0.95),
            perceptual_roughness: 0.2,
            ..default()
        }),
        // Donut: a flat torus with pink frosting.
        donut_mesh: meshes.add(Torus {
            minor_radius: 60.0,
            major_radius: 160.0,
        }),
        donut_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.91, 0.45, 0.62),
            perceptual_roughness: 0.6,
            ..default()
        }),
        // Burger: two bun cylinders around a patty.
        bun_mesh: meshes.add(Cylinder::new(160.0, 55.0)),
        bun_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.85, 0.62, 0.30),
            perceptual_roughness: 0.8,
            ..default()
        }),
        patty_mesh: meshes.add(Cylinder::new(150.0, 45.0)),
        patty_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.42, 0.26, 0.15),
            perceptual_roughness: 0.9,
            ..default()
        }),
    });
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Keep item visuals matched to the sim: drop visuals of evicted chunks and
/// collected items, then spawn visuals for chunks that appeared this frame.
pub fn sync_item_visuals(
    mut commands: Commands,
    mut spawned: EventReader<ChunkSpawned>,
    mut evicted: EventReader<ChunkEvicted>,
    grid: Res<ChunkGrid>,
    assets: Res<ItemAssets>,
    visuals: Query<(Entity, &ItemVisual)>,
) {
    let gone: HashSet<ChunkCoord> = evicted.read().map(|event| event.0).collect();
    for (entity, visual) in &visuals {
        if gone.contains(&visual.coord) {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        let collected = grid
            .sky(visual.coord)
            .and_then(|sky| sky.items().get(visual.slot))
            .map_or(true, |item| item.collected);
        if collected {
            commands.entity(entity).despawn_recursive();
        }
    }

    for ChunkSpawned(coord) in spawned.read() {
        let Some(sky) = grid.sky(*coord) else {
            continue;
        };
        for (slot, item) in sky.live_items() {
            spawn_item_visual(&mut commands, &assets, *coord, slot, item);
        }
    }
}

fn spawn_item_visual(
    commands: &mut Commands,
    assets: &ItemAssets,
    coord: ChunkCoord,
    slot: usize,
    item: &SkyItem,
) {
    let root = commands
        .spawn((
            ItemVisual { coord, slot },
            Transform::from_translation(to_render(item.position)),
            Visibility::default(),
        ))
        .id();

    let mut part = |mesh: &Handle<Mesh>, material: &Handle<StandardMaterial>, offset: f32| {
        commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_xyz(0.0, offset, 0.0),
                Visibility::default(),
            ))
            .set_parent(root);
    };

    match item.kind {
        ItemKind::Fuel => part(&assets.fuel_mesh, &assets.fuel_material, 0.0),
        ItemKind::Water => part(&assets.water_mesh, &assets.water_material, 0.0),
        ItemKind::Donut => part(&assets.donut_mesh, &assets.donut_material, 0.0),
        ItemKind::Burger => {
            part(&assets.bun_mesh, &assets.bun_material, -55.0);
            part(&assets.patty_mesh, &assets.patty_material, 0.0);
            part(&assets.bun_mesh, &assets.bun_material, 55.0);
        }
    }
}

/// Slow turntable spin so items read as pickups from a distance.
pub fn spin_item_visuals(time: Res<Time>, mut visuals: Query<&mut Transform, With<ItemVisual>>) {
    let angle = ITEM_SPIN_RATE * time.delta_secs();
    for mut transform in &mut visuals {
        transform.rotate_y(angle);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use simulation::chunk::TerrainChunk;
    use simulation::noise_field::NoiseField;
    use simulation::sky::SkyChunk;

    fn test_items(coord: ChunkCoord) -> Vec<SkyItem> {
        let origin = coord.origin();
        let at = |dx: f32, dy: f32, kind: ItemKind| SkyItem {
            kind,
            position: Vec3::new(origin.x + dx, origin.y + dy, 4000.0),
            collected: false,
        };
        vec![
            at(1_000.0, 1_000.0, ItemKind::Water),
            at(5_000.0, 2_000.0, ItemKind::Donut),
            at(2_000.0, 8_000.0, ItemKind::Burger),
            at(9_000.0, 9_000.0, ItemKind::Fuel),
        ]
    }

    fn harness() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(Assets::<Mesh>::default())
            .insert_resource(Assets::<StandardMaterial>::default())
            .insert_resource(ChunkGrid::default())
            .add_event::<ChunkSpawned>()
            .add_event::<ChunkEvicted>()
            .add_systems(Startup, setup_item_assets)
            .add_systems(Update, sync_item_visuals);
        app
    }

    fn load_chunk(app: &mut App, coord: ChunkCoord, items: Vec<SkyItem>) {
        let noise = NoiseField::from_seed(1);
        let mut grid = app.world_mut().resource_mut::<ChunkGrid>();
        grid.insert(
            TerrainChunk::generate(coord, &noise),
            SkyChunk::from_items(items),
        );
        app.world_mut().send_event(ChunkSpawned(coord));
    }

    fn visual_count(app: &mut App) -> usize {
        app.world_mut()
            .query::<&ItemVisual>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn test_spawned_chunk_gets_one_visual_per_live_item() {
        let mut app = harness();
        let coord = ChunkCoord::new(0, 0);
        let items = test_items(coord);
        let expected = items.len();
        load_chunk(&mut app, coord, items);
        app.update();
        assert_eq!(visual_count(&mut app), expected);
    }

    #[test]
    fn test_spawn_skips_items_already_collected() {
        let mut app = harness();
        let coord = ChunkCoord::new(1, -1);
        let mut items = test_items(coord);
        items[0].collected = true;
        let expected = items.len() - 1;
        load_chunk(&mut app, coord, items);
        app.update();
        assert_eq!(visual_count(&mut app), expected);
    }

    #[test]
    fn test_collected_item_visual_is_dropped() {
        let mut app = harness();
        let coord = ChunkCoord::new(0, 0);
        load_chunk(&mut app, coord, test_items(coord));
        app.update();
        let before = visual_count(&mut app);

        let mut grid = app.world_mut().resource_mut::<ChunkGrid>();
        let position = grid.sky(coord).unwrap().items()[0].position;
        grid.sky_mut(coord).unwrap().collect_at(position);
        app.update();
        assert_eq!(visual_count(&mut app), before - 1);
    }

    #[test]
    fn test_evicted_chunk_clears_its_visuals() {
        let mut app = harness();
        let near = ChunkCoord::new(0, 0);
        let far = ChunkCoord::new(5, 5);
        load_chunk(&mut app, near, test_items(near));
        load_chunk(&mut app, far, test_items(far));
        app.update();
        let both = visual_count(&mut app);

        app.world_mut().send_event(ChunkEvicted(far));
        app.update();
        let remaining = visual_count(&mut app);
        assert_eq!(both - remaining, test_items(far).len());
        let still_near = app
            .world_mut()
            .query::<&ItemVisual>()
            .iter(app.world())
            .all(|v| v.coord == near);
        assert!(still_near);
    }

    #[test]
    fn test_burger_visual_stacks_three_parts() {
        let mut app = harness();
        let coord = ChunkCoord::new(0, 0);
        let origin = coord.origin();
        load_chunk(
            &mut app,
            coord,
            vec![SkyItem {
                kind: ItemKind::Burger,
                position: Vec3::new(origin.x + 100.0, origin.y + 100.0, 4000.0),
                collected: false,
            }],
        );
        app.update();

        let mut roots = app.world_mut().query::<(&ItemVisual, &Children)>();
        let (_, children) = roots.single(app.world());
        assert_eq!(children.len(), 3);
    }
}
