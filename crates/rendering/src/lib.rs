//! Mirrors the headless simulation into Bevy's scene graph.
//!
//! Everything here is one-directional: systems read the `simulation`
//! resources and events and write meshes, transforms, and the camera. The
//! single exception is [`input::read_flight_keys`], which writes the stick
//! state the flight model consumes. Nothing in the sim ever waits on a
//! frame, so dropping this crate (as the integration tests do) changes no
//! gameplay.

use bevy::prelude::*;

pub mod aircraft_render;
pub mod camera;
pub mod input;
pub mod sky_render;
pub mod terrain_render;

/// Map a sim-space vector (x/y on the ground plane, z altitude) to render
/// space (Bevy y-up). The swap mirrors the ground plane, so terrain index
/// winding is flipped to match; see [`terrain_render::build_chunk_mesh`].
pub fn to_render(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, v.y)
}

/// Sky tint shared by the window clear color and the distance fog, so far
/// terrain fades into the horizon instead of against it.
pub fn sky_color() -> Color {
    Color::srgb_u8(0x7e, 0xc0, 0xee)
}

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<camera::ChaseCamera>()
            .add_systems(
                Startup,
                (
                    camera::setup_camera,
                    setup_lighting,
                    terrain_render::setup_terrain_assets,
                    sky_render::setup_item_assets,
                    aircraft_render::spawn_aircraft,
                ),
            )
            // Sample the keyboard before the flight model consumes it so a
            // key press lands the same frame.
            .add_systems(
                Update,
                input::read_flight_keys.before(simulation::aircraft::integrate_flight),
            )
            // Despawn before spawn: if an evict and a respawn of the same
            // coordinate are both pending, the fresh mesh must survive.
            .add_systems(
                Update,
                (
                    terrain_render::despawn_chunk_meshes,
                    terrain_render::spawn_chunk_meshes,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (sky_render::sync_item_visuals, sky_render::spin_item_visuals),
            )
            // Pose and camera read the aircraft after it moved this frame;
            // without the ordering the chase camera lags a frame and judders.
            .add_systems(
                Update,
                (aircraft_render::sync_aircraft_pose, camera::follow_aircraft)
                    .chain()
                    .after(simulation::aircraft::integrate_flight),
            );
    }
}

fn setup_lighting(mut commands: Commands) {
    // Cool sky bounce; the sun below does the actual slope shading.
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.75, 0.85, 1.0),
        brightness: 250.0,
    });

    // High late-morning sun. Shadows stay off: cascades cannot reach across
    // terrain that runs to the fog line, and the tinted heightfield reads
    // fine without them.
    commands.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::YXZ, 0.6, -1.1, 0.0)),
    ));
}
