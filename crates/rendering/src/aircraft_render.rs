//! The aircraft's visible body.
//!
//! One root entity tagged [`AircraftVisual`] mirrors the sim's
//! [`Aircraft`] resource; the fuselage, wings, and tail are fixed children.
//! Bevy models face -Z, so [`sync_aircraft_pose`] aims the root's -Z along
//! the aircraft's forward vector with `look_to`.

use bevy::prelude::*;

use simulation::aircraft::Aircraft;

use crate::to_render;

/// Root of the aircraft model; children carry the meshes.
#[derive(Component)]
pub struct AircraftVisual;

pub fn spawn_aircraft(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let hull = materials.add(StandardMaterial {
        base_color: Color::srgb(0.85, 0.86, 0.88),
        perceptual_roughness: 0.55,
        ..default()
    });
    let trim = materials.add(StandardMaterial {
        base_color: Color::srgb(0.78, 0.13, 0.16),
        perceptual_roughness: 0.7,
        ..default()
    });

    let aircraft = Aircraft::at_spawn();
    let root = commands
        .spawn((
            AircraftVisual,
            Transform::from_translation(to_render(aircraft.position))
                .looking_to(to_render(aircraft.forward()), to_render(aircraft.up())),
            Visibility::default(),
        ))
        .id();

    let mut part = |mesh: Mesh, material: &Handle<StandardMaterial>, transform: Transform| {
        commands
            .spawn((
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(material.clone()),
                transform,
                Visibility::default(),
            ))
            .set_parent(root);
    };

    // Fuselage: capsule laid along -Z, nose first.
    part(
        Capsule3d::new(55.0, 340.0).into(),
        &hull,
        Transform::from_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
    );
    // Main wing, slightly ahead of center.
    part(
        Cuboid::new(760.0, 22.0, 150.0).into(),
        &trim,
        Transform::from_xyz(0.0, -10.0, -20.0),
    );
    // Tailplane and fin.
    part(
        Cuboid::new(300.0, 16.0, 90.0).into(),
        &trim,
        Transform::from_xyz(0.0, 20.0, 195.0),
    );
    part(
        Cuboid::new(16.0, 120.0, 100.0).into(),
        &hull,
        Transform::from_xyz(0.0, 80.0, 205.0),
    );
}

/// Copy the sim pose onto the visual root.
pub fn sync_aircraft_pose(
    aircraft: Res<Aircraft>,
    mut visual: Query<&mut Transform, With<AircraftVisual>>,
) {
    let Ok(mut transform) = visual.get_single_mut() else {
        return;
    };
    transform.translation = to_render(aircraft.position);
    transform.look_to(to_render(aircraft.forward()), to_render(aircraft.up()));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
