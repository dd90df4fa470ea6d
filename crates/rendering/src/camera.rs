//! Chase camera trailing the aircraft.
//!
//! The camera pursues a point behind and above the aircraft's ground-plane
//! heading with an exponential catch-up, then looks at the aircraft. Fog
//! runs out just inside the chunk keep window, so chunks pop in behind the
//! haze rather than on screen.

use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;

use simulation::aircraft::Aircraft;

use crate::{sky_color, to_render};

const FOG_START: f32 = 12_000.0;
const FOG_END: f32 = 20_000.0;
const FAR_PLANE: f32 = 30_000.0;

/// Chase tuning. A resource so the feel can be tweaked in one place.
#[derive(Resource)]
pub struct ChaseCamera {
    /// Trail distance behind the aircraft, along its ground heading.
    pub back: f32,
    /// Height above the aircraft's altitude.
    pub height: f32,
    /// Exponential catch-up rate per second; higher snaps harder.
    pub stiffness: f32,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self {
            back: 1_300.0,
            height: 420.0,
            stiffness: 6.0,
        }
    }
}

/// Where the camera wants to sit for the aircraft's current pose.
///
/// Only the ground-plane heading is used: a roll or a loop shouldn't fling
/// the camera sideways or under the terrain.
fn chase_eye(chase: &ChaseCamera, aircraft: &Aircraft) -> Vec3 {
    let forward = to_render(aircraft.forward());
    // Straight up or down has no ground heading; settle on +X over a NaN.
    let heading = Vec3::new(forward.x, 0.0, forward.z).normalize_or(Vec3::X);
    to_render(aircraft.position) - heading * chase.back + Vec3::Y * chase.height
}

pub fn setup_camera(mut commands: Commands) {
    let aircraft = Aircraft::at_spawn();
    let eye = chase_eye(&ChaseCamera::default(), &aircraft);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            near: 2.0,
            far: FAR_PLANE,
            ..default()
        }),
        DistanceFog {
            color: sky_color(),
            falloff: FogFalloff::Linear {
                start: FOG_START,
                end: FOG_END,
            },
            ..default()
        },
        Transform::from_translation(eye).looking_at(to_render(aircraft.position), Vec3::Y),
    ));
}

/// Ease the camera toward its chase point and keep the aircraft framed.
pub fn follow_aircraft(
    time: Res<Time>,
    chase: Res<ChaseCamera>,
    aircraft: Res<Aircraft>,
    mut camera: Query<&mut Transform, With<Camera3d>>,
) {
    let Ok(mut transform) = camera.get_single_mut() else {
        return;
    };
    let target = chase_eye(&chase, &aircraft);
    // Framerate-independent exponential approach.
    let alpha = 1.0 - (-chase.stiffness * time.delta_secs()).exp();
    transform.translation = transform.translation.lerp(target, alpha);
    transform.look_at(to_render(aircraft.position), Vec3::Y);
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
