//! The aircraft flight model.
//!
//! The aircraft is a single [`Aircraft`] resource, not an entity: exactly one
//! exists, every system needs it, and rendering just mirrors it. Sim axes
//! put x/y on the ground plane with z as altitude; the aircraft's local
//! frame is +X forward, +Y left, +Z up.
//!
//! Control is arcade-style: the aircraft always moves forward at cruise
//! speed, and the stick applies small per-frame rotations in the local
//! frame, so a held roll banks progressively and a loop is just sustained
//! pitch.

use bevy::prelude::*;

use crate::config::{BOOST_MULTIPLIER, FLIGHT_SPEED, START_ALTITUDE, TURN_RATE};

/// Stick state for the current frame, each axis in [-1, 1]. Written by the
/// input layer each frame; consumed by [`integrate_flight`].
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct FlightInput {
    /// Positive pulls the nose up.
    pub pitch: f32,
    /// Positive yaws the nose left.
    pub yaw: f32,
    /// Positive banks right.
    pub roll: f32,
    /// Boost held: multiplies forward speed.
    pub boost: bool,
}

/// The aircraft pose and speed.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Aircraft {
    pub position: Vec3,
    pub orientation: Quat,
    /// Forward speed in world units per second. Always applied; tests park
    /// the aircraft by zeroing it.
    pub speed: f32,
}

impl Default for Aircraft {
    fn default() -> Self {
        Self::at_spawn()
    }
}

impl Aircraft {
    /// The start-of-run pose: over the world origin, level, facing +X.
    pub fn at_spawn() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, START_ALTITUDE),
            orientation: Quat::IDENTITY,
            speed: FLIGHT_SPEED,
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    /// Advance the pose by `dt` seconds of stick input.
    pub fn integrate(&mut self, input: FlightInput, dt: f32) {
        let turn = TURN_RATE * dt;
        // Small-angle quaternion from the per-axis turn amounts, composed on
        // the right so it rotates in the aircraft's local frame. Nose-up is
        // a negative rotation about the local left (+Y) axis.
        let step = Quat::from_xyzw(
            input.roll * turn,
            -input.pitch * turn,
            input.yaw * turn,
            1.0,
        )
        .normalize();
        self.orientation = (self.orientation * step).normalize();

        let throttle = if input.boost { BOOST_MULTIPLIER } else { 1.0 };
        self.position += self.forward() * (self.speed * throttle * dt);
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Apply this frame's stick input to the aircraft.
pub fn integrate_flight(
    time: Res<Time>,
    input: Res<FlightInput>,
    mut aircraft: ResMut<Aircraft>,
) {
    aircraft.integrate(*input, time.delta_secs());
}

/// Put the aircraft back on the spawn pose when a new run starts.
pub fn reset_aircraft(mut aircraft: ResMut<Aircraft>, mut input: ResMut<FlightInput>) {
    *aircraft = Aircraft::at_spawn();
    *input = FlightInput::default();
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
