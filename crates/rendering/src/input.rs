//! Keyboard sampling for the flight stick.

use bevy::prelude::*;

use simulation::aircraft::FlightInput;

/// Build this frame's stick state from held keys. Opposing keys cancel.
fn stick_from_keys(keys: &ButtonInput<KeyCode>) -> FlightInput {
    let mut stick = FlightInput::default();
    if keys.pressed(KeyCode::ArrowUp) {
        stick.pitch += 1.0;
    }
    if keys.pressed(KeyCode::ArrowDown) {
        stick.pitch -= 1.0;
    }
    if keys.pressed(KeyCode::ArrowLeft) {
        stick.yaw += 1.0;
    }
    if keys.pressed(KeyCode::ArrowRight) {
        stick.yaw -= 1.0;
    }
    if keys.pressed(KeyCode::KeyE) {
        stick.roll += 1.0;
    }
    if keys.pressed(KeyCode::KeyQ) {
        stick.roll -= 1.0;
    }
    stick.boost = keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight);
    stick
}

/// Overwrite [`FlightInput`] with the keys held this frame. Arrows pitch
/// and yaw, Q/E roll, Shift boosts.
pub fn read_flight_keys(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<FlightInput>) {
    *input = stick_from_keys(&keys);
}
