//! Game flow states.
//!
//! [`AppState`] is the Bevy [`States`] enum that moves the game between the
//! title screen, active flight, and the crash/out-of-fuel screen. Simulation
//! systems only run while the state is [`AppState::Playing`].
//!
//! It lives in `simulation` because `rendering` and `ui` both gate systems
//! on it; putting it any higher would make the crate graph cyclic.

use bevy::prelude::*;

/// Where the game currently is in its menu/flight/game-over loop.
///
/// Flight systems are gated behind `in_state(AppState::Playing)`, so the
/// world is frozen on both the title and game-over screens.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    /// The title screen; no simulation running.
    #[default]
    MainMenu,
    /// Active flight: the stream, collision, and scoring systems run.
    Playing,
    /// The run ended (crash or dry tanks); world is frozen behind the
    /// results screen.
    GameOver,
}
