//! Run state: score, fuel, and how a run ends.
//!
//! Fuel drains continuously and faster as the score grows: every time the
//! score crosses the next decade threshold (1,000, then 10,000, ...) the
//! burn rate steps up by one unit per second. The run ends when the tank
//! empties or the aircraft meets the terrain.

use bevy::prelude::*;

use crate::app_state::AppState;
use crate::collision::CollisionEvent;
use crate::config::{BURN_STEP_SCORE, FUEL_BURN_BASE, FUEL_MAX};
use crate::sky::{ItemKind, PickupEffect};

/// Why the run ended. Read by the game-over screen.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    #[default]
    Crashed,
    OutOfFuel,
}

/// Live score and fuel for the current run.
#[derive(Resource, Debug, Clone, Copy)]
pub struct GameStats {
    pub points: u64,
    pub fuel: f32,
    /// Fuel burned per second. Starts at the base rate and only rises.
    pub burn_rate: f32,
    /// Score at which the burn rate next steps up.
    pub next_burn_step: u64,
}

impl Default for GameStats {
    fn default() -> Self {
        Self {
            points: 0,
            fuel: FUEL_MAX,
            burn_rate: FUEL_BURN_BASE,
            next_burn_step: BURN_STEP_SCORE,
        }
    }
}

impl GameStats {
    /// Apply one collected item, then re-check the burn escalation: a single
    /// pickup (a burger doubling) can cross several thresholds at once.
    pub fn apply_pickup(&mut self, kind: ItemKind) {
        match kind.stats().effect {
            PickupEffect::Refuel(amount) => {
                self.fuel = (self.fuel + amount).min(FUEL_MAX);
            }
            PickupEffect::Points(points) => {
                self.points += points;
            }
            PickupEffect::DoublePoints => {
                self.points *= 2;
            }
        }
        while self.points >= self.next_burn_step {
            self.burn_rate += 1.0;
            self.next_burn_step *= 10;
        }
    }

    /// Drain `dt` seconds of fuel. Returns true when the tank just emptied.
    pub fn burn(&mut self, dt: f32) -> bool {
        if self.fuel <= 0.0 {
            return false;
        }
        self.fuel -= self.burn_rate * dt;
        if self.fuel <= 0.0 {
            self.fuel = 0.0;
            return true;
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Score pickups and end the run on a crash.
pub fn apply_collisions(
    mut events: EventReader<CollisionEvent>,
    mut stats: ResMut<GameStats>,
    mut reason: ResMut<GameOverReason>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for event in events.read() {
        match event {
            CollisionEvent::Ground => {
                *reason = GameOverReason::Crashed;
                next_state.set(AppState::GameOver);
            }
            CollisionEvent::Item(kind) => stats.apply_pickup(*kind),
        }
    }
}

/// Drain fuel with time; end the run when the tank empties.
pub fn burn_fuel(
    time: Res<Time>,
    mut stats: ResMut<GameStats>,
    mut reason: ResMut<GameOverReason>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if stats.burn(time.delta_secs()) {
        *reason = GameOverReason::OutOfFuel;
        next_state.set(AppState::GameOver);
    }
}

/// Fresh score and full tank when a new run starts.
pub fn reset_run(mut stats: ResMut<GameStats>, mut reason: ResMut<GameOverReason>) {
    *stats = GameStats::default();
    *reason = GameOverReason::default();
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
