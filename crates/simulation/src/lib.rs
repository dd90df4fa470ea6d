//! Headless flight simulation: terrain streaming, collision, items, scoring.
//!
//! Everything observable about a run lives in this crate's resources
//! ([`Aircraft`], [`ChunkGrid`], [`GameStats`]) and advances one step per
//! `Update`. The `rendering` and `ui` crates only mirror that state; nothing
//! here touches a mesh or a window, which is what lets the integration tests
//! and benches drive full runs headless.

use bevy::prelude::*;

pub mod aircraft;
pub mod app_state;
pub mod chunk;
pub mod chunk_grid;
pub mod collision;
pub mod config;
pub mod game;
pub mod noise_field;
pub mod sim_rng;
pub mod sky;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

use aircraft::{Aircraft, FlightInput};
use app_state::AppState;
use chunk_grid::{ChunkEvicted, ChunkGrid, ChunkSpawned};
use collision::CollisionEvent;
use game::{GameOverReason, GameStats};
use noise_field::NoiseField;
use sim_rng::SimRng;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .init_resource::<SimRng>()
            .init_resource::<NoiseField>()
            .init_resource::<ChunkGrid>()
            .init_resource::<Aircraft>()
            .init_resource::<FlightInput>()
            .init_resource::<GameStats>()
            .init_resource::<GameOverReason>()
            .add_event::<ChunkSpawned>()
            .add_event::<ChunkEvicted>()
            .add_event::<CollisionEvent>();

        // Every run starts clean: fresh stats, spawn pose, empty grid. The
        // first stream pass of the run rebuilds the window at the spawn.
        app.add_systems(
            OnEnter(AppState::Playing),
            (
                game::reset_run,
                aircraft::reset_aircraft,
                chunk_grid::reset_grid,
            ),
        );

        // One logical step per frame. Streaming runs after the aircraft
        // moves and before collision, so collision always probes terrain
        // that exists under the aircraft.
        app.add_systems(
            Update,
            (
                aircraft::integrate_flight,
                chunk_grid::stream_chunks,
                collision::detect_collisions,
                game::apply_collisions,
                game::burn_fuel,
            )
                .chain()
                .run_if(in_state(AppState::Playing)),
        );
    }
}
