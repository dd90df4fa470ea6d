//! # TestFlight: headless integration test harness
//!
//! Provides a fluent builder that wraps `bevy::app::App` + `SimulationPlugin`
//! for running integration tests without a window or renderer. A fresh
//! `TestFlight` is already in [`AppState::Playing`] with the spawn window
//! streamed in; builder methods reposition the aircraft or seed items, and
//! `tick()` advances the run one frame at a time.

use bevy::app::App;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use crate::aircraft::{Aircraft, FlightInput};
use crate::app_state::AppState;
use crate::chunk::ChunkCoord;
use crate::chunk_grid::ChunkGrid;
use crate::game::{GameOverReason, GameStats};
use crate::noise_field::NoiseField;
use crate::sim_rng::SimRng;
use crate::sky::{ItemKind, SkyItem};

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
pub struct TestFlight {
    app: App,
}

impl Default for TestFlight {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFlight {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Start a run with the default seed. The app has ticked once in
    /// `Playing`, so the spawn window is already streamed in.
    pub fn new() -> Self {
        Self::with_seed(crate::sim_rng::DEFAULT_SEED)
    }

    /// Start a run with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        let mut flight = Self::at_menu(seed);
        flight
            .app
            .world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Playing);
        // One update applies the transition (running the OnEnter resets) and
        // streams the first window in at the spawn pose.
        flight.app.update();
        flight
    }

    /// Build the app but stay on the title screen: no streaming, no
    /// simulation. `restart()` moves it into `Playing`.
    pub fn at_menu(seed: u64) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(StatesPlugin);

        // Insert seeded resources BEFORE SimulationPlugin so its
        // init_resource calls keep them.
        app.insert_resource(SimRng::from_seed_u64(seed));
        app.insert_resource(NoiseField::from_seed(seed as i32));
        app.add_plugins(crate::SimulationPlugin);
        app.update();

        Self { app }
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// Park the aircraft at a position (speed zeroed so it stays put), then
    /// tick once so the stream recenters there. Note the tick also runs
    /// collision at the new position.
    pub fn parked_at(mut self, position: Vec3) -> Self {
        {
            let mut aircraft = self.app.world_mut().resource_mut::<Aircraft>();
            aircraft.position = position;
            aircraft.speed = 0.0;
        }
        self.tick();
        self
    }

    /// Reset score and fuel to their run defaults. The construction frame
    /// flies once at spawn altitude, where a naturally spawned item can
    /// already be in pickup range; call this after parking so score
    /// assertions start from zero.
    pub fn with_clean_stats(mut self) -> Self {
        *self.app.world_mut().resource_mut::<GameStats>() = GameStats::default();
        self
    }

    /// Set this frame's stick input. It persists until overwritten.
    pub fn with_input(mut self, input: FlightInput) -> Self {
        *self.app.world_mut().resource_mut::<FlightInput>() = input;
        self
    }

    /// Drop an extra item into the sky chunk owning `position`. The chunk
    /// must be streamed in (park nearby first).
    pub fn with_item(mut self, kind: ItemKind, position: Vec3) -> Self {
        let coord = ChunkCoord::from_world(position.x, position.y);
        let mut grid = self.app.world_mut().resource_mut::<ChunkGrid>();
        let sky = grid
            .sky_mut(coord)
            .unwrap_or_else(|| panic!("sky chunk {coord:?} not streamed in"));
        sky.push(SkyItem {
            kind,
            position,
            collected: false,
        });
        self
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Advance one frame.
    pub fn tick(&mut self) {
        self.app.update();
    }

    /// Advance `n` frames.
    pub fn tick_n(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Queue a transition into `Playing` and tick once, as the Space-key
    /// handler does. Used to test the restart path.
    pub fn restart(&mut self) {
        self.app
            .world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Playing);
        self.app.update();
    }

    /// Move the aircraft without touching its speed.
    pub fn set_position(&mut self, position: Vec3) {
        self.app.world_mut().resource_mut::<Aircraft>().position = position;
    }

    /// Overwrite the stick input mid-run.
    pub fn set_input(&mut self, input: FlightInput) {
        *self.app.world_mut().resource_mut::<FlightInput>() = input;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn aircraft(&self) -> Aircraft {
        *self.app.world().resource::<Aircraft>()
    }

    pub fn stats(&self) -> GameStats {
        *self.app.world().resource::<GameStats>()
    }

    pub fn state(&self) -> AppState {
        *self.app.world().resource::<State<AppState>>().get()
    }

    pub fn reason(&self) -> GameOverReason {
        *self.app.world().resource::<GameOverReason>()
    }

    pub fn grid(&self) -> &ChunkGrid {
        self.app.world().resource::<ChunkGrid>()
    }

    pub fn loaded_chunks(&self) -> usize {
        self.grid().len()
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.grid().contains(coord)
    }

    /// Escape hatch for tests that need direct world access.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
