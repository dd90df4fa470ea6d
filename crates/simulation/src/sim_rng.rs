//! Seeded RNG resource for the simulation.
//!
//! Anything random in the simulation draws from this resource rather than
//! from `rand::thread_rng()`, so a given seed replays the same world: the
//! same flight path over the same seed passes the same items in the same
//! places. `ChaCha8Rng` keeps the stream identical across platforms,
//! including wasm32.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
pub const DEFAULT_SEED: u64 = 42;

/// Deterministic RNG resource for all simulation randomness (today that is
/// the sky-item scatter; terrain comes from the seeded noise field instead).
///
/// Systems take `ResMut<SimRng>` and draw through `rng.0`, a `ChaCha8Rng`
/// implementing `rand::Rng`.
#[derive(Resource)]
pub struct SimRng(pub ChaCha8Rng);

impl Default for SimRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl SimRng {
    /// Build an RNG from an explicit seed, for replays and tests.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
